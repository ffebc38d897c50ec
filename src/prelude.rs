//! # cilgraph Prelude
//!
//! The types needed to load modules and walk the type graph, for glob imports.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilgraph operations
pub use crate::Error;

/// The result type used throughout cilgraph
pub use crate::Result;

// ================================================================================================
// Loading
// ================================================================================================

/// Owns the modules and resolves names across them
pub use crate::LoadContext;

/// Configuration and hooks of a load context
pub use crate::{FakeTypeRequest, LoadOptions, ProjectionMode};

/// One loaded or placeholder module
pub use crate::Module;

// ================================================================================================
// Type Graph
// ================================================================================================

/// Type nodes and their wrapping
pub use crate::{primitive_type, GenericContext, Type, TypeModifiers};

/// Members
pub use crate::{Event, Field, FieldModifiers, Method, MethodModifiers, Parameter, Property};

/// Custom attributes and constants
pub use crate::{ConstantValue, CustomAttribute};

/// Decoded attribute arguments
pub use crate::metadata::customattributes::{
    CustomAttributeArgument, CustomAttributeNamedArgument, CustomAttributeTypedArgument,
    CustomAttributeValue, NamedArgumentKind,
};

/// Signature building blocks
pub use crate::metadata::signatures::{MethodSignature, PrimitiveTypeCode};

/// Metadata tokens
pub use crate::metadata::token::Token;
