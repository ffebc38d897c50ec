//! The type graph: [`Type`] nodes and the members hanging off them.
//!
//! A [`Type`] is created by a [`crate::loader::Module`] (definitions, generic parameters), by
//! the signature decoder through the internal provider (everything built on top of a definition),
//! by the primitive table, or by the load context as a placeholder for names it can not locate.
//! Navigation is lazy: base types, interfaces, members and attribute arguments are decoded when
//! asked for and resolve references through the owning module.
//!
//! # Key Components
//!
//! - [`Type`] - The node; naming, classification and identity
//! - [`TypeModifiers`] - Array, pointer, by-reference and `const` wrapping
//! - [`GenericContext`] - Parameters in scope while a signature is decoded
//! - [`members`] - [`Method`], [`Field`], [`Property`], [`Event`], [`Parameter`] and
//!   [`CustomAttribute`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use cilgraph::prelude::*;
//!
//! let context = LoadContext::new();
//! context.request_load_path(std::path::Path::new("Contoso.dll"))?;
//! context.finalize()?;
//!
//! let list = context.resolve_type("Contoso.Collections.Bag`1")?;
//! for property in list.properties(true) {
//!     println!("{} {}", property.property_type()?, property.name());
//! }
//! # Ok::<(), cilgraph::Error>(())
//! ```

mod context;
mod hierarchy;
pub mod members;
mod primitives;
pub(crate) mod provider;
mod types;

pub use context::GenericContext;
pub use members::{
    ConstantValue, CustomAttribute, Event, Field, FieldModifiers, Method, MethodModifiers,
    Parameter, Property,
};
pub use primitives::primitive_type;
pub(crate) use types::{DefinitionType, GenericParameterType, TypeKind};
pub use types::{Type, TypeModifiers};
