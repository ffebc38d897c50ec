//! Signature decoding for ECMA-335 blobs (II.23.2).
//!
//! Signatures describe the types of fields, methods, properties and type specifications in a
//! compressed prefix encoding. This module decodes them without deciding what a "type" is: every
//! element is handed to a [`SignatureTypeProvider`], which builds its own representation and
//! receives the already built inner types of constructed elements (arrays, pointers, generic
//! instantiations, function pointers, custom modifiers).
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilgraph::metadata::signatures::decode_method_signature;
//!
//! let signature = decode_method_signature(blob, &provider, &context)?;
//! println!("{} parameters", signature.parameter_types.len());
//! ```
//!
//! # Implementation Notes
//!
//! - Generic parameters (`!n`, `!!n`) are resolved by the provider against a caller supplied
//!   generic context; the decoder passes it through untouched
//! - `TypeSpec` tokens inside a signature are resolved by the provider as well, usually by
//!   decoding the referenced blob with a new decoder over the same context
//! - Nesting is limited to 50 levels
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 23.2 - Blobs and Signatures

mod decoder;
mod provider;
mod types;

pub use decoder::SignatureDecoder;
pub use provider::SignatureTypeProvider;
pub use types::*;

use crate::{file::parser::Parser, Result};

/// Decode a method signature blob
///
/// # Errors
/// Returns an error if the blob is malformed or the provider fails.
pub fn decode_method_signature<P, C>(
    data: &[u8],
    provider: &P,
    context: &C,
) -> Result<MethodSignature<P::Type>>
where
    P: SignatureTypeProvider<C> + ?Sized,
    C: ?Sized,
{
    let mut parser = Parser::new(data);
    SignatureDecoder::new(provider, context).decode_method_signature(&mut parser)
}

/// Decode a property signature blob
///
/// # Errors
/// Returns an error if the blob is malformed or the provider fails.
pub fn decode_property_signature<P, C>(
    data: &[u8],
    provider: &P,
    context: &C,
) -> Result<MethodSignature<P::Type>>
where
    P: SignatureTypeProvider<C> + ?Sized,
    C: ?Sized,
{
    let mut parser = Parser::new(data);
    SignatureDecoder::new(provider, context).decode_property_signature(&mut parser)
}

/// Decode a field signature blob
///
/// # Errors
/// Returns an error if the blob is malformed or the provider fails.
pub fn decode_field_signature<P, C>(data: &[u8], provider: &P, context: &C) -> Result<P::Type>
where
    P: SignatureTypeProvider<C> + ?Sized,
    C: ?Sized,
{
    let mut parser = Parser::new(data);
    SignatureDecoder::new(provider, context).decode_field_signature(&mut parser)
}

/// Decode the blob of a `TypeSpec` row
///
/// # Errors
/// Returns an error if the blob is malformed or the provider fails.
pub fn decode_type_specification<P, C>(data: &[u8], provider: &P, context: &C) -> Result<P::Type>
where
    P: SignatureTypeProvider<C> + ?Sized,
    C: ?Sized,
{
    let mut parser = Parser::new(data);
    SignatureDecoder::new(provider, context).decode_type(&mut parser)
}
