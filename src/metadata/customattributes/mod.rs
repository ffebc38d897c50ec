//! Custom attribute value decoding.
//!
//! Custom attributes encode constructor arguments and field/property assignments in a compact
//! binary blob (ECMA-335 II.23.3):
//! - **Prolog** - the `0x0001` marker
//! - **Fixed Arguments** - constructor parameter values in declaration order, typed by the
//!   constructor signature
//! - **Named Arguments** - a `u16` count, then field/property assignments that carry their own
//!   type encoding
//!
//! Neither part is self-describing enough to decode without help: enum values are stored as bare
//! integers and `System.Type` values as names. [`CustomAttributeDecoder`] asks a
//! [`CustomAttributeTypeProvider`] for that information, so the type graph decides how names are
//! resolved and what an enum it can not see is stored as.
//!
//! # Examples
//!
//! ```rust,ignore
//! let decoder = CustomAttributeDecoder::new(&provider);
//! let value = decoder.decode_value(constructor_signature, blob)?;
//! for argument in &value.fixed_args {
//!     println!("{:?}", argument.value);
//! }
//! ```

mod decoder;
mod provider;
mod types;

pub use decoder::CustomAttributeDecoder;
pub use provider::CustomAttributeTypeProvider;
pub use types::*;
