//! Metadata substrate for .NET modules.
//!
//! Everything below this module deals with the physical layout described in ECMA-335
//! Partition II: the COR20 header, the metadata root and its streams, the tables and the
//! signature and custom attribute blobs. The type graph in [`crate::typesystem`] never touches
//! raw bytes; it goes through [`reader::MetadataReader`] and the decoders here, which hand out
//! typed rows and tokens and call back into a provider for every type they meet.
//!
//! # Key Components
//!
//! - [`reader`] - One parsed module: heaps, tables, range lists and lookup helpers
//! - [`signatures`] - Signature blob decoding through [`signatures::SignatureTypeProvider`]
//! - [`customattributes`] - Attribute blob decoding through
//!   [`customattributes::CustomAttributeTypeProvider`]
//! - [`tables`] - Typed rows of the ECMA-335 tables the type graph reads
//! - [`streams`] - `#~`, `#Strings`, `#Blob` and `#GUID`
//! - [`token`] - Metadata table row references

/// Implementation of the Header of CIL
pub mod cor20header;
/// Implementation of custom attribute value decoding
pub mod customattributes;
/// One parsed module and its lookup helpers
pub mod reader;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of method and type signatures
pub mod signatures;
/// Implementation of all metadata streams (tables, heaps, etc.)
pub mod streams;
/// Implementation of the .NET metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
