// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![warn(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # cilgraph
//!
//! A metadata-resolution and type-graph engine for .NET modules. `cilgraph` reads ECMA-335
//! metadata from assemblies, reference assemblies and WinMD files and exposes the types they
//! define as a navigable graph: base types, interfaces, generic instantiations, members and custom
//! attributes. Nothing is executed and method bodies are never looked at.
//!
//! ## Features
//!
//! - **Multi-module resolution** - References are followed across every loaded module, including
//!   type forwarders
//! - **Missing dependencies** - Modules that can not be located become placeholders, and their
//!   types exist by name, or are replaced by caller-supplied substitutes
//! - **Structural type identity** - `List<string>` decoded twice compares equal, `List<int>` does
//!   not
//! - **Lazy decoding** - Signatures and attribute blobs are only decoded when asked for
//! - **Publicish filtering** - Member listings can be restricted to the surface reachable from
//!   outside the module
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cilgraph::prelude::*;
//!
//! let context = LoadContext::new();
//! let module = context.request_load_path(std::path::Path::new("Contoso.dll"))?;
//! context.finalize()?;
//!
//! for ty in module.all_types() {
//!     println!("{}", ty);
//!     if let Ok(Some(base)) = ty.base_type() {
//!         println!("  : {}", base);
//!     }
//!     for method in ty.methods(true) {
//!         println!("  {} {}", method.return_type(), method.name());
//!     }
//! }
//! # Ok::<(), cilgraph::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The ECMA-335 substrate: streams, tables, signature and attribute blobs
//! - [`loader`] - The load context and its modules
//! - [`typesystem`] - Type nodes, members and custom attributes
//!
//! Loading happens in two phases. Modules are requested while the context is loading;
//! [`LoadContext::finalize`] then registers every module they reference, after which types can
//! be resolved across module boundaries.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use cilgraph::prelude::*;
///
/// let context = LoadContext::new();
/// context.request_load_path(std::path::Path::new("Contoso.dll"))?;
/// context.finalize()?;
/// let ty: Type = context.resolve_type("Contoso.Widget")?;
/// # Ok::<(), cilgraph::Error>(())
/// ```
pub mod prelude;

/// Parsing of ECMA-335 metadata
///
/// This module reads the physical layout of a module: the CLR header, the metadata root, the
/// heaps and the tables, and decodes signature and custom attribute blobs through provider
/// traits. It knows nothing about other modules.
///
/// # Key Components
///
/// - [`metadata::reader::MetadataReader`] - One parsed module
/// - [`metadata::signatures`] - Signature decoding
/// - [`metadata::customattributes`] - Custom attribute value decoding
/// - [`metadata::tables`] - Typed table rows
pub mod metadata;

/// Module loading and cross-module resolution
pub mod loader;

/// The type graph built on top of the loaded modules
pub mod typesystem;

/// `cilgraph` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use cilgraph::{LoadContext, Result, Type};
///
/// fn widget(context: &LoadContext) -> Result<Type> {
///     context.resolve_type("Contoso.Widget")
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `cilgraph` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use cilgraph::{Error, LoadContext};
///
/// let context = LoadContext::new();
/// match context.request_load_bytes(std::fs::read("maybe.dll").unwrap_or_default()) {
///     Ok(module) => println!("Loaded {}", module.name()),
///     Err(Error::NotAnAssembly(reason)) => println!("Not a .NET module: {}", reason),
///     Err(Error::Empty) => println!("Empty file"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use loader::{FakeTypeRequest, LoadContext, LoadOptions, Module};
pub use metadata::reader::{MetadataReader, ProjectionMode};
pub use typesystem::{
    primitive_type, ConstantValue, CustomAttribute, Event, Field, FieldModifiers, GenericContext,
    Method, MethodModifiers, Parameter, Property, Type, TypeModifiers,
};

/// Low-level access to the image bytes
pub use file::{parser::Parser, File};
