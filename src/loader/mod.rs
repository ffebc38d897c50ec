//! Module loading and cross-module resolution.
//!
//! A [`LoadContext`] owns every [`Module`] it loads, either because the caller requested it
//! (explicit) or because a loaded module references it (implicit). Names are resolved across the
//! whole set; a module that can not be located is replaced by a placeholder whose types exist by
//! name only.
//!
//! # Key Components
//!
//! - [`LoadContext`] - Two-phase loading and name resolution across modules
//! - [`Module`] - One module: definition cache, name index and forwarders
//! - [`LoadOptions`] - Projection mode, core library and the caller hooks
//!
//! # Examples
//!
//! ```rust,no_run
//! use cilgraph::{LoadContext, LoadOptions, Type};
//!
//! let options = LoadOptions::new().with_fake_type_resolver(|request| {
//!     (request.type_name == "Windows.Foundation.Uri")
//!         .then(|| Type::placeholder("System.Uri", "System.Runtime"))
//! });
//!
//! let context = LoadContext::with_options(options);
//! context.request_load_path(std::path::Path::new("Windows.Web.winmd"))?;
//! context.finalize()?;
//!
//! for module in context.implicit_modules() {
//!     println!("{} (placeholder: {})", module.name(), module.is_placeholder());
//! }
//! # Ok::<(), cilgraph::Error>(())
//! ```

mod context;
mod module;
mod options;

pub(crate) use context::ContextState;
pub use context::LoadContext;
pub use module::Module;
pub use options::{
    FakeTypeRequest, FakeTypeResolver, LoadOptions, PathResolver, DEFAULT_MAX_SCOPE_DEPTH,
};
