use std::{fmt, path::PathBuf, sync::Arc};

use crate::{metadata::reader::ProjectionMode, typesystem::Type};

/// Maps a bare module name (`System.Runtime`) to the file that holds it
pub type PathResolver = dyn Fn(&str) -> Option<PathBuf> + Send + Sync;

/// Answers a [`FakeTypeRequest`] with a substitute type, or `None` to get a placeholder
pub type FakeTypeResolver = dyn Fn(&FakeTypeRequest) -> Option<Type> + Send + Sync;

/// Default bound on `TypeRef` scope chains and forwarder hops
pub const DEFAULT_MAX_SCOPE_DEPTH: usize = 64;

/// Raised when a type is resolved against a module that could not be located
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeTypeRequest {
    /// Full name of the requested type, `Namespace.Outer+Inner`
    pub type_name: String,
    /// Name of the placeholder module the type was looked up in
    pub module_name: String,
}

/// Configuration of a [`crate::LoadContext`].
///
/// # Examples
///
/// ```rust
/// use cilgraph::{LoadOptions, ProjectionMode};
///
/// let options = LoadOptions::new()
///     .projection(ProjectionMode::ApplyPlatformProjection)
///     .core_library(None)
///     .with_path_resolver(|name| Some(format!("/refs/{name}.dll").into()));
/// # let _ = options;
/// ```
#[derive(Clone)]
pub struct LoadOptions {
    pub(crate) projection: ProjectionMode,
    pub(crate) core_library: Option<String>,
    pub(crate) path_resolver: Option<Arc<PathResolver>>,
    pub(crate) fake_type_resolver: Option<Arc<FakeTypeResolver>>,
    pub(crate) max_scope_depth: usize,
}

impl LoadOptions {
    /// Defaults: no projection, `mscorlib` preloaded, no hooks, a scope depth of 64
    #[must_use]
    pub fn new() -> Self {
        LoadOptions {
            projection: ProjectionMode::None,
            core_library: Some("mscorlib".to_string()),
            path_resolver: None,
            fake_type_resolver: None,
            max_scope_depth: DEFAULT_MAX_SCOPE_DEPTH,
        }
    }

    /// The projection mode handed to every reader
    #[must_use]
    pub fn projection(mut self, projection: ProjectionMode) -> Self {
        self.projection = projection;
        self
    }

    /// The module implicitly requested when the context is created; `None` disables the preload
    #[must_use]
    pub fn core_library(mut self, name: Option<&str>) -> Self {
        self.core_library = name.map(str::to_string);
        self
    }

    /// Locate modules requested by name.
    ///
    /// Without a resolver, or when it returns `None`, a module requested by name becomes a
    /// placeholder.
    #[must_use]
    pub fn with_path_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf> + Send + Sync + 'static,
    {
        self.path_resolver = Some(Arc::new(resolver));
        self
    }

    /// Supply substitutes for types of placeholder modules
    #[must_use]
    pub fn with_fake_type_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&FakeTypeRequest) -> Option<Type> + Send + Sync + 'static,
    {
        self.fake_type_resolver = Some(Arc::new(resolver));
        self
    }

    /// Bound on `TypeRef` scope chains and forwarder hops
    #[must_use]
    pub fn max_scope_depth(mut self, depth: usize) -> Self {
        self.max_scope_depth = depth;
        self
    }

    pub(crate) fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        self.path_resolver.as_ref().and_then(|resolver| resolver(name))
    }

    pub(crate) fn resolve_fake_type(&self, request: &FakeTypeRequest) -> Option<Type> {
        self.fake_type_resolver
            .as_ref()
            .and_then(|resolver| resolver(request))
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("projection", &self.projection)
            .field("core_library", &self.core_library)
            .field("path_resolver", &self.path_resolver.is_some())
            .field("fake_type_resolver", &self.fake_type_resolver.is_some())
            .field("max_scope_depth", &self.max_scope_depth)
            .finish()
    }
}
