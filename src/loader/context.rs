//! The load context: the module set and cross-module resolution.
//!
//! # Two-phase loading
//!
//! Modules are requested while the context is loading. Requests only parse and register a
//! module; no reference is followed. [`LoadContext::finalize`] then closes the context to further
//! explicit requests and initializes every registered module, which implicitly registers each
//! module it references. Modules discovered during that pass are appended to the module list and
//! initialized by the same scan, so the whole reference closure is registered before any type is
//! resolved across modules.
//!
//! A module is registered before its references are looked at, and registration never recurses:
//! reference cycles between modules terminate by construction.
//!
//! # Placeholders
//!
//! A module that can not be located is registered as a placeholder. Resolving a name against a
//! placeholder first asks the fake type resolver of [`LoadOptions`] for a substitute, and
//! otherwise answers with a placeholder [`Type`] that is cached per name.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock, Weak,
    },
};

use boxcar::Vec as BoxcarVec;

use crate::{
    loader::{
        options::{FakeTypeRequest, LoadOptions},
        Module,
    },
    metadata::{
        reader::{MetadataReader, ProjectionMode},
        tables::{AssemblyRefRaw, ModuleRefRaw, TableId, TypeRefRaw},
        token::Token,
    },
    typesystem::{provider::TypeProvider, GenericContext, Type, TypeModifiers},
    Error::{AlreadyFinalized, AssemblyNotFound, NotYetLoading, RecursionLimit, TypeNotFound},
    Result,
};

/// Shared state behind a [`LoadContext`]; modules hold a weak reference to it
pub(crate) struct ContextState {
    this: Weak<ContextState>,
    pub(crate) options: LoadOptions,
    loading: AtomicBool,
    /// Every module created by this context, in creation order
    modules: BoxcarVec<Arc<Module>>,
    /// Lock order: `explicit` before `implicit`
    explicit: RwLock<HashMap<String, Arc<Module>>>,
    implicit: RwLock<HashMap<String, Arc<Module>>>,
}

impl ContextState {
    fn new(options: LoadOptions) -> Arc<ContextState> {
        Arc::new_cyclic(|this| ContextState {
            this: this.clone(),
            options,
            loading: AtomicBool::new(true),
            modules: BoxcarVec::new(),
            explicit: RwLock::new(HashMap::new()),
            implicit: RwLock::new(HashMap::new()),
        })
    }

    fn ensure_loading(&self) -> Result<()> {
        if self.loading.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(AlreadyFinalized)
        }
    }

    fn create_module(
        &self,
        name: String,
        location: Option<PathBuf>,
        reader: Option<MetadataReader>,
    ) -> Arc<Module> {
        let module = Module::new(self.this.clone(), name, location, reader);
        self.modules.push(module.clone());
        module
    }

    /// The module registered under `name`, explicit or implicit
    pub(crate) fn registered(&self, name: &str) -> Option<Arc<Module>> {
        if let Some(module) = read_lock!(self.explicit).get(name) {
            return Some(module.clone());
        }

        read_lock!(self.implicit).get(name).cloned()
    }

    fn is_registered(&self, module: &Arc<Module>) -> bool {
        self.registered(module.name())
            .is_some_and(|registered| Arc::ptr_eq(&registered, module))
    }

    /// Registered modules in creation order
    fn registered_modules(&self) -> Vec<Arc<Module>> {
        self.modules
            .iter()
            .map(|(_, module)| module)
            .filter(|module| self.is_registered(module))
            .cloned()
            .collect()
    }

    /// Register an explicitly requested module.
    ///
    /// An implicitly registered module of the same name is promoted instead, unless it is a
    /// placeholder and `reader` now provides the real module.
    fn register_explicit(
        &self,
        name: String,
        location: Option<PathBuf>,
        reader: Option<MetadataReader>,
    ) -> Arc<Module> {
        let mut explicit = write_lock!(self.explicit);
        if let Some(existing) = explicit.get(&name) {
            return existing.clone();
        }

        let mut implicit = write_lock!(self.implicit);
        if let Some(existing) = implicit.remove(&name) {
            if !existing.is_placeholder() || reader.is_none() {
                explicit.insert(name, existing.clone());
                return existing;
            }
            log::debug!("Replacing placeholder module '{}' with a loaded one", name);
        }

        let module = self.create_module(name.clone(), location, reader);
        explicit.insert(name, module.clone());
        module
    }

    /// Register `name` implicitly unless it is already known; never fails.
    ///
    /// The module is located through the path resolver. A module that can not be located or read
    /// becomes a placeholder.
    pub(crate) fn load_implicit(&self, name: &str) -> Arc<Module> {
        if let Some(existing) = self.registered(name) {
            return existing;
        }

        let (location, reader) = match self.options.resolve_path(name) {
            Some(path) => match MetadataReader::from_file(&path, self.options.projection) {
                Ok(reader) => (Some(path), Some(reader)),
                Err(error) => {
                    log::warn!(
                        "Can not read '{}' from '{}', using a placeholder - {}",
                        name,
                        path.display(),
                        error
                    );
                    (None, None)
                }
            },
            None => (None, None),
        };

        let explicit = read_lock!(self.explicit);
        if let Some(existing) = explicit.get(name) {
            return existing.clone();
        }
        let mut implicit = write_lock!(self.implicit);
        if let Some(existing) = implicit.get(name) {
            return existing.clone();
        }

        if reader.is_some() {
            log::debug!("Implicitly loading module '{}'", name);
        } else {
            log::debug!("Module '{}' can not be located, using a placeholder", name);
        }

        let module = self.create_module(name.to_string(), location, reader);
        implicit.insert(name.to_string(), module.clone());
        module
    }

    /// Resolve `full_name` against the module registered as `module_name`, loading it implicitly
    /// if it is not registered yet
    fn type_from_module(&self, full_name: &str, module_name: &str, depth: usize) -> Result<Type> {
        let module = self.load_implicit(module_name);
        self.type_in_module(&module, full_name, depth)
    }

    /// Resolve `full_name` against `module`: substitutes and placeholders for placeholder modules,
    /// the name index, then the module's forwarders
    pub(crate) fn type_in_module(
        &self,
        module: &Arc<Module>,
        full_name: &str,
        depth: usize,
    ) -> Result<Type> {
        if module.is_placeholder() {
            let request = FakeTypeRequest {
                type_name: full_name.to_string(),
                module_name: module.name().to_string(),
            };
            if let Some(substitute) = self.options.resolve_fake_type(&request) {
                return Ok(substitute);
            }

            return Ok(module.placeholder_type(full_name));
        }

        if let Some(found) = module.resolve_local_by_name(full_name) {
            return Ok(found);
        }

        if let Some(target) = module.resolve_forwarder(full_name) {
            if depth >= self.options.max_scope_depth {
                return Err(RecursionLimit(self.options.max_scope_depth));
            }

            log::trace!(
                "Following forwarder of '{}' from '{}' to '{}'",
                full_name,
                module.name(),
                target
            );
            return self.type_from_module(full_name, &target, depth + 1);
        }

        Err(TypeNotFound(format!("{}, {}", full_name, module.name())))
    }

    /// Resolve `TypeRef` row `rid` of `module`.
    ///
    /// Nested references are walked outwards to the first scope that is not a `TypeRef`, building
    /// `Namespace.Outer+Inner`. The walk is bounded by the configured scope depth.
    pub(crate) fn resolve_reference(&self, module: &Arc<Module>, rid: u32) -> Result<Type> {
        let reader = module.require_reader()?;
        let max_depth = self.options.max_scope_depth;

        let mut names = Vec::new();
        let mut current = rid;
        let scope = loop {
            let Some(row) = reader.row::<TypeRefRaw>(current) else {
                return Err(malformed_error!("TypeRef {} does not exist", current));
            };
            names.push((
                reader.string(row.type_namespace)?,
                reader.string(row.type_name)?,
            ));

            let scope = row.resolution_scope;
            if scope.tag != TableId::TypeRef || scope.is_null() {
                break scope;
            }
            if names.len() > max_depth {
                return Err(RecursionLimit(max_depth));
            }
            current = scope.row;
        };

        let full_name = nested_full_name(&names);

        match scope.tag {
            TableId::AssemblyRef if !scope.is_null() => {
                let Some(reference) = reader.row::<AssemblyRefRaw>(scope.row) else {
                    return Err(malformed_error!("AssemblyRef {} does not exist", scope.row));
                };
                self.type_from_module(&full_name, reader.string(reference.name)?, 0)
            }
            TableId::ModuleRef if !scope.is_null() => {
                if reader.row::<ModuleRefRaw>(scope.row).is_none() {
                    return Err(malformed_error!("ModuleRef {} does not exist", scope.row));
                }
                self.type_local_or_global(module, &full_name)
            }
            TableId::Module | TableId::ModuleRef | TableId::AssemblyRef | TableId::TypeRef => {
                self.type_local_or_global(module, &full_name)
            }
            tag => Err(malformed_error!(
                "TypeRef {} has resolution scope {:?}",
                rid,
                tag
            )),
        }
    }

    fn type_local_or_global(&self, module: &Arc<Module>, full_name: &str) -> Result<Type> {
        module
            .resolve_local_by_name(full_name)
            .or_else(|| self.find_type(full_name))
            .ok_or_else(|| TypeNotFound(full_name.to_string()))
    }

    /// Look `full_name` up in every registered module, in load order.
    ///
    /// A trailing `[]`, `[,]`, `&` or `*` is stripped for the lookup and applied to the result.
    pub(crate) fn find_type(&self, full_name: &str) -> Option<Type> {
        let (base, modifiers) = split_modifiers(full_name);

        let found = self
            .registered_modules()
            .iter()
            .find_map(|module| module.resolve_local_by_name(base))?;

        if modifiers == TypeModifiers::default() {
            Some(found)
        } else {
            Some(found.with_modifiers(modifiers))
        }
    }
}

/// `Namespace.Outer+Inner` from `(namespace, name)` pairs listed innermost first
fn nested_full_name(names: &[(&str, &str)]) -> String {
    let mut full_name = String::new();
    if let Some((namespace, _)) = names.last() {
        if !namespace.is_empty() {
            full_name.push_str(namespace);
            full_name.push('.');
        }
    }

    let path: Vec<&str> = names.iter().rev().map(|(_, name)| *name).collect();
    full_name.push_str(&path.join("+"));
    full_name
}

/// Split `Name[,]&*` into `Name` and the modifiers its suffixes describe
fn split_modifiers(full_name: &str) -> (&str, TypeModifiers) {
    let mut modifiers = TypeModifiers::default();
    let mut rest = full_name;

    if let Some(stripped) = rest.strip_suffix('*') {
        modifiers.is_pointer = true;
        rest = stripped;
    }
    if let Some(stripped) = rest.strip_suffix('&') {
        modifiers.is_reference = true;
        rest = stripped;
    }
    if let Some(inner) = rest.strip_suffix(']') {
        if let Some(open) = inner.rfind('[') {
            let commas = &inner[open + 1..];
            if commas.chars().all(|c| c == ',') {
                modifiers.array_rank = u32::try_from(commas.len() + 1).unwrap_or(1);
                rest = &inner[..open];
            }
        }
    }

    (rest, modifiers)
}

/// The entry point: a set of modules and the resolution of names across them.
///
/// # Examples
///
/// ```rust,no_run
/// use cilgraph::{LoadContext, LoadOptions};
///
/// let context = LoadContext::with_options(
///     LoadOptions::new().with_path_resolver(|name| Some(format!("refs/{name}.dll").into())),
/// );
/// let module = context.request_load_path(std::path::Path::new("Contoso.dll"))?;
/// context.finalize()?;
///
/// for ty in module.all_types() {
///     println!("{}", ty.pretty_full_name());
/// }
/// # Ok::<(), cilgraph::Error>(())
/// ```
pub struct LoadContext {
    state: Arc<ContextState>,
}

impl LoadContext {
    /// A context with default [`LoadOptions`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LoadOptions::default())
    }

    /// A context with `options`; the core library, if configured, is requested implicitly
    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        let core_library = options.core_library.clone();
        let state = ContextState::new(options);

        if let Some(core_library) = core_library {
            state.load_implicit(&core_library);
        }

        LoadContext { state }
    }

    /// The projection mode every reader of this context is created with
    #[must_use]
    pub fn projection(&self) -> ProjectionMode {
        self.state.options.projection
    }

    /// The options this context was created with
    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.state.options
    }

    /// `true` until [`LoadContext::finalize`] ran
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.loading.load(Ordering::Acquire)
    }

    /// Load the module at `path`.
    ///
    /// The module is registered under its own name; if a module of that name is already
    /// registered, that module is returned.
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyFinalized`] after finalize, [`crate::Error::FileError`] if
    /// the file can not be read and [`crate::Error::NotAnAssembly`] if it holds no metadata.
    pub fn request_load_path(&self, path: &Path) -> Result<Arc<Module>> {
        self.state.ensure_loading()?;

        let reader = MetadataReader::from_file(path, self.state.options.projection)?;
        let name = reader.name()?;
        Ok(self
            .state
            .register_explicit(name, Some(path.to_path_buf()), Some(reader)))
    }

    /// Load a module held in memory; see [`LoadContext::request_load_path`]
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyFinalized`] after finalize and
    /// [`crate::Error::NotAnAssembly`] if `data` holds no metadata.
    pub fn request_load_bytes(&self, data: Vec<u8>) -> Result<Arc<Module>> {
        self.state.ensure_loading()?;

        let reader = MetadataReader::from_mem(data, self.state.options.projection)?;
        let name = reader.name()?;
        Ok(self.state.register_explicit(name, None, Some(reader)))
    }

    /// Load a module by name through the path resolver.
    ///
    /// The module is registered under `name`. Without a resolver, or if it has no path for
    /// `name`, a placeholder module is registered.
    ///
    /// # Errors
    /// Returns [`crate::Error::AlreadyFinalized`] after finalize, and the read errors of
    /// [`LoadContext::request_load_path`] for a resolved path.
    pub fn request_load_name(&self, name: &str) -> Result<Arc<Module>> {
        self.state.ensure_loading()?;

        if let Some(existing) = read_lock!(self.state.explicit).get(name) {
            return Ok(existing.clone());
        }
        if let Some(existing) = self.state.registered(name) {
            if !existing.is_placeholder() {
                return Ok(self.state.register_explicit(name.to_string(), None, None));
            }
        }

        match self.state.options.resolve_path(name) {
            Some(path) => {
                let reader = MetadataReader::from_file(&path, self.state.options.projection)?;
                Ok(self
                    .state
                    .register_explicit(name.to_string(), Some(path), Some(reader)))
            }
            None => {
                log::debug!("Module '{}' can not be located, using a placeholder", name);
                Ok(self.state.register_explicit(name.to_string(), None, None))
            }
        }
    }

    /// Close the context to further requests and initialize every module.
    ///
    /// Initialization registers the referenced modules of each module; the scan runs until no
    /// new module shows up.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotYetLoading`] if the context was already finalized.
    pub fn finalize(&self) -> Result<()> {
        if self
            .state
            .loading
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(NotYetLoading);
        }

        let mut index = 0;
        while let Some(module) = self.state.modules.get(index) {
            module.initialize();
            index += 1;
        }

        log::debug!("Finalized load context with {} modules", index);
        Ok(())
    }

    /// Find a type by full name in any registered module.
    ///
    /// Nested types are named `Namespace.Outer+Inner`. A trailing `[]`, `&` or `*` is applied to
    /// the found type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if no module defines the name.
    pub fn resolve_type(&self, full_name: &str) -> Result<Type> {
        self.state
            .find_type(full_name)
            .ok_or_else(|| TypeNotFound(full_name.to_string()))
    }

    /// Find a type by full name in the module registered as `module_name`.
    ///
    /// For a placeholder module this yields a substitute or placeholder type; forwarders are
    /// followed.
    ///
    /// # Errors
    /// Returns [`crate::Error::AssemblyNotFound`] if no module of that name is registered and
    /// [`crate::Error::TypeNotFound`] if the module does not define the name.
    pub fn resolve_type_in(&self, full_name: &str, module_name: &str) -> Result<Type> {
        let Some(module) = self.state.registered(module_name) else {
            return Err(AssemblyNotFound(module_name.to_string()));
        };

        self.state.type_in_module(&module, full_name, 0)
    }

    /// Resolve a `TypeDef`, `TypeRef` or `TypeSpec` token of `module`
    ///
    /// # Errors
    /// Returns an error if the token does not name a type or its reference can not be resolved.
    pub fn resolve_by_handle(&self, module: &Arc<Module>, token: Token) -> Result<Type> {
        TypeProvider::new(module).type_from_token(token, &GenericContext::default())
    }

    /// The module registered as `name`
    #[must_use]
    pub fn module(&self, name: &str) -> Option<Arc<Module>> {
        self.state.registered(name)
    }

    /// Every registered module, in load order
    #[must_use]
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.state.registered_modules()
    }

    /// Modules requested explicitly, in load order
    #[must_use]
    pub fn explicit_modules(&self) -> Vec<Arc<Module>> {
        let explicit = read_lock!(self.state.explicit);
        self.state
            .modules
            .iter()
            .map(|(_, module)| module)
            .filter(|module| {
                explicit
                    .get(module.name())
                    .is_some_and(|registered| Arc::ptr_eq(registered, module))
            })
            .cloned()
            .collect()
    }

    /// Modules registered because another module references them, in load order
    #[must_use]
    pub fn implicit_modules(&self) -> Vec<Arc<Module>> {
        let implicit = read_lock!(self.state.implicit);
        self.state
            .modules
            .iter()
            .map(|(_, module)| module)
            .filter(|module| {
                implicit
                    .get(module.name())
                    .is_some_and(|registered| Arc::ptr_eq(registered, module))
            })
            .cloned()
            .collect()
    }
}

impl Default for LoadContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadContext")
            .field("loading", &self.is_loading())
            .field("modules", &self.modules())
            .field("options", &self.state.options)
            .finish()
    }
}
