//! One registered module and its caches.
//!
//! A [`Module`] either wraps a [`MetadataReader`] or is a placeholder for a module that could not
//! be located. It hands out exactly one [`Type`] node per `TypeDef` row, indexes its types by full
//! name and resolves its own `TypeRef` rows through the owning load context.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock, RwLock, Weak},
};

use dashmap::DashMap;

use crate::{
    loader::{context::ContextState, options::DEFAULT_MAX_SCOPE_DEPTH},
    metadata::{
        reader::MetadataReader,
        tables::{
            AssemblyRefRaw, GenericParamAttributes, GenericParamRaw, NestedClassRaw, TableId,
            TypeAttributes, TypeDefRaw, EXPORTED_TYPE_FORWARDER,
        },
        token::Token,
    },
    typesystem::{CustomAttribute, DefinitionType, GenericContext, GenericParameterType, Type},
    Error::{AssemblyNotFound, ContextDropped, RecursionLimit},
    Result,
};

/// Name of the pseudo-type that holds global fields and methods
const MODULE_TYPE_NAME: &str = "<Module>";

/// A module registered in a [`crate::LoadContext`].
///
/// Modules are shared as `Arc<Module>`. Type nodes keep a weak reference to their module, and the
/// module keeps a weak reference to its context: dropping the [`crate::LoadContext`] invalidates
/// every type handed out by it.
pub struct Module {
    this: Weak<Module>,
    context: Weak<ContextState>,
    name: String,
    location: Option<PathBuf>,
    reader: Option<MetadataReader>,
    /// `TypeDef` rid → its node, the single source of definition identity
    definitions: RwLock<HashMap<u32, Type>>,
    /// Names requested from a placeholder module
    placeholders: DashMap<String, Type>,
    /// Full name → `TypeDef` rid
    name_index: OnceLock<HashMap<String, u32>>,
    /// Nested `TypeDef` rid → enclosing rid
    enclosing: OnceLock<HashMap<u32, u32>>,
}

impl Module {
    pub(crate) fn new(
        context: Weak<ContextState>,
        name: String,
        location: Option<PathBuf>,
        reader: Option<MetadataReader>,
    ) -> Arc<Module> {
        Arc::new_cyclic(|this| Module {
            this: this.clone(),
            context,
            name,
            location,
            reader,
            definitions: RwLock::new(HashMap::new()),
            placeholders: DashMap::new(),
            name_index: OnceLock::new(),
            enclosing: OnceLock::new(),
        })
    }

    /// The name the module is registered under
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the module was read from; `None` for in-memory and placeholder modules
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// The module version id
    #[must_use]
    pub fn mvid(&self) -> Option<uguid::Guid> {
        self.reader.as_ref().and_then(MetadataReader::mvid)
    }

    /// `true` for a stand-in of a module that could not be located
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.reader.is_none()
    }

    /// The parsed metadata; `None` for placeholders
    #[must_use]
    pub fn reader(&self) -> Option<&MetadataReader> {
        self.reader.as_ref()
    }

    pub(crate) fn require_reader(&self) -> Result<&MetadataReader> {
        self.reader
            .as_ref()
            .ok_or_else(|| AssemblyNotFound(self.name.clone()))
    }

    pub(crate) fn context(&self) -> Result<Arc<ContextState>> {
        self.context.upgrade().ok_or(ContextDropped)
    }

    fn this(&self) -> Result<Arc<Module>> {
        self.this.upgrade().ok_or(ContextDropped)
    }

    fn max_depth(&self) -> usize {
        self.context
            .upgrade()
            .map_or(DEFAULT_MAX_SCOPE_DEPTH, |context| context.options.max_scope_depth)
    }

    /// Pull in every referenced module, then build the name index.
    ///
    /// Placeholders have nothing to initialize.
    pub(crate) fn initialize(&self) {
        let Some(reader) = &self.reader else {
            return;
        };

        match self.context() {
            Ok(context) => {
                for reference in reader.assembly_refs() {
                    match reader.string(reference.name) {
                        Ok(name) => {
                            context.load_implicit(name);
                        }
                        Err(error) => {
                            log::warn!("Skipping reference of '{}' - {}", self.name, error);
                        }
                    }
                }
            }
            Err(error) => log::warn!("Can not initialize '{}' - {}", self.name, error),
        }

        let _ = self.name_index();
    }

    /// Modules this one references that are registered in the context, in reference order
    #[must_use]
    pub fn referenced_modules(&self) -> Vec<Arc<Module>> {
        let (Some(reader), Ok(context)) = (&self.reader, self.context()) else {
            return Vec::new();
        };

        reader
            .assembly_refs()
            .iter()
            .filter_map(|reference| reader.string(reference.name).ok())
            .filter_map(|name| context.registered(name))
            .collect()
    }

    /// Every type defined in the module, in `TypeDef` table order.
    ///
    /// The `<Module>` pseudo-type is not listed. Empty for placeholders.
    #[must_use]
    pub fn all_types(&self) -> Vec<Type> {
        let Some(reader) = &self.reader else {
            return Vec::new();
        };

        (1..=reader.row_count(TableId::TypeDef))
            .filter_map(|rid| match self.definition_type(rid) {
                Ok(definition) => Some(definition),
                Err(error) => {
                    log::warn!("Skipping type {} of '{}' - {}", rid, self.name, error);
                    None
                }
            })
            .filter(|definition| definition.full_name() != MODULE_TYPE_NAME)
            .collect()
    }

    fn name_index(&self) -> &HashMap<String, u32> {
        self.name_index.get_or_init(|| {
            let mut index = HashMap::new();
            let Some(reader) = &self.reader else {
                return index;
            };

            for rid in 1..=reader.row_count(TableId::TypeDef) {
                match self.definition_type(rid) {
                    Ok(definition) => {
                        index.entry(definition.full_name()).or_insert(rid);
                    }
                    Err(error) => {
                        log::warn!("Not indexing type {} of '{}' - {}", rid, self.name, error);
                    }
                }
            }

            index
        })
    }

    /// Look up a type of this module by full name (`Namespace.Outer+Inner`).
    ///
    /// Only the name index is consulted: no reference is resolved and no other module is touched.
    #[must_use]
    pub fn resolve_local_by_name(&self, full_name: &str) -> Option<Type> {
        let rid = *self.name_index().get(full_name)?;
        self.definition_type(rid).ok()
    }

    /// The module a type forwarder of this module sends `full_name` to
    #[must_use]
    pub fn resolve_forwarder(&self, full_name: &str) -> Option<String> {
        let reader = self.reader.as_ref()?;

        reader
            .exported_types()
            .into_iter()
            .filter(|exported| exported.flags & EXPORTED_TYPE_FORWARDER != 0)
            .filter(|exported| exported.implementation.tag == TableId::AssemblyRef)
            .find(|exported| {
                let name = reader.string(exported.type_name).unwrap_or_default();
                match reader.string(exported.type_namespace).unwrap_or_default() {
                    "" => name == full_name,
                    namespace => format!("{namespace}.{name}") == full_name,
                }
            })
            .and_then(|exported| reader.row::<AssemblyRefRaw>(exported.implementation.row))
            .and_then(|reference| reader.string(reference.name).ok().map(str::to_string))
    }

    /// Assembly-level custom attributes; empty for modules without an `Assembly` row
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        let (Some(reader), Ok(this)) = (&self.reader, self.this()) else {
            return Vec::new();
        };
        if !reader.is_assembly() {
            return Vec::new();
        }

        CustomAttribute::list(&this, Token::from_parts(0x20, 1))
    }

    /// The node of `TypeDef` row `rid`, created on first use
    pub(crate) fn definition_type(&self, rid: u32) -> Result<Type> {
        if let Some(existing) = read_lock!(self.definitions).get(&rid) {
            return Ok(existing.clone());
        }

        let mut definitions = write_lock!(self.definitions);
        if let Some(existing) = definitions.get(&rid) {
            return Ok(existing.clone());
        }

        let definition = Type::new_definition(self.build_definition(rid)?);
        definitions.insert(rid, definition.clone());
        Ok(definition)
    }

    fn build_definition(&self, rid: u32) -> Result<DefinitionType> {
        let reader = self.require_reader()?;
        let Some(row) = reader.row::<TypeDefRaw>(rid) else {
            return Err(malformed_error!("TypeDef {} does not exist", rid));
        };

        let enclosing_map = self.enclosing.get_or_init(|| {
            reader
                .rows::<NestedClassRaw>()
                .into_iter()
                .map(|nested| (nested.nested_class, nested.enclosing_class))
                .collect()
        });

        let enclosing = enclosing_map.get(&rid).copied().filter(|outer| *outer != 0);
        let mut namespace = reader.string(row.type_namespace)?.to_string();
        let mut nesting = String::new();

        let max_depth = self.max_depth();
        let mut outer = enclosing;
        let mut depth = 0;
        while let Some(outer_rid) = outer {
            depth += 1;
            if depth > max_depth {
                return Err(RecursionLimit(max_depth));
            }

            let Some(outer_row) = reader.row::<TypeDefRaw>(outer_rid) else {
                return Err(malformed_error!(
                    "Enclosing TypeDef {} of {} does not exist",
                    outer_rid,
                    rid
                ));
            };

            nesting.insert(0, '+');
            nesting.insert_str(0, reader.string(outer_row.type_name)?);
            namespace = reader.string(outer_row.type_namespace)?.to_string();
            outer = enclosing_map.get(&outer_rid).copied().filter(|next| *next != 0);
        }

        Ok(DefinitionType {
            module: self.this.clone(),
            rid,
            flags: TypeAttributes::from_bits_retain(row.flags),
            namespace,
            name: reader.string(row.type_name)?.to_string(),
            enclosing,
            nesting,
        })
    }

    /// A fresh node for a `GenericParam` row, carrying `array_rank`
    pub(crate) fn generic_parameter_type(
        &self,
        row: &GenericParamRaw,
        array_rank: u32,
    ) -> Result<Type> {
        let reader = self.require_reader()?;

        Ok(Type::new_generic_parameter(
            GenericParameterType {
                module: self.this.clone(),
                rid: row.rid,
                number: row.number,
                flags: GenericParamAttributes::from_bits_retain(row.flags),
                name: reader.string(row.name)?.to_string(),
                owner: row.owner.token,
            },
            array_rank,
        ))
    }

    /// The generic parameters declared by method `method_rid`, in order
    pub(crate) fn method_generic_parameters(&self, method_rid: u32) -> Vec<Type> {
        let Ok(reader) = self.require_reader() else {
            return Vec::new();
        };

        reader
            .generic_params(Token::from_parts(0x06, method_rid))
            .iter()
            .filter_map(|row| self.generic_parameter_type(row, 0).ok())
            .collect()
    }

    /// Parameters in scope inside method `method_rid`: its declaring type's, then its own
    pub(crate) fn method_generic_context(&self, method_rid: u32) -> GenericContext {
        let type_parameters = self
            .reader
            .as_ref()
            .and_then(|reader| reader.method_declaring_type(method_rid))
            .and_then(|type_rid| self.definition_type(type_rid).ok())
            .map(|declaring| declaring.generic_type_parameters())
            .unwrap_or_default();

        GenericContext::new(type_parameters, self.method_generic_parameters(method_rid))
    }

    /// Resolve `TypeRef` row `rid` through the load context
    pub(crate) fn resolve_type_reference(&self, rid: u32) -> Result<Type> {
        self.context()?.resolve_reference(&self.this()?, rid)
    }

    /// The placeholder for `full_name` in this module, synthesized once per name
    pub(crate) fn placeholder_type(&self, full_name: &str) -> Type {
        self.placeholders
            .entry(full_name.to_string())
            .or_insert_with(|| {
                log::debug!(
                    "Synthesizing placeholder type '{}' of module '{}'",
                    full_name,
                    self.name
                );
                Type::placeholder(full_name, &self.name)
            })
            .value()
            .clone()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("placeholder", &self.is_placeholder())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::reader::ProjectionMode,
        test::builder::{field_attr, type_attr, ImageBuilder, Sig},
    };

    fn module(image: Vec<u8>) -> Arc<Module> {
        let reader = MetadataReader::from_mem(image, ProjectionMode::None).unwrap();
        let name = reader.name().unwrap();
        Module::new(Weak::new(), name, None, Some(reader))
    }

    #[test]
    fn definitions_are_cached() {
        let mut builder = ImageBuilder::new("Cache");
        builder.type_def(type_attr::PUBLIC, "Ns", "Thing", None);
        let module = module(builder.build());

        let first = module.definition_type(2).unwrap();
        let second = module.definition_type(2).unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(first.full_name(), "Ns.Thing");
        assert!(module.definition_type(9).is_err());
    }

    #[test]
    fn nested_names() {
        let mut builder = ImageBuilder::new("Nesting");
        let outer = builder.type_def(type_attr::PUBLIC, "Ns", "Outer", None);
        let inner = builder.type_def(type_attr::NESTED_PUBLIC, "", "Inner", None);
        let innermost = builder.type_def(type_attr::NESTED_PRIVATE, "", "Innermost", None);
        builder.nested(inner, outer);
        builder.nested(innermost, inner);
        let module = module(builder.build());

        let types = module.all_types();
        let names: Vec<String> = types.iter().map(Type::full_name).collect();
        assert_eq!(
            names,
            ["Ns.Outer", "Ns.Outer+Inner", "Ns.Outer+Inner+Innermost"]
        );

        let inner = module.resolve_local_by_name("Ns.Outer+Inner").unwrap();
        assert_eq!(inner.name(), "Inner");
        assert_eq!(inner.namespace().as_deref(), Some("Ns"));
        assert!(inner.is_nested());
        assert!(module.resolve_local_by_name("Inner").is_none());
    }

    #[test]
    fn forwarders() {
        let mut builder = ImageBuilder::new("Facade");
        let target = builder.assembly_ref("Impl");
        builder.exported_type(EXPORTED_TYPE_FORWARDER, "Ns", "Moved", target);
        builder.exported_type(0, "Ns", "Exported", target);
        let module = module(builder.build());

        assert_eq!(module.resolve_forwarder("Ns.Moved").as_deref(), Some("Impl"));
        assert!(module.resolve_forwarder("Ns.Exported").is_none());
        assert!(module.resolve_forwarder("Ns.Missing").is_none());
        assert!(module.resolve_forwarder("NsXMoved").is_none());
    }

    #[test]
    fn placeholder_module() {
        let module = Module::new(Weak::new(), "Missing".to_string(), None, None);

        assert!(module.is_placeholder());
        assert!(module.all_types().is_empty());
        assert!(module.resolve_local_by_name("Any.Thing").is_none());
        assert!(matches!(
            module.require_reader(),
            Err(AssemblyNotFound(name)) if name == "Missing"
        ));

        let first = module.placeholder_type("Any.Thing");
        let second = module.placeholder_type("Any.Thing");
        assert!(first.ptr_eq(&second));
        assert_eq!(first.placeholder_module_name(), Some("Missing"));
    }

    #[test]
    fn generic_parameters() {
        let mut builder = ImageBuilder::new("Generics");
        let owner = builder.type_def(type_attr::PUBLIC, "Ns", "Box`1", None);
        builder.field(field_attr::PUBLIC, "Value", &Sig::field().var(0).build());
        builder.generic_param(0, 0, owner, "T");
        let module = module(builder.build());

        let boxed = module.resolve_local_by_name("Ns.Box`1").unwrap();
        let parameters = boxed.generic_type_parameters();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name(), "T");
        assert!(parameters[0].is_generic_parameter());
        assert_eq!(parameters[0].generic_parameter_position(), Some(0));
        assert_eq!(parameters[0], boxed.generic_type_parameters()[0]);
        assert!(!parameters[0].ptr_eq(&boxed.generic_type_parameters()[0]));
    }
}
