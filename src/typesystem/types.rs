//! The [`Type`] node and its naming and classification.
//!
//! A [`Type`] is a cheap handle (`Arc`) to an immutable node. The node is exactly one of five
//! kinds: a primitive, a `TypeDef` row, a generic parameter, a name-only placeholder or a function
//! pointer signature. Array, pointer, by-reference and `const` wrapping and a generic argument list
//! are layered on top of the kind. Every "modification" allocates a new node, so a handle handed
//! out once never changes.
//!
//! # Identity
//!
//! Definitions are cached per module, so decoding the same `TypeDef` twice returns the same node.
//! Everything a signature builds on top of a definition (`List<string>`, `int[]`, `T&`) is fresh on
//! every decode. [`PartialEq`] and [`Hash`] are therefore structural:
//!
//! - the kind identity: primitive code, `(module, row)` for definitions and generic parameters,
//!   `(namespace, name, module name)` for placeholders, the signature for function pointers
//! - the [`TypeModifiers`]
//! - the generic arguments, element-wise and recursive
//!
//! [`Type::type_parameter_name`] is an annotation and never takes part in equality.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use crate::{
    loader::Module,
    metadata::{
        signatures::{MethodSignature, PrimitiveTypeCode},
        tables::{GenericParamAttributes, TypeAttributes},
        token::Token,
    },
    Error::ContextDropped,
    Result,
};

/// Array, pointer, by-reference and `const` wrapping of a [`Type`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TypeModifiers {
    /// `0` for non-arrays, `1` for `T[]`, the shape rank for general arrays
    pub array_rank: u32,
    /// `T&`
    pub is_reference: bool,
    /// `T*`
    pub is_pointer: bool,
    /// Carries the `IsConst` required modifier
    pub is_const: bool,
}

/// A `TypeDef` row, with the names resolved when the node was created
#[derive(Clone)]
pub(crate) struct DefinitionType {
    pub(crate) module: Weak<Module>,
    pub(crate) rid: u32,
    pub(crate) flags: TypeAttributes,
    /// Namespace of the outermost enclosing type for nested types
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) enclosing: Option<u32>,
    /// `Outer+Middle+` for nested types, empty otherwise
    pub(crate) nesting: String,
}

/// A `GenericParam` row
#[derive(Clone)]
pub(crate) struct GenericParameterType {
    pub(crate) module: Weak<Module>,
    pub(crate) rid: u32,
    pub(crate) number: u32,
    pub(crate) flags: GenericParamAttributes,
    pub(crate) name: String,
    pub(crate) owner: Token,
}

/// A type known only by name
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct PlaceholderType {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) module_name: String,
}

#[derive(Clone)]
pub(crate) enum TypeKind {
    Primitive(PrimitiveTypeCode),
    Definition(DefinitionType),
    GenericParameter(GenericParameterType),
    Placeholder(PlaceholderType),
    FunctionPointer(Box<MethodSignature<Type>>),
}

impl TypeKind {
    fn identity_eq(&self, other: &TypeKind) -> bool {
        match (self, other) {
            (TypeKind::Primitive(left), TypeKind::Primitive(right)) => left == right,
            (TypeKind::Definition(left), TypeKind::Definition(right)) => {
                left.rid == right.rid && Weak::ptr_eq(&left.module, &right.module)
            }
            (TypeKind::GenericParameter(left), TypeKind::GenericParameter(right)) => {
                left.rid == right.rid && Weak::ptr_eq(&left.module, &right.module)
            }
            (TypeKind::Placeholder(left), TypeKind::Placeholder(right)) => left == right,
            (TypeKind::FunctionPointer(left), TypeKind::FunctionPointer(right)) => left == right,
            _ => false,
        }
    }

    fn identity_hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypeKind::Primitive(code) => code.hash(state),
            TypeKind::Definition(definition) => {
                definition.rid.hash(state);
                (definition.module.as_ptr() as usize).hash(state);
            }
            TypeKind::GenericParameter(parameter) => {
                parameter.rid.hash(state);
                (parameter.module.as_ptr() as usize).hash(state);
            }
            TypeKind::Placeholder(placeholder) => placeholder.hash(state),
            TypeKind::FunctionPointer(signature) => signature.hash(state),
        }
    }
}

pub(crate) struct TypeNode {
    pub(crate) kind: TypeKind,
    pub(crate) modifiers: TypeModifiers,
    pub(crate) generic_arguments: Option<Arc<[Type]>>,
    pub(crate) type_parameter_name: Option<String>,
}

/// A node of the type graph.
///
/// Cloning a `Type` clones the handle, not the node. Compare types with `==`, never by address:
/// only definitions have a stable node.
#[derive(Clone)]
pub struct Type(pub(crate) Arc<TypeNode>);

impl Type {
    fn from_node(
        kind: TypeKind,
        modifiers: TypeModifiers,
        generic_arguments: Option<Arc<[Type]>>,
        type_parameter_name: Option<String>,
    ) -> Type {
        Type(Arc::new(TypeNode {
            kind,
            modifiers,
            generic_arguments,
            type_parameter_name,
        }))
    }

    pub(crate) fn new_primitive(code: PrimitiveTypeCode) -> Type {
        Type::from_node(
            TypeKind::Primitive(code),
            TypeModifiers::default(),
            None,
            None,
        )
    }

    pub(crate) fn new_definition(definition: DefinitionType) -> Type {
        Type::from_node(
            TypeKind::Definition(definition),
            TypeModifiers::default(),
            None,
            None,
        )
    }

    pub(crate) fn new_generic_parameter(parameter: GenericParameterType, array_rank: u32) -> Type {
        Type::from_node(
            TypeKind::GenericParameter(parameter),
            TypeModifiers {
                array_rank,
                ..TypeModifiers::default()
            },
            None,
            None,
        )
    }

    pub(crate) fn new_function_pointer(signature: MethodSignature<Type>) -> Type {
        Type::from_node(
            TypeKind::FunctionPointer(Box::new(signature)),
            TypeModifiers::default(),
            None,
            None,
        )
    }

    /// A name-only type standing in for `full_name` of the module `module_name`.
    ///
    /// The name is split at its last `.` into namespace and name. Placeholders with the same name
    /// and module name are equal.
    #[must_use]
    pub fn placeholder(full_name: &str, module_name: &str) -> Type {
        let (namespace, name) = match full_name.rfind('.') {
            Some(split) => (&full_name[..split], &full_name[split + 1..]),
            None => ("", full_name),
        };

        Type::from_node(
            TypeKind::Placeholder(PlaceholderType {
                namespace: namespace.to_string(),
                name: name.to_string(),
                module_name: module_name.to_string(),
            }),
            TypeModifiers::default(),
            None,
            None,
        )
    }

    pub(crate) fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    pub(crate) fn definition(&self) -> Option<&DefinitionType> {
        match &self.0.kind {
            TypeKind::Definition(definition) => Some(definition),
            _ => None,
        }
    }

    pub(crate) fn generic_parameter(&self) -> Option<&GenericParameterType> {
        match &self.0.kind {
            TypeKind::GenericParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// `true` if both handles point at the same node
    #[must_use]
    pub fn ptr_eq(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A copy of this type with `modifiers` replacing the current ones
    #[must_use]
    pub fn with_modifiers(&self, modifiers: TypeModifiers) -> Type {
        Type::from_node(
            self.0.kind.clone(),
            modifiers,
            self.0.generic_arguments.clone(),
            None,
        )
    }

    /// A copy of this type as an array of `rank` dimensions
    #[must_use]
    pub fn with_array_rank(&self, rank: u32) -> Type {
        self.with_modifiers(TypeModifiers {
            array_rank: rank,
            ..self.0.modifiers
        })
    }

    /// A copy of this type as a by-reference type
    #[must_use]
    pub fn make_reference(&self) -> Type {
        self.with_modifiers(TypeModifiers {
            is_reference: true,
            ..self.0.modifiers
        })
    }

    /// A copy of this type as an unmanaged pointer
    #[must_use]
    pub fn make_pointer(&self) -> Type {
        self.with_modifiers(TypeModifiers {
            is_pointer: true,
            ..self.0.modifiers
        })
    }

    /// A copy of this type carrying the `IsConst` modifier
    #[must_use]
    pub fn make_const(&self) -> Type {
        self.with_modifiers(TypeModifiers {
            is_const: true,
            ..self.0.modifiers
        })
    }

    pub(crate) fn with_type_parameter_name(&self, name: String) -> Type {
        Type::from_node(
            self.0.kind.clone(),
            self.0.modifiers,
            self.0.generic_arguments.clone(),
            Some(name),
        )
    }

    /// A copy of this type closed (possibly partially) over `arguments`.
    ///
    /// For placeholders and primitives the arguments are kept as given. For definitions every
    /// argument is copied and annotated with the name of the type parameter it closes, so a member
    /// typed `T` can later be mapped to its argument.
    #[must_use]
    pub fn with_generic_arguments(&self, arguments: Vec<Type>) -> Type {
        let arguments: Arc<[Type]> = match &self.0.kind {
            TypeKind::Placeholder(_) | TypeKind::Primitive(_) => arguments.into(),
            _ => {
                let parameters = self.generic_type_parameters();
                arguments
                    .into_iter()
                    .enumerate()
                    .map(|(index, argument)| match parameters.get(index) {
                        Some(parameter) => argument.with_type_parameter_name(parameter.name()),
                        None => argument,
                    })
                    .collect()
            }
        };

        Type::from_node(
            self.0.kind.clone(),
            self.0.modifiers,
            Some(arguments),
            self.0.type_parameter_name.clone(),
        )
    }

    /// The module that defines this type; `None` for primitives, placeholders and function
    /// pointers, or if the module is gone
    #[must_use]
    pub fn module(&self) -> Option<Arc<Module>> {
        match &self.0.kind {
            TypeKind::Definition(definition) => definition.module.upgrade(),
            TypeKind::GenericParameter(parameter) => parameter.module.upgrade(),
            _ => None,
        }
    }

    pub(crate) fn require_module(&self) -> Result<Arc<Module>> {
        self.module().ok_or(ContextDropped)
    }

    /// The `TypeDef` or `GenericParam` token behind this type
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        match &self.0.kind {
            TypeKind::Definition(definition) => Some(Token::from_parts(0x02, definition.rid)),
            TypeKind::GenericParameter(parameter) => Some(Token::from_parts(0x2A, parameter.rid)),
            _ => None,
        }
    }

    /// The name of the module a placeholder stands in for
    #[must_use]
    pub fn placeholder_module_name(&self) -> Option<&str> {
        match &self.0.kind {
            TypeKind::Placeholder(placeholder) => Some(&placeholder.module_name),
            _ => None,
        }
    }

    /// The decoded signature of a function pointer type
    #[must_use]
    pub fn function_pointer_signature(&self) -> Option<&MethodSignature<Type>> {
        match &self.0.kind {
            TypeKind::FunctionPointer(signature) => Some(signature),
            _ => None,
        }
    }

    /// The built-in type code, for primitives
    #[must_use]
    pub fn primitive_code(&self) -> Option<PrimitiveTypeCode> {
        match &self.0.kind {
            TypeKind::Primitive(code) => Some(*code),
            _ => None,
        }
    }

    /// For a generic argument of a closed type: the name of the parameter it closes (`T`)
    #[must_use]
    pub fn type_parameter_name(&self) -> Option<&str> {
        self.0.type_parameter_name.as_deref()
    }

    /// Array, pointer, by-reference and `const` wrapping
    #[must_use]
    pub fn modifiers(&self) -> TypeModifiers {
        self.0.modifiers
    }

    /// `0` for non-arrays
    #[must_use]
    pub fn array_rank(&self) -> u32 {
        self.0.modifiers.array_rank
    }

    /// `T[]` or `T[,]`
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.0.modifiers.array_rank > 0
    }

    /// `T&`
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.0.modifiers.is_reference
    }

    /// `T*`
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.0.modifiers.is_pointer
    }

    /// Carries the `IsConst` required modifier
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.0.modifiers.is_const
    }

    /// A built-in type such as `System.Int32` or `System.String`
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.0.kind, TypeKind::Primitive(_))
    }

    /// A name-only stand-in for a type that could not be located
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.0.kind, TypeKind::Placeholder(_))
    }

    /// An open type or method parameter such as `T`
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.0.kind, TypeKind::GenericParameter(_))
    }

    /// A function pointer (`method int *(int)`)
    #[must_use]
    pub fn is_function_pointer(&self) -> bool {
        matches!(self.0.kind, TypeKind::FunctionPointer(_))
    }

    /// A type backed by a `TypeDef` row
    #[must_use]
    pub fn is_definition(&self) -> bool {
        matches!(self.0.kind, TypeKind::Definition(_))
    }

    /// The raw `TypeAttributes`; empty for anything but definitions
    #[must_use]
    pub fn attributes(&self) -> TypeAttributes {
        match &self.0.kind {
            TypeKind::Definition(definition) => definition.flags,
            _ => TypeAttributes::empty(),
        }
    }

    /// The raw name with array, reference and pointer suffixes, e.g. ``List`1[]``
    #[must_use]
    pub fn name(&self) -> String {
        self.build_name(false)
    }

    /// The name with generic arguments rendered, e.g. `List<System.String>[]`
    #[must_use]
    pub fn pretty_name(&self) -> String {
        self.build_name(true)
    }

    /// The namespace; `System` for primitives, `None` for generic parameters and function pointers
    #[must_use]
    pub fn namespace(&self) -> Option<String> {
        match &self.0.kind {
            TypeKind::Primitive(_) => Some("System".to_string()),
            TypeKind::Definition(definition) => Some(definition.namespace.clone()),
            TypeKind::Placeholder(placeholder) => Some(placeholder.namespace.clone()),
            TypeKind::GenericParameter(_) | TypeKind::FunctionPointer(_) => None,
        }
    }

    /// `Namespace.Name`, nested types as `Namespace.Outer+Inner`
    #[must_use]
    pub fn full_name(&self) -> String {
        self.build_full_name(false)
    }

    /// [`Type::full_name`] with generic arguments rendered
    #[must_use]
    pub fn pretty_full_name(&self) -> String {
        self.build_full_name(true)
    }

    fn build_full_name(&self, pretty: bool) -> String {
        let name = self.build_name(pretty);
        let nesting = self
            .definition()
            .map_or("", |definition| definition.nesting.as_str());

        match self.namespace() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}.{nesting}{name}"),
            _ => format!("{nesting}{name}"),
        }
    }

    fn build_name(&self, pretty: bool) -> String {
        let mut name = match &self.0.kind {
            TypeKind::Primitive(code) => code.name().to_string(),
            TypeKind::Definition(definition) => definition.name.clone(),
            TypeKind::GenericParameter(parameter) => parameter.name.clone(),
            TypeKind::Placeholder(placeholder) => placeholder.name.clone(),
            TypeKind::FunctionPointer(signature) => {
                let parameters: Vec<String> = signature
                    .parameter_types
                    .iter()
                    .map(|parameter| parameter.build_full_name(pretty))
                    .collect();
                format!(
                    "method {} *({})",
                    signature.return_type.build_full_name(pretty),
                    parameters.join(",")
                )
            }
        };

        if pretty {
            let arguments = self.generic_arguments();
            if !arguments.is_empty() {
                if let Some(tick) = name.rfind('`') {
                    name.truncate(tick);
                }

                let rendered: Vec<String> = arguments
                    .iter()
                    .map(|argument| argument.pretty_full_name())
                    .collect();
                name.push('<');
                name.push_str(&rendered.join(","));
                name.push('>');
            }
        }

        match self.0.modifiers.array_rank {
            0 => {}
            1 => name.push_str("[]"),
            rank => {
                name.push('[');
                for _ in 1..rank {
                    name.push(',');
                }
                name.push(']');
            }
        }
        if self.0.modifiers.is_reference {
            name.push('&');
        }
        if self.0.modifiers.is_pointer {
            name.push('*');
        }

        name
    }

    /// `true` if the raw name carries a generic arity marker (`` ` ``)
    #[must_use]
    pub fn has_generic_parameters(&self) -> bool {
        match &self.0.kind {
            TypeKind::Primitive(_) => false,
            TypeKind::Definition(definition) => definition.name.contains('`'),
            TypeKind::Placeholder(placeholder) => placeholder.name.contains('`'),
            TypeKind::GenericParameter(parameter) => parameter.name.contains('`'),
            TypeKind::FunctionPointer(_) => false,
        }
    }

    /// Arguments that (possibly partially) close this type.
    ///
    /// Without arguments, an open generic type returns its own parameters; anything else returns
    /// an empty list.
    #[must_use]
    pub fn generic_arguments(&self) -> Vec<Type> {
        if let Some(arguments) = &self.0.generic_arguments {
            return arguments.to_vec();
        }

        if self.has_generic_parameters() {
            return self.generic_type_parameters();
        }

        Vec::new()
    }

    /// `true` once generic arguments were attached
    #[must_use]
    pub fn is_closed_generic(&self) -> bool {
        self.0.generic_arguments.is_some()
    }

    fn visibility(&self) -> Option<u32> {
        self.definition()
            .map(|definition| definition.flags.visibility())
    }

    /// Public (or nested public); always `true` for primitives and placeholders
    #[must_use]
    pub fn is_public(&self) -> bool {
        match &self.0.kind {
            TypeKind::Primitive(_) | TypeKind::Placeholder(_) => true,
            _ => self.visibility() == Some(TypeAttributes::PUBLIC.bits()),
        }
    }

    /// Not public, nested assembly or nested family-and-assembly
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self.visibility(), Some(0 | 5 | 6))
    }

    /// Nested family, family-and-assembly or family-or-assembly
    #[must_use]
    pub fn is_family(&self) -> bool {
        matches!(self.visibility(), Some(4 | 6 | 7))
    }

    /// Nested `protected` or `protected internal`
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self.visibility(), Some(4 | 7))
    }

    /// Nested private
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.visibility() == Some(TypeAttributes::NESTED_PRIVATE.bits())
    }

    /// Nested public
    #[must_use]
    pub fn is_nested_public(&self) -> bool {
        self.visibility() == Some(TypeAttributes::NESTED_PUBLIC.bits())
    }

    /// Declared inside another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.definition()
            .is_some_and(|definition| definition.enclosing.is_some())
    }

    /// `abstract`; always `false` for primitives and placeholders
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.attributes().contains(TypeAttributes::ABSTRACT)
    }

    /// `sealed`; placeholders count as sealed, primitives unless `System.Object`
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        match &self.0.kind {
            TypeKind::Placeholder(_) => true,
            TypeKind::Primitive(code) => *code != PrimitiveTypeCode::Object,
            _ => self.attributes().contains(TypeAttributes::SEALED),
        }
    }

    /// `static class`, stored as `abstract sealed`
    #[must_use]
    pub fn is_static(&self) -> bool {
        let attributes = self.attributes();
        attributes.contains(TypeAttributes::ABSTRACT) && attributes.contains(TypeAttributes::SEALED)
    }

    /// An interface definition
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.attributes().contains(TypeAttributes::INTERFACE)
    }

    /// A class: not an interface, struct or enum.
    ///
    /// Placeholders are assumed to be classes; of the primitives only `System.Object` and
    /// `System.String` are.
    #[must_use]
    pub fn is_class(&self) -> bool {
        match &self.0.kind {
            TypeKind::Placeholder(_) => true,
            TypeKind::Primitive(code) => {
                matches!(code, PrimitiveTypeCode::Object | PrimitiveTypeCode::String)
            }
            TypeKind::GenericParameter(_) | TypeKind::FunctionPointer(_) => false,
            TypeKind::Definition(_) => !self.is_interface() && !self.is_enum() && !self.is_struct(),
        }
    }

    /// A value type: the base type is `System.ValueType`
    #[must_use]
    pub fn is_struct(&self) -> bool {
        self.is_definition() && self.base_type_is("ValueType")
    }

    /// An enum: the base type is `System.Enum`
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.is_definition() && self.base_type_is("Enum")
    }

    fn base_type_is(&self, name: &str) -> bool {
        match self.base_type() {
            Ok(Some(base)) => {
                base.namespace().as_deref() == Some("System") && base.name() == name
            }
            _ => false,
        }
    }

    /// Attributes of a generic parameter
    #[must_use]
    pub fn generic_parameter_attributes(&self) -> Option<GenericParamAttributes> {
        self.generic_parameter().map(|parameter| parameter.flags)
    }

    /// Zero-based position of a generic parameter in its owner's list
    #[must_use]
    pub fn generic_parameter_position(&self) -> Option<u32> {
        self.generic_parameter().map(|parameter| parameter.number)
    }

    /// `true` if a generic parameter belongs to a method rather than a type
    #[must_use]
    pub fn is_method_generic_parameter(&self) -> bool {
        self.generic_parameter()
            .is_some_and(|parameter| parameter.owner.table() == 0x06)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }

        let left = self.0.generic_arguments.as_deref().unwrap_or(&[]);
        let right = other.0.generic_arguments.as_deref().unwrap_or(&[]);

        self.0.modifiers == other.0.modifiers
            && self.0.kind.identity_eq(&other.0.kind)
            && left == right
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.kind.identity_hash(state);
        self.0.modifiers.hash(state);
        self.0
            .generic_arguments
            .as_deref()
            .unwrap_or(&[])
            .hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_full_name())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.pretty_full_name())
            .field("modifiers", &self.0.modifiers)
            .finish()
    }
}
