use crate::{
    metadata::{signatures::PrimitiveTypeCode, token::Token},
    Result,
};

/// Callbacks that give custom attribute arguments their types.
///
/// Attribute blobs name types in two ways: constructor parameters through `TypeDef`/`TypeRef`
/// tokens of the constructor signature, and enum or `System.Type` values through their
/// serialized (assembly-qualified or plain) name. Enum values are stored as their underlying
/// integer, so the provider has to know the underlying type of every enum it hands out.
pub trait CustomAttributeTypeProvider {
    /// The type produced for every argument
    type Type: Clone;

    /// A built-in type, including `System.String` and `System.Object`
    ///
    /// # Errors
    /// Returns an error if the primitive can not be represented.
    fn primitive_type(&self, code: PrimitiveTypeCode) -> Result<Self::Type>;

    /// A `TypeDef` row of the module that owns the attribute
    ///
    /// # Errors
    /// Returns an error if the row does not exist.
    fn type_from_definition(&self, token: Token) -> Result<Self::Type>;

    /// A `TypeRef` row of the module that owns the attribute
    ///
    /// # Errors
    /// Returns an error if the reference can not be resolved.
    fn type_from_reference(&self, token: Token) -> Result<Self::Type>;

    /// A single-dimensional array of `element`
    ///
    /// # Errors
    /// Returns an error if the array can not be formed.
    fn sz_array_type(&self, element: Self::Type) -> Result<Self::Type>;

    /// `System.Type`
    ///
    /// # Errors
    /// Returns an error if `System.Type` can not be found.
    fn system_type(&self) -> Result<Self::Type>;

    /// `true` if `ty` is `System.Type`
    fn is_system_type(&self, ty: &Self::Type) -> bool;

    /// Resolve a type from the name stored in a blob
    ///
    /// # Errors
    /// Returns an error if the name can not be resolved to any type.
    fn type_from_serialized_name(&self, name: &str) -> Result<Self::Type>;

    /// The integer type an enum is stored as
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownUnderlyingType`] if `ty` is not an enum or its storage
    /// type can not be determined.
    fn underlying_enum_type(&self, ty: &Self::Type) -> Result<PrimitiveTypeCode>;
}
