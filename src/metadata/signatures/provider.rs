use crate::{
    metadata::{
        signatures::{ArrayShape, MethodSignature, PrimitiveTypeCode},
        token::Token,
    },
    Result,
};

/// Callbacks that turn the elements of a signature blob into types.
///
/// The [`super::SignatureDecoder`] walks the blob and calls back into the provider for every
/// element, passing the already decoded inner types of constructed elements. The provider decides
/// what a type is; the decoder only knows the encoding.
///
/// `C` is the generic context: whatever the provider needs to resolve `!n` and `!!n` references.
/// It is passed through unchanged, including to [`SignatureTypeProvider::type_from_specification`]
/// so nested `TypeSpec` blobs are decoded against the same context.
pub trait SignatureTypeProvider<C: ?Sized> {
    /// The type produced for every element
    type Type;

    /// A built-in type named by a single element code
    ///
    /// # Errors
    /// Returns an error if the primitive can not be represented.
    fn primitive_type(&self, code: PrimitiveTypeCode) -> Result<Self::Type>;

    /// A `TypeDef` row of the current module
    ///
    /// # Errors
    /// Returns an error if the row does not exist.
    fn type_from_definition(&self, token: Token) -> Result<Self::Type>;

    /// A `TypeRef` row, to be resolved against its scope
    ///
    /// # Errors
    /// Returns an error if the reference can not be resolved.
    fn type_from_reference(&self, token: Token) -> Result<Self::Type>;

    /// A `TypeSpec` row, whose blob is itself a signature
    ///
    /// # Errors
    /// Returns an error if the nested signature can not be decoded.
    fn type_from_specification(&self, context: &C, token: Token) -> Result<Self::Type>;

    /// A single-dimensional, zero-based array
    ///
    /// # Errors
    /// Returns an error if the array can not be formed.
    fn sz_array_type(&self, element: Self::Type) -> Result<Self::Type>;

    /// A general array
    ///
    /// # Errors
    /// Returns an error if the array can not be formed.
    fn array_type(&self, element: Self::Type, shape: ArrayShape) -> Result<Self::Type>;

    /// An unmanaged pointer
    ///
    /// # Errors
    /// Returns an error if the pointer can not be formed.
    fn pointer_type(&self, element: Self::Type) -> Result<Self::Type>;

    /// A managed reference
    ///
    /// # Errors
    /// Returns an error if the reference can not be formed.
    fn by_reference_type(&self, element: Self::Type) -> Result<Self::Type>;

    /// A pinned local
    ///
    /// # Errors
    /// Returns an error if the type can not be pinned.
    fn pinned_type(&self, element: Self::Type) -> Result<Self::Type>;

    /// A generic type closed over `arguments`
    ///
    /// # Errors
    /// Returns an error if the instantiation can not be formed.
    fn generic_instantiation(
        &self,
        generic: Self::Type,
        arguments: Vec<Self::Type>,
    ) -> Result<Self::Type>;

    /// `!index`, a parameter of the enclosing generic type
    ///
    /// `None` when `context` has no parameter at `index`. The decoder drops such an argument
    /// from an enclosing instantiation.
    ///
    /// # Errors
    /// Returns an error if the parameter can not be represented.
    fn generic_type_parameter(&self, context: &C, index: u32) -> Result<Option<Self::Type>>;

    /// `!!index`, a parameter of the enclosing generic method
    ///
    /// `None` when `context` has no parameter at `index`.
    ///
    /// # Errors
    /// Returns an error if the parameter can not be represented.
    fn generic_method_parameter(&self, context: &C, index: u32) -> Result<Option<Self::Type>>;

    /// A function pointer with a fully decoded signature
    ///
    /// # Errors
    /// Returns an error if the function pointer can not be represented.
    fn function_pointer_type(&self, signature: MethodSignature<Self::Type>) -> Result<Self::Type>;

    /// `unmodified` carrying a `modreq` (`is_required`) or `modopt` custom modifier
    ///
    /// # Errors
    /// Returns an error if the modified type can not be formed.
    fn modified_type(
        &self,
        modifier: Self::Type,
        unmodified: Self::Type,
        is_required: bool,
    ) -> Result<Self::Type>;
}
