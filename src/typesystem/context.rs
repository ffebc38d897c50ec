use crate::typesystem::Type;

/// The generic parameters in scope while decoding a signature.
///
/// `!n` in a signature selects `type_parameters[n]`, `!!n` selects `method_parameters[n]`. A
/// context is built per member: the declaring type's parameters first, then the method's own.
#[derive(Debug, Clone, Default)]
pub struct GenericContext {
    /// Parameters of the declaring type, in declaration order
    pub type_parameters: Vec<Type>,
    /// Parameters of the method, in declaration order
    pub method_parameters: Vec<Type>,
}

impl GenericContext {
    /// A context with both parameter lists
    #[must_use]
    pub fn new(type_parameters: Vec<Type>, method_parameters: Vec<Type>) -> Self {
        GenericContext {
            type_parameters,
            method_parameters,
        }
    }

    /// A context with the parameters of `declaring_type` only
    #[must_use]
    pub fn for_type(declaring_type: &Type) -> Self {
        GenericContext {
            type_parameters: declaring_type.generic_type_parameters(),
            method_parameters: Vec::new(),
        }
    }
}
