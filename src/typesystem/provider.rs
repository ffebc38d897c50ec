//! The decoder callbacks that turn signature and attribute elements into [`Type`] nodes.
//!
//! One [`TypeProvider`] is created per decode and bound to the module the blob belongs to: tokens
//! in a blob are only meaningful relative to that module's tables.

use std::{cell::Cell, sync::Arc};

use crate::{
    loader::Module,
    metadata::{
        customattributes::CustomAttributeTypeProvider,
        signatures::{
            decode_type_specification, ArrayShape, MethodSignature, PrimitiveTypeCode,
            SignatureTypeProvider,
        },
        tables::TypeSpecRaw,
        token::Token,
    },
    typesystem::{primitive_type, GenericContext, Type},
    Error::{RecursionLimit, UnknownUnderlyingType},
    Result,
};

/// Full name of the required modifier that marks `const` in C++/CLI signatures
const IS_CONST_MODIFIER: &str = "System.Runtime.CompilerServices.IsConst";

/// `TypeSpec` rows may refer to other `TypeSpec` rows; a chain longer than this is malformed
const MAX_SPECIFICATION_DEPTH: usize = 32;

/// Builds [`Type`] nodes for the decoders on behalf of one module
pub(crate) struct TypeProvider<'m> {
    module: &'m Arc<Module>,
    specification_depth: Cell<usize>,
}

impl<'m> TypeProvider<'m> {
    pub(crate) fn new(module: &'m Arc<Module>) -> Self {
        TypeProvider {
            module,
            specification_depth: Cell::new(0),
        }
    }

    /// A `TypeDef`, `TypeRef` or `TypeSpec` token of the module, as found in `extends`,
    /// interface, constraint and event type columns
    pub(crate) fn type_from_token(&self, token: Token, context: &GenericContext) -> Result<Type> {
        match token.table() {
            0x02 => self.module.definition_type(token.row()),
            0x01 => self.module.resolve_type_reference(token.row()),
            0x1B => self.type_from_specification(context, token),
            table => Err(malformed_error!(
                "Token {} of table 0x{:02x} does not name a type",
                token,
                table
            )),
        }
    }
}

impl SignatureTypeProvider<GenericContext> for TypeProvider<'_> {
    type Type = Type;

    fn primitive_type(&self, code: PrimitiveTypeCode) -> Result<Type> {
        Ok(primitive_type(code))
    }

    fn type_from_definition(&self, token: Token) -> Result<Type> {
        self.module.definition_type(token.row())
    }

    fn type_from_reference(&self, token: Token) -> Result<Type> {
        self.module.resolve_type_reference(token.row())
    }

    fn type_from_specification(&self, context: &GenericContext, token: Token) -> Result<Type> {
        let reader = self.module.require_reader()?;
        let Some(specification) = reader.row::<TypeSpecRaw>(token.row()) else {
            return Err(malformed_error!("TypeSpec {} does not exist", token));
        };
        let blob = reader.blob(specification.signature)?;

        let depth = self.specification_depth.get();
        if depth >= MAX_SPECIFICATION_DEPTH {
            return Err(RecursionLimit(MAX_SPECIFICATION_DEPTH));
        }

        self.specification_depth.set(depth + 1);
        let decoded = decode_type_specification(blob, self, context);
        self.specification_depth.set(depth);

        decoded
    }

    fn sz_array_type(&self, element: Type) -> Result<Type> {
        // A parameter array keeps its rank on a fresh parameter node
        if let Some(parameter) = element.generic_parameter() {
            return Ok(Type::new_generic_parameter(parameter.clone(), 1));
        }

        Ok(element.with_array_rank(1))
    }

    fn array_type(&self, element: Type, shape: ArrayShape) -> Result<Type> {
        Ok(element.with_array_rank(shape.rank))
    }

    fn pointer_type(&self, element: Type) -> Result<Type> {
        Ok(element.make_pointer())
    }

    fn by_reference_type(&self, element: Type) -> Result<Type> {
        Ok(element.make_reference())
    }

    fn pinned_type(&self, element: Type) -> Result<Type> {
        Ok(element)
    }

    fn generic_instantiation(&self, generic: Type, arguments: Vec<Type>) -> Result<Type> {
        Ok(generic.with_generic_arguments(arguments))
    }

    fn generic_type_parameter(&self, context: &GenericContext, index: u32) -> Result<Option<Type>> {
        Ok(context.type_parameters.get(index as usize).cloned())
    }

    fn generic_method_parameter(
        &self,
        context: &GenericContext,
        index: u32,
    ) -> Result<Option<Type>> {
        Ok(context.method_parameters.get(index as usize).cloned())
    }

    fn function_pointer_type(&self, signature: MethodSignature<Type>) -> Result<Type> {
        Ok(Type::new_function_pointer(signature))
    }

    fn modified_type(&self, modifier: Type, unmodified: Type, _is_required: bool) -> Result<Type> {
        if modifier.full_name() == IS_CONST_MODIFIER {
            return Ok(unmodified.make_const());
        }

        Ok(unmodified)
    }
}

impl CustomAttributeTypeProvider for TypeProvider<'_> {
    type Type = Type;

    fn primitive_type(&self, code: PrimitiveTypeCode) -> Result<Type> {
        Ok(primitive_type(code))
    }

    fn type_from_definition(&self, token: Token) -> Result<Type> {
        self.module.definition_type(token.row())
    }

    fn type_from_reference(&self, token: Token) -> Result<Type> {
        self.module.resolve_type_reference(token.row())
    }

    fn sz_array_type(&self, element: Type) -> Result<Type> {
        Ok(element.with_array_rank(1))
    }

    fn system_type(&self) -> Result<Type> {
        let context = self.module.context()?;
        Ok(context
            .find_type("System.Type")
            .unwrap_or_else(|| Type::placeholder("System.Type", "")))
    }

    fn is_system_type(&self, ty: &Type) -> bool {
        ty.full_name() == "System.Type"
    }

    fn type_from_serialized_name(&self, name: &str) -> Result<Type> {
        // `Namespace.Type, Assembly, Version=..., Culture=..., PublicKeyToken=...`
        let (type_name, module_name) = match name.split_once(',') {
            Some((type_name, qualification)) => (
                type_name.trim(),
                qualification.split(',').next().unwrap_or_default().trim(),
            ),
            None => (name.trim(), ""),
        };

        let context = self.module.context()?;
        if let Some(found) = context.find_type(type_name) {
            return Ok(found);
        }

        log::debug!("Attribute names unknown type '{}'", name);
        Ok(Type::placeholder(type_name, module_name))
    }

    fn underlying_enum_type(&self, ty: &Type) -> Result<PrimitiveTypeCode> {
        if ty.is_placeholder() {
            return match ty.pretty_full_name().as_str() {
                "System.Runtime.InteropServices.CallingConvention" => Ok(PrimitiveTypeCode::Int32),
                "System.AttributeTargets" => Ok(PrimitiveTypeCode::UInt32),
                name => Err(UnknownUnderlyingType(name.to_string())),
            };
        }

        ty.underlying_enum_type()?
            .and_then(|underlying| underlying.primitive_code())
            .ok_or_else(|| UnknownUnderlyingType(ty.full_name()))
    }
}
