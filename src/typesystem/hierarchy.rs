//! Navigation from a [`Type`] to the types its definition mentions: base type, interfaces,
//! nesting, generic parameters and constraints.

use crate::{
    metadata::tables::{GenericParamAttributes, TypeDefRaw},
    typesystem::{provider::TypeProvider, GenericContext, Type, TypeKind},
    Error::UnknownUnderlyingType,
    Result,
};

impl Type {
    fn type_def_row(&self) -> Result<Option<TypeDefRaw>> {
        let Some(definition) = self.definition() else {
            return Ok(None);
        };

        let module = self.require_module()?;
        let reader = module.require_reader()?;
        match reader.row::<TypeDefRaw>(definition.rid) {
            Some(row) => Ok(Some(row)),
            None => Err(malformed_error!(
                "TypeDef row {} does not exist",
                definition.rid
            )),
        }
    }

    /// The type this definition extends.
    ///
    /// `None` for primitives, placeholders, generic parameters, interfaces and `System.Object`.
    ///
    /// # Errors
    /// Returns an error if the base type reference can not be resolved.
    pub fn base_type(&self) -> Result<Option<Type>> {
        let Some(row) = self.type_def_row()? else {
            return Ok(None);
        };
        if row.extends.is_null() {
            return Ok(None);
        }

        let module = self.require_module()?;
        let provider = TypeProvider::new(&module);
        provider
            .type_from_token(row.extends.token, &GenericContext::for_type(self))
            .map(Some)
    }

    /// Interfaces listed by this definition, in table order.
    ///
    /// Interfaces that can not be resolved are skipped.
    #[must_use]
    pub fn interfaces(&self) -> Vec<Type> {
        let Some(definition) = self.definition() else {
            return Vec::new();
        };
        let Some(module) = self.module() else {
            return Vec::new();
        };
        let Ok(reader) = module.require_reader() else {
            return Vec::new();
        };

        let provider = TypeProvider::new(&module);
        let context = GenericContext::for_type(self);

        reader
            .interface_impls(definition.rid)
            .into_iter()
            .filter_map(
                |row| match provider.type_from_token(row.interface.token, &context) {
                    Ok(interface) => Some(interface),
                    Err(error) => {
                        log::warn!("Skipping interface of '{}' - {}", self.full_name(), error);
                        None
                    }
                },
            )
            .collect()
    }

    /// Types declared directly inside this one
    #[must_use]
    pub fn nested_types(&self) -> Vec<Type> {
        let Some(definition) = self.definition() else {
            return Vec::new();
        };
        let Some(module) = self.module() else {
            return Vec::new();
        };
        let Ok(reader) = module.require_reader() else {
            return Vec::new();
        };

        reader
            .nested_types(definition.rid)
            .into_iter()
            .filter_map(|rid| module.definition_type(rid).ok())
            .collect()
    }

    /// The type this one is nested in
    #[must_use]
    pub fn enclosing_type(&self) -> Option<Type> {
        let definition = self.definition()?;
        let enclosing = definition.enclosing?;
        self.module()?.definition_type(enclosing).ok()
    }

    /// The declared type parameters (`T` in `List<T>`).
    ///
    /// Placeholders and primitives do not know their parameters; they report one placeholder per
    /// attached argument, named after that argument.
    #[must_use]
    pub fn generic_type_parameters(&self) -> Vec<Type> {
        match self.kind() {
            TypeKind::Placeholder(placeholder) => self
                .0
                .generic_arguments
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(|argument| Type::placeholder(&argument.full_name(), &placeholder.module_name))
                .collect(),
            TypeKind::Primitive(_) => self
                .0
                .generic_arguments
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(|argument| Type::placeholder(&argument.full_name(), ""))
                .collect(),
            TypeKind::Definition(definition) => {
                let Some(module) = definition.module.upgrade() else {
                    return Vec::new();
                };
                let Ok(reader) = module.require_reader() else {
                    return Vec::new();
                };

                reader
                    .generic_params(self.token().unwrap_or_default())
                    .iter()
                    .filter_map(|row| module.generic_parameter_type(row, 0).ok())
                    .collect()
            }
            TypeKind::GenericParameter(_) | TypeKind::FunctionPointer(_) => Vec::new(),
        }
    }

    /// For a generic parameter: its attributes and its constraint types.
    ///
    /// `None` if this is not a generic parameter. Constraints that can not be resolved are skipped.
    #[must_use]
    pub fn generic_parameter_attributes_and_constraints(
        &self,
    ) -> Option<(GenericParamAttributes, Vec<Type>)> {
        let parameter = self.generic_parameter()?;
        let module = parameter.module.upgrade()?;
        let reader = module.require_reader().ok()?;

        let context = match parameter.owner.table() {
            0x06 => module.method_generic_context(parameter.owner.row()),
            _ => module
                .definition_type(parameter.owner.row())
                .map(|owner| GenericContext::for_type(&owner))
                .unwrap_or_default(),
        };

        let provider = TypeProvider::new(&module);
        let constraints = reader
            .generic_param_constraints(parameter.rid)
            .into_iter()
            .filter_map(
                |row| match provider.type_from_token(row.constraint.token, &context) {
                    Ok(constraint) => Some(constraint),
                    Err(error) => {
                        log::warn!("Skipping constraint of '{}' - {}", parameter.name, error);
                        None
                    }
                },
            )
            .collect();

        Some((parameter.flags, constraints))
    }

    /// The integer type an enum stores its values as: the type of its `value__` field.
    ///
    /// `Ok(None)` if this is not an enum.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownUnderlyingType`] if the enum has no storage field, or the
    /// decode error of the field signature.
    pub fn underlying_enum_type(&self) -> Result<Option<Type>> {
        if !self.is_enum() {
            return Ok(None);
        }

        match self.enum_storage_field() {
            Some(field) => field.field_type().map(Some),
            None => Err(UnknownUnderlyingType(self.full_name())),
        }
    }
}
