use std::{fmt, sync::Arc};

use crate::{
    metadata::{
        signatures::{decode_field_signature, ELEMENT_TYPE},
        tables::{FieldAttributes, FieldRaw},
        token::Token,
    },
    typesystem::{
        members::{is_publicish, ConstantValue, CustomAttribute},
        provider::TypeProvider,
        GenericContext, Type,
    },
    Error::{MemberConstructionFailed, UnsupportedConstant},
    Result,
};

/// Access flags of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldModifiers {
    /// `public`
    pub is_public: bool,
    /// `private`
    pub is_private: bool,
    /// `internal`
    pub is_internal: bool,
    /// `protected`, `private protected` or `protected internal`
    pub is_protected: bool,
    /// `static`
    pub is_static: bool,
    /// `const`: a static literal
    pub is_const: bool,
}

impl From<FieldAttributes> for FieldModifiers {
    fn from(attributes: FieldAttributes) -> Self {
        let access = attributes.access();
        let is_static = attributes.contains(FieldAttributes::STATIC);

        FieldModifiers {
            is_public: access == FieldAttributes::PUBLIC.bits(),
            is_private: access == FieldAttributes::PRIVATE.bits(),
            is_internal: access == FieldAttributes::ASSEMBLY.bits(),
            is_protected: is_protected_access(access),
            is_static,
            is_const: is_static && attributes.contains(FieldAttributes::LITERAL),
        }
    }
}

fn is_protected_access(access: u32) -> bool {
    access == FieldAttributes::FAMILY.bits()
        || access == FieldAttributes::FAM_AND_ASSEM.bits()
        || access == FieldAttributes::FAM_OR_ASSEM.bits()
}

struct FieldData {
    declaring_type: Type,
    rid: u32,
    flags: FieldAttributes,
    name: String,
    signature: u32,
}

/// A `Field` row of a declaring type.
///
/// The field type is decoded when asked for, not when the field is listed.
#[derive(Clone)]
pub struct Field(Arc<FieldData>);

impl Field {
    /// Build the field `rid` of `declaring_type`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberConstructionFailed`] if the row does not exist or its name
    /// can not be read.
    pub fn new(declaring_type: &Type, rid: u32) -> Result<Field> {
        let module = declaring_type.require_module()?;
        let reader = module.require_reader()?;

        let Some(row) = reader.row::<FieldRaw>(rid) else {
            return Err(MemberConstructionFailed(format!(
                "Field row {rid} does not exist"
            )));
        };
        let name = reader
            .string(row.name)
            .map_err(|error| MemberConstructionFailed(format!("Field {rid} - {error}")))?
            .to_string();

        Ok(Field(Arc::new(FieldData {
            declaring_type: declaring_type.clone(),
            rid,
            flags: FieldAttributes::from_bits_retain(row.flags),
            name,
            signature: row.signature,
        })))
    }

    /// Build the field `rid` of `declaring_type` if it passes the filter
    #[must_use]
    pub fn try_get(declaring_type: &Type, rid: u32, publicish_only: bool) -> Option<Field> {
        if rid == 0 {
            return None;
        }

        let field = match Field::new(declaring_type, rid) {
            Ok(field) => field,
            Err(error) => {
                log::debug!("Skipping field {} - {}", rid, error);
                return None;
            }
        };

        if publicish_only {
            let access = field.0.flags.access();
            if !is_publicish(
                access == FieldAttributes::PUBLIC.bits(),
                is_protected_access(access),
                declaring_type,
            ) {
                return None;
            }
        }

        Some(field)
    }

    /// The field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type this field was listed on
    #[must_use]
    pub fn declaring_type(&self) -> &Type {
        &self.0.declaring_type
    }

    /// The `Field` token
    #[must_use]
    pub fn token(&self) -> Token {
        Token::from_parts(0x04, self.0.rid)
    }

    /// The raw `FieldAttributes`
    #[must_use]
    pub fn attributes(&self) -> FieldAttributes {
        self.0.flags
    }

    /// Compiler-reserved fields such as the storage field of an enum
    #[must_use]
    pub fn is_special_name(&self) -> bool {
        self.0.flags.contains(FieldAttributes::SPECIAL_NAME)
            || self.0.flags.contains(FieldAttributes::RT_SPECIAL_NAME)
    }

    /// Access flags
    #[must_use]
    pub fn modifiers(&self) -> FieldModifiers {
        FieldModifiers::from(self.0.flags)
    }

    /// Decode the field signature in the context of the declaring type
    ///
    /// # Errors
    /// Returns the decode error of the signature.
    pub fn field_type(&self) -> Result<Type> {
        let module = self.0.declaring_type.require_module()?;
        let reader = module.require_reader()?;

        let provider = TypeProvider::new(&module);
        decode_field_signature(
            reader.blob(self.0.signature)?,
            &provider,
            &GenericContext::for_type(&self.0.declaring_type),
        )
    }

    fn read_constant(&self) -> Result<Option<(u8, ConstantValue)>> {
        let module = self.0.declaring_type.require_module()?;
        let reader = module.require_reader()?;

        let Some(constant) = reader.constant(self.token()) else {
            return Ok(None);
        };

        let value = ConstantValue::parse(constant.base, reader.blob(constant.value)?)?;
        Ok(Some((constant.base, value)))
    }

    /// The integer value of a literal field, as enum members are stored.
    ///
    /// `Ok(None)` if the field has no constant.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedConstant`] if the constant is not an `Int16`, `Int32`,
    /// `UInt16`, `UInt32` or `Byte`.
    pub fn constant_value(&self) -> Result<Option<i32>> {
        match self.read_constant() {
            Ok(Some((base, value))) => match base {
                ELEMENT_TYPE::I2
                | ELEMENT_TYPE::I4
                | ELEMENT_TYPE::U1
                | ELEMENT_TYPE::U2
                | ELEMENT_TYPE::U4 => value.as_i32().map(Some),
                other => Err(UnsupportedConstant(other)),
            },
            Ok(None) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// The constant of a literal field, whatever its kind. `None` if there is none or it can not
    /// be read.
    #[must_use]
    pub fn try_get_default(&self) -> Option<ConstantValue> {
        match self.read_constant() {
            Ok(constant) => constant.map(|(_, value)| value),
            Err(error) => {
                log::debug!("Ignoring constant of field '{}' - {}", self.0.name, error);
                None
            }
        }
    }

    /// Custom attributes applied to the field
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        match self.0.declaring_type.module() {
            Some(module) => CustomAttribute::list(&module, self.token()),
            None => Vec::new(),
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.0.rid == other.0.rid && self.0.declaring_type == other.0.declaring_type
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field({}.{})",
            self.0.declaring_type.pretty_name(),
            self.0.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_from_attributes() {
        let public_const = FieldModifiers::from(
            FieldAttributes::PUBLIC | FieldAttributes::STATIC | FieldAttributes::LITERAL,
        );
        assert!(public_const.is_public);
        assert!(public_const.is_const);
        assert!(!public_const.is_protected);

        let readonly = FieldModifiers::from(FieldAttributes::PUBLIC | FieldAttributes::INIT_ONLY);
        assert!(!readonly.is_const);
        assert!(!readonly.is_static);

        let literal_instance = FieldModifiers::from(FieldAttributes::LITERAL);
        assert!(!literal_instance.is_const);

        for access in [
            FieldAttributes::FAMILY,
            FieldAttributes::FAM_AND_ASSEM,
            FieldAttributes::FAM_OR_ASSEM,
        ] {
            assert!(FieldModifiers::from(access).is_protected);
        }
        assert!(FieldModifiers::from(FieldAttributes::ASSEMBLY).is_internal);
        assert!(!FieldModifiers::from(FieldAttributes::ASSEMBLY).is_protected);
        assert!(FieldModifiers::from(FieldAttributes::PRIVATE).is_private);
    }
}
