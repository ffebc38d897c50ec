use std::{fmt, sync::Arc};

use crate::{
    metadata::{
        signatures::decode_property_signature,
        tables::{MethodSemanticsAttributes, PropertyRaw},
        token::Token,
    },
    typesystem::{
        members::{CustomAttribute, Method, MethodModifiers},
        provider::TypeProvider,
        GenericContext, Type,
    },
    Result,
};

struct PropertyData {
    declaring_type: Type,
    rid: u32,
    name: String,
    signature: u32,
    getter: Option<Method>,
    setter: Option<Method>,
}

/// A `Property` row: a getter and a setter sharing a name.
///
/// At least one of the two accessors exists; a property whose accessors are all filtered out or
/// fail to build is not listed.
#[derive(Clone)]
pub struct Property(Arc<PropertyData>);

impl Property {
    /// Build the property `rid` of `declaring_type` if one of its accessors passes the filter
    #[must_use]
    pub fn try_get(declaring_type: &Type, rid: u32, publicish_only: bool) -> Option<Property> {
        let module = declaring_type.module()?;
        let reader = module.require_reader().ok()?;
        let row = reader.row::<PropertyRaw>(rid)?;
        let name = match reader.string(row.name) {
            Ok(name) => name.to_string(),
            Err(error) => {
                log::debug!("Skipping property {} - {}", rid, error);
                return None;
            }
        };

        let mut getter = None;
        let mut setter = None;
        for semantics in reader.method_semantics(Token::from_parts(0x17, rid)) {
            if semantics.semantics & MethodSemanticsAttributes::GETTER != 0 && getter.is_none() {
                getter = Method::try_get(declaring_type, semantics.method, publicish_only);
            } else if semantics.semantics & MethodSemanticsAttributes::SETTER != 0
                && setter.is_none()
            {
                setter = Method::try_get(declaring_type, semantics.method, publicish_only);
            }
        }

        if getter.is_none() && setter.is_none() {
            return None;
        }

        Some(Property(Arc::new(PropertyData {
            declaring_type: declaring_type.clone(),
            rid,
            name,
            signature: row.signature,
            getter,
            setter,
        })))
    }

    /// The property name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type this property was listed on
    #[must_use]
    pub fn declaring_type(&self) -> &Type {
        &self.0.declaring_type
    }

    /// The `Property` token
    #[must_use]
    pub fn token(&self) -> Token {
        Token::from_parts(0x17, self.0.rid)
    }

    /// The `get` accessor
    #[must_use]
    pub fn getter(&self) -> Option<&Method> {
        self.0.getter.as_ref()
    }

    /// The `set` accessor
    #[must_use]
    pub fn setter(&self) -> Option<&Method> {
        self.0.setter.as_ref()
    }

    /// Decode the property signature in the context of the declaring type
    ///
    /// # Errors
    /// Returns the decode error of the signature.
    pub fn property_type(&self) -> Result<Type> {
        let module = self.0.declaring_type.require_module()?;
        let reader = module.require_reader()?;

        let provider = TypeProvider::new(&module);
        let signature = decode_property_signature(
            reader.blob(self.0.signature)?,
            &provider,
            &GenericContext::for_type(&self.0.declaring_type),
        )?;

        Ok(signature.return_type)
    }

    /// The index type of an indexer (`this[int]`): the first parameter of the getter, or of the
    /// setter for write-only indexers
    #[must_use]
    pub fn item_type(&self) -> Option<Type> {
        self.0
            .getter
            .iter()
            .chain(self.0.setter.iter())
            .find_map(|accessor| accessor.parameters().first().map(|p| p.parameter_type()))
            .filter(|_| self.is_indexer())
    }

    /// `true` if the getter takes parameters, or the setter takes more than the value
    #[must_use]
    pub fn is_indexer(&self) -> bool {
        match (&self.0.getter, &self.0.setter) {
            (Some(getter), _) => !getter.signature().parameter_types.is_empty(),
            (None, Some(setter)) => setter.signature().parameter_types.len() > 1,
            (None, None) => false,
        }
    }

    /// Modifiers of the getter, or the setter if there is no getter
    #[must_use]
    pub fn modifiers(&self) -> MethodModifiers {
        self.0
            .getter
            .as_ref()
            .or(self.0.setter.as_ref())
            .map(Method::modifiers)
            .unwrap_or_default()
    }

    /// Custom attributes applied to the property
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        match self.0.declaring_type.module() {
            Some(module) => CustomAttribute::list(&module, self.token()),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property({}.{})",
            self.0.declaring_type.pretty_name(),
            self.0.name
        )
    }
}
