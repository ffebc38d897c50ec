use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::{
    loader::Module,
    metadata::{
        customattributes::{CustomAttributeDecoder, CustomAttributeValue},
        tables::{CustomAttributeRaw, MemberRefRaw, MethodDefRaw},
        token::Token,
    },
    typesystem::{provider::TypeProvider, GenericContext, Type},
    Error::ContextDropped,
    Result,
};

/// One `CustomAttribute` row.
///
/// The attribute type name and the argument values are decoded separately and on demand: an
/// attribute whose arguments use an enum of an unavailable module still reports its name.
#[derive(Clone)]
pub struct CustomAttribute {
    module: Weak<Module>,
    row: CustomAttributeRaw,
}

impl CustomAttribute {
    /// All attributes attached to `parent` in `module`, in table order
    pub(crate) fn list(module: &Arc<Module>, parent: Token) -> Vec<CustomAttribute> {
        let Ok(reader) = module.require_reader() else {
            return Vec::new();
        };

        reader
            .custom_attributes(parent)
            .into_iter()
            .map(|row| CustomAttribute {
                module: Arc::downgrade(module),
                row,
            })
            .collect()
    }

    fn require_module(&self) -> Result<Arc<Module>> {
        self.module.upgrade().ok_or(ContextDropped)
    }

    /// The `CustomAttribute` token
    #[must_use]
    pub fn token(&self) -> Token {
        self.row.token
    }

    /// The token of the element the attribute is applied to
    #[must_use]
    pub fn parent(&self) -> Token {
        self.row.parent.token
    }

    /// The attribute type: the declaring type of its constructor
    ///
    /// # Errors
    /// Returns an error if the constructor or its declaring type can not be resolved.
    pub fn attribute_type(&self) -> Result<Type> {
        let module = self.require_module()?;
        let reader = module.require_reader()?;
        let constructor = self.row.constructor.token;

        match constructor.table() {
            0x06 => method_declaring_type(&module, constructor.row()),
            0x0A => {
                let Some(member) = reader.row::<MemberRefRaw>(constructor.row()) else {
                    return Err(malformed_error!("MemberRef {} does not exist", constructor));
                };

                let class = member.class.token;
                match class.table() {
                    0x06 => method_declaring_type(&module, class.row()),
                    _ => TypeProvider::new(&module)
                        .type_from_token(class, &self.target_context(&module)),
                }
            }
            table => Err(malformed_error!(
                "Attribute constructor {} has table 0x{:02x}",
                constructor,
                table
            )),
        }
    }

    /// The parameters of the type the attribute is applied to, or of the declaring type of a
    /// target method, so a constructor on `Attr<T>` resolves `T` against the target
    fn target_context(&self, module: &Arc<Module>) -> GenericContext {
        let parent = self.parent();
        let target = match parent.table() {
            0x02 => module.definition_type(parent.row()),
            0x06 => method_declaring_type(module, parent.row()),
            _ => return GenericContext::default(),
        };

        match target {
            Ok(target) => GenericContext::for_type(&target),
            Err(error) => {
                log::debug!("No generic context for attribute {} - {}", self.token(), error);
                GenericContext::default()
            }
        }
    }

    /// The namespace and name of the attribute type
    ///
    /// # Errors
    /// Returns an error if the attribute type can not be resolved.
    pub fn name_and_namespace(&self) -> Result<(String, String)> {
        let attribute_type = self.attribute_type()?;
        Ok((
            attribute_type.name(),
            attribute_type.namespace().unwrap_or_default(),
        ))
    }

    /// The attribute type name, e.g. `ObsoleteAttribute`; empty if it can not be resolved
    #[must_use]
    pub fn name(&self) -> String {
        self.name_and_namespace()
            .map(|(name, _)| name)
            .unwrap_or_default()
    }

    /// The attribute type namespace; empty if it can not be resolved
    #[must_use]
    pub fn namespace(&self) -> String {
        self.name_and_namespace()
            .map(|(_, namespace)| namespace)
            .unwrap_or_default()
    }

    /// Decode the arguments
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownUnderlyingType`] if an argument is an enum whose storage
    /// type can not be determined, or the decode error of a malformed blob.
    pub fn try_value(&self) -> Result<CustomAttributeValue<Type>> {
        let module = self.require_module()?;
        let reader = module.require_reader()?;
        let constructor = self.row.constructor.token;

        let signature = match constructor.table() {
            0x06 => reader
                .row::<MethodDefRaw>(constructor.row())
                .map(|row| row.signature),
            0x0A => reader
                .row::<MemberRefRaw>(constructor.row())
                .map(|row| row.signature),
            _ => None,
        };
        let Some(signature) = signature else {
            return Err(malformed_error!(
                "Attribute constructor {} does not exist",
                constructor
            ));
        };

        let provider = TypeProvider::new(&module);
        CustomAttributeDecoder::new(&provider)
            .decode_value(reader.blob(signature)?, reader.blob(self.row.value)?)
    }

    /// The arguments, or empty argument lists if they can not be decoded
    #[must_use]
    pub fn value(&self) -> CustomAttributeValue<Type> {
        match self.try_value() {
            Ok(value) => value,
            Err(error) => {
                log::debug!(
                    "Skipping arguments of attribute '{}' - {}",
                    self.name(),
                    error
                );
                CustomAttributeValue {
                    fixed_args: Vec::new(),
                    named_args: Vec::new(),
                }
            }
        }
    }
}

fn method_declaring_type(module: &Arc<Module>, method_rid: u32) -> Result<Type> {
    let reader = module.require_reader()?;
    match reader.method_declaring_type(method_rid) {
        Some(type_rid) => module.definition_type(type_rid),
        None => Err(malformed_error!(
            "Method {} has no declaring type",
            method_rid
        )),
    }
}

impl fmt::Debug for CustomAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, namespace) = self.name_and_namespace().unwrap_or_default();
        write!(f, "CustomAttribute({namespace}.{name})")
    }
}
