//! Member nodes of a [`Type`]: methods, fields, properties, events, parameters and custom
//! attributes.
//!
//! Members are produced fresh by every listing call and never cached on the type. A member that
//! can not be built (a bad signature, a reference into an incompatible module) is logged and left
//! out of the listing instead of failing it.
//!
//! # Publicish filtering
//!
//! Every listing takes `publicish_only`. With it set, members are kept if they are public, or
//! protected on a type that is not sealed: a protected member of an unsealed type can be reached
//! by deriving from it, so it belongs to the public surface. Protected members of sealed types and
//! private or internal members are dropped.

mod attribute;
mod constant;
mod event;
mod field;
mod method;
mod property;

pub use attribute::CustomAttribute;
pub use constant::ConstantValue;
pub use event::Event;
pub use field::{Field, FieldModifiers};
pub use method::{Method, MethodModifiers, Parameter};
pub use property::Property;

use crate::{
    metadata::{
        tables::{MethodAttributes, MethodDefRaw},
        token::Token,
    },
    typesystem::{Type, TypeKind},
};

/// Name suffix of compiler-generated auto-property storage
const BACKING_FIELD_SUFFIX: &str = ">k__BackingField";

/// Name of the instance field holding an enum value
const ENUM_STORAGE_FIELD: &str = "value__";

pub(crate) fn is_publicish(is_public: bool, is_protected: bool, declaring_type: &Type) -> bool {
    is_public || (is_protected && !declaring_type.is_sealed())
}

impl Type {
    /// Methods and constructors, in table order.
    ///
    /// Special-name methods other than `.ctor` (accessors, operators, the static constructor) are
    /// not listed. Empty for anything but definitions.
    #[must_use]
    pub fn methods_and_constructors(&self, publicish_only: bool) -> (Vec<Method>, Vec<Method>) {
        let mut methods = Vec::new();
        let mut constructors = Vec::new();

        let Some(definition) = self.definition() else {
            return (methods, constructors);
        };
        let Some(module) = self.module() else {
            return (methods, constructors);
        };
        let Ok(reader) = module.require_reader() else {
            return (methods, constructors);
        };

        for rid in reader.method_range(definition.rid) {
            let Some(row) = reader.row::<MethodDefRaw>(rid) else {
                continue;
            };
            if MethodAttributes::from_bits_retain(row.flags).contains(MethodAttributes::SPECIAL_NAME)
                && reader.string(row.name).ok() != Some(".ctor")
            {
                continue;
            }

            if let Some(method) = Method::try_get(self, rid, publicish_only) {
                if method.is_constructor() {
                    constructors.push(method);
                } else {
                    methods.push(method);
                }
            }
        }

        (methods, constructors)
    }

    /// Methods without the constructors
    #[must_use]
    pub fn methods(&self, publicish_only: bool) -> Vec<Method> {
        self.methods_and_constructors(publicish_only).0
    }

    /// Instance constructors
    #[must_use]
    pub fn constructors(&self, publicish_only: bool) -> Vec<Method> {
        self.methods_and_constructors(publicish_only).1
    }

    /// Fields, in table order.
    ///
    /// Auto-property backing fields are not listed, nor is the storage field of an enum: the
    /// fields of an enum are exactly its named constants.
    #[must_use]
    pub fn fields(&self, publicish_only: bool) -> Vec<Field> {
        let Some(definition) = self.definition() else {
            return Vec::new();
        };
        let Some(module) = self.module() else {
            return Vec::new();
        };
        let Ok(reader) = module.require_reader() else {
            return Vec::new();
        };

        let is_enum = self.is_enum();
        reader
            .field_range(definition.rid)
            .filter_map(|rid| Field::try_get(self, rid, publicish_only))
            .filter(|field| !field.name().ends_with(BACKING_FIELD_SUFFIX))
            .filter(|field| !(is_enum && field.is_special_name()))
            .collect()
    }

    /// Properties with at least one accessor passing the filter
    #[must_use]
    pub fn properties(&self, publicish_only: bool) -> Vec<Property> {
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
            .property_range(definition.rid)
            .filter_map(|rid| Property::try_get(self, rid, publicish_only))
            .collect()
    }

    /// Events whose adder passes the filter
    #[must_use]
    pub fn events(&self, publicish_only: bool) -> Vec<Event> {
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
            .event_range(definition.rid)
            .filter_map(|rid| Event::try_get(self, rid, publicish_only))
            .collect()
    }

    /// Custom attributes applied to the type definition; empty for anything else
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        match (self.kind(), self.module()) {
            (TypeKind::Definition(definition), Some(module)) => {
                CustomAttribute::list(&module, Token::from_parts(0x02, definition.rid))
            }
            _ => Vec::new(),
        }
    }

    /// The `Invoke` method of a delegate type, whatever its visibility
    #[must_use]
    pub fn invoke_method(&self) -> Option<Method> {
        self.methods(false)
            .into_iter()
            .find(|method| method.name() == "Invoke")
    }

    pub(crate) fn enum_storage_field(&self) -> Option<Field> {
        let definition = self.definition()?;
        let module = self.module()?;
        let reader = module.require_reader().ok()?;

        reader
            .field_range(definition.rid)
            .filter_map(|rid| Field::try_get(self, rid, false))
            .find(|field| field.name() == ENUM_STORAGE_FIELD)
    }
}
