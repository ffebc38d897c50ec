use std::{fmt, sync::Arc};

use crate::{
    metadata::{
        tables::{EventRaw, MethodSemanticsAttributes},
        token::Token,
    },
    typesystem::{
        members::{CustomAttribute, Method, MethodModifiers},
        provider::TypeProvider,
        GenericContext, Type,
    },
    Result,
};

struct EventData {
    declaring_type: Type,
    rid: u32,
    name: String,
    event_type: Token,
    adder: Method,
    remover: Option<Method>,
}

/// An `Event` row with its `add` and `remove` accessors
#[derive(Clone)]
pub struct Event(Arc<EventData>);

impl Event {
    /// Build the event `rid` of `declaring_type`.
    ///
    /// Events without an adder, or whose adder does not pass the filter, are absent.
    #[must_use]
    pub fn try_get(declaring_type: &Type, rid: u32, publicish_only: bool) -> Option<Event> {
        let module = declaring_type.module()?;
        let reader = module.require_reader().ok()?;
        let row = reader.row::<EventRaw>(rid)?;
        let name = reader.string(row.name).ok()?.to_string();

        let mut adder = None;
        let mut remover = None;
        for semantics in reader.method_semantics(Token::from_parts(0x14, rid)) {
            if semantics.semantics & MethodSemanticsAttributes::ADD_ON != 0 && adder.is_none() {
                adder = Method::try_get(declaring_type, semantics.method, publicish_only);
            } else if semantics.semantics & MethodSemanticsAttributes::REMOVE_ON != 0
                && remover.is_none()
            {
                remover = Method::try_get(declaring_type, semantics.method, publicish_only);
            }
        }

        let Some(adder) = adder else {
            log::trace!("Event '{}' has no usable adder", name);
            return None;
        };

        Some(Event(Arc::new(EventData {
            declaring_type: declaring_type.clone(),
            rid,
            name,
            event_type: row.event_type.token,
            adder,
            remover,
        })))
    }

    /// The event name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type this event was listed on
    #[must_use]
    pub fn declaring_type(&self) -> &Type {
        &self.0.declaring_type
    }

    /// The `Event` token
    #[must_use]
    pub fn token(&self) -> Token {
        Token::from_parts(0x14, self.0.rid)
    }

    /// The `add` accessor
    #[must_use]
    pub fn adder(&self) -> &Method {
        &self.0.adder
    }

    /// The `remove` accessor
    #[must_use]
    pub fn remover(&self) -> Option<&Method> {
        self.0.remover.as_ref()
    }

    /// The delegate type of the event
    ///
    /// # Errors
    /// Returns an error if the type reference can not be resolved.
    pub fn event_type(&self) -> Result<Type> {
        let module = self.0.declaring_type.require_module()?;
        let provider = TypeProvider::new(&module);
        provider.type_from_token(
            self.0.event_type,
            &GenericContext::for_type(&self.0.declaring_type),
        )
    }

    /// The `Invoke` method of the delegate type; `None` if the delegate is a placeholder or can
    /// not be resolved
    #[must_use]
    pub fn invoker(&self) -> Option<Method> {
        match self.event_type() {
            Ok(delegate) => delegate.invoke_method(),
            Err(error) => {
                log::debug!("Event '{}' has no delegate type - {}", self.0.name, error);
                None
            }
        }
    }

    /// Modifiers of the adder
    #[must_use]
    pub fn modifiers(&self) -> MethodModifiers {
        self.0.adder.modifiers()
    }

    /// Custom attributes applied to the event
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        match self.0.declaring_type.module() {
            Some(module) => CustomAttribute::list(&module, self.token()),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event({}.{})",
            self.0.declaring_type.pretty_name(),
            self.0.name
        )
    }
}
