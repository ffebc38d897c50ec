use std::{fmt, sync::Arc};

use crate::{
    metadata::{
        signatures::{decode_method_signature, MethodSignature},
        tables::{MethodAttributes, MethodDefRaw, ParamAttributes, ParamRaw},
        token::Token,
    },
    typesystem::{
        members::{is_publicish, CustomAttribute},
        provider::TypeProvider,
        GenericContext, Type,
    },
    Error::MemberConstructionFailed,
    Result,
};

/// Access and dispatch flags of a method, in the terms a C# reader expects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodModifiers {
    /// `public`
    pub is_public: bool,
    /// `private`
    pub is_private: bool,
    /// `internal`
    pub is_internal: bool,
    /// `protected`
    pub is_protected: bool,
    /// `virtual`
    pub is_virtual: bool,
    /// `override`: virtual without a new vtable slot
    pub is_override: bool,
    /// `sealed`
    pub is_sealed: bool,
    /// `static`
    pub is_static: bool,
    /// `abstract`
    pub is_abstract: bool,
}

impl From<MethodAttributes> for MethodModifiers {
    fn from(attributes: MethodAttributes) -> Self {
        let access = attributes.access();
        let is_virtual = attributes.contains(MethodAttributes::VIRTUAL);

        MethodModifiers {
            is_public: access == MethodAttributes::PUBLIC.bits(),
            is_private: access == MethodAttributes::PRIVATE.bits(),
            is_internal: access == MethodAttributes::ASSEMBLY.bits(),
            is_protected: access == MethodAttributes::FAMILY.bits(),
            is_virtual,
            is_override: is_virtual && !attributes.contains(MethodAttributes::NEW_SLOT),
            is_sealed: attributes.contains(MethodAttributes::FINAL),
            is_static: attributes.contains(MethodAttributes::STATIC),
            is_abstract: attributes.contains(MethodAttributes::ABSTRACT),
        }
    }
}

struct MethodData {
    declaring_type: Type,
    rid: u32,
    flags: MethodAttributes,
    name: String,
    generic_parameters: Vec<Type>,
    signature: MethodSignature<Type>,
}

/// A `MethodDef` row with its signature decoded against the declaring type.
///
/// Methods are built on demand by the member listings of [`Type`]; two `Method` values are equal
/// when they describe the same row of the same declaring type.
#[derive(Clone)]
pub struct Method(Arc<MethodData>);

impl Method {
    /// Build the method `rid` of `declaring_type`, decoding its signature.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberConstructionFailed`] if the row, its name or its signature
    /// can not be decoded.
    pub fn new(declaring_type: &Type, rid: u32) -> Result<Method> {
        let module = declaring_type.require_module()?;
        let reader = module.require_reader()?;

        let Some(row) = reader.row::<MethodDefRaw>(rid) else {
            return Err(MemberConstructionFailed(format!(
                "MethodDef row {rid} does not exist"
            )));
        };
        let name = reader.string(row.name)?.to_string();

        let generic_parameters = module.method_generic_parameters(rid);
        let context = GenericContext::new(
            declaring_type.generic_type_parameters(),
            generic_parameters.clone(),
        );

        let provider = TypeProvider::new(&module);
        let signature = reader
            .blob(row.signature)
            .and_then(|blob| decode_method_signature(blob, &provider, &context))
            .map_err(|error| {
                MemberConstructionFailed(format!(
                    "{}.{} - {}",
                    declaring_type.full_name(),
                    name,
                    error
                ))
            })?;

        Ok(Method(Arc::new(MethodData {
            declaring_type: declaring_type.clone(),
            rid,
            flags: MethodAttributes::from_bits_retain(row.flags),
            name,
            generic_parameters,
            signature,
        })))
    }

    /// Build the method `rid` of `declaring_type` if it passes the filter.
    ///
    /// With `publicish_only`, methods that are neither public nor protected on an unsealed type
    /// are rejected. A method whose construction fails is reported as absent.
    #[must_use]
    pub fn try_get(declaring_type: &Type, rid: u32, publicish_only: bool) -> Option<Method> {
        if rid == 0 {
            return None;
        }

        if publicish_only {
            let module = declaring_type.module()?;
            let row = module.require_reader().ok()?.row::<MethodDefRaw>(rid)?;
            let access = MethodAttributes::from_bits_retain(row.flags).access();
            if !is_publicish(
                access == MethodAttributes::PUBLIC.bits(),
                access == MethodAttributes::FAMILY.bits(),
                declaring_type,
            ) {
                return None;
            }
        }

        match Method::new(declaring_type, rid) {
            Ok(method) => Some(method),
            Err(error) => {
                log::debug!("Skipping method {} - {}", rid, error);
                None
            }
        }
    }

    /// The method name, `.ctor` for instance constructors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type this method was listed on
    #[must_use]
    pub fn declaring_type(&self) -> &Type {
        &self.0.declaring_type
    }

    /// The `MethodDef` token
    #[must_use]
    pub fn token(&self) -> Token {
        Token::from_parts(0x06, self.0.rid)
    }

    /// The raw `MethodAttributes`
    #[must_use]
    pub fn attributes(&self) -> MethodAttributes {
        self.0.flags
    }

    /// The decoded signature
    #[must_use]
    pub fn signature(&self) -> &MethodSignature<Type> {
        &self.0.signature
    }

    /// `System.Void` for methods without a result
    #[must_use]
    pub fn return_type(&self) -> &Type {
        &self.0.signature.return_type
    }

    /// The generic parameters the method declares itself (`T` in `M<T>()`)
    #[must_use]
    pub fn generic_parameters(&self) -> &[Type] {
        &self.0.generic_parameters
    }

    /// `true` for instance constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.0.name == ".ctor"
    }

    /// Accessors, operators and constructors carry the special name flag
    #[must_use]
    pub fn is_special_name(&self) -> bool {
        self.0.flags.contains(MethodAttributes::SPECIAL_NAME)
    }

    /// Access and dispatch flags
    #[must_use]
    pub fn modifiers(&self) -> MethodModifiers {
        MethodModifiers::from(self.0.flags)
    }

    /// One parameter per signature parameter, named from the `Param` rows.
    ///
    /// The `Param` row for the return value (sequence `0`) is not listed. A parameter without a
    /// row gets an empty name.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut rows: Vec<(u32, ParamRaw, String)> = Vec::new();
        if let Some(module) = self.0.declaring_type.module() {
            if let Ok(reader) = module.require_reader() {
                for rid in reader.param_range(self.0.rid) {
                    let Some(row) = reader.row::<ParamRaw>(rid) else {
                        continue;
                    };
                    let name = reader.string(row.name).unwrap_or_default().to_string();
                    rows.push((rid, row, name));
                }
            }
        }

        (0..self.0.signature.parameter_types.len())
            .map(|index| {
                let row = rows
                    .iter()
                    .find(|(_, row, _)| row.sequence as usize == index + 1);

                Parameter {
                    method: self.clone(),
                    index,
                    name: row.map(|(_, _, name)| name.clone()).unwrap_or_default(),
                    flags: row.map_or(ParamAttributes::empty(), |(_, row, _)| {
                        ParamAttributes::from_bits_retain(row.flags)
                    }),
                    rid: row.map(|(rid, _, _)| *rid),
                }
            })
            .collect()
    }

    /// Custom attributes applied to the method
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        match self.0.declaring_type.module() {
            Some(module) => CustomAttribute::list(&module, self.token()),
            None => Vec::new(),
        }
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.0.rid == other.0.rid && self.0.declaring_type == other.0.declaring_type
    }
}

impl Eq for Method {}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Method({}.{})",
            self.0.declaring_type.pretty_name(),
            self.0.name
        )
    }
}

/// One parameter of a [`Method`]
#[derive(Clone)]
pub struct Parameter {
    method: Method,
    index: usize,
    name: String,
    flags: ParamAttributes,
    rid: Option<u32>,
}

impl Parameter {
    /// The parameter name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the signature
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The method declaring this parameter
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// `[In]`, `[Out]`, optional and default flags; empty without a `Param` row
    #[must_use]
    pub fn attributes(&self) -> ParamAttributes {
        self.flags
    }

    /// The type exactly as the signature states it, `T` stays `T`
    #[must_use]
    pub fn raw_type(&self) -> Type {
        self.method.0.signature.parameter_types[self.index].clone()
    }

    /// The parameter type with type parameters of the declaring type replaced.
    ///
    /// On a closed declaring type (`List<string>`), a parameter typed `T&` becomes
    /// `System.String&`: the generic argument annotated with the same parameter name, carrying
    /// the parameter's array, reference and pointer wrapping. Anything else is returned as is.
    #[must_use]
    pub fn parameter_type(&self) -> Type {
        let raw = self.raw_type();
        let Some(parameter) = raw.generic_parameter() else {
            return raw;
        };

        self.method
            .declaring_type()
            .generic_arguments()
            .into_iter()
            .find(|argument| argument.type_parameter_name() == Some(parameter.name.as_str()))
            .map_or_else(|| raw.clone(), |argument| argument.with_modifiers(raw.modifiers()))
    }

    /// Custom attributes applied to the parameter
    #[must_use]
    pub fn custom_attributes(&self) -> Vec<CustomAttribute> {
        match (self.rid, self.method.declaring_type().module()) {
            (Some(rid), Some(module)) => CustomAttribute::list(&module, Token::from_parts(0x08, rid)),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({}: {})", self.name, self.raw_type())
    }
}
