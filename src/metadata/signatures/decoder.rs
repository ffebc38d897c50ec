use crate::{
    file::parser::Parser,
    metadata::{
        signatures::{
            ArrayShape, MethodSignature, PrimitiveTypeCode, SignatureHeader,
            SignatureTypeProvider, ELEMENT_TYPE,
        },
        token::Token,
    },
    Error::{NoGenericContext, RecursionLimit},
    Result,
};

/// Maximum nesting depth of one signature
const MAX_RECURSION_DEPTH: usize = 50;

/// Walks signature blobs and builds types through a [`SignatureTypeProvider`].
///
/// # Example
///
/// ```rust,ignore
/// let mut parser = Parser::new(blob);
/// let mut decoder = SignatureDecoder::new(&provider, &context);
/// let signature = decoder.decode_method_signature(&mut parser)?;
/// ```
///
/// The depth counter tracks nesting, not the number of elements: a method with a hundred
/// `int32` parameters decodes fine, a hundred nested `SZARRAY`s do not.
///
/// A `VAR`/`MVAR` the context can not resolve is absent rather than an error. Absence spreads
/// through arrays, pointers and modifiers, and a `GENERICINST` drops the absent argument. Only a
/// type that is absent as a whole fails with [`crate::Error::NoGenericContext`].
pub struct SignatureDecoder<'p, 'c, P: ?Sized, C: ?Sized> {
    provider: &'p P,
    context: &'c C,
    depth: usize,
    /// Last generic parameter the context could not resolve, as `(index, method)`
    missing: Option<(u32, bool)>,
}

impl<'p, 'c, P, C> SignatureDecoder<'p, 'c, P, C>
where
    P: SignatureTypeProvider<C> + ?Sized,
    C: ?Sized,
{
    /// Create a decoder that calls back into `provider` and resolves generic parameters
    /// against `context`
    #[must_use]
    pub fn new(provider: &'p P, context: &'c C) -> Self {
        SignatureDecoder {
            provider,
            context,
            depth: 0,
            missing: None,
        }
    }

    /// Decode one type at the current position of `parser`
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] for signatures nested deeper than 50 levels,
    /// [`crate::Error::Malformed`] for unknown element codes,
    /// [`crate::Error::NoGenericContext`] if the type is a generic parameter missing from the
    /// context, and any error of the provider.
    pub fn decode_type(&mut self, parser: &mut Parser) -> Result<P::Type> {
        match self.decode_type_or_missing(parser)? {
            Some(ty) => Ok(ty),
            None => {
                let (index, method) = self.missing.unwrap_or_default();
                Err(NoGenericContext { index, method })
            }
        }
    }

    fn decode_type_or_missing(&mut self, parser: &mut Parser) -> Result<Option<P::Type>> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        self.depth += 1;
        let result = self.decode_type_element(parser);
        self.depth -= 1;
        result
    }

    /// Decode the element that follows a constructor like `PTR`, then wrap it with `build`
    fn decode_wrapped<F>(&mut self, parser: &mut Parser, build: F) -> Result<Option<P::Type>>
    where
        F: FnOnce(&P, P::Type) -> Result<P::Type>,
    {
        match self.decode_type_or_missing(parser)? {
            Some(element) => build(self.provider, element).map(Some),
            None => Ok(None),
        }
    }

    fn decode_type_element(&mut self, parser: &mut Parser) -> Result<Option<P::Type>> {
        let code = parser.read_le::<u8>()?;
        if let Some(primitive) = PrimitiveTypeCode::from_element_type(code) {
            return self.provider.primitive_type(primitive).map(Some);
        }

        match code {
            ELEMENT_TYPE::PTR => self.decode_wrapped(parser, |p, element| p.pointer_type(element)),
            ELEMENT_TYPE::BYREF => {
                self.decode_wrapped(parser, |p, element| p.by_reference_type(element))
            }
            ELEMENT_TYPE::PINNED => {
                self.decode_wrapped(parser, |p, element| p.pinned_type(element))
            }
            ELEMENT_TYPE::SZARRAY => {
                self.decode_wrapped(parser, |p, element| p.sz_array_type(element))
            }
            ELEMENT_TYPE::ARRAY => {
                let element = self.decode_type_or_missing(parser)?;
                let shape = Self::decode_array_shape(parser)?;
                match element {
                    Some(element) => self.provider.array_type(element, shape).map(Some),
                    None => Ok(None),
                }
            }
            ELEMENT_TYPE::CLASS | ELEMENT_TYPE::VALUETYPE => {
                self.decode_type_handle(parser).map(Some)
            }
            ELEMENT_TYPE::GENERICINST => {
                let kind = parser.read_le::<u8>()?;
                if kind != ELEMENT_TYPE::CLASS && kind != ELEMENT_TYPE::VALUETYPE {
                    return Err(malformed_error!(
                        "GENERICINST - Next byte is not TYPE_CLASS or TYPE_VALUE - {}",
                        kind
                    ));
                }

                let generic = self.decode_type_handle(parser)?;
                let count = parser.read_compressed_uint()?;
                if count == 0 {
                    return Err(malformed_error!("GENERICINST - Instantiation without arguments"));
                }

                let mut arguments = Vec::with_capacity((count as usize).min(parser.remaining()));
                for _ in 0..count {
                    if let Some(argument) = self.decode_type_or_missing(parser)? {
                        arguments.push(argument);
                    }
                }

                self.provider
                    .generic_instantiation(generic, arguments)
                    .map(Some)
            }
            ELEMENT_TYPE::VAR => {
                let index = parser.read_compressed_uint()?;
                let parameter = self.provider.generic_type_parameter(self.context, index)?;
                if parameter.is_none() {
                    self.missing = Some((index, false));
                }
                Ok(parameter)
            }
            ELEMENT_TYPE::MVAR => {
                let index = parser.read_compressed_uint()?;
                let parameter = self.provider.generic_method_parameter(self.context, index)?;
                if parameter.is_none() {
                    self.missing = Some((index, true));
                }
                Ok(parameter)
            }
            ELEMENT_TYPE::FNPTR => {
                let signature = self.decode_method_signature(parser)?;
                self.provider.function_pointer_type(signature).map(Some)
            }
            ELEMENT_TYPE::CMOD_REQD | ELEMENT_TYPE::CMOD_OPT => {
                let modifier = self.decode_type_handle(parser)?;
                let is_required = code == ELEMENT_TYPE::CMOD_REQD;
                self.decode_wrapped(parser, |p, unmodified| {
                    p.modified_type(modifier, unmodified, is_required)
                })
            }
            _ => Err(malformed_error!("Unsupported ELEMENT_TYPE - {}", code)),
        }
    }

    /// A compressed `TypeDefOrRefOrSpec` token, dispatched to the matching provider callback
    fn decode_type_handle(&mut self, parser: &mut Parser) -> Result<P::Type> {
        let token = parser.read_compressed_token()?;
        self.type_from_token(token)
    }

    fn type_from_token(&self, token: Token) -> Result<P::Type> {
        match token.table() {
            0x02 => self.provider.type_from_definition(token),
            0x01 => self.provider.type_from_reference(token),
            0x1B => self.provider.type_from_specification(self.context, token),
            _ => Err(malformed_error!("Invalid type token - {}", token)),
        }
    }

    fn decode_array_shape(parser: &mut Parser) -> Result<ArrayShape> {
        let rank = parser.read_compressed_uint()?;

        let size_count = parser.read_compressed_uint()?;
        let mut sizes = Vec::with_capacity((size_count as usize).min(parser.remaining()));
        for _ in 0..size_count {
            sizes.push(parser.read_compressed_uint()?);
        }

        let bound_count = parser.read_compressed_uint()?;
        let mut lower_bounds = Vec::with_capacity((bound_count as usize).min(parser.remaining()));
        for _ in 0..bound_count {
            lower_bounds.push(parser.read_compressed_int()?);
        }

        Ok(ArrayShape {
            rank,
            sizes,
            lower_bounds,
        })
    }

    /// Decode a `MethodDefSig`, `MethodRefSig` or `StandAloneMethodSig` (II.23.2.1 - II.23.2.3)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the header is not a method calling convention, and
    /// the errors of [`SignatureDecoder::decode_type`].
    pub fn decode_method_signature(
        &mut self,
        parser: &mut Parser,
    ) -> Result<MethodSignature<P::Type>> {
        let header = SignatureHeader(parser.read_le::<u8>()?);
        if !header.is_method() {
            return Err(malformed_error!(
                "MethodSignature - invalid header - {}",
                header.0
            ));
        }

        let generic_parameter_count = if header.is_generic() {
            parser.read_compressed_uint()?
        } else {
            0
        };

        let count = parser.read_compressed_uint()?;
        let return_type = self.decode_type(parser)?;

        let mut parameter_types = Vec::with_capacity((count as usize).min(parser.remaining()));
        let mut required_parameter_count = None;
        for index in 0..count as usize {
            if parser.peek_byte()? == ELEMENT_TYPE::SENTINEL {
                if required_parameter_count.is_some() {
                    return Err(malformed_error!("MethodSignature - duplicate SENTINEL"));
                }

                parser.advance()?;
                required_parameter_count = Some(index);
            }

            parameter_types.push(self.decode_type(parser)?);
        }

        Ok(MethodSignature {
            header,
            return_type,
            required_parameter_count: required_parameter_count.unwrap_or(parameter_types.len()),
            generic_parameter_count,
            parameter_types,
        })
    }

    /// Decode a `PropertySig` (II.23.2.5); the property type is stored as the return type
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the header is not `PROPERTY`, and the errors of
    /// [`SignatureDecoder::decode_type`].
    pub fn decode_property_signature(
        &mut self,
        parser: &mut Parser,
    ) -> Result<MethodSignature<P::Type>> {
        let header = SignatureHeader(parser.read_le::<u8>()?);
        if header.kind() != SignatureHeader::KIND_PROPERTY {
            return Err(malformed_error!(
                "PropertySignature - invalid header - {}",
                header.0
            ));
        }

        let count = parser.read_compressed_uint()?;
        let return_type = self.decode_type(parser)?;

        let mut parameter_types = Vec::with_capacity((count as usize).min(parser.remaining()));
        for _ in 0..count {
            parameter_types.push(self.decode_type(parser)?);
        }

        Ok(MethodSignature {
            header,
            return_type,
            required_parameter_count: parameter_types.len(),
            generic_parameter_count: 0,
            parameter_types,
        })
    }

    /// Decode a `FieldSig` (II.23.2.4)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the header is not `FIELD`, and the errors of
    /// [`SignatureDecoder::decode_type`].
    pub fn decode_field_signature(&mut self, parser: &mut Parser) -> Result<P::Type> {
        let header = SignatureHeader(parser.read_le::<u8>()?);
        if header.kind() != SignatureHeader::KIND_FIELD {
            return Err(malformed_error!(
                "FieldSignature - invalid header - {}",
                header.0
            ));
        }

        self.decode_type(parser)
    }
}
