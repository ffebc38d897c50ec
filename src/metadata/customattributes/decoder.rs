use crate::{
    file::parser::Parser,
    metadata::{
        customattributes::{
            CustomAttributeArgument, CustomAttributeNamedArgument, CustomAttributeTypeProvider,
            CustomAttributeTypedArgument, CustomAttributeValue, NamedArgumentKind,
            SERIALIZATION_TYPE,
        },
        signatures::{PrimitiveTypeCode, SignatureHeader, ELEMENT_TYPE},
        token::Token,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum nesting of boxed arrays inside one argument
const MAX_NESTING_DEPTH: usize = 16;

/// The declared type of one argument and how its value is encoded
struct ArgumentTypeInfo<T> {
    ty: T,
    /// Serialization code of the value; enums carry the code of their underlying type
    code: u8,
    element: Option<Box<ArgumentTypeInfo<T>>>,
}

/// Decodes custom attribute blobs (II.23.3) through a [`CustomAttributeTypeProvider`].
///
/// Fixed arguments are typed by the constructor's signature, named arguments carry their own
/// type encoding. Boxed `object` arguments are preceded by the type of the actual value.
pub struct CustomAttributeDecoder<'p, P: ?Sized> {
    provider: &'p P,
}

impl<'p, P> CustomAttributeDecoder<'p, P>
where
    P: CustomAttributeTypeProvider + ?Sized,
{
    /// Create a decoder that resolves types through `provider`
    #[must_use]
    pub fn new(provider: &'p P) -> Self {
        CustomAttributeDecoder { provider }
    }

    /// Decode the `value` blob of an attribute whose constructor has the signature
    /// `constructor_signature`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a bad prolog, unsupported parameter types or
    /// truncated data, and any error of the provider (notably
    /// [`crate::Error::UnknownUnderlyingType`] for enums it can not size).
    pub fn decode_value(
        &self,
        constructor_signature: &[u8],
        value: &[u8],
    ) -> Result<CustomAttributeValue<P::Type>> {
        let parameter_types = self.decode_constructor_parameters(constructor_signature)?;

        let mut parser = Parser::new(value);
        let prolog = parser.read_le::<u16>()?;
        if prolog != 0x0001 {
            return Err(malformed_error!(
                "Invalid custom attribute prolog - 0x{:04x}",
                prolog
            ));
        }

        let mut fixed_args = Vec::with_capacity(parameter_types.len());
        for info in &parameter_types {
            fixed_args.push(self.decode_argument(&mut parser, info, 0)?);
        }

        // Some compilers omit the named argument count when there are none
        let named_count = if parser.has_more_data() {
            parser.read_le::<u16>()?
        } else {
            0
        };

        let mut named_args = Vec::with_capacity(usize::from(named_count).min(parser.remaining()));
        for _ in 0..named_count {
            named_args.push(self.decode_named_argument(&mut parser)?);
        }

        Ok(CustomAttributeValue {
            fixed_args,
            named_args,
        })
    }

    fn decode_constructor_parameters(
        &self,
        signature: &[u8],
    ) -> Result<Vec<ArgumentTypeInfo<P::Type>>> {
        let mut parser = Parser::new(signature);
        let header = SignatureHeader(parser.read_le::<u8>()?);
        if !header.is_method() {
            return Err(malformed_error!(
                "Constructor signature has kind 0x{:02x}",
                header.kind()
            ));
        }
        if header.is_generic() {
            parser.read_compressed_uint()?;
        }

        let count = parser.read_compressed_uint()? as usize;
        if parser.read_le::<u8>()? != ELEMENT_TYPE::VOID {
            return Err(malformed_error!("Constructor signature does not return void"));
        }

        let mut parameters = Vec::with_capacity(count.min(parser.remaining()));
        for _ in 0..count {
            parameters.push(self.decode_fixed_argument_type(&mut parser, false)?);
        }
        Ok(parameters)
    }

    /// A constructor parameter type, encoded as a signature element
    fn decode_fixed_argument_type(
        &self,
        parser: &mut Parser,
        is_element: bool,
    ) -> Result<ArgumentTypeInfo<P::Type>> {
        let code = parser.read_le::<u8>()?;
        match code {
            ELEMENT_TYPE::BOOLEAN..=ELEMENT_TYPE::STRING => self.primitive_info(code),
            ELEMENT_TYPE::OBJECT => Ok(ArgumentTypeInfo {
                ty: self.provider.primitive_type(PrimitiveTypeCode::Object)?,
                code: SERIALIZATION_TYPE::TAGGED_OBJECT,
                element: None,
            }),
            ELEMENT_TYPE::SZARRAY if !is_element => {
                let element = self.decode_fixed_argument_type(parser, true)?;
                Ok(ArgumentTypeInfo {
                    ty: self.provider.sz_array_type(element.ty.clone())?,
                    code: SERIALIZATION_TYPE::SZARRAY,
                    element: Some(Box::new(element)),
                })
            }
            ELEMENT_TYPE::CLASS | ELEMENT_TYPE::VALUETYPE => {
                let token = parser.read_compressed_token()?;
                let ty = self.type_from_token(token)?;
                let code = if self.provider.is_system_type(&ty) {
                    SERIALIZATION_TYPE::TYPE
                } else {
                    self.provider.underlying_enum_type(&ty)?.element_type()
                };

                Ok(ArgumentTypeInfo {
                    ty,
                    code,
                    element: None,
                })
            }
            _ => Err(malformed_error!(
                "Unsupported custom attribute parameter type - 0x{:02x}",
                code
            )),
        }
    }

    /// A named argument or boxed value type, encoded as a `FieldOrPropType`
    fn decode_named_argument_type(
        &self,
        parser: &mut Parser,
        depth: usize,
    ) -> Result<ArgumentTypeInfo<P::Type>> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        let code = parser.read_le::<u8>()?;
        match code {
            SERIALIZATION_TYPE::BOOLEAN..=SERIALIZATION_TYPE::STRING => self.primitive_info(code),
            SERIALIZATION_TYPE::TYPE => Ok(ArgumentTypeInfo {
                ty: self.provider.system_type()?,
                code,
                element: None,
            }),
            SERIALIZATION_TYPE::TAGGED_OBJECT => Ok(ArgumentTypeInfo {
                ty: self.provider.primitive_type(PrimitiveTypeCode::Object)?,
                code,
                element: None,
            }),
            SERIALIZATION_TYPE::SZARRAY => {
                let element = self.decode_named_argument_type(parser, depth + 1)?;
                Ok(ArgumentTypeInfo {
                    ty: self.provider.sz_array_type(element.ty.clone())?,
                    code,
                    element: Some(Box::new(element)),
                })
            }
            SERIALIZATION_TYPE::ENUM => {
                let Some(name) = parser.read_ser_string()? else {
                    return Err(malformed_error!("Enum argument without a type name"));
                };
                let ty = self.provider.type_from_serialized_name(&name)?;
                let underlying = self.provider.underlying_enum_type(&ty)?;

                Ok(ArgumentTypeInfo {
                    ty,
                    code: underlying.element_type(),
                    element: None,
                })
            }
            _ => Err(malformed_error!(
                "Invalid serialization type - 0x{:02x}",
                code
            )),
        }
    }

    fn primitive_info(&self, code: u8) -> Result<ArgumentTypeInfo<P::Type>> {
        let Some(primitive) = PrimitiveTypeCode::from_element_type(code) else {
            return Err(malformed_error!("Invalid primitive code - 0x{:02x}", code));
        };

        Ok(ArgumentTypeInfo {
            ty: self.provider.primitive_type(primitive)?,
            code,
            element: None,
        })
    }

    fn type_from_token(&self, token: Token) -> Result<P::Type> {
        match token.table() {
            0x02 => self.provider.type_from_definition(token),
            0x01 => self.provider.type_from_reference(token),
            _ => Err(malformed_error!(
                "Custom attribute parameter can not be a type specification - {}",
                token
            )),
        }
    }

    fn decode_named_argument(
        &self,
        parser: &mut Parser,
    ) -> Result<CustomAttributeNamedArgument<P::Type>> {
        let kind = match parser.read_le::<u8>()? {
            SERIALIZATION_TYPE::FIELD => NamedArgumentKind::Field,
            SERIALIZATION_TYPE::PROPERTY => NamedArgumentKind::Property,
            other => {
                return Err(malformed_error!(
                    "Invalid named argument kind - 0x{:02x}",
                    other
                ))
            }
        };

        let info = self.decode_named_argument_type(parser, 0)?;
        let Some(name) = parser.read_ser_string()? else {
            return Err(malformed_error!("Named argument without a name"));
        };
        let argument = self.decode_argument(parser, &info, 0)?;

        Ok(CustomAttributeNamedArgument {
            kind,
            name,
            arg_type: argument.arg_type,
            value: argument.value,
        })
    }

    fn decode_argument(
        &self,
        parser: &mut Parser,
        info: &ArgumentTypeInfo<P::Type>,
        depth: usize,
    ) -> Result<CustomAttributeTypedArgument<P::Type>> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        if info.code == SERIALIZATION_TYPE::TAGGED_OBJECT {
            let actual = self.decode_named_argument_type(parser, depth + 1)?;
            if actual.code == SERIALIZATION_TYPE::TAGGED_OBJECT {
                return Err(malformed_error!("Boxed object can not contain another object"));
            }
            return self.decode_argument(parser, &actual, depth + 1);
        }

        let value = match info.code {
            SERIALIZATION_TYPE::BOOLEAN => CustomAttributeArgument::Bool(parser.read_le::<u8>()? != 0),
            SERIALIZATION_TYPE::CHAR => {
                let unit = parser.read_le::<u16>()?;
                CustomAttributeArgument::Char(
                    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
                )
            }
            SERIALIZATION_TYPE::I1 => CustomAttributeArgument::I1(parser.read_le::<i8>()?),
            SERIALIZATION_TYPE::U1 => CustomAttributeArgument::U1(parser.read_le::<u8>()?),
            SERIALIZATION_TYPE::I2 => CustomAttributeArgument::I2(parser.read_le::<i16>()?),
            SERIALIZATION_TYPE::U2 => CustomAttributeArgument::U2(parser.read_le::<u16>()?),
            SERIALIZATION_TYPE::I4 => CustomAttributeArgument::I4(parser.read_le::<i32>()?),
            SERIALIZATION_TYPE::U4 => CustomAttributeArgument::U4(parser.read_le::<u32>()?),
            SERIALIZATION_TYPE::I8 => CustomAttributeArgument::I8(parser.read_le::<i64>()?),
            SERIALIZATION_TYPE::U8 => CustomAttributeArgument::U8(parser.read_le::<u64>()?),
            SERIALIZATION_TYPE::R4 => CustomAttributeArgument::R4(parser.read_le::<f32>()?),
            SERIALIZATION_TYPE::R8 => CustomAttributeArgument::R8(parser.read_le::<f64>()?),
            SERIALIZATION_TYPE::STRING => match parser.read_ser_string()? {
                Some(value) => CustomAttributeArgument::String(value),
                None => CustomAttributeArgument::Null,
            },
            SERIALIZATION_TYPE::TYPE => match parser.read_ser_string()? {
                Some(name) => {
                    CustomAttributeArgument::Type(self.provider.type_from_serialized_name(&name)?)
                }
                None => CustomAttributeArgument::Null,
            },
            SERIALIZATION_TYPE::SZARRAY => {
                let Some(element) = info.element.as_deref() else {
                    return Err(malformed_error!("Array argument without an element type"));
                };

                let count = parser.read_le::<u32>()?;
                if count == u32::MAX {
                    CustomAttributeArgument::Null
                } else {
                    let mut elements =
                        Vec::with_capacity((count as usize).min(parser.remaining()));
                    for _ in 0..count {
                        elements.push(self.decode_argument(parser, element, depth + 1)?);
                    }
                    CustomAttributeArgument::Array(elements)
                }
            }
            other => {
                return Err(malformed_error!(
                    "Invalid argument encoding - 0x{:02x}",
                    other
                ))
            }
        };

        Ok(CustomAttributeTypedArgument {
            arg_type: info.ty.clone(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// Types are plain names; TypeDef 1 is `System.Type`, TypeDef 2 is an `Int16` enum and
    /// TypeRef rows name enums nobody can size
    struct Names;

    impl CustomAttributeTypeProvider for Names {
        type Type = String;

        fn primitive_type(&self, code: PrimitiveTypeCode) -> Result<String> {
            Ok(code.to_string())
        }

        fn type_from_definition(&self, token: Token) -> Result<String> {
            match token.row() {
                1 => Ok("System.Type".to_string()),
                2 => Ok("Test.Small".to_string()),
                _ => Err(malformed_error!("no row")),
            }
        }

        fn type_from_reference(&self, token: Token) -> Result<String> {
            Ok(format!("Remote.Enum{}", token.row()))
        }

        fn sz_array_type(&self, element: String) -> Result<String> {
            Ok(format!("{element}[]"))
        }

        fn system_type(&self) -> Result<String> {
            Ok("System.Type".to_string())
        }

        fn is_system_type(&self, ty: &String) -> bool {
            ty == "System.Type"
        }

        fn type_from_serialized_name(&self, name: &str) -> Result<String> {
            Ok(name.split(',').next().unwrap_or(name).to_string())
        }

        fn underlying_enum_type(&self, ty: &String) -> Result<PrimitiveTypeCode> {
            match ty.as_str() {
                "Test.Small" => Ok(PrimitiveTypeCode::Int16),
                "System.AttributeTargets" => Ok(PrimitiveTypeCode::UInt32),
                _ => Err(Error::UnknownUnderlyingType(ty.clone())),
            }
        }
    }

    fn decode(signature: &[u8], value: &[u8]) -> Result<CustomAttributeValue<String>> {
        CustomAttributeDecoder::new(&Names).decode_value(signature, value)
    }

    #[test]
    fn no_arguments() {
        let value = decode(&[0x20, 0x00, 0x01], &[0x01, 0x00, 0x00, 0x00]).unwrap();
        assert!(value.fixed_args.is_empty());
        assert!(value.named_args.is_empty());

        // missing named argument count
        let value = decode(&[0x20, 0x00, 0x01], &[0x01, 0x00]).unwrap();
        assert!(value.named_args.is_empty());
    }

    #[test]
    fn bad_prolog() {
        assert!(matches!(
            decode(&[0x20, 0x00, 0x01], &[0x02, 0x00, 0x00, 0x00]),
            Err(Error::Malformed { .. })
        ));
        assert!(decode(&[0x20, 0x00, 0x01], &[]).is_err());
    }

    #[test]
    fn primitive_arguments() {
        // .ctor(bool, char, int32, string, float64)
        let signature = [0x20, 0x05, 0x01, 0x02, 0x03, 0x08, 0x0E, 0x0D];
        #[rustfmt::skip]
        let value = [
            0x01, 0x00,
            0x01,
            0x41, 0x00,
            0xFE, 0xFF, 0xFF, 0xFF,
            0x02, b'h', b'i',
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x3F,
            0x00, 0x00,
        ];

        let decoded = decode(&signature, &value).unwrap();
        let values: Vec<_> = decoded.fixed_args.iter().map(|a| &a.value).collect();
        assert_eq!(values[0], &CustomAttributeArgument::Bool(true));
        assert_eq!(values[1], &CustomAttributeArgument::Char('A'));
        assert_eq!(values[2], &CustomAttributeArgument::I4(-2));
        assert_eq!(values[3], &CustomAttributeArgument::String("hi".into()));
        assert_eq!(values[4], &CustomAttributeArgument::R8(1.5));
        assert_eq!(decoded.fixed_args[2].arg_type, "System.Int32");
    }

    #[test]
    fn null_string_and_array() {
        // .ctor(string, int32[])
        let signature = [0x20, 0x02, 0x01, 0x0E, 0x1D, 0x08];
        let value = [0x01, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00];

        let decoded = decode(&signature, &value).unwrap();
        assert_eq!(decoded.fixed_args[0].value, CustomAttributeArgument::Null);
        assert_eq!(decoded.fixed_args[1].value, CustomAttributeArgument::Null);
        assert_eq!(decoded.fixed_args[1].arg_type, "System.Int32[]");
    }

    #[test]
    fn array_argument() {
        let signature = [0x20, 0x01, 0x01, 0x1D, 0x05];
        let value = [0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x0A, 0x0B, 0x0C, 0x00, 0x00];

        let decoded = decode(&signature, &value).unwrap();
        let CustomAttributeArgument::Array(elements) = &decoded.fixed_args[0].value else {
            panic!("expected an array");
        };
        let bytes: Vec<_> = elements.iter().filter_map(|e| e.value.as_i64()).collect();
        assert_eq!(bytes, vec![10, 11, 12]);
    }

    #[test]
    fn type_and_enum_parameters() {
        // .ctor(class TypeDef 1, valuetype TypeDef 2)
        let signature = [0x20, 0x02, 0x01, 0x12, 0x04, 0x11, 0x08];
        #[rustfmt::skip]
        let value = [
            0x01, 0x00,
            0x0C, b'S', b'y', b's', b't', b'e', b'm', b'.', b'I', b'n', b't', b'3', b'2',
            0x07, 0x00,
            0x00, 0x00,
        ];

        let decoded = decode(&signature, &value).unwrap();
        assert_eq!(
            decoded.fixed_args[0].value,
            CustomAttributeArgument::Type("System.Int32".into())
        );
        assert_eq!(decoded.fixed_args[1].arg_type, "Test.Small");
        assert_eq!(decoded.fixed_args[1].value, CustomAttributeArgument::I2(7));
    }

    #[test]
    fn unknown_enum() {
        // .ctor(valuetype TypeRef 3)
        let signature = [0x20, 0x01, 0x01, 0x11, 0x0D];
        let value = [0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00];

        assert!(matches!(
            decode(&signature, &value),
            Err(Error::UnknownUnderlyingType(name)) if name == "Remote.Enum3"
        ));
    }

    #[test]
    fn named_arguments() {
        #[rustfmt::skip]
        let value = [
            0x01, 0x00,
            0x02, 0x00,
            // property AttributeTargets Targets = 4
            0x54, 0x55,
            0x17, b'S', b'y', b's', b't', b'e', b'm', b'.', b'A', b't', b't', b'r', b'i', b'b',
            b'u', b't', b'e', b'T', b'a', b'r', b'g', b'e', b't', b's',
            0x07, b'T', b'a', b'r', b'g', b'e', b't', b's',
            0x04, 0x00, 0x00, 0x00,
            // field object Boxed = (int16) 5
            0x53, 0x51,
            0x05, b'B', b'o', b'x', b'e', b'd',
            0x06, 0x05, 0x00,
        ];

        let decoded = decode(&[0x20, 0x00, 0x01], &value).unwrap();
        assert_eq!(decoded.named_args.len(), 2);

        let targets = &decoded.named_args[0];
        assert_eq!(targets.kind, NamedArgumentKind::Property);
        assert_eq!(targets.name, "Targets");
        assert_eq!(targets.arg_type, "System.AttributeTargets");
        assert_eq!(targets.value, CustomAttributeArgument::U4(4));

        let boxed = &decoded.named_args[1];
        assert!(boxed.is_field());
        assert_eq!(boxed.arg_type, "System.Int16");
        assert_eq!(boxed.value, CustomAttributeArgument::I2(5));
    }

    #[test]
    fn invalid_encodings() {
        // generic instantiation as a parameter
        assert!(decode(&[0x20, 0x01, 0x01, 0x15], &[0x01, 0x00]).is_err());
        // field signature instead of a method
        assert!(decode(&[0x06, 0x08], &[0x01, 0x00]).is_err());
        // named argument with an invalid kind
        assert!(decode(&[0x20, 0x00, 0x01], &[0x01, 0x00, 0x01, 0x00, 0x99]).is_err());
        // truncated int32
        assert!(matches!(
            decode(&[0x20, 0x01, 0x01, 0x08], &[0x01, 0x00, 0x01]),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn nested_boxed_arrays_are_bounded() {
        let mut value = vec![0x01, 0x00, 0x01, 0x00, 0x53, 0x51, 0x01, b'x'];
        for _ in 0..64 {
            value.extend_from_slice(&[0x1D, 0x51, 0x01, 0x00, 0x00, 0x00]);
        }

        assert!(matches!(
            decode(&[0x20, 0x00, 0x01], &value),
            Err(Error::RecursionLimit(_))
        ));
    }
}
