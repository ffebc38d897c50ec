use std::fmt;

use crate::{
    file::parser::Parser,
    metadata::signatures::ELEMENT_TYPE,
    Error::UnsupportedConstant,
    Result,
};

/// A value stored in the `Constant` table for a field, parameter or property.
///
/// The table stores an element type code and a little-endian blob; strings are UTF-16.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// `bool`
    Boolean(bool),
    /// `char`, lone surrogates are replaced with U+FFFD
    Char(char),
    /// `sbyte`
    SByte(i8),
    /// `byte`
    Byte(u8),
    /// `short`
    Int16(i16),
    /// `ushort`
    UInt16(u16),
    /// `int`
    Int32(i32),
    /// `uint`
    UInt32(u32),
    /// `long`
    Int64(i64),
    /// `ulong`
    UInt64(u64),
    /// `float`
    Single(f32),
    /// `double`
    Double(f64),
    /// `string`
    String(String),
    /// A `null` reference
    Null,
}

impl ConstantValue {
    /// Decode `blob` as a constant of element type `code`
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedConstant`] for element types a constant can not have,
    /// or an error if the blob is too short.
    pub fn parse(code: u8, blob: &[u8]) -> Result<ConstantValue> {
        let mut parser = Parser::new(blob);

        Ok(match code {
            ELEMENT_TYPE::BOOLEAN => ConstantValue::Boolean(parser.read_le::<u8>()? != 0),
            ELEMENT_TYPE::CHAR => ConstantValue::Char(
                char::decode_utf16([parser.read_le::<u16>()?])
                    .next()
                    .and_then(std::result::Result::ok)
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            ),
            ELEMENT_TYPE::I1 => ConstantValue::SByte(parser.read_le::<i8>()?),
            ELEMENT_TYPE::U1 => ConstantValue::Byte(parser.read_le::<u8>()?),
            ELEMENT_TYPE::I2 => ConstantValue::Int16(parser.read_le::<i16>()?),
            ELEMENT_TYPE::U2 => ConstantValue::UInt16(parser.read_le::<u16>()?),
            ELEMENT_TYPE::I4 => ConstantValue::Int32(parser.read_le::<i32>()?),
            ELEMENT_TYPE::U4 => ConstantValue::UInt32(parser.read_le::<u32>()?),
            ELEMENT_TYPE::I8 => ConstantValue::Int64(parser.read_le::<i64>()?),
            ELEMENT_TYPE::U8 => ConstantValue::UInt64(parser.read_le::<u64>()?),
            ELEMENT_TYPE::R4 => ConstantValue::Single(parser.read_le::<f32>()?),
            ELEMENT_TYPE::R8 => ConstantValue::Double(parser.read_le::<f64>()?),
            ELEMENT_TYPE::STRING => {
                let units: Vec<u16> = blob
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                ConstantValue::String(String::from_utf16_lossy(&units))
            }
            ELEMENT_TYPE::CLASS => ConstantValue::Null,
            other => return Err(UnsupportedConstant(other)),
        })
    }

    /// The value as a 32-bit integer, for the codes enum members are usually stored as.
    ///
    /// `UInt32` is reinterpreted, `UInt16` and `Byte` are widened.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedConstant`] for any other kind.
    pub fn as_i32(&self) -> Result<i32> {
        match self {
            ConstantValue::Int32(value) => Ok(*value),
            ConstantValue::Int16(value) => Ok(i32::from(*value)),
            #[allow(clippy::cast_possible_wrap)]
            ConstantValue::UInt32(value) => Ok(*value as i32),
            ConstantValue::UInt16(value) => Ok(i32::from(*value)),
            ConstantValue::Byte(value) => Ok(i32::from(*value)),
            other => Err(UnsupportedConstant(other.element_type())),
        }
    }

    /// The element type code this value is stored as
    #[must_use]
    pub fn element_type(&self) -> u8 {
        match self {
            ConstantValue::Boolean(_) => ELEMENT_TYPE::BOOLEAN,
            ConstantValue::Char(_) => ELEMENT_TYPE::CHAR,
            ConstantValue::SByte(_) => ELEMENT_TYPE::I1,
            ConstantValue::Byte(_) => ELEMENT_TYPE::U1,
            ConstantValue::Int16(_) => ELEMENT_TYPE::I2,
            ConstantValue::UInt16(_) => ELEMENT_TYPE::U2,
            ConstantValue::Int32(_) => ELEMENT_TYPE::I4,
            ConstantValue::UInt32(_) => ELEMENT_TYPE::U4,
            ConstantValue::Int64(_) => ELEMENT_TYPE::I8,
            ConstantValue::UInt64(_) => ELEMENT_TYPE::U8,
            ConstantValue::Single(_) => ELEMENT_TYPE::R4,
            ConstantValue::Double(_) => ELEMENT_TYPE::R8,
            ConstantValue::String(_) => ELEMENT_TYPE::STRING,
            ConstantValue::Null => ELEMENT_TYPE::CLASS,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Boolean(value) => write!(f, "{value}"),
            ConstantValue::Char(value) => write!(f, "'{value}'"),
            ConstantValue::SByte(value) => write!(f, "{value}"),
            ConstantValue::Byte(value) => write!(f, "{value}"),
            ConstantValue::Int16(value) => write!(f, "{value}"),
            ConstantValue::UInt16(value) => write!(f, "{value}"),
            ConstantValue::Int32(value) => write!(f, "{value}"),
            ConstantValue::UInt32(value) => write!(f, "{value}"),
            ConstantValue::Int64(value) => write!(f, "{value}"),
            ConstantValue::UInt64(value) => write!(f, "{value}"),
            ConstantValue::Single(value) => write!(f, "{value}"),
            ConstantValue::Double(value) => write!(f, "{value}"),
            ConstantValue::String(value) => write!(f, "\"{value}\""),
            ConstantValue::Null => write!(f, "null"),
        }
    }
}
