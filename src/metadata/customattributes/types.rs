//! Decoded custom attribute values.
//!
//! The value types are generic over the type representation `T` chosen by the
//! [`super::CustomAttributeTypeProvider`], so the same decoder serves the type graph and the
//! plain-string providers used in tests.

/// A decoded custom attribute blob
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeValue<T> {
    /// Constructor arguments in declaration order
    pub fixed_args: Vec<CustomAttributeTypedArgument<T>>,
    /// Field and property assignments
    pub named_args: Vec<CustomAttributeNamedArgument<T>>,
}

/// One argument value together with the type it was encoded as
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeTypedArgument<T> {
    /// Declared type of the argument; for enums this is the enum type, not its underlying type
    pub arg_type: T,
    /// The value
    pub value: CustomAttributeArgument<T>,
}

/// A single custom attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument<T> {
    /// A null string, type or array, or a null boxed object
    Null,
    /// Boolean value
    Bool(bool),
    /// Character value (16-bit Unicode, unpaired surrogates become U+FFFD)
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// UTF-8 string
    String(String),
    /// A `System.Type` argument, resolved from its serialized name
    Type(T),
    /// Elements of a single-dimensional array
    Array(Vec<CustomAttributeTypedArgument<T>>),
}

impl<T> CustomAttributeArgument<T> {
    /// The value widened to `i64`, for integer and boolean arguments
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            CustomAttributeArgument::Bool(value) => Some(i64::from(value)),
            CustomAttributeArgument::I1(value) => Some(i64::from(value)),
            CustomAttributeArgument::U1(value) => Some(i64::from(value)),
            CustomAttributeArgument::I2(value) => Some(i64::from(value)),
            CustomAttributeArgument::U2(value) => Some(i64::from(value)),
            CustomAttributeArgument::I4(value) => Some(i64::from(value)),
            CustomAttributeArgument::U4(value) => Some(i64::from(value)),
            CustomAttributeArgument::I8(value) => Some(value),
            _ => None,
        }
    }

    /// The string, for string arguments
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CustomAttributeArgument::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Whether a named argument assigns a field or a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedArgumentKind {
    /// `FIELD` (0x53)
    Field,
    /// `PROPERTY` (0x54)
    Property,
}

/// A named argument (field or property) of a custom attribute
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeNamedArgument<T> {
    /// Field or property
    pub kind: NamedArgumentKind,
    /// Name of the field or property
    pub name: String,
    /// Type of the argument
    pub arg_type: T,
    /// Value of the argument
    pub value: CustomAttributeArgument<T>,
}

impl<T> CustomAttributeNamedArgument<T> {
    /// `true` if this assigns a field
    #[must_use]
    pub fn is_field(&self) -> bool {
        self.kind == NamedArgumentKind::Field
    }
}

/// .NET `CorSerializationType` constants as defined in corhdr.h
#[allow(non_snake_case, dead_code, missing_docs)]
pub mod SERIALIZATION_TYPE {
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const SZARRAY: u8 = 0x1D;
    pub const TYPE: u8 = 0x50;
    pub const TAGGED_OBJECT: u8 = 0x51;
    pub const FIELD: u8 = 0x53;
    pub const PROPERTY: u8 = 0x54;
    pub const ENUM: u8 = 0x55;
}
