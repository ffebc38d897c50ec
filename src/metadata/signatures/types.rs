use std::fmt;

#[allow(non_snake_case, dead_code, missing_docs)]
/// Element type codes of signature blobs (ECMA-335 II.23.1.16)
pub mod ELEMENT_TYPE {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    // Followed by type
    pub const PTR: u8 = 0x0f;
    // Followed by type
    pub const BYREF: u8 = 0x10;
    // Followed by TypeDef or TypeRef token
    pub const VALUETYPE: u8 = 0x11;
    // Followed by TypeDef or TypeRef token
    pub const CLASS: u8 = 0x12;
    // Generic parameter in a generic type definition, represented as number
    pub const VAR: u8 = 0x13;
    // type rank boundsCount bound1 … loCount lo1 …
    pub const ARRAY: u8 = 0x14;
    // Generic type instantiation. Followed by type type-arg-count type-1 ... type-n
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    // System.IntPtr
    pub const I: u8 = 0x18;
    // System.UIntPtr
    pub const U: u8 = 0x19;
    // Followed by full method signature
    pub const FNPTR: u8 = 0x1b;
    // System.Object
    pub const OBJECT: u8 = 0x1c;
    // Single-dim array with 0 lower bound
    pub const SZARRAY: u8 = 0x1d;
    // Generic parameter in a generic method definition, represented as number
    pub const MVAR: u8 = 0x1e;
    // Required modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_REQD: u8 = 0x1f;
    // Optional modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_OPT: u8 = 0x20;
    // Implemented within the CLI
    pub const INTERNAL: u8 = 0x21;
    // Sentinel for vararg method signature
    pub const SENTINEL: u8 = 0x41;
    // Denotes a local variable that points at a pinned object
    pub const PINNED: u8 = 0x45;
}

/// The built-in types a signature can name with a single element code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveTypeCode {
    /// `void`
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    SByte,
    /// `System.Byte`
    Byte,
    /// `System.Int16`
    Int16,
    /// `System.UInt16`
    UInt16,
    /// `System.Int32`
    Int32,
    /// `System.UInt32`
    UInt32,
    /// `System.Int64`
    Int64,
    /// `System.UInt64`
    UInt64,
    /// `System.Single`
    Single,
    /// `System.Double`
    Double,
    /// `System.String`
    String,
    /// `System.TypedReference`
    TypedReference,
    /// `System.IntPtr`
    IntPtr,
    /// `System.UIntPtr`
    UIntPtr,
    /// `System.Object`
    Object,
}

impl PrimitiveTypeCode {
    /// Map an element type code to its primitive, `None` for constructed element types
    #[must_use]
    pub fn from_element_type(code: u8) -> Option<PrimitiveTypeCode> {
        Some(match code {
            ELEMENT_TYPE::VOID => PrimitiveTypeCode::Void,
            ELEMENT_TYPE::BOOLEAN => PrimitiveTypeCode::Boolean,
            ELEMENT_TYPE::CHAR => PrimitiveTypeCode::Char,
            ELEMENT_TYPE::I1 => PrimitiveTypeCode::SByte,
            ELEMENT_TYPE::U1 => PrimitiveTypeCode::Byte,
            ELEMENT_TYPE::I2 => PrimitiveTypeCode::Int16,
            ELEMENT_TYPE::U2 => PrimitiveTypeCode::UInt16,
            ELEMENT_TYPE::I4 => PrimitiveTypeCode::Int32,
            ELEMENT_TYPE::U4 => PrimitiveTypeCode::UInt32,
            ELEMENT_TYPE::I8 => PrimitiveTypeCode::Int64,
            ELEMENT_TYPE::U8 => PrimitiveTypeCode::UInt64,
            ELEMENT_TYPE::R4 => PrimitiveTypeCode::Single,
            ELEMENT_TYPE::R8 => PrimitiveTypeCode::Double,
            ELEMENT_TYPE::STRING => PrimitiveTypeCode::String,
            ELEMENT_TYPE::TYPEDBYREF => PrimitiveTypeCode::TypedReference,
            ELEMENT_TYPE::I => PrimitiveTypeCode::IntPtr,
            ELEMENT_TYPE::U => PrimitiveTypeCode::UIntPtr,
            ELEMENT_TYPE::OBJECT => PrimitiveTypeCode::Object,
            _ => return None,
        })
    }

    /// The element type code of this primitive
    #[must_use]
    pub fn element_type(self) -> u8 {
        match self {
            PrimitiveTypeCode::Void => ELEMENT_TYPE::VOID,
            PrimitiveTypeCode::Boolean => ELEMENT_TYPE::BOOLEAN,
            PrimitiveTypeCode::Char => ELEMENT_TYPE::CHAR,
            PrimitiveTypeCode::SByte => ELEMENT_TYPE::I1,
            PrimitiveTypeCode::Byte => ELEMENT_TYPE::U1,
            PrimitiveTypeCode::Int16 => ELEMENT_TYPE::I2,
            PrimitiveTypeCode::UInt16 => ELEMENT_TYPE::U2,
            PrimitiveTypeCode::Int32 => ELEMENT_TYPE::I4,
            PrimitiveTypeCode::UInt32 => ELEMENT_TYPE::U4,
            PrimitiveTypeCode::Int64 => ELEMENT_TYPE::I8,
            PrimitiveTypeCode::UInt64 => ELEMENT_TYPE::U8,
            PrimitiveTypeCode::Single => ELEMENT_TYPE::R4,
            PrimitiveTypeCode::Double => ELEMENT_TYPE::R8,
            PrimitiveTypeCode::String => ELEMENT_TYPE::STRING,
            PrimitiveTypeCode::TypedReference => ELEMENT_TYPE::TYPEDBYREF,
            PrimitiveTypeCode::IntPtr => ELEMENT_TYPE::I,
            PrimitiveTypeCode::UIntPtr => ELEMENT_TYPE::U,
            PrimitiveTypeCode::Object => ELEMENT_TYPE::OBJECT,
        }
    }

    /// The simple name inside the `System` namespace, e.g. `Int32`
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveTypeCode::Void => "Void",
            PrimitiveTypeCode::Boolean => "Boolean",
            PrimitiveTypeCode::Char => "Char",
            PrimitiveTypeCode::SByte => "SByte",
            PrimitiveTypeCode::Byte => "Byte",
            PrimitiveTypeCode::Int16 => "Int16",
            PrimitiveTypeCode::UInt16 => "UInt16",
            PrimitiveTypeCode::Int32 => "Int32",
            PrimitiveTypeCode::UInt32 => "UInt32",
            PrimitiveTypeCode::Int64 => "Int64",
            PrimitiveTypeCode::UInt64 => "UInt64",
            PrimitiveTypeCode::Single => "Single",
            PrimitiveTypeCode::Double => "Double",
            PrimitiveTypeCode::String => "String",
            PrimitiveTypeCode::TypedReference => "TypedReference",
            PrimitiveTypeCode::IntPtr => "IntPtr",
            PrimitiveTypeCode::UIntPtr => "UIntPtr",
            PrimitiveTypeCode::Object => "Object",
        }
    }
}

impl fmt::Display for PrimitiveTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System.{}", self.name())
    }
}

/// The leading byte of a method, property or field signature (II.23.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignatureHeader(pub u8);

impl SignatureHeader {
    const HAS_THIS: u8 = 0x20;
    const EXPLICIT_THIS: u8 = 0x40;
    const GENERIC: u8 = 0x10;
    const KIND_MASK: u8 = 0x0F;

    /// `FIELD`
    pub const KIND_FIELD: u8 = 0x06;
    /// `LOCAL_SIG`
    pub const KIND_LOCAL: u8 = 0x07;
    /// `PROPERTY`
    pub const KIND_PROPERTY: u8 = 0x08;
    /// `GENERICINST` header of a method instantiation
    pub const KIND_METHOD_SPEC: u8 = 0x0A;
    /// `VARARG` calling convention
    pub const VARARG: u8 = 0x05;

    /// The signature kind or calling convention in the low nibble
    #[must_use]
    pub fn kind(self) -> u8 {
        self.0 & Self::KIND_MASK
    }

    /// `true` for instance members
    #[must_use]
    pub fn has_this(self) -> bool {
        self.0 & Self::HAS_THIS != 0
    }

    /// `true` if `this` is passed explicitly as the first parameter
    #[must_use]
    pub fn explicit_this(self) -> bool {
        self.0 & Self::EXPLICIT_THIS != 0
    }

    /// `true` if a generic parameter count follows the header
    #[must_use]
    pub fn is_generic(self) -> bool {
        self.0 & Self::GENERIC != 0
    }

    /// `true` for a method signature (any calling convention)
    #[must_use]
    pub fn is_method(self) -> bool {
        self.kind() <= Self::VARARG
    }

    /// `true` for the `VARARG` calling convention
    #[must_use]
    pub fn is_vararg(self) -> bool {
        self.kind() == Self::VARARG
    }
}

/// Shape of a general array (II.23.2.13)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ArrayShape {
    /// Number of dimensions
    pub rank: u32,
    /// Sizes of the leading dimensions that have one
    pub sizes: Vec<u32>,
    /// Lower bounds of the leading dimensions that have one
    pub lower_bounds: Vec<i32>,
}

/// A decoded method or property signature, parameterized over the provider's type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature<T> {
    /// The header byte
    pub header: SignatureHeader,
    /// Return type for methods, property type for properties
    pub return_type: T,
    /// Parameters before the vararg sentinel; equals `parameter_types.len()` without one
    pub required_parameter_count: usize,
    /// Number of generic method parameters
    pub generic_parameter_count: u32,
    /// All parameter types, including the optional ones of a vararg call site
    pub parameter_types: Vec<T>,
}
