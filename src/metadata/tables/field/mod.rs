//! The `Field` table (0x04).

mod reader;

use bitflags::bitflags;

use crate::metadata::token::Token;

bitflags! {
    /// `FieldAttributes` of ECMA-335 II.23.1.5
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the assembly
        const ASSEMBLY = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in the assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is a compile time constant
        const LITERAL = 0x0040;
        /// Reserved, field does not have to be serialized
        const NOT_SERIALIZED = 0x0080;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// Implementation is forwarded through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// The runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x0400;
        /// Field has marshalling information
        const HAS_FIELD_MARSHAL = 0x1000;
        /// Field has a default value
        const HAS_DEFAULT = 0x8000;
        /// Field has an RVA
        const HAS_FIELD_RVA = 0x0100;
        /// Any other bit
        const _ = !0;
    }
}

impl FieldAttributes {
    /// Mask selecting the access bits
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;

    /// The access bits, compare against `PUBLIC.bits()`, `FAMILY.bits()`, ...
    #[must_use]
    pub fn access(&self) -> u32 {
        self.bits() & Self::FIELD_ACCESS_MASK
    }
}

/// One row of the `Field` table
#[derive(Clone, Debug)]
pub struct FieldRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `FieldAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap holding the field signature
    pub signature: u32,
}
