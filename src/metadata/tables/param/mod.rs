//! The `Param` table (0x08).

mod reader;

use bitflags::bitflags;

use crate::metadata::token::Token;

bitflags! {
    /// `ParamAttributes` of ECMA-335 II.23.1.13
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParamAttributes: u32 {
        /// Parameter is `[In]`
        const IN = 0x0001;
        /// Parameter is `[Out]`
        const OUT = 0x0002;
        /// Parameter is optional
        const OPTIONAL = 0x0010;
        /// Parameter has a default value
        const HAS_DEFAULT = 0x1000;
        /// Parameter has marshalling information
        const HAS_FIELD_MARSHAL = 0x2000;
        /// Any other bit
        const _ = !0;
    }
}

/// One row of the `Param` table
#[derive(Clone, Debug)]
pub struct ParamRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `ParamAttributes`
    pub flags: u32,
    /// position of the parameter, `0` describes the return value
    pub sequence: u32,
    /// an index into the String heap
    pub name: u32,
}
