//! The `Property` table (0x17).

mod reader;

use crate::metadata::token::Token;

/// `PropertyAttributes`: the property has a special name
pub const PROPERTY_SPECIAL_NAME: u32 = 0x0200;
/// `PropertyAttributes`: the runtime checks the name encoding
pub const PROPERTY_RT_SPECIAL_NAME: u32 = 0x0400;
/// `PropertyAttributes`: the property has a default value
pub const PROPERTY_HAS_DEFAULT: u32 = 0x1000;

/// One row of the `Property` table
#[derive(Clone, Debug)]
pub struct PropertyRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `PropertyAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap holding the property signature
    pub signature: u32,
}
