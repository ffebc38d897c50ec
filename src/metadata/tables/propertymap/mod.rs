//! The `PropertyMap` table (0x15): maps a type to the start of its run of properties.

mod reader;

use crate::metadata::token::Token;

/// One row of the `PropertyMap` table
#[derive(Clone, Debug)]
pub struct PropertyMapRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table
    pub parent: u32,
    /// first row of the contiguous run of properties owned by `parent`
    pub property_list: u32,
}
