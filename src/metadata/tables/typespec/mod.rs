//! The `TypeSpec` table (0x1B): type signatures referenced from other tables, mostly generic
//! instantiations and arrays.

mod reader;

use crate::metadata::token::Token;

/// One row of the `TypeSpec` table
#[derive(Clone, Debug)]
pub struct TypeSpecRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Blob heap holding the type signature
    pub signature: u32,
}
