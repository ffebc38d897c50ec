//! The `ModuleRef` table (0x1A): other modules of the same assembly.

mod reader;

use crate::metadata::token::Token;

/// One row of the `ModuleRef` table
#[derive(Clone, Debug)]
pub struct ModuleRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the String heap
    pub name: u32,
}
