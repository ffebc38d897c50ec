//! The `Module` table (0x00): exactly one row describing the current module.

mod reader;

use crate::metadata::token::Token;

/// One row of the `Module` table
#[derive(Clone, Debug)]
pub struct ModuleRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte value, reserved, shall be zero
    pub generation: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Guid heap, the module version id
    pub mvid: u32,
    /// an index into the Guid heap, reserved
    pub encid: u32,
    /// an index into the Guid heap, reserved
    pub encbaseid: u32,
}
