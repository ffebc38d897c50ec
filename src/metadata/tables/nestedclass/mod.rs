//! The `NestedClass` table (0x29): pairs a nested type with its enclosing type.

mod reader;

use crate::metadata::token::Token;

/// One row of the `NestedClass` table
#[derive(Clone, Debug)]
pub struct NestedClassRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table, the nested type
    pub nested_class: u32,
    /// an index into the `TypeDef` table, the enclosing type
    pub enclosing_class: u32,
}
