//! The `MemberRef` table (0x0A): references to fields and methods of other types, including
//! attribute constructors of imported attribute types.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// One row of the `MemberRef` table
#[derive(Clone, Debug)]
pub struct MemberRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a `MemberRefParent` coded index
    pub class: CodedIndex,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
}
