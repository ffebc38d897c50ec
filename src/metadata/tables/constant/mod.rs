//! The `Constant` table (0x0B): compile-time values of literal fields, parameter defaults and
//! properties.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// One row of the `Constant` table
#[derive(Clone, Debug)]
pub struct ConstantRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// the `ELEMENT_TYPE` of the value
    pub base: u8,
    /// a `HasConstant` coded index
    pub parent: CodedIndex,
    /// an index into the Blob heap holding the little-endian value
    pub value: u32,
}
