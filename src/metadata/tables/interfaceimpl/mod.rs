//! The `InterfaceImpl` table (0x09): interfaces implemented by a type.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// One row of the `InterfaceImpl` table
#[derive(Clone, Debug)]
pub struct InterfaceImplRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table
    pub class: u32,
    /// a `TypeDefOrRef` coded index
    pub interface: CodedIndex,
}
