//! The `CustomAttribute` table (0x0C).

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// One row of the `CustomAttribute` table
#[derive(Clone, Debug)]
pub struct CustomAttributeRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a `HasCustomAttribute` coded index: what the attribute is attached to
    pub parent: CodedIndex,
    /// a `CustomAttributeType` coded index: the attribute constructor
    pub constructor: CodedIndex,
    /// an index into the Blob heap holding the serialized arguments
    pub value: u32,
}
