//! The `GenericParamConstraint` table (0x2C): type constraints of generic parameters.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// One row of the `GenericParamConstraint` table
#[derive(Clone, Debug)]
pub struct GenericParamConstraintRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `GenericParam` table
    pub owner: u32,
    /// a `TypeDefOrRef` coded index
    pub constraint: CodedIndex,
}
