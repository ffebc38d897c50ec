//! The `TypeRef` table (0x01): references to types defined in other modules, or nested in other
//! references.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// One row of the `TypeRef` table
#[derive(Clone, Debug)]
pub struct TypeRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a `ResolutionScope` coded index: `Module`, `ModuleRef`, `AssemblyRef` or an enclosing `TypeRef`
    pub resolution_scope: CodedIndex,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
}
