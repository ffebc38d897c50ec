//! The `Assembly` table (0x20): the manifest of the current assembly, at most one row.

mod reader;

use crate::metadata::token::Token;

/// One row of the `Assembly` table
#[derive(Clone, Debug)]
pub struct AssemblyRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte `AssemblyHashAlgorithm`
    pub hash_alg_id: u32,
    /// major version
    pub major_version: u32,
    /// minor version
    pub minor_version: u32,
    /// build number
    pub build_number: u32,
    /// revision number
    pub revision_number: u32,
    /// a 4-byte bitmask of type `AssemblyFlags`
    pub flags: u32,
    /// an index into the Blob heap
    pub public_key: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the String heap
    pub culture: u32,
}
