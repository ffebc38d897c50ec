//! The `AssemblyRef` table (0x23): assemblies this module depends on.

mod reader;

use crate::metadata::token::Token;

/// One row of the `AssemblyRef` table
#[derive(Clone, Debug)]
pub struct AssemblyRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
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
    /// an index into the Blob heap, public key or token
    pub public_key_or_token: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the String heap
    pub culture: u32,
    /// an index into the Blob heap
    pub hash_value: u32,
}
