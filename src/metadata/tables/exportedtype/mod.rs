//! The `ExportedType` table (0x27): types exported from other modules of the assembly, and type
//! forwarders pointing at other assemblies.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// `TypeAttributes::Forwarder`, set on rows that forward a type to another assembly
pub const EXPORTED_TYPE_FORWARDER: u32 = 0x0020_0000;

/// One row of the `ExportedType` table
#[derive(Clone, Debug)]
pub struct ExportedTypeRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte bitmask of type `TypeAttributes`
    pub flags: u32,
    /// a hint into the `TypeDef` table of the target module
    pub type_def_id: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
    /// an `Implementation` coded index: `File`, `AssemblyRef` or an enclosing `ExportedType`
    pub implementation: CodedIndex,
}
