//! The `MethodSemantics` table (0x18): links property and event accessors to their owner.

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// `MethodSemanticsAttributes` of ECMA-335 II.23.1.12
#[allow(non_snake_case)]
pub mod MethodSemanticsAttributes {
    /// Setter for property
    pub const SETTER: u32 = 0x0001;
    /// Getter for property
    pub const GETTER: u32 = 0x0002;
    /// Other method for property or event
    pub const OTHER: u32 = 0x0004;
    /// `AddOn` method for event
    pub const ADD_ON: u32 = 0x0008;
    /// `RemoveOn` method for event
    pub const REMOVE_ON: u32 = 0x0010;
    /// Fire method for event
    pub const FIRE: u32 = 0x0020;
}

/// One row of the `MethodSemantics` table
#[derive(Clone, Debug)]
pub struct MethodSemanticsRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `MethodSemanticsAttributes`
    pub semantics: u32,
    /// an index into the `MethodDef` table
    pub method: u32,
    /// a `HasSemantics` coded index: the owning `Event` or `Property`
    pub association: CodedIndex,
}
