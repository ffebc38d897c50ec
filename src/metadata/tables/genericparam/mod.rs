//! The `GenericParam` table (0x2A): generic parameters of types and methods.

mod reader;

use bitflags::bitflags;

use crate::metadata::{tables::CodedIndex, token::Token};

bitflags! {
    /// `GenericParamAttributes` of ECMA-335 II.23.1.7
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GenericParamAttributes: u32 {
        /// The parameter is covariant (`out T`)
        const COVARIANT = 0x0001;
        /// The parameter is contravariant (`in T`)
        const CONTRAVARIANT = 0x0002;
        /// The argument must be a reference type (`class`)
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// The argument must be a non-nullable value type (`struct`)
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// The argument must have a public default constructor (`new()`)
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
        /// Any other bit
        const _ = !0;
    }
}

/// One row of the `GenericParam` table
#[derive(Clone, Debug)]
pub struct GenericParamRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte index of the parameter, numbered left to right from zero
    pub number: u32,
    /// a 2-byte bitmask of type `GenericParamAttributes`
    pub flags: u32,
    /// a `TypeOrMethodDef` coded index
    pub owner: CodedIndex,
    /// an index into the String heap
    pub name: u32,
}
