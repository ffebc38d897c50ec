//! The `TypeDef` table (0x02): one row per type defined in the module.

mod reader;

use bitflags::bitflags;

use crate::metadata::{tables::CodedIndex, token::Token};

bitflags! {
    /// `TypeAttributes` of ECMA-335 II.23.1.15
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeAttributes: u32 {
        /// Visible outside the assembly
        const PUBLIC = 0x0000_0001;
        /// Nested, public
        const NESTED_PUBLIC = 0x0000_0002;
        /// Nested, private
        const NESTED_PRIVATE = 0x0000_0003;
        /// Nested, family (protected)
        const NESTED_FAMILY = 0x0000_0004;
        /// Nested, assembly (internal)
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Nested, family and assembly
        const NESTED_FAM_AND_ASSEM = 0x0000_0006;
        /// Nested, family or assembly
        const NESTED_FAM_OR_ASSEM = 0x0000_0007;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Layout is supplied explicitly
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Class is abstract
        const ABSTRACT = 0x0000_0080;
        /// Class can not be extended
        const SEALED = 0x0000_0100;
        /// Name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Class is imported
        const IMPORT = 0x0000_1000;
        /// Reserved, class is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Windows Runtime type
        const WINDOWS_RUNTIME = 0x0000_4000;
        /// Initialize the class any time before first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// The runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x0000_0800;
        /// Class has security associated with it
        const HAS_SECURITY = 0x0004_0000;
        /// Any other bit
        const _ = !0;
    }
}

impl TypeAttributes {
    /// Mask selecting the visibility bits
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Mask selecting the layout bits
    pub const LAYOUT_MASK: u32 = 0x0000_0018;

    /// The visibility bits, compare against `PUBLIC.bits()`, `NESTED_FAMILY.bits()`, ...
    #[must_use]
    pub fn visibility(&self) -> u32 {
        self.bits() & Self::VISIBILITY_MASK
    }
}

/// One row of the `TypeDef` table
#[derive(Clone, Debug)]
pub struct TypeDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte bitmask of type `TypeAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
    /// a `TypeDefOrRef` coded index, null for `System.Object` and interfaces
    pub extends: CodedIndex,
    /// first row of the contiguous run of fields owned by this type
    pub field_list: u32,
    /// first row of the contiguous run of methods owned by this type
    pub method_list: u32,
}
