//! The `MethodDef` table (0x06).

mod reader;

use bitflags::bitflags;

use crate::metadata::token::Token;

bitflags! {
    /// `MethodAttributes` of ECMA-335 II.23.1.10
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the assembly
        const ASSEMBLY = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in the assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method can not be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name and signature, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method can only be overridden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Implementation is forwarded through `PInvoke`
        const PINVOKE_IMPL = 0x2000;
        /// Reserved, shall be zero for conforming implementations
        const UNMANAGED_EXPORT = 0x0008;
        /// The runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x1000;
        /// Method has security associated with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
        /// Any other bit
        const _ = !0;
    }
}

impl MethodAttributes {
    /// Mask selecting the access bits
    pub const MEMBER_ACCESS_MASK: u32 = 0x0007;

    /// The access bits, compare against `PUBLIC.bits()`, `FAMILY.bits()`, ...
    #[must_use]
    pub fn access(&self) -> u32 {
        self.bits() & Self::MEMBER_ACCESS_MASK
    }
}

/// One row of the `MethodDef` table
#[derive(Clone, Debug)]
pub struct MethodDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte constant, RVA of the method body
    pub rva: u32,
    /// a 2-byte bitmask of type `MethodImplAttributes`
    pub impl_flags: u32,
    /// a 2-byte bitmask of type `MethodAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap holding the method signature
    pub signature: u32,
    /// first row of the contiguous run of parameters owned by this method
    pub param_list: u32,
}
