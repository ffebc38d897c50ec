use strum::{EnumCount, EnumIter};

/// Identifier of every ECMA-335 metadata table (II.22), valued by its table number
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, EnumCount, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    /// `Module`
    Module = 0x00,
    /// `TypeRef`
    TypeRef = 0x01,
    /// `TypeDef`
    TypeDef = 0x02,
    /// `FieldPtr`, only present in unoptimized `#-` streams
    FieldPtr = 0x03,
    /// `Field`
    Field = 0x04,
    /// `MethodPtr`, only present in unoptimized `#-` streams
    MethodPtr = 0x05,
    /// `MethodDef`
    MethodDef = 0x06,
    /// `ParamPtr`, only present in unoptimized `#-` streams
    ParamPtr = 0x07,
    /// `Param`
    Param = 0x08,
    /// `InterfaceImpl`
    InterfaceImpl = 0x09,
    /// `MemberRef`
    MemberRef = 0x0A,
    /// `Constant`
    Constant = 0x0B,
    /// `CustomAttribute`
    CustomAttribute = 0x0C,
    /// `FieldMarshal`
    FieldMarshal = 0x0D,
    /// `DeclSecurity`
    DeclSecurity = 0x0E,
    /// `ClassLayout`
    ClassLayout = 0x0F,
    /// `FieldLayout`
    FieldLayout = 0x10,
    /// `StandAloneSig`
    StandAloneSig = 0x11,
    /// `EventMap`
    EventMap = 0x12,
    /// `EventPtr`, only present in unoptimized `#-` streams
    EventPtr = 0x13,
    /// `Event`
    Event = 0x14,
    /// `PropertyMap`
    PropertyMap = 0x15,
    /// `PropertyPtr`, only present in unoptimized `#-` streams
    PropertyPtr = 0x16,
    /// `Property`
    Property = 0x17,
    /// `MethodSemantics`
    MethodSemantics = 0x18,
    /// `MethodImpl`
    MethodImpl = 0x19,
    /// `ModuleRef`
    ModuleRef = 0x1A,
    /// `TypeSpec`
    TypeSpec = 0x1B,
    /// `ImplMap`
    ImplMap = 0x1C,
    /// `FieldRVA`
    FieldRVA = 0x1D,
    /// `EncLog`
    EncLog = 0x1E,
    /// `EncMap`
    EncMap = 0x1F,
    /// `Assembly`
    Assembly = 0x20,
    /// `AssemblyProcessor`
    AssemblyProcessor = 0x21,
    /// `AssemblyOS`
    AssemblyOS = 0x22,
    /// `AssemblyRef`
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor`
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS`
    AssemblyRefOS = 0x25,
    /// `File`
    File = 0x26,
    /// `ExportedType`
    ExportedType = 0x27,
    /// `ManifestResource`
    ManifestResource = 0x28,
    /// `NestedClass`
    NestedClass = 0x29,
    /// `GenericParam`
    GenericParam = 0x2A,
    /// `MethodSpec`
    MethodSpec = 0x2B,
    /// `GenericParamConstraint`
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Map a table number (the top byte of a token) to its id
    #[must_use]
    pub fn from_u8(value: u8) -> Option<TableId> {
        use strum::IntoEnumIterator;

        TableId::iter().find(|id| *id as u8 == value)
    }

    /// The token of `row` inside this table
    #[must_use]
    pub fn token(self, row: u32) -> crate::metadata::token::Token {
        crate::metadata::token::Token::from_parts(self as u8, row)
    }
}
