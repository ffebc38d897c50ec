use crate::metadata::tables::{
    AssemblyRaw, AssemblyRefRaw, ConstantRaw, CustomAttributeRaw, EventMapRaw, EventRaw,
    ExportedTypeRaw, FieldRaw, GenericParamConstraintRaw, GenericParamRaw, InterfaceImplRaw,
    MemberRefRaw, MetadataTable, MethodDefRaw, MethodSemanticsRaw, ModuleRaw, ModuleRefRaw,
    NestedClassRaw, ParamRaw, PropertyMapRaw, PropertyRaw, TypeDefRaw, TypeRefRaw, TypeSpecRaw,
};

/// One decoded table of a `#~` stream.
///
/// Only the tables the type graph reads have a variant, every other table is skipped by size.
pub enum TableData<'a> {
    /// `Module`
    Module(MetadataTable<'a, ModuleRaw>),
    /// `TypeRef`
    TypeRef(MetadataTable<'a, TypeRefRaw>),
    /// `TypeDef`
    TypeDef(MetadataTable<'a, TypeDefRaw>),
    /// `Field`
    Field(MetadataTable<'a, FieldRaw>),
    /// `MethodDef`
    MethodDef(MetadataTable<'a, MethodDefRaw>),
    /// `Param`
    Param(MetadataTable<'a, ParamRaw>),
    /// `InterfaceImpl`
    InterfaceImpl(MetadataTable<'a, InterfaceImplRaw>),
    /// `MemberRef`
    MemberRef(MetadataTable<'a, MemberRefRaw>),
    /// `Constant`
    Constant(MetadataTable<'a, ConstantRaw>),
    /// `CustomAttribute`
    CustomAttribute(MetadataTable<'a, CustomAttributeRaw>),
    /// `EventMap`
    EventMap(MetadataTable<'a, EventMapRaw>),
    /// `Event`
    Event(MetadataTable<'a, EventRaw>),
    /// `PropertyMap`
    PropertyMap(MetadataTable<'a, PropertyMapRaw>),
    /// `Property`
    Property(MetadataTable<'a, PropertyRaw>),
    /// `MethodSemantics`
    MethodSemantics(MetadataTable<'a, MethodSemanticsRaw>),
    /// `ModuleRef`
    ModuleRef(MetadataTable<'a, ModuleRefRaw>),
    /// `TypeSpec`
    TypeSpec(MetadataTable<'a, TypeSpecRaw>),
    /// `Assembly`
    Assembly(MetadataTable<'a, AssemblyRaw>),
    /// `AssemblyRef`
    AssemblyRef(MetadataTable<'a, AssemblyRefRaw>),
    /// `ExportedType`
    ExportedType(MetadataTable<'a, ExportedTypeRaw>),
    /// `NestedClass`
    NestedClass(MetadataTable<'a, NestedClassRaw>),
    /// `GenericParam`
    GenericParam(MetadataTable<'a, GenericParamRaw>),
    /// `GenericParamConstraint`
    GenericParamConstraint(MetadataTable<'a, GenericParamConstraintRaw>),
}
