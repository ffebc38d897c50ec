use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{
        AssemblyRaw, AssemblyRefRaw, CodedIndexType, ConstantRaw, CustomAttributeRaw,
        EventMapRaw, EventRaw, ExportedTypeRaw, FieldRaw, GenericParamConstraintRaw,
        GenericParamRaw, InterfaceImplRaw, MemberRefRaw, MetadataTable, MethodDefRaw,
        MethodSemanticsRaw, ModuleRaw, ModuleRefRaw, NestedClassRaw, ParamRaw, PropertyMapRaw,
        PropertyRaw, RowReadable, TableAccess, TableData, TableId, TableInfo, TableInfoRef, TypeDefRaw,
        TypeRefRaw, TypeSpecRaw,
    },
    Result,
};

/// The header of the `#~` stream and the tables that follow it.
///
/// Tables the type graph reads are wrapped into a [`MetadataTable`] and can be fetched through
/// [`TableAccess`]. Every other table is skipped by its computed size, so the offsets of later
/// tables stay correct even for images that carry pointer, edit-and-continue or security tables.
///
/// `#-` streams share the layout; their pointer tables are skipped like any other table and
/// member ranges are read from the logical tables directly.
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.6 && II.22
pub struct TablesHeader<'a> {
    /// Major version of table schemata, shall be 2
    pub major_version: u8,
    /// Minor version of table schemata, shall be 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    /// Offset of the first table row, relative to the start of the stream
    tables_offset: usize,
    tables: Vec<Option<TableData<'a>>>,
}

impl<'a> TablesHeader<'a> {
    /// Create a `TablesHeader` object from a sequence of bytes
    ///
    /// # Arguments
    /// * 'data' - The byte slice of the `#~` stream
    ///
    /// # Errors
    /// Returns an error if the data is too short or if no table is present
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(out_of_bounds_error!());
        }

        let valid_bitvec = read_le::<u64>(&data[8..])?;
        if valid_bitvec == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let mut tables_header = TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid: valid_bitvec,
            sorted: read_le::<u64>(&data[16..])?,
            info: Arc::new(TableInfo::new(data, valid_bitvec)?),
            tables_offset: (24 + valid_bitvec.count_ones() * 4) as usize,
            tables: Vec::new(),
        };
        tables_header
            .tables
            .resize_with(TableId::GenericParamConstraint as usize + 1, || None);

        let mut current_offset = tables_header.tables_offset;
        for table_id in TableId::iter() {
            let Some(table_data) = data.get(current_offset..) else {
                return Err(out_of_bounds_error!());
            };

            tables_header.add_table(table_data, table_id, &mut current_offset)?;
        }

        Ok(tables_header)
    }

    /// Number of tables present in the stream
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// `true` if the stream contains at least one row of `table_id`
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.info.get(table_id).rows > 0
    }

    /// Number of rows of `table_id`, `0` if absent
    #[must_use]
    pub fn row_count(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }

    /// Typed access to a table, see [`TableAccess`]
    #[must_use]
    pub fn table<T>(&self) -> Option<&MetadataTable<'a, T>>
    where
        Self: TableAccess<'a, T>,
        T: RowReadable,
    {
        <Self as TableAccess<'a, T>>::table(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_table(
        &mut self,
        data: &'a [u8],
        table_type: TableId,
        current_offset: &mut usize,
    ) -> Result<()> {
        let rows = self.info.get(table_type).rows;
        if rows == 0 {
            return Ok(());
        }

        macro_rules! decoded {
            ($raw:ty, $variant:ident) => {{
                let table = MetadataTable::<$raw>::new(data, rows, self.info.clone())?;
                *current_offset += table.size() as usize;
                TableData::$variant(table)
            }};
        }

        let table = match table_type {
            TableId::Module => decoded!(ModuleRaw, Module),
            TableId::TypeRef => decoded!(TypeRefRaw, TypeRef),
            TableId::TypeDef => decoded!(TypeDefRaw, TypeDef),
            TableId::Field => decoded!(FieldRaw, Field),
            TableId::MethodDef => decoded!(MethodDefRaw, MethodDef),
            TableId::Param => decoded!(ParamRaw, Param),
            TableId::InterfaceImpl => decoded!(InterfaceImplRaw, InterfaceImpl),
            TableId::MemberRef => decoded!(MemberRefRaw, MemberRef),
            TableId::Constant => decoded!(ConstantRaw, Constant),
            TableId::CustomAttribute => decoded!(CustomAttributeRaw, CustomAttribute),
            TableId::EventMap => decoded!(EventMapRaw, EventMap),
            TableId::Event => decoded!(EventRaw, Event),
            TableId::PropertyMap => decoded!(PropertyMapRaw, PropertyMap),
            TableId::Property => decoded!(PropertyRaw, Property),
            TableId::MethodSemantics => decoded!(MethodSemanticsRaw, MethodSemantics),
            TableId::ModuleRef => decoded!(ModuleRefRaw, ModuleRef),
            TableId::TypeSpec => decoded!(TypeSpecRaw, TypeSpec),
            TableId::Assembly => decoded!(AssemblyRaw, Assembly),
            TableId::AssemblyRef => decoded!(AssemblyRefRaw, AssemblyRef),
            TableId::ExportedType => decoded!(ExportedTypeRaw, ExportedType),
            TableId::NestedClass => decoded!(NestedClassRaw, NestedClass),
            TableId::GenericParam => decoded!(GenericParamRaw, GenericParam),
            TableId::GenericParamConstraint => {
                decoded!(GenericParamConstraintRaw, GenericParamConstraint)
            }
            other => {
                let row_size = opaque_row_size(other, &self.info) as usize;
                let Some(size) = (rows as usize).checked_mul(row_size) else {
                    return Err(out_of_bounds_error!());
                };
                if size > data.len() {
                    return Err(out_of_bounds_error!());
                }

                *current_offset += size;
                return Ok(());
            }
        };

        self.tables[table_type as usize] = Some(table);
        Ok(())
    }
}

/// Row size of a table that is skipped rather than decoded
#[rustfmt::skip]
fn opaque_row_size(table: TableId, info: &TableInfo) -> u32 {
    let size = match table {
        TableId::FieldPtr               => info.table_index_bytes(TableId::Field),
        TableId::MethodPtr              => info.table_index_bytes(TableId::MethodDef),
        TableId::ParamPtr               => info.table_index_bytes(TableId::Param),
        TableId::EventPtr               => info.table_index_bytes(TableId::Event),
        TableId::PropertyPtr            => info.table_index_bytes(TableId::Property),
        TableId::FieldMarshal           => info.coded_index_bytes(CodedIndexType::HasFieldMarshal) + info.blob_bytes(),
        TableId::DeclSecurity           => 2 + info.coded_index_bytes(CodedIndexType::HasDeclSecurity) + info.blob_bytes(),
        TableId::ClassLayout            => 2 + 4 + info.table_index_bytes(TableId::TypeDef),
        TableId::FieldLayout            => 4 + info.table_index_bytes(TableId::Field),
        TableId::StandAloneSig          => info.blob_bytes(),
        TableId::MethodImpl             => info.table_index_bytes(TableId::TypeDef) + 2 * info.coded_index_bytes(CodedIndexType::MethodDefOrRef),
        TableId::ImplMap                => 2 + info.coded_index_bytes(CodedIndexType::MemberForwarded) + info.str_bytes() + info.table_index_bytes(TableId::ModuleRef),
        TableId::FieldRVA               => 4 + info.table_index_bytes(TableId::Field),
        TableId::EncLog                 => 8,
        TableId::EncMap                 => 4,
        TableId::AssemblyProcessor      => 4,
        TableId::AssemblyOS             => 12,
        TableId::AssemblyRefProcessor   => 4 + info.table_index_bytes(TableId::AssemblyRef),
        TableId::AssemblyRefOS          => 12 + info.table_index_bytes(TableId::AssemblyRef),
        TableId::File                   => 4 + info.str_bytes() + info.blob_bytes(),
        TableId::ManifestResource       => 8 + info.str_bytes() + info.coded_index_bytes(CodedIndexType::Implementation),
        TableId::MethodSpec             => info.coded_index_bytes(CodedIndexType::MethodDefOrRef) + info.blob_bytes(),
        _ => 0,
    };

    u32::from(size)
}

macro_rules! impl_table_access {
    ($raw:ty, $id:expr, $variant:ident) => {
        impl<'a> TableAccess<'a, $raw> for TablesHeader<'a> {
            fn table(&self) -> Option<&MetadataTable<'a, $raw>> {
                match self.tables.get($id as usize)? {
                    Some(TableData::$variant(table)) => Some(table),
                    _ => None,
                }
            }
        }
    };
}

impl_table_access!(ModuleRaw, TableId::Module, Module);
impl_table_access!(TypeRefRaw, TableId::TypeRef, TypeRef);
impl_table_access!(TypeDefRaw, TableId::TypeDef, TypeDef);
impl_table_access!(FieldRaw, TableId::Field, Field);
impl_table_access!(MethodDefRaw, TableId::MethodDef, MethodDef);
impl_table_access!(ParamRaw, TableId::Param, Param);
impl_table_access!(InterfaceImplRaw, TableId::InterfaceImpl, InterfaceImpl);
impl_table_access!(MemberRefRaw, TableId::MemberRef, MemberRef);
impl_table_access!(ConstantRaw, TableId::Constant, Constant);
impl_table_access!(CustomAttributeRaw, TableId::CustomAttribute, CustomAttribute);
impl_table_access!(EventMapRaw, TableId::EventMap, EventMap);
impl_table_access!(EventRaw, TableId::Event, Event);
impl_table_access!(PropertyMapRaw, TableId::PropertyMap, PropertyMap);
impl_table_access!(PropertyRaw, TableId::Property, Property);
impl_table_access!(MethodSemanticsRaw, TableId::MethodSemantics, MethodSemantics);
impl_table_access!(ModuleRefRaw, TableId::ModuleRef, ModuleRef);
impl_table_access!(TypeSpecRaw, TableId::TypeSpec, TypeSpec);
impl_table_access!(AssemblyRaw, TableId::Assembly, Assembly);
impl_table_access!(AssemblyRefRaw, TableId::AssemblyRef, AssemblyRef);
impl_table_access!(ExportedTypeRaw, TableId::ExportedType, ExportedType);
impl_table_access!(NestedClassRaw, TableId::NestedClass, NestedClass);
impl_table_access!(GenericParamRaw, TableId::GenericParam, GenericParam);
impl_table_access!(
    GenericParamConstraintRaw,
    TableId::GenericParamConstraint,
    GenericParamConstraint
);
