//! The metadata reader: one parsed module with typed access to its heaps and tables.
//!
//! [`MetadataReader`] owns the [`File`] and borrows every stream from it through a
//! self-referencing struct, so table rows can be decoded lazily without copying the image. It is
//! the only place where heap indexes, coded indexes and member ranges are turned into rows; the
//! type graph above it works with row ids and [`Token`]s.
//!
//! # Ranges
//!
//! Several tables own a contiguous run of rows in another table (`TypeDef` → `Field`/`MethodDef`,
//! `MethodDef` → `Param`, `PropertyMap` → `Property`, `EventMap` → `Event`). The run ends where
//! the next owner's run starts, or at the end of the target table. All ranges are clamped to the
//! target table so damaged lists never produce out-of-range row ids.
//!
//! # Lookups
//!
//! Lookups by parent (constants, custom attributes, generic parameters, nesting, semantics) scan
//! the table linearly. Sorted bits are not trusted.

use std::{ops::Range, path::Path, sync::Arc};

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        root::Root,
        streams::{Blob, Guid, Strings, TablesHeader},
        tables::{
            AssemblyRaw, AssemblyRefRaw, ConstantRaw, CustomAttributeRaw, EventMapRaw,
            ExportedTypeRaw, GenericParamConstraintRaw, GenericParamRaw, InterfaceImplRaw,
            MethodDefRaw, MethodSemanticsRaw, ModuleRaw, NestedClassRaw, PropertyMapRaw,
            RowReadable, TableAccess, TableId, TypeDefRaw,
        },
        token::Token,
    },
    Error::NotAnAssembly,
    Result,
};

/// Platform signature projection requested for a reader.
///
/// The mode is carried through to every reader of a load context; no projection is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Signatures are exposed as stored
    #[default]
    None,
    /// Apply the platform projection of WinMD signatures
    ApplyPlatformProjection,
}

/// The streams of one module, borrowed from its [`File`]
pub struct MetadataReaderData<'a> {
    /// Metadata root with the stream directory
    pub root: Root,
    /// `#~` or `#-`
    pub tables: Option<TablesHeader<'a>>,
    /// `#Strings`
    pub strings: Option<Strings<'a>>,
    /// `#GUID`
    pub guids: Option<Guid<'a>>,
    /// `#Blob`
    pub blobs: Option<Blob<'a>>,
}

impl<'a> MetadataReaderData<'a> {
    /// Parse the metadata root of `data` and locate its streams
    ///
    /// # Errors
    /// Returns an error if the root or one of the streams is damaged.
    pub fn from_metadata(data: &'a [u8]) -> Result<Self> {
        let root = Root::read(data)?;

        let mut tables = None;
        let mut strings = None;
        let mut guids = None;
        let mut blobs = None;

        for stream in &root.stream_headers {
            let start = stream.offset as usize;
            let Some(stream_data) = data.get(start..start + stream.size as usize) else {
                return Err(out_of_bounds_error!());
            };

            match stream.name.as_str() {
                "#~" | "#-" => tables = Some(TablesHeader::from(stream_data)?),
                "#Strings" => strings = Some(Strings::from(stream_data)?),
                "#GUID" => guids = Some(Guid::from(stream_data)?),
                "#Blob" => blobs = Some(Blob::from(stream_data)?),
                _ => {}
            }
        }

        if tables.is_none() {
            return Err(malformed_error!("Metadata root has no tables stream"));
        }

        Ok(MetadataReaderData {
            root,
            tables,
            strings,
            guids,
            blobs,
        })
    }
}

#[self_referencing]
/// A parsed module.
///
/// Cheap to query, rows are decoded on every access. `MetadataReader` is `Send + Sync` and is
/// shared by every node of the type graph that belongs to its module.
pub struct MetadataReader {
    file: Arc<File>,
    projection: ProjectionMode,

    #[borrows(file)]
    #[not_covariant]
    data: MetadataReaderData<'this>,
}

impl MetadataReader {
    /// Map the file at `path` and parse its metadata
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be read and
    /// [`crate::Error::NotAnAssembly`] if it holds no usable metadata.
    pub fn from_file(path: &Path, projection: ProjectionMode) -> Result<Self> {
        let file = File::from_file(path).map_err(|error| match error {
            crate::Error::FileError(_) => error,
            other => NotAnAssembly(other.to_string()),
        })?;
        Self::load(Arc::new(file), projection)
    }

    /// Parse the metadata held in `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::NotAnAssembly`] if `data` holds no usable metadata.
    pub fn from_mem(data: Vec<u8>, projection: ProjectionMode) -> Result<Self> {
        let file = File::from_mem(data).map_err(|error| NotAnAssembly(error.to_string()))?;
        Self::load(Arc::new(file), projection)
    }

    fn load(file: Arc<File>, projection: ProjectionMode) -> Result<Self> {
        MetadataReader::try_new(file, projection, |file| {
            MetadataReaderData::from_metadata(file.metadata()?)
        })
        .map_err(|error| match error {
            NotAnAssembly(_) => error,
            other => NotAnAssembly(other.to_string()),
        })
    }

    /// The projection mode this reader was created with
    #[must_use]
    pub fn projection(&self) -> ProjectionMode {
        *self.borrow_projection()
    }

    /// The underlying image
    #[must_use]
    pub fn file(&self) -> &Arc<File> {
        self.borrow_file()
    }

    /// The metadata root
    #[must_use]
    pub fn root(&self) -> &Root {
        self.with_data(|data| &data.root)
    }

    /// The tables stream
    #[must_use]
    pub fn tables(&self) -> Option<&TablesHeader> {
        self.with_data(|data| data.tables.as_ref())
    }

    /// The string at `index` of `#Strings`; index `0` is the empty string
    ///
    /// # Errors
    /// Returns an error if the heap is missing or `index` is invalid.
    pub fn string(&self, index: u32) -> Result<&str> {
        self.with_data(|data| match &data.strings {
            Some(strings) => strings.get(index as usize),
            None if index == 0 => Ok(""),
            None => Err(malformed_error!("Module has no #Strings heap")),
        })
    }

    /// The blob at `index` of `#Blob`; index `0` is the empty blob
    ///
    /// # Errors
    /// Returns an error if the heap is missing or `index` is invalid.
    pub fn blob(&self, index: u32) -> Result<&[u8]> {
        self.with_data(|data| match &data.blobs {
            Some(blobs) => blobs.get(index as usize),
            None if index == 0 => Ok(&[][..]),
            None => Err(malformed_error!("Module has no #Blob heap")),
        })
    }

    /// The GUID at 1-based `index` of `#GUID`
    ///
    /// # Errors
    /// Returns an error if the heap is missing or `index` is invalid.
    pub fn guid(&self, index: u32) -> Result<uguid::Guid> {
        self.with_data(|data| match &data.guids {
            Some(guids) => guids.get(index as usize),
            None => Err(malformed_error!("Module has no #GUID heap")),
        })
    }

    /// Number of rows in `table`
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.tables().map_or(0, |tables| tables.row_count(table))
    }

    /// The row with 1-based `rid`, `None` if it does not exist or can not be decoded
    #[must_use]
    pub fn row<T>(&self, rid: u32) -> Option<T>
    where
        T: RowReadable,
        for<'a> TablesHeader<'a>: TableAccess<'a, T>,
    {
        self.with_data(|data| data.tables.as_ref()?.table::<T>()?.get(rid))
    }

    /// All rows of a table in table order
    #[must_use]
    pub fn rows<T>(&self) -> Vec<T>
    where
        T: RowReadable,
        for<'a> TablesHeader<'a>: TableAccess<'a, T>,
    {
        self.filter_rows(|_| true)
    }

    /// All rows of a table matching `predicate`, in table order
    #[must_use]
    pub fn filter_rows<T, F>(&self, mut predicate: F) -> Vec<T>
    where
        T: RowReadable,
        F: FnMut(&T) -> bool,
        for<'a> TablesHeader<'a>: TableAccess<'a, T>,
    {
        self.with_data(|data| {
            let Some(table) = data.tables.as_ref().and_then(|tables| tables.table::<T>()) else {
                return Vec::new();
            };

            table.iter().filter(|row| predicate(row)).collect()
        })
    }

    /// The module name: the `Assembly` row name, or the `Module` row name without its extension
    ///
    /// # Errors
    /// Returns an error if the name can not be read.
    pub fn name(&self) -> Result<String> {
        if let Some(assembly) = self.row::<AssemblyRaw>(1) {
            return Ok(self.string(assembly.name)?.to_string());
        }

        let Some(module) = self.row::<ModuleRaw>(1) else {
            return Err(malformed_error!("Module table is empty"));
        };

        let name = self.string(module.name)?;
        let stem = [".dll", ".exe", ".winmd", ".netmodule"]
            .iter()
            .find_map(|extension| {
                let split = name.len().checked_sub(extension.len())?;
                name.get(split..)?
                    .eq_ignore_ascii_case(extension)
                    .then(|| &name[..split])
            })
            .unwrap_or(name);

        Ok(stem.to_string())
    }

    /// The module version id, if present
    #[must_use]
    pub fn mvid(&self) -> Option<uguid::Guid> {
        let module = self.row::<ModuleRaw>(1)?;
        self.guid(module.mvid).ok()
    }

    /// `true` if an `Assembly` row is present
    #[must_use]
    pub fn is_assembly(&self) -> bool {
        self.row_count(TableId::Assembly) > 0
    }

    fn member_range(start: u32, next: Option<u32>, count: u32) -> Range<u32> {
        if start == 0 || start > count {
            return 0..0;
        }

        let end = next.unwrap_or(count + 1).min(count + 1);
        if end <= start {
            return start..start;
        }

        start..end
    }

    /// Field rows owned by the type `type_rid`
    #[must_use]
    pub fn field_range(&self, type_rid: u32) -> Range<u32> {
        let Some(type_def) = self.row::<TypeDefRaw>(type_rid) else {
            return 0..0;
        };
        let next = self
            .row::<TypeDefRaw>(type_rid + 1)
            .map(|next| next.field_list);

        Self::member_range(type_def.field_list, next, self.row_count(TableId::Field))
    }

    /// Method rows owned by the type `type_rid`
    #[must_use]
    pub fn method_range(&self, type_rid: u32) -> Range<u32> {
        let Some(type_def) = self.row::<TypeDefRaw>(type_rid) else {
            return 0..0;
        };
        let next = self
            .row::<TypeDefRaw>(type_rid + 1)
            .map(|next| next.method_list);

        Self::member_range(
            type_def.method_list,
            next,
            self.row_count(TableId::MethodDef),
        )
    }

    /// Param rows owned by the method `method_rid`
    #[must_use]
    pub fn param_range(&self, method_rid: u32) -> Range<u32> {
        let Some(method) = self.row::<MethodDefRaw>(method_rid) else {
            return 0..0;
        };
        let next = self
            .row::<MethodDefRaw>(method_rid + 1)
            .map(|next| next.param_list);

        Self::member_range(method.param_list, next, self.row_count(TableId::Param))
    }

    /// Property rows owned by the type `type_rid`
    #[must_use]
    pub fn property_range(&self, type_rid: u32) -> Range<u32> {
        let maps = self.rows::<PropertyMapRaw>();
        let Some(position) = maps.iter().position(|map| map.parent == type_rid) else {
            return 0..0;
        };
        let next = maps.get(position + 1).map(|next| next.property_list);

        Self::member_range(
            maps[position].property_list,
            next,
            self.row_count(TableId::Property),
        )
    }

    /// Event rows owned by the type `type_rid`
    #[must_use]
    pub fn event_range(&self, type_rid: u32) -> Range<u32> {
        let maps = self.rows::<EventMapRaw>();
        let Some(position) = maps.iter().position(|map| map.parent == type_rid) else {
            return 0..0;
        };
        let next = maps.get(position + 1).map(|next| next.event_list);

        Self::member_range(
            maps[position].event_list,
            next,
            self.row_count(TableId::Event),
        )
    }

    /// The type whose method list contains `method_rid`
    #[must_use]
    pub fn method_declaring_type(&self, method_rid: u32) -> Option<u32> {
        (1..=self.row_count(TableId::TypeDef))
            .find(|type_rid| self.method_range(*type_rid).contains(&method_rid))
    }

    /// The type whose field list contains `field_rid`
    #[must_use]
    pub fn field_declaring_type(&self, field_rid: u32) -> Option<u32> {
        (1..=self.row_count(TableId::TypeDef))
            .find(|type_rid| self.field_range(*type_rid).contains(&field_rid))
    }

    /// The constant attached to a field, parameter or property
    #[must_use]
    pub fn constant(&self, parent: Token) -> Option<ConstantRaw> {
        self.filter_rows::<ConstantRaw, _>(|row| row.parent.token == parent)
            .into_iter()
            .next()
    }

    /// Custom attributes attached to `parent`, in table order
    #[must_use]
    pub fn custom_attributes(&self, parent: Token) -> Vec<CustomAttributeRaw> {
        self.filter_rows(|row: &CustomAttributeRaw| row.parent.token == parent)
    }

    /// Generic parameters of a type or method, ordered by number
    #[must_use]
    pub fn generic_params(&self, owner: Token) -> Vec<GenericParamRaw> {
        let mut params = self.filter_rows(|row: &GenericParamRaw| row.owner.token == owner);
        params.sort_by_key(|param| param.number);
        params
    }

    /// Constraints of the generic parameter `param_rid`
    #[must_use]
    pub fn generic_param_constraints(&self, param_rid: u32) -> Vec<GenericParamConstraintRaw> {
        self.filter_rows(|row: &GenericParamConstraintRaw| row.owner == param_rid)
    }

    /// Interfaces implemented by the type `type_rid`
    #[must_use]
    pub fn interface_impls(&self, type_rid: u32) -> Vec<InterfaceImplRaw> {
        self.filter_rows(|row: &InterfaceImplRaw| row.class == type_rid)
    }

    /// Types nested directly inside `type_rid`
    #[must_use]
    pub fn nested_types(&self, type_rid: u32) -> Vec<u32> {
        self.filter_rows(|row: &NestedClassRaw| row.enclosing_class == type_rid)
            .into_iter()
            .map(|row| row.nested_class)
            .collect()
    }

    /// The type enclosing `type_rid`, `None` for top-level types
    #[must_use]
    pub fn enclosing_type(&self, type_rid: u32) -> Option<u32> {
        self.filter_rows(|row: &NestedClassRaw| row.nested_class == type_rid)
            .into_iter()
            .map(|row| row.enclosing_class)
            .find(|enclosing| *enclosing != 0)
    }

    /// Accessor methods bound to a property or event
    #[must_use]
    pub fn method_semantics(&self, association: Token) -> Vec<MethodSemanticsRaw> {
        self.filter_rows(|row: &MethodSemanticsRaw| row.association.token == association)
    }

    /// All `ExportedType` rows
    #[must_use]
    pub fn exported_types(&self) -> Vec<ExportedTypeRaw> {
        self.rows()
    }

    /// All `AssemblyRef` rows
    #[must_use]
    pub fn assembly_refs(&self) -> Vec<AssemblyRefRaw> {
        self.rows()
    }
}
