//! Emits small ECMA-335 metadata images for tests.
//!
//! [`ImageBuilder`] collects table rows the way `ilasm` would: members are attached to the most
//! recently added type (and parameters to the most recently added method), so a test declares a
//! type and then its fields, methods, properties and events in order. Every heap and table is
//! kept small enough for 2-byte indexes, which keeps the row encoding fixed.
//!
//! The output is either a bare `BSJB` metadata root ([`ImageBuilder::build`]) or the same root
//! wrapped in a minimal PE32 DLL with a CLR header ([`ImageBuilder::build_pe`]).
//!
//! This file only depends on `std`; it is shared between the unit tests of the crate and the
//! integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

/// Element type codes of signature blobs (II.23.1.16)
pub mod element {
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const PTR: u8 = 0x0F;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1B;
    pub const OBJECT: u8 = 0x1C;
    pub const SZARRAY: u8 = 0x1D;
    pub const MVAR: u8 = 0x1E;
    pub const CMOD_REQD: u8 = 0x1F;
    pub const CMOD_OPT: u8 = 0x20;
    pub const ENUM: u8 = 0x55;
    pub const TYPE: u8 = 0x50;
}

/// `TypeAttributes` values used by the tests
pub mod type_attr {
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    pub const PUBLIC: u32 = 0x0000_0001;
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    pub const INTERFACE: u32 = 0x0000_0020;
    pub const ABSTRACT: u32 = 0x0000_0080;
    pub const SEALED: u32 = 0x0000_0100;
    pub const BEFORE_FIELD_INIT: u32 = 0x0010_0000;
}

/// `MethodAttributes` values used by the tests
pub mod method_attr {
    pub const PRIVATE: u16 = 0x0001;
    pub const FAM_AND_ASSEM: u16 = 0x0002;
    pub const ASSEMBLY: u16 = 0x0003;
    pub const FAMILY: u16 = 0x0004;
    pub const FAM_OR_ASSEM: u16 = 0x0005;
    pub const PUBLIC: u16 = 0x0006;
    pub const STATIC: u16 = 0x0010;
    pub const FINAL: u16 = 0x0020;
    pub const VIRTUAL: u16 = 0x0040;
    pub const HIDE_BY_SIG: u16 = 0x0080;
    pub const NEW_SLOT: u16 = 0x0100;
    pub const ABSTRACT: u16 = 0x0400;
    pub const SPECIAL_NAME: u16 = 0x0800;
    pub const RT_SPECIAL_NAME: u16 = 0x1000;
}

/// `FieldAttributes` values used by the tests
pub mod field_attr {
    pub const PRIVATE: u16 = 0x0001;
    pub const ASSEMBLY: u16 = 0x0003;
    pub const FAMILY: u16 = 0x0004;
    pub const PUBLIC: u16 = 0x0006;
    pub const STATIC: u16 = 0x0010;
    pub const INIT_ONLY: u16 = 0x0020;
    pub const LITERAL: u16 = 0x0040;
    pub const SPECIAL_NAME: u16 = 0x0200;
    pub const RT_SPECIAL_NAME: u16 = 0x0400;
    pub const HAS_DEFAULT: u16 = 0x8000;
}

/// `MethodSemanticsAttributes` values
pub mod semantics {
    pub const SETTER: u16 = 0x0001;
    pub const GETTER: u16 = 0x0002;
    pub const OTHER: u16 = 0x0004;
    pub const ADD_ON: u16 = 0x0008;
    pub const REMOVE_ON: u16 = 0x0010;
    pub const FIRE: u16 = 0x0020;
}

/// Table numbers
pub mod table {
    pub const MODULE: u8 = 0x00;
    pub const TYPE_REF: u8 = 0x01;
    pub const TYPE_DEF: u8 = 0x02;
    pub const FIELD: u8 = 0x04;
    pub const METHOD_DEF: u8 = 0x06;
    pub const PARAM: u8 = 0x08;
    pub const INTERFACE_IMPL: u8 = 0x09;
    pub const MEMBER_REF: u8 = 0x0A;
    pub const CONSTANT: u8 = 0x0B;
    pub const CUSTOM_ATTRIBUTE: u8 = 0x0C;
    pub const EVENT_MAP: u8 = 0x12;
    pub const EVENT: u8 = 0x14;
    pub const PROPERTY_MAP: u8 = 0x15;
    pub const PROPERTY: u8 = 0x17;
    pub const METHOD_SEMANTICS: u8 = 0x18;
    pub const MODULE_REF: u8 = 0x1A;
    pub const TYPE_SPEC: u8 = 0x1B;
    pub const ASSEMBLY: u8 = 0x20;
    pub const ASSEMBLY_REF: u8 = 0x23;
    pub const FILE: u8 = 0x26;
    pub const EXPORTED_TYPE: u8 = 0x27;
    pub const NESTED_CLASS: u8 = 0x29;
    pub const GENERIC_PARAM: u8 = 0x2A;
    pub const GENERIC_PARAM_CONSTRAINT: u8 = 0x2C;
}

const TYPE_DEF_OR_REF: &[u8] = &[table::TYPE_DEF, table::TYPE_REF, table::TYPE_SPEC];
const HAS_CONSTANT: &[u8] = &[table::FIELD, table::PARAM, table::PROPERTY];
const HAS_CUSTOM_ATTRIBUTE: &[u8] = &[
    0x06, 0x04, 0x01, 0x02, 0x08, 0x09, 0x0A, 0x00, 0x0E, 0x17, 0x14, 0x11, 0x1A, 0x1B, 0x20, 0x23,
    0x26, 0x27, 0x28, 0x2A, 0x2C, 0x2B,
];
const MEMBER_REF_PARENT: &[u8] = &[
    table::TYPE_DEF,
    table::TYPE_REF,
    table::MODULE_REF,
    table::METHOD_DEF,
    table::TYPE_SPEC,
];
const HAS_SEMANTICS: &[u8] = &[table::EVENT, table::PROPERTY];
const CUSTOM_ATTRIBUTE_TYPE: &[u8] = &[0xFF, 0xFF, table::METHOD_DEF, table::MEMBER_REF, 0xFF];
const RESOLUTION_SCOPE: &[u8] = &[
    table::MODULE,
    table::MODULE_REF,
    table::ASSEMBLY_REF,
    table::TYPE_REF,
];
const IMPLEMENTATION: &[u8] = &[table::FILE, table::ASSEMBLY_REF, table::EXPORTED_TYPE];
const TYPE_OR_METHOD_DEF: &[u8] = &[table::TYPE_DEF, table::METHOD_DEF];

/// A row of the image under construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Row {
    pub table: u8,
    pub rid: u32,
}

impl Row {
    pub fn new(table: u8, rid: u32) -> Row {
        Row { table, rid }
    }

    /// The metadata token of this row
    pub fn token(self) -> u32 {
        (u32::from(self.table) << 24) | self.rid
    }

    /// The row as a compressed `TypeDefOrRefOrSpec` signature token
    pub fn type_def_or_ref(self) -> u32 {
        let tag = match self.table {
            table::TYPE_DEF => 0,
            table::TYPE_REF => 1,
            table::TYPE_SPEC => 2,
            other => panic!("table 0x{other:02x} is not a TypeDefOrRef"),
        };
        (self.rid << 2) | tag
    }
}

fn coded(row: Option<Row>, tables: &[u8]) -> u16 {
    let Some(row) = row else {
        return 0;
    };

    let tag = tables
        .iter()
        .position(|table| *table == row.table)
        .unwrap_or_else(|| panic!("table 0x{:02x} not valid for coded index", row.table));
    let bits = usize::BITS - (tables.len() - 1).leading_zeros();

    let value = (row.rid << bits) | tag as u32;
    u16::try_from(value).expect("coded index does not fit into 2 bytes")
}

fn small(value: u32) -> u16 {
    u16::try_from(value).expect("index does not fit into 2 bytes")
}

/// Append an ECMA-335 compressed unsigned integer
pub fn compress(out: &mut Vec<u8>, value: u32) {
    if value < 0x80 {
        out.push(value as u8);
    } else if value < 0x4000 {
        out.extend_from_slice(&(0x8000 | value as u16).to_be_bytes());
    } else {
        out.extend_from_slice(&(0xC000_0000 | value).to_be_bytes());
    }
}

/// Builder for signature blobs
#[derive(Clone, Debug, Default)]
pub struct Sig(Vec<u8>);

impl Sig {
    /// A bare type signature, as stored in `TypeSpec` rows
    pub fn ty() -> Sig {
        Sig(Vec::new())
    }

    /// A field signature; the field type follows
    pub fn field() -> Sig {
        Sig(vec![0x06])
    }

    /// A method signature header; the return type and `params` parameter types follow
    pub fn method(has_this: bool, generic_params: u32, params: u32) -> Sig {
        let mut header = if has_this { 0x20 } else { 0x00 };
        if generic_params > 0 {
            header |= 0x10;
        }

        let mut sig = Sig(vec![header]);
        if generic_params > 0 {
            compress(&mut sig.0, generic_params);
        }
        compress(&mut sig.0, params);
        sig
    }

    /// A property signature header; the property type and `params` index types follow
    pub fn property(has_this: bool, params: u32) -> Sig {
        let mut sig = Sig(vec![if has_this { 0x28 } else { 0x08 }]);
        compress(&mut sig.0, params);
        sig
    }

    pub fn byte(mut self, value: u8) -> Sig {
        self.0.push(value);
        self
    }

    pub fn prim(self, code: u8) -> Sig {
        self.byte(code)
    }

    pub fn class(mut self, row: Row) -> Sig {
        self.0.push(element::CLASS);
        compress(&mut self.0, row.type_def_or_ref());
        self
    }

    pub fn value_type(mut self, row: Row) -> Sig {
        self.0.push(element::VALUETYPE);
        compress(&mut self.0, row.type_def_or_ref());
        self
    }

    /// `GENERICINST (CLASS|VALUETYPE) row count`; `count` argument types follow
    pub fn generic_inst(mut self, value_type: bool, row: Row, count: u32) -> Sig {
        self.0.push(element::GENERICINST);
        self.0.push(if value_type {
            element::VALUETYPE
        } else {
            element::CLASS
        });
        compress(&mut self.0, row.type_def_or_ref());
        compress(&mut self.0, count);
        self
    }

    pub fn var(mut self, index: u32) -> Sig {
        self.0.push(element::VAR);
        compress(&mut self.0, index);
        self
    }

    pub fn mvar(mut self, index: u32) -> Sig {
        self.0.push(element::MVAR);
        compress(&mut self.0, index);
        self
    }

    pub fn sz_array(self) -> Sig {
        self.byte(element::SZARRAY)
    }

    pub fn ptr(self) -> Sig {
        self.byte(element::PTR)
    }

    pub fn by_ref(self) -> Sig {
        self.byte(element::BYREF)
    }

    /// `ARRAY`, the element type must follow before calling [`Sig::shape`]
    pub fn array(self) -> Sig {
        self.byte(element::ARRAY)
    }

    pub fn shape(mut self, rank: u32, sizes: &[u32], lower_bounds: &[u32]) -> Sig {
        compress(&mut self.0, rank);
        compress(&mut self.0, sizes.len() as u32);
        for size in sizes {
            compress(&mut self.0, *size);
        }
        compress(&mut self.0, lower_bounds.len() as u32);
        for bound in lower_bounds {
            compress(&mut self.0, *bound);
        }
        self
    }

    pub fn modifier(mut self, required: bool, row: Row) -> Sig {
        self.0.push(if required {
            element::CMOD_REQD
        } else {
            element::CMOD_OPT
        });
        compress(&mut self.0, row.type_def_or_ref());
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Builder for custom attribute value blobs (II.23.3)
#[derive(Clone, Debug)]
pub struct AttrBlob(Vec<u8>);

impl Default for AttrBlob {
    fn default() -> Self {
        AttrBlob::new()
    }
}

impl AttrBlob {
    /// Start a blob with the `0x0001` prolog
    pub fn new() -> AttrBlob {
        AttrBlob(vec![0x01, 0x00])
    }

    pub fn u8(mut self, value: u8) -> AttrBlob {
        self.0.push(value);
        self
    }

    pub fn u16(mut self, value: u16) -> AttrBlob {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i32(mut self, value: i32) -> AttrBlob {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(mut self, value: u32) -> AttrBlob {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn f64(mut self, value: f64) -> AttrBlob {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn string(mut self, value: Option<&str>) -> AttrBlob {
        match value {
            None => self.0.push(0xFF),
            Some(value) => {
                compress(&mut self.0, value.len() as u32);
                self.0.extend_from_slice(value.as_bytes());
            }
        }
        self
    }

    /// Write the named argument count
    pub fn named(self, count: u16) -> AttrBlob {
        self.u16(count)
    }

    /// Start a named argument: `0x53` for fields, `0x54` for properties, then its type code
    pub fn named_arg(self, property: bool, type_code: u8, name: &str) -> AttrBlob {
        self.u8(if property { 0x54 } else { 0x53 })
            .u8(type_code)
            .string(Some(name))
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Collects rows and heaps and emits a metadata image
pub struct ImageBuilder {
    strings: Vec<u8>,
    string_index: HashMap<String, u16>,
    blobs: Vec<u8>,
    guids: Vec<u8>,
    tables: BTreeMap<u8, Vec<Vec<u8>>>,
    version: String,
}

impl ImageBuilder {
    /// A new assembly image; the module is named `<name>.dll` and `<Module>` is the first type
    pub fn new(name: &str) -> ImageBuilder {
        let mut builder = ImageBuilder::module_only(&format!("{name}.dll"));

        let name = builder.string(name);
        let mut row = Vec::new();
        row.extend_from_slice(&0x8004_u32.to_le_bytes());
        for part in [1_u16, 0, 0, 0] {
            row.extend_from_slice(&part.to_le_bytes());
        }
        row.extend_from_slice(&0_u32.to_le_bytes());
        push16(&mut row, &[0, name, 0]);
        builder.push(table::ASSEMBLY, row);

        builder
    }

    /// A module without an `Assembly` row
    pub fn module_only(module_name: &str) -> ImageBuilder {
        let mut builder = ImageBuilder {
            strings: vec![0],
            string_index: HashMap::new(),
            blobs: vec![0],
            guids: Vec::new(),
            tables: BTreeMap::new(),
            version: "v4.0.30319".to_string(),
        };

        builder.guids.extend_from_slice(&[
            0x5A, 0x1B, 0x3C, 0x4D, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A,
            0x0B, 0x0C,
        ]);

        let name = builder.string(module_name);
        let mut row = Vec::new();
        push16(&mut row, &[0, name, 1, 0, 0]);
        builder.push(table::MODULE, row);

        builder.type_def(0, "", "<Module>", None);
        builder
    }

    /// Override the runtime version string of the metadata root
    pub fn version(mut self, version: &str) -> ImageBuilder {
        self.version = version.to_string();
        self
    }

    fn push(&mut self, table: u8, row: Vec<u8>) -> Row {
        let rows = self.tables.entry(table).or_default();
        rows.push(row);
        Row::new(table, rows.len() as u32)
    }

    fn count(&self, table: u8) -> u32 {
        self.tables.get(&table).map_or(0, |rows| rows.len() as u32)
    }

    /// The last row of `table`
    pub fn last(&self, table: u8) -> Row {
        let count = self.count(table);
        assert!(count > 0, "table 0x{table:02x} is empty");
        Row::new(table, count)
    }

    /// Intern `value` in the `#Strings` heap
    pub fn string(&mut self, value: &str) -> u16 {
        if value.is_empty() {
            return 0;
        }
        if let Some(index) = self.string_index.get(value) {
            return *index;
        }

        let index = small(self.strings.len() as u32);
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_index.insert(value.to_string(), index);
        index
    }

    /// Append `value` to the `#Blob` heap
    pub fn blob(&mut self, value: &[u8]) -> u16 {
        if value.is_empty() {
            return 0;
        }

        let index = small(self.blobs.len() as u32);
        compress(&mut self.blobs, value.len() as u32);
        self.blobs.extend_from_slice(value);
        index
    }

    pub fn assembly_ref(&mut self, name: &str) -> Row {
        let name = self.string(name);
        let mut row = Vec::new();
        push16(&mut row, &[4, 0, 0, 0]);
        row.extend_from_slice(&0_u32.to_le_bytes());
        push16(&mut row, &[0, name, 0, 0]);
        self.push(table::ASSEMBLY_REF, row)
    }

    pub fn module_ref(&mut self, name: &str) -> Row {
        let name = self.string(name);
        let mut row = Vec::new();
        push16(&mut row, &[name]);
        self.push(table::MODULE_REF, row)
    }

    /// The `Module` row of this image, usable as a resolution scope
    pub fn module(&self) -> Row {
        Row::new(table::MODULE, 1)
    }

    pub fn type_ref(&mut self, scope: Row, namespace: &str, name: &str) -> Row {
        let name = self.string(name);
        let namespace = self.string(namespace);
        let mut row = Vec::new();
        push16(
            &mut row,
            &[coded(Some(scope), RESOLUTION_SCOPE), name, namespace],
        );
        self.push(table::TYPE_REF, row)
    }

    /// Add a type; fields and methods added afterwards belong to it
    pub fn type_def(
        &mut self,
        flags: u32,
        namespace: &str,
        name: &str,
        extends: Option<Row>,
    ) -> Row {
        let name = self.string(name);
        let namespace = self.string(namespace);
        let field_list = small(self.count(table::FIELD) + 1);
        let method_list = small(self.count(table::METHOD_DEF) + 1);

        let mut row = Vec::new();
        row.extend_from_slice(&flags.to_le_bytes());
        push16(
            &mut row,
            &[
                name,
                namespace,
                coded(extends, TYPE_DEF_OR_REF),
                field_list,
                method_list,
            ],
        );
        self.push(table::TYPE_DEF, row)
    }

    /// Declare `nested` as nested inside `enclosing`
    pub fn nested(&mut self, nested: Row, enclosing: Row) -> Row {
        let mut row = Vec::new();
        push16(&mut row, &[small(nested.rid), small(enclosing.rid)]);
        self.push(table::NESTED_CLASS, row)
    }

    /// Add a field to the last type
    pub fn field(&mut self, flags: u16, name: &str, signature: &[u8]) -> Row {
        let name = self.string(name);
        let signature = self.blob(signature);
        let mut row = Vec::new();
        push16(&mut row, &[flags, name, signature]);
        self.push(table::FIELD, row)
    }

    /// Add a method to the last type; parameters added afterwards belong to it
    pub fn method(&mut self, flags: u16, name: &str, signature: &[u8]) -> Row {
        let name = self.string(name);
        let signature = self.blob(signature);
        let param_list = small(self.count(table::PARAM) + 1);

        let mut row = Vec::new();
        row.extend_from_slice(&0_u32.to_le_bytes());
        push16(&mut row, &[0, flags, name, signature, param_list]);
        self.push(table::METHOD_DEF, row)
    }

    /// Add a parameter to the last method; sequence `0` is the return value
    pub fn param(&mut self, sequence: u16, name: &str) -> Row {
        let name = self.string(name);
        let mut row = Vec::new();
        push16(&mut row, &[0, sequence, name]);
        self.push(table::PARAM, row)
    }

    pub fn interface_impl(&mut self, class: Row, interface: Row) -> Row {
        let mut row = Vec::new();
        push16(
            &mut row,
            &[small(class.rid), coded(Some(interface), TYPE_DEF_OR_REF)],
        );
        self.push(table::INTERFACE_IMPL, row)
    }

    pub fn member_ref(&mut self, parent: Row, name: &str, signature: &[u8]) -> Row {
        let name = self.string(name);
        let signature = self.blob(signature);
        let mut row = Vec::new();
        push16(
            &mut row,
            &[coded(Some(parent), MEMBER_REF_PARENT), name, signature],
        );
        self.push(table::MEMBER_REF, row)
    }

    /// Attach a constant of element type `element` with the raw little-endian `value`
    pub fn constant(&mut self, parent: Row, element: u8, value: &[u8]) -> Row {
        let value = self.blob(value);
        let mut row = vec![element, 0];
        push16(&mut row, &[coded(Some(parent), HAS_CONSTANT), value]);
        self.push(table::CONSTANT, row)
    }

    pub fn custom_attribute(&mut self, parent: Row, constructor: Row, value: &[u8]) -> Row {
        let value = self.blob(value);
        let mut row = Vec::new();
        push16(
            &mut row,
            &[
                coded(Some(parent), HAS_CUSTOM_ATTRIBUTE),
                coded(Some(constructor), CUSTOM_ATTRIBUTE_TYPE),
                value,
            ],
        );
        self.push(table::CUSTOM_ATTRIBUTE, row)
    }

    /// Add a property to the last type
    pub fn property(&mut self, flags: u16, name: &str, signature: &[u8]) -> Row {
        let owner = self.last(table::TYPE_DEF);
        let next = self.count(table::PROPERTY) + 1;
        if self.map_parent(table::PROPERTY_MAP) != Some(owner.rid) {
            let mut row = Vec::new();
            push16(&mut row, &[small(owner.rid), small(next)]);
            self.push(table::PROPERTY_MAP, row);
        }

        let name = self.string(name);
        let signature = self.blob(signature);
        let mut row = Vec::new();
        push16(&mut row, &[flags, name, signature]);
        self.push(table::PROPERTY, row)
    }

    /// Add an event to the last type
    pub fn event(&mut self, flags: u16, name: &str, event_type: Row) -> Row {
        let owner = self.last(table::TYPE_DEF);
        let next = self.count(table::EVENT) + 1;
        if self.map_parent(table::EVENT_MAP) != Some(owner.rid) {
            let mut row = Vec::new();
            push16(&mut row, &[small(owner.rid), small(next)]);
            self.push(table::EVENT_MAP, row);
        }

        let name = self.string(name);
        let mut row = Vec::new();
        push16(
            &mut row,
            &[flags, name, coded(Some(event_type), TYPE_DEF_OR_REF)],
        );
        self.push(table::EVENT, row)
    }

    fn map_parent(&self, map: u8) -> Option<u32> {
        let row = self.tables.get(&map)?.last()?;
        Some(u32::from(u16::from_le_bytes([row[0], row[1]])))
    }

    /// Bind `method` to a property or event
    pub fn semantics(&mut self, semantics: u16, method: Row, association: Row) -> Row {
        let mut row = Vec::new();
        push16(
            &mut row,
            &[
                semantics,
                small(method.rid),
                coded(Some(association), HAS_SEMANTICS),
            ],
        );
        self.push(table::METHOD_SEMANTICS, row)
    }

    pub fn type_spec(&mut self, signature: &[u8]) -> Row {
        let signature = self.blob(signature);
        let mut row = Vec::new();
        push16(&mut row, &[signature]);
        self.push(table::TYPE_SPEC, row)
    }

    pub fn exported_type(
        &mut self,
        flags: u32,
        namespace: &str,
        name: &str,
        implementation: Row,
    ) -> Row {
        let name = self.string(name);
        let namespace = self.string(namespace);
        let mut row = Vec::new();
        row.extend_from_slice(&flags.to_le_bytes());
        row.extend_from_slice(&0_u32.to_le_bytes());
        push16(
            &mut row,
            &[name, namespace, coded(Some(implementation), IMPLEMENTATION)],
        );
        self.push(table::EXPORTED_TYPE, row)
    }

    pub fn generic_param(&mut self, number: u16, flags: u16, owner: Row, name: &str) -> Row {
        let name = self.string(name);
        let mut row = Vec::new();
        push16(
            &mut row,
            &[number, flags, coded(Some(owner), TYPE_OR_METHOD_DEF), name],
        );
        self.push(table::GENERIC_PARAM, row)
    }

    pub fn generic_param_constraint(&mut self, owner: Row, constraint: Row) -> Row {
        let mut row = Vec::new();
        push16(
            &mut row,
            &[small(owner.rid), coded(Some(constraint), TYPE_DEF_OR_REF)],
        );
        self.push(table::GENERIC_PARAM_CONSTRAINT, row)
    }

    fn tables_stream(&self) -> Vec<u8> {
        let valid = self
            .tables
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .fold(0_u64, |valid, (table, _)| valid | (1 << table));

        let mut stream = Vec::new();
        stream.extend_from_slice(&0_u32.to_le_bytes());
        stream.extend_from_slice(&[2, 0, 0, 1]);
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0_u64.to_le_bytes());

        for rows in self.tables.values().filter(|rows| !rows.is_empty()) {
            stream.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        }
        for rows in self.tables.values() {
            for row in rows {
                stream.extend_from_slice(row);
            }
        }

        pad(&mut stream);
        stream
    }

    /// Emit a bare metadata root starting with `BSJB`
    pub fn build(&self) -> Vec<u8> {
        let mut strings = self.strings.clone();
        let mut blobs = self.blobs.clone();
        let mut guids = self.guids.clone();
        pad(&mut strings);
        pad(&mut blobs);
        pad(&mut guids);
        assert!(strings.len() <= 0xFFFF && blobs.len() <= 0xFFFF);

        let streams: [(&str, Vec<u8>); 4] = [
            ("#~", self.tables_stream()),
            ("#Strings", strings),
            ("#GUID", guids),
            ("#Blob", blobs),
        ];

        let mut version = self.version.as_bytes().to_vec();
        version.push(0);
        pad(&mut version);

        let directory_len: usize = streams
            .iter()
            .map(|(name, _)| 8 + ((name.len() + 1 + 3) & !3))
            .sum();
        let mut offset = 16 + version.len() + 4 + directory_len;

        let mut image = Vec::new();
        image.extend_from_slice(&0x424A_5342_u32.to_le_bytes());
        image.extend_from_slice(&1_u16.to_le_bytes());
        image.extend_from_slice(&1_u16.to_le_bytes());
        image.extend_from_slice(&0_u32.to_le_bytes());
        image.extend_from_slice(&(version.len() as u32).to_le_bytes());
        image.extend_from_slice(&version);
        image.extend_from_slice(&0_u16.to_le_bytes());
        image.extend_from_slice(&(streams.len() as u16).to_le_bytes());

        for (name, data) in &streams {
            image.extend_from_slice(&(offset as u32).to_le_bytes());
            image.extend_from_slice(&(data.len() as u32).to_le_bytes());
            let mut name = name.as_bytes().to_vec();
            name.push(0);
            pad(&mut name);
            image.extend_from_slice(&name);
            offset += data.len();
        }
        for (_, data) in &streams {
            image.extend_from_slice(data);
        }

        image
    }

    /// Emit a PE32 DLL with one `.text` section holding the CLR header and the metadata
    pub fn build_pe(&self) -> Vec<u8> {
        const PE_OFFSET: usize = 0x80;
        const FILE_ALIGNMENT: usize = 0x200;
        const SECTION_RVA: u32 = 0x2000;
        const COR20_SIZE: u32 = 72;

        let metadata = self.build();
        let metadata_rva = SECTION_RVA + COR20_SIZE;

        let mut section = Vec::new();
        section.extend_from_slice(&COR20_SIZE.to_le_bytes());
        section.extend_from_slice(&2_u16.to_le_bytes());
        section.extend_from_slice(&5_u16.to_le_bytes());
        section.extend_from_slice(&metadata_rva.to_le_bytes());
        section.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        section.extend_from_slice(&1_u32.to_le_bytes());
        section.extend_from_slice(&0_u32.to_le_bytes());
        section.extend_from_slice(&[0; 48]);
        section.extend_from_slice(&metadata);
        let virtual_size = section.len() as u32;
        section.resize(section.len().div_ceil(FILE_ALIGNMENT) * FILE_ALIGNMENT, 0);

        let mut image = vec![0_u8; PE_OFFSET];
        image[0] = b'M';
        image[1] = b'Z';
        image[0x3C..0x40].copy_from_slice(&(PE_OFFSET as u32).to_le_bytes());

        image.extend_from_slice(b"PE\0\0");
        // COFF header
        image.extend_from_slice(&0x014C_u16.to_le_bytes());
        image.extend_from_slice(&1_u16.to_le_bytes());
        image.extend_from_slice(&[0; 12]);
        image.extend_from_slice(&0x00E0_u16.to_le_bytes());
        image.extend_from_slice(&0x2102_u16.to_le_bytes());

        // Optional header, standard fields
        image.extend_from_slice(&0x010B_u16.to_le_bytes());
        image.extend_from_slice(&[8, 0]);
        image.extend_from_slice(&(section.len() as u32).to_le_bytes());
        image.extend_from_slice(&0_u32.to_le_bytes());
        image.extend_from_slice(&0_u32.to_le_bytes());
        image.extend_from_slice(&0_u32.to_le_bytes());
        image.extend_from_slice(&SECTION_RVA.to_le_bytes());
        image.extend_from_slice(&0_u32.to_le_bytes());
        // Windows fields
        image.extend_from_slice(&0x0040_0000_u32.to_le_bytes());
        image.extend_from_slice(&0x2000_u32.to_le_bytes());
        image.extend_from_slice(&(FILE_ALIGNMENT as u32).to_le_bytes());
        for part in [4_u16, 0, 0, 0, 4, 0] {
            image.extend_from_slice(&part.to_le_bytes());
        }
        image.extend_from_slice(&0_u32.to_le_bytes());
        let image_size = SECTION_RVA + (virtual_size.div_ceil(0x2000) * 0x2000);
        image.extend_from_slice(&image_size.to_le_bytes());
        image.extend_from_slice(&(FILE_ALIGNMENT as u32).to_le_bytes());
        image.extend_from_slice(&0_u32.to_le_bytes());
        image.extend_from_slice(&3_u16.to_le_bytes());
        image.extend_from_slice(&0x8540_u16.to_le_bytes());
        for value in [0x0010_0000_u32, 0x1000, 0x0010_0000, 0x1000, 0] {
            image.extend_from_slice(&value.to_le_bytes());
        }
        image.extend_from_slice(&16_u32.to_le_bytes());
        // Data directories, only the CLR runtime header (14) is set
        for index in 0..16 {
            if index == 14 {
                image.extend_from_slice(&SECTION_RVA.to_le_bytes());
                image.extend_from_slice(&COR20_SIZE.to_le_bytes());
            } else {
                image.extend_from_slice(&[0; 8]);
            }
        }

        // Section table
        image.extend_from_slice(b".text\0\0\0");
        image.extend_from_slice(&virtual_size.to_le_bytes());
        image.extend_from_slice(&SECTION_RVA.to_le_bytes());
        image.extend_from_slice(&(section.len() as u32).to_le_bytes());
        image.extend_from_slice(&(FILE_ALIGNMENT as u32).to_le_bytes());
        image.extend_from_slice(&[0; 12]);
        image.extend_from_slice(&0x6000_0020_u32.to_le_bytes());

        image.resize(FILE_ALIGNMENT, 0);
        image.extend_from_slice(&section);
        image
    }
}

fn push16(row: &mut Vec<u8>, values: &[u16]) {
    for value in values {
        row.extend_from_slice(&value.to_le_bytes());
    }
}

fn pad(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}
