//! Row layouts of the tables, each read once with 2-byte and once with 4-byte indexes.

use std::sync::Arc;

use strum::IntoEnumIterator;

use super::*;
use crate::{metadata::token::Token, Error};

/// Index width and an offset that only fits the wide layout
struct Layout {
    width: u8,
    big: u32,
}

impl Layout {
    fn new(wide: bool) -> Layout {
        if wide {
            Layout {
                width: 4,
                big: 0x1_0000,
            }
        } else {
            Layout { width: 2, big: 0 }
        }
    }

    /// An index cell holding `value`, shifted past 16 bits in the wide layout
    fn index(&self, value: u32) -> (u8, u32) {
        (self.width, self.big + value)
    }

    /// A coded index cell for `row` with `tag` in the low `bits`
    fn coded(&self, bits: u8, tag: u32, row: u32) -> (u8, u32) {
        (self.width, ((self.big + row) << bits) | tag)
    }

    fn row(&self, value: u32) -> u32 {
        self.big + value
    }

    fn sizes(&self) -> TableInfoRef {
        if self.width == 2 {
            return Arc::new(TableInfo::new_test(&[], false, false, false));
        }

        let rows: Vec<(TableId, u32)> = TableId::iter().map(|id| (id, self.big)).collect();
        Arc::new(TableInfo::new_test(&rows, true, true, true))
    }

    /// Assemble `cells` into one row and read it back as `T`
    fn read<T: RowReadable>(&self, cells: &[(u8, u32)]) -> T {
        let mut data = Vec::new();
        for &(width, value) in cells {
            data.extend_from_slice(&value.to_le_bytes()[..usize::from(width)]);
        }

        let sizes = self.sizes();
        assert_eq!(T::row_size(&sizes) as usize, data.len());

        let mut offset = 0;
        let row = T::row_read(&data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(offset, data.len());

        let table = MetadataTable::<T>::new(&data, 1, sizes).unwrap();
        assert_eq!(table.iter().count(), 1);
        assert!(table.get(0).is_none());
        assert!(table.get(2).is_none());
        row
    }
}

fn layouts() -> [Layout; 2] {
    [Layout::new(false), Layout::new(true)]
}

#[test]
fn type_rows() {
    for l in layouts() {
        let row: TypeDefRaw = l.read(&[
            (4, 0x0010_0101),
            l.index(0x10),
            l.index(0x20),
            l.coded(2, 1, 7),
            l.index(3),
            l.index(4),
        ]);
        assert_eq!(row.token, Token::new(0x0200_0001));
        assert_eq!(row.flags, 0x0010_0101);
        assert_eq!(row.type_name, l.row(0x10));
        assert_eq!(row.type_namespace, l.row(0x20));
        assert_eq!(row.extends, CodedIndex::new(TableId::TypeRef, l.row(7)));
        assert_eq!(row.field_list, l.row(3));
        assert_eq!(row.method_list, l.row(4));

        let row: TypeRefRaw = l.read(&[l.coded(2, 2, 1), l.index(0x30), l.index(0x40)]);
        assert_eq!(row.token, Token::new(0x0100_0001));
        assert_eq!(
            row.resolution_scope,
            CodedIndex::new(TableId::AssemblyRef, l.row(1))
        );
        assert_eq!(row.type_name, l.row(0x30));
        assert_eq!(row.type_namespace, l.row(0x40));

        let row: TypeSpecRaw = l.read(&[l.index(0x50)]);
        assert_eq!(row.token, Token::new(0x1B00_0001));
        assert_eq!(row.signature, l.row(0x50));

        let row: NestedClassRaw = l.read(&[l.index(8), l.index(7)]);
        assert_eq!(row.nested_class, l.row(8));
        assert_eq!(row.enclosing_class, l.row(7));

        let row: InterfaceImplRaw = l.read(&[l.index(9), l.coded(2, 2, 1)]);
        assert_eq!(row.class, l.row(9));
        assert_eq!(row.interface, CodedIndex::new(TableId::TypeSpec, l.row(1)));
    }
}

#[test]
fn member_rows() {
    for l in layouts() {
        let row: FieldRaw = l.read(&[(2, 0x8056), l.index(0x11), l.index(0x12)]);
        assert_eq!(row.token, Token::new(0x0400_0001));
        assert_eq!(row.flags, 0x8056);
        assert_eq!(row.name, l.row(0x11));
        assert_eq!(row.signature, l.row(0x12));

        let row: MethodDefRaw = l.read(&[
            (4, 0x2050),
            (2, 0x0003),
            (2, 0x1886),
            l.index(0x13),
            l.index(0x14),
            l.index(2),
        ]);
        assert_eq!(row.token, Token::new(0x0600_0001));
        assert_eq!(row.rva, 0x2050);
        assert_eq!(row.impl_flags, 0x0003);
        assert_eq!(row.flags, 0x1886);
        assert_eq!(row.name, l.row(0x13));
        assert_eq!(row.signature, l.row(0x14));
        assert_eq!(row.param_list, l.row(2));

        let row: ParamRaw = l.read(&[(2, 0x1001), (2, 3), l.index(0x15)]);
        assert_eq!(row.flags, 0x1001);
        assert_eq!(row.sequence, 3);
        assert_eq!(row.name, l.row(0x15));

        let row: MemberRefRaw = l.read(&[l.coded(3, 4, 2), l.index(0x16), l.index(0x17)]);
        assert_eq!(row.token, Token::new(0x0A00_0001));
        assert_eq!(row.class, CodedIndex::new(TableId::TypeSpec, l.row(2)));
        assert_eq!(row.name, l.row(0x16));
        assert_eq!(row.signature, l.row(0x17));

        let row: ConstantRaw = l.read(&[(1, 0x08), (1, 0), l.coded(2, 0, 5), l.index(0x18)]);
        assert_eq!(row.base, 0x08);
        assert_eq!(row.parent, CodedIndex::new(TableId::Field, l.row(5)));
        assert_eq!(row.value, l.row(0x18));
    }
}

#[test]
fn property_and_event_rows() {
    for l in layouts() {
        let row: PropertyRaw = l.read(&[(2, 0x0200), l.index(0x21), l.index(0x22)]);
        assert_eq!(row.token, Token::new(0x1700_0001));
        assert_eq!(row.flags, 0x0200);
        assert_eq!(row.name, l.row(0x21));
        assert_eq!(row.signature, l.row(0x22));

        let row: PropertyMapRaw = l.read(&[l.index(4), l.index(6)]);
        assert_eq!(row.parent, l.row(4));
        assert_eq!(row.property_list, l.row(6));

        let row: EventRaw = l.read(&[(2, 0x0400), l.index(0x23), l.coded(2, 1, 3)]);
        assert_eq!(row.token, Token::new(0x1400_0001));
        assert_eq!(row.flags, 0x0400);
        assert_eq!(row.name, l.row(0x23));
        assert_eq!(row.event_type, CodedIndex::new(TableId::TypeRef, l.row(3)));

        let row: EventMapRaw = l.read(&[l.index(5), l.index(1)]);
        assert_eq!(row.parent, l.row(5));
        assert_eq!(row.event_list, l.row(1));

        let row: MethodSemanticsRaw = l.read(&[(2, 0x0002), l.index(9), l.coded(1, 1, 3)]);
        assert_eq!(row.semantics, 0x0002);
        assert_eq!(row.method, l.row(9));
        assert_eq!(row.association, CodedIndex::new(TableId::Property, l.row(3)));
    }
}

#[test]
fn generic_rows() {
    for l in layouts() {
        let row: GenericParamRaw = l.read(&[(2, 1), (2, 0x0004), l.coded(1, 1, 6), l.index(0x31)]);
        assert_eq!(row.token, Token::new(0x2A00_0001));
        assert_eq!(row.number, 1);
        assert_eq!(row.flags, 0x0004);
        assert_eq!(row.owner, CodedIndex::new(TableId::MethodDef, l.row(6)));
        assert_eq!(row.name, l.row(0x31));

        let row: GenericParamConstraintRaw = l.read(&[l.index(1), l.coded(2, 0, 2)]);
        assert_eq!(row.owner, l.row(1));
        assert_eq!(row.constraint, CodedIndex::new(TableId::TypeDef, l.row(2)));
    }
}

#[test]
fn assembly_rows() {
    for l in layouts() {
        let row: ModuleRaw = l.read(&[(2, 0), l.index(0x41), l.index(1), l.index(0), l.index(0)]);
        assert_eq!(row.token, Token::new(0x0000_0001));
        assert_eq!(row.name, l.row(0x41));
        assert_eq!(row.mvid, l.row(1));
        assert_eq!(row.encid, l.row(0));

        let row: ModuleRefRaw = l.read(&[l.index(0x42)]);
        assert_eq!(row.token, Token::new(0x1A00_0001));
        assert_eq!(row.name, l.row(0x42));

        let row: AssemblyRaw = l.read(&[
            (4, 0x8004),
            (2, 4),
            (2, 0),
            (2, 1),
            (2, 2),
            (4, 0x0001),
            l.index(0x43),
            l.index(0x44),
            l.index(0),
        ]);
        assert_eq!(row.token, Token::new(0x2000_0001));
        assert_eq!(row.hash_alg_id, 0x8004);
        assert_eq!(
            (
                row.major_version,
                row.minor_version,
                row.build_number,
                row.revision_number
            ),
            (4, 0, 1, 2)
        );
        assert_eq!(row.flags, 0x0001);
        assert_eq!(row.public_key, l.row(0x43));
        assert_eq!(row.name, l.row(0x44));
        assert_eq!(row.culture, l.row(0));

        let row: AssemblyRefRaw = l.read(&[
            (2, 2),
            (2, 0),
            (2, 0),
            (2, 0),
            (4, 0),
            l.index(0x45),
            l.index(0x46),
            l.index(0x47),
            l.index(0x48),
        ]);
        assert_eq!(row.token, Token::new(0x2300_0001));
        assert_eq!(row.major_version, 2);
        assert_eq!(row.public_key_or_token, l.row(0x45));
        assert_eq!(row.name, l.row(0x46));
        assert_eq!(row.culture, l.row(0x47));
        assert_eq!(row.hash_value, l.row(0x48));

        let row: ExportedTypeRaw = l.read(&[
            (4, EXPORTED_TYPE_FORWARDER),
            (4, 0x0200_0003),
            l.index(0x49),
            l.index(0x4A),
            l.coded(2, 1, 1),
        ]);
        assert_eq!(row.token, Token::new(0x2700_0001));
        assert_eq!(row.flags, EXPORTED_TYPE_FORWARDER);
        assert_eq!(row.type_def_id, 0x0200_0003);
        assert_eq!(row.type_name, l.row(0x49));
        assert_eq!(row.type_namespace, l.row(0x4A));
        assert_eq!(
            row.implementation,
            CodedIndex::new(TableId::AssemblyRef, l.row(1))
        );

        let row: CustomAttributeRaw = l.read(&[l.coded(5, 3, 2), l.coded(3, 3, 4), l.index(0x4B)]);
        assert_eq!(row.token, Token::new(0x0C00_0001));
        assert_eq!(row.parent, CodedIndex::new(TableId::TypeDef, l.row(2)));
        assert_eq!(row.constructor, CodedIndex::new(TableId::MemberRef, l.row(4)));
        assert_eq!(row.value, l.row(0x4B));
    }
}

#[test]
fn damaged_rows() {
    let sizes = Layout::new(false).sizes();

    // TypeDefOrRef has no table for tag 3
    let data = [0, 0, 0, 0, 1, 0, 2, 0, 0x07, 0, 1, 0, 1, 0];
    let mut offset = 0;
    assert!(matches!(
        TypeDefRaw::row_read(&data, &mut offset, 1, &sizes),
        Err(Error::Malformed { .. })
    ));

    assert!(matches!(
        MetadataTable::<TypeDefRaw>::new(&data[..10], 1, sizes.clone()),
        Err(Error::OutOfBounds)
    ));
    assert!(matches!(
        MetadataTable::<FieldRaw>::new(&data, 3, sizes),
        Err(Error::OutOfBounds)
    ));
}
