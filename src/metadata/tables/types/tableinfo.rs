use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::types::{CodedIndexType, TableId},
    Result,
};

/// Row count of one table and the number of bits needed to index it
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits required to store a row index
    pub bits: u8,
    /// `true` if indexes into this table are 4 bytes wide
    pub is_large: bool,
}

impl TableRowInfo {
    /// Derive index width information from a row count
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Row counts and index widths of every table in one `#~` stream
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Shared handle to a [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Read row counts and heap size flags from the start of a tables stream.
    ///
    /// One `u32` row count follows the header for every bit set in `valid_bitvec`, including bits
    /// of tables this crate does not know.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the row counts are truncated.
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); TableId::COUNT];
        let mut next_row_offset = 24;

        for bit in 0..64_u8 {
            if valid_bitvec & (1 << bit) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if let Some(table_id) = TableId::from_u8(bit) {
                rows[table_id as usize] = TableRowInfo::new(row_count);
            }
        }

        let heap_size_flags = read_le::<u8>(data.get(6..).unwrap_or_default())?;

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 1 == 1,
            is_large_index_guid: heap_size_flags & 2 == 2,
            is_large_index_blob: heap_size_flags & 4 == 4,
        };

        table_info.calculate_coded_index_bits();
        Ok(table_info)
    }

    /// Build table information from explicit row counts
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::COUNT],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table_id, rows) in valid_tables {
            table_info.rows[*table_id as usize] = TableRowInfo::new(*rows);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Split a raw coded index into its table and row
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the tag selects no table.
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tables = coded_index_type.tables();
        let tag_bits = coded_index_type.tag_bits();
        let tag = value & ((1 << tag_bits) - 1);

        match tables.get(tag as usize) {
            Some(table) => Ok((*table, value >> tag_bits)),
            None => Err(malformed_error!(
                "Invalid tag {} for coded index {:?}",
                tag,
                coded_index_type
            )),
        }
    }

    /// Row count information for `table`
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// `true` if indexes into `id` are 4 bytes wide
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// `true` if `#Strings` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// `true` if `#GUID` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// `true` if `#Blob` indexes are 4 bytes wide
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a `#Strings` index
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a simple index into `table_id`
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Width of a coded index of kind `coded_index_type`
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_bits = coded_index
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index as usize] = max_bits + coded_index.tag_bits();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_index_widths() {
        let small = TableInfo::new_test(&[(TableId::TypeDef, 100)], false, false, false);
        assert_eq!(small.coded_index_bytes(CodedIndexType::TypeDefOrRef), 2);
        assert_eq!(small.table_index_bytes(TableId::TypeDef), 2);

        // 2^14 rows need 15 bits, plus two tag bits
        let wide = TableInfo::new_test(&[(TableId::TypeRef, 1 << 14)], false, false, false);
        assert_eq!(wide.coded_index_bytes(CodedIndexType::TypeDefOrRef), 4);
        assert_eq!(wide.coded_index_bytes(CodedIndexType::MethodDefOrRef), 2);
        assert_eq!(wide.coded_index_bytes(CodedIndexType::ResolutionScope), 4);
        assert_eq!(wide.table_index_bytes(TableId::TypeRef), 2);
    }

    #[test]
    fn decode() {
        let info = TableInfo::new_test(&[], false, false, false);
        assert_eq!(
            info.decode_coded_index(0x49, CodedIndexType::TypeDefOrRef)
                .unwrap(),
            (TableId::TypeRef, 0x12)
        );
        assert_eq!(
            info.decode_coded_index(0x0B, CodedIndexType::CustomAttributeType)
                .unwrap(),
            (TableId::MemberRef, 0x01)
        );
        assert!(info
            .decode_coded_index(0x03, CodedIndexType::TypeDefOrRef)
            .is_err());
    }

    #[test]
    fn from_header() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00,             // version
            0x05,                   // heap sizes: strings and blob
            0x01,                   // reserved
            0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, // valid: Module, TypeRef, TypeDef, bit 63
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00,
            0x0A, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x01, 0x00,
            0x05, 0x00, 0x00, 0x00,
        ];

        let info = TableInfo::new(&data, 0x8000_0000_0000_0007).unwrap();
        assert_eq!(info.get(TableId::Module).rows, 1);
        assert_eq!(info.get(TableId::TypeRef).rows, 10);
        assert_eq!(info.get(TableId::TypeDef).rows, 0x1_0000);
        assert!(info.is_large(TableId::TypeDef));
        assert!(info.is_large_str());
        assert!(!info.is_large_guid());
        assert!(info.is_large_blob());

        assert!(TableInfo::new(&data[..32], 0x8000_0000_0000_0007).is_err());
    }
}
