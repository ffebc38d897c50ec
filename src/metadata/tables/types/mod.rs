//! Building blocks shared by every table: ids, index widths, coded indexes and the lazily
//! decoded [`MetadataTable`] view.

mod codedindex;
mod tabledata;
mod tableid;
mod tableinfo;

use std::marker::PhantomData;

use crate::Result;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use tabledata::TableData;
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};

/// A row type that can be decoded from the bytes of its table
pub trait RowReadable: Sized + Send {
    /// Size of one row in bytes, given the index widths of the current stream
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Decode the row with 1-based `rid` at `offset`, advancing `offset` past it
    ///
    /// # Errors
    /// Returns an error if the row is truncated or contains an invalid coded index.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// Typed access to one table of a [`crate::metadata::streams::TablesHeader`]
pub trait TableAccess<'a, T: RowReadable> {
    /// The table, or `None` if the stream does not contain it
    fn table(&self) -> Option<&MetadataTable<'a, T>>;
}

/// A view over the rows of one table; rows are decoded on every access
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a view over `row_count` rows at the start of `data`
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` can not hold all rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        let Some(size) = (row_count as usize).checked_mul(row_size as usize) else {
            return Err(out_of_bounds_error!());
        };
        if size > data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(MetadataTable {
            data: &data[..size],
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decode the row with 1-based `index`; `None` for `0`, past-the-end or undecodable rows
    #[must_use]
    pub fn get(&self, index: u32) -> Option<T> {
        if index == 0 || self.row_count < index {
            return None;
        }

        T::row_read(
            self.data,
            &mut ((index as usize - 1) * self.row_size as usize),
            index,
            &self.sizes,
        )
        .ok()
    }

    /// Iterate over all rows in table order
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
            current_offset: 0,
        }
    }
}

impl<'t, 'a, T: RowReadable> IntoIterator for &'t MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential iterator over a [`MetadataTable`]; stops at the first undecodable row
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    current_row: u32,
    current_offset: usize,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        match T::row_read(
            self.table.data,
            &mut self.current_offset,
            self.current_row + 1,
            &self.table.sizes,
        ) {
            Ok(row) => {
                self.current_row += 1;
                Some(row)
            }
            Err(_) => None,
        }
    }
}
