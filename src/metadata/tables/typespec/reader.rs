use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{RowReadable, TableInfoRef, TypeSpecRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for TypeSpecRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(/* signature */ sizes.blob_bytes())
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeSpecRaw {
            rid,
            token: Token::new(0x1B00_0000 + rid),
            offset: *offset,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
