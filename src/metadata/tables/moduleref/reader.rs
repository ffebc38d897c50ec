use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{ModuleRefRaw, RowReadable, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for ModuleRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(/* name */ sizes.str_bytes())
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ModuleRefRaw {
            rid,
            token: Token::new(0x1A00_0000 + rid),
            offset: *offset,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}
