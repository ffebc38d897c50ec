use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{EventMapRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for EventMapRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* parent */        sizes.table_index_bytes(TableId::TypeDef) +
            /* event_list */    sizes.table_index_bytes(TableId::Event)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(EventMapRaw {
            rid,
            token: Token::new(0x1200_0000 + rid),
            offset: *offset,
            parent: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            event_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Event))?,
        })
    }
}
