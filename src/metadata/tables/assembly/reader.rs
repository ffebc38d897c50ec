use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{AssemblyRaw, RowReadable, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for AssemblyRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* hash_alg_id */       4 +
            /* major_version */     2 +
            /* minor_version */     2 +
            /* build_number */      2 +
            /* revision_number */   2 +
            /* flags */             4 +
            /* public_key */        sizes.blob_bytes() +
            /* name */              sizes.str_bytes() +
            /* culture */           sizes.str_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRaw {
            rid,
            token: Token::new(0x2000_0000 + rid),
            offset: *offset,
            hash_alg_id: read_le_at::<u32>(data, offset)?,
            major_version: u32::from(read_le_at::<u16>(data, offset)?),
            minor_version: u32::from(read_le_at::<u16>(data, offset)?),
            build_number: u32::from(read_le_at::<u16>(data, offset)?),
            revision_number: u32::from(read_le_at::<u16>(data, offset)?),
            flags: read_le_at::<u32>(data, offset)?,
            public_key: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}
