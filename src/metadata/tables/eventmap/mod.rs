//! The `EventMap` table (0x12): maps a type to the start of its run of events.

mod reader;

use crate::metadata::token::Token;

/// One row of the `EventMap` table
#[derive(Clone, Debug)]
pub struct EventMapRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table
    pub parent: u32,
    /// first row of the contiguous run of events owned by `parent`
    pub event_list: u32,
}
