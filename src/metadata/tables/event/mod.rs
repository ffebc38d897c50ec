//! The `Event` table (0x14).

mod reader;

use crate::metadata::{tables::CodedIndex, token::Token};

/// `EventAttributes`: the event has a special name
pub const EVENT_SPECIAL_NAME: u32 = 0x0200;
/// `EventAttributes`: the runtime checks the name encoding
pub const EVENT_RT_SPECIAL_NAME: u32 = 0x0400;

/// One row of the `Event` table
#[derive(Clone, Debug)]
pub struct EventRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `EventAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// a `TypeDefOrRef` coded index: the delegate type of the event
    pub event_type: CodedIndex,
}
