//! SeaORM entity definitions for the tracksync database schema.

pub mod click;
pub mod conversion;
pub mod prelude;
pub mod sync_cursor;
pub mod visit;
