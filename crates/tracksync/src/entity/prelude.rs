//! Common re-exports for convenient entity usage.

pub use super::click::{
    ActiveModel as ClickActiveModel, Column as ClickColumn, Entity as Click, Model as ClickModel,
};
pub use super::conversion::{
    ActiveModel as ConversionActiveModel, Column as ConversionColumn, Entity as Conversion,
    Model as ConversionModel,
};
pub use super::sync_cursor::{
    ActiveModel as SyncCursorActiveModel, Column as SyncCursorColumn, Entity as SyncCursor,
    EntityKind, Model as SyncCursorModel,
};
pub use super::visit::{
    ActiveModel as VisitActiveModel, Column as VisitColumn, Entity as Visit, Model as VisitModel,
};
