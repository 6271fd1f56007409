//! Undo/redo.
//!
//! [`HistoryEngine`] is generic over any [`Command`]; the layout editor uses it
//! with the closed [`LayoutCommand`](crate::commands::LayoutCommand) set.

mod batch;
mod command;
mod engine;

pub use batch::BatchCommand;
pub use command::{Command, CommandResult};
pub use engine::{
    HistoryCommand, HistoryConfig, HistoryEngine, HistoryEntry, HistoryEvent, HistoryEventKind,
};
