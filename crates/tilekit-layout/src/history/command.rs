//! The reversible-edit contract.

use tilekit_core::CommandError;

/// Outcome of applying or reversing a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub success: bool,
    /// Tile or mask ids the command touched.
    pub affected_ids: Vec<String>,
    pub error: Option<CommandError>,
}

impl CommandResult {
    pub fn ok(affected_ids: Vec<String>) -> Self {
        Self {
            success: true,
            affected_ids,
            error: None,
        }
    }

    pub fn failed(error: CommandError) -> Self {
        Self {
            success: false,
            affected_ids: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<Result<Vec<String>, CommandError>> for CommandResult {
    fn from(result: Result<Vec<String>, CommandError>) -> Self {
        match result {
            Ok(ids) => CommandResult::ok(ids),
            Err(err) => CommandResult::failed(err),
        }
    }
}

/// A delta-only edit that can be applied to and reversed on its target.
///
/// Commands never hold references into the target; they resolve what they
/// touch by id every time they run.
pub trait Command {
    type Target;

    fn execute(&mut self, target: &mut Self::Target) -> CommandResult;

    fn undo(&mut self, target: &mut Self::Target) -> CommandResult;

    /// Label for undo/redo menus.
    fn description(&self) -> String;

    /// Whether `next`, executed right after `self`, may fold into it.
    fn can_merge_with(&self, _next: &Self) -> bool {
        false
    }

    /// One command with the combined effect of `self` followed by `next`.
    fn merge_with(&self, _next: &Self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}
