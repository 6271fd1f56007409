//! Composite commands.

use super::command::{Command, CommandResult};

/// Several commands applied and reversed as one undo step.
///
/// `execute` runs children in order and rolls back the ones already applied
/// if a child fails. `undo` runs children in reverse order and re-applies the
/// ones already reversed if a child fails.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCommand<C> {
    description: String,
    commands: Vec<C>,
}

impl<C: Command> BatchCommand<C> {
    pub fn new(description: impl Into<String>, commands: Vec<C>) -> Self {
        Self {
            description: description.into(),
            commands,
        }
    }

    pub fn commands(&self) -> &[C] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<C> {
        self.commands
    }
}

impl<C: Command> Command for BatchCommand<C> {
    type Target = C::Target;

    fn execute(&mut self, target: &mut Self::Target) -> CommandResult {
        let mut affected = Vec::new();
        for i in 0..self.commands.len() {
            let result = self.commands[i].execute(target);
            if !result.success {
                tracing::debug!(
                    "Batch '{}' failed at step {}, rolling back",
                    self.description,
                    i
                );
                for done in self.commands[..i].iter_mut().rev() {
                    done.undo(target);
                }
                return result;
            }
            extend_unique(&mut affected, result.affected_ids);
        }
        CommandResult::ok(affected)
    }

    fn undo(&mut self, target: &mut Self::Target) -> CommandResult {
        let mut affected = Vec::new();
        let count = self.commands.len();
        for i in (0..count).rev() {
            let result = self.commands[i].undo(target);
            if !result.success {
                tracing::debug!(
                    "Undo of batch '{}' failed at step {}, re-applying",
                    self.description,
                    i
                );
                for undone in self.commands[i + 1..].iter_mut() {
                    undone.execute(target);
                }
                return result;
            }
            extend_unique(&mut affected, result.affected_ids);
        }
        CommandResult::ok(affected)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

fn extend_unique(into: &mut Vec<String>, ids: Vec<String>) {
    for id in ids {
        if !into.contains(&id) {
            into.push(id);
        }
    }
}
