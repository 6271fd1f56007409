//! Undo/redo stacks with merging, grouping and bounded depth.

use super::batch::BatchCommand;
use super::command::{Command, CommandResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tilekit_core::{ListenerRegistry, SubscriptionId};

/// History settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum undo depth; older entries are dropped.
    pub max_size: usize,
    pub merge_enabled: bool,
    /// Mergeable commands further apart than this are kept separate.
    pub merge_window_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: 100,
            merge_enabled: true,
            merge_window_ms: 1000,
        }
    }
}

/// A recorded undo step.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryCommand<C> {
    Single(C),
    Batch(BatchCommand<C>),
}

impl<C: Command> HistoryCommand<C> {
    fn execute(&mut self, target: &mut C::Target) -> CommandResult {
        match self {
            HistoryCommand::Single(cmd) => cmd.execute(target),
            HistoryCommand::Batch(batch) => batch.execute(target),
        }
    }

    fn undo(&mut self, target: &mut C::Target) -> CommandResult {
        match self {
            HistoryCommand::Single(cmd) => cmd.undo(target),
            HistoryCommand::Batch(batch) => batch.undo(target),
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, HistoryCommand::Batch(_))
    }
}

/// Undo-stack entry with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<C> {
    /// Sequential, assigned by the owning engine.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub command: HistoryCommand<C>,
}

impl<C> HistoryEntry<C> {
    pub fn is_batch(&self) -> bool {
        matches!(self.command, HistoryCommand::Batch(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEventKind {
    Executed,
    Merged,
    Undone,
    Redone,
    GroupCommitted,
    GroupCancelled,
    Cleared,
}

/// Emitted after every stack change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub kind: HistoryEventKind,
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_size: usize,
    pub redo_size: usize,
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

struct OpenGroup<C> {
    description: String,
    commands: Vec<C>,
}

/// Command history for one document.
pub struct HistoryEngine<C: Command> {
    undo_stack: VecDeque<HistoryEntry<C>>,
    redo_stack: Vec<HistoryEntry<C>>,
    config: HistoryConfig,
    next_id: u64,
    group: Option<OpenGroup<C>>,
    clock: Clock,
    listeners: ListenerRegistry<HistoryEvent>,
}

impl<C: Command> HistoryEngine<C> {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            config,
            next_id: 1,
            group: None,
            clock: Box::new(Utc::now),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Replaces the time source used for entry timestamps and merge windows.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Applies new limits, trimming the undo stack if it is now too deep.
    pub fn set_config(&mut self, config: HistoryConfig) {
        self.config = config;
        self.evict();
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&HistoryEvent) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Runs `command` and records it. Failed commands are not recorded.
    pub fn execute(&mut self, target: &mut C::Target, mut command: C) -> CommandResult {
        let result = command.execute(target);
        if !result.success {
            tracing::debug!(
                "Command '{}' failed, not recorded: {:?}",
                command.description(),
                result.error
            );
            return result;
        }

        if let Some(group) = self.group.as_mut() {
            group.commands.push(command);
            return result;
        }

        let kind = if self.try_merge(&command) {
            HistoryEventKind::Merged
        } else {
            self.push(HistoryCommand::Single(command));
            HistoryEventKind::Executed
        };
        self.notify(kind);
        result
    }

    /// Reverses the most recent entry. `None` if there is nothing to undo or
    /// a group is open.
    pub fn undo(&mut self, target: &mut C::Target) -> Option<CommandResult> {
        if self.group.is_some() {
            tracing::warn!("Undo requested while a group is open, ignoring");
            return None;
        }
        let mut entry = self.undo_stack.pop_back()?;
        let result = entry.command.undo(target);
        if result.success {
            tracing::debug!("Undone '{}'", entry.description);
            self.redo_stack.push(entry);
            self.notify(HistoryEventKind::Undone);
        } else {
            tracing::debug!("Undo of '{}' failed, entry kept", entry.description);
            self.undo_stack.push_back(entry);
        }
        Some(result)
    }

    /// Re-applies the most recently undone entry.
    pub fn redo(&mut self, target: &mut C::Target) -> Option<CommandResult> {
        if self.group.is_some() {
            tracing::warn!("Redo requested while a group is open, ignoring");
            return None;
        }
        let mut entry = self.redo_stack.pop()?;
        let result = entry.command.execute(target);
        if result.success {
            tracing::debug!("Redone '{}'", entry.description);
            self.undo_stack.push_back(entry);
            self.evict();
            self.notify(HistoryEventKind::Redone);
        } else {
            tracing::debug!("Redo of '{}' failed, entry kept", entry.description);
            self.redo_stack.push(entry);
        }
        Some(result)
    }

    /// Starts collecting executed commands into one undo step.
    pub fn begin_group(&mut self, description: impl Into<String>) {
        let description = description.into();
        if let Some(open) = &self.group {
            tracing::warn!(
                "begin_group('{}') while '{}' is open, continuing the open group",
                description,
                open.description
            );
            return;
        }
        self.group = Some(OpenGroup {
            description,
            commands: Vec::new(),
        });
    }

    /// Records the collected commands. Returns the new entry id, or `None` if
    /// no group was open or it collected nothing.
    pub fn end_group(&mut self) -> Option<u64> {
        let group = self.group.take()?;
        let mut commands = group.commands;
        let command = match commands.len() {
            0 => return None,
            1 => HistoryCommand::Single(commands.remove(0)),
            _ => HistoryCommand::Batch(BatchCommand::new(group.description, commands)),
        };
        let id = self.push(command);
        self.notify(HistoryEventKind::GroupCommitted);
        Some(id)
    }

    /// Reverses every collected command, newest first, and drops the group.
    pub fn cancel_group(&mut self, target: &mut C::Target) -> Vec<CommandResult> {
        let Some(group) = self.group.take() else {
            return Vec::new();
        };
        tracing::debug!(
            "Cancelling group '{}' ({} commands)",
            group.description,
            group.commands.len()
        );
        let results = group
            .commands
            .into_iter()
            .rev()
            .map(|mut cmd| cmd.undo(target))
            .collect();
        self.notify(HistoryEventKind::GroupCancelled);
        results
    }

    pub fn is_grouping(&self) -> bool {
        self.group.is_some()
    }

    /// Drops both stacks and any open group without touching the target.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.group = None;
        self.notify(HistoryEventKind::Cleared);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_size(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_size(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo labels, most recent first.
    pub fn undo_descriptions(&self) -> Vec<String> {
        self.undo_stack
            .iter()
            .rev()
            .map(|e| e.description.clone())
            .collect()
    }

    /// Redo labels, next redo first.
    pub fn redo_descriptions(&self) -> Vec<String> {
        self.redo_stack
            .iter()
            .rev()
            .map(|e| e.description.clone())
            .collect()
    }

    pub fn last_entry(&self) -> Option<&HistoryEntry<C>> {
        self.undo_stack.back()
    }

    /// Undo entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<C>> {
        self.undo_stack.iter()
    }

    fn try_merge(&mut self, command: &C) -> bool {
        if !self.config.merge_enabled {
            return false;
        }
        let now = (self.clock)();
        let window = Duration::milliseconds(self.config.merge_window_ms as i64);
        let Some(last) = self.undo_stack.back_mut() else {
            return false;
        };
        if now - last.timestamp > window {
            return false;
        }
        let HistoryCommand::Single(previous) = &last.command else {
            return false;
        };
        if !previous.can_merge_with(command) {
            return false;
        }
        let Some(merged) = previous.merge_with(command) else {
            return false;
        };
        last.description = merged.description();
        last.command = HistoryCommand::Single(merged);
        last.timestamp = now;
        tracing::debug!("Merged into history entry {}", last.id);
        self.redo_stack.clear();
        true
    }

    fn push(&mut self, command: HistoryCommand<C>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let description = match &command {
            HistoryCommand::Single(cmd) => cmd.description(),
            HistoryCommand::Batch(batch) => batch.description(),
        };
        self.undo_stack.push_back(HistoryEntry {
            id,
            timestamp: (self.clock)(),
            description,
            command,
        });
        self.redo_stack.clear();
        self.evict();
        id
    }

    fn evict(&mut self) {
        while self.undo_stack.len() > self.config.max_size {
            if let Some(dropped) = self.undo_stack.pop_front() {
                tracing::debug!("History full, dropped entry {}", dropped.id);
            }
        }
    }

    fn notify(&mut self, kind: HistoryEventKind) {
        let event = HistoryEvent {
            kind,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_size: self.undo_size(),
            redo_size: self.redo_size(),
        };
        tracing::debug!(
            "History {:?}: undo={} redo={}",
            kind,
            event.undo_size,
            event.redo_size
        );
        self.listeners.emit(&event);
    }
}

impl<C: Command> Default for HistoryEngine<C> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<C: Command> fmt::Debug for HistoryEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEngine")
            .field("undo_size", &self.undo_stack.len())
            .field("redo_size", &self.redo_stack.len())
            .field("config", &self.config)
            .field("grouping", &self.group.is_some())
            .finish()
    }
}
