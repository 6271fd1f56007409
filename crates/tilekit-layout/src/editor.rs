//! Undoable editing session over a [`TileLayout`].

use crate::commands::LayoutCommand;
use crate::history::{CommandResult, HistoryConfig, HistoryEngine, HistoryEvent};
use crate::layout::TileLayout;
use crate::masking::{MaskEvent, MaskGeometry, MaskRepository, MaskShape};
use tilekit_core::{CommandError, Dimension, Micro, Point, Rect, SubscriptionId};

/// A layout document plus its undo history.
///
/// Every mutation goes through a [`LayoutCommand`] so it can be undone.
/// Failed edits return a failed [`CommandResult`] and leave both the layout
/// and the history untouched.
#[derive(Debug)]
pub struct LayoutEditor {
    layout: TileLayout,
    history: HistoryEngine<LayoutCommand>,
}

impl LayoutEditor {
    pub fn new(layout: TileLayout, config: HistoryConfig) -> Self {
        Self {
            layout,
            history: HistoryEngine::new(config),
        }
    }

    /// Uses a pre-built history, e.g. one with a custom clock.
    pub fn with_history(layout: TileLayout, history: HistoryEngine<LayoutCommand>) -> Self {
        Self { layout, history }
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn history(&self) -> &HistoryEngine<LayoutCommand> {
        &self.history
    }

    pub fn into_layout(self) -> TileLayout {
        self.layout
    }

    pub fn set_history_config(&mut self, config: HistoryConfig) {
        self.history.set_config(config);
    }

    pub fn subscribe_history<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&HistoryEvent) + 'static,
    {
        self.history.subscribe(listener)
    }

    pub fn subscribe_masks<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MaskEvent) + 'static,
    {
        self.layout.subscribe_masks(listener)
    }

    pub fn move_tile(&mut self, tile_id: &str, dx: Micro, dy: Micro) -> CommandResult {
        self.run(LayoutCommand::move_tile(tile_id, dx, dy))
    }

    pub fn rotate_tile(&mut self, tile_id: &str, quarter_turns: i64) -> CommandResult {
        self.run(LayoutCommand::rotate_tile(tile_id, quarter_turns))
    }

    pub fn set_tile_locked(&mut self, tile_id: &str, locked: bool) -> CommandResult {
        self.run(LayoutCommand::set_tile_lock(tile_id, locked))
    }

    pub fn add_rectangle_mask(
        &mut self,
        id: &str,
        rect: Rect,
        label: Option<String>,
    ) -> CommandResult {
        self.add_mask(id, MaskGeometry::rectangle(rect), label)
    }

    pub fn add_circle_mask(
        &mut self,
        id: &str,
        center: Point,
        radius: Micro,
        label: Option<String>,
    ) -> CommandResult {
        self.add_mask(id, MaskGeometry::circle(center, radius), label)
    }

    pub fn add_polygon_mask(
        &mut self,
        id: &str,
        points: Vec<Point>,
        label: Option<String>,
    ) -> CommandResult {
        self.add_mask(id, MaskGeometry::polygon(points), label)
    }

    /// Affected ids start with the mask id, followed by the covered tiles.
    pub fn add_mask(
        &mut self,
        id: &str,
        geometry: MaskGeometry,
        label: Option<String>,
    ) -> CommandResult {
        let mut shape = MaskShape::new(id, geometry);
        shape.label = label;
        self.run(LayoutCommand::add_mask(shape))
    }

    pub fn remove_mask(&mut self, id: &str) -> CommandResult {
        self.run(LayoutCommand::remove_mask(id))
    }

    /// Moves the mask so its anchor lands on `position`.
    pub fn move_mask(&mut self, id: &str, position: Point) -> CommandResult {
        let Some(anchor) = self.layout.mask_geometry(id).map(MaskGeometry::anchor) else {
            return CommandResult::failed(CommandError::target_missing(id));
        };
        self.translate_mask(id, position.x - anchor.x, position.y - anchor.y)
    }

    pub fn translate_mask(&mut self, id: &str, dx: Micro, dy: Micro) -> CommandResult {
        self.run(LayoutCommand::move_mask(id, dx, dy))
    }

    pub fn resize_mask(&mut self, id: &str, size: Dimension) -> CommandResult {
        self.run(LayoutCommand::resize_mask(id, size))
    }

    /// Switching to the active pattern records nothing.
    pub fn change_pattern(&mut self, pattern_id: &str) -> CommandResult {
        if pattern_id == self.layout.pattern_id() {
            return match self.layout.patterns().get(pattern_id) {
                Ok(_) => CommandResult::ok(Vec::new()),
                Err(err) => CommandResult::failed(err.into()),
            };
        }
        let from = self.layout.pattern_id().to_string();
        self.run(LayoutCommand::change_pattern(from, pattern_id))
    }

    pub fn undo(&mut self) -> Option<CommandResult> {
        self.history.undo(&mut self.layout)
    }

    pub fn redo(&mut self) -> Option<CommandResult> {
        self.history.redo(&mut self.layout)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn begin_group(&mut self, description: impl Into<String>) {
        self.history.begin_group(description);
    }

    pub fn end_group(&mut self) -> Option<u64> {
        self.history.end_group()
    }

    pub fn cancel_group(&mut self) -> Vec<CommandResult> {
        self.history.cancel_group(&mut self.layout)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn run(&mut self, command: LayoutCommand) -> CommandResult {
        self.history.execute(&mut self.layout, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LayoutInput;
    use crate::layout::EngineConfig;
    use crate::pattern::registry::{LINEAR_SQUARE, STACK_BOND};

    fn editor() -> LayoutEditor {
        let input = LayoutInput::from_mm((1000, 1000), (200, 200), 0);
        let layout = TileLayout::generate(&input, LINEAR_SQUARE, &EngineConfig::default()).unwrap();
        LayoutEditor::new(layout, HistoryConfig::default())
    }

    #[test]
    fn test_move_mask_by_anchor() {
        let mut editor = editor();
        let rect = Rect::new(Point::from_mm(0, 0), Dimension::from_mm(200, 200));
        assert!(editor.add_rectangle_mask("m", rect, None).success);
        let result = editor.move_mask("m", Point::from_mm(400, 400));
        assert!(result.success);
        assert!(editor.layout().masking().is_tile_masked("tile_2_2"));
        assert!(!editor.layout().masking().is_tile_masked("tile_0_0"));

        editor.undo();
        assert!(editor.layout().masking().is_tile_masked("tile_0_0"));
    }

    #[test]
    fn test_move_unknown_mask_fails_without_recording() {
        let mut editor = editor();
        let result = editor.move_mask("ghost", Point::ORIGIN);
        assert!(!result.success);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_same_pattern_is_not_recorded() {
        let mut editor = editor();
        assert!(editor.change_pattern(LINEAR_SQUARE).success);
        assert!(!editor.can_undo());
        assert!(!editor.change_pattern("NOPE").success);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_change_pattern_undo() {
        let mut editor = editor();
        assert!(editor.change_pattern(STACK_BOND).success);
        assert_eq!(editor.layout().pattern_id(), STACK_BOND);
        editor.undo();
        assert_eq!(editor.layout().pattern_id(), LINEAR_SQUARE);
        editor.redo();
        assert_eq!(editor.layout().pattern_id(), STACK_BOND);
    }
}
