//! Snapshot-based undo/redo for scatter edits.
use crate::{message::BoundField, scatter_data::ScatterData};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// What an undo step was recorded for.
///
/// Consecutive checkpoints with the same key are merged into one step, so that
/// typing a class name or dragging a slider undoes as a single edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Stroke,
    /// The whole bounding box replaced at once.
    Bounds,
    /// One corner coordinate, as dragged on its slider.
    Bound(BoundField),
    Rename(usize),
    Recolor(usize),
    ClearClass(usize),
    DeleteClass(usize),
    AddClass,
    Replace,
}

impl EditKind {
    fn coalesces(self) -> bool {
        matches!(self, Self::Bound(_) | Self::Rename(_) | Self::Recolor(_))
    }
}

#[derive(Debug, Clone)]
/// Undo and redo stacks of dataset snapshots.
pub struct History {
    undo: Vec<(EditKind, ScatterData)>,
    redo: Vec<ScatterData>,
    limit: usize,
    /// Set by undo/redo so the next edit always opens a new step.
    sealed: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
            sealed: false,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record `before` as the state preceding an edit of `kind`.
    ///
    /// Clears the redo stack. Returns false when the checkpoint was merged
    /// into the previous step.
    pub fn checkpoint(&mut self, kind: EditKind, before: &ScatterData) -> bool {
        self.redo.clear();
        let sealed = std::mem::replace(&mut self.sealed, false);
        if !sealed
            && kind.coalesces()
            && self.undo.last().is_some_and(|(last, _)| *last == kind)
        {
            return false;
        }
        self.undo.push((kind, before.clone()));
        if self.undo.len() > self.limit {
            let overflow = self.undo.len() - self.limit;
            self.undo.drain(..overflow);
        }
        true
    }

    /// Swap `current` with the previous state. Returns the restored state.
    pub fn undo(&mut self, current: &ScatterData) -> Option<ScatterData> {
        let (_, previous) = self.undo.pop()?;
        self.redo.push(current.clone());
        self.sealed = true;
        Some(previous)
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self, current: &ScatterData) -> Option<ScatterData> {
        let next = self.redo.pop()?;
        self.undo.push((EditKind::Replace, current.clone()));
        self.sealed = true;
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.sealed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_points(n: usize) -> ScatterData {
        let mut data = ScatterData::make_default();
        data.classes[0].points = (0..n).map(|i| [i as f64, 0.0]).collect();
        data
    }

    #[test]
    fn undo_then_redo_restores_states() {
        let mut history = History::default();
        let s0 = with_points(0);
        let s1 = with_points(3);
        history.checkpoint(EditKind::Stroke, &s0);

        assert_eq!(history.undo(&s1), Some(s0.clone()));
        assert!(!history.can_undo());
        assert_eq!(history.redo(&s0), Some(s1));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut history = History::default();
        history.checkpoint(EditKind::Stroke, &with_points(0));
        history.undo(&with_points(1));
        assert!(history.can_redo());
        history.checkpoint(EditKind::Stroke, &with_points(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn strokes_never_coalesce_but_renames_do() {
        let mut history = History::default();
        let s = with_points(0);
        assert!(history.checkpoint(EditKind::Stroke, &s));
        assert!(history.checkpoint(EditKind::Stroke, &s));
        assert!(history.checkpoint(EditKind::Rename(1), &s));
        assert!(!history.checkpoint(EditKind::Rename(1), &s));
        assert!(history.checkpoint(EditKind::Rename(2), &s));
        assert_eq!(history.undo_len(), 4);
    }

    #[test]
    fn redo_breaks_coalescing() {
        let mut history = History::default();
        let s = with_points(0);
        history.checkpoint(EditKind::Bound(BoundField::MinX), &s);
        history.undo(&s);
        history.redo(&s);
        assert!(history.checkpoint(EditKind::Bound(BoundField::MinX), &s));
    }

    #[test]
    fn each_bound_slider_is_its_own_step() {
        let mut history = History::default();
        let s = with_points(0);
        assert!(history.checkpoint(EditKind::Bound(BoundField::MinX), &s));
        assert!(!history.checkpoint(EditKind::Bound(BoundField::MinX), &s));
        assert!(history.checkpoint(EditKind::Bound(BoundField::MaxY), &s));
        assert!(history.checkpoint(EditKind::Bounds, &s));
        assert!(history.checkpoint(EditKind::Bounds, &s));
        assert_eq!(history.undo_len(), 4);
    }

    #[test]
    fn undo_seals_the_previous_step() {
        let mut history = History::default();
        let s = with_points(0);
        history.checkpoint(EditKind::Bound(BoundField::MaxX), &s);
        history.checkpoint(EditKind::Stroke, &s);
        history.undo(&s);
        assert!(history.checkpoint(EditKind::Stroke, &s));
        assert_eq!(history.undo_len(), 2);
        history.undo(&s);
        assert!(history.checkpoint(EditKind::Bound(BoundField::MaxX), &s));
    }

    #[test]
    fn oldest_steps_are_dropped_past_the_limit() {
        let mut history = History::new(2);
        for n in 0..4 {
            history.checkpoint(EditKind::Stroke, &with_points(n));
        }
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(&with_points(9)), Some(with_points(3)));
        assert_eq!(history.undo(&with_points(3)), Some(with_points(2)));
        assert_eq!(history.undo(&with_points(2)), None);
    }
}
