//! Bounded undo/redo history of committed route snapshots.
//!
//! Drag previews are a separate `Transition` variant and never reach the undo
//! stack; busy toggles live in `LoadingSignal` and are not transitions at all.

use std::collections::VecDeque;
use std::mem;

use crate::model::RouteModel;
use crate::polyline::Coordinate;

/// Default number of history frames, current state included.
pub const DEFAULT_CAPACITY: usize = 10;

/// A coordinate-only move of one waypoint while it is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewMove {
    pub index: usize,
    pub coordinate: Coordinate,
}

/// A change applied to the history.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A new committed snapshot; recorded for undo.
    Commit(RouteModel),
    /// A transient overlay on the committed snapshot; never recorded.
    Preview(PreviewMove),
}

/// Undo/redo manager holding whole snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<RouteModel>,
    current: RouteModel,
    redo_stack: Vec<RouteModel>,
    preview: Option<RouteModel>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new_with_capacity(DEFAULT_CAPACITY)
    }
}

impl HistoryManager {
    /// Creates a history starting from the empty route.
    ///
    /// `capacity` counts frames including the current one; it is at least 1.
    pub fn new_with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            current: RouteModel::empty(),
            redo_stack: Vec::new(),
            preview: None,
            capacity,
        }
    }

    /// The visible state: the drag preview if any, else the committed state.
    pub fn current(&self) -> &RouteModel {
        self.preview.as_ref().unwrap_or(&self.current)
    }

    pub fn committed(&self) -> &RouteModel {
        &self.current
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of committed frames held, current state included.
    pub fn frame_count(&self) -> usize {
        self.undo_stack.len() + 1
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn apply(&mut self, transition: Transition) -> &RouteModel {
        match transition {
            Transition::Commit(model) => {
                let previous = mem::replace(&mut self.current, model);
                self.push_undo(previous);
                self.redo_stack.clear();
                self.preview = None;
            }
            Transition::Preview(PreviewMove { index, coordinate }) => {
                self.preview = Some(self.current.with_waypoint_moved(index, coordinate));
            }
        }
        self.current()
    }

    /// Drops the drag preview, showing the committed state again.
    pub fn discard_preview(&mut self) {
        self.preview = None;
    }

    /// Restores the previous committed frame.
    pub fn undo(&mut self) -> Option<&RouteModel> {
        let previous = self.undo_stack.pop_back()?;
        self.preview = None;
        let undone = mem::replace(&mut self.current, previous);
        self.redo_stack.push(undone);
        Some(&self.current)
    }

    /// Re-applies the most recently undone frame.
    pub fn redo(&mut self) -> Option<&RouteModel> {
        let next = self.redo_stack.pop()?;
        self.preview = None;
        let previous = mem::replace(&mut self.current, next);
        self.push_undo(previous);
        Some(&self.current)
    }

    /// Replaces everything with `model` as the only frame.
    pub fn reset(&mut self, model: RouteModel) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.preview = None;
        self.current = model;
    }

    fn push_undo(&mut self, model: RouteModel) {
        if self.undo_stack.len() + 1 >= self.capacity {
            self.undo_stack.pop_front();
        }
        if self.capacity > 1 {
            self.undo_stack.push_back(model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_with_waypoints(count: usize) -> RouteModel {
        let waypoints = (0..count)
            .map(|i| Coordinate::new(i as f64 * 0.001, 0.0))
            .collect::<Vec<_>>();
        let segments = waypoints
            .windows(2)
            .map(|pair| pair.to_vec().into())
            .collect::<Vec<_>>();
        RouteModel::from_parts(waypoints, segments, 0.0).unwrap()
    }

    #[test]
    fn test_empty_history_cannot_undo_or_redo() {
        let history = HistoryManager::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.frame_count(), 1);
        assert!(history.current().is_empty());
    }

    #[test]
    fn test_undo_restores_state_before_commit() {
        let mut history = HistoryManager::default();
        history.apply(Transition::Commit(route_with_waypoints(2)));
        history.apply(Transition::Commit(route_with_waypoints(3)));

        let restored = history.undo().expect("undo available");
        assert_eq!(restored.waypoint_count(), 2);
        assert!(history.can_redo());
    }

    #[test]
    fn test_redo_restores_undone_state() {
        let mut history = HistoryManager::default();
        let committed = route_with_waypoints(4);
        history.apply(Transition::Commit(committed.clone()));
        history.undo();
        assert!(history.current().is_empty());

        let redone = history.redo().expect("redo available");
        assert_eq!(redone, &committed);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_commit_clears_redo_stack() {
        let mut history = HistoryManager::default();
        history.apply(Transition::Commit(route_with_waypoints(1)));
        history.apply(Transition::Commit(route_with_waypoints(2)));
        history.undo();
        assert!(history.can_redo());

        history.apply(Transition::Commit(route_with_waypoints(5)));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_respects_capacity() {
        let mut history = HistoryManager::new_with_capacity(10);
        for i in 1..=11 {
            history.apply(Transition::Commit(route_with_waypoints(i)));
        }
        assert_eq!(history.frame_count(), 10);

        let mut undo_count = 0;
        while history.undo().is_some() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 9);
        // frames 1 and 0 (the empty start) were evicted
        assert_eq!(history.current().waypoint_count(), 2);
    }

    #[test]
    fn test_preview_overlays_without_recording() {
        let mut history = HistoryManager::default();
        history.apply(Transition::Commit(route_with_waypoints(3)));
        let frames = history.frame_count();

        let moved = Coordinate::new(5.0, 5.0);
        for step in 0..50 {
            history.apply(Transition::Preview(PreviewMove {
                index: 1,
                coordinate: Coordinate::new(step as f64, 0.0),
            }));
        }
        history.apply(Transition::Preview(PreviewMove {
            index: 1,
            coordinate: moved,
        }));

        assert_eq!(history.frame_count(), frames);
        assert!(history.has_preview());
        assert_eq!(history.current().waypoints()[1], moved);
        assert_ne!(history.committed().waypoints()[1], moved);

        history.discard_preview();
        assert_eq!(history.current(), history.committed());
    }

    #[test]
    fn test_commit_replaces_preview() {
        let mut history = HistoryManager::default();
        history.apply(Transition::Commit(route_with_waypoints(2)));
        history.apply(Transition::Preview(PreviewMove {
            index: 0,
            coordinate: Coordinate::new(9.0, 9.0),
        }));
        history.apply(Transition::Commit(route_with_waypoints(3)));
        assert!(!history.has_preview());
        assert_eq!(history.frame_count(), 3);
    }

    #[test]
    fn test_reset_leaves_single_frame() {
        let mut history = HistoryManager::default();
        history.apply(Transition::Commit(route_with_waypoints(2)));
        history.reset(route_with_waypoints(6));
        assert_eq!(history.frame_count(), 1);
        assert!(!history.can_undo());
        assert_eq!(history.current().waypoint_count(), 6);
    }
}
