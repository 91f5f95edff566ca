//! Route editor: the single state container behind every user intent.
//!
//! The editor owns the history (and through it the committed route), the
//! loading signal and the drag state. Hosts construct one and pass it by
//! reference to whatever feeds it clicks and drags.
//!
//! Routed edits run in two phases so a host can put any transport between
//! them: `prepare_*` captures the request together with the revision it was
//! built against, and `complete` applies the response. A response whose
//! revision has been overtaken by another committed change is discarded.
//! The `append`/`relocate`/`drop_drag` shortcuts run both phases against a
//! blocking `DirectionsClient`.

use crate::append::AppendOperation;
use crate::error::{DirectionsError, EditError};
use crate::history::{DEFAULT_CAPACITY, HistoryManager, PreviewMove, Transition};
use crate::loading::{BusyGuard, LoadingSignal};
use crate::mirror::mirror;
use crate::model::RouteModel;
use crate::polyline::Coordinate;
use crate::relocate::RelocateOperation;
use crate::traits::{DirectionsClient, DirectionsResponse};

#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// History frames kept, current state included.
    pub history_capacity: usize,
    /// How far a polyline vertex may lie from a snapped waypoint and still match it.
    pub snap_tolerance_meters: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            snap_tolerance_meters: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RoutedOperation {
    Append(AppendOperation),
    Relocate(RelocateOperation),
}

/// A routed edit waiting for its directions response.
///
/// Holds the busy flag up until it is completed or dropped.
#[derive(Debug)]
pub struct PendingEdit {
    operation: RoutedOperation,
    request: Vec<Coordinate>,
    revision: u64,
    /// Drag session the edit was dropped from.
    drag_id: Option<u64>,
    _busy: BusyGuard,
}

impl PendingEdit {
    /// Waypoints to send to the directions service.
    pub fn request(&self) -> &[Coordinate] {
        &self.request
    }

    /// Revision of the committed route this edit was prepared against.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    id: u64,
    index: usize,
    /// Last on-screen position, re-applied over every new commit.
    preview: Option<Coordinate>,
}

#[derive(Debug)]
pub struct RouteEditor {
    config: EditorConfig,
    history: HistoryManager,
    loading: LoadingSignal,
    revision: u64,
    drag: Option<DragSession>,
    drags_started: u64,
}

impl Default for RouteEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default(), LoadingSignal::default())
    }
}

impl RouteEditor {
    pub fn new(config: EditorConfig, loading: LoadingSignal) -> Self {
        Self {
            history: HistoryManager::new_with_capacity(config.history_capacity),
            config,
            loading,
            revision: 0,
            drag: None,
            drags_started: 0,
        }
    }

    /// The route as it should be displayed, drag preview included.
    pub fn model(&self) -> &RouteModel {
        self.history.current()
    }

    pub fn committed(&self) -> &RouteModel {
        self.history.committed()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn loading(&self) -> &LoadingSignal {
        &self.loading
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Incremented by every change to the committed route.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Routed edits
    // ------------------------------------------------------------------

    pub fn prepare_append(&self, point: Coordinate) -> PendingEdit {
        let operation = AppendOperation::new(point);
        let request = operation.request(self.committed());
        self.pending(RoutedOperation::Append(operation), request)
    }

    pub fn prepare_relocate(
        &self,
        index: usize,
        point: Coordinate,
    ) -> Result<PendingEdit, EditError> {
        let operation = RelocateOperation::new(index, point);
        let request = operation.request(self.committed())?;
        Ok(self.pending(RoutedOperation::Relocate(operation), request))
    }

    fn pending(&self, operation: RoutedOperation, request: Vec<Coordinate>) -> PendingEdit {
        tracing::debug!(
            ?operation,
            revision = self.revision,
            waypoints = request.len(),
            "prepared routed edit"
        );
        PendingEdit {
            operation,
            request,
            revision: self.revision,
            drag_id: None,
            _busy: self.loading.begin(),
        }
    }

    /// Applies the directions result of a pending edit and commits it.
    ///
    /// On any failure the committed route is left as it was. The drag the edit
    /// was dropped from ends either way, its preview replaced by the outcome;
    /// a drag started after that keeps running over the new route. Directions and
    /// response failures emit exactly one notification; a superseded edit is
    /// discarded silently.
    pub fn complete(
        &mut self,
        pending: PendingEdit,
        result: Result<DirectionsResponse, DirectionsError>,
    ) -> Result<&RouteModel, EditError> {
        let PendingEdit {
            operation,
            revision,
            drag_id,
            _busy: busy,
            ..
        } = pending;

        let owns_drag = drag_id.is_some() && self.drag.map(|drag| drag.id) == drag_id;
        if owns_drag {
            self.drag = None;
        }

        if revision != self.revision {
            drop(busy);
            if owns_drag {
                self.history.discard_preview();
            }
            tracing::warn!(
                prepared = revision,
                current = self.revision,
                "discarding superseded routed edit"
            );
            return Err(EditError::Superseded {
                prepared: revision,
                current: self.revision,
            });
        }

        let outcome = result.map_err(EditError::from).and_then(|response| {
            let base = self.history.committed();
            match operation {
                RoutedOperation::Append(op) => op.apply(base, response),
                RoutedOperation::Relocate(op) => {
                    op.apply(base, response, self.config.snap_tolerance_meters)
                }
            }
        });
        drop(busy);

        match outcome {
            Ok(model) => Ok(self.commit(model)),
            Err(err) => {
                if owns_drag {
                    self.history.discard_preview();
                }
                if err.is_user_facing() {
                    self.loading.report(&err);
                }
                tracing::warn!(?operation, error = %err, "routed edit failed");
                Err(err)
            }
        }
    }

    /// Appends a trailing waypoint routed from the current last one.
    pub fn append<C: DirectionsClient>(
        &mut self,
        client: &C,
        point: Coordinate,
    ) -> Result<&RouteModel, EditError> {
        let pending = self.prepare_append(point);
        let result = client.route(pending.request());
        self.complete(pending, result)
    }

    /// Moves waypoint `index` to `point` and re-routes its segments.
    pub fn relocate<C: DirectionsClient>(
        &mut self,
        client: &C,
        index: usize,
        point: Coordinate,
    ) -> Result<&RouteModel, EditError> {
        let pending = self.prepare_relocate(index, point)?;
        let result = client.route(pending.request());
        self.complete(pending, result)
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Starts dragging waypoint `index`. Replaces any drag already running.
    pub fn begin_drag(&mut self, index: usize) -> Result<(), EditError> {
        let len = self.committed().waypoint_count();
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
        self.history.discard_preview();
        self.drags_started += 1;
        self.drag = Some(DragSession {
            id: self.drags_started,
            index,
            preview: None,
        });
        tracing::debug!(index, drag = self.drags_started, "drag started");
        Ok(())
    }

    /// Moves the dragged waypoint on screen only. Nothing is routed or recorded.
    pub fn drag_to(&mut self, point: Coordinate) -> Result<&RouteModel, EditError> {
        let session = self.drag.as_mut().ok_or(EditError::NoActiveDrag)?;
        session.preview = Some(point);
        let index = session.index;
        if index >= self.committed().waypoint_count() {
            self.cancel_drag();
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.committed().waypoint_count(),
            });
        }
        Ok(self.history.apply(Transition::Preview(PreviewMove {
            index,
            coordinate: point,
        })))
    }

    /// Abandons the drag; the committed route is shown again.
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            tracing::debug!("drag cancelled");
        }
        self.history.discard_preview();
    }

    /// Prepares the relocation for dropping the dragged waypoint at `point`.
    ///
    /// The preview stays visible until the edit is completed.
    pub fn prepare_drop(&mut self, point: Coordinate) -> Result<PendingEdit, EditError> {
        let session = self.drag.as_mut().ok_or(EditError::NoActiveDrag)?;
        session.preview = Some(point);
        let DragSession { id, index, .. } = *session;
        match self.prepare_relocate(index, point) {
            Ok(mut pending) => {
                pending.drag_id = Some(id);
                self.history.apply(Transition::Preview(PreviewMove {
                    index,
                    coordinate: point,
                }));
                Ok(pending)
            }
            Err(err) => {
                self.cancel_drag();
                Err(err)
            }
        }
    }

    /// Drops the dragged waypoint at `point` and commits the relocation.
    pub fn drop_drag<C: DirectionsClient>(
        &mut self,
        client: &C,
        point: Coordinate,
    ) -> Result<&RouteModel, EditError> {
        let pending = self.prepare_drop(point)?;
        let result = client.route(pending.request());
        self.complete(pending, result)
    }

    // ------------------------------------------------------------------
    // Local edits
    // ------------------------------------------------------------------

    /// Turns the route into an out-and-back. No-op below two waypoints.
    pub fn mirror(&mut self) -> Result<&RouteModel, EditError> {
        if self.committed().waypoint_count() < 2 {
            tracing::debug!("mirror skipped: fewer than two waypoints");
            return Ok(self.model());
        }
        let mirrored = mirror(self.committed())?;
        self.cancel_drag();
        Ok(self.commit(mirrored))
    }

    /// Removes every waypoint. Undoable; no-op on an empty route.
    pub fn clear(&mut self) -> &RouteModel {
        self.cancel_drag();
        if self.committed().is_empty() {
            return self.model();
        }
        self.commit(RouteModel::empty())
    }

    /// Replaces the route with an externally built snapshot and forgets history.
    pub fn load(&mut self, model: RouteModel) -> &RouteModel {
        self.cancel_drag();
        self.revision += 1;
        tracing::info!(
            revision = self.revision,
            waypoints = model.waypoint_count(),
            "route loaded"
        );
        self.history.reset(model);
        self.history.committed()
    }

    pub fn undo(&mut self) -> Option<&RouteModel> {
        self.cancel_drag();
        if !self.history.can_undo() {
            tracing::debug!("undo: nothing to do");
            return None;
        }
        self.revision += 1;
        tracing::info!(revision = self.revision, "undo");
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<&RouteModel> {
        self.cancel_drag();
        if !self.history.can_redo() {
            tracing::debug!("redo: nothing to do");
            return None;
        }
        self.revision += 1;
        tracing::info!(revision = self.revision, "redo");
        self.history.redo()
    }

    /// Records `model` and returns it. A running drag is laid over it again.
    fn commit(&mut self, model: RouteModel) -> &RouteModel {
        self.revision += 1;
        tracing::info!(
            revision = self.revision,
            waypoints = model.waypoint_count(),
            distance_meters = model.distance_meters(),
            "route committed"
        );
        self.history.apply(Transition::Commit(model));
        self.restore_drag_preview();
        self.history.committed()
    }

    fn restore_drag_preview(&mut self) {
        let Some(DragSession { index, preview, .. }) = self.drag else {
            return;
        };
        if index >= self.committed().waypoint_count() {
            self.cancel_drag();
            return;
        }
        if let Some(coordinate) = preview {
            self.history
                .apply(Transition::Preview(PreviewMove { index, coordinate }));
        }
    }
}
