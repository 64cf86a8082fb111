//! Engine core: the single state container the host drives.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the mask store, the draft builder, the active interaction
//! mode, and the selection. The host calls one method per user gesture and
//! gets back a `Vec<Action>` describing what happened; an empty vector means
//! the call was rejected (locked mask, stale drag event, index out of range,
//! wrong mode) and nothing changed. Nothing here returns an error or panics.
//!
//! Drafting, point editing, move and rotate are mutually exclusive. Starting
//! any of them ends whichever one was active.
//!
//! Point editing flattens the mask on entry and leaves it flattened on exit.
//! The pre-flatten transform is kept on the mode for inspection only.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info, warn};

use crate::camera::{Point, ViewContext};
use crate::config::EngineConfig;
use crate::doc::MaskStore;
use crate::draft::{Draft, DraftBuilder};
use crate::hit;
use crate::input::{DragSession, InteractionMode, ModeKind};
use crate::mask::{HandleSide, Mask, MaskId, MaskPoint, MaskType, now_ms};
use crate::remote::{RemoteStore, StoreError};

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// What a [`Notification`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    MaskCreated,
    MaterialAssigned,
}

/// Structured payload for the notification collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub mask_id: MaskId,
    pub message: String,
    pub severity: Severity,
}

/// Actions returned from engine calls for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A mask was committed to the store.
    MaskCreated(Mask),
    /// A mask changed in a way worth persisting.
    MaskUpdated(Mask),
    /// A mask was removed locally.
    MaskDeleted { id: MaskId },
    /// The draft was started, extended, shortened, or discarded.
    DraftChanged,
    /// The active interaction mode changed.
    ModeChanged(ModeKind),
    /// The selected mask changed.
    SelectionChanged(Option<MaskId>),
    /// Something for the notification collaborator.
    Notify(Notification),
    /// Transient visual change; redraw without persisting.
    RenderNeeded,
}

/// Input for the batch create path.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskSpec {
    /// Defaults to `"{prefix} {order}"` when `None`.
    pub name: Option<String>,
    pub mask_type: MaskType,
    pub points: Vec<MaskPoint>,
}

/// Core engine state.
pub struct EngineCore {
    store: MaskStore,
    draft: DraftBuilder,
    mode: InteractionMode,
    selected_id: Option<MaskId>,
    config: EngineConfig,
    clock: fn() -> i64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: MaskStore::new(),
            draft: DraftBuilder::new(config.min_segment_px),
            mode: InteractionMode::Idle,
            selected_id: None,
            config,
            clock: now_ms,
        }
    }

    /// Replace the timestamp source used for `created_at` / `last_modified`.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    // --- Data inputs ---

    /// Replace every mask with a snapshot. Ends any mode and draft.
    pub fn load_snapshot(&mut self, masks: Vec<Mask>) {
        self.mode = InteractionMode::Idle;
        self.draft.cancel();
        self.selected_id = None;
        info!(count = masks.len(), "loaded mask snapshot");
        self.store.load_snapshot(masks);
    }

    /// Commit several masks at once. Specs with too few points for their
    /// type are skipped.
    pub fn create_masks(&mut self, specs: Vec<MaskSpec>) -> Vec<Action> {
        let now = self.now();
        let mut actions = Vec::new();
        let mut created = 0_usize;
        for spec in specs {
            if spec.points.len() < spec.mask_type.min_points() {
                debug!(count = spec.points.len(), "batch create: skipping mask with too few points");
                continue;
            }
            let order = self.store.next_order();
            let name = spec.name.unwrap_or_else(|| format!("{} {order}", self.config.name_prefix));
            let mask = Mask::new(name, spec.mask_type, spec.points, order, now);
            actions.push(Action::MaskCreated(mask.clone()));
            actions.push(Action::Notify(created_notification(&mask)));
            self.store.insert(mask);
            created += 1;
        }
        if created > 0 {
            info!(count = created, "batch created masks");
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Drafting ---

    /// Start a new draft, ending any active mode.
    pub fn begin_draft(&mut self, mode: MaskType) -> Vec<Action> {
        let mut actions = self.exit_mode();
        actions.retain(|a| !matches!(a, Action::ModeChanged(_)));
        let id = self.draft.begin(mode).id;
        debug!(%id, ?mode, "draft started");
        actions.push(Action::ModeChanged(ModeKind::Drafting));
        actions.push(Action::DraftChanged);
        actions
    }

    /// Append a pointer event to the draft.
    pub fn append_draft_point(&mut self, client: Point, view: &ViewContext) -> Vec<Action> {
        self.append_draft_image_point(view.to_image(client))
    }

    /// Append an image-space point to the draft.
    pub fn append_draft_image_point(&mut self, pt: Point) -> Vec<Action> {
        if self.draft.append_image(pt) { vec![Action::DraftChanged] } else { Vec::new() }
    }

    /// Remove the last draft point.
    pub fn pop_draft_point(&mut self) -> Vec<Action> {
        if self.draft.pop() { vec![Action::DraftChanged] } else { Vec::new() }
    }

    /// Discard the draft.
    pub fn cancel_draft(&mut self) -> Vec<Action> {
        if self.draft.cancel() {
            debug!("draft cancelled");
            vec![Action::DraftChanged, Action::ModeChanged(ModeKind::Idle)]
        } else {
            Vec::new()
        }
    }

    /// Commit the draft as a mask and select it. No-op with fewer than three points.
    pub fn finalize_draft(&mut self) -> Vec<Action> {
        let now = self.now();
        let store = &mut self.store;
        let Some(mask) = self.draft.finalize(&self.config.name_prefix, || store.next_order(), now) else {
            return Vec::new();
        };
        let id = mask.id;
        info!(%id, points = mask.points.len(), order = mask.order, "mask created");
        let notification = created_notification(&mask);
        self.store.insert(mask.clone());
        self.selected_id = Some(id);
        vec![
            Action::DraftChanged,
            Action::ModeChanged(ModeKind::Idle),
            Action::MaskCreated(mask),
            Action::SelectionChanged(Some(id)),
            Action::Notify(notification),
        ]
    }

    // --- Deletion ---

    /// Remove a mask locally, then tell the remote store.
    ///
    /// Local removal always stands. A remote `NotFound` is treated as already
    /// deleted; other remote errors are logged only.
    pub fn delete_mask(&mut self, id: &MaskId, remote: &dyn RemoteStore) -> Vec<Action> {
        if self.store.get(id).is_none_or(|m| m.is_locked) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.mode.target().as_ref() == Some(id) {
            self.mode = InteractionMode::Idle;
            actions.push(Action::ModeChanged(ModeKind::Idle));
        }
        self.store.remove(id);
        actions.push(Action::MaskDeleted { id: *id });
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        info!(%id, "mask deleted");

        match remote.delete_mask(*id) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => debug!(%id, "remote copy already gone"),
            Err(e) => warn!(error = %e, %id, "remote delete failed; keeping local removal"),
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Selection ---

    /// Select a mask. Unknown ids are ignored.
    pub fn select(&mut self, id: &MaskId) -> Vec<Action> {
        if !self.store.contains(id) || self.selected_id.as_ref() == Some(id) {
            return Vec::new();
        }
        self.selected_id = Some(*id);
        vec![Action::SelectionChanged(Some(*id))]
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selected_id.take().is_some() { vec![Action::SelectionChanged(None)] } else { Vec::new() }
    }

    // --- Mask metadata ---

    /// Apply `f` to an unlocked mask, stamp it, and report the update.
    fn edit_unlocked(&mut self, id: &MaskId, f: impl FnOnce(&mut Mask)) -> Vec<Action> {
        let now = self.now();
        let Some(mask) = self.store.get_mut(id).filter(|m| !m.is_locked) else {
            return Vec::new();
        };
        f(mask);
        mask.touch(now);
        vec![Action::MaskUpdated(mask.clone())]
    }

    /// Assign a material to a mask.
    pub fn assign_material(&mut self, id: &MaskId, material_id: impl Into<String>) -> Vec<Action> {
        let material_id = material_id.into();
        let mut actions = self.edit_unlocked(id, |m| m.material_id = Some(material_id.clone()));
        if let Some(Action::MaskUpdated(mask)) = actions.first() {
            info!(%id, material = %material_id, "material assigned");
            let notification = Notification {
                kind: NotificationKind::MaterialAssigned,
                mask_id: *id,
                message: format!("{material_id} assigned to {}", mask.name),
                severity: Severity::Info,
            };
            actions.push(Action::Notify(notification));
        }
        actions
    }

    pub fn rename(&mut self, id: &MaskId, name: impl Into<String>) -> Vec<Action> {
        let name = name.into();
        self.edit_unlocked(id, |m| m.name = name)
    }

    pub fn set_visible(&mut self, id: &MaskId, visible: bool) -> Vec<Action> {
        let mut actions = self.edit_unlocked(id, |m| m.is_visible = visible);
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Lock or unlock a mask. Locking ends any mode bound to it, abandoning
    /// a drag in progress.
    pub fn set_locked(&mut self, id: &MaskId, locked: bool) -> Vec<Action> {
        if self.store.get(id).is_none_or(|m| m.is_locked == locked) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if locked && self.mode.target().as_ref() == Some(id) {
            actions.extend(self.exit_mode());
        }
        let now = self.now();
        if let Some(mask) = self.store.get_mut(id) {
            mask.is_locked = locked;
            mask.touch(now);
            info!(%id, locked, "mask lock changed");
            actions.push(Action::MaskUpdated(mask.clone()));
        }
        actions
    }

    /// Move a mask one step up in draw order.
    pub fn bring_forward(&mut self, id: &MaskId) -> Vec<Action> {
        self.reorder(id, true)
    }

    /// Move a mask one step down in draw order.
    pub fn send_backward(&mut self, id: &MaskId) -> Vec<Action> {
        self.reorder(id, false)
    }

    fn reorder(&mut self, id: &MaskId, forward: bool) -> Vec<Action> {
        if self.store.get(id).is_none_or(|m| m.is_locked) {
            return Vec::new();
        }
        let Some(changed) = self.store.swap_z(id, forward) else {
            return Vec::new();
        };
        let mut actions: Vec<Action> =
            changed.iter().filter_map(|i| self.store.get(i)).cloned().map(Action::MaskUpdated).collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Mode lifecycle ---

    /// Leave whichever mode or draft is active. A drag in progress is
    /// cancelled and its baseline restored.
    pub fn exit_mode(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let had_draft = self.draft.cancel();
        if had_draft {
            actions.push(Action::DraftChanged);
        }
        let previous = std::mem::take(&mut self.mode);
        match previous {
            InteractionMode::Idle => {}
            InteractionMode::PointEdit { target, .. } => {
                debug!(%target, "point edit exited; geometry stays flattened");
                if let Some(mask) = self.store.get(&target) {
                    actions.push(Action::MaskUpdated(mask.clone()));
                }
            }
            InteractionMode::Move(mut session) => {
                let target = session.target();
                if let Some(baseline) = session.cancel(&target) {
                    self.with_mask(&target, |m| m.set_position(baseline));
                    actions.push(Action::RenderNeeded);
                }
            }
            InteractionMode::Rotate(mut session) => {
                let target = session.target();
                if let Some(baseline) = session.cancel(&target) {
                    self.with_mask(&target, |m| m.set_rotation(baseline));
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        if had_draft || previous.kind() != ModeKind::Idle {
            actions.push(Action::ModeChanged(ModeKind::Idle));
        }
        actions
    }

    /// Escape: cancel a drag if one is in flight, otherwise leave the mode or draft.
    pub fn cancel(&mut self) -> Vec<Action> {
        let mode = self.mode;
        match mode {
            InteractionMode::Move(session) if session.is_dragging() => self.cancel_drag(&session.target()),
            InteractionMode::Rotate(session) if session.is_dragging() => self.cancel_drag(&session.target()),
            InteractionMode::Idle if !self.draft.is_drafting() => Vec::new(),
            _ => self.exit_mode(),
        }
    }

    /// Enter a mode bound to an unlocked mask, leaving any other mode first.
    fn enter(&mut self, id: &MaskId, make: impl FnOnce(&Mask) -> InteractionMode) -> Vec<Action> {
        let Some(mask) = self.store.get(id).filter(|m| !m.is_locked) else {
            return Vec::new();
        };
        let mode = make(mask);
        let mut actions = self.exit_mode();
        actions.retain(|a| !matches!(a, Action::ModeChanged(_)));
        self.mode = mode;
        debug!(%id, mode = ?mode.kind(), "mode entered");
        actions.push(Action::ModeChanged(mode.kind()));
        actions
    }

    fn with_mask(&mut self, id: &MaskId, f: impl FnOnce(&mut Mask) -> bool) -> Option<&Mask> {
        let mask = self.store.get_mut(id)?;
        if f(mask) { Some(mask) } else { None }
    }

    // --- Point editing ---

    /// Enter point editing. Folds the mask's transform into its vertices.
    pub fn enter_point_edit(&mut self, id: &MaskId) -> Vec<Action> {
        let mut actions = self.enter(id, |m| InteractionMode::PointEdit {
            target: m.id,
            original_position: m.position,
            original_rotation: m.rotation,
        });
        if actions.is_empty() {
            return actions;
        }
        if let Some(mask) = self.with_mask(id, Mask::flatten) {
            actions.push(Action::MaskUpdated(mask.clone()));
        }
        actions
    }

    /// Transform the mask had before point editing flattened it.
    #[must_use]
    pub fn point_edit_origin(&self) -> Option<(Point, f64)> {
        match self.mode {
            InteractionMode::PointEdit { original_position, original_rotation, .. } => {
                Some((original_position, original_rotation))
            }
            _ => None,
        }
    }

    fn point_edit(&mut self, id: &MaskId, f: impl FnOnce(&mut Mask, i64) -> bool) -> Vec<Action> {
        if !self.mode.is_point_editing(id) {
            return Vec::new();
        }
        let now = self.now();
        match self.with_mask(id, |m| f(m, now)) {
            Some(mask) => vec![Action::MaskUpdated(mask.clone())],
            None => Vec::new(),
        }
    }

    pub fn update_point(&mut self, id: &MaskId, index: usize, to: Point) -> Vec<Action> {
        self.point_edit(id, |m, now| m.update_point(index, to, now))
    }

    /// Insert a vertex so it lands at `index` (`0..=len`).
    pub fn add_point(&mut self, id: &MaskId, index: usize, at: Point) -> Vec<Action> {
        self.point_edit(id, |m, now| m.add_point(index, at, now))
    }

    pub fn remove_point(&mut self, id: &MaskId, index: usize) -> Vec<Action> {
        self.point_edit(id, |m, now| m.remove_point(index, now))
    }

    pub fn toggle_point_curve(&mut self, id: &MaskId, index: usize) -> Vec<Action> {
        let ratio = self.config.handle_ratio;
        self.point_edit(id, |m, now| m.toggle_point_curve(index, ratio, now))
    }

    pub fn update_bezier_handle(&mut self, id: &MaskId, index: usize, side: HandleSide, to: Point) -> Vec<Action> {
        self.point_edit(id, |m, now| m.update_bezier_handle(index, side, to, now))
    }

    // --- Move ---

    pub fn enter_move_mode(&mut self, id: &MaskId) -> Vec<Action> {
        self.enter(id, |m| InteractionMode::Move(DragSession::arm(m.id)))
    }

    /// Pointer-down in move mode. `start` is the pointer's image-space position.
    pub fn start_move(&mut self, id: &MaskId, start: Point) -> Vec<Action> {
        let Some(baseline) = self.store.get(id).filter(|m| !m.is_locked).map(|m| m.position) else {
            return Vec::new();
        };
        match &mut self.mode {
            InteractionMode::Move(session) => {
                if session.start(id, start, baseline) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            _ => Vec::new(),
        }
    }

    /// Pointer-move in move mode: position = baseline + `delta`.
    pub fn update_move(&mut self, id: &MaskId, delta: Point) -> Vec<Action> {
        let InteractionMode::Move(session) = self.mode else {
            return Vec::new();
        };
        let Some(position) = session.value_for_delta(id, delta) else {
            return Vec::new();
        };
        match self.with_mask(id, |m| m.set_position(position)) {
            Some(_) => vec![Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Pointer-move in move mode, with the delta taken from the pointer-down position.
    pub fn update_move_to(&mut self, id: &MaskId, current: Point) -> Vec<Action> {
        let InteractionMode::Move(session) = self.mode else {
            return Vec::new();
        };
        match session.delta_to(id, current) {
            Some(delta) => self.update_move(id, delta),
            None => Vec::new(),
        }
    }

    /// Pointer-up in move mode: commit and stamp `last_modified`.
    pub fn end_move(&mut self, id: &MaskId) -> Vec<Action> {
        self.end_drag(id, ModeKind::Move)
    }

    // --- Rotate ---

    pub fn enter_rotate_mode(&mut self, id: &MaskId) -> Vec<Action> {
        self.enter(id, |m| InteractionMode::Rotate(DragSession::arm(m.id)))
    }

    /// Pointer-down in rotate mode. `start_deg` is the pointer's angle about the pivot.
    pub fn start_rotate(&mut self, id: &MaskId, start_deg: f64) -> Vec<Action> {
        let Some(baseline) = self.store.get(id).filter(|m| !m.is_locked).map(|m| m.rotation) else {
            return Vec::new();
        };
        match &mut self.mode {
            InteractionMode::Rotate(session) => {
                if session.start(id, start_deg, baseline) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            _ => Vec::new(),
        }
    }

    /// Pointer-move in rotate mode: rotation = baseline + `delta_deg`, unwrapped.
    pub fn update_rotate(&mut self, id: &MaskId, delta_deg: f64) -> Vec<Action> {
        let InteractionMode::Rotate(session) = self.mode else {
            return Vec::new();
        };
        let Some(rotation) = session.value_for_delta(id, delta_deg) else {
            return Vec::new();
        };
        match self.with_mask(id, |m| m.set_rotation(rotation)) {
            Some(_) => vec![Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Pointer-move in rotate mode, with the delta taken from the pointer-down angle.
    pub fn update_rotate_to(&mut self, id: &MaskId, current_deg: f64) -> Vec<Action> {
        let InteractionMode::Rotate(session) = self.mode else {
            return Vec::new();
        };
        match session.delta_to(id, current_deg) {
            Some(delta) => self.update_rotate(id, delta),
            None => Vec::new(),
        }
    }

    /// Pointer-up in rotate mode: commit and stamp `last_modified`.
    pub fn end_rotate(&mut self, id: &MaskId) -> Vec<Action> {
        self.end_drag(id, ModeKind::Rotate)
    }

    /// Pointer angle in degrees about a mask's absolute pivot, for rotate gestures.
    #[must_use]
    pub fn pointer_angle(&self, id: &MaskId, pt: Point) -> Option<f64> {
        let mask = self.store.get(id)?;
        let pivot = mask.centroid() + mask.position;
        Some((pt.y - pivot.y).atan2(pt.x - pivot.x).to_degrees())
    }

    // --- Drag end / cancel ---

    fn end_drag(&mut self, id: &MaskId, kind: ModeKind) -> Vec<Action> {
        let ended = match &mut self.mode {
            InteractionMode::Move(session) if kind == ModeKind::Move => session.end(id),
            InteractionMode::Rotate(session) if kind == ModeKind::Rotate => session.end(id),
            _ => false,
        };
        if !ended {
            return Vec::new();
        }
        let now = self.now();
        match self.store.get_mut(id).filter(|m| !m.is_locked) {
            Some(mask) => {
                mask.touch(now);
                debug!(%id, "drag committed");
                vec![Action::MaskUpdated(mask.clone())]
            }
            None => Vec::new(),
        }
    }

    /// Abandon the drag on `id`, restoring the value it had at pointer-down.
    pub fn cancel_drag(&mut self, id: &MaskId) -> Vec<Action> {
        let restored = match &mut self.mode {
            InteractionMode::Move(session) => session.cancel(id).map(|baseline| {
                if let Some(mask) = self.store.get_mut(id) {
                    mask.set_position(baseline);
                }
            }),
            InteractionMode::Rotate(session) => session.cancel(id).map(|baseline| {
                if let Some(mask) = self.store.get_mut(id) {
                    mask.set_rotation(baseline);
                }
            }),
            InteractionMode::Idle | InteractionMode::PointEdit { .. } => None,
        };
        if restored.is_none() {
            return Vec::new();
        }
        debug!(%id, "drag cancelled");
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// Topmost visible mask under a pointer event.
    #[must_use]
    pub fn hit_test(&self, client: Point, view: &ViewContext) -> Option<MaskId> {
        let radius = view.screen_dist_to_image(self.config.hit_slop_px);
        hit::hit_test(view.to_image(client), &self.store, radius, self.config.bezier_steps)
    }

    #[must_use]
    pub fn selection(&self) -> Option<MaskId> {
        self.selected_id
    }

    #[must_use]
    pub fn mask(&self, id: &MaskId) -> Option<&Mask> {
        self.store.get(id)
    }

    /// All masks in draw order.
    #[must_use]
    pub fn masks(&self) -> Vec<&Mask> {
        self.store.sorted_masks()
    }

    #[must_use]
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// The active mode, with drafting reported as its own kind.
    #[must_use]
    pub fn mode_kind(&self) -> ModeKind {
        if self.draft.is_drafting() { ModeKind::Drafting } else { self.mode.kind() }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.draft()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn created_notification(mask: &Mask) -> Notification {
    Notification {
        kind: NotificationKind::MaskCreated,
        mask_id: mask.id,
        message: format!("{} created", mask.name),
        severity: Severity::Success,
    }
}
