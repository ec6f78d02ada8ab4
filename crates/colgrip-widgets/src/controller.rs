#![forbid(unsafe_code)]

//! Interactive column-resize controller.
//!
//! [`DragController`] owns the width store, the lifecycle machine and the
//! three host ports, and turns host input into width commits:
//!
//! 1. `pointer_down` on a resize handle measures the live start geometry,
//!    acquires pointer capture and enters resizing mode.
//! 2. `pointer_move` updates the session immediately and coalesces the
//!    indicator paint into at most one pending frame.
//! 3. `pointer_up` recomputes the final widths from the accumulated delta,
//!    commits them and emits [`ResizeEnd`].
//!
//! Every cancellation path (Escape, pointer cancel, blur, lost capture,
//! programmatic) soft-commits at the last known position. Teardown and
//! `Drop` discard the session without committing. Each exit path runs the
//! same cleanup: capture released if it was acquired, indicator cleared,
//! resizing mode left, pending paint discarded.
//!
//! # Example
//!
//! ```
//! use colgrip_core::capture::CaptureLog;
//! use colgrip_core::event::{PointerButton, PointerId, PointerPosition};
//! use colgrip_layout::{ColumnSpec, ResizePolicy};
//! use colgrip_widgets::{CssVariablePort, DragController, MeasuredLayout, ResizeConfig};
//!
//! let mut controller = DragController::new(
//!     ResizeConfig::default().with_policy(ResizePolicy::Fit),
//!     [
//!         ColumnSpec::text("a").min_width(50).initial_width(200),
//!         ColumnSpec::text("b").min_width(50).initial_width(300),
//!     ],
//!     CssVariablePort::new(),
//!     CaptureLog::new(),
//!     MeasuredLayout::from_widths([("a", 200), ("b", 300)]),
//! );
//! controller.initialize(None);
//!
//! let pointer = PointerId::new(1).unwrap();
//! controller.pointer_down("a", pointer, PointerButton::Primary, PointerPosition::new(200, 10));
//! controller.pointer_move(pointer, PointerPosition::new(250, 10));
//! let end = controller.pointer_up(pointer, PointerPosition::new(250, 10));
//!
//! assert_eq!(end.ended().map(|end| end.width), Some(250));
//! assert_eq!(controller.width("b"), 250);
//! ```

use std::collections::BTreeMap;

use colgrip_core::capture::InputCapture;
use colgrip_core::event::{KeyCode, KeyEvent, PointerButton, PointerId, PointerPosition};
use colgrip_core::frame_coalescer::{FrameCoalescer, Scheduling};
use colgrip_layout::{
    CancelReason, ColumnExtent, ColumnGeometry, ColumnId, ColumnSet, ColumnSpec, DragSession,
    Finished, InputSource, ResizeEffect, ResizeInput, ResizeMachine, ResizePhase, ResizePolicy,
    ResizeTransition, SessionStart, WidthSnapshot, WidthStore,
};

use crate::config::{DEFAULT_KEYBOARD_LARGE_STEP, DEFAULT_KEYBOARD_STEP, ResizeConfig};
use crate::events::{
    EndReason, IgnoredReason, ResizeBegin, ResizeDispatch, ResizeEnd, ResizeEvent, ResizeUpdate,
};
use crate::host::ColumnHost;
use crate::render::{DragIndicator, RenderPort};

/// Column-resize controller for one grid.
pub struct DragController<R: RenderPort, C: InputCapture, H: ColumnHost> {
    config: ResizeConfig,
    columns: ColumnSet,
    store: WidthStore,
    host_width: u32,
    machine: ResizeMachine,
    pending_paint: FrameCoalescer<DragIndicator>,
    /// Pointer whose capture was acquired for the active session.
    captured: Option<PointerId>,
    resizing: bool,
    events: Vec<ResizeEvent>,
    render: R,
    capture: C,
    host: H,
}

impl<R: RenderPort, C: InputCapture, H: ColumnHost> DragController<R, C, H> {
    /// Create a controller. Call [`initialize`](Self::initialize) before
    /// routing input.
    ///
    /// Invalid keyboard steps are replaced by their defaults with a warning.
    pub fn new(
        config: ResizeConfig,
        columns: impl IntoIterator<Item = ColumnSpec>,
        render: R,
        capture: C,
        host: H,
    ) -> Self {
        let config = sanitize(config);
        let columns = ColumnSet::new(columns, config.min_width_floor);
        Self {
            config,
            columns,
            store: WidthStore::new(),
            host_width: 0,
            machine: ResizeMachine::new(),
            pending_paint: FrameCoalescer::new(),
            captured: None,
            resizing: false,
            events: Vec::new(),
            render,
            capture,
            host,
        }
    }

    /// Seed the width store and paint the initial geometry.
    ///
    /// Columns missing from `measured` (or measured as 0) start at their
    /// configured initial width.
    pub fn initialize(&mut self, measured: Option<&BTreeMap<ColumnId, u32>>) {
        self.store.initialize(&self.columns, measured);
        self.host_width = self.store.total_width();
        self.render.apply_geometry(&self.store.snapshot());
        self.render.apply_host_width(self.host_width);
        tracing::debug!(
            columns = self.store.len(),
            host_width = self.host_width,
            "column widths initialized"
        );
    }

    /// [`initialize`](Self::initialize) from the host's current layout.
    pub fn initialize_from_host(&mut self) {
        let measured = self.host.measure_all(self.columns.ids());
        let measured = (!measured.is_empty()).then_some(measured);
        self.initialize(measured.as_ref());
    }

    // ── Pointer input ───────────────────────────────────────────────────

    /// Pointer pressed on the resize handle of `column_id`.
    pub fn pointer_down(
        &mut self,
        column_id: &str,
        pointer: PointerId,
        button: PointerButton,
        position: PointerPosition,
    ) -> ResizeDispatch {
        if button != self.config.activation_button {
            return ignored(IgnoredReason::ButtonNotAllowed);
        }
        if pointer.is_keyboard() {
            return ignored(IgnoredReason::ReservedPointerId);
        }
        let session = match self.prepare_session(column_id, pointer, InputSource::Pointer, position.x)
        {
            Ok(session) => session,
            Err(reason) => return ignored(reason),
        };

        let transition = self.machine.apply(ResizeInput::Begin(session));
        log_transition(&transition);
        match transition.effect {
            ResizeEffect::Armed { .. } => {}
            ResizeEffect::Noop { reason } => return ignored(reason.into()),
            _ => return ignored(IgnoredReason::ActiveSessionInProgress),
        }

        if self.capture.acquire(pointer) {
            self.captured = Some(pointer);
        } else {
            tracing::debug!(%pointer, "pointer capture unavailable; continuing without it");
        }
        self.enter_resizing();
        self.emit_begin()
    }

    /// Pointer moved. Only the session's own pointer is accepted.
    pub fn pointer_move(&mut self, pointer: PointerId, position: PointerPosition) -> ResizeDispatch {
        if !self.machine.is_active() {
            return ignored(IgnoredReason::NoActiveSession);
        }
        let transition = self.machine.apply(ResizeInput::Move {
            pointer,
            x: position.x,
        });
        log_transition(&transition);
        match transition.effect {
            ResizeEffect::DragStarted {
                resolution,
                indicator_x,
            }
            | ResizeEffect::DragUpdated {
                resolution,
                indicator_x,
            } => {
                let Some(column_id) = self.machine.session().map(|s| s.column_id.clone()) else {
                    return ignored(IgnoredReason::NoActiveSession);
                };
                let indicator = DragIndicator {
                    column_id: column_id.clone(),
                    x: indicator_x,
                    width: resolution.width,
                    next_width: resolution.next_width,
                };
                let frame_requested = match self.pending_paint.push(indicator) {
                    Scheduling::RequestFrame => {
                        self.render.request_frame();
                        true
                    }
                    Scheduling::AlreadyPending => false,
                };
                ResizeDispatch::Updated(ResizeUpdate {
                    column_id,
                    width: resolution.width,
                    next_width: resolution.next_width,
                    indicator_x,
                    frame_requested,
                })
            }
            ResizeEffect::Noop { reason } => ignored(reason.into()),
            _ => ignored(IgnoredReason::PointerMismatch),
        }
    }

    /// Frame callback: paint the latest pending indicator, if any.
    pub fn on_frame(&mut self) -> Option<DragIndicator> {
        let indicator = self.pending_paint.take()?;
        self.render.paint_indicator(&indicator);
        Some(indicator)
    }

    /// Pointer released: commit the session.
    pub fn pointer_up(&mut self, pointer: PointerId, position: PointerPosition) -> ResizeDispatch {
        if !self.machine.is_active() {
            return ignored(IgnoredReason::NoActiveSession);
        }
        let transition = self.machine.apply(ResizeInput::Release {
            pointer,
            x: position.x,
        });
        log_transition(&transition);
        match transition.effect {
            ResizeEffect::Committed(finished) => {
                ResizeDispatch::Ended(self.finish(finished, EndReason::Commit))
            }
            ResizeEffect::Noop { reason } => ignored(reason.into()),
            _ => ignored(IgnoredReason::PointerMismatch),
        }
    }

    /// Host cancelled the pointer (`pointercancel`). `None` matches any
    /// session.
    pub fn pointer_cancel(&mut self, pointer: Option<PointerId>) -> ResizeDispatch {
        self.cancel_for(pointer, CancelReason::PointerCancel)
    }

    /// Host reports that capture of `pointer` was lost.
    pub fn lost_capture(&mut self, pointer: PointerId) -> ResizeDispatch {
        if self.captured == Some(pointer)
            && self.machine.session().is_some_and(|s| s.pointer == pointer)
        {
            // Nothing left to release.
            self.captured = None;
        }
        self.cancel_for(Some(pointer), CancelReason::LostCapture)
    }

    /// Window or grid lost focus.
    pub fn blur(&mut self) -> ResizeDispatch {
        self.cancel_for(None, CancelReason::Blur)
    }

    /// Cancel the active session for `reason`, soft-committing its widths.
    pub fn cancel(&mut self, reason: CancelReason) -> ResizeDispatch {
        self.cancel_for(None, reason)
    }

    // ── Keyboard input ──────────────────────────────────────────────────

    /// Key pressed while the resize handle of `column_id` has focus.
    ///
    /// Left/Right move the boundary by the configured step (large step with
    /// Shift) as one complete session; Escape cancels an active drag.
    pub fn key_down(&mut self, column_id: &str, key: KeyEvent) -> ResizeDispatch {
        if !key.is_press() {
            return ignored(IgnoredReason::KeyRelease);
        }
        let direction = match key.code {
            KeyCode::Escape => return self.cancel_for(None, CancelReason::EscapeKey),
            KeyCode::Left => -1,
            KeyCode::Right => 1,
            _ => return ignored(IgnoredReason::UnhandledKey),
        };
        let step = if key.shift() {
            self.config.keyboard_large_step
        } else {
            self.config.keyboard_step
        };
        let step = i32::try_from(step).unwrap_or(i32::MAX);

        let session =
            match self.prepare_session(column_id, PointerId::KEYBOARD, InputSource::Keyboard, 0) {
                Ok(session) => session,
                Err(reason) => return ignored(reason),
            };
        let transition = self.machine.apply(ResizeInput::Begin(session));
        log_transition(&transition);
        if let ResizeEffect::Noop { reason } = transition.effect {
            return ignored(reason.into());
        }

        self.enter_resizing();
        self.emit_begin();
        let x = direction * step;
        log_transition(&self.machine.apply(ResizeInput::Move {
            pointer: PointerId::KEYBOARD,
            x,
        }));
        let transition = self.machine.apply(ResizeInput::Release {
            pointer: PointerId::KEYBOARD,
            x,
        });
        log_transition(&transition);
        match transition.effect {
            ResizeEffect::Committed(finished) => {
                ResizeDispatch::Ended(self.finish(finished, EndReason::Keyboard))
            }
            effect => {
                // Unreachable for a freshly armed keyboard session.
                tracing::warn!(?effect, "keyboard resize did not commit");
                self.release_session_resources();
                ignored(IgnoredReason::NoActiveSession)
            }
        }
    }

    // ── External writes and teardown ────────────────────────────────────

    /// Bulk restore of persisted widths, clamped into current bounds.
    ///
    /// Unknown columns are skipped. The host width follows the new total.
    pub fn restore(&mut self, snapshot: &WidthSnapshot) {
        let mut restored = 0usize;
        for entry in &snapshot.columns {
            if self.columns.index_of(entry.id.as_str()).is_none() {
                tracing::debug!(column = %entry.id, "skipping unknown column in restore");
                continue;
            }
            let bounds = self.columns.bounds(entry.id.as_str());
            self.store.set(&entry.id, bounds.clamp(i64::from(entry.width)));
            restored += 1;
        }
        self.host_width = self.store.total_width();
        self.render.apply_geometry(&self.store.snapshot());
        self.render.apply_host_width(self.host_width);
        tracing::debug!(restored, host_width = self.host_width, "column widths restored");
    }

    /// Discard any active session without committing and release every
    /// host resource. Returns `true` if a session was discarded.
    ///
    /// Idempotent; also runs on `Drop`.
    pub fn teardown(&mut self) -> bool {
        let discarded = match self.machine.force_cancel() {
            Some(transition) => {
                tracing::debug!(
                    transition_id = transition.transition_id,
                    from = ?transition.from,
                    "resize session discarded on teardown"
                );
                true
            }
            None => false,
        };
        if discarded || self.captured.is_some() || self.resizing {
            self.release_session_resources();
        }
        self.pending_paint.clear();
        discarded
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Committed width of `id` (0 if unknown).
    #[must_use]
    pub fn width(&self, id: &str) -> u32 {
        self.store.get(id)
    }

    #[must_use]
    pub fn store(&self) -> &WidthStore {
        &self.store
    }

    /// Committed geometry with sticky left offsets.
    #[must_use]
    pub fn geometry(&self) -> Vec<ColumnGeometry> {
        self.store.snapshot()
    }

    /// Committed widths for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> WidthSnapshot {
        self.store.to_snapshot()
    }

    #[must_use]
    pub fn host_width(&self) -> u32 {
        self.host_width
    }

    #[must_use]
    pub fn phase(&self) -> ResizePhase {
        self.machine.phase()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.machine.session()
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    #[must_use]
    pub fn has_pending_paint(&self) -> bool {
        self.pending_paint.has_pending()
    }

    #[must_use]
    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Events queued since the last [`drain_events`](Self::drain_events).
    #[must_use]
    pub fn events(&self) -> &[ResizeEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ResizeEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    #[must_use]
    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut C {
        &mut self.capture
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn prepare_session(
        &self,
        column_id: &str,
        pointer: PointerId,
        source: InputSource,
        start_x: i32,
    ) -> Result<DragSession, IgnoredReason> {
        if self.machine.is_active() {
            return Err(IgnoredReason::ActiveSessionInProgress);
        }
        let column_index = self
            .columns
            .index_of(column_id)
            .ok_or(IgnoredReason::UnknownColumn)?;
        let spec = self
            .columns
            .spec(column_id)
            .ok_or(IgnoredReason::UnknownColumn)?;
        if !spec.resizable {
            return Err(IgnoredReason::ColumnNotResizable);
        }
        let id = spec.id.clone();

        // A non-resizable neighbour cannot absorb width.
        let next = self
            .columns
            .next_of(column_id)
            .filter(|next| next.resizable)
            .map(|next| {
                let extent = ColumnExtent::new(
                    self.start_width(&next.id),
                    self.columns.bounds(next.id.as_str()),
                );
                (next.id.clone(), extent)
            });

        Ok(DragSession::new(SessionStart {
            active: ColumnExtent::new(self.start_width(&id), self.columns.bounds(column_id)),
            column_id: id,
            column_index,
            pointer,
            source,
            start_x,
            next,
            policy: self.config.policy,
            direction: self.host.direction(),
        }))
    }

    /// Live width, falling back to the committed width, then the
    /// configured initial width.
    fn start_width(&self, id: &ColumnId) -> u32 {
        self.host
            .measure_width(id)
            .filter(|&width| width > 0)
            .or_else(|| Some(self.store.get(id.as_str())).filter(|&width| width > 0))
            .or_else(|| self.columns.initial_width(id.as_str()))
            .unwrap_or(0)
    }

    fn enter_resizing(&mut self) {
        if !self.resizing {
            self.resizing = true;
            self.render.set_resizing(true);
        }
    }

    fn emit_begin(&mut self) -> ResizeDispatch {
        let Some(session) = self.machine.session() else {
            return ignored(IgnoredReason::NoActiveSession);
        };
        let begin = ResizeBegin {
            column_id: session.column_id.clone(),
            column_index: session.column_index,
            pointer: session.pointer,
            start_width: session.start_width(),
            policy: session.policy,
        };
        tracing::debug!(
            column = %begin.column_id,
            pointer = %begin.pointer,
            start_width = begin.start_width,
            policy = ?begin.policy,
            fallback = session.fell_back_to_expand(),
            "resize session started"
        );
        self.events.push(ResizeEvent::Begin(begin.clone()));
        ResizeDispatch::Began(begin)
    }

    fn cancel_for(&mut self, pointer: Option<PointerId>, reason: CancelReason) -> ResizeDispatch {
        if !self.machine.is_active() {
            return ignored(IgnoredReason::NoActiveSession);
        }
        let transition = self.machine.apply(ResizeInput::Cancel { pointer, reason });
        log_transition(&transition);
        match transition.effect {
            ResizeEffect::Canceled { reason, finished } => {
                ResizeDispatch::Ended(self.finish(finished, EndReason::Canceled(reason)))
            }
            ResizeEffect::Noop { reason } => ignored(reason.into()),
            _ => ignored(IgnoredReason::PointerMismatch),
        }
    }

    /// Commit a finished session and run cleanup.
    fn finish(&mut self, finished: Finished, reason: EndReason) -> ResizeEnd {
        let Finished {
            session,
            resolution,
        } = finished;
        let _span = tracing::debug_span!(
            "colgrip.commit",
            column = %session.column_id,
            reason = ?reason,
        )
        .entered();

        self.store.set(&session.column_id, resolution.width);
        if let (Some(next_id), Some(next_width)) = (&session.next_column_id, resolution.next_width)
        {
            self.store.set(next_id, next_width);
        }
        self.render.apply_geometry(&self.store.snapshot());

        // Zero for fit on legal geometry; non-zero when fit had to clamp
        // out-of-bounds start widths, so the host still tracks the total.
        if resolution.host_delta != 0 {
            let host_width = i64::from(self.host_width) + i64::from(resolution.host_delta);
            self.host_width = u32::try_from(host_width.max(0)).unwrap_or(u32::MAX);
            self.render.apply_host_width(self.host_width);
        }

        self.release_session_resources();

        let end = ResizeEnd {
            column_id: session.column_id,
            column_index: session.column_index,
            width: resolution.width,
            next_column_width: resolution.next_width,
            delta: resolution.applied_delta,
            host_width_delta: resolution.host_delta,
            reason,
        };
        tracing::debug!(
            width = end.width,
            next_width = ?end.next_column_width,
            delta = end.delta,
            host_width = self.host_width,
            "column widths committed"
        );
        self.events.push(ResizeEvent::End(end.clone()));
        end
    }

    fn release_session_resources(&mut self) {
        if let Some(pointer) = self.captured.take() {
            self.capture.release(pointer);
        }
        if self.resizing {
            self.resizing = false;
            self.render.set_resizing(false);
        }
        self.pending_paint.clear();
        self.render.clear_indicator();
    }
}

impl<R: RenderPort, C: InputCapture, H: ColumnHost> Drop for DragController<R, C, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<R, C, H> std::fmt::Debug for DragController<R, C, H>
where
    R: RenderPort,
    C: InputCapture,
    H: ColumnHost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragController")
            .field("config", &self.config)
            .field("phase", &self.machine.phase())
            .field("host_width", &self.host_width)
            .field("captured", &self.captured)
            .field("resizing", &self.resizing)
            .finish_non_exhaustive()
    }
}

fn ignored(reason: IgnoredReason) -> ResizeDispatch {
    tracing::debug!(?reason, "resize input ignored");
    ResizeDispatch::Ignored(reason)
}

fn log_transition(transition: &ResizeTransition) {
    tracing::debug!(
        transition_id = transition.transition_id,
        from = ?transition.from,
        to = ?transition.to,
        "resize transition"
    );
}

fn sanitize(mut config: ResizeConfig) -> ResizeConfig {
    let errors = config.validate();
    if errors.is_empty() {
        return config;
    }
    tracing::warn!(?errors, "invalid resize config; using default keyboard steps");
    config.keyboard_step = DEFAULT_KEYBOARD_STEP;
    config.keyboard_large_step = DEFAULT_KEYBOARD_LARGE_STEP;
    config
}
