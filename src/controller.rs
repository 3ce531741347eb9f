//! The transition state machine.
//!
//! A [`TransitionController`] owns at most one in-flight session and at most
//! one outstanding frame request. The host delivers frames through
//! [`TransitionController::on_frame`]; scheduling goes through an injected
//! [`FrameScheduler`] so the same machine runs against `requestAnimationFrame`
//! in the browser and a logical clock in tests.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use tracing::{debug, trace, warn};

use crate::clock::{PhaseProgress, ProgressClock};
use crate::config::TransitionConfig;
use crate::error::ConfigError;
use crate::grid::{shuffled_indices, Grid};
use crate::raster::{CellMask, Rasterizer, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Draw cells until the surface is covered.
    Reveal,
    /// Clear cells from a covered surface.
    Hide,
    /// Cover, swap the underlying content, then uncover.
    Swap { activate: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Animating(Mode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No session was waiting on this frame.
    Idle,
    /// Another frame has been requested.
    Continue,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    ContentSwapped { activated: bool },
    ShowContent,
    Completed,
}

/// Callbacks fired synchronously from `trigger`/`on_frame`, each at most once
/// per session.
pub trait TransitionObserver {
    fn content_swapped(&mut self, _activated: bool) {}
    fn show_content(&mut self) {}
    fn completed(&mut self) {}
}

impl TransitionObserver for Vec<TransitionEvent> {
    fn content_swapped(&mut self, activated: bool) {
        self.push(TransitionEvent::ContentSwapped { activated });
    }

    fn show_content(&mut self) {
        self.push(TransitionEvent::ShowContent);
    }

    fn completed(&mut self) {
        self.push(TransitionEvent::Completed);
    }
}

/// Events from one `trigger` or `on_frame` call, held until the host can run
/// its callbacks without the controller borrowed.
///
/// A callback may start a new transition or tear the controller down. Every
/// such call bumps [`TransitionController::generation`], and the rest of a
/// batch from an older generation is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventBatch {
    generation: u64,
    events: VecDeque<TransitionEvent>,
}

impl EventBatch {
    pub fn new(generation: u64, events: impl IntoIterator<Item = TransitionEvent>) -> Self {
        Self {
            generation,
            events: events.into_iter().collect(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Next event to deliver, or `None` once drained or superseded.
    pub fn next_live(&mut self, current_generation: u64) -> Option<TransitionEvent> {
        if current_generation != self.generation {
            self.events.clear();
            return None;
        }
        self.events.pop_front()
    }
}

/// Display-refresh scheduling. One request may be outstanding per controller.
pub trait FrameScheduler {
    type Handle;

    /// Ask for one frame callback. `None` means the host cannot schedule.
    fn request_frame(&mut self) -> Option<Self::Handle>;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// What the surface shows between sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resting {
    Clear,
    Covered,
}

impl Resting {
    fn after(mode: Mode) -> Self {
        match mode {
            Mode::Reveal => Resting::Covered,
            Mode::Hide | Mode::Swap { .. } => Resting::Clear,
        }
    }
}

struct Session {
    id: u64,
    mode: Mode,
    clock: ProgressClock,
    grid: Grid,
    order: Vec<u32>,
    mask: CellMask,
    /// Entries of `order` already applied in the current phase.
    applied: usize,
    swapped: bool,
    shown: bool,
}

impl Session {
    /// Apply progress at `now_ms` to the mask. Returns true once finished.
    fn advance(
        &mut self,
        now_ms: f64,
        threshold: Option<f64>,
        observer: &mut dyn TransitionObserver,
    ) -> bool {
        let total = self.mask.len();
        if total == 0 {
            return true;
        }
        let progress = self.clock.progress(now_ms);
        match self.mode {
            Mode::Reveal => {
                self.apply(target_count(progress, total), true);
                if let Some(at) = threshold {
                    if !self.shown && progress >= at {
                        self.shown = true;
                        observer.show_content();
                    }
                }
            }
            Mode::Hide => self.apply(target_count(progress, total), false),
            Mode::Swap { activate } => match self.clock.phase_progress(now_ms) {
                PhaseProgress::First(p) => self.apply(target_count(p, total), true),
                PhaseProgress::Second(p) => {
                    if !self.swapped {
                        // Frames may skip the tail of phase one.
                        self.apply(total, true);
                        self.applied = 0;
                        self.swapped = true;
                        observer.content_swapped(activate);
                    }
                    self.apply(target_count(p, total), false);
                }
            },
        }
        progress >= 1.0
    }

    fn apply(&mut self, target: usize, on: bool) {
        let target = target.min(self.order.len());
        while self.applied < target {
            self.mask.set(self.order[self.applied] as usize, on);
            self.applied += 1;
        }
    }

    /// Fire whatever the session has not fired yet, then `completed`.
    fn settle(&mut self, threshold: Option<f64>, observer: &mut dyn TransitionObserver) {
        settle_callbacks(self.mode, threshold, &mut self.swapped, &mut self.shown, observer);
    }
}

fn settle_callbacks(
    mode: Mode,
    threshold: Option<f64>,
    swapped: &mut bool,
    shown: &mut bool,
    observer: &mut dyn TransitionObserver,
) {
    match mode {
        Mode::Swap { activate } if !*swapped => {
            *swapped = true;
            observer.content_swapped(activate);
        }
        Mode::Reveal if threshold.is_some() && !*shown => {
            *shown = true;
            observer.show_content();
        }
        _ => {}
    }
    observer.completed();
}

/// `floor(progress * total)`, never more than `total`.
pub fn target_count(progress: f64, total: usize) -> usize {
    ((progress.clamp(0.0, 1.0) * total as f64).floor() as usize).min(total)
}

pub struct TransitionController<S: FrameScheduler> {
    config: TransitionConfig,
    rasterizer: Rasterizer,
    scheduler: S,
    pending: Option<S::Handle>,
    session: Option<Session>,
    resting: Resting,
    rng: SmallRng,
    reduced_motion: bool,
    next_id: u64,
    generation: u64,
}

impl<S: FrameScheduler> TransitionController<S> {
    pub fn new(
        config: TransitionConfig,
        scheduler: S,
        rng: SmallRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rasterizer = Rasterizer::new(config.fill_color.clone(), config.max_dpr);
        let resting = if config.start_covered {
            Resting::Covered
        } else {
            Resting::Clear
        };
        Ok(Self {
            config,
            rasterizer,
            scheduler,
            pending: None,
            session: None,
            resting,
            rng,
            reduced_motion: false,
            next_id: 1,
            generation: 0,
        })
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn state(&self) -> ControllerState {
        match &self.session {
            Some(session) => ControllerState::Animating(session.mode),
            None => ControllerState::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the in-flight session, if any. Ids increase per trigger.
    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Bumped by every [`cancel`](Self::cancel), and so by every trigger.
    /// Events collected under an older generation must not be delivered.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Cells currently drawn by the in-flight session.
    pub fn visible_cells(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.mask.count())
    }

    pub fn session_grid(&self) -> Option<Grid> {
        self.session.as_ref().map(|s| s.grid)
    }

    /// Whether the surface rests covered once idle.
    pub fn rests_covered(&self) -> bool {
        self.resting == Resting::Covered
    }

    /// Start a transition, superseding any in-flight one.
    ///
    /// `surface` is `None` when the host has no usable drawing context; the
    /// transition then completes immediately. With reduced motion enabled the
    /// final state is drawn in one step. Both paths fire the same callbacks an
    /// animated run would.
    pub fn trigger(
        &mut self,
        mode: Mode,
        now_ms: f64,
        surface: Option<&mut dyn Surface>,
        observer: &mut dyn TransitionObserver,
    ) {
        self.cancel();
        let id = self.next_id;
        self.next_id += 1;

        let Some(surface) = surface else {
            debug!(session = id, ?mode, "no drawing surface; completing without animation");
            self.finish_immediately(mode, None, observer);
            return;
        };
        if self.reduced_motion {
            debug!(session = id, ?mode, "reduced motion; skipping grid animation");
            self.finish_immediately(mode, Some(surface), observer);
            return;
        }

        let extent = surface.extent();
        let mut grid = self.config.grid.resolve(extent.width, extent.height);
        let order = match shuffled_indices(grid.total_cells(), &mut self.rng) {
            Some(order) => order,
            None => {
                warn!(session = id, cells = grid.total_cells(), "grid too large; drawing nothing");
                grid = Grid::EMPTY;
                Vec::new()
            }
        };
        let total = order.len();
        debug!(
            session = id,
            ?mode,
            cols = grid.cols(),
            rows = grid.rows(),
            duration_ms = self.config.duration_ms,
            "transition started"
        );
        self.session = Some(Session {
            id,
            mode,
            clock: ProgressClock::new(now_ms, self.config.duration_ms),
            grid,
            order,
            mask: CellMask::new(total, mode == Mode::Hide),
            applied: 0,
            swapped: false,
            shown: false,
        });

        match self.scheduler.request_frame() {
            Some(handle) => self.pending = Some(handle),
            None => {
                debug!(session = id, "frame scheduling unavailable");
                self.session = None;
                self.finish_immediately(mode, Some(surface), observer);
            }
        }
    }

    /// Process one display frame.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn Surface,
        observer: &mut dyn TransitionObserver,
    ) -> FrameOutcome {
        if self.pending.take().is_none() {
            return FrameOutcome::Idle;
        }
        let threshold = self.config.show_content_threshold;
        let Some(session) = self.session.as_mut() else {
            return FrameOutcome::Idle;
        };

        let finished = session.advance(now_ms, threshold, observer);
        self.rasterizer.draw(surface, &session.grid, &session.mask);
        trace!(session = session.id, visible = session.mask.count(), "frame");

        if !finished {
            if let Some(handle) = self.scheduler.request_frame() {
                self.pending = Some(handle);
                return FrameOutcome::Continue;
            }
            debug!(session = session.id, "frame scheduling lost; jumping to final state");
        }

        let Some(mut session) = self.session.take() else {
            return FrameOutcome::Idle;
        };
        self.resting = Resting::after(session.mode);
        if !finished {
            self.draw_resting(surface);
        }
        debug!(session = session.id, "transition completed");
        session.settle(threshold, observer);
        FrameOutcome::Completed
    }

    /// Resize the backing buffer for the surface's current extent.
    pub fn fit(&self, surface: &mut dyn Surface, dpr: f64) {
        let backing = self.rasterizer.fit(surface, dpr);
        trace!(width = backing.width, height = backing.height, scale = backing.scale, "surface fitted");
    }

    /// Repaint the current state, e.g. after the backing buffer was resized.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        match &self.session {
            Some(session) => self.rasterizer.draw(surface, &session.grid, &session.mask),
            None => self.draw_resting(surface),
        }
    }

    /// Cancel the pending frame and drop the in-flight session without
    /// firing any of its callbacks. Undelivered batches become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(session) = self.session.take() {
            debug!(session = session.id, "transition superseded");
        }
    }

    fn finish_immediately(
        &mut self,
        mode: Mode,
        surface: Option<&mut dyn Surface>,
        observer: &mut dyn TransitionObserver,
    ) {
        self.resting = Resting::after(mode);
        if let Some(surface) = surface {
            self.draw_resting(surface);
        }
        let (mut swapped, mut shown) = (false, false);
        settle_callbacks(
            mode,
            self.config.show_content_threshold,
            &mut swapped,
            &mut shown,
            observer,
        );
    }

    fn draw_resting(&self, surface: &mut dyn Surface) {
        let extent = surface.extent();
        let grid = self.config.grid.resolve(extent.width, extent.height);
        let mask = CellMask::new(grid.total_cells(), self.resting == Resting::Covered);
        self.rasterizer.draw(surface, &grid, &mask);
    }
}

impl<S: FrameScheduler> Drop for TransitionController<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}
