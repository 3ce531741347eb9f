#![allow(dead_code)]

use pixel_reveal::{
    Backing, CellRect, Extent, EventBatch, FrameOutcome, FrameScheduler, Mode, Surface,
    TransitionController, TransitionEvent,
};

/// Frame scheduler driven by the test: requested frames sit in `pending`
/// until [`deliver`] hands one to the controller.
#[derive(Debug, Default)]
pub struct LogicalScheduler {
    next: u32,
    pub pending: Vec<u32>,
    pub cancelled: Vec<u32>,
    pub refuse: bool,
}

impl FrameScheduler for LogicalScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        if self.refuse {
            return None;
        }
        self.next += 1;
        self.pending.push(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.pending.retain(|&h| h != handle);
        self.cancelled.push(handle);
    }
}

/// Keeps what is currently painted: `clear` drops all fills.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub extent: Extent,
    pub backing: Option<Backing>,
    pub fills: Vec<CellRect>,
    pub fill_color: Option<String>,
    pub clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            extent: Extent::new(width, height),
            ..Self::default()
        }
    }

    pub fn painted(&self) -> usize {
        self.fills.len()
    }
}

impl Surface for RecordingSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn apply_backing(&mut self, backing: &Backing) {
        self.backing = Some(*backing);
    }

    fn clear(&mut self, _extent: Extent) {
        self.fills.clear();
        self.clears += 1;
    }

    fn set_fill(&mut self, color: &str) {
        self.fill_color = Some(color.to_string());
    }

    fn fill_rect(&mut self, rect: CellRect) {
        self.fills.push(rect);
    }
}

/// Deliver the outstanding frame, if any, the way a display refresh would.
pub fn deliver(
    controller: &mut TransitionController<LogicalScheduler>,
    now_ms: f64,
    surface: &mut RecordingSurface,
    events: &mut Vec<TransitionEvent>,
) -> Option<FrameOutcome> {
    controller.scheduler_mut().pending.pop()?;
    Some(controller.on_frame(now_ms, surface, events))
}

/// Deliver `batch` the way the page bindings do: one event at a time, with
/// `react` free to start another transition from inside a callback. The new
/// transition's own events are delivered before returning to `batch`.
pub fn dispatch(
    controller: &mut TransitionController<LogicalScheduler>,
    mut batch: EventBatch,
    now_ms: f64,
    surface: &mut RecordingSurface,
    fired: &mut Vec<TransitionEvent>,
    react: &mut dyn FnMut(TransitionEvent) -> Option<Mode>,
) {
    while let Some(event) = batch.next_live(controller.generation()) {
        fired.push(event);
        if let Some(mode) = react(event) {
            let mut events = Vec::new();
            controller.trigger(mode, now_ms, Some(&mut *surface), &mut events);
            let nested = EventBatch::new(controller.generation(), events);
            dispatch(controller, nested, now_ms, surface, fired, react);
        }
    }
}

/// Deliver the outstanding frame and collect its events as a batch.
pub fn deliver_batch(
    controller: &mut TransitionController<LogicalScheduler>,
    now_ms: f64,
    surface: &mut RecordingSurface,
) -> Option<EventBatch> {
    let mut events = Vec::new();
    deliver(controller, now_ms, surface, &mut events)?;
    Some(EventBatch::new(controller.generation(), events))
}

pub fn count(events: &[TransitionEvent], wanted: TransitionEvent) -> usize {
    events.iter().filter(|&&e| e == wanted).count()
}
