use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::controller::FrameScheduler;

/// Slot for the single animation-frame closure. The closure is created after
/// the state it drives, so it is installed into the slot late.
pub type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn frame_slot() -> FrameSlot {
    Rc::new(RefCell::new(None))
}

/// `requestAnimationFrame` behind [`FrameScheduler`]. Every request reuses
/// the same closure, so no per-frame allocation happens on the JS side.
pub struct RafScheduler {
    window: Window,
    slot: FrameSlot,
}

impl RafScheduler {
    pub fn new(window: Window, slot: FrameSlot) -> Self {
        Self { window, slot }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let slot = self.slot.borrow();
        let callback = slot.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}
