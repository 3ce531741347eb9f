//! Pixel reveal/dissolve transitions for canvas overlays.
//!
//! A surface is split into a grid; a shuffled order decides which cell
//! appears (or disappears) next as a fixed-duration clock advances. The core
//! is host-independent and driven by injected frame scheduling, randomness
//! and drawing surfaces. The browser bindings live in the wasm32-only
//! `wasm` module.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
#[cfg(feature = "console-log")]
pub mod log;
pub mod raster;

pub use clock::{PhaseProgress, ProgressClock};
pub use config::{AutoMode, AutoTrigger, TransitionConfig};
pub use controller::{
    ControllerState, EventBatch, FrameOutcome, FrameScheduler, Mode, TransitionController,
    TransitionEvent, TransitionObserver,
};
pub use error::{ConfigError, Result, RevealError};
pub use grid::{shuffled_indices, Grid, GridSpec, MAX_CELLS, MIN_CELL_PX};
pub use raster::{Backing, CellMask, CellRect, Extent, Rasterizer, Surface};

// Only compile browser code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod bindings;
    mod canvas;
    #[cfg(feature = "console-log")]
    mod console;
    mod host;
    mod render;

    pub use bindings::PixelTransition;

    #[wasm_bindgen(start)]
    pub fn init() {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        #[cfg(feature = "console-log")]
        console::install();
    }

    #[wasm_bindgen]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::PixelTransition;
