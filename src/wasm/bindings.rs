//! `wasm-bindgen` surface for pages.
//!
//! ```js
//! const hero = PixelTransition.hero(heroEl, heroCanvas);
//! const card = PixelTransition.swap(cardEl, cardCanvas);
//! card.onContentSwap((activated) => cardEl.classList.toggle("open", activated));
//! card.toggle(true);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlCanvasElement, HtmlElement, Window};

use super::canvas::CanvasSurface;
use super::host;
use super::render::{frame_slot, FrameSlot, RafScheduler};
use crate::config::TransitionConfig;
use crate::controller::{EventBatch, Mode, TransitionController, TransitionEvent};
use crate::error::RevealError;
use crate::raster::Surface;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

struct Engine {
    controller: TransitionController<RafScheduler>,
    surface: Option<CanvasSurface>,
}

impl Engine {
    fn trigger(&mut self, mode: Mode) -> EventBatch {
        let mut events = Vec::new();
        let Engine {
            controller,
            surface,
        } = self;
        controller.set_reduced_motion(host::prefers_reduced_motion());
        let surface = surface.as_mut().map(|s| s as &mut dyn Surface);
        controller.trigger(mode, host::now_ms(), surface, &mut events);
        EventBatch::new(controller.generation(), events)
    }

    fn frame(&mut self, timestamp: f64) -> EventBatch {
        let mut events = Vec::new();
        if let Some(surface) = self.surface.as_mut() {
            self.controller.on_frame(timestamp, surface, &mut events);
        }
        EventBatch::new(self.controller.generation(), events)
    }

    fn fit(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.controller.fit(surface, host::device_pixel_ratio());
            self.controller.redraw(surface);
        }
    }
}

#[derive(Default)]
struct Callbacks {
    completed: Option<Function>,
    content_swap: Option<Function>,
    show_content: Option<Function>,
}

#[derive(Default)]
struct Listeners {
    resize: Option<Closure<dyn FnMut()>>,
    auto: Option<Closure<dyn FnMut()>>,
    auto_handle: Option<i32>,
}

struct Shared {
    window: Window,
    engine: RefCell<Engine>,
    callbacks: RefCell<Callbacks>,
    listeners: RefCell<Listeners>,
    destroyed: Cell<bool>,
    // Held for the frame closure's lifetime; never cleared while frames may run.
    _frame: FrameSlot,
}

impl Shared {
    fn trigger(&self, mode: Mode) {
        if self.destroyed.get() {
            return;
        }
        let batch = self.engine.borrow_mut().trigger(mode);
        self.dispatch(batch);
    }

    fn frame(&self, timestamp: f64) {
        if self.destroyed.get() {
            return;
        }
        let batch = self.engine.borrow_mut().frame(timestamp);
        self.dispatch(batch);
    }

    /// Call JS callbacks with no engine borrow held, so callbacks may
    /// re-trigger or destroy this transition. Once they do, the rest of the
    /// batch belongs to a superseded session and is dropped.
    fn dispatch(&self, mut batch: EventBatch) {
        loop {
            let generation = self.engine.borrow().controller.generation();
            let Some(event) = batch.next_live(generation) else {
                break;
            };
            let (callback, arg) = {
                let callbacks = self.callbacks.borrow();
                match event {
                    TransitionEvent::Completed => (callbacks.completed.clone(), JsValue::UNDEFINED),
                    TransitionEvent::ShowContent => {
                        (callbacks.show_content.clone(), JsValue::UNDEFINED)
                    }
                    TransitionEvent::ContentSwapped { activated } => {
                        (callbacks.content_swap.clone(), JsValue::from_bool(activated))
                    }
                }
            };
            if let Some(callback) = callback {
                if let Err(err) = callback.call1(&JsValue::NULL, &arg) {
                    console::error_1(&err);
                }
            }
        }
    }

    fn teardown(&self) {
        self.destroyed.set(true);
        self.engine.borrow_mut().controller.cancel();
        let mut listeners = self.listeners.borrow_mut();
        if let Some(resize) = listeners.resize.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
        if let Some(handle) = listeners.auto_handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One pixel transition bound to a container and its overlay canvas.
#[wasm_bindgen]
pub struct PixelTransition {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl PixelTransition {
    /// `config` is camelCase JSON; an empty string means defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        config: &str,
    ) -> Result<PixelTransition, JsValue> {
        let config = if config.trim().is_empty() {
            TransitionConfig::default()
        } else {
            TransitionConfig::from_json(config).map_err(js_err)?
        };
        Self::mount(container, canvas, config)
    }

    pub fn hero(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
    ) -> Result<PixelTransition, JsValue> {
        Self::mount(container, canvas, TransitionConfig::hero_image())
    }

    pub fn navbar(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
    ) -> Result<PixelTransition, JsValue> {
        Self::mount(container, canvas, TransitionConfig::navbar())
    }

    pub fn swap(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
    ) -> Result<PixelTransition, JsValue> {
        Self::mount(container, canvas, TransitionConfig::content_swap())
    }

    pub fn reveal(&self) {
        self.shared.trigger(Mode::Reveal);
    }

    pub fn hide(&self) {
        self.shared.trigger(Mode::Hide);
    }

    /// Two-phase swap towards the second (`true`) or first content.
    pub fn toggle(&self, activate: bool) {
        self.shared.trigger(Mode::Swap { activate });
    }

    /// Refit the backing buffer, e.g. after the container changed size.
    pub fn resize(&self) {
        self.shared.engine.borrow_mut().fit();
    }

    /// Cancel any running transition and detach listeners. No callback
    /// fires afterwards, including the rest of a batch being dispatched, and
    /// later triggers are ignored.
    pub fn destroy(&self) {
        self.shared.teardown();
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.shared.engine.borrow().controller.is_animating()
    }

    #[wasm_bindgen(js_name = onCompleted)]
    pub fn on_completed(&self, callback: Option<Function>) {
        self.shared.callbacks.borrow_mut().completed = callback;
    }

    #[wasm_bindgen(js_name = onContentSwap)]
    pub fn on_content_swap(&self, callback: Option<Function>) {
        self.shared.callbacks.borrow_mut().content_swap = callback;
    }

    #[wasm_bindgen(js_name = onShowContent)]
    pub fn on_show_content(&self, callback: Option<Function>) {
        self.shared.callbacks.borrow_mut().show_content = callback;
    }
}

impl PixelTransition {
    fn mount(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        config: TransitionConfig,
    ) -> Result<PixelTransition, JsValue> {
        let window = host::window()?;
        let surface = CanvasSurface::attach(container, canvas)?;
        if surface.is_none() {
            console::warn_1(&JsValue::from_str(
                "pixel_reveal: 2D context unavailable; transitions complete instantly",
            ));
        }

        let auto = config.auto_trigger;
        let slot = frame_slot();
        let scheduler = RafScheduler::new(window.clone(), slot.clone());
        let rng = SmallRng::seed_from_u64(host::rng_seed());
        let controller = TransitionController::new(config, scheduler, rng)
            .map_err(|err| js_err(RevealError::from(err)))?;

        let shared = Rc::new(Shared {
            window: window.clone(),
            engine: RefCell::new(Engine {
                controller,
                surface,
            }),
            callbacks: RefCell::new(Callbacks::default()),
            listeners: RefCell::new(Listeners::default()),
            destroyed: Cell::new(false),
            _frame: slot.clone(),
        });

        let weak = Rc::downgrade(&shared);
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.frame(timestamp);
        }) as Box<dyn FnMut(f64)>));

        let weak = Rc::downgrade(&shared);
        let resize = Closure::wrap(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.engine.borrow_mut().fit();
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        shared.listeners.borrow_mut().resize = Some(resize);
        shared.engine.borrow_mut().fit();

        if let Some(auto) = auto {
            let weak = Rc::downgrade(&shared);
            let mode = Mode::from(auto.mode);
            let fire = Closure::wrap(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.listeners.borrow_mut().auto_handle = None;
                    shared.trigger(mode);
                }
            }) as Box<dyn FnMut()>);
            let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                fire.as_ref().unchecked_ref(),
                auto.delay_ms.round() as i32,
            )?;
            let mut listeners = shared.listeners.borrow_mut();
            listeners.auto = Some(fire);
            listeners.auto_handle = Some(handle);
        }

        Ok(PixelTransition { shared })
    }
}
