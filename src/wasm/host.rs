//! Read-only signals from the page.

use wasm_bindgen::JsValue;
use web_sys::{Element, Window};

use crate::raster::Extent;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// High-resolution timestamp on the same origin as `requestAnimationFrame`.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| dpr.is_finite() && *dpr > 0.0)
        .unwrap_or(1.0)
}

pub fn prefers_reduced_motion() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.match_media(REDUCED_MOTION_QUERY) {
        Ok(Some(query)) => query.matches(),
        _ => false,
    }
}

pub fn element_extent(element: &Element) -> Extent {
    let rect = element.get_bounding_client_rect();
    Extent::new(rect.width(), rect.height())
}

/// Seed for the shuffle RNG; `Math.random` is good enough for cosmetics.
pub fn rng_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) ^ lo ^ now_ms().to_bits()
}
