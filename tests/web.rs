#![cfg(target_arch = "wasm32")]

use pixel_reveal::PixelTransition;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn mount_host(width: u32, height: u32) -> (HtmlElement, HtmlCanvasElement) {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    container
        .style()
        .set_property("width", &format!("{width}px"))
        .unwrap();
    container
        .style()
        .set_property("height", &format!("{height}px"))
        .unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    container.append_child(&canvas).unwrap();
    document.body().unwrap().append_child(&container).unwrap();
    (container, canvas)
}

#[wasm_bindgen_test]
fn mount_fits_backing_to_device_pixels() {
    let (container, canvas) = mount_host(320, 200);
    let transition = PixelTransition::new(container, canvas.clone(), "").unwrap();

    let dpr = web_sys::window().unwrap().device_pixel_ratio().min(2.0);
    assert_eq!(canvas.width(), (320.0 * dpr).round() as u32);
    assert_eq!(canvas.height(), (200.0 * dpr).round() as u32);
    assert!(!transition.is_animating());
}

#[wasm_bindgen_test]
fn reveal_starts_animating_and_destroy_stops_it() {
    let (container, canvas) = mount_host(120, 120);
    let transition =
        PixelTransition::new(container, canvas, r#"{"grid":{"fixed":{"cols":4,"rows":4}}}"#)
            .unwrap();

    transition.reveal();
    let reduced = web_sys::window()
        .unwrap()
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|q| q.matches());
    assert_eq!(transition.is_animating(), !reduced);

    transition.destroy();
    assert!(!transition.is_animating());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let (container, canvas) = mount_host(10, 10);
    assert!(PixelTransition::new(container, canvas, r#"{"durationMs":-5}"#).is_err());
}

#[wasm_bindgen_test]
fn triggers_after_destroy_are_ignored() {
    let (container, canvas) = mount_host(120, 120);
    let transition = PixelTransition::swap(container, canvas).unwrap();
    transition.destroy();

    transition.toggle(true);
    transition.reveal();
    assert!(!transition.is_animating());
}
