use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::log::LineLayer;

/// Route `tracing` output to the devtools console. Per-frame `trace!` events
/// stay off.
pub fn install() {
    let layer = LineLayer::new(Level::DEBUG, forward);
    // The page may already own the global subscriber; keep theirs.
    let _ = tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer));
}

fn forward(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}
