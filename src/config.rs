//! Per-instance transition configuration.
//!
//! Configs arrive from the page as camelCase JSON, e.g.
//!
//! ```json
//! { "grid": { "cellSize": 24 }, "durationMs": 600, "fillColor": "#0b0b0b",
//!   "autoTrigger": { "mode": "hide", "delayMs": 150 } }
//! ```

use serde::Deserialize;

use crate::controller::Mode;
use crate::error::{ConfigError, Result};
use crate::grid::{GridSpec, MAX_CELLS, MIN_CELL_PX};

pub const DEFAULT_DURATION_MS: f64 = 600.0;
pub const DEFAULT_MAX_DPR: f64 = 2.0;
pub const NAVBAR_SHOW_CONTENT_AT: f64 = 0.8;

/// Which transition to start automatically once mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoMode {
    Reveal,
    Hide,
    Activate,
    Deactivate,
}

impl From<AutoMode> for Mode {
    fn from(mode: AutoMode) -> Self {
        match mode {
            AutoMode::Reveal => Mode::Reveal,
            AutoMode::Hide => Mode::Hide,
            AutoMode::Activate => Mode::Swap { activate: true },
            AutoMode::Deactivate => Mode::Swap { activate: false },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTrigger {
    pub mode: AutoMode,
    #[serde(default)]
    pub delay_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionConfig {
    pub grid: GridSpec,
    pub duration_ms: f64,
    pub fill_color: String,
    /// Reveal progress at which `show_content` fires. Hides never fire it.
    pub show_content_threshold: Option<f64>,
    pub auto_trigger: Option<AutoTrigger>,
    /// Paint the surface fully covered on mount, before any transition.
    pub start_covered: bool,
    pub max_dpr: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::CellSize(24.0),
            duration_ms: DEFAULT_DURATION_MS,
            fill_color: "#000000".to_string(),
            show_content_threshold: None,
            auto_trigger: None,
            start_covered: false,
            max_dpr: DEFAULT_MAX_DPR,
        }
    }
}

impl TransitionConfig {
    /// Full-bleed image uncovered block by block on first paint.
    pub fn hero_image() -> Self {
        Self {
            grid: GridSpec::CellSize(32.0),
            duration_ms: 1200.0,
            fill_color: "#0a0a0a".to_string(),
            auto_trigger: Some(AutoTrigger {
                mode: AutoMode::Hide,
                delay_ms: 200.0,
            }),
            start_covered: true,
            ..Self::default()
        }
    }

    /// Scroll-keyed navbar overlay; content mounts just before full coverage.
    ///
    /// A reveal rests covered, so the page chains `hide` from `completed` to
    /// uncover the freshly mounted content.
    pub fn navbar() -> Self {
        Self {
            grid: GridSpec::CellSize(12.0),
            duration_ms: 400.0,
            fill_color: "#111111".to_string(),
            show_content_threshold: Some(NAVBAR_SHOW_CONTENT_AT),
            ..Self::default()
        }
    }

    /// Two-state card content swap on a fixed grid.
    pub fn content_swap() -> Self {
        Self {
            grid: GridSpec::Fixed { cols: 12, rows: 12 },
            duration_ms: 600.0,
            fill_color: "#111111".to_string(),
            ..Self::default()
        }
    }

    pub fn with_duration_secs(mut self, secs: f64) -> Self {
        self.duration_ms = secs * 1000.0;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.duration_ms.is_finite() && self.duration_ms > 0.0) {
            return Err(ConfigError::Duration(self.duration_ms));
        }
        match self.grid {
            GridSpec::CellSize(px) if !(px.is_finite() && px >= MIN_CELL_PX) => {
                return Err(ConfigError::CellSize(px));
            }
            GridSpec::Fixed { cols, rows } if cols == 0 || rows == 0 => {
                return Err(ConfigError::GridDimensions { cols, rows });
            }
            GridSpec::Fixed { cols, rows } if u64::from(cols) * u64::from(rows) > u64::from(MAX_CELLS) => {
                return Err(ConfigError::TooManyCells {
                    cols,
                    rows,
                    max: MAX_CELLS,
                });
            }
            _ => {}
        }
        if let Some(t) = self.show_content_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(ConfigError::Threshold(t));
            }
        }
        if !(self.max_dpr.is_finite() && self.max_dpr >= 1.0) {
            return Err(ConfigError::MaxDpr(self.max_dpr));
        }
        if let Some(auto) = self.auto_trigger {
            if !(auto.delay_ms.is_finite() && auto.delay_ms >= 0.0) {
                return Err(ConfigError::Delay(auto.delay_ms));
            }
        }
        if self.fill_color.trim().is_empty() {
            return Err(ConfigError::EmptyColor);
        }
        Ok(())
    }
}
