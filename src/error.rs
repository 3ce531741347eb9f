pub type Result<T> = std::result::Result<T, RevealError>;

/// Rejected configuration values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("duration must be a positive finite number of milliseconds, got {0}")]
    Duration(f64),

    #[error("cell size must be a finite number of at least 1 pixel, got {0}")]
    CellSize(f64),

    #[error("fixed grid needs at least one column and one row, got {cols}x{rows}")]
    GridDimensions { cols: u32, rows: u32 },

    #[error("fixed grid {cols}x{rows} exceeds the {max} cell limit")]
    TooManyCells { cols: u32, rows: u32, max: u32 },

    #[error("show-content threshold must lie in [0, 1], got {0}")]
    Threshold(f64),

    #[error("device pixel ratio cap must be at least 1, got {0}")]
    MaxDpr(f64),

    #[error("auto-trigger delay must be a non-negative number of milliseconds, got {0}")]
    Delay(f64),

    #[error("fill colour must not be empty")]
    EmptyColor,
}

#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("host error: {0}")]
    Host(String),
}

impl RevealError {
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        let err = RevealError::from(ConfigError::Duration(-1.0));
        assert!(err.to_string().starts_with("invalid configuration:"));
        assert!(RevealError::host("no window").to_string().contains("host error:"));
    }
}
