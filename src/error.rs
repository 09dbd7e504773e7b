use thiserror::Error;

/// Top-level error type for the bagsim placement engine.
#[derive(Debug, Error)]
pub enum BagError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while turning shape descriptors into masks.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate raster: {0}")]
    Degenerate(String),

    #[error("grid data length {len} does not match {rows}x{cols}")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },
}

/// Errors raised by the placement rules.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("liquid fill failed: {0}")]
    LiquidFill(String),

    #[error("cannot finalize object frame: {0}")]
    Frame(String),
}

/// Errors in caller-supplied configuration or descriptors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("label {0} is used by more than one object")]
    DuplicateLabel(i32),

    #[error("liquid label {liquid} must be above the highest solid label {max_solid}")]
    LiquidLabelOrder { liquid: i32, max_solid: i32 },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`BagError`].
pub type Result<T> = std::result::Result<T, BagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_errors_render_through_top_level() {
        let err: BagError = RasterError::Degenerate("empty mask".into()).into();
        assert_eq!(err.to_string(), "degenerate raster: empty mask");

        let err: BagError = ConfigError::LiquidLabelOrder {
            liquid: 5,
            max_solid: 7,
        }
        .into();
        assert!(err.to_string().contains("above the highest solid label 7"));
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<u32>("nope").map_err(ConfigError::from);
        assert!(matches!(parse, Err(ConfigError::Json(_))));
    }
}
