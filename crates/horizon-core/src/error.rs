//! Error types for Horizon

use thiserror::Error;

/// The main error type for Horizon operations
#[derive(Debug, Error)]
pub enum HorizonError {
    #[error("Non-finite value in {component} buffer at index {index}")]
    NonFinite { component: &'static str, index: usize },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Horizon operations
pub type Result<T> = std::result::Result<T, HorizonError>;

impl From<toml::de::Error> for HorizonError {
    fn from(err: toml::de::Error) -> Self {
        HorizonError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for HorizonError {
    fn from(err: toml::ser::Error) -> Self {
        HorizonError::TomlSerError(err.to_string())
    }
}

impl HorizonError {
    /// Range check helper used by config validation.
    pub fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<()> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(HorizonError::ValueOutOfRange {
                field: field.to_string(),
                min: min as f64,
                max: max as f64,
                value: value as f64,
            })
        }
    }
}

/// Result of one component step.
///
/// Numerical instability is not propagated as `Err`: the component has
/// already reset itself to its rest state and only reports what happened.
#[derive(Debug)]
pub enum StepOutcome {
    Stable,
    Recovered(HorizonError),
}

impl StepOutcome {
    pub fn is_stable(&self) -> bool {
        matches!(self, StepOutcome::Stable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_accepts_bounds() {
        assert!(HorizonError::check_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(HorizonError::check_range("x", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn check_range_rejects_nan_and_outside() {
        assert!(HorizonError::check_range("x", f32::NAN, 0.0, 1.0).is_err());
        let err = HorizonError::check_range("damping", 1.5, 0.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("damping"));
    }

    #[test]
    fn toml_error_converts() {
        let err: HorizonError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, HorizonError::TomlParseError(_)));
    }
}
