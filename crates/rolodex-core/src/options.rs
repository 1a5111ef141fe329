use crate::domain::Normalizer;
use crate::error::CoreError;

pub const DEFAULT_PHONE_NAME_THRESHOLD: f64 = 60.0;
pub const DEFAULT_FUZZY_NAME_THRESHOLD: f64 = 85.0;
pub const DEFAULT_FUZZY_SCAN_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub normalizer: Normalizer,
    /// Tier 2 requires a name similarity strictly above this value.
    pub phone_name_threshold: f64,
    /// Tier 4 requires a name similarity of at least this value.
    pub fuzzy_name_threshold: f64,
    /// Tier 4 is skipped once the store holds more records than this.
    pub fuzzy_scan_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            phone_name_threshold: DEFAULT_PHONE_NAME_THRESHOLD,
            fuzzy_name_threshold: DEFAULT_FUZZY_NAME_THRESHOLD,
            fuzzy_scan_limit: DEFAULT_FUZZY_SCAN_LIMIT,
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_threshold(self.phone_name_threshold)?;
        validate_threshold(self.fuzzy_name_threshold)?;
        Ok(())
    }
}

pub fn validate_threshold(value: f64) -> Result<f64, CoreError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(CoreError::InvalidThreshold(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{validate_threshold, EngineOptions};

    #[test]
    fn defaults_are_valid() {
        assert!(EngineOptions::default().validate().is_ok());
    }

    #[test]
    fn thresholds_outside_range_are_rejected() {
        assert!(validate_threshold(-1.0).is_err());
        assert!(validate_threshold(100.5).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
        assert_eq!(validate_threshold(85.0), Ok(85.0));
    }
}
