use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("name is required")]
    EmptyName,
    #[error("at least one contact channel (phone, email, website) is required")]
    NoContactChannel,
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),
    #[error("invalid leading digits: {0}")]
    InvalidLeadingDigits(String),
    #[error("invalid threshold: {0}")]
    InvalidThreshold(f64),
}
