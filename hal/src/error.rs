//! Common error types for HAL binding operations

use core::fmt;

/// Errors reported while binding or configuring a peripheral.
///
/// Timer operations themselves never fail once a timer is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Invalid parameter provided
    InvalidParameter,
    /// Operation not supported by this implementation
    NotSupported,
    /// Peripheral has already been handed out
    ResourceUnavailable,
    /// Configuration does not fit the hardware
    ConfigurationError,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NotSupported => write!(f, "operation not supported"),
            Self::ResourceUnavailable => write!(f, "peripheral already in use"),
            Self::ConfigurationError => write!(f, "configuration error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidParameter => defmt::write!(fmt, "InvalidParameter"),
            Self::NotSupported => defmt::write!(fmt, "NotSupported"),
            Self::ResourceUnavailable => defmt::write!(fmt, "ResourceUnavailable"),
            Self::ConfigurationError => defmt::write!(fmt, "ConfigurationError"),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;
