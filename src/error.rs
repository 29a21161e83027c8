//! Error types for turntable-motion.
//!
//! Provides unified error handling across configuration, request parsing and
//! motor control. A segment cut short by the runaway cutoff is not an error;
//! see [`SegmentOutcome`](crate::motion::SegmentOutcome).

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all turntable-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motion request rejected at the boundary
    Request(RequestError),
    /// Motor hardware error
    Motor(MotorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Invalid base steps per revolution (must be > 0)
    InvalidStepsPerRevolution(u16),
    /// Invalid gear ratio (must be > 0)
    InvalidGearRatio(f32),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid max acceleration (must be > 0)
    InvalidMaxAcceleration(f32),
    /// Invalid max deceleration (must be > 0)
    InvalidMaxDeceleration(f32),
    /// Invalid default acceleration or deceleration (must be > 0)
    InvalidDefaultRamp(f32),
    /// Invalid runaway factor (must be >= 1)
    InvalidRunawayFactor(f32),
    /// Invalid STEP pulse width (must be > 0)
    InvalidPulseWidth(u32),
    /// A required driver component was not supplied to the builder
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion request errors. No motion is attempted when one of these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// A required parameter is absent
    MissingParameter(&'static str),
    /// A parameter is present but malformed or out of range
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value (truncated)
        value: heapless::String<32>,
    },
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Request(e) => write!(f, "Request error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidMaxAcceleration(v) => write!(f, "Invalid max acceleration: {}. Must be > 0", v),
            ConfigError::InvalidMaxDeceleration(v) => write!(f, "Invalid max deceleration: {}. Must be > 0", v),
            ConfigError::InvalidDefaultRamp(v) => {
                write!(f, "Invalid default acceleration/deceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidRunawayFactor(v) => write!(f, "Invalid runaway factor: {}. Must be >= 1", v),
            ConfigError::InvalidPulseWidth(v) => write!(f, "Invalid pulse width: {} us. Must be > 0", v),
            ConfigError::MissingComponent(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            RequestError::InvalidParameter { name, value } => {
                write!(f, "Invalid value '{}' for parameter {}", value, name)
            }
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Error::Request(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for RequestError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let err = Error::from(RequestError::MissingParameter("angle"));
        assert_eq!(format!("{}", err), "Request error: Missing parameter: angle");
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = RequestError::InvalidParameter {
            name: "time",
            value: heapless::String::try_from("abc").unwrap(),
        };
        assert_eq!(format!("{}", err), "Invalid value 'abc' for parameter time");
    }
}
