use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    /// Codes below 100 are internal; everything else is meant for the user.
    pub fn is_user_facing(&self) -> bool {
        self.code >= 100
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

/// Why a route search could not be built. The first failing field wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    MissingOrigin,
    MissingDestination,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOrigin => f.write_str("Please enter or select your starting location"),
            Self::MissingDestination => f.write_str("Please enter your destination"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingOrigin => missing_origin_error(),
            ValidationError::MissingDestination => missing_destination_error(),
        }
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        invalid_event_error(err)
    }
}

pub fn missing_origin_error() -> Error {
    Error {
        code: 100,
        message: ValidationError::MissingOrigin.to_string(),
    }
}

pub fn missing_destination_error() -> Error {
    Error {
        code: 101,
        message: ValidationError::MissingDestination.to_string(),
    }
}

pub fn geolocation_unsupported_error() -> Error {
    Error {
        code: 102,
        message: "Geolocation is not supported by your browser.".into(),
    }
}

pub fn geolocation_denied_error() -> Error {
    Error {
        code: 103,
        message: "Unable to get your location. Please enable location services and try again."
            .into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn invalid_config_error<T: Debug>(err: T) -> Error {
    Error {
        code: 2,
        message: format!("invalid configuration: {:?}", err),
    }
}

pub fn channel_closed_error() -> Error {
    Error {
        code: 3,
        message: "event channel closed".into(),
    }
}

pub fn invalid_event_error<T: Debug>(err: T) -> Error {
    Error {
        code: 4,
        message: format!("invalid event: {:?}", err),
    }
}

#[test]
fn validation_errors_map_to_user_facing_codes() {
    let origin: Error = ValidationError::MissingOrigin.into();
    let destination: Error = ValidationError::MissingDestination.into();

    assert_eq!(origin.code, 100);
    assert_eq!(destination.code, 101);
    assert!(origin.is_user_facing());
    assert_eq!(
        destination.message,
        "Please enter your destination".to_string()
    );
}

#[test]
fn internal_errors_are_not_user_facing() {
    assert!(!env_var_error(env::VarError::NotPresent).is_user_facing());
    assert!(!channel_closed_error().is_user_facing());
    assert!(geolocation_denied_error().is_user_facing());
}
