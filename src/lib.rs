pub mod config;
pub mod controller;
pub mod entities;
pub mod error;
pub mod fields;
pub mod geolocation;
pub mod search;
pub mod suggestions;
pub mod surface;
pub mod telemetry;

pub use config::{Config, StalePolicy};
pub use controller::{Controller, LocateTrigger, UiEvent};
pub use error::{Error, ValidationError};
