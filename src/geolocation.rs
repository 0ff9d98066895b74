use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::future::Future;
use std::rc::Rc;
use uuid::Uuid;

use crate::entities::Coordinates;

/// The device position capability as exposed by the browser.
#[async_trait(?Send)]
pub trait GeolocationPlatform {
    fn is_available(&self) -> bool;

    /// A single position fix, or the platform's reason for refusing one.
    async fn current_position(&self) -> Result<Coordinates, String>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    Unsupported,
    Platform(String),
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("unsupported"),
            Self::Platform(reason) => f.write_str(reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Resolved { coordinates: Coordinates },
    Denied { reason: DenialReason },
}

impl Outcome {
    pub fn denied(reason: impl Into<String>) -> Self {
        Outcome::Denied {
            reason: DenialReason::Platform(reason.into()),
        }
    }
}

pub type RequestToken = Uuid;

#[derive(Clone)]
pub struct Gateway {
    platform: Rc<dyn GeolocationPlatform>,
}

impl Gateway {
    pub fn new(platform: Rc<dyn GeolocationPlatform>) -> Self {
        Self { platform }
    }

    pub fn is_available(&self) -> bool {
        self.platform.is_available()
    }

    /// Issues one position request. The returned future owns what it needs,
    /// so it can outlive the borrow of the gateway and be polled from the
    /// controller's event loop. Never retries.
    pub fn request_current_position(
        &self,
        token: RequestToken,
    ) -> impl Future<Output = Outcome> + 'static {
        let platform = self.platform.clone();

        async move {
            if !platform.is_available() {
                tracing::debug!(%token, "geolocation unavailable, not requesting");
                return Outcome::Denied {
                    reason: DenialReason::Unsupported,
                };
            }

            match platform.current_position().await {
                Ok(coordinates) => Outcome::Resolved { coordinates },
                Err(reason) => Outcome::denied(reason),
            }
        }
    }
}
