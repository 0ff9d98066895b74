//! The two location fields of the route search form and their pending
//! geolocation requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Endpoint, FieldValue, LocationEndpoint};

/// Border state shown after a field loses focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Valid,
    Invalid,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocationFields {
    start: LocationEndpoint,
    end: LocationEndpoint,
    #[serde(skip)]
    pending: [Option<Uuid>; 2],
}

fn slot(endpoint: Endpoint) -> usize {
    match endpoint {
        Endpoint::Start => 0,
        Endpoint::End => 1,
    }
}

impl LocationFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: Endpoint) -> &LocationEndpoint {
        match endpoint {
            Endpoint::Start => &self.start,
            Endpoint::End => &self.end,
        }
    }

    fn get_mut(&mut self, endpoint: Endpoint) -> &mut LocationEndpoint {
        match endpoint {
            Endpoint::Start => &mut self.start,
            Endpoint::End => &mut self.end,
        }
    }

    pub fn display_text(&self, endpoint: Endpoint) -> &str {
        self.get(endpoint).display_text(endpoint)
    }

    /// Replaces the text of a field typed or picked by the user. Drops any
    /// coordinates and any pending request for that field.
    pub fn set_from_text(&mut self, endpoint: Endpoint, text: impl Into<String>) {
        self.get_mut(endpoint).value = FieldValue::Text { text: text.into() };
        self.pending[slot(endpoint)] = None;
    }

    pub fn set_from_coordinates(
        &mut self,
        endpoint: Endpoint,
        coordinates: Coordinates,
        rendered_text: impl Into<String>,
    ) {
        self.get_mut(endpoint).value = FieldValue::Resolved {
            text: rendered_text.into(),
            coordinates,
        };
    }

    /// Exchanges the complete state of both fields. Pending requests stay
    /// with the field they were issued for, but are no longer current.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.pending = [None, None];
    }

    pub fn is_placeholder(&self, endpoint: Endpoint) -> bool {
        self.get(endpoint).is_placeholder(endpoint)
    }

    pub fn highlight(&self, endpoint: Endpoint) -> Highlight {
        if self.is_placeholder(endpoint) {
            Highlight::Invalid
        } else {
            Highlight::Valid
        }
    }

    pub(crate) fn mark_pending(&mut self, endpoint: Endpoint, token: Uuid) {
        self.pending[slot(endpoint)] = Some(token);
    }

    /// Whether `token` is the latest request issued for the field and no
    /// edit has happened since.
    pub(crate) fn is_current(&self, endpoint: Endpoint, token: Uuid) -> bool {
        self.pending[slot(endpoint)] == Some(token)
    }

    pub(crate) fn settle(&mut self, endpoint: Endpoint, token: Uuid) {
        if self.is_current(endpoint, token) {
            self.pending[slot(endpoint)] = None;
        }
    }
}
