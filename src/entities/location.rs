use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A resolved latitude/longitude pair. Stored as a `Point` with `x` as
/// longitude and `y` as latitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(Point<f64>);

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }

    /// Text shown in a field filled from geolocation.
    pub fn render(&self) -> String {
        format!(
            "Current Location ({:.4}, {:.4})",
            self.latitude(),
            self.longitude()
        )
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        coordinates.0
    }
}

/// One of the two location slots of the route search form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::Start, Endpoint::End];

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Start => "My Location",
            Self::End => "Enter destination",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldValue {
    Unset,
    Text {
        text: String,
    },
    Resolved {
        text: String,
        coordinates: Coordinates,
    },
}

/// The state of a single location field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationEndpoint {
    pub value: FieldValue,
}

impl Default for LocationEndpoint {
    fn default() -> Self {
        Self {
            value: FieldValue::Unset,
        }
    }
}

impl LocationEndpoint {
    pub fn is_set(&self) -> bool {
        !matches!(self.value, FieldValue::Unset)
    }

    /// Raw entered text, or `None` when the field has never been filled.
    pub fn entered_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Unset => None,
            FieldValue::Text { text } | FieldValue::Resolved { text, .. } => Some(text),
        }
    }

    /// What the field shows, falling back to the placeholder when unset.
    pub fn display_text(&self, endpoint: Endpoint) -> &str {
        self.entered_text().unwrap_or_else(|| endpoint.placeholder())
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match &self.value {
            FieldValue::Resolved { coordinates, .. } => Some(*coordinates),
            _ => None,
        }
    }

    /// A field counts as a placeholder when unset, blank, or holding the
    /// sentinel text literally.
    pub fn is_placeholder(&self, endpoint: Endpoint) -> bool {
        match self.entered_text() {
            None => true,
            Some(text) => {
                let text = text.trim();
                text.is_empty() || text == endpoint.placeholder()
            }
        }
    }
}

#[test]
fn coordinates_render_to_four_decimals() {
    let coordinates = Coordinates::new(12.971598, 77.594562);

    assert_eq!(coordinates.render(), "Current Location (12.9716, 77.5946)");
    assert_eq!(coordinates.latitude(), 12.971598);
    assert_eq!(Point::from(coordinates).x(), 77.594562);
}

#[test]
fn sentinel_text_is_a_placeholder() {
    let unset = LocationEndpoint::default();
    let typed_sentinel = LocationEndpoint {
        value: FieldValue::Text {
            text: "  My Location ".into(),
        },
    };
    let blank = LocationEndpoint {
        value: FieldValue::Text { text: "   ".into() },
    };

    assert!(unset.is_placeholder(Endpoint::Start));
    assert!(!unset.is_set());
    assert!(typed_sentinel.is_set());
    assert!(typed_sentinel.is_placeholder(Endpoint::Start));
    assert!(!typed_sentinel.is_placeholder(Endpoint::End));
    assert!(blank.is_placeholder(Endpoint::End));
    assert_eq!(unset.display_text(Endpoint::End), "Enter destination");
}
