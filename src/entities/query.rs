use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, NavigationRequest, Page};

/// A validated route search. Built once on submit and consumed by navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    from: String,
    to: String,
    origin_coordinates: Option<Coordinates>,
}

impl SearchQuery {
    pub(crate) fn new(from: String, to: String, origin_coordinates: Option<Coordinates>) -> Self {
        Self {
            from,
            to,
            origin_coordinates,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn origin_coordinates(&self) -> Option<Coordinates> {
        self.origin_coordinates
    }

    pub fn into_navigation(self) -> NavigationRequest {
        let (lat, lon) = match self.origin_coordinates {
            Some(coordinates) => (
                coordinates.latitude().to_string(),
                coordinates.longitude().to_string(),
            ),
            None => (String::new(), String::new()),
        };

        NavigationRequest::new(Page::SearchResults)
            .param("from", self.from)
            .param("to", self.to)
            .param("lat", lat)
            .param("lon", lon)
    }
}

#[test]
fn navigation_without_coordinates_sends_empty_lat_lon() {
    let query = SearchQuery::new("Old Town".into(), "City Hall".into(), None);

    assert_eq!(
        query.into_navigation().path().unwrap(),
        "search-results.html?from=Old+Town&to=City+Hall&lat=&lon="
    );
}

#[test]
fn navigation_encodes_rendered_coordinates() {
    let coordinates = Coordinates::new(12.9716, 77.5946);
    let query = SearchQuery::new(coordinates.render(), "Museum District".into(), Some(coordinates));

    let request = query.into_navigation();

    assert_eq!(request.get("from"), Some("Current Location (12.9716, 77.5946)"));
    assert_eq!(
        request.path().unwrap(),
        "search-results.html?from=Current+Location+%2812.9716%2C+77.5946%29\
         &to=Museum+District&lat=12.9716&lon=77.5946"
    );
}
