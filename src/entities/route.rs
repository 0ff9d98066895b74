use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;
use crate::error::{invalid_event_error, Error};

/// Pages reachable from the transit site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    NearbyStops,
    BusRoutes,
    TouristPlaces,
    Help,
    SearchResults,
}

impl Page {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Home => "index.html",
            Self::NearbyStops => "nearby-stops.html",
            Self::BusRoutes => "bus-routes.html",
            Self::TouristPlaces => "tourist-places.html",
            Self::Help => "help.html",
            Self::SearchResults => "search-results.html",
        }
    }

    /// Maps a top navigation link label to its page.
    pub fn from_nav_label(label: &str) -> Option<Page> {
        match label.trim() {
            "Home" => Some(Self::Home),
            "Nearby Bus Stops" => Some(Self::NearbyStops),
            "Bus Routes" => Some(Self::BusRoutes),
            "Tourist Places Near Me" => Some(Self::TouristPlaces),
            "Help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// A page plus ordered query parameters, ready to be handed to the browser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub page: Page,
    pub params: Vec<(String, String)>,
}

impl NavigationRequest {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            params: vec![],
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn nearby_stops(coordinates: Coordinates) -> Self {
        Self::new(Page::NearbyStops)
            .param("lat", coordinates.latitude().to_string())
            .param("lon", coordinates.longitude().to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders `page.html?k=v&...` with form-urlencoded parameters.
    pub fn path(&self) -> Result<String, Error> {
        if self.params.is_empty() {
            return Ok(self.page.file_name().into());
        }

        let query = serde_urlencoded::to_string(&self.params).map_err(invalid_event_error)?;

        Ok(format!("{}?{}", self.page.file_name(), query))
    }
}

#[test]
fn nav_labels_map_to_pages() {
    assert_eq!(Page::from_nav_label(" Help "), Some(Page::Help));
    assert_eq!(
        Page::from_nav_label("Tourist Places Near Me"),
        Some(Page::TouristPlaces)
    );
    assert_eq!(Page::from_nav_label("Contact"), None);
}

#[test]
fn nearby_stops_path_carries_coordinates() {
    let request = NavigationRequest::nearby_stops(Coordinates::new(12.9716, 77.5946))
        .param("updated", "true");

    assert_eq!(
        request.path().unwrap(),
        "nearby-stops.html?lat=12.9716&lon=77.5946&updated=true"
    );
    assert_eq!(NavigationRequest::new(Page::Home).path().unwrap(), "index.html");
}
