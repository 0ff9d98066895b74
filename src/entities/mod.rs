mod location;
mod query;
mod route;

pub use location::{Coordinates, Endpoint, FieldValue, LocationEndpoint};
pub use query::SearchQuery;
pub use route::{NavigationRequest, Page};
