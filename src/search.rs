use crate::entities::{Endpoint, LocationEndpoint, SearchQuery};
use crate::error::ValidationError;

/// Validates both fields and builds the outbound query. Start is checked
/// before end.
pub fn build(start: &LocationEndpoint, end: &LocationEndpoint) -> Result<SearchQuery, ValidationError> {
    if start.is_placeholder(Endpoint::Start) {
        return Err(ValidationError::MissingOrigin);
    }

    if end.is_placeholder(Endpoint::End) {
        return Err(ValidationError::MissingDestination);
    }

    let from = start.display_text(Endpoint::Start).trim().to_string();
    let to = end.display_text(Endpoint::End).trim().to_string();

    Ok(SearchQuery::new(from, to, start.coordinates()))
}
