use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::models::{merge_scalar, require_equal};

/// A location in the real world.
///
/// In the raw archive a post's place carries its `latitude` and `longitude`
/// nested one level down in a `coordinate` object; ingestion hoists them into
/// the location record. The coordinate may be missing entirely, hence both
/// fields are optional.
///
/// The same place is occasionally exported twice for one post, identical in
/// every field except that only one copy carries the `url`. Merging folds
/// such copies into one while keeping the `url` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Location {
    /// Whether this location can be merged with the other location: all
    /// fields identical except `url`, which may be absent on one side.
    pub fn is_mergeable_with(&self, other: &Location) -> bool {
        self.merge(other).is_ok()
    }

    /// Merge this location with the other location. A present `url` is never
    /// lost in favor of an absent one.
    pub fn merge(&self, other: &Location) -> Result<Location, MergeError> {
        const KIND: &str = "location";
        Ok(Location {
            name: require_equal(KIND, "name", &self.name, &other.name)?,
            address: require_equal(KIND, "address", &self.address, &other.address)?,
            latitude: require_equal(KIND, "latitude", &self.latitude, &other.latitude)?,
            longitude: require_equal(KIND, "longitude", &self.longitude, &other.longitude)?,
            url: merge_scalar(KIND, "url", &self.url, &other.url)?,
        })
    }
}

/// Fold a location into a minimal set of non-redundant locations: merged into
/// the first mergeable entry, appended otherwise.
pub(crate) fn add_place(places: &mut Vec<Location>, place: Location) {
    for existing in places.iter_mut() {
        if let Ok(merged) = existing.merge(&place) {
            *existing = merged;
            return;
        }
    }
    places.push(place);
}
