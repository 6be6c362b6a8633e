//! Recent-observation payloads

use serde::{Deserialize, Serialize};

/// Default number of days to look back
pub const DEFAULT_BACK_DAYS: u32 = 7;

/// Default cap on returned observations
pub const DEFAULT_MAX_RESULTS: u32 = 1000;

/// Parameters for a recent-observations request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationQuery {
    /// eBird region code (e.g. "ZA", "US-NY")
    pub region: String,
    pub back: u32,
    pub max_results: u32,
}

impl ObservationQuery {
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            back: DEFAULT_BACK_DAYS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Observation as returned by eBird
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EbirdObservation {
    species_code: Option<String>,
    com_name: Option<String>,
    sci_name: Option<String>,
    obs_dt: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    how_many: Option<u64>,
    loc_name: Option<String>,
}

/// Observation in the shape served to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub species_code: Option<String>,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub observation_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub count: Option<u64>,
    pub location_name: Option<String>,
}

impl From<EbirdObservation> for Observation {
    fn from(raw: EbirdObservation) -> Self {
        Self {
            species_code: raw.species_code,
            common_name: raw.com_name,
            scientific_name: raw.sci_name,
            observation_date: raw.obs_dt,
            latitude: raw.lat,
            longitude: raw.lng,
            count: raw.how_many,
            location_name: raw.loc_name,
        }
    }
}
