//! Wire types of the terrace service.
//!
//! Field names on the wire are the service's own (French) identifiers; the
//! Rust side uses English names and maps them with `serde(rename)`.

use foundation::PlaceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse", default)]
    pub address: Option<String>,
    #[serde(rename = "arrondissement", default)]
    pub district: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    #[serde(rename = "postcode", default)]
    pub postal_code: String,
}

/// Status of one timeline slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "soleil")]
    Sun,
    #[serde(rename = "mitige")]
    Mixed,
    #[serde(rename = "couvert")]
    Overcast,
    #[serde(rename = "ombre_batiment")]
    BuildingShadow,
    #[serde(rename = "nuit")]
    Night,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// `"HH:MM"`, local civil time.
    pub time: String,
    #[serde(rename = "sun_altitude")]
    pub sun_altitude_deg: f64,
    #[serde(rename = "urban_sunny")]
    pub is_sunny_urban: bool,
    #[serde(rename = "cloud_cover")]
    pub cloud_cover_pct: u8,
    pub status: SlotStatus,
}

/// Longest sunny stretch of the day, as reported.
///
/// Times are kept as raw strings: a malformed value must not fail the whole
/// timeline, it is only suppressed when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestWindow {
    #[serde(rename = "debut")]
    pub start_time: String,
    #[serde(rename = "fin")]
    pub end_time: String,
    #[serde(rename = "duree_minutes")]
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    #[serde(rename = "terrasse")]
    pub place: Place,
    pub date: String,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
    #[serde(rename = "meilleur_creneau", default)]
    pub best_window: Option<BestWindow>,
    #[serde(rename = "meteo_resume", default)]
    pub weather_summary: String,
}

/// Instantaneous status of a nearby terrace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NearbyStatus {
    #[serde(rename = "soleil")]
    Sun,
    #[serde(rename = "mitige")]
    Mixed,
    #[serde(rename = "couvert")]
    Overcast,
    #[serde(rename = "ombre")]
    Shadow,
    #[serde(rename = "nuit")]
    Night,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub id: PlaceId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse", default)]
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "distance_m")]
    pub distance_meters: u32,
    pub status: NearbyStatus,
    #[serde(rename = "soleil_jusqua", default)]
    pub sun_until: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherStatus {
    #[serde(rename = "degage")]
    Clear,
    #[serde(rename = "mitige")]
    Mixed,
    #[serde(rename = "couvert")]
    Overcast,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    #[serde(rename = "cloud_cover")]
    pub cloud_cover_pct: u8,
    pub status: WeatherStatus,
    #[serde(rename = "precipitation_probability", default)]
    pub precipitation_probability_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyResponse {
    #[serde(rename = "meteo")]
    pub weather: WeatherInfo,
    #[serde(rename = "terrasses", default)]
    pub places: Vec<NearbyPlace>,
}
