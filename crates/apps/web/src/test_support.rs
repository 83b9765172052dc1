//! In-memory `SunApi` for page and search tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use foundation::PlaceId;
use futures_util::future::BoxFuture;
use remote::{
    ApiError, BestWindow, GeocodedAddress, NearbyPlace, NearbyQuery, NearbyResponse,
    NearbyStatus, Place, SlotStatus, SunApi, TimeSlot, TimelineQuery, TimelineResponse,
    WeatherInfo, WeatherStatus,
};

const DEFAULT_DELAY: Duration = Duration::from_millis(10);

#[derive(Default)]
struct Script {
    place_queries: Vec<String>,
    address_queries: Vec<String>,
    nearby_queries: Vec<NearbyQuery>,
    timeline_queries: Vec<TimelineQuery>,
    place_delays: HashMap<String, Duration>,
    address_delays: HashMap<String, Duration>,
    fail_places: bool,
    fail_addresses: bool,
    fail_nearby: bool,
    fail_timeline: bool,
    slots: Option<Vec<TimeSlot>>,
    best_window: Option<BestWindow>,
}

#[derive(Default)]
pub struct ScriptedApi {
    script: Mutex<Script>,
}

impl ScriptedApi {
    fn with<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut script = self.script.lock().unwrap();
        f(&mut *script)
    }

    pub fn place_queries(&self) -> Vec<String> {
        self.with(|s| s.place_queries.clone())
    }

    pub fn address_queries(&self) -> Vec<String> {
        self.with(|s| s.address_queries.clone())
    }

    pub fn nearby_queries(&self) -> Vec<NearbyQuery> {
        self.with(|s| s.nearby_queries.clone())
    }

    pub fn timeline_queries(&self) -> Vec<TimelineQuery> {
        self.with(|s| s.timeline_queries.clone())
    }

    pub fn delay_places(&self, text: &str, delay: Duration) {
        self.with(|s| s.place_delays.insert(text.to_string(), delay));
    }

    pub fn delay_addresses(&self, text: &str, delay: Duration) {
        self.with(|s| s.address_delays.insert(text.to_string(), delay));
    }

    pub fn fail_places(&self) {
        self.with(|s| s.fail_places = true);
    }

    pub fn fail_addresses(&self) {
        self.with(|s| s.fail_addresses = true);
    }

    pub fn fail_nearby(&self) {
        self.with(|s| s.fail_nearby = true);
    }

    pub fn fail_timeline(&self) {
        self.with(|s| s.fail_timeline = true);
    }

    pub fn set_slots(&self, slots: Vec<TimeSlot>) {
        self.with(|s| s.slots = Some(slots));
    }

    pub fn set_best_window(&self, window: BestWindow) {
        self.with(|s| s.best_window = Some(window));
    }
}

fn answer<T: Send + 'static>(
    delay: Duration,
    outcome: Result<T, ApiError>,
) -> BoxFuture<'static, Result<T, ApiError>> {
    Box::pin(async move {
        tokio::time::sleep(delay).await;
        outcome
    })
}

/// Nearby answer used by the end-to-end scenario.
pub fn sunny_nearby() -> NearbyResponse {
    NearbyResponse {
        weather: WeatherInfo {
            cloud_cover_pct: 10,
            status: WeatherStatus::Clear,
            precipitation_probability_pct: 0,
        },
        places: vec![NearbyPlace {
            id: PlaceId::new(1),
            name: "Chez A".into(),
            address: Some("1 rue X".into()),
            lat: 48.857,
            lon: 2.3522,
            distance_meters: 120,
            status: NearbyStatus::Sun,
            sun_until: Some("17:30".into()),
        }],
    }
}

pub fn sunny_day() -> Vec<TimeSlot> {
    foundation::day_window_slots()
        .map(|t| TimeSlot {
            time: t.to_string(),
            sun_altitude_deg: 30.0,
            is_sunny_urban: true,
            cloud_cover_pct: 0,
            status: SlotStatus::Sun,
        })
        .collect()
}

impl SunApi for ScriptedApi {
    fn search_places(&self, text: &str) -> BoxFuture<'static, Result<Vec<Place>, ApiError>> {
        let (delay, fail) = self.with(|s| {
            s.place_queries.push(text.to_string());
            (s.place_delays.get(text).copied().unwrap_or(DEFAULT_DELAY), s.fail_places)
        });
        let outcome = if fail {
            Err(ApiError::Status(500))
        } else {
            Ok(vec![Place {
                id: PlaceId::new(text.len() as u64),
                name: format!("{text} place"),
                address: None,
                district: Some("75011".into()),
                lat: 48.86,
                lon: 2.37,
            }])
        };
        answer(delay, outcome)
    }

    fn search_addresses(
        &self,
        text: &str,
    ) -> BoxFuture<'static, Result<Vec<GeocodedAddress>, ApiError>> {
        let (delay, fail) = self.with(|s| {
            s.address_queries.push(text.to_string());
            (s.address_delays.get(text).copied().unwrap_or(DEFAULT_DELAY), s.fail_addresses)
        });
        let outcome = if fail {
            Err(ApiError::Transport("connection reset".into()))
        } else {
            Ok(vec![GeocodedAddress {
                lat: 48.85,
                lon: 2.35,
                label: format!("1 {text}"),
                postal_code: "75004".into(),
            }])
        };
        answer(delay, outcome)
    }

    fn nearby(&self, query: &NearbyQuery) -> BoxFuture<'static, Result<NearbyResponse, ApiError>> {
        let fail = self.with(|s| {
            s.nearby_queries.push(*query);
            s.fail_nearby
        });
        let outcome = if fail { Err(ApiError::Status(502)) } else { Ok(sunny_nearby()) };
        answer(DEFAULT_DELAY, outcome)
    }

    fn timeline(
        &self,
        query: &TimelineQuery,
    ) -> BoxFuture<'static, Result<TimelineResponse, ApiError>> {
        let (fail, slots, best_window) = self.with(|s| {
            s.timeline_queries.push(*query);
            (s.fail_timeline, s.slots.clone(), s.best_window.clone())
        });
        let outcome = if fail {
            Err(ApiError::Decode("expected value at line 1".into()))
        } else {
            Ok(TimelineResponse {
                place: Place {
                    id: query.place,
                    name: "Le Zinc".into(),
                    address: Some("3 rue de Lappe".into()),
                    district: Some("75011".into()),
                    lat: 48.8534,
                    lon: 2.3722,
                },
                date: query
                    .date
                    .map(foundation::format_date)
                    .unwrap_or_else(|| "2024-06-01".into()),
                slots: slots.unwrap_or_else(sunny_day),
                best_window,
                weather_summary: "Clear sky all afternoon".into(),
            })
        };
        answer(DEFAULT_DELAY, outcome)
    }
}
