//! Navigable URL state.
//!
//! `/`, `/nearby?lat=..&lon=..` and `/terrasse/{id}?date=YYYY-MM-DD`.

use chrono::NaiveDate;
use foundation::math::LatLon;
use foundation::{PlaceId, format_date, parse_date};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    NotFound(String),
    BadPlaceId(String),
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::NotFound(path) => write!(f, "no page at {path:?}"),
            RouteError::BadPlaceId(raw) => write!(f, "invalid place id {raw:?}"),
        }
    }
}

impl std::error::Error for RouteError {}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    /// Raw coordinates as found in the URL; validated by the map viewport.
    Nearby {
        lat: Option<String>,
        lon: Option<String>,
    },
    Detail {
        id: PlaceId,
        date: Option<NaiveDate>,
    },
}

impl Route {
    pub fn nearby(center: LatLon) -> Self {
        Route::Nearby {
            lat: Some(format!("{:.4}", center.lat)),
            lon: Some(format!("{:.4}", center.lon)),
        }
    }

    pub fn detail(id: PlaceId) -> Self {
        Route::Detail { id, date: None }
    }

    pub fn parse(url: &str) -> Result<Self, RouteError> {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let param = |name: &str| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        };

        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Ok(Route::Home);
        }
        if path == "/nearby" {
            return Ok(Route::Nearby {
                lat: param("lat"),
                lon: param("lon"),
            });
        }
        if let Some(raw_id) = path.strip_prefix("/terrasse/") {
            let id = raw_id
                .parse()
                .map_err(|_| RouteError::BadPlaceId(raw_id.to_string()))?;
            // An unreadable date falls back to the service default.
            let date = param("date").as_deref().and_then(parse_date);
            return Ok(Route::Detail { id, date });
        }
        Err(RouteError::NotFound(path.to_string()))
    }

    pub fn to_url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Nearby { lat, lon } => {
                let mut params = Vec::new();
                if let Some(lat) = lat {
                    params.push(format!("lat={lat}"));
                }
                if let Some(lon) = lon {
                    params.push(format!("lon={lon}"));
                }
                if params.is_empty() {
                    "/nearby".to_string()
                } else {
                    format!("/nearby?{}", params.join("&"))
                }
            }
            Route::Detail { id, date: None } => format!("/terrasse/{id}"),
            Route::Detail { id, date: Some(d) } => {
                format!("/terrasse/{id}?date={}", format_date(*d))
            }
        }
    }
}

/// A URL change requested by a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// New history entry.
    Push(Route),
    /// Rewrite the current entry in place.
    Replace(Route),
}

pub trait History {
    fn current(&self) -> &Route;
    fn push(&mut self, route: Route);
    fn replace(&mut self, route: Route);

    fn apply(&mut self, nav: Navigation) {
        match nav {
            Navigation::Push(route) => self.push(route),
            Navigation::Replace(route) => self.replace(route),
        }
    }
}

/// History kept in memory (terminal front end, tests).
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Route>,
}

impl MemoryHistory {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pops the current entry unless it is the only one.
    pub fn back(&mut self) -> Option<Route> {
        if self.entries.len() > 1 {
            self.entries.pop()
        } else {
            None
        }
    }
}

impl History for MemoryHistory {
    fn current(&self) -> &Route {
        // `entries` is never empty: `new` seeds it and `back` keeps one.
        &self.entries[self.entries.len() - 1]
    }

    fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(last) => *last = route,
            None => self.entries.push(route),
        }
    }
}
