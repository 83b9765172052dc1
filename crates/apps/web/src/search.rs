//! Debounced search over two independent sources: place names and addresses.
//!
//! Typing arms a trailing debouncer. When it fires, each source whose minimum
//! length is met gets a request keyed by the submitted text. Both sources run
//! concurrently in their own [`KeyedTask`], so a slow source never holds the
//! other back and a late answer for older text is dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use foundation::math::LatLon;
use remote::{GeocodedAddress, Place, SunApi};
use runtime::{Completion, Debouncer, KeyedTask};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::route::Route;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub quiet: Duration,
    pub place_min_chars: usize,
    pub address_min_chars: usize,
}

impl From<&ClientConfig> for SearchSettings {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            quiet: cfg.search_quiet,
            place_min_chars: cfg.place_min_chars,
            address_min_chars: cfg.address_min_chars,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// What the dropdown under the input shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dropdown<'a> {
    Hidden,
    Loading,
    /// Every queried source answered with nothing.
    NoResults,
    /// One column per source. `None` means the source was not queried for
    /// this text; an empty slice renders as "no match".
    Columns {
        places: Option<&'a [Place]>,
        addresses: Option<&'a [GeocodedAddress]>,
    },
}

/// Progress made by one call to [`DualSearch::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    Submitted(String),
    Places(Completion),
    Addresses(Completion),
}

pub struct DualSearch {
    api: Arc<dyn SunApi>,
    settings: SearchSettings,
    input: String,
    open: bool,
    debouncer: Debouncer<String>,
    places: KeyedTask<String, Vec<Place>>,
    addresses: KeyedTask<String, Vec<GeocodedAddress>>,
}

impl DualSearch {
    pub fn new(api: Arc<dyn SunApi>, settings: SearchSettings) -> Self {
        Self {
            api,
            settings,
            input: String::new(),
            open: false,
            debouncer: Debouncer::new(settings.quiet),
            places: KeyedTask::new("search.places"),
            addresses: KeyedTask::new("search.addresses"),
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Text typed into the box. Opens the dropdown and restarts the quiet
    /// period.
    pub fn input(&mut self, text: &str) {
        self.input = text.to_string();
        self.open = true;
        self.debouncer.push(self.input.clone(), Instant::now());
    }

    pub fn focus(&mut self) {
        self.open = true;
    }

    /// Click outside the search box.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// `true` while either source has a request for the current text
    /// outstanding.
    pub fn searching(&self) -> bool {
        self.places.is_pending() || self.addresses.is_pending()
    }

    /// Anything left for [`DualSearch::step`] to do.
    pub fn is_active(&self) -> bool {
        self.debouncer.is_armed() || self.places.has_in_flight() || self.addresses.has_in_flight()
    }

    pub fn dropdown(&self) -> Dropdown<'_> {
        let queried = self.places.latest_key().is_some() || self.addresses.latest_key().is_some();
        if !self.open || !queried {
            return Dropdown::Hidden;
        }
        if self.searching() {
            return Dropdown::Loading;
        }
        let places = self.places.current().map(Vec::as_slice);
        let addresses = self.addresses.current().map(Vec::as_slice);
        let found =
            places.is_some_and(|p| !p.is_empty()) || addresses.is_some_and(|a| !a.is_empty());
        if !found {
            return Dropdown::NoResults;
        }
        Dropdown::Columns { places, addresses }
    }

    /// Picks the `index`-th place of the dropdown. Ends the search session.
    pub fn select_place(&mut self, index: usize) -> Option<Route> {
        let place = self.places.current()?.get(index)?;
        let (id, label) = (place.id, place.name.clone());
        self.finish(label);
        Some(Route::detail(id))
    }

    /// Picks the `index`-th address of the dropdown. Ends the search session.
    pub fn select_address(&mut self, index: usize) -> Option<Route> {
        let address = self.addresses.current()?.get(index)?;
        let (center, label) = (
            LatLon::new(address.lat, address.lon),
            address.label.clone(),
        );
        self.finish(label);
        Some(Route::nearby(center))
    }

    /// Waits for the next debounce expiry or source answer.
    ///
    /// Returns `None` right away when nothing is armed or in flight.
    pub async fn step(&mut self) -> Option<SearchStep> {
        let armed = self.debouncer.is_armed();
        let places = self.places.has_in_flight();
        let addresses = self.addresses.has_in_flight();
        tokio::select! {
            Some(text) = self.debouncer.fire(), if armed => {
                self.submit(&text);
                Some(SearchStep::Submitted(text))
            }
            Some(done) = self.places.next_completion(), if places => {
                Some(SearchStep::Places(done))
            }
            Some(done) = self.addresses.next_completion(), if addresses => {
                Some(SearchStep::Addresses(done))
            }
            else => None,
        }
    }

    /// Drives the search until nothing is armed or in flight.
    pub async fn settle(&mut self) {
        while self.step().await.is_some() {}
    }

    fn submit(&mut self, text: &str) {
        let chars = text.trim().chars().count();

        if chars >= self.settings.place_min_chars {
            if self.places.latest_key().map(String::as_str) != Some(text) {
                let request = self.api.search_places(text);
                self.places.issue(text.to_string(), async move {
                    request.await.unwrap_or_else(|err| {
                        warn!(%err, "place search failed");
                        Vec::new()
                    })
                });
            }
        } else {
            self.places.clear();
        }

        if chars >= self.settings.address_min_chars {
            if self.addresses.latest_key().map(String::as_str) != Some(text) {
                let request = self.api.search_addresses(text);
                self.addresses.issue(text.to_string(), async move {
                    request.await.unwrap_or_else(|err| {
                        warn!(%err, "address search failed");
                        Vec::new()
                    })
                });
            }
        } else {
            self.addresses.clear();
        }
        debug!(%text, chars, "search submitted");
    }

    fn finish(&mut self, label: String) {
        self.open = false;
        self.debouncer.cancel();
        self.input = label;
    }
}
