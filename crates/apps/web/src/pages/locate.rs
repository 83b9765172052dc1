use std::sync::Arc;
use std::time::Duration;

use foundation::math::LatLon;
use remote::SunApi;
use runtime::{Completion, EventBus, KeyedTask};
use tracing::info;

use crate::config::ClientConfig;
use crate::geolocation::{GeoError, Geolocator, locate};
use crate::route::{Navigation, Route};
use crate::search::{DualSearch, SearchSettings, SearchStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateStep {
    Search(SearchStep),
    Position(Completion),
}

/// Landing page: dual search plus "use my location".
pub struct LocatePage {
    search: DualSearch,
    geolocator: Option<Arc<dyn Geolocator>>,
    geo_timeout: Duration,
    attempt: u32,
    position: KeyedTask<u32, Result<LatLon, GeoError>>,
    geo_error: Option<GeoError>,
    navigation: EventBus<Navigation>,
}

impl LocatePage {
    pub fn new(
        api: Arc<dyn SunApi>,
        geolocator: Option<Arc<dyn Geolocator>>,
        cfg: &ClientConfig,
    ) -> Self {
        Self {
            search: DualSearch::new(api, SearchSettings::from(cfg)),
            geolocator,
            geo_timeout: cfg.geolocation_timeout,
            attempt: 0,
            position: KeyedTask::new("geolocation"),
            geo_error: None,
            navigation: EventBus::new(),
        }
    }

    pub fn search(&self) -> &DualSearch {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut DualSearch {
        &mut self.search
    }

    pub fn select_place(&mut self, index: usize) -> bool {
        let route = self.search.select_place(index);
        self.navigate(route)
    }

    pub fn select_address(&mut self, index: usize) -> bool {
        let route = self.search.select_address(index);
        self.navigate(route)
    }

    /// Starts (or restarts) a position request. Earlier attempts still in
    /// flight are ignored when they land.
    pub fn use_my_location(&mut self) {
        self.geo_error = None;
        if self.geolocator.is_none() {
            self.geo_error = Some(GeoError::Unsupported);
            return;
        }
        self.attempt += 1;
        let request = locate(self.geolocator.clone(), self.geo_timeout);
        self.position.issue(self.attempt, request);
    }

    pub fn is_locating(&self) -> bool {
        self.position.is_pending()
    }

    pub fn geo_error(&self) -> Option<GeoError> {
        self.geo_error
    }

    /// Inline message shown under the location button.
    pub fn geo_message(&self) -> Option<&'static str> {
        self.geo_error.as_ref().map(GeoError::message)
    }

    pub fn drain_navigation(&mut self) -> Vec<Navigation> {
        self.navigation.drain()
    }

    pub fn is_active(&self) -> bool {
        self.search.is_active() || self.position.has_in_flight()
    }

    pub async fn step(&mut self) -> Option<LocateStep> {
        let searching = self.search.is_active();
        let locating = self.position.has_in_flight();
        let step = tokio::select! {
            Some(step) = self.search.step(), if searching => LocateStep::Search(step),
            Some(done) = self.position.next_completion(), if locating => LocateStep::Position(done),
            else => return None,
        };
        if step == LocateStep::Position(Completion::Applied) {
            match self.position.current() {
                Some(Ok(center)) => {
                    let center = *center;
                    info!(lat = center.lat, lon = center.lon, "located");
                    self.navigate(Some(Route::nearby(center)));
                }
                Some(Err(err)) => {
                    info!(%err, "geolocation failed");
                    self.geo_error = Some(*err);
                }
                None => {}
            }
        }
        Some(step)
    }

    pub async fn settle(&mut self) {
        while self.step().await.is_some() {}
    }

    fn navigate(&mut self, route: Option<Route>) -> bool {
        match route {
            Some(route) => {
                self.navigation.emit(Navigation::Push(route));
                true
            }
            None => false,
        }
    }
}
