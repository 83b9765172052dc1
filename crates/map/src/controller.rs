//! Map synchronization: viewport <-> URL <-> nearby query <-> markers.

use std::sync::Arc;

use chrono::NaiveDate;
use foundation::math::LatLon;
use foundation::{ClockTime, PlaceId};
use remote::{ApiError, NearbyQuery, NearbyResponse, SunApi};
use runtime::{Completion, EventBus, KeyedTask};
use tracing::{debug, warn};

use crate::surface::{MapSurface, Marker, RendererConfig, SurfaceGuard};
use crate::viewport::Viewport;

pub type NearbyResult = Result<NearbyResponse, ApiError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapState {
    Initializing,
    Idle,
    Panning,
}

/// Requests the controller makes of its owner. It never navigates or
/// touches the URL itself.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Replace (not push) the `lat`/`lon` query parameters.
    ReplaceUrl { center: LatLon },
    Navigate(PlaceId),
}

/// What the list below the map should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NearbyView<'a> {
    Loading,
    Failed(&'a ApiError),
    Ready(&'a NearbyResponse),
}

pub struct MapController<S: MapSurface> {
    api: Arc<dyn SunApi>,
    surface: SurfaceGuard<S>,
    viewport: Viewport,
    state: MapState,
    date: NaiveDate,
    time: ClockTime,
    last_key: Option<NearbyQuery>,
    nearby: KeyedTask<NearbyQuery, NearbyResult>,
    events: EventBus<MapEvent>,
}

impl<S: MapSurface> MapController<S> {
    /// Mounts the surface and issues the first nearby query. The URL is left
    /// alone until the first gesture settles.
    pub fn mount(
        api: Arc<dyn SunApi>,
        surface: S,
        config: &RendererConfig,
        viewport: Viewport,
        date: NaiveDate,
        time: ClockTime,
    ) -> Self {
        let surface = SurfaceGuard::mount(surface, config, viewport.center());
        let mut ctl = Self {
            api,
            surface,
            viewport,
            state: MapState::Initializing,
            date,
            time,
            last_key: None,
            nearby: KeyedTask::new("nearby"),
            events: EventBus::new(),
        };
        ctl.render_markers();
        ctl.refetch_if_moved();
        ctl.state = MapState::Idle;
        ctl
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> ClockTime {
        self.time
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn pan_start(&mut self) {
        self.state = MapState::Panning;
    }

    /// Viewport update during a gesture. No query is issued until
    /// [`MapController::pan_end`]; a move reported while idle (inertia,
    /// programmatic jump) starts the gesture.
    pub fn pan_to(&mut self, lat: f64, lon: f64) {
        if self.viewport.move_to(lat, lon) {
            self.state = MapState::Panning;
            self.render_markers();
        }
    }

    pub fn pan_end(&mut self) {
        if self.state != MapState::Panning {
            return;
        }
        self.state = MapState::Idle;
        if self.refetch_if_moved() {
            self.events.emit(MapEvent::ReplaceUrl {
                center: self.viewport.url_center(),
            });
        }
    }

    /// New selected instant: re-keys the nearby query at the same center.
    pub fn set_datetime(&mut self, date: NaiveDate, time: ClockTime) {
        if (date, time) == (self.date, self.time) {
            return;
        }
        self.date = date;
        self.time = time;
        self.refetch_if_moved();
    }

    pub fn marker_click(&mut self, id: PlaceId) {
        self.events.emit(MapEvent::Navigate(id));
    }

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain()
    }

    pub fn has_in_flight(&self) -> bool {
        self.nearby.has_in_flight()
    }

    pub fn current_query(&self) -> Option<&NearbyQuery> {
        self.nearby.latest_key()
    }

    pub fn nearby(&self) -> NearbyView<'_> {
        match self.nearby.current() {
            Some(Ok(resp)) => NearbyView::Ready(resp),
            Some(Err(err)) => NearbyView::Failed(err),
            None => NearbyView::Loading,
        }
    }

    /// Drives the in-flight nearby request(s). Returns `None` when idle.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let completion = self.nearby.next_completion().await?;
        if completion == Completion::Applied {
            if let Some(Err(err)) = self.nearby.current() {
                warn!(%err, "nearby query failed");
            }
            self.render_markers();
        }
        Some(completion)
    }

    /// Issues a query if the rounded key changed. Returns `true` if it did.
    fn refetch_if_moved(&mut self) -> bool {
        let key = NearbyQuery::new(self.viewport.center(), self.date, self.time);
        if self.last_key == Some(key) {
            debug!(?key, "viewport drift below key precision");
            return false;
        }
        self.last_key = Some(key);
        self.nearby.issue(key, self.api.nearby(&key));
        true
    }

    fn render_markers(&mut self) {
        let mut markers = vec![Marker::user(self.viewport.center())];
        if let Some((_, Ok(resp))) = self.nearby.last_committed() {
            markers.extend(resp.places.iter().map(Marker::place));
        }
        self.surface.set_markers(&markers);
    }
}
