use std::sync::Arc;

use foundation::{ClockTime, DAY_END, DAY_START, MountClock, PlaceId};
use layers::{format_distance, nearby_style, weather_label};
use map::{MapController, MapEvent, MapSurface, NearbyView, Viewport};
use remote::{NearbyPlace, SunApi};
use runtime::{Completion, EventBus};

use crate::config::ClientConfig;
use crate::route::{Navigation, Route};

/// One row of the list under the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceCard {
    pub id: PlaceId,
    pub icon: &'static str,
    pub name: String,
    pub address: Option<String>,
    pub distance: String,
    pub status: &'static str,
    pub sun_until: Option<String>,
}

impl PlaceCard {
    pub fn new(place: &NearbyPlace) -> Self {
        let style = nearby_style(place.status);
        Self {
            id: place.id,
            icon: style.icon,
            name: place.name.clone(),
            address: place.address.clone(),
            distance: format_distance(place.distance_meters),
            status: style.label,
            sun_until: place.sun_until.as_ref().map(|t| format!("Sun until {t}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NearbyList {
    Loading,
    Failed(&'static str),
    Empty(&'static str),
    Cards(Vec<PlaceCard>),
}

/// Map, time-of-day selector and list of nearby terraces.
pub struct NearbyPage<S: MapSurface> {
    map: MapController<S>,
    clock: MountClock,
    navigation: EventBus<Navigation>,
}

impl<S: MapSurface> NearbyPage<S> {
    /// `lat`/`lon` are the raw URL values; anything unusable falls back to
    /// the default center.
    pub fn mount(
        api: Arc<dyn SunApi>,
        surface: S,
        cfg: &ClientConfig,
        lat: Option<&str>,
        lon: Option<&str>,
        clock: MountClock,
    ) -> Self {
        let map = MapController::mount(
            api,
            surface,
            &cfg.renderer,
            Viewport::from_url_params(lat, lon),
            clock.today(),
            clock.default_time(),
        );
        Self {
            map,
            clock,
            navigation: EventBus::new(),
        }
    }

    pub fn map(&self) -> &MapController<S> {
        &self.map
    }

    /// Pan gestures go straight to the controller.
    pub fn map_mut(&mut self) -> &mut MapController<S> {
        &mut self.map
    }

    pub fn time(&self) -> ClockTime {
        self.map.time()
    }

    pub fn slider_bounds(&self) -> (ClockTime, ClockTime) {
        (DAY_START, DAY_END)
    }

    /// Raw slider position in minutes; snapped and clamped before use.
    pub fn set_slider(&mut self, raw_minutes: i64) -> ClockTime {
        let time = ClockTime::from_slider(raw_minutes);
        self.map.set_datetime(self.clock.today(), time);
        time
    }

    pub fn open_place(&mut self, id: PlaceId) {
        self.navigation.emit(Navigation::Push(Route::detail(id)));
    }

    /// "Clear sky - 10% clouds"
    pub fn weather_header(&self) -> Option<String> {
        match self.map.nearby() {
            NearbyView::Ready(resp) => Some(format!(
                "{} - {}% clouds",
                weather_label(resp.weather.status),
                resp.weather.cloud_cover_pct
            )),
            _ => None,
        }
    }

    pub fn list(&self) -> NearbyList {
        match self.map.nearby() {
            NearbyView::Loading => NearbyList::Loading,
            NearbyView::Failed(_) => NearbyList::Failed("Could not load nearby terraces"),
            NearbyView::Ready(resp) if resp.places.is_empty() => {
                NearbyList::Empty("No terrace found in this area")
            }
            NearbyView::Ready(resp) => {
                NearbyList::Cards(resp.places.iter().map(PlaceCard::new).collect())
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.map.has_in_flight()
    }

    pub async fn step(&mut self) -> Option<Completion> {
        self.map.next_completion().await
    }

    pub async fn settle(&mut self) {
        while self.step().await.is_some() {}
    }

    /// URL changes requested since the last call, in order.
    pub fn drain_navigation(&mut self) -> Vec<Navigation> {
        for event in self.map.drain_events() {
            let nav = match event {
                MapEvent::ReplaceUrl { center } => Navigation::Replace(Route::nearby(center)),
                MapEvent::Navigate(id) => Navigation::Push(Route::detail(id)),
            };
            self.navigation.emit(nav);
        }
        self.navigation.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedApi;
    use chrono::NaiveDate;
    use foundation::math::LatLon;
    use map::{MarkerKind, RecordingSurface};
    use pretty_assertions::assert_eq;
    use remote::NearbyStatus;

    fn june_first_at(h: u32, m: u32) -> MountClock {
        MountClock::fixed(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    fn mount(
        api: &Arc<ScriptedApi>,
        screen: &RecordingSurface,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> NearbyPage<RecordingSurface> {
        NearbyPage::mount(
            api.clone(),
            screen.clone(),
            &ClientConfig::default(),
            lat,
            lon,
            june_first_at(14, 7),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn sunny_paris_renders_one_marker_and_one_card() {
        let api = Arc::new(ScriptedApi::default());
        let screen = RecordingSurface::new();
        let mut page = mount(&api, &screen, Some("48.8566"), Some("2.3522"));
        assert_eq!(page.list(), NearbyList::Loading);
        page.settle().await;

        let query = api.nearby_queries()[0];
        assert_eq!(query.center(), LatLon::new(48.8566, 2.3522));
        assert_eq!(query.datetime(), "2024-06-01T14:00:00");

        let markers = screen.snapshot().markers;
        let places: Vec<_> = markers
            .iter()
            .filter(|m| matches!(m.kind, MarkerKind::Place { .. }))
            .collect();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].color, nearby_style(NearbyStatus::Sun).color);

        let NearbyList::Cards(cards) = page.list() else {
            panic!("expected cards, got {:?}", page.list());
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].distance, "120m");
        assert_eq!(cards[0].status, "In the sun");
        assert_eq!(cards[0].sun_until.as_deref(), Some("Sun until 17:30"));
        assert_eq!(page.weather_header().as_deref(), Some("Clear sky - 10% clouds"));
        // Timeline and sun overlay belong to the detail view.
        assert_eq!(screen.snapshot().sun, None);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_url_coordinates_fall_back_to_paris() {
        let api = Arc::new(ScriptedApi::default());
        let screen = RecordingSurface::new();
        let page = mount(&api, &screen, Some("north"), Some("2.0"));
        assert_eq!(page.map().viewport().center(), map::DEFAULT_CENTER);
        assert_eq!(screen.snapshot().center, Some(map::DEFAULT_CENTER));
    }

    #[tokio::test(start_paused = true)]
    async fn slider_snaps_clamps_and_rekeys() {
        let api = Arc::new(ScriptedApi::default());
        let screen = RecordingSurface::new();
        let mut page = mount(&api, &screen, None, None);
        assert_eq!(page.set_slider(97), ClockTime::from_hm(7, 0).unwrap());
        assert_eq!(page.set_slider(16 * 60 + 8), ClockTime::from_hm(16, 15).unwrap());
        assert_eq!(page.set_slider(23 * 60 + 50), DAY_END);
        page.settle().await;

        let times: Vec<_> = api.nearby_queries().iter().map(|q| q.time.to_string()).collect();
        assert_eq!(times, vec!["14:00", "07:00", "16:15", "22:00"]);
        assert!(page.drain_navigation().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_pan_replaces_the_url_and_clicks_push() {
        let api = Arc::new(ScriptedApi::default());
        let screen = RecordingSurface::new();
        let mut page = mount(&api, &screen, None, None);
        page.settle().await;
        let map = page.map_mut();
        map.pan_start();
        map.pan_to(48.8600, 2.3500);
        map.pan_end();
        map.marker_click(PlaceId::new(1));
        assert_eq!(
            page.drain_navigation(),
            vec![
                Navigation::Replace(Route::nearby(LatLon::new(48.86, 2.35))),
                Navigation::Push(Route::detail(PlaceId::new(1))),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_is_a_named_error_not_a_crash() {
        let api = Arc::new(ScriptedApi::default());
        api.fail_nearby();
        let screen = RecordingSurface::new();
        let mut page = mount(&api, &screen, None, None);
        page.settle().await;
        assert_eq!(page.list(), NearbyList::Failed("Could not load nearby terraces"));
        assert_eq!(page.weather_header(), None);
        // The user marker is still drawn.
        assert_eq!(screen.snapshot().markers.len(), 1);
    }
}
