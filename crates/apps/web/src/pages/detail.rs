use std::sync::Arc;

use chrono::NaiveDate;
use foundation::math::LatLon;
use foundation::{MountClock, PlaceId, parse_date, step_date};
use layers::{StatusStyle, SunProjector, SunView, TimelineBar, TimelineModel, legend};
use map::{MapSurface, Marker, RendererConfig, SurfaceGuard};
use remote::{ApiError, SunApi, TimelineQuery, TimelineResponse};
use runtime::{Completion, EventBus, KeyedTask};
use tracing::warn;

use crate::config::ClientConfig;
use crate::route::{Navigation, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailHeader {
    pub name: String,
    pub address: Option<String>,
    /// "Saturday 1 June"
    pub date_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loading,
    Failed(&'static str),
    Ready {
        header: DetailHeader,
        bar: TimelineBar,
        legend: Vec<StatusStyle>,
        sun: SunView,
        sun_badge: Option<String>,
    },
}

/// Timeline and sun overlay for one terrace, with a day stepper.
///
/// The overlay surface is mounted once the place's position is known.
pub struct DetailPage<S: MapSurface> {
    api: Arc<dyn SunApi>,
    place: PlaceId,
    date: Option<NaiveDate>,
    clock: MountClock,
    timeline: KeyedTask<TimelineQuery, Result<TimelineResponse, ApiError>>,
    model: TimelineModel,
    projector: SunProjector,
    renderer: RendererConfig,
    unmounted: Option<S>,
    surface: Option<SurfaceGuard<S>>,
    navigation: EventBus<Navigation>,
}

impl<S: MapSurface> DetailPage<S> {
    pub fn mount(
        api: Arc<dyn SunApi>,
        surface: S,
        projector: SunProjector,
        cfg: &ClientConfig,
        place: PlaceId,
        date: Option<NaiveDate>,
        clock: MountClock,
    ) -> Self {
        let mut page = Self {
            api,
            place,
            date,
            clock,
            timeline: KeyedTask::new("timeline"),
            model: TimelineModel::new(Some(clock.default_time())),
            projector: projector.with_ray_length(cfg.sun_ray_length_m),
            renderer: RendererConfig {
                zoom: RendererConfig::detail().zoom,
                interactive: false,
                ..cfg.renderer.clone()
            },
            unmounted: Some(surface),
            surface: None,
            navigation: EventBus::new(),
        };
        page.fetch();
        page
    }

    pub fn place(&self) -> PlaceId {
        self.place
    }

    /// Date shown in the URL, if any; otherwise the service picks today.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_deref()
    }

    /// Previous (`-1`) or next (`+1`) day. Pushes `?date=` and re-keys the
    /// timeline query.
    pub fn step_day(&mut self, days: i64) {
        let base = self.date.unwrap_or_else(|| self.clock.today());
        let date = step_date(base, days);
        self.date = Some(date);
        self.navigation.emit(Navigation::Push(Route::Detail {
            id: self.place,
            date: Some(date),
        }));
        self.fetch();
    }

    /// Pointer entered the `index`-th slot of the bar.
    pub fn hover_slot(&mut self, index: usize) {
        let Some(Ok(resp)) = self.timeline.current() else {
            return;
        };
        let bar = TimelineBar::build(&resp.slots, None, "");
        let Some(segment) = bar.segments.get(index) else {
            return;
        };
        if self.model.on_slot_enter(segment) {
            self.refresh_overlay();
        }
    }

    pub fn selected_time(&self) -> Option<foundation::ClockTime> {
        self.model.selected_time()
    }

    pub fn view(&self) -> DetailView {
        match self.timeline.current() {
            None => DetailView::Loading,
            Some(Err(_)) => DetailView::Failed("Could not load the timeline"),
            Some(Ok(resp)) => {
                let sun = self.sun_view(resp);
                DetailView::Ready {
                    header: DetailHeader {
                        name: resp.place.name.clone(),
                        address: resp.place.address.clone(),
                        date_label: parse_date(&resp.date)
                            .map(|d| d.format("%A %-d %B").to_string())
                            .unwrap_or_else(|| resp.date.clone()),
                    },
                    bar: TimelineBar::build(
                        &resp.slots,
                        resp.best_window.as_ref(),
                        &resp.weather_summary,
                    ),
                    legend: legend(),
                    sun,
                    sun_badge: sun.badge(),
                }
            }
        }
    }

    pub fn drain_navigation(&mut self) -> Vec<Navigation> {
        self.navigation.drain()
    }

    pub fn is_active(&self) -> bool {
        self.timeline.has_in_flight()
    }

    pub async fn step(&mut self) -> Option<Completion> {
        let done = self.timeline.next_completion().await?;
        if done == Completion::Applied {
            match self.timeline.current() {
                Some(Ok(resp)) => {
                    let origin = LatLon::new(resp.place.lat, resp.place.lon);
                    self.mount_surface(origin);
                    self.refresh_overlay();
                }
                Some(Err(err)) => warn!(place = %self.place, %err, "timeline query failed"),
                None => {}
            }
        }
        Some(done)
    }

    pub async fn settle(&mut self) {
        while self.step().await.is_some() {}
    }

    fn fetch(&mut self) {
        let key = TimelineQuery::new(self.place, self.date);
        self.timeline.issue(key, self.api.timeline(&key));
    }

    fn sun_view(&self, resp: &TimelineResponse) -> SunView {
        let origin = LatLon::new(resp.place.lat, resp.place.lon);
        match parse_date(&resp.date) {
            Some(date) => self.projector.view(origin, date, self.model.selected_time()),
            None => SunView::Unavailable,
        }
    }

    fn mount_surface(&mut self, origin: LatLon) {
        if let Some(surface) = self.unmounted.take() {
            let mut guard = SurfaceGuard::mount(surface, &self.renderer, origin);
            guard.set_markers(&[Marker::focus(origin)]);
            self.surface = Some(guard);
        } else if let Some(surface) = self.surface.as_mut() {
            surface.set_center(origin);
            surface.set_markers(&[Marker::focus(origin)]);
        }
    }

    fn refresh_overlay(&mut self) {
        let Some(Ok(resp)) = self.timeline.current() else {
            return;
        };
        let view = self.sun_view(resp);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_sun_overlay(&view);
        }
    }
}
