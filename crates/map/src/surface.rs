//! Rendering seam between the controllers and a concrete map widget.
//!
//! A surface is mounted once with a [`RendererConfig`] and then only receives
//! idempotent `set_*` calls: each call replaces what was drawn before, so
//! repeating a call with the same input leaves the surface unchanged.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use foundation::PlaceId;
use foundation::math::LatLon;
use layers::{PLACE_MARKER_COLOR, SunView, USER_MARKER_COLOR, format_distance, nearby_style};
use remote::{NearbyPlace, NearbyStatus};

/// Third-party tile host proxied through the local server.
pub const TILE_ORIGIN: &str = "https://tiles.openfreemap.org/";
pub const TILE_PROXY_PATH: &str = "/tiles/";
pub const STYLE_URL: &str = "/tiles/styles/liberty";

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub style_url: String,
    /// Worker script for renderers that need one.
    pub worker_url: Option<String>,
    pub tile_origin: String,
    pub proxy_path: String,
    pub zoom: f64,
    pub interactive: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            style_url: STYLE_URL.to_string(),
            worker_url: None,
            tile_origin: TILE_ORIGIN.to_string(),
            proxy_path: TILE_PROXY_PATH.to_string(),
            zoom: 15.0,
            interactive: true,
        }
    }
}

impl RendererConfig {
    /// Static close-up used under the sun overlay of the detail view.
    pub fn detail() -> Self {
        Self {
            zoom: 17.0,
            interactive: false,
            ..Self::default()
        }
    }

    /// Routes tile-host URLs through the local proxy; other URLs pass through.
    pub fn rewrite_tile_url(&self, url: &str) -> String {
        match url.strip_prefix(self.tile_origin.as_str()) {
            Some(rest) if !self.tile_origin.is_empty() => format!("{}{rest}", self.proxy_path),
            _ => url.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// The viewport center ("you are here").
    User,
    Place { id: PlaceId, status: NearbyStatus },
    /// The single place shown on the detail view.
    Focus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: LatLon,
    pub color: &'static str,
    pub popup: Option<String>,
}

impl Marker {
    pub fn user(position: LatLon) -> Self {
        Self {
            kind: MarkerKind::User,
            position,
            color: USER_MARKER_COLOR,
            popup: Some("Your position".to_string()),
        }
    }

    pub fn focus(position: LatLon) -> Self {
        Self {
            kind: MarkerKind::Focus,
            position,
            color: PLACE_MARKER_COLOR,
            popup: None,
        }
    }

    pub fn place(place: &NearbyPlace) -> Self {
        let mut popup = format!("{}\n{}", place.name, format_distance(place.distance_meters));
        if let Some(until) = &place.sun_until {
            popup.push_str(&format!("\nSun until {until}"));
        }
        Self {
            kind: MarkerKind::Place {
                id: place.id,
                status: place.status,
            },
            position: LatLon::new(place.lat, place.lon),
            color: nearby_style(place.status).color,
            popup: Some(popup),
        }
    }

    pub fn place_id(&self) -> Option<PlaceId> {
        match self.kind {
            MarkerKind::Place { id, .. } => Some(id),
            _ => None,
        }
    }
}

pub trait MapSurface {
    /// Called exactly once, before any other method.
    fn mount(&mut self, config: &RendererConfig, center: LatLon);

    fn set_center(&mut self, center: LatLon);

    /// Replaces every marker currently drawn.
    fn set_markers(&mut self, markers: &[Marker]);

    /// Replaces the sun ray and badge.
    fn set_sun_overlay(&mut self, view: &SunView);

    /// Releases the underlying widget. Safe to call more than once.
    fn teardown(&mut self);
}

/// Owns a mounted surface and tears it down when dropped.
pub struct SurfaceGuard<S: MapSurface> {
    surface: S,
}

impl<S: MapSurface> SurfaceGuard<S> {
    pub fn mount(mut surface: S, config: &RendererConfig, center: LatLon) -> Self {
        surface.mount(config, center);
        Self { surface }
    }
}

impl<S: MapSurface> Deref for SurfaceGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.surface
    }
}

impl<S: MapSurface> DerefMut for SurfaceGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: MapSurface> Drop for SurfaceGuard<S> {
    fn drop(&mut self) {
        self.surface.teardown();
    }
}

/// What a [`RecordingSurface`] currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceSnapshot {
    pub config: Option<RendererConfig>,
    pub center: Option<LatLon>,
    pub markers: Vec<Marker>,
    pub sun: Option<SunView>,
    pub mounts: u32,
    pub teardowns: u32,
    pub marker_updates: u32,
}

/// Headless surface that only records its state. Clones share the record, so
/// a caller can keep one to inspect after handing the other to a controller.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Rc<RefCell<SurfaceSnapshot>>,
    torn_down: Rc<RefCell<bool>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_torn_down(&self) -> bool {
        *self.torn_down.borrow()
    }
}

impl MapSurface for RecordingSurface {
    fn mount(&mut self, config: &RendererConfig, center: LatLon) {
        let mut state = self.state.borrow_mut();
        state.config = Some(config.clone());
        state.center = Some(center);
        state.mounts += 1;
    }

    fn set_center(&mut self, center: LatLon) {
        self.state.borrow_mut().center = Some(center);
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        let mut state = self.state.borrow_mut();
        state.markers = markers.to_vec();
        state.marker_updates += 1;
    }

    fn set_sun_overlay(&mut self, view: &SunView) {
        self.state.borrow_mut().sun = Some(*view);
    }

    fn teardown(&mut self) {
        let mut torn_down = self.torn_down.borrow_mut();
        if !*torn_down {
            *torn_down = true;
            self.state.borrow_mut().teardowns += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tile_urls_are_routed_through_the_proxy() {
        let cfg = RendererConfig::default();
        assert_eq!(
            cfg.rewrite_tile_url("https://tiles.openfreemap.org/planet/20240101/14/8299/5637.pbf"),
            "/tiles/planet/20240101/14/8299/5637.pbf"
        );
        assert_eq!(
            cfg.rewrite_tile_url("https://example.org/sprite.png"),
            "https://example.org/sprite.png"
        );
    }

    #[test]
    fn place_marker_popup() {
        let place = NearbyPlace {
            id: PlaceId::new(1),
            name: "Chez A".into(),
            address: None,
            lat: 48.857,
            lon: 2.3522,
            distance_meters: 120,
            status: NearbyStatus::Sun,
            sun_until: Some("17:30".into()),
        };
        let marker = Marker::place(&place);
        assert_eq!(marker.color, "#f59e0b");
        assert_eq!(marker.place_id(), Some(PlaceId::new(1)));
        assert_eq!(marker.popup.as_deref(), Some("Chez A\n120m\nSun until 17:30"));
    }

    #[test]
    fn guard_tears_down_once_on_drop() {
        let screen = RecordingSurface::new();
        {
            let mut guard = SurfaceGuard::mount(
                screen.clone(),
                &RendererConfig::default(),
                LatLon::new(1.0, 2.0),
            );
            guard.set_markers(&[Marker::user(LatLon::new(1.0, 2.0))]);
            guard.teardown();
        }
        let snap = screen.snapshot();
        assert_eq!(snap.mounts, 1);
        assert_eq!(snap.teardowns, 1);
        assert!(screen.is_torn_down());
    }

    #[test]
    fn repeated_set_markers_replaces() {
        let mut surface = RecordingSurface::new();
        let markers = [Marker::user(LatLon::new(1.0, 2.0))];
        surface.set_markers(&markers);
        surface.set_markers(&markers);
        assert_eq!(surface.snapshot().markers, markers.to_vec());
    }
}
