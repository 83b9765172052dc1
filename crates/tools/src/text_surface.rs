use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::LatLon;
use layers::{SUN_RAY_COLOR, SunView};
use map::{MapSurface, Marker, MarkerKind, RendererConfig};

/// Map surface that describes every change as a line of text.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    log: Rc<RefCell<Vec<String>>>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every line written since the last call.
    pub fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn write(&self, line: String) {
        self.log.borrow_mut().push(line);
    }
}

fn coords(p: LatLon) -> String {
    format!("{:.4}, {:.4}", p.lat, p.lon)
}

impl MapSurface for TextSurface {
    fn mount(&mut self, config: &RendererConfig, center: LatLon) {
        let mode = if config.interactive { "interactive" } else { "static" };
        self.write(format!(
            "[map] {mode} z{} at {} ({})",
            config.zoom,
            coords(center),
            config.style_url
        ));
    }

    fn set_center(&mut self, center: LatLon) {
        self.write(format!("[map] center {}", coords(center)));
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.write(format!("[map] {} marker(s)", markers.len()));
        for marker in markers {
            let what = match marker.kind {
                MarkerKind::User => "you".to_string(),
                MarkerKind::Focus => "terrace".to_string(),
                MarkerKind::Place { id, .. } => format!("#{id}"),
            };
            self.write(format!(
                "[map]   {what} {} {}",
                coords(marker.position),
                marker.color
            ));
        }
    }

    fn set_sun_overlay(&mut self, view: &SunView) {
        let line = match view {
            SunView::Visible {
                vector, ray_end, ..
            } => format!(
                "[map] sun ray azimuth {:.0}° to {} {SUN_RAY_COLOR}",
                vector.azimuth_deg,
                coords(*ray_end)
            ),
            SunView::BelowHorizon { .. } => "[map] sun below horizon".to_string(),
            SunView::Unavailable => "[map] sun overlay cleared".to_string(),
        };
        self.write(line);
    }

    fn teardown(&mut self) {
        self.write("[map] released".to_string());
    }
}
