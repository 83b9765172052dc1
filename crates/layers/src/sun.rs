//! Sun direction overlay.
//!
//! The ephemeris reports a raw SunCalc-style position; this module normalizes
//! it to a compass bearing and projects a short ground ray from the place in
//! that direction. Below the horizon nothing directional is drawn.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use foundation::math::{LatLon, LowPrecisionEphemeris, SolarEphemeris, destination_point};
use foundation::{ClockTime, local_to_utc};
use tracing::debug;

/// Length of the drawn sun ray on the ground.
pub const SUN_RAY_LENGTH_M: f64 = 120.0;

/// Sun direction in compass terms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunVector {
    /// Degrees clockwise from north, `[0, 360)`.
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

impl SunVector {
    pub fn is_finite(&self) -> bool {
        self.azimuth_deg.is_finite() && self.altitude_deg.is_finite()
    }
}

/// Converts a raw position (azimuth from south, radians) to a [`SunVector`].
pub fn to_sun_vector(raw_azimuth_rad_from_south: f64, raw_altitude_rad: f64) -> SunVector {
    let mut azimuth_deg = (raw_azimuth_rad_from_south.to_degrees() + 180.0).rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if azimuth_deg >= 360.0 {
        azimuth_deg = 0.0;
    }
    SunVector {
        azimuth_deg,
        altitude_deg: raw_altitude_rad.to_degrees(),
    }
}

/// What the overlay shows for one place and instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SunView {
    /// Sun above the horizon: draw a ray from the place to `ray_end`.
    Visible {
        origin: LatLon,
        vector: SunVector,
        ray_end: LatLon,
    },
    /// Sun at or below the horizon: no ray, "sun has set" indicator.
    BelowHorizon { vector: SunVector },
    /// Nothing to show (no time selected or unusable inputs).
    Unavailable,
}

impl SunView {
    pub fn resolve(origin: LatLon, vector: SunVector, ray_length_m: f64) -> Self {
        if !origin.is_finite() || !vector.is_finite() {
            return SunView::Unavailable;
        }
        if vector.altitude_deg <= 0.0 {
            return SunView::BelowHorizon { vector };
        }
        SunView::Visible {
            origin,
            vector,
            ray_end: destination_point(origin, vector.azimuth_deg, ray_length_m),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, SunView::Visible { .. })
    }

    /// Overlay badge text, if any.
    pub fn badge(&self) -> Option<String> {
        match self {
            SunView::Visible { vector, .. } => {
                Some(format!("☀ {}° elevation", vector.altitude_deg.round() as i64))
            }
            SunView::BelowHorizon { .. } => Some("☾ Sun has set".to_string()),
            SunView::Unavailable => None,
        }
    }
}

/// Computes the overlay for a place at a civil date and time.
#[derive(Clone)]
pub struct SunProjector {
    ephemeris: Arc<dyn SolarEphemeris>,
    tz: Tz,
    ray_length_m: f64,
}

impl SunProjector {
    pub fn new(ephemeris: Arc<dyn SolarEphemeris>, tz: Tz) -> Self {
        Self {
            ephemeris,
            tz,
            ray_length_m: SUN_RAY_LENGTH_M,
        }
    }

    pub fn with_ray_length(mut self, ray_length_m: f64) -> Self {
        self.ray_length_m = ray_length_m;
        self
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn view(&self, place: LatLon, date: NaiveDate, time: Option<ClockTime>) -> SunView {
        let Some(time) = time else {
            return SunView::Unavailable;
        };
        let Some(at) = local_to_utc(date, time, self.tz) else {
            debug!(%date, %time, tz = %self.tz, "local time does not exist");
            return SunView::Unavailable;
        };
        let pos = self.ephemeris.position(at, place.lat, place.lon);
        let vector = to_sun_vector(pos.azimuth_rad_from_south, pos.altitude_rad);
        SunView::resolve(place, vector, self.ray_length_m)
    }
}

impl Default for SunProjector {
    fn default() -> Self {
        Self::new(Arc::new(LowPrecisionEphemeris), chrono_tz::Europe::Paris)
    }
}
