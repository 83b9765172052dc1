use chrono::{DateTime, Utc};

/// Raw apparent solar position as reported by an ephemeris routine.
///
/// Conventions follow the widely used SunCalc routine: radians, azimuth
/// measured from south, positive towards west.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarPosition {
    pub azimuth_rad_from_south: f64,
    pub altitude_rad: f64,
}

/// Source of solar positions. The workspace never derives these itself; it
/// only normalizes and projects what an implementation reports.
pub trait SolarEphemeris: Send + Sync {
    fn position(&self, at: DateTime<Utc>, lat_deg: f64, lon_deg: f64) -> SolarPosition;
}

/// Low-cost subsolar-point approximation (about 0.01 degree over this
/// century), good enough to draw a direction on a street map.
#[derive(Debug, Default, Copy, Clone)]
pub struct LowPrecisionEphemeris;

impl SolarEphemeris for LowPrecisionEphemeris {
    fn position(&self, at: DateTime<Utc>, lat_deg: f64, lon_deg: f64) -> SolarPosition {
        let ms = at.timestamp_millis() as f64;

        // Julian Day from Unix epoch (1970-01-01T00:00:00Z) == 2440587.5
        let jd = 2440587.5 + (ms / 86_400_000.0);
        let n = jd - 2451545.0; // days since J2000

        // Mean longitude and anomaly (degrees)
        let l = wrap_360(280.46 + 0.9856474 * n);
        let g = wrap_360(357.528 + 0.9856003 * n);

        // Ecliptic longitude and obliquity (degrees)
        let lambda =
            wrap_360(l + 1.915 * g.to_radians().sin() + 0.020 * (2.0 * g).to_radians().sin());
        let epsilon = 23.439 - 0.0000004 * n;

        let lambda_rad = lambda.to_radians();
        let eps_rad = epsilon.to_radians();
        let alpha = (eps_rad.cos() * lambda_rad.sin())
            .atan2(lambda_rad.cos())
            .to_degrees();
        let delta = (eps_rad.sin() * lambda_rad.sin()).asin();

        // Greenwich Mean Sidereal Time (degrees)
        let t = n / 36525.0;
        let gmst = wrap_360(
            280.46061837 + 360.98564736629 * n + 0.000387933 * t * t - (t * t * t) / 38710000.0,
        );

        // Local hour angle: observer longitude minus subsolar longitude.
        let subsolar_lon = alpha - gmst;
        let h = (lon_deg - subsolar_lon).to_radians();
        let phi = lat_deg.to_radians();

        let altitude = (phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos()).asin();
        let azimuth = h.sin().atan2(h.cos() * phi.sin() - delta.tan() * phi.cos());

        SolarPosition {
            azimuth_rad_from_south: azimuth,
            altitude_rad: altitude,
        }
    }
}

fn wrap_360(mut d: f64) -> f64 {
    d %= 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}
