/// Mean Earth radius (meters) for the spherical model.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic position in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `None` unless both coordinates are finite and in range.
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Destination point on a sphere, starting at `origin` and travelling
/// `distance_m` along the initial `bearing_deg` (0 = north, clockwise).
///
/// NaN inputs propagate to a NaN result.
pub fn destination_point(origin: LatLon, bearing_deg: f64, distance_m: f64) -> LatLon {
    let d = distance_m / MEAN_EARTH_RADIUS_M;
    let brng = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * brng.cos()).asin();
    let lon2 = lon1
        + (brng.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

    LatLon::new(lat2.to_degrees(), wrap_lon_deg(lon2.to_degrees()))
}

/// Great-circle distance (haversine) in meters.
pub fn haversine_m(a: LatLon, b: LatLon) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat * 0.5).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon * 0.5).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Wraps a longitude into `[-180, 180]`; `180` itself is kept.
pub fn wrap_lon_deg(lon: f64) -> f64 {
    if !lon.is_finite() || (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Rounds a coordinate to `decimals` decimal places.
pub fn round_deg(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::{LatLon, destination_point, haversine_m, round_deg, wrap_lon_deg};

    const PARIS: LatLon = LatLon {
        lat: 48.8566,
        lon: 2.3522,
    };

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_distance_is_identity() {
        for bearing in [0.0, 45.0, 180.0, 271.5] {
            let p = destination_point(PARIS, bearing, 0.0);
            assert_close(p.lat, PARIS.lat, 1e-12);
            assert_close(p.lon, PARIS.lon, 1e-12);
        }
    }

    #[test]
    fn separation_grows_with_distance() {
        for bearing in [0.0, 90.0, 135.0, 200.0, 315.0] {
            let mut last = 0.0;
            for d in [1.0, 10.0, 50.0, 120.0, 1_000.0, 25_000.0] {
                let sep = haversine_m(PARIS, destination_point(PARIS, bearing, d));
                assert!(sep > last, "bearing {bearing}: {sep} <= {last}");
                assert_close(sep, d, d * 1e-6 + 1e-6);
                last = sep;
            }
        }
    }

    #[test]
    fn north_bearing_moves_latitude_only() {
        let p = destination_point(PARIS, 0.0, 111_194.9);
        assert_close(p.lat, PARIS.lat + 1.0, 1e-4);
        assert_close(p.lon, PARIS.lon, 1e-9);
    }

    #[test]
    fn nan_inputs_propagate() {
        assert!(destination_point(PARIS, f64::NAN, 120.0).lat.is_nan());
        assert!(destination_point(LatLon::new(f64::NAN, 2.0), 10.0, 1.0).lat.is_nan());
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert!(LatLon::checked(48.8, 2.3).is_some());
        assert!(LatLon::checked(91.0, 2.3).is_none());
        assert!(LatLon::checked(48.8, -181.0).is_none());
        assert!(LatLon::checked(f64::NAN, 0.0).is_none());
        assert!(LatLon::checked(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn rounding_and_wrapping() {
        assert_eq!(round_deg(48.856_649, 4), 48.8566);
        assert_eq!(round_deg(2.352_26, 4), 2.3523);
        assert_close(wrap_lon_deg(190.0), -170.0, 1e-12);
        assert_close(wrap_lon_deg(-540.0), -180.0, 1e-12);
        assert_eq!(wrap_lon_deg(540.0), 180.0);
        assert_eq!(wrap_lon_deg(180.0), 180.0);
    }

    #[test]
    fn huge_longitudes_wrap_without_looping() {
        for lon in [1e17, -1e17, f64::MAX, f64::MIN] {
            let w = wrap_lon_deg(lon);
            assert!((-180.0..=180.0).contains(&w), "{lon} -> {w}");
        }
        assert!(wrap_lon_deg(f64::NAN).is_nan());
    }
}
