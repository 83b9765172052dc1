use foundation::math::{LatLon, round_deg, wrap_lon_deg};

/// Center used when the URL carries no usable coordinates (Paris).
pub const DEFAULT_CENTER: LatLon = LatLon {
    lat: 48.8566,
    lon: 2.3522,
};

/// Decimal places kept when coordinates are written to the URL.
pub const URL_COORD_DECIMALS: u32 = 4;

/// The map's geographic center. Always finite and in range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    center: LatLon,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
        }
    }
}

impl Viewport {
    pub fn new(center: LatLon) -> Option<Self> {
        LatLon::checked(center.lat, center.lon).map(|center| Self { center })
    }

    /// Seeds the viewport from raw `lat`/`lon` query values. Both must parse
    /// as finite, in-range numbers, otherwise the default center is used.
    pub fn from_url_params(lat: Option<&str>, lon: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<f64>().ok());
        match (parse(lat), parse(lon)) {
            (Some(lat), Some(lon)) => LatLon::checked(lat, lon)
                .map(|center| Self { center })
                .unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn center(&self) -> LatLon {
        self.center
    }

    /// Moves the center. Latitude is clamped and longitude wrapped; non-finite
    /// input is ignored. Returns `true` if the center changed.
    pub fn move_to(&mut self, lat: f64, lon: f64) -> bool {
        if !lat.is_finite() || !lon.is_finite() {
            return false;
        }
        let next = LatLon::new(lat.clamp(-90.0, 90.0), wrap_lon_deg(lon));
        if next == self.center {
            return false;
        }
        self.center = next;
        true
    }

    /// Center rounded for the URL.
    pub fn url_center(&self) -> LatLon {
        LatLon::new(
            round_deg(self.center.lat, URL_COORD_DECIMALS),
            round_deg(self.center.lon, URL_COORD_DECIMALS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_url_params_seed_the_center() {
        let vp = Viewport::from_url_params(Some("45.764"), Some("4.8357"));
        assert_eq!(vp.center(), LatLon::new(45.764, 4.8357));
    }

    #[test]
    fn invalid_url_params_fall_back_silently() {
        let cases = [
            (None, Some("2.0")),
            (Some("abc"), Some("2.0")),
            (Some("NaN"), Some("2.0")),
            (Some("91"), Some("2.0")),
            (Some("48.0"), Some("inf")),
            (Some("48.0"), Some("-181")),
        ];
        for (lat, lon) in cases {
            assert_eq!(Viewport::from_url_params(lat, lon).center(), DEFAULT_CENTER);
        }
    }

    #[test]
    fn move_to_keeps_the_invariant() {
        let mut vp = Viewport::default();
        assert!(!vp.move_to(f64::NAN, 2.0));
        assert_eq!(vp.center(), DEFAULT_CENTER);
        assert!(vp.move_to(95.0, 190.0));
        assert_eq!(vp.center(), LatLon::new(90.0, -170.0));
        assert!(!vp.move_to(90.0, -170.0));
    }

    #[test]
    fn huge_longitudes_are_wrapped_into_range() {
        let mut vp = Viewport::default();
        for lon in [1e17, -1e17] {
            vp.move_to(48.0, lon);
            let center = vp.center();
            assert!((-180.0..=180.0).contains(&center.lon), "{lon} -> {}", center.lon);
            assert_eq!(center.lat, 48.0);
        }
    }

    #[test]
    fn url_center_has_four_decimals() {
        let vp = Viewport::new(LatLon::new(48.856_649, 2.352_26)).unwrap();
        assert_eq!(vp.url_center(), LatLon::new(48.8566, 2.3523));
    }
}
