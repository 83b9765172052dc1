//! Query keys. Two queries with equal keys ask the service the same question.

use chrono::NaiveDate;
use foundation::math::LatLon;
use foundation::{ClockTime, PlaceId, format_date, query_datetime};

/// Coordinates are keyed at 4 decimal places (about 11 m).
pub const COORD_KEY_SCALE: f64 = 10_000.0;

/// Nearby query keyed by the rounded map center and the selected instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NearbyQuery {
    lat_e4: i32,
    lon_e4: i32,
    pub date: NaiveDate,
    pub time: ClockTime,
}

impl NearbyQuery {
    pub fn new(center: LatLon, date: NaiveDate, time: ClockTime) -> Self {
        Self {
            lat_e4: (center.lat * COORD_KEY_SCALE).round() as i32,
            lon_e4: (center.lon * COORD_KEY_SCALE).round() as i32,
            date,
            time,
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat_e4 as f64 / COORD_KEY_SCALE
    }

    pub fn lon(&self) -> f64 {
        self.lon_e4 as f64 / COORD_KEY_SCALE
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(self.lat(), self.lon())
    }

    /// Same place, different instant.
    pub fn at(self, date: NaiveDate, time: ClockTime) -> Self {
        Self { date, time, ..self }
    }

    pub fn datetime(&self) -> String {
        query_datetime(self.date, self.time)
    }

    pub(crate) fn params(&self, radius_m: Option<u32>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", format!("{:.4}", self.lat())),
            ("lon", format!("{:.4}", self.lon())),
            ("datetime", self.datetime()),
        ];
        if let Some(radius) = radius_m {
            params.push(("radius", radius.to_string()));
        }
        params
    }
}

/// Timeline query for one place. `date: None` lets the service pick today.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimelineQuery {
    pub place: PlaceId,
    pub date: Option<NaiveDate>,
}

impl TimelineQuery {
    pub fn new(place: PlaceId, date: Option<NaiveDate>) -> Self {
        Self { place, date }
    }

    pub(crate) fn path(&self) -> String {
        format!("/terrasses/{}/timeline", self.place)
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        self.date
            .map(|d| vec![("date", format_date(d))])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn nearby_key_ignores_sub_key_drift() {
        let noon = ClockTime::from_hm(12, 0).unwrap();
        let a = NearbyQuery::new(LatLon::new(48.8566, 2.3522), june_first(), noon);
        // ~3 m north
        let b = NearbyQuery::new(LatLon::new(48.856_62, 2.3522), june_first(), noon);
        assert_eq!(a, b);
        let c = NearbyQuery::new(LatLon::new(48.8571, 2.3522), june_first(), noon);
        assert_ne!(a, c);
    }

    #[test]
    fn nearby_params_carry_local_datetime() {
        let q = NearbyQuery::new(
            LatLon::new(48.8566, 2.3522),
            june_first(),
            ClockTime::from_hm(14, 15).unwrap(),
        );
        assert_eq!(
            q.params(Some(500)),
            vec![
                ("lat", "48.8566".to_string()),
                ("lon", "2.3522".to_string()),
                ("datetime", "2024-06-01T14:15:00".to_string()),
                ("radius", "500".to_string()),
            ]
        );
    }

    #[test]
    fn changing_the_instant_rekeys() {
        let noon = ClockTime::from_hm(12, 0).unwrap();
        let q = NearbyQuery::new(LatLon::new(48.8566, 2.3522), june_first(), noon);
        let later = q.at(june_first(), ClockTime::from_hm(12, 15).unwrap());
        assert_ne!(q, later);
        assert_eq!(q.center(), later.center());
    }

    #[test]
    fn timeline_path_and_optional_date() {
        let q = TimelineQuery::new(PlaceId::new(42), None);
        assert_eq!(q.path(), "/terrasses/42/timeline");
        assert!(q.params().is_empty());
        let dated = TimelineQuery::new(PlaceId::new(42), Some(june_first()));
        assert_eq!(dated.params(), vec![("date", "2024-06-01".to_string())]);
    }
}
