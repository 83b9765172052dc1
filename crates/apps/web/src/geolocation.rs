//! Device position lookup with a bounded wait.

use std::sync::Arc;
use std::time::Duration;

use foundation::math::LatLon;
use futures_util::future::BoxFuture;
use tracing::warn;

/// Why a position could not be obtained.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GeoError {
    PermissionDenied,
    Unavailable,
    /// The platform has no location capability at all.
    Unsupported,
}

impl GeoError {
    /// Maps a W3C `GeolocationPositionError.code`: 1 is a refusal, every
    /// other code (including timeout) means the position is unavailable.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeoError::PermissionDenied,
            _ => GeoError::Unavailable,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GeoError::PermissionDenied => "Location permission denied",
            GeoError::Unavailable => "Unable to get your position",
            GeoError::Unsupported => "Geolocation is not supported",
        }
    }
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for GeoError {}

pub trait Geolocator: Send + Sync {
    fn current_position(&self) -> BoxFuture<'static, Result<LatLon, GeoError>>;
}

/// Always answers with the same outcome (command line `--at`, tests).
#[derive(Debug, Clone)]
pub struct FixedGeolocator(pub Result<LatLon, GeoError>);

impl Geolocator for FixedGeolocator {
    fn current_position(&self) -> BoxFuture<'static, Result<LatLon, GeoError>> {
        let outcome = self.0;
        Box::pin(async move { outcome })
    }
}

/// Asks `geolocator` for a position, giving up after `timeout`.
///
/// Returns a `'static` future so it can be parked in a keyed task.
pub fn locate(
    geolocator: Option<Arc<dyn Geolocator>>,
    timeout: Duration,
) -> BoxFuture<'static, Result<LatLon, GeoError>> {
    let Some(geolocator) = geolocator else {
        return Box::pin(async { Err(GeoError::Unsupported) });
    };
    let request = geolocator.current_position();
    Box::pin(async move {
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(pos)) => LatLon::checked(pos.lat, pos.lon).ok_or(GeoError::Unavailable),
            Ok(Err(err)) => Err(err),
            Err(_) => {
                warn!(?timeout, "geolocation timed out");
                Err(GeoError::Unavailable)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Never;

    impl Geolocator for Never {
        fn current_position(&self) -> BoxFuture<'static, Result<LatLon, GeoError>> {
            Box::pin(futures_util::future::pending())
        }
    }

    #[test]
    fn browser_codes_are_classified() {
        assert_eq!(GeoError::from_code(1), GeoError::PermissionDenied);
        assert_eq!(GeoError::from_code(2), GeoError::Unavailable);
        assert_eq!(GeoError::from_code(3), GeoError::Unavailable);
    }

    #[tokio::test]
    async fn missing_capability_is_unsupported() {
        let outcome = locate(None, Duration::from_secs(10)).await;
        assert_eq!(outcome, Err(GeoError::Unsupported));
        assert_eq!(GeoError::Unsupported.to_string(), "Geolocation is not supported");
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_request_fails_as_unavailable_after_timeout() {
        let start = tokio::time::Instant::now();
        let outcome = locate(Some(Arc::new(Never)), Duration::from_secs(10)).await;
        assert_eq!(outcome, Err(GeoError::Unavailable));
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn success_and_denial_pass_through() {
        let here = LatLon::new(48.85, 2.35);
        let ok = locate(Some(Arc::new(FixedGeolocator(Ok(here)))), Duration::from_secs(1)).await;
        assert_eq!(ok, Ok(here));
        let denied = FixedGeolocator(Err(GeoError::PermissionDenied));
        let outcome = locate(Some(Arc::new(denied)), Duration::from_secs(1)).await;
        assert_eq!(outcome, Err(GeoError::PermissionDenied));
    }
}
