use std::env;
use std::time::Duration;

use chrono_tz::Tz;
use map::RendererConfig;
use remote::DEFAULT_API_URL;

/// Largest radius the nearby endpoint accepts.
pub const MAX_NEARBY_RADIUS_M: u32 = 1000;

/// Client-side settings. Everything has a default; a few knobs can be
/// overridden from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// Civil time zone of the service (slot times, "now", sun position).
    pub tz: Tz,
    pub search_quiet: Duration,
    pub place_min_chars: usize,
    pub address_min_chars: usize,
    pub geolocation_timeout: Duration,
    pub nearby_radius_m: Option<u32>,
    pub sun_ray_length_m: f64,
    pub renderer: RendererConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tz: chrono_tz::Europe::Paris,
            search_quiet: Duration::from_millis(300),
            place_min_chars: 2,
            address_min_chars: 3,
            geolocation_timeout: Duration::from_secs(10),
            nearby_radius_m: None,
            sun_ray_length_m: layers::SUN_RAY_LENGTH_M,
            renderer: RendererConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Reads `TERRACE_API_URL`, `TERRACE_TZ`, `TERRACE_RADIUS_M` and
    /// `TERRACE_WORKER_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let radius = env_var_u32("TERRACE_RADIUS_M", 0);
        Self {
            api_url: env::var("TERRACE_API_URL").unwrap_or(defaults.api_url),
            tz: env_var_tz("TERRACE_TZ", defaults.tz),
            nearby_radius_m: (radius > 0).then_some(radius.min(MAX_NEARBY_RADIUS_M)),
            renderer: RendererConfig {
                worker_url: env::var("TERRACE_WORKER_URL").ok(),
                ..defaults.renderer
            },
            ..defaults
        }
    }
}

fn env_var_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_tz(key: &str, default: Tz) -> Tz {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
