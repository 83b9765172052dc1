//! Headless terrace finder client: dual search, geolocation, map
//! synchronization and the per-place timeline, without any UI toolkit.

pub mod config;
pub mod geolocation;
pub mod pages;
pub mod route;
pub mod search;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use geolocation::{FixedGeolocator, GeoError, Geolocator};
pub use route::{History, MemoryHistory, Navigation, Route, RouteError};
pub use search::{DualSearch, Dropdown, SearchSettings, SearchStep};
