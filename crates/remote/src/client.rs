use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::protocol::{GeocodedAddress, NearbyResponse, Place, TimelineResponse};
use crate::request::{NearbyQuery, TimelineQuery};

/// Default API base: the local reverse proxy.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

/// Remote data contract of the terrace service.
///
/// Returned futures own everything they need, so callers can park them in a
/// `runtime::KeyedTask` without borrowing the client.
pub trait SunApi: Send + Sync {
    fn search_places(&self, text: &str) -> BoxFuture<'static, Result<Vec<Place>, ApiError>>;

    fn search_addresses(
        &self,
        text: &str,
    ) -> BoxFuture<'static, Result<Vec<GeocodedAddress>, ApiError>>;

    fn nearby(&self, query: &NearbyQuery) -> BoxFuture<'static, Result<NearbyResponse, ApiError>>;

    fn timeline(
        &self,
        query: &TimelineQuery,
    ) -> BoxFuture<'static, Result<TimelineResponse, ApiError>>;
}

/// `SunApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    radius_m: Option<u32>,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            radius_m: None,
            client: reqwest::Client::new(),
        }
    }

    /// Search radius passed on nearby queries; the service default otherwise.
    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> BoxFuture<'static, Result<T, ApiError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = endpoint_url(&self.base_url, path);
        let request = self.client.get(&url).query(&params);
        Box::pin(async move {
            debug!(%url, ?params, "GET");
            let resp = request
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(ApiError::Status(resp.status().as_u16()));
            }

            let bytes = resp
                .bytes()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
        })
    }
}

impl SunApi for HttpApi {
    fn search_places(&self, text: &str) -> BoxFuture<'static, Result<Vec<Place>, ApiError>> {
        self.get_json("/terrasses/search", vec![("q", text.to_string())])
    }

    fn search_addresses(
        &self,
        text: &str,
    ) -> BoxFuture<'static, Result<Vec<GeocodedAddress>, ApiError>> {
        self.get_json("/geocode", vec![("q", text.to_string())])
    }

    fn nearby(&self, query: &NearbyQuery) -> BoxFuture<'static, Result<NearbyResponse, ApiError>> {
        self.get_json("/terrasses/nearby", query.params(self.radius_m))
    }

    fn timeline(
        &self,
        query: &TimelineQuery,
    ) -> BoxFuture<'static, Result<TimelineResponse, ApiError>> {
        self.get_json(&query.path(), query.params())
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
