//! OpenTopography community DEM client.
//!
//! Only the `fetch-dem` command uses this; the dashboard always works from
//! the synthetic field.

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::OpenTopoSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API Error: {0}")]
    Status(u16),
    #[error("Error fetching elevation data: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.to_string())
    }
}

pub struct OpenTopoClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenTopoClient {
    pub fn new(settings: &OpenTopoSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    pub fn query(&self, bounds: Bounds, dem_type: &str) -> Vec<(&'static str, String)> {
        vec![
            ("demtype", dem_type.to_string()),
            ("south", bounds.south.to_string()),
            ("north", bounds.north.to_string()),
            ("west", bounds.west.to_string()),
            ("east", bounds.east.to_string()),
            ("outputFormat", "GTiff".to_string()),
            ("API_Key", self.api_key.clone()),
        ]
    }

    /// Download a GeoTIFF tile for `bounds`.
    pub async fn fetch(&self, bounds: Bounds, dem_type: &str) -> Result<Bytes, FetchError> {
        tracing::info!(?bounds, dem_type, "requesting DEM tile");
        let response = self
            .http
            .get(&self.base_url)
            .query(&self.query(bounds, dem_type))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "DEM request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::RawQuery, routing::get, Router};

    use super::*;

    #[test]
    fn query_carries_every_parameter() {
        let settings = OpenTopoSettings {
            api_key: "secret".into(),
            ..OpenTopoSettings::default()
        };
        let client = OpenTopoClient::new(&settings);
        let bounds = Bounds {
            north: 10.5,
            south: 9.5,
            east: 76.5,
            west: 75.5,
        };
        let query = client.query(bounds, "SRTM_GL1");
        let keys: Vec<&str> = query.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["demtype", "south", "north", "west", "east", "outputFormat", "API_Key"]
        );
        assert_eq!(query[1].1, "9.5");
        assert_eq!(query[4].1, "76.5");
        assert_eq!(query[6].1, "secret");
    }

    fn kerala() -> Bounds {
        Bounds {
            north: 10.9,
            south: 10.8,
            east: 76.3,
            west: 76.2,
        }
    }

    async fn client_for(app: Router) -> OpenTopoClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        OpenTopoClient::new(&OpenTopoSettings {
            base_url: format!("http://{addr}/dem"),
            api_key: "secret".into(),
            ..OpenTopoSettings::default()
        })
    }

    #[tokio::test]
    async fn ok_response_returns_body() {
        let app = Router::new().route(
            "/dem",
            get(|RawQuery(query): RawQuery| async move { query.unwrap_or_default() }),
        );
        let client = client_for(app).await;

        let body = client.fetch(kerala(), "SRTM_GL3").await.unwrap();
        let echoed = String::from_utf8(body.to_vec()).unwrap();
        assert!(echoed.contains("demtype=SRTM_GL3"));
        assert!(echoed.contains("outputFormat=GTiff"));
        assert!(echoed.contains("API_Key=secret"));
    }

    #[tokio::test]
    async fn non_ok_status_is_reported() {
        let app = Router::new().route("/dem", get(|| async { StatusCode::UNAUTHORIZED }));
        let client = client_for(app).await;

        let err = client.fetch(kerala(), "SRTM_GL1").await.unwrap_err();
        assert!(matches!(err, FetchError::Status(401)), "got {err:?}");
        assert_eq!(err.to_string(), "API Error: 401");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OpenTopoClient::new(&OpenTopoSettings {
            base_url: format!("http://{addr}/dem"),
            ..OpenTopoSettings::default()
        });
        let err = client.fetch(kerala(), "SRTM_GL1").await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)), "got {err:?}");
        assert!(err.to_string().starts_with("Error fetching elevation data: "));
    }

    #[test]
    fn errors_read_like_user_messages() {
        assert_eq!(FetchError::Status(401).to_string(), "API Error: 401");
        assert_eq!(
            FetchError::Request("timed out".into()).to_string(),
            "Error fetching elevation data: timed out"
        );
    }
}
