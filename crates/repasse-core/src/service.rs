use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::CoreError;
use crate::model::{Candidate, LookupRequest, LookupResult};

/// The remote search and lookup endpoints.
#[async_trait]
pub trait MunicipalityService: Send + Sync {
    /// Municipalities matching a free-text term.
    async fn search(&self, term: &str) -> Result<Vec<Candidate>, CoreError>;

    /// Transfer figures for one municipality over a period.
    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, CoreError>;
}

/// Where and how to reach the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

pub fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
pub fn default_search_path() -> String {
    "/municipios".to_string()
}
pub fn default_lookup_path() -> String {
    "/consulta".to_string()
}
pub fn default_timeout() -> u64 {
    60
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            lookup_path: default_lookup_path(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Resolve `path` under `base`, keeping any path prefix `base` already has.
pub fn endpoint(base: &str, path: &str) -> Result<Url, CoreError> {
    let mut base = Url::parse(base.trim())
        .map_err(|e| CoreError::InvalidEndpoint(format!("{}: {}", base, e)))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(CoreError::InvalidEndpoint(format!(
            "unsupported scheme '{}'",
            base.scheme()
        )));
    }
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    base.join(path.trim().trim_start_matches('/'))
        .map_err(|e| CoreError::InvalidEndpoint(format!("{}: {}", path, e)))
}

/// The lookup service over HTTP/JSON.
pub struct HttpService {
    client: Client,
    search_url: Url,
    lookup_url: Url,
}

impl HttpService {
    /// Build the client. Endpoints are validated here, not on first use.
    pub fn new(settings: &ServiceSettings) -> Result<Self, CoreError> {
        let search_url = endpoint(&settings.base_url, &settings.search_path)?;
        let lookup_url = endpoint(&settings.base_url, &settings.lookup_path)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CoreError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!("lookup service: search={} lookup={}", search_url, lookup_url);

        Ok(Self {
            client,
            search_url,
            lookup_url,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    pub fn lookup_url(&self) -> &Url {
        &self.lookup_url
    }
}

#[async_trait]
impl MunicipalityService for HttpService {
    async fn search(&self, term: &str) -> Result<Vec<Candidate>, CoreError> {
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", term)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("search {:?}: HTTP {} ({} bytes)", term, status, body.len());
        decode_search(status, &body)
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, CoreError> {
        let response = self
            .client
            .post(self.lookup_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(
            "lookup codigo={}: HTTP {} ({} bytes)",
            request.code(),
            status,
            body.len()
        );
        decode_lookup(status, &body)
    }
}

/// A lookup body is either the result or the backend's `{"erro": ...}` rejection.
#[derive(Deserialize)]
#[serde(untagged)]
enum LookupReply {
    Found(LookupResult),
    Rejected { erro: String },
}

fn check_status(status: StatusCode, body: &str) -> Result<(), CoreError> {
    if status.is_success() {
        return Ok(());
    }
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().chars().take(200).collect()
    };
    Err(CoreError::Server {
        status: status.as_u16(),
        message,
    })
}

pub fn decode_search(status: StatusCode, body: &str) -> Result<Vec<Candidate>, CoreError> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| CoreError::Decode(e.to_string()))
}

pub fn decode_lookup(status: StatusCode, body: &str) -> Result<LookupResult, CoreError> {
    check_status(status, body)?;
    match serde_json::from_str::<LookupReply>(body) {
        Ok(LookupReply::Found(result)) => Ok(result),
        Ok(LookupReply::Rejected { erro }) => Err(CoreError::Server {
            status: status.as_u16(),
            message: erro,
        }),
        Err(e) => Err(CoreError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let url = endpoint("http://localhost:8000", "/consulta").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/consulta");

        let url = endpoint("https://example.org/api", "municipios").unwrap();
        assert_eq!(url.as_str(), "https://example.org/api/municipios");

        let url = endpoint("https://example.org/api/", "/consulta").unwrap();
        assert_eq!(url.as_str(), "https://example.org/api/consulta");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        assert!(matches!(
            endpoint("not a url", "/x"),
            Err(CoreError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            endpoint("ftp://example.org", "/x"),
            Err(CoreError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_http_service_validates_eagerly() {
        let settings = ServiceSettings {
            base_url: "::nope::".to_string(),
            ..Default::default()
        };
        assert!(HttpService::new(&settings).is_err());

        let service = HttpService::new(&ServiceSettings::default()).unwrap();
        assert_eq!(
            service.lookup_url().as_str(),
            "http://localhost:8000/consulta"
        );
        assert_eq!(
            service.search_url().as_str(),
            "http://localhost:8000/municipios"
        );
    }

    #[test]
    fn test_decode_search() {
        let body = r#"[{"municipio":"Springfield","uf":"IL","codigo":123}]"#;
        let candidates = decode_search(StatusCode::OK, body).unwrap();
        assert_eq!(candidates, vec![Candidate::new(123, "Springfield", "IL")]);

        assert!(decode_search(StatusCode::OK, "[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_search_errors() {
        let err = decode_search(StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert!(matches!(err, CoreError::Server { status: 502, .. }));

        let err = decode_search(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn test_decode_lookup() {
        let body = r#"{"municipio":"Springfield - IL","periodo":"01.01.2023 até 31.12.2023","fpm":10.5,"royalties":0,"todos":20}"#;
        let result = decode_lookup(StatusCode::OK, body).unwrap();
        assert_eq!(result.entity_label, "Springfield - IL");
        assert_eq!(result.fpm, 10.5);
        assert_eq!(result.royalties, 0.0);
    }

    #[test]
    fn test_decode_lookup_rejection() {
        let body = r#"{"erro":"Código do beneficiário inválido","codigo_recebido":0}"#;
        let err = decode_lookup(StatusCode::OK, body).unwrap_err();
        match err {
            CoreError::Server { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Código do beneficiário inválido");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_lookup_server_error() {
        let err = decode_lookup(StatusCode::INTERNAL_SERVER_ERROR, "boom").unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
