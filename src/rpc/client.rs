use crate::rpc::method::RpcMethod;
use reqwest::{Certificate, Client, Identity, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
    #[error("request {method} failed: {source}")]
    Transport {
        method: RpcMethod,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned a non-JSON response: {source}")]
    InvalidResponse {
        method: RpcMethod,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned unexpected data: {source}")]
    UnexpectedData {
        method: RpcMethod,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Remote(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCert {
    pub cert: PathBuf,
    /// When absent, `cert` holds both the certificate and the private key.
    pub key: Option<PathBuf>,
}

impl ClientCert {
    fn identity(&self) -> Result<Identity, RpcError> {
        let mut pem = read_file(&self.cert)?;
        if let Some(key) = &self.key {
            pem.push(b'\n');
            pem.extend(read_file(key)?);
        }
        Identity::from_pem(&pem).map_err(RpcError::Setup)
    }
}

/// Transport settings, fixed for the lifetime of one [`RpcClient`].
#[derive(Clone, Debug)]
pub struct RpcConfig {
    pub endpoint: String,
    pub http_verb: Method,
    pub basic_auth: Option<(String, String)>,
    pub client_cert: Option<ClientCert>,
    pub ca_bundle: Option<PathBuf>,
    pub verify_server: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9888".to_string(),
            http_verb: Method::POST,
            basic_auth: None,
            client_cert: None,
            ca_bundle: None,
            verify_server: true,
        }
    }
}

pub struct RpcClient {
    client: Client,
    endpoint: String,
    http_verb: Method,
    basic_auth: Option<(String, String)>,
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let mut builder = Client::builder();
        if let Some(cert) = &config.client_cert {
            builder = builder.identity(cert.identity()?);
        }
        if let Some(ca) = &config.ca_bundle {
            let ca = Certificate::from_pem(&read_file(ca)?).map_err(RpcError::Setup)?;
            builder = builder
                .tls_built_in_root_certs(false)
                .add_root_certificate(ca);
        } else if !config.verify_server {
            tracing::warn!("server certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build().map_err(RpcError::Setup)?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            http_verb: config.http_verb,
            basic_auth: config.basic_auth,
        })
    }

    pub fn url(&self, method: RpcMethod) -> String {
        format!("{}/{}", self.endpoint, method.wire_name())
    }

    pub async fn call<P, R>(&self, method: RpcMethod, params: &P) -> Result<R, RpcError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!("calling {}", method);
        let mut request = self
            .client
            .request(self.http_verb.clone(), self.url(method))
            .json(params);
        if let Some((user, pass)) = &self.basic_auth {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|source| RpcError::Transport { method, source })?;
        let body: Value = response
            .json()
            .await
            .map_err(|source| RpcError::InvalidResponse { method, source })?;

        let data = unpack_envelope(body)?;
        serde_json::from_value(data).map_err(|source| RpcError::UnexpectedData { method, source })
    }
}

/// Returns `data` of a `"status": "success"` envelope, otherwise the server's message.
pub fn unpack_envelope(body: Value) -> Result<Value, RpcError> {
    if body.get("status").and_then(Value::as_str) == Some("success") {
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }

    let message = ["msg", "message"]
        .iter()
        .filter_map(|field| body.get(*field))
        .find_map(message_text)
        .unwrap_or_else(|| body.to_string());
    Err(RpcError::Remote(message))
}

/// Strings are taken as-is, other non-empty values are rendered as JSON.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, RpcError> {
    std::fs::read(path).map_err(|source| RpcError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
