//! SigV4 signing for calls to the HealthLake REST API.
//!
//! The signer only computes headers; sending the request is the caller's
//! job. It holds no state beyond its inputs and never caches signatures.

use std::collections::BTreeMap;
use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    SignableBody, SignableRequest, SigningParams, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use thiserror::Error;
use tracing::debug;

pub const HEALTHLAKE_SERVICE: &str = "healthlake";

const CONTENT_TYPE_JSON: &str = "application/json";

/// Lowercase header name → value, ready to attach to the outgoing request.
pub type SignedHeaders = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("no AWS credentials available for request signing")]
    MissingCredentials,

    #[error("request cannot be signed: {0}")]
    InvalidRequest(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Option<Credentials>,
    region: String,
    service: String,
}

impl RequestSigner {
    pub fn new(
        credentials: Option<Credentials>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Sign a request at the current time.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        body: &[u8],
    ) -> Result<SignedHeaders, SignerError> {
        self.sign_at(method, url, body, SystemTime::now())
    }

    /// Sign a request at a fixed clock value. Identical inputs produce
    /// identical headers.
    pub fn sign_at(
        &self,
        method: &str,
        url: &str,
        body: &[u8],
        time: SystemTime,
    ) -> Result<SignedHeaders, SignerError> {
        let credentials = self
            .credentials
            .as_ref()
            .filter(|c| !c.access_key_id().is_empty() && !c.secret_access_key().is_empty())
            .ok_or(SignerError::MissingCredentials)?;

        let host = host_of(url)?;

        let mut headers = SignedHeaders::new();
        headers.insert("host".to_string(), host);
        headers.insert("content-type".to_string(), CONTENT_TYPE_JSON.to_string());

        debug!(
            method,
            url,
            access_key = %redact_access_key(credentials.access_key_id()),
            "signing request"
        );

        let identity: Identity = credentials.clone().into();
        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| SignerError::Signing(e.to_string()))?
            .into();

        let signable = SignableRequest::new(
            method,
            url,
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            SignableBody::Bytes(body),
        )
        .map_err(|e| SignerError::InvalidRequest(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| SignerError::Signing(e.to_string()))?
            .into_parts();

        let mut signed = headers.clone();
        for (name, value) in instructions.headers() {
            signed.insert(name.to_ascii_lowercase(), value.to_string());
        }

        Ok(signed)
    }
}

fn host_of(url: &str) -> Result<String, SignerError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| SignerError::InvalidRequest(e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| SignerError::InvalidRequest(format!("no host in {url}")))?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Shorten an access key for logs: the first four characters only.
///
/// Counts characters, not bytes, so a malformed key cannot split a
/// code point.
pub fn redact_access_key(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}****")
}
