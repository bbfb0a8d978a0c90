//! HMAC-SHA256 request signing for the iFlytek web API
//!
//! Every request carries a `Digest` of its body and an `Authorization` header
//! whose signature covers the host, the date, the request line and that
//! digest:
//!
//! ```text
//! host: ntrans.xfyun.cn
//! date: Sun, 06 Nov 1994 08:49:37 GMT
//! POST /v2/ots HTTP/1.1
//! digest: SHA-256=<base64 sha256 of body>
//! ```
//!
//! The server rebuilds the same text, so the format has to match byte for
//! byte. Headers are computed fresh for each request.

use crate::error::{MtError, MtResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE, HOST, HeaderMap, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};
use std::time::SystemTime;

type HmacSha256 = Hmac<Sha256>;

/// Header set for one signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub host: String,
    pub date: String,
    pub digest: String,
    pub authorization: String,
}

impl SignedHeaders {
    pub const JSON_CONTENT_TYPE: &'static str = "application/json";

    pub fn to_header_map(&self) -> MtResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(Self::JSON_CONTENT_TYPE));
        headers.insert(HOST, header_value("Host", &self.host)?);
        headers.insert(DATE, header_value("Date", &self.date)?);
        headers.insert(
            HeaderName::from_static("digest"),
            header_value("Digest", &self.digest)?,
        );
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &self.authorization)?,
        );
        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> MtResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| MtError::ConfigError(format!("Invalid value for header {}: {}", name, e)))
}

/// Builds the authentication headers for a fixed host and path
#[derive(Clone)]
pub struct Signer {
    host: String,
    path: String,
    api_secret: String,
    api_key: String,
}

impl Signer {
    pub fn new(
        host: impl Into<String>,
        path: impl Into<String>,
        api_secret: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            api_secret: api_secret.into(),
            api_key: api_key.into(),
        }
    }

    /// Sign `body` with the current time
    pub fn sign(&self, body: &[u8]) -> MtResult<SignedHeaders> {
        self.sign_at(body, SystemTime::now())
    }

    /// Sign `body` as if sent at `time`
    pub fn sign_at(&self, body: &[u8], time: SystemTime) -> MtResult<SignedHeaders> {
        let digest = body_digest(body);
        let date = httpdate::fmt_http_date(time);
        let signature = self.signature(&self.signing_string(&date, &digest))?;
        let authorization = format!(
            "api_key=\"{}\", algorithm=\"hmac-sha256\", headers=\"host date request-line digest\", signature=\"{}\"",
            self.api_key, signature
        );

        Ok(SignedHeaders {
            host: self.host.clone(),
            date,
            digest,
            authorization,
        })
    }

    pub fn request_line(&self) -> String {
        format!("POST {} HTTP/1.1", self.path)
    }

    fn signing_string(&self, date: &str, digest: &str) -> String {
        format!(
            "host: {}\ndate: {}\n{}\ndigest: {}",
            self.host,
            date,
            self.request_line(),
            digest
        )
    }

    fn signature(&self, signing_string: &str) -> MtResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| MtError::ConfigError(format!("Cannot initialize HMAC-SHA256: {}", e)))?;
        mac.update(signing_string.as_bytes());
        Ok(B64.encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("host", &self.host)
            .field("path", &self.path)
            .field("api_secret", &"***")
            .field("api_key", &"***")
            .finish()
    }
}

/// `SHA-256=` followed by the base64 SHA-256 of `body`
pub fn body_digest(body: &[u8]) -> String {
    format!("SHA-256={}", B64.encode(Sha256::digest(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    const BODY: &[u8] = br#"{"text":"hello"}"#;

    fn signer() -> Signer {
        Signer::new("ntrans.xfyun.cn", "/v2/ots", "secret", "key")
    }

    fn fixed_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(784_111_777)
    }

    #[test]
    fn test_body_digest() {
        assert_eq!(
            body_digest(b""),
            "SHA-256=47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
        assert_eq!(
            body_digest(BODY),
            "SHA-256=y7vc0naSNE3l26s6vKukE/sPRTByZ95wgUAVdt8csXY="
        );
    }

    #[test]
    fn test_signing_string_layout() {
        let s = signer().signing_string("Sun, 06 Nov 1994 08:49:37 GMT", "SHA-256=abc");
        assert_eq!(
            s,
            "host: ntrans.xfyun.cn\ndate: Sun, 06 Nov 1994 08:49:37 GMT\nPOST /v2/ots HTTP/1.1\ndigest: SHA-256=abc"
        );
    }

    #[test]
    fn test_sign_at_known_vector() {
        let headers = signer().sign_at(BODY, fixed_time()).unwrap();
        assert_eq!(headers.host, "ntrans.xfyun.cn");
        assert_eq!(headers.date, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(
            headers.digest,
            "SHA-256=y7vc0naSNE3l26s6vKukE/sPRTByZ95wgUAVdt8csXY="
        );
        assert_eq!(
            headers.authorization,
            "api_key=\"key\", algorithm=\"hmac-sha256\", headers=\"host date request-line digest\", signature=\"uGhj+gR3xX+LWsZ+oP2HzjIjcJKihmorwZdQS62TMZA=\""
        );
    }

    #[test]
    fn test_different_times_give_different_headers() {
        let first = signer().sign_at(BODY, fixed_time()).unwrap();
        let second = signer()
            .sign_at(BODY, fixed_time() + Duration::from_secs(1))
            .unwrap();
        assert_ne!(first.date, second.date);
        assert_ne!(first.authorization, second.authorization);
        // the digest covers only the body
        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn test_different_bodies_give_different_digests() {
        let first = signer().sign_at(BODY, fixed_time()).unwrap();
        let second = signer().sign_at(b"{}", fixed_time()).unwrap();
        assert_ne!(first.digest, second.digest);
        assert_ne!(first.authorization, second.authorization);
    }

    #[test]
    fn test_header_map() {
        let headers = signer().sign_at(BODY, fixed_time()).unwrap();
        let map = headers.to_header_map().unwrap();
        assert_eq!(map.len(), 5);
        assert_eq!(map["content-type"], "application/json");
        assert_eq!(map["date"], "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_debug_masks_secrets() {
        let signer = Signer::new("ntrans.xfyun.cn", "/v2/ots", "s3cret-value", "k3y-value");
        let debug_str = format!("{:?}", signer);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("s3cret-value"));
        assert!(!debug_str.contains("k3y-value"));
    }
}
