//! iFlytek (Xunfei) text translation provider
//!
//! Talks to the "ntrans" machine translation API. Each call sends one signed
//! JSON request:
//!
//! ```json
//! {
//!   "common": { "app_id": "..." },
//!   "business": { "from": "en", "to": "cn" },
//!   "data": { "text": "<base64 of the UTF-8 text>" }
//! }
//! ```
//!
//! and reads the translation from `data.result.trans_result.dst`.
//!
//! # Authentication
//!
//! The provider loads credentials from the `APP_ID`, `API_SECRET` and
//! `API_KEY` environment variables. Obtain them from the iFlytek console:
//! https://console.xfyun.cn/
//!
//! # Failure policy
//!
//! A request that fails in transport (no connection, non-2xx status) is
//! logged and translated as the empty string. A 2xx response without the
//! expected fields is a `ResponseSchemaError` and propagates.

use crate::config::{API_HOST, API_PATH, Credentials, XunfeiConfig};
use crate::error::{MtError, MtResult};
use crate::signer::Signer;
use crate::translator::StringTranslator;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Serialize)]
struct TranslationRequest<'a> {
    common: Common<'a>,
    business: Business<'a>,
    data: Data,
}

#[derive(Serialize)]
struct Common<'a> {
    app_id: &'a str,
}

#[derive(Serialize)]
struct Business<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
struct Data {
    text: String,
}

/// Translation client for the iFlytek "ntrans" API
#[derive(Clone)]
pub struct XunfeiTranslator {
    config: XunfeiConfig,
    signer: Signer,
    /// HTTP client for async requests
    client: reqwest::Client,
}

impl XunfeiTranslator {
    /// Create a new provider, validating the configuration immediately
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError::ConfigError)` - If a credential is empty or the HTTP
    ///   client cannot be created
    /// * `Err(MtError::InvalidLocale)` - If a language code is malformed
    pub fn new(config: XunfeiConfig) -> MtResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MtError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let signer = Signer::new(
            API_HOST,
            API_PATH,
            config.credentials.api_secret.clone(),
            config.credentials.api_key.clone(),
        );

        Ok(Self {
            config,
            signer,
            client,
        })
    }

    /// Create a provider from the `APP_ID`, `API_SECRET` and `API_KEY`
    /// environment variables, translating English to Chinese
    pub fn from_env() -> MtResult<Self> {
        Self::new(XunfeiConfig::new(Credentials::from_env()?))
    }

    fn build_body(&self, text: &str) -> MtResult<String> {
        let request = TranslationRequest {
            common: Common {
                app_id: &self.config.credentials.app_id,
            },
            business: Business {
                from: &self.config.from,
                to: &self.config.to,
            },
            data: Data {
                text: B64.encode(text.as_bytes()),
            },
        };

        serde_json::to_string(&request)
            .map_err(|e| MtError::Other(format!("Failed to serialize request: {}", e)))
    }

    /// Translate without absorbing transport failures
    ///
    /// Unlike [`StringTranslator::translate`], a refused connection or a
    /// non-2xx status comes back as `NetworkError` / `TransportError`.
    pub async fn try_translate(&self, text: &str) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let body = self.build_body(text)?;
        let headers = self.signer.sign(body.as_bytes())?.to_header_map()?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(MtError::TransportError {
                status: status.as_u16(),
                message: error_text.lines().next().unwrap_or_default().to_string(),
            });
        }

        let payload = response.text().await?;
        parse_response(&payload)
    }
}

/// Extract `data.result.trans_result.dst` from a success response body
pub fn parse_response(payload: &str) -> MtResult<String> {
    let json: Value = serde_json::from_str(payload).map_err(|e| {
        MtError::ResponseSchemaError(format!("Response body is not JSON: {}", e))
    })?;

    let mut current = &json;
    let mut path = String::new();
    for field in ["data", "result", "trans_result", "dst"] {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(field);

        current = current.get(field).ok_or_else(|| {
            // iFlytek reports business errors as {"code": ..., "message": ...}
            let detail = match (json.get("code"), json.get("message").and_then(Value::as_str)) {
                (Some(code), Some(message)) => format!(" (code {}: {})", code, message),
                _ => String::new(),
            };
            MtError::ResponseSchemaError(format!("missing '{}' field{}", path, detail))
        })?;
    }

    current
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| MtError::ResponseSchemaError(format!("'{}' is not a string", path)))
}

impl std::fmt::Debug for XunfeiTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XunfeiTranslator")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl StringTranslator for XunfeiTranslator {
    async fn translate(&self, text: &str) -> MtResult<String> {
        match self.try_translate(text).await {
            Err(err @ (MtError::TransportError { .. } | MtError::NetworkError(_))) => {
                warn!(provider = self.provider_name(), error = %err, "translation failed, substituting empty text");
                Ok(String::new())
            }
            Ok(translated) => {
                debug!(source = text, translated = %translated, "translation received");
                Ok(translated)
            }
            Err(err) => Err(err),
        }
    }

    fn provider_name(&self) -> &str {
        "iFlytek Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> XunfeiConfig {
        XunfeiConfig::new(Credentials::new("app-123", "secret", "key"))
    }

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_config() {
        let provider = XunfeiTranslator::new(config());
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().provider_name(), "iFlytek Translate");
    }

    #[test]
    fn test_new_with_empty_credentials() {
        for creds in [
            Credentials::new("", "secret", "key"),
            Credentials::new("app", "", "key"),
            Credentials::new("app", "secret", " "),
        ] {
            match XunfeiTranslator::new(XunfeiConfig::new(creds)) {
                Err(MtError::ConfigError(msg)) => assert!(msg.contains("empty")),
                _ => panic!("Expected ConfigError"),
            }
        }
    }

    #[test]
    fn test_new_with_invalid_language() {
        let result = XunfeiTranslator::new(config().with_languages("en", "zh#cn"));
        assert!(matches!(result, Err(MtError::InvalidLocale(_))));
    }

    // ========== Request Body Tests ==========

    #[test]
    fn test_build_body_layout() {
        let provider = XunfeiTranslator::new(config()).unwrap();
        let body = provider.build_body("Hello").unwrap();
        assert_eq!(
            body,
            r#"{"common":{"app_id":"app-123"},"business":{"from":"en","to":"cn"},"data":{"text":"SGVsbG8="}}"#
        );
    }

    #[test]
    fn test_build_body_encodes_utf8() {
        let provider = XunfeiTranslator::new(config().with_languages("cn", "en")).unwrap();
        let body: Value = serde_json::from_str(&provider.build_body("你好").unwrap()).unwrap();
        assert_eq!(body["data"]["text"], "5L2g5aW9");
        assert_eq!(body["business"]["from"], "cn");
        assert_eq!(body["business"]["to"], "en");
    }

    // ========== Response Parsing Tests ==========

    #[test]
    fn test_parse_success_response() {
        let payload = r#"{"data":{"result":{"trans_result":{"dst":"你好"}}}}"#;
        assert_eq!(parse_response(payload).unwrap(), "你好");
    }

    #[test]
    fn test_parse_full_success_response() {
        let payload = r#"{
            "code": 0,
            "message": "success",
            "sid": "its0006abcd",
            "data": {
                "result": {
                    "from": "en",
                    "to": "cn",
                    "trans_result": { "dst": "开始", "src": "Getting Started" }
                }
            }
        }"#;
        assert_eq!(parse_response(payload).unwrap(), "开始");
    }

    #[test]
    fn test_parse_missing_trans_result() {
        let payload = r#"{"data":{"result":{}}}"#;
        match parse_response(payload) {
            Err(MtError::ResponseSchemaError(msg)) => {
                assert!(msg.contains("data.result.trans_result"));
            }
            other => panic!("Expected ResponseSchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_business_error_includes_code() {
        let payload = r#"{"code":10105,"message":"illegal access|illegal client_ip","data":null}"#;
        match parse_response(payload) {
            Err(MtError::ResponseSchemaError(msg)) => {
                assert!(msg.contains("10105"));
                assert!(msg.contains("illegal access"));
            }
            other => panic!("Expected ResponseSchemaError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_string_dst() {
        let payload = r#"{"data":{"result":{"trans_result":{"dst":42}}}}"#;
        assert!(matches!(
            parse_response(payload),
            Err(MtError::ResponseSchemaError(_))
        ));
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_response("<html>oops</html>"),
            Err(MtError::ResponseSchemaError(_))
        ));
    }

    // ========== Validation Tests ==========

    #[tokio::test]
    async fn test_translate_empty_text() {
        let provider = XunfeiTranslator::new(config()).unwrap();
        assert_eq!(provider.translate("").await.unwrap(), "");
    }

    // ========== Debug Implementation Test ==========

    #[test]
    fn test_debug_output() {
        let provider = XunfeiTranslator::new(XunfeiConfig::new(Credentials::new(
            "app-123",
            "super-secret",
            "my-api-key",
        )))
        .unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("super-secret"));
        assert!(!debug_str.contains("my-api-key"));
    }

    // ========== Integration Tests (require real credentials) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_api_single_translation() {
        let provider = match XunfeiTranslator::from_env() {
            Ok(p) => p,
            Err(_) => {
                eprintln!("Skipping: APP_ID / API_SECRET / API_KEY not set");
                return;
            }
        };

        let result = provider.try_translate("Hello").await.unwrap();
        println!("Translation: {} → {}", "Hello", result);
        assert!(!result.is_empty());
    }
}
