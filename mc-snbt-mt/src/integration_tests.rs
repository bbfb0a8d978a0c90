//! End-to-end tests for the iFlytek client
//!
//! These tests run the real HTTP client against a local stand-in for the
//! translation API, so they need no credentials or network access.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::signer::body_digest;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as B64;
    use mc_snbt::{TagNode, parse};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    const SUCCESS: &str = r#"{"code":0,"message":"success","sid":"its0001","data":{"result":{"from":"en","to":"cn","trans_result":{"dst":"你好","src":"Hello"}}}}"#;

    #[derive(Debug, Clone)]
    struct Captured {
        headers: HeaderMap,
        body: String,
    }

    #[derive(Clone)]
    struct FakeApi {
        status: StatusCode,
        body: &'static str,
        requests: Arc<Mutex<Vec<Captured>>>,
    }

    async fn handle(
        State(api): State<FakeApi>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        api.requests.lock().unwrap().push(Captured { headers, body });
        (api.status, api.body.to_string())
    }

    /// Serve a canned response on 127.0.0.1; returns the endpoint URL and
    /// the log of received requests
    async fn spawn_fake_api(
        status: StatusCode,
        body: &'static str,
    ) -> (String, Arc<Mutex<Vec<Captured>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let api = FakeApi {
            status,
            body,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().route("/v2/ots", post(handle)).with_state(api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v2/ots", addr), requests)
    }

    fn client(endpoint: &str) -> XunfeiTranslator {
        let config = XunfeiConfig::new(Credentials::new("app-123", "secret", "key"))
            .with_endpoint(endpoint);
        XunfeiTranslator::new(config).unwrap()
    }

    fn header<'a>(captured: &'a Captured, name: &str) -> &'a str {
        captured.headers[name].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_dst() {
        let (endpoint, _) = spawn_fake_api(StatusCode::OK, SUCCESS).await;
        let result = client(&endpoint).translate("Hello").await.unwrap();
        assert_eq!(result, "你好");
    }

    #[tokio::test]
    async fn test_http_500_yields_empty_string() {
        let (endpoint, requests) =
            spawn_fake_api(StatusCode::INTERNAL_SERVER_ERROR, "engine busy\nretry later").await;
        let provider = client(&endpoint);

        assert_eq!(provider.translate("Hello").await.unwrap(), "");

        match provider.try_translate("Hello").await {
            Err(MtError::TransportError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "engine busy");
            }
            other => panic!("Expected TransportError, got {:?}", other),
        }
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_http_401_yields_empty_string() {
        let (endpoint, _) = spawn_fake_api(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"HMAC signature cannot be verified"}"#,
        )
        .await;
        assert_eq!(client(&endpoint).translate("Hello").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_missing_trans_result_is_schema_error() {
        let (endpoint, _) =
            spawn_fake_api(StatusCode::OK, r#"{"code":0,"data":{"result":{}}}"#).await;
        let result = client(&endpoint).translate("Hello").await;
        assert!(matches!(result, Err(MtError::ResponseSchemaError(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_yields_empty_string() {
        // Reserve a port, then close it so nothing is listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let provider = client(&format!("http://{}/v2/ots", addr));

        assert_eq!(provider.translate("Hello").await.unwrap(), "");
        assert!(matches!(
            provider.try_translate("Hello").await,
            Err(MtError::NetworkError(_))
        ));
    }

    #[tokio::test]
    async fn test_request_body_and_signature() {
        let (endpoint, requests) = spawn_fake_api(StatusCode::OK, SUCCESS).await;
        client(&endpoint).translate("Hello").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let captured = &requests[0];

        let body: Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(body["common"]["app_id"], "app-123");
        assert_eq!(body["business"]["from"], "en");
        assert_eq!(body["business"]["to"], "cn");
        assert_eq!(body["data"]["text"], B64.encode("Hello"));

        assert_eq!(header(captured, "content-type"), "application/json");
        assert_eq!(header(captured, "host"), "ntrans.xfyun.cn");
        assert_eq!(header(captured, "digest"), body_digest(captured.body.as_bytes()));

        // The server side of the contract: rebuild the signature from what
        // arrived and compare
        let sent_at = httpdate::parse_http_date(header(captured, "date")).unwrap();
        let expected = Signer::new("ntrans.xfyun.cn", "/v2/ots", "secret", "key")
            .sign_at(captured.body.as_bytes(), sent_at)
            .unwrap();
        assert_eq!(header(captured, "authorization"), expected.authorization);
    }

    #[tokio::test]
    async fn test_each_request_signed_separately() {
        let (endpoint, requests) = spawn_fake_api(StatusCode::OK, SUCCESS).await;
        let provider = client(&endpoint);
        provider.translate("Hello").await.unwrap();
        provider.translate("Goodbye").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_ne!(
            header(&requests[0], "digest"),
            header(&requests[1], "digest")
        );
        assert_ne!(
            header(&requests[0], "authorization"),
            header(&requests[1], "authorization")
        );
    }

    #[tokio::test]
    async fn test_tree_translation_against_fake_api() {
        let (endpoint, requests) = spawn_fake_api(StatusCode::OK, SUCCESS).await;
        let mut tree = parse(r#"{ title: "Hello", other: "World", icon: "minecraft:book" }"#).unwrap();
        let translator = TreeTranslator::new(client(&endpoint), key_contains("title"));

        let report = translator.translate(&mut tree).await.unwrap();

        assert_eq!(report.requested, 1);
        assert_eq!(tree.get("title"), Some(&TagNode::string("你好")));
        assert_eq!(tree.get("other"), Some(&TagNode::string("World")));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_abort_walk() {
        let (endpoint, requests) =
            spawn_fake_api(StatusCode::SERVICE_UNAVAILABLE, "unavailable").await;
        let mut tree = parse(r#"{ title: "Hello", quests: [{ title: "World" }] }"#).unwrap();
        let translator = TreeTranslator::new(client(&endpoint), key_contains("title"));

        let report = translator.translate(&mut tree).await.unwrap();

        assert_eq!(report.requested, 2);
        assert_eq!(report.emptied, 2);
        assert_eq!(requests.lock().unwrap().len(), 2);
        assert_eq!(tree.get("title"), Some(&TagNode::string("")));
    }

    #[tokio::test]
    async fn test_schema_failure_aborts_walk() {
        let (endpoint, requests) = spawn_fake_api(StatusCode::OK, r#"{"data":{}}"#).await;
        let mut tree = parse(r#"{ title: "Hello", quests: [{ title: "World" }] }"#).unwrap();
        let translator = TreeTranslator::new(client(&endpoint), key_contains("title"));

        let result = translator.translate(&mut tree).await;

        assert!(matches!(result, Err(MtError::ResponseSchemaError(_))));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }
}
