//! Integration tests for [`HttpReachability`] against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sigil::{
    AssetReference, HttpReachability, ProbeConfig, ProbeOutcome, Prober, ReachabilityCheck,
    SigilError, VerificationCache,
};

fn check() -> HttpReachability {
    HttpReachability::new().unwrap()
}

#[tokio::test]
async fn head_success_is_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/ankh.svg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = check().check(&format!("{}/ankh.svg", server.uri())).await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn head_rejected_falls_back_to_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/hamsa.png"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hamsa.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 16]))
        .expect(1)
        .mount(&server)
        .await;

    let result = check().check(&format!("{}/hamsa.png", server.uri())).await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn not_found_is_unreachable_and_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = check()
        .check(&format!("{}/missing.svg", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, SigilError::Unreachable { status: 404 }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = check()
        .check(&format!("{}/busy.svg", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, SigilError::Unreachable { status: 503 }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = check().check(&format!("{uri}/gone.svg")).await.unwrap_err();
    assert!(matches!(err, SigilError::Http(_)), "{err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn prober_retries_real_http_failures() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/flaky.svg"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let cache = Arc::new(VerificationCache::default());
    let prober = Prober::new(
        cache.clone(),
        Arc::new(check()),
        ProbeConfig::new().backoff_base(Duration::from_millis(5)),
    );
    let location = format!("{}/flaky.svg", server.uri());

    let outcome = prober.probe(&AssetReference::remote(&location)).await;

    assert_eq!(outcome, ProbeOutcome::Failed { attempts: 3 });
    let entry = cache.lookup(&location).unwrap();
    assert!(!entry.is_valid);
    assert_eq!(entry.retry_count, 2);
}

#[tokio::test]
async fn slow_server_counts_as_timed_out_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let prober = Prober::new(
        Arc::new(VerificationCache::default()),
        Arc::new(check()),
        ProbeConfig::new()
            .max_attempts(1)
            .attempt_timeout(Duration::from_millis(100)),
    );

    let outcome = prober
        .probe(&AssetReference::remote(format!("{}/slow.svg", server.uri())))
        .await;
    assert_eq!(outcome, ProbeOutcome::Failed { attempts: 1 });
}

#[tokio::test]
async fn custom_client_sends_its_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(wiremock::matchers::header("user-agent", "heritage-bot/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("heritage-bot/2")
        .build()
        .unwrap();
    let result = HttpReachability::with_client(client)
        .check(&format!("{}/mon.svg", server.uri()))
        .await;
    assert!(result.is_ok(), "{result:?}");
}
