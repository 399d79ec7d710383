use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use warp::http::StatusCode;
use warp::Filter;

use pipeline_live_input::{
    api_routes, metrics_routes, DomainError, EventNotifier, HttpStreamProvider, InMemoryCache,
    KeyValueCache, LiveInput, LiveInputRegistry, MetricsReporter, NotificationSink,
    ProviderConfig, ProvisionedInput, Result, ServerConfig, StreamControlService, StreamEvent,
    StreamProvider, StreamStatus, WebhookConfig, WebhookNotifier, ACTIVE_LIVE_INPUT_KEY,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeProvider {
    creates: AtomicUsize,
    deletes: Mutex<Vec<String>>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    malformed: AtomicBool,
}

impl FakeProvider {
    fn new() -> Self {
        Self {
            creates: AtomicUsize::new(0),
            deletes: Mutex::new(Vec::new()),
            fail_create: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            malformed: AtomicBool::new(false),
        }
    }

    fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProvider for FakeProvider {
    async fn create_live_input(&self) -> Result<ProvisionedInput> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DomainError::StreamApi {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        if self.malformed.load(Ordering::SeqCst) {
            return Ok(ProvisionedInput {
                uid: Some(format!("li-{}", n)),
                ingest_url: Some("https://edge.example.com/whip".to_string()),
                playback_url: None,
            });
        }
        Ok(ProvisionedInput::new(
            &format!("li-{}", n),
            &format!("https://edge.example.com/li-{}/webRTC/publish", n),
            &format!("https://edge.example.com/li-{}/webRTC/play", n),
        ))
    }

    async fn delete_live_input(&self, id: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(id.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(DomainError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}

struct BrokenCache;

#[async_trait]
impl KeyValueCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(DomainError::Cache("store offline".to_string()))
    }

    async fn put(&self, _key: &str, _value: String) -> Result<()> {
        Err(DomainError::Cache("store offline".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(DomainError::Cache("store offline".to_string()))
    }
}

struct ChannelNotifier {
    events: mpsc::UnboundedSender<StreamEvent>,
    fail: bool,
}

#[async_trait]
impl EventNotifier for ChannelNotifier {
    async fn deliver(&self, event: &StreamEvent) -> Result<()> {
        let _ = self.events.send(event.clone());
        if self.fail {
            return Err(DomainError::Webhook {
                status: 500,
                message: "down".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct CountingMetrics {
    created: AtomicUsize,
    reused: AtomicUsize,
    ended: AtomicUsize,
    provider_failures: AtomicUsize,
    notifications_failed: AtomicUsize,
}

impl MetricsReporter for CountingMetrics {
    fn report_live_input_created(&self, _input: &LiveInput) {
        self.created.fetch_add(1, Ordering::SeqCst);
    }

    fn report_live_input_reused(&self) {
        self.reused.fetch_add(1, Ordering::SeqCst);
    }

    fn report_live_input_ended(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }

    fn report_provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::SeqCst);
    }

    fn report_notification(&self, delivered: bool) {
        if !delivered {
            self.notifications_failed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct Fixture {
    provider: Arc<FakeProvider>,
    cache: Arc<InMemoryCache>,
    metrics: Arc<CountingMetrics>,
    registry: Arc<LiveInputRegistry>,
}

fn fixture() -> Fixture {
    let provider = Arc::new(FakeProvider::new());
    let cache = Arc::new(InMemoryCache::new());
    let metrics = Arc::new(CountingMetrics::default());
    let registry = Arc::new(LiveInputRegistry::new(
        provider.clone(),
        cache.clone(),
        metrics.clone(),
    ));
    Fixture {
        provider,
        cache,
        metrics,
        registry,
    }
}

fn sink(
    fx: &Fixture,
    fail: bool,
) -> (NotificationSink, mpsc::UnboundedReceiver<StreamEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier: Arc<dyn EventNotifier> = Arc::new(ChannelNotifier { events: tx, fail });
    (
        NotificationSink::new(Some(notifier), "studio", fx.metrics.clone()),
        rx,
    )
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<StreamEvent>) -> StreamEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("notification within a second")
        .expect("notifier still open")
}

async fn json_body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_sequential_ensure_reuses_cached_input() {
    let fx = fixture();

    let first = fx.registry.ensure().await.unwrap();
    let second = fx.registry.ensure().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fx.provider.creates(), 1);
    assert_eq!(fx.metrics.created.load(Ordering::SeqCst), 1);
    assert_eq!(fx.metrics.reused.load(Ordering::SeqCst), 1);

    let cached: Value =
        serde_json::from_str(&fx.cache.get(ACTIVE_LIVE_INPUT_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(cached["id"], "li-1");
    assert_eq!(cached["ingestUrl"], "https://edge.example.com/li-1/webRTC/publish");
    assert_eq!(cached["playbackUrl"], "https://edge.example.com/li-1/webRTC/play");
    assert!(cached["createdAt"].is_string());
}

#[tokio::test]
async fn test_ensure_returns_preexisting_entry_without_provider_call() {
    let fx = fixture();
    fx.cache
        .put(
            ACTIVE_LIVE_INPUT_KEY,
            json!({
                "id": "existing",
                "ingestUrl": "https://edge/existing/publish",
                "playbackUrl": "https://edge/existing/play",
                "createdAt": "2026-01-01T00:00:00Z"
            })
            .to_string(),
        )
        .await
        .unwrap();

    let input = fx.registry.ensure().await.unwrap();

    assert_eq!(input.id(), "existing");
    assert_eq!(input.playback_url(), "https://edge/existing/play");
    assert_eq!(fx.provider.creates(), 0);
}

#[tokio::test]
async fn test_ensure_keeps_entry_without_created_at() {
    let fx = fixture();
    fx.cache
        .put(
            ACTIVE_LIVE_INPUT_KEY,
            json!({
                "id": "existing",
                "ingestUrl": "https://edge/existing/publish",
                "playbackUrl": "https://edge/existing/play"
            })
            .to_string(),
        )
        .await
        .unwrap();

    let first = fx.registry.ensure().await.unwrap();
    let second = fx.registry.ensure().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.id(), "existing");
    assert!(first.created_at().is_none());
    assert_eq!(fx.provider.creates(), 0);
}

#[tokio::test]
async fn test_ensure_keeps_entry_with_numeric_created_at() {
    let fx = fixture();
    fx.cache
        .put(
            ACTIVE_LIVE_INPUT_KEY,
            json!({
                "id": "existing",
                "ingestUrl": "https://edge/existing/publish",
                "playbackUrl": "https://edge/existing/play",
                "createdAt": 1767225600000i64
            })
            .to_string(),
        )
        .await
        .unwrap();

    let input = fx.registry.ensure().await.unwrap();

    assert_eq!(input.id(), "existing");
    assert!(input.created_at().is_some());
    assert_eq!(fx.provider.creates(), 0);
    assert_eq!(fx.metrics.reused.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ensure_replaces_unusable_entries() {
    let fx = fixture();

    fx.cache
        .put(ACTIVE_LIVE_INPUT_KEY, "{not json".to_string())
        .await
        .unwrap();
    assert_eq!(fx.registry.ensure().await.unwrap().id(), "li-1");

    fx.cache
        .put(
            ACTIVE_LIVE_INPUT_KEY,
            json!({ "id": "half", "ingestUrl": "https://edge/half" }).to_string(),
        )
        .await
        .unwrap();
    assert_eq!(fx.registry.ensure().await.unwrap().id(), "li-2");
    assert_eq!(fx.provider.creates(), 2);
}

#[tokio::test]
async fn test_malformed_provider_response_is_shape_error() {
    let fx = fixture();
    fx.provider.malformed.store(true, Ordering::SeqCst);

    let err = fx.registry.ensure().await.unwrap_err();

    assert!(matches!(err, DomainError::Shape(_)));
    assert!(fx.cache.get(ACTIVE_LIVE_INPUT_KEY).await.unwrap().is_none());
    assert_eq!(fx.metrics.provider_failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_end_clears_cache_even_when_provider_delete_fails() {
    let fx = fixture();
    let input = fx.registry.ensure().await.unwrap();
    fx.provider.fail_delete.store(true, Ordering::SeqCst);

    fx.registry.end(input.id()).await;

    assert_eq!(*fx.provider.deletes.lock().unwrap(), vec!["li-1"]);
    assert!(fx.registry.current().await.unwrap().is_none());

    // A new input is provisioned after ending
    assert_eq!(fx.registry.ensure().await.unwrap().id(), "li-2");
}

#[tokio::test]
async fn test_end_tolerates_cache_failure() {
    let provider = Arc::new(FakeProvider::new());
    let registry = LiveInputRegistry::new(
        provider.clone(),
        Arc::new(BrokenCache),
        Arc::new(CountingMetrics::default()),
    );

    registry.end("li-9").await;

    assert_eq!(*provider.deletes.lock().unwrap(), vec!["li-9"]);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unconfigured_sink_is_noop() {
    let fx = fixture();
    let sink = NotificationSink::new(None, "studio", fx.metrics.clone());
    let input = fx.registry.ensure().await.unwrap();

    assert!(!sink.is_enabled());
    assert!(sink.notify(sink.event(StreamStatus::Live, &input)).is_none());
}

#[tokio::test]
async fn test_failed_delivery_is_only_logged() {
    let fx = fixture();
    let (sink, mut rx) = sink(&fx, true);
    let input = fx.registry.ensure().await.unwrap();

    let handle = sink
        .notify(sink.event(StreamStatus::Live, &input))
        .expect("sink is configured");
    handle.await.unwrap();

    let event = next_event(&mut rx).await;
    assert_eq!(event.source, "studio");
    assert_eq!(event.resource_id, "li-1");
    assert_eq!(fx.metrics.notifications_failed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_publish_and_end_fire_events() {
    let fx = fixture();
    let (sink, mut rx) = sink(&fx, false);
    let service = StreamControlService::new(fx.registry.clone(), sink);

    let published = service.publish().await.unwrap();
    published.notification.expect("live event dispatched").await.unwrap();
    let live = next_event(&mut rx).await;
    assert_eq!(live.status, StreamStatus::Live);
    assert_eq!(live.urls.whip.as_deref(), Some(published.value.ingest_url()));
    assert_eq!(live.urls.whep.as_deref(), Some(published.value.playback_url()));

    let played = service.play().await.unwrap();
    assert_eq!(played, published.value);
    assert!(rx.try_recv().is_err());

    let ended = service.end().await;
    assert!(ended.value);
    ended.notification.expect("ended event dispatched").await.unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.status, StreamStatus::Ended);
    assert_eq!(event.resource_id, "li-1");

    let again = service.end().await;
    assert!(!again.value);
    assert!(again.notification.is_none());
    assert_eq!(fx.metrics.ended.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_end_tears_down_incomplete_entry() {
    let fx = fixture();
    let (sink, mut rx) = sink(&fx, false);
    let service = StreamControlService::new(fx.registry.clone(), sink);
    fx.cache
        .put(
            ACTIVE_LIVE_INPUT_KEY,
            json!({ "id": "existing", "ingestUrl": "https://edge/existing/publish" }).to_string(),
        )
        .await
        .unwrap();

    let ended = service.end().await;

    assert!(ended.value);
    assert_eq!(*fx.provider.deletes.lock().unwrap(), vec!["existing"]);
    assert!(fx.cache.get(ACTIVE_LIVE_INPUT_KEY).await.unwrap().is_none());
    ended.notification.expect("ended event dispatched").await.unwrap();
    let event = next_event(&mut rx).await;
    assert_eq!(event.status, StreamStatus::Ended);
    assert_eq!(event.resource_id, "existing");
}

#[tokio::test]
async fn test_service_end_clears_unparsable_entry() {
    let fx = fixture();
    let (sink, _rx) = sink(&fx, false);
    let service = StreamControlService::new(fx.registry.clone(), sink);
    fx.cache
        .put(ACTIVE_LIVE_INPUT_KEY, "{not json".to_string())
        .await
        .unwrap();

    let ended = service.end().await;

    assert!(!ended.value);
    assert!(ended.notification.is_none());
    assert!(fx.provider.deletes.lock().unwrap().is_empty());
    assert!(fx.cache.get(ACTIVE_LIVE_INPUT_KEY).await.unwrap().is_none());
    assert_eq!(fx.metrics.ended.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

fn server_config(token: Option<&str>) -> ServerConfig {
    ServerConfig::new(8787)
        .unwrap()
        .with_access_token(token.map(str::to_string))
        .with_service_name("studio")
}

#[tokio::test]
async fn test_http_publish_play_end() {
    let fx = fixture();
    let (sink, mut rx) = sink(&fx, false);
    let service = Arc::new(StreamControlService::new(fx.registry.clone(), sink));
    let routes = api_routes(service, &server_config(None));

    let res = warp::test::request()
        .method("POST")
        .path("/stream/publish")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(&res).await;
    assert_eq!(body["liveInputId"], "li-1");
    assert_eq!(body["whipUrl"], "https://edge.example.com/li-1/webRTC/publish");
    assert_eq!(next_event(&mut rx).await.status, StreamStatus::Live);

    let res = warp::test::request()
        .method("GET")
        .path("/stream/play")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(&res).await;
    assert_eq!(body["liveInputId"], "li-1");
    assert_eq!(body["whepUrl"], "https://edge.example.com/li-1/webRTC/play");

    let res = warp::test::request()
        .method("POST")
        .path("/stream/end")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(&res).await, json!({ "success": true, "ended": true }));
    assert_eq!(next_event(&mut rx).await.status, StreamStatus::Ended);

    let res = warp::test::request()
        .method("POST")
        .path("/stream/end")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&res).await, json!({ "success": true, "ended": false }));
    assert_eq!(fx.provider.creates(), 1);
}

#[tokio::test]
async fn test_http_maps_upstream_and_cache_failures() {
    let fx = fixture();
    fx.provider.fail_create.store(true, Ordering::SeqCst);
    let (sink, mut rx) = sink(&fx, false);
    let service = Arc::new(StreamControlService::new(fx.registry.clone(), sink));
    let routes = api_routes(service, &server_config(None));

    let res = warp::test::request()
        .method("POST")
        .path("/stream/publish")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(&res).await["success"], false);
    assert!(rx.try_recv().is_err());

    let broken = Arc::new(LiveInputRegistry::new(
        Arc::new(FakeProvider::new()),
        Arc::new(BrokenCache),
        Arc::new(CountingMetrics::default()),
    ));
    let service = Arc::new(StreamControlService::new(
        broken,
        NotificationSink::new(None, "studio", fx.metrics.clone()),
    ));
    let routes = api_routes(service, &server_config(None));

    let res = warp::test::request()
        .method("GET")
        .path("/stream/play")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Ending never fails
    let res = warp::test::request()
        .method("POST")
        .path("/stream/end")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_http_access_token_gate() {
    let fx = fixture();
    let service = Arc::new(StreamControlService::new(
        fx.registry.clone(),
        NotificationSink::new(None, "studio", fx.metrics.clone()),
    ));
    let routes = api_routes(service, &server_config(Some("let-me-in")));

    let res = warp::test::request()
        .method("GET")
        .path("/stream/play")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&res).await["success"], false);

    let res = warp::test::request()
        .method("GET")
        .path("/stream/play")
        .header("authorization", "Bearer wrong")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(fx.provider.creates(), 0);

    let res = warp::test::request()
        .method("GET")
        .path("/stream/play")
        .header("authorization", "Bearer let-me-in")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = warp::test::request()
        .method("GET")
        .path("/ping")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(&res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "studio");
}

#[tokio::test]
async fn test_health_routes() {
    let res = warp::test::request()
        .method("GET")
        .path("/livez")
        .reply(&metrics_routes())
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = warp::test::request()
        .method("GET")
        .path("/readyz")
        .reply(&metrics_routes())
        .await;
    assert_eq!(json_body(&res).await["status"], "ready");
}

// ---------------------------------------------------------------------------
// HTTP adapters against a local server
// ---------------------------------------------------------------------------

#[derive(Default)]
struct UpstreamLog {
    auth: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
    deletes: Mutex<Vec<String>>,
}

async fn spawn_upstream() -> (std::net::SocketAddr, Arc<UpstreamLog>) {
    let log = Arc::new(UpstreamLog::default());

    let create_log = log.clone();
    let create = warp::post()
        .and(warp::path!("stream" / "live_inputs"))
        .and(warp::header::<String>("authorization"))
        .and(warp::body::json())
        .map(move |auth: String, body: Value| {
            create_log.auth.lock().unwrap().push(auth);
            create_log.bodies.lock().unwrap().push(body);
            warp::reply::json(&json!({
                "success": true,
                "result": {
                    "uid": "cf-1",
                    "webRTC": { "url": "https://customer.example.com/cf-1/webRTC/publish" },
                    "webRTCPlayback": { "url": "https://customer.example.com/cf-1/webRTC/play" }
                }
            }))
        });

    let delete_log = log.clone();
    let delete = warp::delete()
        .and(warp::path!("stream" / "live_inputs" / String))
        .map(move |id: String| {
            delete_log.deletes.lock().unwrap().push(id.clone());
            match id.as_str() {
                "gone" => StatusCode::NOT_FOUND,
                "cf-1" => StatusCode::OK,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        });

    let hook_log = log.clone();
    let hook = warp::post()
        .and(warp::path!("hooks"))
        .and(warp::header::<String>("authorization"))
        .and(warp::body::json())
        .map(move |auth: String, body: Value| {
            hook_log.auth.lock().unwrap().push(auth);
            hook_log.bodies.lock().unwrap().push(body);
            StatusCode::NO_CONTENT
        });

    let (addr, server) =
        warp::serve(create.or(delete).or(hook)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, log)
}

#[tokio::test]
async fn test_http_stream_provider_round_trip() {
    let (addr, log) = spawn_upstream().await;
    let config = ProviderConfig::new(&format!("http://{}/stream", addr), "api-token").unwrap();
    let provider = HttpStreamProvider::new(config);

    let input = provider
        .create_live_input()
        .await
        .unwrap()
        .into_live_input(chrono::Utc::now())
        .unwrap();
    assert_eq!(input.id(), "cf-1");
    assert_eq!(input.ingest_url(), "https://customer.example.com/cf-1/webRTC/publish");
    assert_eq!(log.auth.lock().unwrap()[0], "Bearer api-token");

    assert!(provider.delete_live_input("cf-1").await.is_ok());
    assert!(provider.delete_live_input("gone").await.is_ok());
    let err = provider.delete_live_input("stuck").await.unwrap_err();
    assert!(matches!(err, DomainError::StreamApi { status: 500, .. }));
    assert_eq!(*log.deletes.lock().unwrap(), vec!["cf-1", "gone", "stuck"]);
}

#[tokio::test]
async fn test_webhook_notifier_posts_event() {
    let (addr, log) = spawn_upstream().await;
    let config = WebhookConfig::new(&format!("http://{}/hooks", addr), "hook-token").unwrap();
    let notifier = WebhookNotifier::new(config);

    notifier
        .deliver(&StreamEvent::ended("studio", "cf-1"))
        .await
        .unwrap();

    assert_eq!(log.auth.lock().unwrap()[0], "Bearer hook-token");
    let body = log.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["status"], "ended");
    assert_eq!(body["resourceId"], "cf-1");
    assert_eq!(body["source"], "studio");
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = ProviderConfig::new(&format!("http://127.0.0.1:{}/stream", port), "t").unwrap();

    let err = HttpStreamProvider::new(config)
        .create_live_input()
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Transport(_)));
    assert!(err.is_upstream());
}
