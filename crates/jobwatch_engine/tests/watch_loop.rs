use std::sync::Arc;
use std::time::Duration;

use jobwatch_core::board::MemoryBoard;
use jobwatch_core::{JobId, JobRegistry, JobSummary, ProgressStyle, COMPLETED_RANK};
use jobwatch_engine::{
    Endpoints, FetchSettings, PollSettings, ReqwestBatchFetcher, WatchHandle, WatchLoop,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    jobwatch_logging::initialize_for_tests();
}

fn watch_loop(server: &MockServer) -> WatchLoop<MemoryBoard> {
    let url = |suffix: &str| Url::parse(&format!("{}{}", server.uri(), suffix)).unwrap();
    let endpoints = Endpoints {
        jobs: url("/jobs/"),
        logs: url("/jobs/logs/"),
        statuses: url("/jobs/statuses/"),
    };
    let fetcher = ReqwestBatchFetcher::new(endpoints, FetchSettings::default()).unwrap();
    WatchLoop::new(
        JobRegistry::new(MemoryBoard::new()),
        Arc::new(fetcher),
        PollSettings {
            refresh_interval: Duration::from_millis(100),
        },
    )
}

async fn run_for(watch: WatchLoop<MemoryBoard>, period: Duration) -> JobRegistry<MemoryBoard> {
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(period).await;
        stopper.cancel();
    });
    watch.run(cancel).await
}

async fn serve(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn id(raw: &str) -> JobId {
    JobId::from(raw)
}

#[tokio::test]
async fn bootstrap_refreshes_all_and_watches_unfinished() {
    init_logging();
    let server = MockServer::start().await;
    serve(
        &server,
        "/jobs/",
        json!([{"job_id": 1, "status": "COM"}, {"job_id": 2, "status": "INQ"}]),
    )
    .await;
    serve(
        &server,
        "/jobs/logs/",
        json!({
            "1": [{"str": "done", "type": "COM"}],
            "2": [{"str": "start", "type": "INQ"}, {"str": "go", "type": "UPL"}],
        }),
    )
    .await;
    serve(&server, "/jobs/statuses/", json!({"1": "COM", "2": "UPL"})).await;

    let registry = run_for(watch_loop(&server), Duration::from_millis(450)).await;

    assert_eq!(registry.watch_set().snapshot(), vec![id("2")]);
    let board = registry.board();
    let done = board.entry(&id("1")).unwrap();
    assert_eq!(
        done.timeline.progress(),
        Some((COMPLETED_RANK, ProgressStyle::Success))
    );
    let running = board.entry(&id("2")).unwrap();
    assert_eq!(running.log.text, "start\ngo");
    assert_eq!(running.log.writes, 1);
    assert_eq!(running.timeline.progress(), Some((2, ProgressStyle::Success)));
}

#[tokio::test]
async fn failed_job_is_backtracked_and_unwatched() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/jobs/", json!([{"job_id": "a", "status": "INQ"}])).await;
    serve(
        &server,
        "/jobs/logs/",
        json!({"a": [{"str": "q", "type": "INQ"}, {"str": "up", "type": "UPL"}, {"str": "boom"}]}),
    )
    .await;
    serve(&server, "/jobs/statuses/", json!({"a": "FAI"})).await;

    let registry = run_for(watch_loop(&server), Duration::from_millis(300)).await;

    let entry = registry.board().entry(&id("a")).unwrap();
    assert_eq!(entry.status, "FAI");
    assert_eq!(entry.timeline.progress(), Some((2, ProgressStyle::Failure)));
    assert!(registry.watch_set().is_empty());
}

#[tokio::test]
async fn empty_job_list_shows_notice() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/jobs/", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/jobs/statuses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let registry = run_for(watch_loop(&server), Duration::from_millis(300)).await;

    assert!(registry.is_bootstrapped());
    assert!(registry.board().empty_notice_visible());
}

#[tokio::test]
async fn failed_bootstrap_is_retried_on_next_refresh() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve(&server, "/jobs/", json!([{"job_id": 5, "status": "PRO"}])).await;
    serve(&server, "/jobs/logs/", json!({"5": []})).await;
    serve(&server, "/jobs/statuses/", json!({"5": "PRO"})).await;

    let registry = run_for(watch_loop(&server), Duration::from_millis(450)).await;

    assert!(registry.is_bootstrapped());
    assert!(registry.watch_set().contains(&id("5")));
    assert_eq!(
        registry.board().entry(&id("5")).unwrap().timeline.progress(),
        Some((3, ProgressStyle::Success))
    );
}

#[tokio::test]
async fn failed_log_fetch_skips_statuses() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/jobs/", json!([{"job_id": 1, "status": "INQ"}])).await;
    Mock::given(method("GET"))
        .and(path("/jobs/logs/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/statuses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1": "FAI"})))
        .expect(0)
        .mount(&server)
        .await;

    let registry = run_for(watch_loop(&server), Duration::from_millis(350)).await;

    // The loop kept polling and the job is still watched.
    assert!(registry.watch_set().contains(&id("1")));
    assert_eq!(registry.board().entry(&id("1")).unwrap().status, "INQ");
}

#[tokio::test]
async fn submitted_job_is_picked_up_by_refresh() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/jobs/", json!([])).await;
    serve(&server, "/jobs/logs/", json!({"new": [{"str": "queued", "type": "INQ"}]})).await;
    serve(&server, "/jobs/statuses/", json!({"new": "COM"})).await;

    let watch = watch_loop(&server);
    let handle: WatchHandle = watch.handle();
    assert!(handle.submit(JobSummary::new("new", "INQ")));

    let registry = run_for(watch, Duration::from_millis(350)).await;

    let entry = registry.board().entry(&id("new")).unwrap();
    assert!(entry.open);
    assert_eq!(entry.status, "COM");
    assert_eq!(entry.log.text, "queued");
    assert!(registry.watch_set().is_empty());
    assert!(!registry.board().empty_notice_visible());
}
