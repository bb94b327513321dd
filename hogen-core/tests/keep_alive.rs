use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{Router, http::StatusCode, routing::get};
use hogen_core::keep_alive::{
    HttpSelfPinger, KeepAliveScheduler, KeepAliveState, PingOutcome, SelfPinger,
};

const DELAY: Duration = Duration::from_secs(5 * 60);
const INTERVAL: Duration = Duration::from_secs(14 * 60);

#[derive(Debug, Default)]
struct CountingPinger {
    pings: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SelfPinger for CountingPinger {
    async fn ping(&self) -> PingOutcome {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            PingOutcome::UnexpectedStatus { status: 503 }
        } else {
            PingOutcome::Ok { status: 200 }
        }
    }

    fn target(&self) -> &str {
        "http://stub/api/keep-alive"
    }
}

fn scheduler_with(pinger: Arc<CountingPinger>) -> KeepAliveScheduler {
    KeepAliveScheduler::with_pinger(pinger, DELAY, INTERVAL)
}

#[tokio::test(start_paused = true)]
async fn walks_idle_scheduled_running() {
    let pinger = Arc::new(CountingPinger::default());
    let scheduler = scheduler_with(pinger.clone());
    assert_eq!(scheduler.state(), KeepAliveState::Idle);

    assert!(scheduler.start());
    assert_eq!(scheduler.state(), KeepAliveState::Scheduled);

    tokio::time::sleep(DELAY - Duration::from_secs(1)).await;
    assert_eq!(scheduler.state(), KeepAliveState::Scheduled);
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(scheduler.state(), KeepAliveState::Running);
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 1);

    tokio::time::sleep(INTERVAL).await;
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 2);

    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 4);

    let status = scheduler.status();
    assert_eq!(status.state, KeepAliveState::Running);
    assert_eq!(status.pings_sent, 4);
    assert_eq!(status.pings_failed, 0);
    assert!(status.last_ping_at.is_some());
    assert_eq!(status.last_outcome, Some(PingOutcome::Ok { status: 200 }));

    assert!(scheduler.stop());
}

#[tokio::test(start_paused = true)]
async fn failed_pings_are_counted_but_keep_running() {
    let pinger = Arc::new(CountingPinger {
        fail: true,
        ..CountingPinger::default()
    });
    let scheduler = scheduler_with(pinger.clone());
    scheduler.start();

    tokio::time::sleep(DELAY + INTERVAL + Duration::from_secs(1)).await;

    let status = scheduler.status();
    assert_eq!(status.state, KeepAliveState::Running);
    assert_eq!(status.pings_sent, 2);
    assert_eq!(status.pings_failed, 2);
    assert_eq!(
        status.last_outcome,
        Some(PingOutcome::UnexpectedStatus { status: 503 })
    );
}

#[tokio::test(start_paused = true)]
async fn second_start_is_a_no_op() {
    let pinger = Arc::new(CountingPinger::default());
    let scheduler = scheduler_with(pinger.clone());

    assert!(scheduler.start());
    assert!(!scheduler.start());

    tokio::time::sleep(DELAY + Duration::from_secs(1)).await;
    assert!(!scheduler.start());
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_before_delay_prevents_any_ping() {
    let pinger = Arc::new(CountingPinger::default());
    let scheduler = scheduler_with(pinger.clone());
    scheduler.start();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(scheduler.stop());
    assert_eq!(scheduler.state(), KeepAliveState::Stopped);

    tokio::time::sleep(DELAY + INTERVAL * 3).await;
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.state(), KeepAliveState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_final() {
    let pinger = Arc::new(CountingPinger::default());
    let scheduler = scheduler_with(pinger.clone());
    scheduler.start();
    tokio::time::sleep(DELAY + Duration::from_secs(1)).await;
    assert_eq!(scheduler.state(), KeepAliveState::Running);

    assert!(scheduler.stop());
    assert!(!scheduler.stop());
    assert!(!scheduler.stop());
    assert_eq!(scheduler.state(), KeepAliveState::Stopped);

    assert!(!scheduler.start());
    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(pinger.pings.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn stopping_an_idle_scheduler_blocks_later_start() {
    let scheduler = scheduler_with(Arc::new(CountingPinger::default()));
    assert!(scheduler.stop());
    assert_eq!(scheduler.state(), KeepAliveState::Stopped);
    assert!(!scheduler.start());
}

#[tokio::test]
async fn disabled_scheduler_never_leaves_disabled() {
    let scheduler = KeepAliveScheduler::disabled();
    assert!(!scheduler.start());
    assert!(!scheduler.stop());
    assert_eq!(scheduler.state(), KeepAliveState::Disabled);
    assert!(!scheduler.status().enabled);
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn http_pinger_reports_ok_for_200() {
    let base = serve(Router::new().route("/api/keep-alive", get(|| async { "alive" }))).await;

    let pinger = HttpSelfPinger::new(&base, Duration::from_secs(5)).expect("client");
    assert_eq!(pinger.target(), format!("{base}/api/keep-alive"));
    assert_eq!(pinger.ping().await, PingOutcome::Ok { status: 200 });
}

#[tokio::test]
async fn http_pinger_reports_unexpected_status() {
    let base = serve(Router::new().route(
        "/api/keep-alive",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;

    let pinger = HttpSelfPinger::new(&format!("{base}/"), Duration::from_secs(5)).expect("client");
    assert_eq!(
        pinger.ping().await,
        PingOutcome::UnexpectedStatus { status: 503 }
    );
}

#[tokio::test]
async fn http_pinger_reports_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let pinger =
        HttpSelfPinger::new(&format!("http://{addr}"), Duration::from_secs(5)).expect("client");
    assert!(matches!(pinger.ping().await, PingOutcome::Failed { .. }));
}
