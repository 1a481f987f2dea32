use std::collections::HashMap;

use chrono::NaiveDate;
use taskCalendarBot::config::{RunMode, Settings};
use taskCalendarBot::error::StartupError;
use taskCalendarBot::events::broadcast::TaskBroadcaster;
use taskCalendarBot::handlers::web::{bind_viewer_listener, routes};
use taskCalendarBot::models::task::Task;
use taskCalendarBot::runtime;
use tokio::time::{sleep, timeout, Duration};

const TRUSTED: &str = "http://localhost:5173";
const FOREIGN: &str = "http://evil.example";

fn task() -> Task {
    Task {
        id: "w1".to_string(),
        title: "Retro".to_string(),
        description: "Sprint 14 retro".to_string(),
        assignee: "Jamie".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        time_slot: "09:00".to_string(),
    }
}

#[tokio::test]
async fn health_answers_trusted_origin() {
    let filter = routes(TaskBroadcaster::new(4), TRUSTED.to_string());

    let res = warp::test::request()
        .method("GET")
        .path("/health")
        .header("origin", TRUSTED)
        .reply(&filter)
        .await;

    assert_eq!(res.status().as_u16(), 200);
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn health_forbids_foreign_origin() {
    let filter = routes(TaskBroadcaster::new(4), TRUSTED.to_string());

    let res = warp::test::request()
        .method("GET")
        .path("/health")
        .header("origin", FOREIGN)
        .reply(&filter)
        .await;

    assert_eq!(res.status().as_u16(), 403);
}

#[tokio::test]
async fn viewer_socket_receives_new_task() {
    let broadcaster = TaskBroadcaster::new(4);
    let filter = routes(broadcaster.clone(), TRUSTED.to_string());

    let mut client = warp::test::ws()
        .path("/ws")
        .header("origin", TRUSTED)
        .handshake(filter)
        .await
        .expect("trusted handshake should succeed");

    timeout(Duration::from_secs(2), async {
        while broadcaster.viewer_count() == 0 {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("viewer should subscribe");
    assert_eq!(broadcaster.publish(task()), 1);

    let frame = timeout(Duration::from_secs(2), client.recv())
        .await
        .expect("frame should arrive")
        .expect("socket should stay open");
    let json: serde_json::Value = serde_json::from_str(frame.to_str().unwrap()).unwrap();
    assert_eq!(json["event"], "newTask");
    assert_eq!(json["data"]["id"], "w1");
    assert_eq!(json["data"]["timeSlot"], "09:00");
}

#[tokio::test]
async fn viewer_socket_refuses_foreign_origin() {
    let broadcaster = TaskBroadcaster::new(4);
    let filter = routes(broadcaster.clone(), TRUSTED.to_string());

    let result = warp::test::ws()
        .path("/ws")
        .header("origin", FOREIGN)
        .handshake(filter)
        .await;

    assert!(result.is_err());
    assert_eq!(broadcaster.viewer_count(), 0);
}

#[tokio::test]
async fn taken_port_is_a_bind_error() {
    let held = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = held.local_addr().unwrap().port();

    let err = bind_viewer_listener(port).await.unwrap_err();

    assert!(matches!(err, StartupError::Bind { port: p, .. } if p == port));
}

#[tokio::test]
async fn startup_fails_before_console_when_port_is_taken() {
    let held = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = held.local_addr().unwrap().port();
    let values: HashMap<&str, String> = HashMap::from([
        ("RUN_MODE", "console".to_string()),
        ("PORT", port.to_string()),
    ]);
    let settings = Settings::resolve(|key| values.get(key).cloned(), None).unwrap();
    assert_eq!(settings.run_mode, RunMode::Console);

    let result = timeout(Duration::from_secs(2), runtime::run(settings))
        .await
        .expect("startup should fail fast");

    assert!(matches!(result, Err(StartupError::Bind { .. })));
}
