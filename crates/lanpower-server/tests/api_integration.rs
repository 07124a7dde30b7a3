//! HTTP-level integration tests for lanpower-server.
//!
//! These drive the public router with `tower::ServiceExt::oneshot`.  The wake
//! test uses the real UDP adapter against a loopback receiver; SSH is always
//! replaced by the scripted runner because no SSH server can be assumed.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use lanpower_core::{Platform, MAGIC_PACKET_LEN};
use lanpower_server::application::{LivenessProber, PowerService};
use lanpower_server::domain::RawSettings;
use lanpower_server::infrastructure::mock::{
    RecordingTransmitter, ScriptedCommandRunner, StubProcessRunner,
};
use lanpower_server::infrastructure::{build_router, SystemProcessRunner, UdpWakeTransmitter};
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tower::ServiceExt;

fn settings() -> RawSettings {
    RawSettings {
        wake_mac: Some("DE:AD:BE:EF:00:01".into()),
        sleep_host: Some("192.0.2.10".into()),
        ssh_user: Some("admin".into()),
        ssh_pass: Some("pw".into()),
        ..RawSettings::default()
    }
}

async fn post(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(router, Request::post(uri).body(Body::empty()).unwrap()).await
}

async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_wake_delivers_exactly_one_datagram_to_configured_port() {
    // Arrange: a loopback socket plays the sleeping machine's NIC
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = receiver.local_addr().unwrap().port();
    let raw = RawSettings {
        wake_broadcast: Some("127.0.0.1".into()),
        wake_port: Some(port.to_string()),
        ..settings()
    };
    let service = PowerService::new(
        Arc::new(raw.validate().unwrap()),
        Arc::new(UdpWakeTransmitter::new()),
        Arc::new(ScriptedCommandRunner::exiting(0)),
        Arc::new(StubProcessRunner::offline()),
    );

    // Act
    let (status, body) = post(build_router(Arc::new(service)), "/api/wake").await;

    // Assert: success body, one full packet, then silence
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"ok": true}));

    let mut buf = [0u8; 512];
    let (len, _) = timeout(Duration::from_secs(2), receiver.recv_from(&mut buf))
        .await
        .expect("magic packet must arrive")
        .unwrap();
    assert_eq!(len, MAGIC_PACKET_LEN);
    assert_eq!(&buf[..6], &[0xFF; 6]);
    assert_eq!(&buf[6..12], &[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]);

    let second = timeout(Duration::from_millis(200), receiver.recv_from(&mut buf)).await;
    assert!(second.is_err(), "only one datagram may be sent");
}

#[tokio::test]
async fn test_wake_with_malformed_mac_sends_nothing() {
    // Arrange
    let transmitter = Arc::new(RecordingTransmitter::new());
    let raw = RawSettings {
        wake_mac: Some("not-a-mac".into()),
        ..settings()
    };
    let service = PowerService::new(
        Arc::new(raw.validate().unwrap()),
        Arc::clone(&transmitter) as _,
        Arc::new(ScriptedCommandRunner::exiting(0)),
        Arc::new(StubProcessRunner::offline()),
    );

    // Act
    let (status, body) = post(build_router(Arc::new(service)), "/api/wake").await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().starts_with("invalid MAC address"));
    assert!(transmitter.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_sleep_exit_zero_returns_ok_and_runs_configured_command() {
    // Arrange
    let remote = Arc::new(ScriptedCommandRunner::exiting(0));
    let raw = RawSettings {
        sleep_command: Some("systemctl suspend".into()),
        ..settings()
    };
    let service = PowerService::new(
        Arc::new(raw.validate().unwrap()),
        Arc::new(RecordingTransmitter::new()),
        Arc::clone(&remote) as _,
        Arc::new(StubProcessRunner::offline()),
    );

    // Act
    let (status, body) = post(build_router(Arc::new(service)), "/api/sleep").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"ok": true}));
    let calls = remote.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[("192.0.2.10".to_string(), "systemctl suspend".to_string())]
    );
}

#[tokio::test]
async fn test_sleep_exit_one_returns_remote_command_failure() {
    let service = PowerService::new(
        Arc::new(settings().validate().unwrap()),
        Arc::new(RecordingTransmitter::new()),
        Arc::new(ScriptedCommandRunner::exiting(1)),
        Arc::new(StubProcessRunner::offline()),
    );

    let (status, body) = post(build_router(Arc::new(service)), "/api/sleep").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({"ok": false, "error": "SSH command failed (code 1)"})
    );
}

#[tokio::test]
async fn test_sleep_auth_rejected_returns_session_failure() {
    let service = PowerService::new(
        Arc::new(settings().validate().unwrap()),
        Arc::new(RecordingTransmitter::new()),
        Arc::new(ScriptedCommandRunner::rejecting()),
        Arc::new(StubProcessRunner::offline()),
    );

    let (status, body) = post(build_router(Arc::new(service)), "/api/sleep").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "SSH session failed: authentication rejected for user admin"
    );
}

#[tokio::test]
async fn test_status_of_unreachable_host_is_ok_true_online_false() {
    // Arrange: the real `ping` against a TEST-NET address that never answers.
    // If `ping` is not installed the spawn error reduces to the same answer.
    let service = PowerService::new(
        Arc::new(settings().validate().unwrap()),
        Arc::new(RecordingTransmitter::new()),
        Arc::new(ScriptedCommandRunner::exiting(0)),
        Arc::new(SystemProcessRunner),
    );

    // Act
    let (status, body) = get(build_router(Arc::new(service)), "/api/status").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"ok": true, "online": false}));
}

#[tokio::test]
async fn test_status_pings_the_ssh_host() {
    // Arrange
    let runner = Arc::new(StubProcessRunner::online());
    let service = PowerService::with_prober(
        Arc::new(settings().validate().unwrap()),
        Arc::new(RecordingTransmitter::new()),
        Arc::new(ScriptedCommandRunner::exiting(0)),
        LivenessProber::with_platform(Arc::clone(&runner) as _, Platform::Other),
    );

    // Act
    let (status, body) = get(build_router(Arc::new(service)), "/api/status").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["online"], true);
    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "ping");
    assert_eq!(calls[0].1, vec!["-c", "1", "-W", "1", "192.0.2.10"]);
}
