//! End-to-end tests over a real TCP socket.

use lotkeeper_core::OccupancyTracker;
use lotkeeper_server::{ParkingServer, ServerConfig};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running server on an ephemeral port.
struct TestServer {
    addr: SocketAddr,
    tracker: Arc<OccupancyTracker>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TestServer {
    async fn start(capacity: u32, config: ServerConfig) -> Self {
        let tracker = Arc::new(OccupancyTracker::with_capacity(capacity).unwrap());
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..config
        };
        let server = ParkingServer::new(config, Arc::clone(&tracker));
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            tracker,
            shutdown: Some(tx),
            task,
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await.unwrap();
    }

    async fn connect(&self) -> TcpStream {
        TcpStream::connect(self.addr).await.unwrap()
    }

    /// Sends raw request bytes and returns (status, headers, body).
    async fn raw(&self, request: &str) -> (u16, String, Vec<u8>) {
        let mut stream = self.connect().await;
        stream.write_all(request.as_bytes()).await.unwrap();
        read_response(&mut stream).await
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (status, _, body) = self.raw(&request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post(&self, path: &str, json: &str) -> (u16, Value) {
        let request = format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{json}",
            json.len()
        );
        let (status, _, body) = self.raw(&request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}

/// Reads a whole response and splits it into (status, headers, body).
async fn read_response(stream: &mut TcpStream) -> (u16, String, Vec<u8>) {
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();

    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header terminator");
    let head = String::from_utf8(response[..split].to_vec()).unwrap();
    let body = response[split + 4..].to_vec();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    (status, head, body)
}

#[tokio::test]
async fn two_spot_scenario_over_http() {
    let server = TestServer::start(2, ServerConfig::default()).await;

    let (status, body) = server.post("/api/park", r#"{"license_plate":"ABC123"}"#).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["spot_number"], 1);
    let entry_time = body["data"]["entry_time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(entry_time).is_ok());
    assert!(entry_time.ends_with('Z'));

    let (_, body) = server.post("/api/park", r#"{"license_plate":"xyz999"}"#).await;
    assert_eq!(body["data"]["spot_number"], 2);
    assert_eq!(body["data"]["license_plate"], "XYZ999");

    let (status, body) = server.post("/api/park", r#"{"license_plate":"QQQ111"}"#).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Parking lot is full");

    let (_, body) = server.post("/api/exit", r#"{"license_plate":"ABC123"}"#).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["spot_number"], 1);

    let (_, body) = server.post("/api/park", r#"{"license_plate":"QQQ111"}"#).await;
    assert_eq!(body["data"]["spot_number"], 1);

    let (status, body) = server.get("/api/status").await;
    assert_eq!(status, 200);
    assert_eq!(body["total_spots"], 2);
    assert_eq!(body["available_spots"], 0);
    assert_eq!(body["occupied_spots"], 2);
    assert_eq!(body["occupancy_rate"], 100.0);

    let (_, vehicles) = server.get("/api/vehicles").await;
    let plates: Vec<&str> = vehicles
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["license_plate"].as_str().unwrap())
        .collect();
    assert_eq!(plates, vec!["QQQ111", "XYZ999"]);

    let (_, history) = server.get("/api/history").await;
    let actions: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["ENTRY", "ENTRY", "EXIT", "ENTRY"]);
    assert_eq!(history[2]["duration_minutes"], 0);

    assert_eq!(server.tracker.stats().rejected_full(), 1);
    server.stop().await;
}

#[tokio::test]
async fn blank_plate_is_bad_request() {
    let server = TestServer::start(2, ServerConfig::default()).await;

    let (status, body) = server.post("/api/park", r#"{"license_plate":"   "}"#).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "License plate required");

    let (status, _) = server.post("/api/exit", r#"{"vehicle_type":"car"}"#).await;
    assert_eq!(status, 400);

    server.stop().await;
}

#[tokio::test]
async fn responses_carry_cors_and_close() {
    let server = TestServer::start(1, ServerConfig::default()).await;

    let (status, head, body) = server
        .raw("OPTIONS /api/park HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await;
    assert_eq!(status, 204);
    assert!(body.is_empty());
    assert!(head.contains("Access-Control-Allow-Origin: *"));
    assert!(head.contains("Connection: close"));

    server.stop().await;
}

#[tokio::test]
async fn garbage_request_is_bad_request() {
    let server = TestServer::start(1, ServerConfig::default()).await;

    let (status, _, body) = server.raw("NONSENSE\r\n\r\n").await;
    assert_eq!(status, 400);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], false);

    server.stop().await;
}

#[tokio::test]
async fn serves_frontend_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Lot</h1>").unwrap();

    let server = TestServer::start(1, ServerConfig::default().with_static_dir(dir.path())).await;

    let (status, head, body) = server.raw("GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(status, 200);
    assert!(head.contains("Content-Type: text/html"));
    assert_eq!(body, b"<h1>Lot</h1>");

    let (status, _, _) = server
        .raw("GET /../Cargo.toml HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await;
    assert_eq!(status, 404);

    server.stop().await;
}

#[tokio::test]
async fn concurrent_clients_get_distinct_spots() {
    let server = Arc::new(TestServer::start(20, ServerConfig::default()).await);

    let mut tasks = Vec::new();
    for i in 0..20 {
        let server = Arc::clone(&server);
        tasks.push(tokio::spawn(async move {
            let json = format!(r#"{{"license_plate":"CAR{i}"}}"#);
            let (_, body) = server.post("/api/park", &json).await;
            body["data"]["spot_number"].as_u64().unwrap()
        }));
    }

    let mut spots = Vec::new();
    for task in tasks {
        spots.push(task.await.unwrap());
    }
    spots.sort_unstable();
    assert_eq!(spots, (1..=20).collect::<Vec<u64>>());

    let (_, status) = server.get("/api/status").await;
    assert_eq!(status["available_spots"], 0);

    let server = Arc::try_unwrap(server).ok().unwrap();
    server.stop().await;
}

#[tokio::test]
async fn silent_client_times_out() {
    let config = ServerConfig::default().with_request_timeout(Duration::from_millis(150));
    let server = TestServer::start(1, config).await;

    let mut stream = server.connect().await;
    let (status, head, body) = read_response(&mut stream).await;
    assert_eq!(status, 408);
    assert!(head.contains("Access-Control-Allow-Origin: *"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], false);

    server.stop().await;
}

#[tokio::test]
async fn connection_cap_refuses_extra_clients() {
    let config = ServerConfig::default()
        .with_max_connections(1)
        .with_request_timeout(Duration::from_secs(5));
    let server = TestServer::start(1, config).await;

    // Holds the only permit until it sends its request.
    let mut held = server.connect().await;

    let mut extra = server.connect().await;
    let (status, head, body) = read_response(&mut extra).await;
    assert_eq!(status, 503);
    assert!(head.contains("Access-Control-Allow-Origin: *"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server busy, try again");

    held.write_all(b"GET /api/status HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    let (status, _, body) = read_response(&mut held).await;
    assert_eq!(status, 200);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total_spots"], 1);

    server.stop().await;
}

#[tokio::test]
async fn oversize_body_is_rejected_with_cors() {
    let config = ServerConfig::default().with_max_body_bytes(16);
    let server = TestServer::start(1, config).await;

    // Head only; the body is never sent because the declared length is refused up front.
    let (status, head, body) = server
        .raw("POST /api/park HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 4096\r\n\r\n")
        .await;
    assert_eq!(status, 413);
    assert!(head.contains("Access-Control-Allow-Origin: *"));
    assert!(head.contains("Connection: close"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(server.tracker.status().occupied_spots, 0);

    server.stop().await;
}
