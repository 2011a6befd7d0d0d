use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use swatch_vision::core_modules::collaborators::encode_png;
use swatch_vision::core_modules::pixel::pixel::Pixel;
use swatch_vision::{FrameColorExtractor, RasterBuffer};
use swatch_vision_server::api::{LatestColorResponse, Message};
use swatch_vision_server::{
    AppState, ColorStore, MemoryColorStore, NewColorRecord, RunningServer, StoreError,
    StoredColorRecord, start_server,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

struct FailingStore;

impl ColorStore for FailingStore {
    fn save(&self, _record: NewColorRecord) -> Result<StoredColorRecord, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn fetch_latest(&self) -> Result<Option<StoredColorRecord>, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

async fn spawn(store: Arc<dyn ColorStore>) -> RunningServer {
    let state = AppState::new(store, FrameColorExtractor::default());
    start_server("127.0.0.1:0", state).await.unwrap()
}

/// Minimal HTTP/1.1 exchange; returns the status code and the raw body.
async fn send(addr: SocketAddr, method: &str, path: &str, content_type: &str, body: &[u8]) -> (u16, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.write_all(body).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();

    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header terminator");
    let head = String::from_utf8_lossy(&response[..split]).to_string();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("status line");
    (status, response[split + 4..].to_vec())
}

async fn send_json(addr: SocketAddr, method: &str, path: &str, body: &Value) -> (u16, Value) {
    let (status, bytes) = send(addr, method, path, "application/json", body.to_string().as_bytes()).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn color_body(hex: &str, (r, g, b): (i64, i64, i64), lightness: f64) -> Value {
    json!({
        "hex": hex,
        "rgb": { "r": r, "g": g, "b": b },
        "hsl": { "hue": 0.0, "saturation": 1.0, "lightness": lightness }
    })
}

#[tokio::test]
async fn latest_color_tracks_the_most_recent_save() {
    let server = spawn(Arc::new(MemoryColorStore::new())).await;
    let addr = server.local_addr;

    let (status, body) = send_json(addr, "GET", "/api/getColor", &Value::Null).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No color data found");

    let (status, body) =
        send_json(addr, "POST", "/api/colors", &color_body("#ff0000", (255, 0, 0), 0.5)).await;
    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_value::<Message>(body).unwrap(),
        Message::new("Color saved successfully")
    );

    let (status, body) = send_json(addr, "GET", "/api/getColor", &Value::Null).await;
    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_value::<LatestColorResponse>(body).unwrap(),
        LatestColorResponse {
            red: 255,
            green: 0,
            blue: 0,
            lightness: 0.5
        }
    );

    let mut second = color_body("#800000", (128, 0, 0), 0.25098039215686274);
    second["uuid"] = json!("client-id");
    let (status, _) = send_json(addr, "POST", "/api/colors", &second).await;
    assert_eq!(status, 200);

    let (_, body) = send_json(addr, "GET", "/api/getColor", &Value::Null).await;
    assert_eq!(body["red"], 128);
    assert_eq!(body["lightness"], 0.25098039215686274);

    server.shutdown().await;
}

#[tokio::test]
async fn wrong_verbs_get_method_not_allowed() {
    let server = spawn(Arc::new(MemoryColorStore::new())).await;
    let addr = server.local_addr;

    for (method, path) in [
        ("GET", "/api/colors"),
        ("DELETE", "/api/colors"),
        ("POST", "/api/getColor"),
        ("PUT", "/api/getColor"),
        ("GET", "/api/extract"),
    ] {
        let (status, body) = send_json(addr, method, path, &Value::Null).await;
        assert_eq!(status, 405, "{method} {path}");
        assert_eq!(body["message"], "Method Not Allowed", "{method} {path}");
    }

    server.shutdown().await;
}

#[tokio::test]
async fn malformed_and_invalid_bodies_are_rejected() {
    let store = Arc::new(MemoryColorStore::new());
    let server = spawn(store.clone()).await;
    let addr = server.local_addr;

    let missing_hsl = json!({ "hex": "#ff0000", "rgb": { "r": 255, "g": 0, "b": 0 } });
    let (status, _) = send_json(addr, "POST", "/api/colors", &missing_hsl).await;
    assert_eq!(status, 400);

    let (status, _) = send(addr, "POST", "/api/colors", "application/json", b"{not json").await;
    assert_eq!(status, 400);

    let (status, _) =
        send_json(addr, "POST", "/api/colors", &color_body("#ff0000", (300, 0, 0), 0.5)).await;
    assert_eq!(status, 422);

    let (status, body) =
        send_json(addr, "POST", "/api/colors", &color_body("#00ff00", (255, 0, 0), 0.5)).await;
    assert_eq!(status, 422);
    assert!(body["message"].as_str().unwrap().contains("does not match"));

    let (status, _) =
        send_json(addr, "POST", "/api/colors", &color_body("#ff0000", (255, 0, 0), 1.5)).await;
    assert_eq!(status, 422);

    let mut wrong_hsl = color_body("#ff0000", (255, 0, 0), 0.9);
    wrong_hsl["hsl"]["hue"] = json!(200.0);
    let (status, body) = send_json(addr, "POST", "/api/colors", &wrong_hsl).await;
    assert_eq!(status, 422);
    assert!(body["message"].as_str().unwrap().contains("hsl"));

    assert!(store.is_empty());
    server.shutdown().await;
}

#[tokio::test]
async fn storage_failures_are_server_errors() {
    let server = spawn(Arc::new(FailingStore)).await;
    let addr = server.local_addr;

    let (status, body) =
        send_json(addr, "POST", "/api/colors", &color_body("#ff0000", (255, 0, 0), 0.5)).await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Error saving color");

    let (status, body) = send_json(addr, "GET", "/api/getColor", &Value::Null).await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Error fetching color");

    server.shutdown().await;
}

#[tokio::test]
async fn extract_returns_six_samples() {
    let server = spawn(Arc::new(MemoryColorStore::new())).await;
    let addr = server.local_addr;

    let frame = RasterBuffer::filled(600, 600, Pixel::opaque(0, 128, 255));
    let png = encode_png(&frame).unwrap();
    let (status, bytes) = send(addr, "POST", "/api/extract", "image/png", &png).await;
    assert_eq!(status, 200);
    let samples: Value = serde_json::from_slice(&bytes).unwrap();
    let samples = samples.as_array().unwrap();
    assert_eq!(samples.len(), 6);
    assert!(samples.iter().all(|s| s["hex"] == "#0080ff"));
    assert_eq!(samples[0]["rgb"]["b"], 255);

    let small = encode_png(&RasterBuffer::filled(40, 40, Pixel::opaque(0, 0, 0))).unwrap();
    let (status, _) = send(addr, "POST", "/api/extract", "image/png", &small).await;
    assert_eq!(status, 422);

    let (status, _) = send(addr, "POST", "/api/extract", "image/jpeg", b"garbage").await;
    assert_eq!(status, 422);

    server.shutdown().await;
}

#[tokio::test]
async fn health_check() {
    let server = spawn(Arc::new(MemoryColorStore::new())).await;
    let (status, body) = send(server.local_addr, "GET", "/healthz", "text/plain", b"").await;
    assert_eq!(status, 200);
    assert_eq!(body, b"ok");
    server.shutdown().await;
}
