//! # End-to-End Tests
//!
//! Real listeners on loopback, JSON files on disk, an HTTP client playing the
//! scanner and WebSocket clients playing the dashboards.

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Duration;

    use futures::{SinkExt, StreamExt};
    use pl_05_subscription_hub::HubConfig;
    use pl_07_api_gateway::{ApiGatewayService, GatewayConfig, RunningGateway};
    use serde_json::Value;
    use shared_types::TAG_MODIFIED;
    use tempfile::TempDir;
    use tokio::net::TcpStream;
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    use crate::integration::fixtures::{on_disk, ALICE, DEVICE};

    type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

    const WAIT: Duration = Duration::from_secs(5);

    async fn start(dir: &TempDir) -> RunningGateway {
        let node = on_disk(dir.path(), HubConfig::default());

        let mut config = GatewayConfig::default();
        config.device.expected_device_id = DEVICE.into();
        config.ingress.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.ingress.port = 0;
        config.websocket.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.websocket.port = 0;

        ApiGatewayService::new(config, node.ingestion, node.query, node.hub)
            .unwrap()
            .start()
            .await
            .unwrap()
    }

    async fn connect(addr: SocketAddr) -> Socket {
        let (socket, _) = connect_async(format!("ws://{addr}/")).await.unwrap();
        socket
    }

    async fn next_json(ws: &mut Socket) -> Value {
        loop {
            let message = timeout(WAIT, ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("socket closed")
                .unwrap();
            if let Message::Text(text) = message {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    async fn request(ws: &mut Socket, action: &str) -> Value {
        let body = format!(r#"{{"Action":"{action}"}}"#);
        ws.send(Message::Text(body.into())).await.unwrap();
        next_json(ws).await
    }

    async fn scan(addr: SocketAddr, device: Option<&str>, token: Option<&str>) -> (u16, String) {
        let mut request = reqwest::Client::new().get(format!("http://{addr}/"));
        if let Some(device) = device {
            request = request.header("chipid", device);
        }
        if let Some(token) = token {
            request = request.header("rfidtag", token);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.text().await.unwrap())
    }

    #[tokio::test]
    async fn test_scan_to_observer_round_trip() {
        let dir = TempDir::new().unwrap();
        let gateway = start(&dir).await;
        let mut ws = connect(gateway.ws_addr).await;

        // Answered once the observer is registered.
        let tags = request(&mut ws, "GetTags").await;
        assert_eq!(tags["Success"], true);
        assert_eq!(tags["Context"]["Action"], "GetTags");
        let tags = tags["Payload"].as_array().unwrap().clone();
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|t| t.get("CurrentDir").is_none()));

        assert_eq!(
            scan(gateway.ingress_addr, Some(DEVICE), Some(ALICE)).await,
            (200, String::new())
        );

        let pushed = next_json(&mut ws).await;
        assert_eq!(pushed["Success"], true);
        assert_eq!(pushed["Context"]["Action"], TAG_MODIFIED);
        assert_eq!(pushed["Payload"]["TagId"], 1);
        assert_eq!(pushed["Payload"]["Dir"], "IN");

        let entries = request(&mut ws, "GetEntries").await;
        assert_eq!(entries["Payload"].as_array().unwrap().len(), 1);
        assert_eq!(entries["Payload"][0], pushed["Payload"]);

        let tags = request(&mut ws, "GetTags").await;
        let alice = tags["Payload"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["Name"] == "Alice")
            .unwrap()
            .clone();
        assert_eq!(alice["CurrentDir"], pushed["Payload"]);

        // The log on disk holds the same event.
        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("entries.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk[0], pushed["Payload"]);

        gateway.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_scans_over_http() {
        let dir = TempDir::new().unwrap();
        let gateway = start(&dir).await;
        let addr = gateway.ingress_addr;

        assert_eq!(
            scan(addr, Some(DEVICE), Some("999999")).await,
            (404, "RfidTag is not registered".to_string())
        );
        assert_eq!(
            scan(addr, Some(DEVICE), None).await,
            (401, "Unauthorized".to_string())
        );
        assert_eq!(
            scan(addr, Some("000000"), Some(ALICE)).await,
            (401, "Unauthorized".to_string())
        );
        assert_eq!(
            scan(addr, None, Some(ALICE)).await,
            (401, "Unauthorized".to_string())
        );

        // Rejected before the log is read, so it was never even created.
        assert!(!dir.path().join("entries.json").exists());

        let mut ws = connect(gateway.ws_addr).await;
        let entries = request(&mut ws, "GetEntries").await;
        assert_eq!(entries["Payload"], serde_json::json!([]));
        let log: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("entries.json")).unwrap())
                .unwrap();
        assert_eq!(log, serde_json::json!([]));

        gateway.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_every_observer_sees_every_change() {
        let dir = TempDir::new().unwrap();
        let gateway = start(&dir).await;
        let mut first = connect(gateway.ws_addr).await;
        let mut second = connect(gateway.ws_addr).await;
        request(&mut first, "GetTags").await;
        request(&mut second, "GetTags").await;

        for _ in 0..2 {
            assert_eq!(scan(gateway.ingress_addr, Some(DEVICE), Some(ALICE)).await.0, 200);
        }

        for ws in [&mut first, &mut second] {
            let dirs = [next_json(ws).await, next_json(ws).await]
                .map(|f| f["Payload"]["Dir"].as_str().unwrap().to_string());
            assert_eq!(dirs, ["IN".to_string(), "OUT".to_string()]);
        }

        // A departed observer does not block the others.
        drop(first);
        assert_eq!(scan(gateway.ingress_addr, Some(DEVICE), Some(ALICE)).await.0, 200);
        assert_eq!(next_json(&mut second).await["Payload"]["Dir"], "IN");

        gateway.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_protocol_failures_keep_connection_open() {
        let dir = TempDir::new().unwrap();
        let gateway = start(&dir).await;
        let mut ws = connect(gateway.ws_addr).await;

        let unknown = request(&mut ws, "Explode").await;
        assert_eq!(unknown["Success"], false);
        assert_eq!(unknown["Context"]["Action"], "Explode");
        assert_eq!(unknown["Error"], "Action not found");

        ws.send(Message::Text("{oops".into())).await.unwrap();
        let malformed = next_json(&mut ws).await;
        assert_eq!(malformed["Success"], false);
        assert!(malformed["Error"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request"));

        // Still usable.
        assert_eq!(request(&mut ws, "GetEntries").await["Success"], true);

        gateway.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_observers() {
        let dir = TempDir::new().unwrap();
        let gateway = start(&dir).await;
        let mut ws = connect(gateway.ws_addr).await;
        request(&mut ws, "GetTags").await;

        gateway.shutdown().await.unwrap();

        // Close frame, error or end of stream; anything but a hang.
        loop {
            match timeout(WAIT, ws.next()).await.expect("observer left open") {
                Some(Ok(Message::Text(_))) => continue,
                _ => break,
            }
        }
    }
}
