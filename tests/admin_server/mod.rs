use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use seatwatch::admin;
use seatwatch::MemStore;
use serde_json::json;
use serde_json::Value;
use tokio::sync::watch;

use crate::common::available_port;
use crate::common::snapshot;
use crate::common::start_engine;
use crate::common::test_config;
use crate::common::FetchStep;

async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("admin server did not come up on {addr}");
}

#[tokio::test]
async fn test_admin_server_round_trip_and_graceful_shutdown() {
    let ctx = start_engine(
        test_config(),
        Arc::new(MemStore::new()),
        FetchStep::Snapshot(snapshot(&[("31452", 0)])),
    );
    let addr: SocketAddr = ([127, 0, 0, 1], available_port()).into();
    let (graceful_tx, graceful_rx) = watch::channel(());
    let server = tokio::spawn(admin::start_server(addr, ctx.engine.clone(), graceful_rx));
    wait_until_listening(addr).await;

    let client = reqwest::Client::new();
    let created = client
        .post(format!("http://{addr}/watches"))
        .json(&json!({"name": "Emmy", "email": "emmy@example.com", "phone": "555-0199", "key": "31452"}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let health: Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"watches": 1, "keys": 1, "active_pollers": 1}));

    let metrics = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("seatwatch_active_pollers"));

    graceful_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server stops after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());

    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_admin_server_reports_bind_failure() {
    let ctx = start_engine(
        test_config(),
        Arc::new(MemStore::new()),
        FetchStep::Snapshot(snapshot(&[("31452", 0)])),
    );
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = occupied.local_addr().unwrap();
    let (_graceful_tx, graceful_rx) = watch::channel(());

    let result = admin::start_server(addr, ctx.engine.clone(), graceful_rx).await;

    assert!(matches!(result, Err(seatwatch::Error::Fatal(_))));
}
