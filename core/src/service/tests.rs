//! Service tests against a local websocket peer

use std::time::Duration;

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use relink_act_types::{CombatData, MeterConfig};

use super::*;

const AREA: &str = r#"{"type":"enter_area","time_ms":0}"#;
const HIT: &str = r#"{"type":"damage","time_ms":1000,"data":{"action_id":7,"damage":100,"flags":0,"source":["Pl1000",1,5,0],"target":["Em2000",99,1,-1]}}"#;
const WAIT: Duration = Duration::from_secs(5);

async fn local_listener() -> (TcpListener, MeterConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = MeterConfig {
        host: "127.0.0.1".to_string(),
        port,
        update_interval_ms: 0,
        reconnect_delay_ms: 50,
        ..MeterConfig::default()
    };
    (listener, config)
}

fn spawn_service(config: MeterConfig) -> (MeterHandle, tokio::task::JoinHandle<()>) {
    let (service, handle) = MeterService::new(config);
    (handle, tokio::spawn(service.run()))
}

#[tokio::test]
async fn test_snapshots_follow_socket_payloads() {
    let (listener, config) = local_listener().await;
    let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(WsMessage::Text(AREA.to_string())).await.unwrap();
        ws.send(WsMessage::Text("{broken".to_string())).await.unwrap();
        ws.send(WsMessage::Text(HIT.to_string())).await.unwrap();
        // Hold the connection open until the test is done
        done_rx.recv().await;
    });

    let (handle, task) = spawn_service(config);
    let (snap_tx, mut snap_rx) = mpsc::unbounded_channel::<CombatData>();
    handle
        .on(move |data: &CombatData| {
            snap_tx.send(data.clone())?;
            Ok(())
        })
        .await
        .unwrap();

    let snapshot = timeout(WAIT, snap_rx.recv()).await.unwrap().unwrap();
    assert_eq!(snapshot.title, "#1");
    assert_eq!(snapshot.party_damage, 100);

    let current = handle.current_combat().await.unwrap().unwrap();
    assert_eq!(current.party_damage, 100);

    handle.shutdown().await.unwrap();
    timeout(WAIT, task).await.unwrap().unwrap();
    drop(done_tx);
}

#[tokio::test]
async fn test_reconnects_after_close() {
    let (listener, config) = local_listener().await;
    let (accepted_tx, mut accepted_rx) = mpsc::unbounded_channel::<usize>();
    tokio::spawn(async move {
        for n in 1..=2 {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();
            accepted_tx.send(n).unwrap();
            if n == 1 {
                ws.close(None).await.unwrap();
            } else {
                std::future::pending::<()>().await;
            }
        }
    });

    let (handle, task) = spawn_service(config);
    assert_eq!(timeout(WAIT, accepted_rx.recv()).await.unwrap(), Some(1));
    assert_eq!(timeout(WAIT, accepted_rx.recv()).await.unwrap(), Some(2));

    handle.shutdown().await.unwrap();
    timeout(WAIT, task).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_while_reconnect_pending() {
    let (listener, mut config) = local_listener().await;
    // Nobody listens on the port any more
    drop(listener);
    config.reconnect_delay_ms = 60_000;

    let (handle, task) = spawn_service(config);
    assert!(handle.current_combat().await.unwrap().is_none());

    handle.shutdown().await.unwrap();
    timeout(WAIT, task).await.unwrap().unwrap();

    assert!(!handle.is_running());
    assert!(matches!(
        handle.current_combat().await,
        Err(ServiceError::Stopped)
    ));
}

#[tokio::test]
async fn test_unsubscribe_reports_registration() {
    let (_listener, config) = local_listener().await;
    let (handle, task) = spawn_service(config);

    let registered = handle.on(|_: &CombatData| Ok(())).await.unwrap();
    assert!(handle.unsubscribe(MessageKind::CombatData, &registered).await.unwrap());
    assert!(!handle.unsubscribe(MessageKind::CombatData, &registered).await.unwrap());

    handle.shutdown().await.unwrap();
    timeout(WAIT, task).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_dropping_all_handles_stops_service() {
    let (_listener, config) = local_listener().await;
    let (handle, task) = spawn_service(config);
    drop(handle);
    timeout(WAIT, task).await.unwrap().unwrap();
}
