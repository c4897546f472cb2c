//! Realtime fan-out integration tests.

mod fixtures;

use std::time::Duration;

use chathub_server::control::SupervisorExit;
use fixtures::{TestServer, connect, create_room, expect_closed, recv_containing, stays_silent};
use futures_util::SinkExt;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

fn frame(content: &str) -> Message {
    Message::text(serde_json::json!({ "content": content }).to_string())
}

#[tokio::test]
async fn test_invalid_room_id_is_rejected_with_400() {
    // テスト項目: 不正な roomId では upgrade されず 400 が返る
    // given (前提条件):
    let server = TestServer::start().await;

    for room_id in ["abc", "0", "-1", "", "%201", "1%20"] {
        // when (操作):
        let result = tokio_tungstenite::connect_async(server.ws_url(room_id)).await;

        // then (期待する結果):
        match result {
            Err(WsError::Http(response)) => assert_eq!(response.status(), 400),
            Err(other) => panic!("roomId={room_id:?}: expected HTTP 400, got {other}"),
            Ok(_) => panic!("roomId={room_id:?}: upgrade unexpectedly accepted"),
        }
    }
}

#[tokio::test]
async fn test_broadcast_reaches_every_subscriber_of_the_room() {
    // テスト項目: 同じ room の全接続（送信者を含む）にメッセージが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = create_room(&server, "fanout").await;
    let mut clients = Vec::new();
    for i in 0..3 {
        let mut ws = connect(&server, room_id).await;
        // 自分の ready が返ってきた時点で購読済み
        ws.send(frame(&format!("ready-{i}"))).await.unwrap();
        assert!(recv_containing(&mut ws, &format!("ready-{i}")).await);
        clients.push(ws);
    }

    // when (操作):
    clients[0].send(frame("hello-all")).await.unwrap();

    // then (期待する結果):
    for ws in clients.iter_mut() {
        assert!(recv_containing(ws, "hello-all").await);
    }
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: room R への投稿は room S の購読者に届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let room_r = create_room(&server, "room-r").await;
    let room_s = create_room(&server, "room-s").await;
    let mut in_s = connect(&server, room_s).await;
    in_s.send(frame("s-ready")).await.unwrap();
    assert!(recv_containing(&mut in_s, "s-ready").await);
    let mut in_r = connect(&server, room_r).await;

    // when (操作):
    in_r.send(frame("only-for-r")).await.unwrap();

    // then (期待する結果):
    assert!(recv_containing(&mut in_r, "only-for-r").await);
    assert!(stays_silent(&mut in_s, Duration::from_millis(300)).await);
}

#[tokio::test]
async fn test_undecodable_frame_closes_session() {
    // テスト項目: JSON として解釈できないフレームを送るとセッションが閉じられる
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = create_room(&server, "strict").await;
    let mut ws = connect(&server, room_id).await;

    // when (操作):
    ws.send(Message::text("not json")).await.unwrap();

    // then (期待する結果):
    assert!(expect_closed(&mut ws).await);
}

#[tokio::test]
async fn test_rejected_content_keeps_session_open() {
    // テスト項目: 空の content・存在しない room への保存失敗はフレームを捨てるだけで接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = create_room(&server, "lenient").await;
    let mut ws = connect(&server, room_id).await;
    let mut orphan = connect(&server, 999).await;

    // when (操作):
    ws.send(frame("")).await.unwrap();
    ws.send(frame("after-empty")).await.unwrap();
    orphan.send(frame("nowhere")).await.unwrap();
    orphan.send(Message::Ping(Vec::new().into())).await.unwrap();

    // then (期待する結果):
    assert!(recv_containing(&mut ws, "after-empty").await);
    assert!(stays_silent(&mut orphan, Duration::from_millis(300)).await);
}

#[tokio::test]
async fn test_shutdown_closes_live_sessions() {
    // テスト項目: 停止要求で live セッションが閉じられ、supervisor は Stopped で終了する
    // given (前提条件):
    let server = TestServer::start().await;
    let room_id = create_room(&server, "draining").await;
    let mut ws = connect(&server, room_id).await;
    ws.send(frame("before-stop")).await.unwrap();
    assert!(recv_containing(&mut ws, "before-stop").await);

    // when (操作):
    server.control().request_stop();

    // then (期待する結果):
    assert!(expect_closed(&mut ws).await);
    assert_eq!(server.exit().await.unwrap(), SupervisorExit::Stopped);
}
