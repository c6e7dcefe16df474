//! WebSocket relay integration tests.
//!
//! Drives the real server with several peers and checks who receives what.

mod fixtures;
use std::time::Duration;

use fixtures::{TestClient, TestServer};
use serde_json::json;

const SILENCE: Duration = Duration::from_millis(300);

#[tokio::test]
async fn test_join_then_sync_code_to_late_joiner() {
    // テスト項目: alice, bob の順に参加 → 両者に同じ joined、alice の sync-code が bob にだけ届く
    // given (前提条件):
    let server = TestServer::start(19280);
    let mut alice = TestClient::connect(&server.ws_url()).await;
    let mut bob = TestClient::connect(&server.ws_url()).await;

    // when (操作): alice が参加
    alice.join("r1", "alice").await;

    // then (期待する結果): alice 自身にだけ joined が届く
    let joined = alice.recv().await;
    assert_eq!(joined["type"], "joined");
    assert_eq!(
        joined["clients"],
        json!([{"connection_id": alice.connection_id.clone(), "username": "alice"}])
    );

    // when (操作): bob が参加
    bob.join("r1", "bob").await;

    // then (期待する結果): 両者に [alice, bob] と username = bob
    let bob_id = bob.connection_id.clone();
    let expected_clients = json!([
        {"connection_id": alice.connection_id.clone(), "username": "alice"},
        {"connection_id": bob.connection_id.clone(), "username": "bob"},
    ]);
    for peer in [&mut alice, &mut bob] {
        let joined = peer.recv().await;
        assert_eq!(joined["type"], "joined");
        assert_eq!(joined["clients"], expected_clients);
        assert_eq!(joined["username"], "bob");
        assert_eq!(joined["connection_id"], bob_id.as_str());
    }

    // when (操作): alice が bob に現在のドキュメントを同期
    alice
        .send(json!({
            "type": "sync-code",
            "connection_id": bob_id,
            "code": "console.log('hi');",
        }))
        .await;

    // then (期待する結果): bob は code-change として受け取り、alice には何も届かない
    let synced = bob.recv().await;
    assert_eq!(synced, json!({"type": "code-change", "code": "console.log('hi');"}));
    assert!(alice.try_recv(SILENCE).await.is_none());
}

#[tokio::test]
async fn test_code_change_reaches_peers_but_not_sender() {
    // テスト項目: code-change は同じルームの他メンバー全員に届き、送信者と別ルームには届かない
    // given (前提条件):
    let server = TestServer::start(19281);
    let mut alice = TestClient::connect(&server.ws_url()).await;
    let mut bob = TestClient::connect(&server.ws_url()).await;
    let mut carol = TestClient::connect(&server.ws_url()).await;
    let mut dave = TestClient::connect(&server.ws_url()).await;
    alice.join("r1", "alice").await;
    alice.recv().await;
    bob.join("r1", "bob").await;
    alice.recv().await;
    bob.recv().await;
    carol.join("r1", "carol").await;
    alice.recv().await;
    bob.recv().await;
    carol.recv().await;
    dave.join("r2", "dave").await;
    dave.recv().await;

    // when (操作):
    alice
        .send(json!({"type": "code-change", "room_id": "r1", "code": "let a = 1;"}))
        .await;

    // then (期待する結果):
    let expected = json!({"type": "code-change", "code": "let a = 1;"});
    assert_eq!(bob.recv().await, expected);
    assert_eq!(carol.recv().await, expected);
    assert!(alice.try_recv(SILENCE).await.is_none());
    assert!(dave.try_recv(SILENCE).await.is_none());
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_member_once() {
    // テスト項目: alice が切断すると bob に disconnected が1回だけ届き、ルームには bob だけが残る
    // given (前提条件):
    let server = TestServer::start(19282);
    let mut alice = TestClient::connect(&server.ws_url()).await;
    let mut bob = TestClient::connect(&server.ws_url()).await;
    alice.join("r1", "alice").await;
    alice.recv().await;
    bob.join("r1", "bob").await;
    alice.recv().await;
    bob.recv().await;
    let alice_id = alice.connection_id.clone();

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    let left = bob.recv().await;
    assert_eq!(
        left,
        json!({"type": "disconnected", "connection_id": alice_id, "username": "alice"})
    );
    assert!(bob.try_recv(SILENCE).await.is_none());

    let detail: serde_json::Value = reqwest::get(format!("{}/api/rooms/r1", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let members = detail["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["connection_id"], bob.connection_id.as_str());
}

#[tokio::test]
async fn test_join_with_empty_fields_reports_error_and_keeps_connection() {
    // テスト項目: 空の username / room_id の join は error イベントになり、接続は維持される
    // given (前提条件):
    let server = TestServer::start(19283);
    let mut alice = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    alice.join("r1", "").await;
    let first = alice.recv().await;
    alice.send(json!({"type": "join", "username": "alice"})).await;
    let second = alice.recv().await;

    // then (期待する結果):
    for error in [first, second] {
        assert_eq!(
            error,
            json!({"type": "error", "message": "Room ID and username are required"})
        );
    }
    let rooms: serde_json::Value = reqwest::get(format!("{}/api/rooms", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(rooms, json!([]));

    // 接続は維持されていて、正しい join は成功する
    alice.join("r1", "alice").await;
    assert_eq!(alice.recv().await["type"], "joined");
}

#[tokio::test]
async fn test_malformed_frame_reports_error() {
    // テスト項目: 解析できないフレームや未知のイベントは error イベントになる
    // given (前提条件):
    let server = TestServer::start(19284);
    let mut alice = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    alice.send_raw("not json").await;
    let malformed = alice.recv().await;
    alice.send(json!({"type": "leave", "room_id": "r1"})).await;
    let unknown = alice.recv().await;

    // then (期待する結果):
    assert_eq!(malformed["type"], "error");
    assert!(
        malformed["message"]
            .as_str()
            .unwrap()
            .starts_with("Malformed event")
    );
    assert_eq!(unknown["type"], "error");
}

#[tokio::test]
async fn test_code_change_to_room_not_joined_is_rejected() {
    // テスト項目: 参加していないルームへの code-change は error になり、中継されない
    // given (前提条件):
    let server = TestServer::start(19285);
    let mut alice = TestClient::connect(&server.ws_url()).await;
    let mut bob = TestClient::connect(&server.ws_url()).await;
    bob.join("r1", "bob").await;
    bob.recv().await;

    // when (操作):
    alice
        .send(json!({"type": "code-change", "room_id": "r1", "code": "x"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        alice.recv().await,
        json!({"type": "error", "message": "Not a member of room 'r1'"})
    );
    assert!(bob.try_recv(SILENCE).await.is_none());
}

#[tokio::test]
async fn test_silent_connection_is_dropped_after_ping_timeout() {
    // テスト項目: ping に応答しない接続はタイムアウト後に切断され、他のメンバーに通知される
    // given (前提条件):
    let server = TestServer::start_with_args(
        19286,
        &["--ping-interval-ms", "100", "--ping-timeout-ms", "500"],
    );
    let mut alice = TestClient::connect(&server.ws_url()).await;
    let mut bob = TestClient::connect(&server.ws_url()).await;
    alice.join("r1", "alice").await;
    alice.recv().await;
    bob.join("r1", "bob").await;
    alice.recv().await;
    bob.recv().await;
    let bob_id = bob.connection_id.clone();

    // when (操作): bob はフレームを読まない（pong を返さない）まま放置、alice は読み続ける
    let left = alice.try_recv(Duration::from_secs(5)).await;

    // then (期待する結果):
    let left = left.expect("alice should be told that bob left");
    assert_eq!(left["type"], "disconnected");
    assert_eq!(left["connection_id"], bob_id.as_str());
    assert_eq!(left["username"], "bob");
    drop(bob);
}
