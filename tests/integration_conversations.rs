mod common;

use common::{TestApp, participant_ids, run_id};
use serde_json::json;

#[tokio::test]
async fn test_create_direct_conversation() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;

    let convo = app.create_direct(&alice, &bob).await;

    assert_eq!(convo["conversationType"], "direct");
    assert_eq!(convo["displayName"], bob.username);
    let mut ids = participant_ids(&convo);
    ids.sort();
    let mut expected = vec![alice.user_id.to_string(), bob.user_id.to_string()];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_direct_requires_exactly_two_participants() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;
    let carol = app.create_user(&format!("carol_{run}")).await;

    let too_few = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({ "conversationType": "direct", "participants": [alice.user_id] }),
        )
        .await;
    assert_eq!(too_few.status(), 400);

    let too_many = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "direct",
                "participants": [alice.user_id, bob.user_id, carol.user_id],
            }),
        )
        .await;
    assert_eq!(too_many.status(), 400);
}

#[tokio::test]
async fn test_direct_rejects_duplicate_participant_ids() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;

    let resp = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "direct",
                "participants": [alice.user_id, alice.user_id],
            }),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_direct_requires_requester_as_participant() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;
    let carol = app.create_user(&format!("carol_{run}")).await;

    let resp = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "direct",
                "participants": [bob.user_id, carol.user_id],
            }),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_direct_conversation_deduplicated() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;

    app.create_direct(&alice, &bob).await;

    // Same pair again, and again with the order reversed from the peer's side.
    let repeat = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "direct",
                "participants": [alice.user_id, bob.user_id],
            }),
        )
        .await;
    assert_eq!(repeat.status(), 409);

    let reversed = app
        .post_json(
            &bob.token,
            "/v1/conversations",
            &json!({
                "conversationType": "direct",
                "participants": [bob.user_id, alice.user_id],
            }),
        )
        .await;
    assert_eq!(reversed.status(), 409);
}

#[tokio::test]
async fn test_concurrent_direct_creation_yields_single_conversation() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;

    let body = json!({
        "conversationType": "direct",
        "participants": [alice.user_id, bob.user_id],
    });

    let (first, second) = tokio::join!(
        app.post_json(&alice.token, "/v1/conversations", &body),
        app.post_json(&bob.token, "/v1/conversations", &body),
    );

    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 409], "exactly one create may win");

    let count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM conversations WHERE direct_key = $1",
    )
    .bind(confab_server::domain::conversation::direct_key(alice.user_id, bob.user_id))
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_create_group_includes_creator() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;
    let carol = app.create_user(&format!("carol_{run}")).await;

    // Creator omitted from the list on purpose.
    let convo = app.create_group(&alice, "Team", &[bob.user_id, carol.user_id]).await;

    assert_eq!(convo["conversationType"], "group");
    assert_eq!(convo["createdBy"], alice.user_id.to_string());
    assert_eq!(convo["displayName"], "Team");
    let ids = participant_ids(&convo);
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&alice.user_id.to_string()));
}

#[tokio::test]
async fn test_group_collapses_duplicate_members() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;

    let convo = app.create_group(&alice, "Duo", &[bob.user_id, bob.user_id, alice.user_id]).await;

    assert_eq!(participant_ids(&convo).len(), 2);
}

#[tokio::test]
async fn test_group_size_bounds_enforced() {
    let Some(app) = TestApp::try_spawn_with(|c| c.conversations.max_group_size = 3).await else {
        return;
    };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;
    let carol = app.create_user(&format!("carol_{run}")).await;
    let dave = app.create_user(&format!("dave_{run}")).await;

    // Just the creator is too small.
    let solo = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({ "conversationType": "group", "name": "Solo", "participants": [] }),
        )
        .await;
    assert_eq!(solo.status(), 400);

    // Four members exceeds the configured bound of three.
    let oversized = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "group",
                "name": "Crowd",
                "participants": [bob.user_id, carol.user_id, dave.user_id],
            }),
        )
        .await;
    assert_eq!(oversized.status(), 400);
}

#[tokio::test]
async fn test_group_rejects_unknown_members() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;

    let resp = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "group",
                "name": "Ghosts",
                "participants": [uuid::Uuid::new_v4()],
            }),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_unnamed_group_falls_back_display_name() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;

    let resp = app
        .post_json(
            &alice.token,
            "/v1/conversations",
            &json!({
                "conversationType": "group",
                "participants": [bob.user_id],
            }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let convo: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(convo["displayName"], "Unnamed Group");
}

#[tokio::test]
async fn test_listing_orders_by_recent_activity() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let run = run_id();

    let alice = app.create_user(&format!("alice_{run}")).await;
    let bob = app.create_user(&format!("bob_{run}")).await;
    let carol = app.create_user(&format!("carol_{run}")).await;

    let with_bob = app.create_direct(&alice, &bob).await;
    let with_carol = app.create_direct(&alice, &carol).await;

    // Activity in the older conversation moves it back to the front.
    app.send_message(&alice, with_bob["id"].as_str().unwrap(), "ping").await;

    let resp = app.get(&alice.token, "/v1/conversations").await;
    assert_eq!(resp.status(), 200);
    let listing: Vec<serde_json::Value> = resp.json().await.unwrap();

    let positions: Vec<&str> = listing.iter().map(|c| c["id"].as_str().unwrap()).collect();
    let bob_pos = positions.iter().position(|&id| id == with_bob["id"]).unwrap();
    let carol_pos = positions.iter().position(|&id| id == with_carol["id"]).unwrap();
    assert!(bob_pos < carol_pos, "recently active conversation must come first");
}

#[tokio::test]
async fn test_listing_requires_token() {
    let Some(app) = TestApp::try_spawn().await else { return };

    let resp = app.client.get(format!("{}/v1/conversations", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let garbage = app.get("not-a-token", "/v1/conversations").await;
    assert_eq!(garbage.status(), 401);
}
