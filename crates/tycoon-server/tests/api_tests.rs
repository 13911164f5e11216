//! Integration tests for the HTTP endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, with a manual clock and scripted randomness so
//! every response is deterministic.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeDelta};
use serde_json::Value;
use tower::ServiceExt;
use tycoon_core::clock::ManualClock;
use tycoon_core::config::TycoonConfig;
use tycoon_core::random::ScriptedRandom;
use tycoon_core::Engine;
use tycoon_server::router::build_router;
use tycoon_server::state::AppState;
use tycoon_types::Suspect;

fn make_test_state(rng: ScriptedRandom) -> (Arc<AppState>, ManualClock) {
    let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    let engine = Engine::new(
        TycoonConfig::default(),
        Box::new(clock.clone()),
        Box::new(rng),
    );
    (Arc::new(AppState::new(engine)), clock)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_get_state_returns_starting_world() {
    let (state, _clock) = make_test_state(ScriptedRandom::new());
    let router = build_router(state);

    let (status, json) = send(&router, Request::get("/state").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["money"], 100);
    assert_eq!(json["reputation"], 0);
    assert_eq!(json["spy_active"], false);
    assert!(json["internal_suspect"].is_null());
}

#[tokio::test]
async fn test_get_state_accrues_elapsed_income() {
    let (state, clock) = make_test_state(ScriptedRandom::new());
    state.engine.lock().await.state_mut().auto_level = 2;
    let router = build_router(state);

    clock.advance(TimeDelta::seconds(35));
    let (_, json) = send(&router, Request::get("/state").body(Body::empty()).unwrap()).await;

    assert_eq!(json["money"], 160);
}

#[tokio::test]
async fn test_work_action_returns_updated_state() {
    let (state, _clock) = make_test_state(ScriptedRandom::new().with_draws([30]));
    let router = build_router(state);

    let (status, json) = send(
        &router,
        post_json("/action", &serde_json::json!({ "action": "work" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["money"], 130);
    assert_eq!(json["rep_exp"], 2);
    assert_eq!(json["logs"][0], "Work income +30");
}

#[tokio::test]
async fn test_unaffordable_action_is_ok_and_unchanged() {
    let (state, _clock) = make_test_state(ScriptedRandom::new());
    let router = build_router(state);

    let (status, json) = send(
        &router,
        post_json("/action", &serde_json::json!({ "action": "hire_security" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["money"], 100);
    assert_eq!(json["security"], 0);
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let (state, _clock) = make_test_state(ScriptedRandom::new());
    let router = build_router(Arc::clone(&state));

    let (status, json) = send(
        &router,
        post_json("/action", &serde_json::json!({ "action": "embezzle" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["error"], "unknown action: embezzle");
    assert!(state.engine.lock().await.state().logs.is_empty());
}

#[tokio::test]
async fn test_suspect_without_spy() {
    let (state, _clock) = make_test_state(ScriptedRandom::new());
    let router = build_router(state);

    let (status, json) = send(
        &router,
        post_json("/suspect", &serde_json::json!({ "guess": "Employee A" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "no_active_threat");
    assert_eq!(json["result"], "There is no spy to accuse!");
    assert_eq!(json["money"], 100);
}

#[tokio::test]
async fn test_suspect_wrong_then_right() {
    let (state, _clock) = make_test_state(ScriptedRandom::new());
    {
        let mut engine = state.engine.lock().await;
        let world = engine.state_mut();
        world.money = 1000;
        world.reputation = 2;
        // Security 3 caps mitigation at half, so the level-0 spy takes 2.5%.
        world.security = 3;
        world.spy_active = true;
        world.internal_suspect = Some(Suspect::EmployeeA);
    }
    let router = build_router(state);

    // Catch-up damage: floor(1000 * 0.025) = 25, reputation 2 -> 1.
    // Penalty: floor(975 * 0.15) = 146, reputation 1 -> 0.
    let (_, json) = send(
        &router,
        post_json("/suspect", &serde_json::json!({ "guess": "Employee C" })),
    )
    .await;
    assert_eq!(json["outcome"], "wrong");
    assert_eq!(json["money"], 829);
    assert_eq!(json["reputation"], 0);

    // Catch-up damage: floor(829 * 0.025) = 20.
    let (_, json) = send(
        &router,
        post_json("/suspect", &serde_json::json!({ "guess": "employee_a" })),
    )
    .await;
    assert_eq!(json["outcome"], "correct");
    assert_eq!(json["money"], 809);

    let (_, json) = send(&router, Request::get("/state").body(Body::empty()).unwrap()).await;
    assert_eq!(json["spy_active"], false);
    assert!(json["internal_suspect"].is_null());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (state, _clock) = make_test_state(ScriptedRandom::new());
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
