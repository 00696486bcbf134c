//! End-to-end tests of the game core: authentication gate, routing, betting
//! and spinning, driven through the transport-agnostic `Handler` interface.

use axum::http::{header, Method, StatusCode};
use roulette_service::{
    api::{handlers::SharedSession, models::SpinResponse},
    config::UserEntry,
    games::{BetResult, Wheel, WheelVariant},
    GameRequest, GameResponse, Handler, RouletteConfig, RouletteFactory,
};
use serde_json::{json, Value};
use std::{sync::Arc, thread};

const USER: &str = "alice";
const PASSWORD: &str = "secret123";

/// First seed whose opening spin satisfies `label`
fn seed_landing_on(variant: WheelVariant, label: &str) -> u64 {
    (0..10_000)
        .find(|seed| Wheel::seeded(variant, *seed).spin().contains_key(label))
        .expect("some seed lands on the label")
}

fn game(seed: u64) -> (Arc<dyn Handler>, SharedSession) {
    let mut config = RouletteConfig::default();
    config.wheel.variant = WheelVariant::American;
    config.wheel.seed = Some(seed);
    config.auth.users = vec![UserEntry {
        username: USER.to_string(),
        password: PASSWORD.to_string(),
    }];
    RouletteFactory::create_service_with_session(&config).expect("valid config")
}

fn authed(method: Method, path: &str) -> GameRequest {
    GameRequest::new(method, path).with_basic_auth(USER, PASSWORD)
}

fn body(response: &GameResponse) -> Value {
    response.json_body().expect("json body")
}

fn player(service: &Arc<dyn Handler>) -> Value {
    let response = service.handle(authed(Method::GET, "/player/"));
    assert_eq!(response.status, StatusCode::OK);
    body(&response)
}

#[test]
fn alice_wins_ten_on_black() {
    let seed = seed_landing_on(WheelVariant::American, "Black");
    let (service, _) = game(seed);

    let placed = service.handle(
        authed(Method::POST, "/bet/").with_body(r#"{"bet":"Black","amount":10}"#),
    );
    assert_eq!(placed.status, StatusCode::OK);
    assert_eq!(body(&placed), json!({"Black": 10}));
    assert_eq!(body(&placed).as_object().unwrap().len(), 1);

    let spun = service.handle(authed(Method::POST, "/wheel/"));
    assert_eq!(spun.status, StatusCode::OK);
    let spin: SpinResponse = serde_json::from_slice(&spun.body).unwrap();

    assert_eq!(spin.spin.get("Black").map(|r| (r.0, r.1)), Some((1, 1)));
    assert_eq!(spin.payout.len(), 1);
    assert_eq!(spin.payout[0].label, "Black");
    assert_eq!(spin.payout[0].amount, 10.0);
    assert_eq!(spin.payout[0].result, BetResult::Win);
    assert_eq!(spin.stake, 110.0);
    assert_eq!(spin.rounds, 1);

    let raw = body(&spun);
    assert_eq!(raw["payout"], json!([["Black", 10, "win"]]));
    assert_eq!(raw["stake"], json!(110));
    assert_eq!(raw["spin"]["Black"], json!([1, 1]));

    let status = player(&service);
    assert_eq!(status["stake"].as_f64(), Some(110.0));
    assert_eq!(status["rounds"], 1);
}

#[test]
fn losing_bets_cost_their_amount() {
    let seed = seed_landing_on(WheelVariant::American, "Red");
    let (service, session) = game(seed);

    service.handle(authed(Method::POST, "/bet/").with_body(r#"{"bet":"Black","amount":10}"#));
    let spun = service.handle(authed(Method::POST, "/wheel/"));
    let spin: SpinResponse = serde_json::from_slice(&spun.body).unwrap();

    assert_eq!(spin.payout[0].result, BetResult::Lose);
    assert_eq!(spin.stake, 90.0);
    assert!(session.lock().unwrap().table.bets().is_empty());
}

#[test]
fn wheel_with_body_is_forbidden_and_not_counted() {
    let (service, _) = game(1);

    let response = service.handle(authed(Method::POST, "/wheel/").with_body("{}"));
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(body(&response)["error"]["details"], "{}");

    assert_eq!(player(&service)["rounds"], 0);
}

#[test]
fn missing_authorization_is_challenged() {
    let (service, _) = game(1);

    let response = service.handle(GameRequest::new(Method::GET, "/player/"));
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let challenge = response.headers.get(header::WWW_AUTHENTICATE).unwrap();
    assert!(challenge.to_str().unwrap().starts_with("Basic"));
}

#[test]
fn failed_logins_are_indistinguishable() {
    let (service, _) = game(1);

    let wrong_password =
        service.handle(GameRequest::new(Method::GET, "/player/").with_basic_auth(USER, "nope"));
    let unknown_user =
        service.handle(GameRequest::new(Method::GET, "/player/").with_basic_auth("mallory", PASSWORD));
    let sentinel =
        service.handle(GameRequest::new(Method::GET, "/player/").with_basic_auth("", "Doesn't matter"));

    for response in [&wrong_password, &unknown_user, &sentinel] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.headers.contains_key(header::WWW_AUTHENTICATE));
    }
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(unknown_user.body, sentinel.body);
}

#[test]
fn unauthenticated_requests_never_reach_the_table() {
    let (service, session) = game(1);

    let response = service.handle(
        GameRequest::new(Method::POST, "/bet/")
            .with_basic_auth(USER, "nope")
            .with_body(r#"{"bet":"Red","amount":5}"#),
    );
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(session.lock().unwrap().table.bets().is_empty());

    let response = service.handle(GameRequest::new(Method::POST, "/wheel/"));
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(session.lock().unwrap().rounds, 0);
}

#[test]
fn unknown_routes_and_methods() {
    let (service, _) = game(1);

    for path in ["/", "/players/", "/spin/", "/Bet/"] {
        let response = service.handle(authed(Method::GET, path));
        assert_eq!(response.status, StatusCode::NOT_FOUND, "path {}", path);
        assert_eq!(body(&response)["error"]["code"], "NOT_FOUND");
    }

    let cases = [
        (Method::POST, "/player/"),
        (Method::PUT, "/bet/"),
        (Method::GET, "/wheel/"),
        (Method::DELETE, "/wheel/"),
    ];
    for (method, path) in cases {
        let response = service.handle(authed(method.clone(), path));
        assert_eq!(
            response.status,
            StatusCode::METHOD_NOT_ALLOWED,
            "{} {}",
            method,
            path
        );
        assert!(response.headers.contains_key(header::ALLOW));
    }

    assert_eq!(player(&service)["rounds"], 0);
}

#[test]
fn bets_accumulate_across_requests_and_lists() {
    let (service, _) = game(1);

    service.handle(authed(Method::POST, "/bet/").with_body(r#"{"bet":"Red","amount":5}"#));
    let response = service.handle(authed(Method::POST, "/bet/").with_body(
        r#"[{"bet":"Red","amount":2.5},{"bet":"17","amount":1},{"bet":"Red","amount":2.5}]"#,
    ));
    assert_eq!(response.status, StatusCode::OK);

    let viewed = service.handle(authed(Method::GET, "/bet/"));
    let bets = body(&viewed);
    assert_eq!(bets["Red"].as_f64(), Some(10.0));
    assert_eq!(bets["17"].as_f64(), Some(1.0));
}

#[test]
fn malformed_bet_bodies_are_forbidden_and_echoed() {
    let (service, session) = game(1);

    let bodies = [
        "not json",
        r#"{"bet":"Red"}"#,
        r#"{"amount":5}"#,
        r#"{"bet":"Red","amount":0}"#,
        r#"{"bet":"Red","amount":-3}"#,
        r#"[{"bet":"Red","amount":5},{"bet":"Odd","amount":-1}]"#,
        "",
    ];
    for raw in bodies {
        let response = service.handle(authed(Method::POST, "/bet/").with_body(raw));
        assert_eq!(response.status, StatusCode::FORBIDDEN, "body {:?}", raw);
        let error = body(&response);
        assert_eq!(error["error"]["code"], "FORBIDDEN");
        assert_eq!(error["error"]["details"], raw);
    }

    assert!(session.lock().unwrap().table.bets().is_empty());
}

#[test]
fn delete_clears_bets_but_not_stake() {
    let (service, _) = game(1);

    service.handle(authed(Method::POST, "/bet/").with_body(r#"{"bet":"Hi","amount":40}"#));
    let cleared = service.handle(authed(Method::DELETE, "/bet/"));
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(body(&cleared), json!({}));

    let status = player(&service);
    assert_eq!(status["stake"].as_f64(), Some(100.0));
    assert_eq!(status["rounds"], 0);
}

#[test]
fn bets_on_labels_off_the_wheel_always_lose() {
    let (service, _) = game(3);

    service.handle(authed(Method::POST, "/bet/").with_body(r#"{"bet":"Purple","amount":7}"#));
    let spin: SpinResponse =
        serde_json::from_slice(&service.handle(authed(Method::POST, "/wheel/")).body).unwrap();
    assert_eq!(spin.payout[0].result, BetResult::Lose);
    assert_eq!(spin.stake, 93.0);
}

#[test]
fn stake_moves_by_the_payout_breakdown_every_round() {
    let (service, _) = game(99);
    let mut stake = 100.0;

    for round in 1..=50u64 {
        let placed = service.handle(authed(Method::POST, "/bet/").with_body(
            r#"[{"bet":"17","amount":1},{"bet":"Red","amount":2},{"bet":"Even","amount":3},{"bet":"00","amount":1}]"#,
        ));
        assert_eq!(placed.status, StatusCode::OK);

        let spin: SpinResponse =
            serde_json::from_slice(&service.handle(authed(Method::POST, "/wheel/")).body).unwrap();
        assert_eq!(spin.rounds, round);
        assert_eq!(spin.payout.len(), 4);

        // payout order is unspecified; only the aggregate matters
        for line in &spin.payout {
            match line.result {
                BetResult::Win => {
                    let ratio = spin.spin[&line.label];
                    stake += ratio.winnings(line.amount);
                }
                BetResult::Lose => {
                    assert!(!spin.spin.contains_key(&line.label));
                    stake -= line.amount;
                }
            }
        }
        assert!((spin.stake - stake).abs() < 1e-9);

        let open = body(&service.handle(authed(Method::GET, "/bet/")));
        assert_eq!(open, json!({}));
    }
}

#[test]
fn wheel_variant_is_picked_from_the_path() {
    let seed = 11;
    let (service, _) = game(seed);

    let european: SpinResponse =
        serde_json::from_slice(&service.handle(authed(Method::POST, "/wheel/eu/")).body).unwrap();
    assert_eq!(european.spin, Wheel::seeded(WheelVariant::European, seed).spin());

    let american: SpinResponse =
        serde_json::from_slice(&service.handle(authed(Method::POST, "/wheel/")).body).unwrap();
    assert_eq!(american.spin, Wheel::seeded(WheelVariant::American, seed).spin());

    // unknown selectors spin the configured wheel
    let fallback: SpinResponse =
        serde_json::from_slice(&service.handle(authed(Method::POST, "/wheel/zero/")).body).unwrap();
    let mut expected = Wheel::seeded(WheelVariant::American, seed);
    expected.spin();
    assert_eq!(fallback.spin, expected.spin());
    assert_eq!(fallback.rounds, 3);

    for _ in 0..200 {
        let spin: SpinResponse =
            serde_json::from_slice(&service.handle(authed(Method::POST, "/wheel/EU")).body).unwrap();
        assert!(!spin.spin.contains_key("00"));
    }
}

#[test]
fn concurrent_spin_cycles_are_atomic() {
    const THREADS: usize = 8;
    const ROUNDS_PER_THREAD: usize = 25;
    let (service, session) = game(5);

    let spins: Vec<SpinResponse> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                let service = service.clone();
                scope.spawn(move || {
                    let mut seen = Vec::new();
                    for _ in 0..ROUNDS_PER_THREAD {
                        let placed = service.handle(
                            authed(Method::POST, "/bet/")
                                .with_body(r#"[{"bet":"Red","amount":2},{"bet":"7","amount":1}]"#),
                        );
                        assert_eq!(placed.status, StatusCode::OK);
                        let spun = service.handle(authed(Method::POST, "/wheel/"));
                        assert_eq!(spun.status, StatusCode::OK);
                        seen.push(serde_json::from_slice::<SpinResponse>(&spun.body).unwrap());
                    }
                    seen
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    let total = (THREADS * ROUNDS_PER_THREAD) as u64;
    let mut rounds: Vec<u64> = spins.iter().map(|s| s.rounds).collect();
    rounds.sort_unstable();
    assert_eq!(rounds, (1..=total).collect::<Vec<_>>());

    // every bet is resolved exactly once, by whichever spin came next
    let mut stake = 100.0;
    let mut resolved = 0.0;
    for spin in &spins {
        for line in &spin.payout {
            resolved += line.amount;
            match line.result {
                BetResult::Win => stake += spin.spin[&line.label].winnings(line.amount),
                BetResult::Lose => stake -= line.amount,
            }
        }
    }
    assert_eq!(resolved, 3.0 * total as f64);

    let session = session.lock().unwrap();
    assert_eq!(session.rounds, total);
    assert!(session.table.bets().is_empty());
    assert!((session.table.stake() - stake).abs() < 1e-9);
    let last = spins.iter().max_by_key(|s| s.rounds).unwrap();
    assert_eq!(last.stake, session.table.stake());
}

#[test]
fn bets_that_would_overflow_the_stake_are_refused() {
    let (service, _) = game(1);

    let raw = r#"[{"bet":"Red","amount":1e308},{"bet":"Red","amount":1e308}]"#;
    let response = service.handle(authed(Method::POST, "/bet/").with_body(raw));
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(body(&response)["error"]["details"], raw);

    let response = service.handle(authed(Method::POST, "/bet/").with_body(r#"{"bet":"17","amount":1e307}"#));
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    assert_eq!(body(&service.handle(authed(Method::GET, "/bet/"))), json!({}));
    service.handle(authed(Method::POST, "/wheel/"));
    let status = player(&service);
    assert_eq!(status["stake"], json!(100));
    assert_eq!(status["rounds"], 1);
}
