// HTTP route tests through Rocket's local client

use greedy_snake::bot::Bot;
use greedy_snake::config::Config;
use greedy_snake::debug_logger::DebugLogger;
use greedy_snake::handler::{build_rocket, SERVER_HEADER};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};

fn client() -> Client {
    let mut config = Config::default_hardcoded();
    config.stats.enabled = false;
    let bot = Bot::new(config, DebugLogger::disabled());
    Client::tracked(build_rocket(bot)).expect("valid rocket instance")
}

fn game_state(turn: i32, head: (i32, i32), food: Vec<(i32, i32)>) -> Value {
    let you = json!({
        "id": "me",
        "name": "greedy",
        "health": 90,
        "body": [{"x": head.0, "y": head.1}],
        "head": {"x": head.0, "y": head.1},
        "length": 1,
        "latency": "0",
        "shout": ""
    });
    let food: Vec<Value> = food.iter().map(|(x, y)| json!({"x": x, "y": y})).collect();

    json!({
        "game": {"id": "http-game", "ruleset": {"name": "standard"}, "timeout": 500},
        "turn": turn,
        "board": {"height": 11, "width": 11, "food": food, "hazards": [], "snakes": [you.clone()]},
        "you": you
    })
}

#[test]
fn test_index_returns_appearance_and_server_header() {
    let client = client();
    let response = client.get("/").dispatch();

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("Server"), Some(SERVER_HEADER));
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body["apiversion"], "1");
}

#[test]
fn test_move_returns_direction_object() {
    let client = client();
    let response = client
        .post("/move")
        .header(ContentType::JSON)
        .body(game_state(3, (5, 5), vec![(5, 7), (8, 5)]).to_string())
        .dispatch();

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body, json!({"move": "up"}));
}

#[test]
fn test_malformed_move_is_rejected() {
    let client = client();
    let response = client
        .post("/move")
        .header(ContentType::JSON)
        .body(r#"{"turn": 1}"#)
        .dispatch();

    assert!(response.status().code >= 400);
}

#[test]
fn test_game_lifecycle_updates_stats() {
    let client = client();

    let start = client
        .post("/start")
        .header(ContentType::JSON)
        .body(game_state(0, (1, 1), vec![]).to_string())
        .dispatch();
    assert_eq!(start.status(), Status::Ok);

    let end = client
        .post("/end")
        .header(ContentType::JSON)
        .body(game_state(25, (2, 1), vec![]).to_string())
        .dispatch();
    assert_eq!(end.status(), Status::Ok);

    let stats: Value = client.get("/stats").dispatch().into_json().expect("json body");
    assert_eq!(stats["total_games"], 1);
    assert_eq!(stats["wins"], 1);
    assert_eq!(stats["active_games"], 0);
}
