// Bot lifecycle tests
//
// Drive the Bot through start -> move -> end the way the HTTP handlers do and
// check the JSON it answers with plus the statistics it keeps.

use greedy_snake::bot::Bot;
use greedy_snake::config::Config;
use greedy_snake::debug_logger::DebugLogger;
use greedy_snake::types::{Battlesnake, Board, Coord, Game, Ruleset};

fn test_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.stats.enabled = false;
    config
}

fn test_game(id: &str) -> Game {
    Game {
        id: id.to_string(),
        ruleset: Ruleset::default(),
        timeout: 500,
        map: "standard".to_string(),
        source: "test".to_string(),
    }
}

fn board_with(snakes: Vec<Battlesnake>, food: Vec<Coord>) -> Board {
    let mut board = Board::empty(11, 11);
    board.snakes = snakes;
    board.food = food;
    board
}

#[tokio::test]
async fn test_move_response_heads_for_food() {
    let bot = Bot::new(test_config(), DebugLogger::disabled());
    let you = Battlesnake::from_body("me", vec![Coord::new(5, 5), Coord::new(4, 5)]);
    let board = board_with(vec![you.clone()], vec![Coord::new(8, 5), Coord::new(5, 0)]);

    let response = bot.get_move(&test_game("g1"), &12, &board, &you).await;
    assert_eq!(response["move"], "right");
}

#[tokio::test]
async fn test_trapped_snake_answers_down() {
    let bot = Bot::new(test_config(), DebugLogger::disabled());
    let you = Battlesnake::from_body(
        "me",
        vec![Coord::new(0, 10), Coord::new(0, 9), Coord::new(1, 9), Coord::new(1, 10)],
    );
    let board = board_with(vec![you.clone()], vec![]);

    let response = bot.get_move(&test_game("g1"), &40, &board, &you).await;
    assert_eq!(response["move"], "down");
}

#[tokio::test]
async fn test_configured_seed_makes_random_moves_repeatable() {
    let mut config = test_config();
    config.decision.rng_seed = Some(2024);
    let bot = Bot::new(config, DebugLogger::disabled());

    let you = Battlesnake::from_body("me", vec![Coord::new(5, 5), Coord::new(5, 4)]);
    let board = board_with(vec![you.clone()], vec![]);
    let game = test_game("g1");

    for turn in 0..10 {
        let first = bot.get_move(&game, &turn, &board, &you).await;
        let second = bot.get_move(&game, &turn, &board, &you).await;
        assert_eq!(first, second);
        assert_ne!(first["move"], "down", "down is our own neck");
    }
}

#[tokio::test]
async fn test_zero_budget_never_answers_off_board() {
    let mut config = test_config();
    config.timing.response_time_budget_ms = 10;
    config.timing.network_overhead_ms = 10;
    let bot = Bot::new(config, DebugLogger::disabled());

    // On the bottom edge down leaves the board, whichever path answers
    let you = Battlesnake::from_body("me", vec![Coord::new(5, 0)]);
    let board = board_with(vec![you.clone()], vec![Coord::new(5, 9)]);

    let response = bot.get_move(&test_game("g1"), &1, &board, &you).await;
    assert_eq!(response["move"], "up");
}

#[tokio::test]
async fn test_end_records_win_and_food() {
    let bot = Bot::new(test_config(), DebugLogger::disabled());
    let game = test_game("g-win");

    let you = Battlesnake::from_body(
        "me",
        vec![Coord::new(1, 1), Coord::new(1, 2), Coord::new(1, 3)],
    );
    let enemy = Battlesnake::from_body("enemy", vec![Coord::new(8, 8)]);
    let opening = board_with(vec![you.clone(), enemy], vec![]);
    bot.start(&game, &0, &opening, &you);
    assert_eq!(bot.stats_summary()["active_games"], 1);
    bot.get_move(&game, &57, &opening, &you).await;

    let mut grown = you.clone();
    grown.body.extend([Coord::new(1, 4), Coord::new(1, 5)]);
    grown.length = 5;
    bot.end(&game, &57, &board_with(vec![grown.clone()], vec![]), &grown);

    let summary = bot.stats_summary();
    assert_eq!(summary["total_games"], 1);
    assert_eq!(summary["wins"], 1);
    assert_eq!(summary["longest_game"], 57);
    assert_eq!(summary["average_food_eaten"], 2.0);
    assert_eq!(summary["active_games"], 0);
}

#[tokio::test]
async fn test_early_elimination_counts_our_last_turn() {
    let bot = Bot::new(test_config(), DebugLogger::disabled());
    let game = test_game("g-out");

    let you = Battlesnake::from_body("me", vec![Coord::new(5, 5), Coord::new(5, 4)]);
    let enemy = Battlesnake::from_body("enemy", vec![Coord::new(8, 8)]);
    let board = board_with(vec![you.clone(), enemy.clone()], vec![]);

    bot.start(&game, &0, &board, &you);
    bot.get_move(&game, &10, &board, &you).await;
    // The game ran on without us until turn 57
    bot.end(&game, &57, &board_with(vec![enemy], vec![]), &you);

    let summary = bot.stats_summary();
    assert_eq!(summary["losses"], 1);
    assert_eq!(summary["longest_game"], 10);
    assert_eq!(summary["shortest_game"], 10);
    assert_eq!(summary["average_turns"], 10.0);
}

#[tokio::test]
async fn test_end_records_loss_and_draw() {
    let bot = Bot::new(test_config(), DebugLogger::disabled());
    let you = Battlesnake::from_body("me", vec![Coord::new(1, 1)]);
    let enemy = Battlesnake::from_body("enemy", vec![Coord::new(8, 8)]);

    bot.end(&test_game("lost"), &10, &board_with(vec![enemy], vec![]), &you);
    bot.end(&test_game("tied"), &20, &board_with(vec![], vec![]), &you);

    let summary = bot.stats_summary();
    assert_eq!(summary["total_games"], 2);
    assert_eq!(summary["losses"], 1);
    assert_eq!(summary["draws"], 1);
    assert_eq!(summary["shortest_game"], 10);
}

#[test]
fn test_info_uses_configured_appearance() {
    let mut config = test_config();
    config.appearance.color = "#123456".to_string();
    let bot = Bot::new(config, DebugLogger::disabled());

    let info = bot.info();
    assert_eq!(info["apiversion"], "1");
    assert_eq!(info["color"], "#123456");
    assert_eq!(info["author"], "fusionstreak");
}
