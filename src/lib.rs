// Library exports for the Battlesnake server
// The server binary, the replay tool and the integration tests all build on these

#[macro_use]
extern crate rocket;

pub mod bot;
pub mod candidates;
pub mod config;
pub mod debug_logger;
pub mod handler;
pub mod replay;
pub mod safety;
pub mod selector;
pub mod stats;
pub mod types;
