// Per-turn decision log
//
// Each answered /move is appended to a JSONL file from a spawned tokio task so
// the response never waits on disk. The replay tool reads the same records
// back, which is why the RNG seed is logged alongside the board.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Board, Direction};

/// One line of the debug log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub turn: i32,
    /// Id of the snake we were playing; absent in older logs
    #[serde(default)]
    pub you_id: Option<String>,
    pub chosen_move: String,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    pub board: Board,
    pub timestamp: String,
}

/// Uses Arc<Mutex<File>> so concurrent games append whole lines
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when enabled. A file that cannot be
    /// opened disables logging rather than failing startup.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fire-and-forget: spawns the write and returns immediately
    pub fn log_move(
        &self,
        turn: i32,
        you_id: &str,
        board: Board,
        chosen_move: Direction,
        rng_seed: u64,
    ) {
        if !self.enabled {
            return;
        }

        let record = DecisionRecord {
            turn,
            you_id: Some(you_id.to_string()),
            chosen_move: chosen_move.as_str().to_string(),
            rng_seed: Some(rng_seed),
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_record(file_handle, record).await;
        });
    }

    async fn write_record(file_handle: Arc<Mutex<Option<File>>>, record: DecisionRecord) {
        let mut file_guard = file_handle.lock().await;

        let Some(file) = file_guard.as_mut() else {
            return;
        };

        let line = match serde_json::to_string(&record) {
            Ok(json) => format!("{}\n", json),
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(line.as_bytes()).await {
            error!("Failed to write debug log entry: {}", e);
        } else if let Err(e) = file.flush().await {
            error!("Failed to flush debug log: {}", e);
        }
    }
}
