// Turn log for asynchronous persistence of decisions
//
// The transport hands each finished turn to a channel and returns immediately.
// A single background task drains the channel and appends one JSON line per
// record, so the move response never waits on disk I/O.

use chrono::Utc;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::trace::DebugTrace;
use crate::types::{Direction, GameState};

/// One persisted turn. `chosen_move` is None for the end-of-game marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub game_id: String,
    pub snake_id: String,
    /// Registry slug of the bot that answered
    #[serde(default)]
    pub bot: String,
    pub turn: i32,
    pub request: GameState,
    #[serde(default)]
    pub chosen_move: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<DebugTrace>,
    #[serde(default)]
    pub timestamp: String,
}

impl TurnRecord {
    pub fn for_move(
        bot: &str,
        request: GameState,
        chosen_move: Direction,
        trace: Option<DebugTrace>,
    ) -> Self {
        Self::new(bot, request, Some(chosen_move), trace)
    }

    pub fn for_end(bot: &str, request: GameState) -> Self {
        Self::new(bot, request, None, None)
    }

    fn new(
        bot: &str,
        request: GameState,
        chosen_move: Option<Direction>,
        trace: Option<DebugTrace>,
    ) -> Self {
        TurnRecord {
            game_id: request.game.id.clone(),
            snake_id: request.you.id.clone(),
            bot: bot.to_string(),
            turn: request.turn,
            request,
            chosen_move,
            trace,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn is_end(&self) -> bool {
        self.chosen_move.is_none()
    }
}

/// Handle for queueing turn records. Cloning shares the same writer task.
#[derive(Clone)]
pub struct TurnLogger {
    sender: Option<UnboundedSender<TurnRecord>>,
}

impl TurnLogger {
    /// Opens `log_file_path` for appending and spawns the writer task.
    /// Must be called inside a tokio runtime. Falls back to a disabled logger
    /// when the file cannot be opened.
    pub async fn new<P: AsRef<Path>>(enabled: bool, log_file_path: P) -> Self {
        if !enabled {
            return TurnLogger::disabled();
        }

        let path = log_file_path.as_ref().to_path_buf();
        let mut file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                error!("Failed to open turn log '{}': {}", path.display(), e);
                return TurnLogger::disabled();
            }
        };

        let (sender, mut receiver) = mpsc::unbounded_channel::<TurnRecord>();
        info!("Turn logging enabled: {}", path.display());

        tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                let line = match serde_json::to_string(&record) {
                    Ok(json) => format!("{}\n", json),
                    Err(e) => {
                        error!("Failed to serialize turn record: {}", e);
                        continue;
                    }
                };
                if let Err(e) = file.write_all(line.as_bytes()).await {
                    error!("Failed to write turn record: {}", e);
                } else if let Err(e) = file.flush().await {
                    error!("Failed to flush turn log: {}", e);
                }
            }
        });

        TurnLogger {
            sender: Some(sender),
        }
    }

    /// A logger that drops everything
    pub fn disabled() -> Self {
        TurnLogger { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queues a record without waiting for it to be written
    pub fn record(&self, record: TurnRecord) {
        if let Some(sender) = &self.sender {
            if sender.send(record).is_err() {
                error!("Turn log writer has stopped; dropping record");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_take_ids_from_request() {
        let mut request = GameState::default();
        request.game.id = "g1".to_string();
        request.you.id = "s1".to_string();
        request.turn = 7;

        let record = TurnRecord::for_move("default", request.clone(), Direction::Left, None);
        assert_eq!(record.game_id, "g1");
        assert_eq!(record.snake_id, "s1");
        assert_eq!(record.turn, 7);
        assert!(!record.is_end());
        assert!(TurnRecord::for_end("default", request).is_end());
    }

    #[test]
    fn test_disabled_logger_drops_records() {
        let logger = TurnLogger::disabled();
        assert!(!logger.is_enabled());
        logger.record(TurnRecord::for_end("default", GameState::default()));
    }
}
