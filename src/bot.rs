// Stock Battlesnake bot
//
// Bot pairs an appearance with a resolved strategy and runs the decision
// engine. `respond_to_move` is the async side used by the server: it runs a
// brain off the request thread and never lets a slow decision miss the deadline.

use log::{info, warn};
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::brain::SnakeBrain;
use crate::config::AppearanceConfig;
use crate::engine::{self, Decision};
use crate::strategy::StrategyConfig;
use crate::trace::DebugTrace;
use crate::types::{GameState, InfoResponse, MoveResponse};

const SHOUTS: [&str; 6] = [
    "Room to breathe.",
    "Mind the gap.",
    "Tails move, walls don't.",
    "Center holds.",
    "Never look back.",
    "Plenty of space over here.",
];

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    appearance: AppearanceConfig,
    strategy: StrategyConfig,
    with_trace: bool,
}

impl Bot {
    /// Creates a new Bot instance
    ///
    /// # Arguments
    /// * `appearance` - What GET / reports
    /// * `strategy` - Resolved strategy, fixed for the bot's lifetime
    pub fn new(appearance: AppearanceConfig, strategy: StrategyConfig) -> Self {
        Bot {
            appearance,
            strategy,
            with_trace: false,
        }
    }

    /// Whether decisions carry a DebugTrace
    pub fn with_trace(mut self, with_trace: bool) -> Self {
        self.with_trace = with_trace;
        self
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }
}

impl SnakeBrain for Bot {
    fn info(&self) -> InfoResponse {
        info!("INFO");
        self.appearance.to_info()
    }

    fn on_start(&self, state: &GameState) {
        info!("GAME START {} ({})", state.game.id, state.you.id);
    }

    fn decide_move(&self, state: &GameState) -> Decision {
        engine::decide(state, &self.strategy, self.with_trace)
    }

    fn on_end(&self, state: &GameState) {
        info!("GAME OVER {} at turn {}", state.game.id, state.turn);
    }

    fn shout(&self, _state: &GameState) -> String {
        SHOUTS
            .choose(&mut rand::rng())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}

/// Runs `brain` on the blocking pool and waits at most `budget_ms`.
///
/// # Arguments
/// * `brain` - Bot answering this request
/// * `state` - Snapshot from the request
/// * `budget_ms` - Time allowed before falling back to a quick safe move
///
/// # Returns
/// * `(MoveResponse, Option<DebugTrace>)` - The trace is absent on fallback
pub async fn respond_to_move(
    brain: Arc<dyn SnakeBrain>,
    state: GameState,
    budget_ms: u64,
) -> (MoveResponse, Option<DebugTrace>) {
    let start_time = Instant::now();
    let turn = state.turn;
    let shout = brain.shout(&state);

    let worker_brain = brain.clone();
    let worker_state = state.clone();
    let task = tokio::task::spawn_blocking(move || worker_brain.decide_move(&worker_state));

    let decision = match tokio::time::timeout(Duration::from_millis(budget_ms), task).await {
        Ok(Ok(decision)) => decision,
        Ok(Err(e)) => {
            warn!("Turn {}: decision task failed ({}), using fallback", turn, e);
            fallback(&state)
        }
        Err(_) => {
            warn!("Turn {}: decision exceeded {}ms, using fallback", turn, budget_ms);
            fallback(&state)
        }
    };

    info!(
        "Turn {}: Chose {} (time: {}ms)",
        turn,
        decision.direction,
        start_time.elapsed().as_millis()
    );

    (
        MoveResponse {
            direction: decision.direction,
            shout,
        },
        decision.trace,
    )
}

fn fallback(state: &GameState) -> Decision {
    Decision {
        direction: engine::fallback_direction(state),
        trace: None,
    }
}
