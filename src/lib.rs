// Library exports for the Battlesnake strategist
// This allows the server, the replay tool and other utilities to share the decision engine

pub mod ascii;
pub mod bot;
pub mod brain;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod outcome;
pub mod replay;
pub mod scoring;
pub mod space;
pub mod state;
pub mod strategy;
pub mod threat;
pub mod trace;
pub mod turn_log;
pub mod types;
