// Bot plugin contract and registry
//
// A bot is anything implementing SnakeBrain. Bots are registered explicitly
// under a slug; the HTTP layer looks them up per request.

use log::info;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::bot::Bot;
use crate::config::Config;
use crate::engine::Decision;
use crate::types::{GameState, InfoResponse};

/// Slug of the bot served at the root routes
pub const DEFAULT_SLUG: &str = "default";

pub trait SnakeBrain: Send + Sync {
    /// Static appearance, reported on GET /
    fn info(&self) -> InfoResponse;

    fn on_start(&self, _state: &GameState) {}

    /// Must always produce a direction
    fn decide_move(&self, state: &GameState) -> Decision;

    fn on_end(&self, _state: &GameState) {}

    fn shout(&self, _state: &GameState) -> String {
        String::new()
    }
}

/// Slug to bot lookup, shared by all request handlers
#[derive(Default)]
pub struct BotRegistry {
    bots: RwLock<HashMap<String, Arc<dyn SnakeBrain>>>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the default bot plus one bot per `[[bots]]` profile
    pub fn from_config(config: &Config) -> Self {
        let registry = BotRegistry::new();
        let trace = config.turn_log.include_trace;

        registry.register(
            DEFAULT_SLUG,
            Arc::new(Bot::new(config.appearance.clone(), config.base_strategy()).with_trace(trace)),
        );
        for profile in &config.bots {
            let bot = Bot::new(config.appearance_for(profile), config.strategy_for(profile))
                .with_trace(trace);
            registry.register(&profile.slug, Arc::new(bot));
        }

        registry
    }

    /// Adds or replaces the bot under `slug`
    pub fn register(&self, slug: &str, brain: Arc<dyn SnakeBrain>) {
        info!("Registered bot '{}'", slug);
        self.bots.write().insert(slug.to_string(), brain);
    }

    pub fn get(&self, slug: &str) -> Option<Arc<dyn SnakeBrain>> {
        self.bots.read().get(slug).cloned()
    }

    pub fn default_bot(&self) -> Option<Arc<dyn SnakeBrain>> {
        self.get(DEFAULT_SLUG)
    }

    pub fn slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.bots.read().keys().cloned().collect();
        slugs.sort();
        slugs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    struct AlwaysLeft;

    impl SnakeBrain for AlwaysLeft {
        fn info(&self) -> InfoResponse {
            Config::default_hardcoded().appearance.to_info()
        }

        fn decide_move(&self, _state: &GameState) -> Decision {
            Decision {
                direction: Direction::Left,
                trace: None,
            }
        }
    }

    #[test]
    fn test_explicit_registration() {
        let registry = BotRegistry::new();
        assert!(registry.default_bot().is_none());

        registry.register("lefty", Arc::new(AlwaysLeft));
        let bot = registry.get("lefty").unwrap();
        assert_eq!(bot.decide_move(&GameState::default()).direction, Direction::Left);
        assert_eq!(bot.shout(&GameState::default()), "");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_from_config() {
        let mut config = Config::default_hardcoded();
        config.bots = Config::from_toml(
            r#"
            [timing]
            response_time_budget_ms = 1
            network_overhead_ms = 0
            [appearance]
            apiversion = "1"
            author = "a"
            color = "c"
            head = "h"
            tail = "t"
            version = "v"
            [[bots]]
            slug = "hunter"
            "#,
        )
        .unwrap()
        .bots;

        let registry = BotRegistry::from_config(&config);
        assert_eq!(registry.slugs(), vec!["default".to_string(), "hunter".to_string()]);
        assert_eq!(registry.default_bot().unwrap().info().apiversion, "1");
    }
}
