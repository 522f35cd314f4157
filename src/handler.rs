// HTTP handler bindings for Battlesnake API endpoints
//
// Thin wrappers binding Rocket routes to registered bots. The root routes serve
// the default bot; `/<slug>/...` serves any other registered bot and answers
// 404 for slugs nobody registered.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use battlesnake_strategist::bot::respond_to_move;
use battlesnake_strategist::brain::{BotRegistry, DEFAULT_SLUG};
use battlesnake_strategist::config::TimingConfig;
use battlesnake_strategist::turn_log::{TurnLogger, TurnRecord};
use battlesnake_strategist::types::{GameState, InfoResponse, MoveResponse};

fn info_for(registry: &BotRegistry, slug: &str) -> Option<Json<InfoResponse>> {
    registry.get(slug).map(|bot| Json(bot.info()))
}

fn start_for(registry: &BotRegistry, slug: &str, state: &GameState) -> Status {
    match registry.get(slug) {
        Some(bot) => {
            bot.on_start(state);
            Status::Ok
        }
        None => Status::NotFound,
    }
}

async fn move_for(
    registry: &BotRegistry,
    turn_log: &TurnLogger,
    timing: &TimingConfig,
    slug: &str,
    state: GameState,
) -> Option<Json<MoveResponse>> {
    let bot = registry.get(slug)?;
    let (response, trace) =
        respond_to_move(bot, state.clone(), timing.effective_budget_ms()).await;

    turn_log.record(TurnRecord::for_move(slug, state, response.direction, trace));
    Some(Json(response))
}

fn end_for(registry: &BotRegistry, turn_log: &TurnLogger, slug: &str, state: GameState) -> Status {
    match registry.get(slug) {
        Some(bot) => {
            bot.on_end(&state);
            turn_log.record(TurnRecord::for_end(slug, state));
            Status::Ok
        }
        None => Status::NotFound,
    }
}

/// GET / endpoint
/// Returns the default bot's metadata and appearance
#[get("/")]
pub fn index(registry: &State<BotRegistry>) -> Option<Json<InfoResponse>> {
    info_for(registry, DEFAULT_SLUG)
}

/// POST /start endpoint
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(registry: &State<BotRegistry>, start_req: Json<GameState>) -> Status {
    start_for(registry, DEFAULT_SLUG, &start_req)
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    registry: &State<BotRegistry>,
    turn_log: &State<TurnLogger>,
    timing: &State<TimingConfig>,
    move_req: Json<GameState>,
) -> Option<Json<MoveResponse>> {
    move_for(registry, turn_log, timing, DEFAULT_SLUG, move_req.into_inner()).await
}

/// POST /end endpoint
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(
    registry: &State<BotRegistry>,
    turn_log: &State<TurnLogger>,
    end_req: Json<GameState>,
) -> Status {
    end_for(registry, turn_log, DEFAULT_SLUG, end_req.into_inner())
}

#[get("/<slug>")]
pub fn bot_index(registry: &State<BotRegistry>, slug: &str) -> Option<Json<InfoResponse>> {
    info_for(registry, slug)
}

#[post("/<slug>/start", format = "json", data = "<start_req>")]
pub fn bot_start(
    registry: &State<BotRegistry>,
    slug: &str,
    start_req: Json<GameState>,
) -> Status {
    start_for(registry, slug, &start_req)
}

#[post("/<slug>/move", format = "json", data = "<move_req>")]
pub async fn bot_move(
    registry: &State<BotRegistry>,
    turn_log: &State<TurnLogger>,
    timing: &State<TimingConfig>,
    slug: &str,
    move_req: Json<GameState>,
) -> Option<Json<MoveResponse>> {
    move_for(registry, turn_log, timing, slug, move_req.into_inner()).await
}

#[post("/<slug>/end", format = "json", data = "<end_req>")]
pub fn bot_end(
    registry: &State<BotRegistry>,
    turn_log: &State<TurnLogger>,
    slug: &str,
    end_req: Json<GameState>,
) -> Status {
    end_for(registry, turn_log, slug, end_req.into_inner())
}
