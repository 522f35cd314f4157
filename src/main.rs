#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use battlesnake_strategist::brain::BotRegistry;
use battlesnake_strategist::config::Config;
use battlesnake_strategist::turn_log::TurnLogger;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Battlesnake Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let registry = BotRegistry::from_config(&config);
    let turn_log = TurnLogger::new(config.turn_log.enabled, &config.turn_log.log_file_path).await;

    info!(
        "Serving bots {:?} with a {}ms move budget",
        registry.slugs(),
        config.timing.effective_budget_ms()
    );

    rocket::build()
        .manage(registry)
        .manage(turn_log)
        .manage(config.timing.clone())
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/github/battlesnake-strategist");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::start,
                handler::get_move,
                handler::end,
                handler::bot_index,
                handler::bot_start,
                handler::bot_move,
                handler::bot_end,
            ],
        )
}
