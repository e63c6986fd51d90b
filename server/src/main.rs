use std::env;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

mod error;
mod routes;
mod seed;
mod store;

use routes::AppState;
use store::TaskStore;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let bind = env::var("TODOMASTER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let api_token = env::var("TODOMASTER_API_TOKEN").ok().filter(|t| !t.is_empty());
    let with_samples = env::var("TODOMASTER_SEED").map_or(true, |v| v != "false" && v != "0");

    let store = TaskStore::new();
    seed::categories(&store);
    if with_samples {
        seed::tasks(&store);
    }

    if api_token.is_some() {
        info!("Bearer token required on every request");
    }
    let state = web::Data::new(AppState { store, api_token });

    info!("Server running at http://{}/api/v1/tasks", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
