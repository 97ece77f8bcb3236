mod config;
mod drafts;
mod engine;
mod error;
mod format;
mod identity;
mod services;
mod storage;

use crate::config::Config;
use crate::drafts::state::DraftsState;
use crate::storage::Store;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::parse();

    let store = Store::open(&config.database).map_err(std::io::Error::other)?;
    info!("Using database {}", config.database.display());

    let drafts = DraftsState::new(config.draft_ttl());
    let settings = config.settings();
    let json_limit = config.max_upload_bytes;

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(drafts.clone()))
            .app_data(web::Data::new(settings.clone()))
            .service(services::checks::configure_routes())
            .service(services::admin::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
