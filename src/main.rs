use crate::analytics::LogReporter;
use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::pipeline::HttpLeadService;
use crate::router::{handle, App};
use astra::Server;
use std::sync::Arc;

mod analytics;
mod config;
mod db;
mod domain;
mod errors;
mod pipeline;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        log::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    let mut app = App::new(db, Arc::new(LogReporter));
    if let Some(url) = &config.lead_api_url {
        log::info!("CRM board uses the lead API at {url}");
        app = app.with_lead_api(HttpLeadService::new(url.as_str()));
    }

    log::info!("Starting server at http://{}", config.bind_addr);
    let server = Server::bind(config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| handle(req, &app));

    if let Err(e) = result {
        log::error!("Server ended with error: {e}");
        std::process::exit(1);
    }

    log::info!("Server shut down cleanly.");
}
