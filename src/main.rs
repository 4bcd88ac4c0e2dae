use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod parser;
mod routes;
mod services;
mod store;
#[cfg(test)]
mod test_support;

use config::Config;
use db::init_db;

use crate::auth::revocation::TokenRevocations;
use crate::docs::ApiDoc;
use crate::model::settings::Settings;
use crate::store::KeyValueStore;
use crate::store::cache::CachedStore;
use crate::store::leave_store::LeaveStore;
use crate::store::memory::MemoryStore;
use crate::store::mysql::MySqlStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Cuti dashboard is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let backend: Arc<dyn KeyValueStore> = match &config.database_url {
        Some(url) => Arc::new(MySqlStore::new(init_db(url).await?)),
        None => {
            warn!("DATABASE_URL not set, leave requests are kept in memory only");
            Arc::new(MemoryStore::default())
        }
    };

    let cache = Arc::new(CachedStore::new(
        backend,
        Duration::from_secs(config.cache_ttl_secs),
    ));

    let cache_for_warmup = cache.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = cache_for_warmup.warmup().await {
            error!(error = ?e, "Failed to warm up store cache");
        }
    });

    let kv: Arc<dyn KeyValueStore> = cache.clone();
    let store = Data::new(LeaveStore::new(
        kv,
        Settings::new(&config.default_approver_email, &config.default_admin_password),
    ));
    let revocations = Data::new(TokenRevocations::new(config.access_token_ttl));
    let cache = Data::from(cache);

    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(cache.clone())
            .app_data(revocations.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            // Auth + dashboard routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
