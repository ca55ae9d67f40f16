use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod rpc;
mod service;
mod utils;

use crate::auth::identity::{HttpIdentityResolver, IdentityResolver};
use crate::docs::ApiDoc;
use crate::rpc::client::OdooClient;
use crate::rpc::model::{AttendanceModel, OdooAttendanceModel};
use crate::service::attendance::AttendanceGateway;
use crate::utils::clock::SystemClock;
use config::Config;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/health")]
async fn health() -> impl Responder {
    "OK"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        addr = %config.server_addr,
        erp = %config.odoo.url,
        model = %config.odoo.model,
        zone = %config.zone,
        "Server starting..."
    );

    // One pooled client for both upstreams
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .context("failed to build upstream HTTP client")?;

    let model: Arc<dyn AttendanceModel> = Arc::new(OdooAttendanceModel::new(
        OdooClient::new(&config.odoo, http.clone()),
        config.odoo.model.clone(),
    ));
    let identity: Arc<dyn IdentityResolver> =
        Arc::new(HttpIdentityResolver::new(&config.identity_base_url, http));

    let gateway = Data::new(AttendanceGateway::new(model, config.zone, Arc::new(SystemClock)));
    let identity = Data::from(identity);
    let limiter = routes::rate_limit(config.rate_attendance_per_min)?;

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(gateway.clone())
            .app_data(identity.clone())
            .service(health)
            .configure(|cfg| routes::configure(cfg, &config, &limiter))
    })
    .bind(server_addr.as_str())
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
