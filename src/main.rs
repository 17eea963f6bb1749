use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use serde_json::json;

mod api;
mod config;
mod docs;
mod errors;
mod model;
mod routes;
mod service;
mod store;
mod utils;

use config::Config;
use store::{audit::AuditLog, requests::RequestStore, roster::RosterStore};

use crate::docs::ApiDoc;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

/// Role menu
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "title": "Disaster Emergency Support System",
        "roles": ["Employee", "Admin"]
    }))
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
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    // No roster, no Employee role: refuse to start
    let roster = Data::new(RosterStore::new(&config.employee_data_path));
    let employees = roster
        .load()
        .context("employee roster is required to serve the Employee role")?;
    info!(
        employees = employees.len(),
        path = %roster.path().display(),
        "Roster loaded"
    );

    let requests = Data::new(RequestStore::new(&config.requests_path));
    let audit = Data::new(AuditLog::new(&config.audit_log_path));
    info!(
        requests = %requests.path().display(),
        audit = %audit.path().display(),
        "Request store ready"
    );

    let roster_for_warmup = roster.clone();
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) = roster_for_warmup.warmup(250).await {
            error!(error = %e, "Failed to warm up roster index");
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(roster.clone())
            .app_data(requests.clone())
            .app_data(audit.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
