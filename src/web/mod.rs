// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::{ApiError, CsvResponse};

use crate::config::ExporterConfig;
use crate::snapshot::SnapshotClient;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{routes, Request, Response};
use tracing::info;

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

pub async fn start_web_server(config: ExporterConfig) -> Result<()> {
    let client = SnapshotClient::new(&config)?;

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", "0.0.0.0"));

    info!("Starting profile CSV exporter API server");
    info!("Server: http://0.0.0.0:{}", config.port);

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(client)
        .mount(
            "/api",
            routes![
                handlers::convert,
                handlers::convert_method_not_allowed,
                handlers::check_snapshot,
                handlers::check_snapshot_method_not_allowed,
                handlers::health,
                handlers::options
            ],
        )
        .launch()
        .await?;

    Ok(())
}
