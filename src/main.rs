mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use crate::config::Config;
use crate::utils::file_store::FileStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{:#}", err))
    })?;

    // Initialize the database pool
    let pool = db::create_pool(&config)
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

    let store = FileStore::new(config.upload_dir.clone());
    tokio::fs::create_dir_all(store.root()).await?;

    let bind_addr = config.bind_addr.clone();
    let json_limit = config.max_body_bytes;
    info!("Starting server at {} (uploads in {})", bind_addr, store.root().display());

    let pool = web::Data::new(pool);
    let store = web::Data::new(store);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(store.clone())
            .app_data(config.clone())
            .app_data(handlers::json_config(json_limit))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
