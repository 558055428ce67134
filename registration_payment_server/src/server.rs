use std::{net::SocketAddr, str::FromStr};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use razorpay_tools::RazorpayApi;
use registration_payment_engine::{ReconcilerApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    registration_routes::register,
    routes::{create_order, health, verify_payment, webhook},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))
        .map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let srv = HttpServer::new(move || {
        let api = ReconcilerApi::new(db.clone());
        let gateway = match RazorpayApi::new(config.razorpay.clone()) {
            Ok(gateway) => Some(gateway),
            Err(e) => {
                warn!("💻️ Payment gateway is disabled: {e}. Order creation will respond with 503.");
                None
            },
        };
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rps::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(gateway))
            .app_data(web::Data::new(config.razorpay.clone()))
            .app_data(web::Data::new(config.event.clone()))
            .service(health)
            .service(
                web::scope("/payment")
                    .route("/create-order", web::post().to(create_order::<SqliteDatabase>))
                    .route("/verify", web::post().to(verify_payment))
                    .route("/webhook", web::post().to(webhook::<SqliteDatabase>)),
            )
            .route("/register", web::post().to(register::<SqliteDatabase>))
    })
    .keep_alive(KeepAlive::Os)
    .bind(addr)?
    .run();
    Ok(srv)
}
