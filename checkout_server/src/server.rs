use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use cashfree_tools::{CashfreeApi, WEBHOOK_SIGNATURE_HEADER};
use checkout_engine::{CheckoutApi, SqliteDatabase};
use shiprocket_tools::ShiprocketApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    key_sweeper::start_key_sweeper,
    middleware::HmacMiddlewareFactory,
    routes,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let _sweeper = start_key_sweeper(db.clone(), config.processing_key_ttl);
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let payments =
        CashfreeApi::new(config.cashfree.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let shipping =
        ShiprocketApi::new(config.shiprocket.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let api = CheckoutApi::new(db.clone(), payments.clone(), shipping.clone(), config.processing_key_ttl);
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(
                WEBHOOK_SIGNATURE_HEADER,
                config.cashfree.client_secret.clone(),
                config.hmac_checks,
            ))
            .route("/cashfree", web::post().to(routes::cashfree_webhook::<SqliteDatabase, CashfreeApi, ShiprocketApi>));
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("chk::access_log"))
            .app_data(web::Data::new(api))
            .service(routes::health)
            .route("/order/create", web::post().to(routes::create_order::<SqliteDatabase, CashfreeApi, ShiprocketApi>))
            .route(
                "/order/verify-and-ship",
                web::post().to(routes::verify_and_ship::<SqliteDatabase, CashfreeApi, ShiprocketApi>),
            )
            .route(
                "/order/{id}/cancel",
                web::post().to(routes::cancel_order::<SqliteDatabase, CashfreeApi, ShiprocketApi>),
            )
            .route(
                "/order/{id}/return",
                web::post().to(routes::create_return::<SqliteDatabase, CashfreeApi, ShiprocketApi>),
            )
            .route("/orders", web::get().to(routes::list_orders::<SqliteDatabase, CashfreeApi, ShiprocketApi>))
            .service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
