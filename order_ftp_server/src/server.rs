use std::time::Duration;

use actix_web::{
    dev::{Server, Service},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use futures::{future::ok, FutureExt};
use log::{info, warn};
use order_ftp_engine::{FtpClient, OrderRelayApi, SqliteDatabase};

use crate::{
    config::{ServerConfig, WebhookOptions},
    errors::{AuthError, ServerError, ServerError::AuthenticationError},
    helpers::get_remote_ip,
    middleware::AdminTokenMiddlewareFactory,
    routes::{configure_settings_routes, health},
    webhook_routes::configure_webhook_routes,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not run migrations. {e}")))?;
    info!("🗃️ Settings database is ready at {}", db.url());
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    if !config.temp_dir.is_dir() {
        return Err(ServerError::ConfigurationError(format!(
            "The staging directory {} does not exist.",
            config.temp_dir.display()
        )));
    }
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let relay_api = OrderRelayApi::new(db.clone(), FtpClient::new(config.temp_dir.clone()));
        let webhook_options = WebhookOptions::from_config(&config);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ofr::access_log"))
            .app_data(web::Data::new(relay_api))
            .app_data(web::Data::new(webhook_options));
        let settings_scope = web::scope("/api")
            .wrap(AdminTokenMiddlewareFactory::new(config.admin_token.clone()))
            .configure(configure_settings_routes::<SqliteDatabase, FtpClient>);
        let use_x_forwarded_for = config.use_x_forwarded_for;
        let use_forwarded = config.use_forwarded;
        let shopify_whitelist = config.shopify_config.whitelist.clone();
        let shopify_scope = web::scope("/shopify")
            .wrap_fn(move |req, srv| {
                let peer_ip = get_remote_ip(req.request(), use_x_forwarded_for, use_forwarded);
                let whitelisted = match (peer_ip, &shopify_whitelist) {
                    (Some(ip), Some(whitelist)) => {
                        info!("🛍️ Shopify webhook from {ip}");
                        whitelist.contains(&ip)
                    },
                    (_, None) => true,
                    (None, Some(_)) => {
                        warn!("🛍️ No IP address found in shopify remote peer request, denying access.");
                        false
                    },
                };
                if whitelisted {
                    srv.call(req)
                } else {
                    ok(req.error_response(AuthenticationError(AuthError::ForbiddenPeer))).boxed_local()
                }
            })
            .configure(configure_webhook_routes::<SqliteDatabase, FtpClient>);
        app.service(health).service(settings_scope).service(shopify_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
