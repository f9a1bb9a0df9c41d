//! Shopify posts every webhook to a single endpoint, with the topic in the query string. Only `orders/create` is
//! acted on.
//!
//! Webhook responses must stay in the 200 range once the request has been authenticated and parsed, otherwise Shopify
//! keeps retrying a delivery that will never succeed.

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use log::*;
use ofr_common::ShopDomain;
use order_ftp_engine::{
    order_payload::OrderPayload,
    order_xml::UploadReceipt,
    traits::{FtpSettingsStore, OrderUploader},
    OrderRelayApi,
    RelayError,
};
use serde::Deserialize;
use thiserror::Error;

use crate::{config::WebhookOptions, data_objects::JsonResponse, errors::AuthError, helpers::verify_hmac, route};

pub const ORDERS_CREATE_TOPIC: &str = "orders/create";
pub const HMAC_HEADER: &str = "X-Shopify-Hmac-Sha256";
pub const SHOP_DOMAIN_HEADER: &str = "X-Shopify-Shop-Domain";
/// Webhook body limit. Orders with a few hundred line items are larger than actix's default of 256 KiB.
pub const MAX_WEBHOOK_PAYLOAD_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Error)]
pub enum WebhookFailure {
    #[error("{0}")]
    Authentication(#[from] AuthError),
    #[error("Could not read the order payload. {0}")]
    MalformedPayload(String),
    #[error("{0}")]
    SettingsNotFound(RelayError),
    #[error("{0}")]
    Relay(RelayError),
}

impl From<RelayError> for WebhookFailure {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::SettingsNotFound(_) => Self::SettingsNotFound(e),
            e => Self::Relay(e),
        }
    }
}

impl WebhookFailure {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::SettingsNotFound(_) => StatusCode::OK,
            Self::Relay(_) => StatusCode::OK,
        }
    }
}

/// Register the webhook route along with its request body limit.
pub fn configure_webhook_routes<B, U>(cfg: &mut web::ServiceConfig)
where
    B: FtpSettingsStore + 'static,
    U: OrderUploader + 'static,
{
    cfg.app_data(web::PayloadConfig::new(MAX_WEBHOOK_PAYLOAD_SIZE)).service(OrderWebhookRoute::<B, U>::new());
}

route!(order_webhook => Post "/webhooks" impl FtpSettingsStore, OrderUploader);
pub async fn order_webhook<B, U>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<OrderRelayApi<B, U>>,
    options: web::Data<WebhookOptions>,
) -> HttpResponse
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    trace!("🛍️ Received webhook request: {}", req.uri());
    let query = web::Query::<WebhookQuery>::from_query(req.query_string()).map(|q| q.into_inner()).unwrap_or_default();
    if query.topic.as_deref() != Some(ORDERS_CREATE_TOPIC) {
        debug!("🛍️ Ignoring webhook with topic {:?}", query.topic);
        return HttpResponse::Ok().finish();
    }
    match relay_order_webhook(&req, &body, api.get_ref(), options.get_ref()).await {
        Ok(receipt) => {
            HttpResponse::Ok().json(JsonResponse::success(format!("Order uploaded to {}", receipt.remote_path)))
        },
        Err(failure) => {
            match &failure {
                WebhookFailure::Authentication(e) => warn!("🛍️ Rejecting webhook request. {e}"),
                WebhookFailure::MalformedPayload(e) => warn!("🛍️ Could not parse the order payload. {e}"),
                WebhookFailure::SettingsNotFound(e) => info!("🛍️ {e}"),
                WebhookFailure::Relay(e) => error!("🛍️ Could not relay the order. {e}"),
            }
            HttpResponse::build(failure.status_code()).json(JsonResponse::failure(failure))
        },
    }
}

async fn relay_order_webhook<B, U>(
    req: &HttpRequest,
    body: &[u8],
    api: &OrderRelayApi<B, U>,
    options: &WebhookOptions,
) -> Result<UploadReceipt, WebhookFailure>
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    verify_webhook_signature(req, body, options)?;
    let shop = shop_domain_from_headers(req)?;
    let order =
        serde_json::from_slice::<OrderPayload>(body).map_err(|e| WebhookFailure::MalformedPayload(e.to_string()))?;
    info!("🛍️ Order {} received from {shop}", order.name());
    let receipt = api.relay_order(&shop, &order).await?;
    Ok(receipt)
}

fn verify_webhook_signature(req: &HttpRequest, body: &[u8], options: &WebhookOptions) -> Result<(), AuthError> {
    if !options.hmac_checks {
        trace!("🔐️ HMAC checks are disabled. Allowing request.");
        return Ok(());
    }
    if options.hmac_secret.reveal().is_empty() {
        return Err(AuthError::WebhookSecretNotSet);
    }
    let signature = req.headers().get(HMAC_HEADER).and_then(|v| v.to_str().ok()).ok_or(AuthError::MissingHmac)?;
    if verify_hmac(options.hmac_secret.reveal(), body, signature) {
        trace!("🔐️ HMAC check for request ✅️");
        Ok(())
    } else {
        Err(AuthError::InvalidHmac)
    }
}

fn shop_domain_from_headers(req: &HttpRequest) -> Result<ShopDomain, AuthError> {
    let value = req
        .headers()
        .get(SHOP_DOMAIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AuthError::MissingShopDomain(format!("The {SHOP_DOMAIN_HEADER} header is missing.")))?;
    value.parse::<ShopDomain>().map_err(|e| AuthError::MissingShopDomain(e.to_string()))
}
