use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use ofr_common::Secret;
use order_ftp_engine::{
    order_xml::UploadReceipt,
    traits::{FtpSettingsError, TransferError, TransferStage},
    OrderRelayApi,
};

use super::{
    helpers::{saved_settings, send_request, shop, SHOP},
    mocks::{MockSettingsStore, MockUploader},
};
use crate::{
    config::WebhookOptions,
    data_objects::JsonResponse,
    helpers::calculate_hmac,
    webhook_routes::{configure_webhook_routes, HMAC_HEADER, SHOP_DOMAIN_HEADER},
};

const API_SECRET: &str = "shpss_0123456789abcdef";

const ORDER_JSON: &str = r##"{
  "id": 5678901234,
  "name": "#1001",
  "created_at": "2024-03-05T07:00:00-05:00",
  "shipping_address": {
    "name": "Steve Shipper",
    "address1": "123 Shipping Street",
    "city": "Shippington",
    "zip": "40003",
    "province_code": "KY",
    "country_code": "US"
  },
  "line_items": [{ "sku": "ABC", "quantity": 3, "title": "Widget" }]
}"##;

fn configure(store: MockSettingsStore, uploader: MockUploader, hmac_checks: bool) -> impl FnOnce(&mut ServiceConfig) {
    configure_with_options(store, uploader, WebhookOptions::new(Secret::new(API_SECRET.to_string()), hmac_checks))
}

fn configure_with_options(
    store: MockSettingsStore,
    uploader: MockUploader,
    options: WebhookOptions,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderRelayApi::new(store, uploader)))
            .app_data(web::Data::new(options))
            .configure(configure_webhook_routes::<MockSettingsStore, MockUploader>);
    }
}

fn unsigned_request(topic: &str, body: &str) -> TestRequest {
    TestRequest::post()
        .uri(&format!("/webhooks?topic={topic}"))
        .insert_header(ContentType::json())
        .insert_header((SHOP_DOMAIN_HEADER, SHOP))
        .set_payload(body.to_string())
}

fn signed_request(topic: &str, body: &str) -> TestRequest {
    let signature = calculate_hmac(API_SECRET, body.as_bytes()).unwrap();
    unsigned_request(topic, body).insert_header((HMAC_HEADER, signature))
}

fn receipt_for(file_name: &str, bytes: usize) -> UploadReceipt {
    UploadReceipt { remote_path: format!("in/{file_name}"), bytes: bytes as u64 }
}

fn store_with_settings() -> MockSettingsStore {
    let mut store = MockSettingsStore::new();
    store
        .expect_fetch_ftp_settings()
        .withf(|s| s.as_str() == SHOP)
        .times(1)
        .returning(|_| Ok(Some(saved_settings())));
    store
}

fn response_json(body: &str) -> JsonResponse {
    serde_json::from_str(body).unwrap()
}

#[actix_web::test]
async fn other_topics_are_ignored() {
    let _ = env_logger::try_init().ok();
    let req = signed_request("orders/updated", ORDER_JSON);
    let (status, body) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn missing_topic_is_ignored() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/webhooks")
        .insert_header(ContentType::json())
        .insert_header((SHOP_DOMAIN_HEADER, SHOP))
        .set_payload(ORDER_JSON);
    let (status, body) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn invalid_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac("not the api secret", ORDER_JSON.as_bytes()).unwrap();
    let req = unsigned_request("orders/create", ORDER_JSON).insert_header((HMAC_HEADER, signature));
    let (status, body) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let response = response_json(&body);
    assert!(!response.success);
    assert_eq!(response.message, "The HMAC signature is invalid.");
}

#[actix_web::test]
async fn missing_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req = unsigned_request("orders/create", ORDER_JSON);
    let (status, _) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn tampered_body_is_rejected() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(API_SECRET, ORDER_JSON.as_bytes()).unwrap();
    let tampered = ORDER_JSON.replace("\"quantity\": 3", "\"quantity\": 300");
    let req = unsigned_request("orders/create", &tampered).insert_header((HMAC_HEADER, signature));
    let (status, _) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_shop_header_is_rejected() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(API_SECRET, ORDER_JSON.as_bytes()).unwrap();
    let req = TestRequest::post()
        .uri("/webhooks?topic=orders/create")
        .insert_header(ContentType::json())
        .insert_header((HMAC_HEADER, signature))
        .set_payload(ORDER_JSON);
    let (status, _) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_payload_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let req = signed_request("orders/create", "{ this is not json");
    let (status, body) = send_request(req, configure(MockSettingsStore::new(), MockUploader::new(), true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!response_json(&body).success);
}

#[actix_web::test]
async fn shop_without_settings_is_acknowledged_without_upload() {
    let _ = env_logger::try_init().ok();
    let mut store = MockSettingsStore::new();
    store.expect_fetch_ftp_settings().times(1).returning(|_| Ok(None));
    let mut uploader = MockUploader::new();
    uploader.expect_upload_document().never();
    let req = signed_request("orders/create", ORDER_JSON);
    let (status, body) = send_request(req, configure(store, uploader, true)).await;
    assert_eq!(status, StatusCode::OK);
    let response = response_json(&body);
    assert!(!response.success);
    assert_eq!(response.message, format!("No FTP settings have been saved for {SHOP}"));
}

#[actix_web::test]
async fn order_is_relayed() {
    let _ = env_logger::try_init().ok();
    let mut uploader = MockUploader::new();
    uploader
        .expect_upload_document()
        .withf(|creds, doc| {
            creds == &saved_settings().credentials &&
                doc.file_name.starts_with("order_1001_") &&
                doc.file_name.ends_with(".xml") &&
                doc.contents.matches("<LineItem>").count() == 1 &&
                doc.contents.contains("<ItemNbr>ABC</ItemNbr>") &&
                doc.contents.contains("<QtyOrdered>3</QtyOrdered>") &&
                doc.contents.contains("<CustomerPoNbr>#1001</CustomerPoNbr>") &&
                doc.contents.contains("<OrderDate>2024-03-05 07:00:00</OrderDate>") &&
                doc.contents.contains(&format!("<PartnerId>{}</PartnerId>", shop()))
        })
        .times(1)
        .returning(|_, doc| Ok(receipt_for(&doc.file_name, doc.contents.len())));
    let req = signed_request("orders/create", ORDER_JSON);
    let (status, body) = send_request(req, configure(store_with_settings(), uploader, true)).await;
    assert_eq!(status, StatusCode::OK);
    let response = response_json(&body);
    assert!(response.success);
    assert!(response.message.starts_with("Order uploaded to in/order_1001_"), "{}", response.message);
}

#[actix_web::test]
async fn upload_failure_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut uploader = MockUploader::new();
    uploader
        .expect_upload_document()
        .times(1)
        .returning(|_, _| Err(TransferError::failed(TransferStage::ChangeDirectory, "550 in: No such directory")));
    let req = signed_request("orders/create", ORDER_JSON);
    let (status, body) = send_request(req, configure(store_with_settings(), uploader, true)).await;
    assert_eq!(status, StatusCode::OK);
    let response = response_json(&body);
    assert!(!response.success);
    assert!(response.message.contains("550 in: No such directory"), "{}", response.message);
}

#[actix_web::test]
async fn database_failure_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockSettingsStore::new();
    store
        .expect_fetch_ftp_settings()
        .times(1)
        .returning(|_| Err(FtpSettingsError::DatabaseError("database is locked".into())));
    let mut uploader = MockUploader::new();
    uploader.expect_upload_document().never();
    let req = signed_request("orders/create", ORDER_JSON);
    let (status, body) = send_request(req, configure(store, uploader, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!response_json(&body).success);
}

#[actix_web::test]
async fn signature_is_not_needed_when_checks_are_disabled() {
    let _ = env_logger::try_init().ok();
    let mut uploader = MockUploader::new();
    uploader
        .expect_upload_document()
        .times(1)
        .returning(|_, doc| Ok(receipt_for(&doc.file_name, doc.contents.len())));
    let req = unsigned_request("orders/create", ORDER_JSON);
    let (status, body) = send_request(req, configure(store_with_settings(), uploader, false)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response_json(&body).success);
}

#[actix_web::test]
async fn missing_api_secret_rejects_every_order() {
    let _ = env_logger::try_init().ok();
    let mut uploader = MockUploader::new();
    uploader.expect_upload_document().never();
    let signature = calculate_hmac("", ORDER_JSON.as_bytes()).unwrap();
    let req = unsigned_request("orders/create", ORDER_JSON).insert_header((HMAC_HEADER, signature));
    let options = WebhookOptions::new(Secret::new(String::new()), true);
    let (status, body) = send_request(req, configure_with_options(MockSettingsStore::new(), uploader, options)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let response = response_json(&body);
    assert!(!response.success);
    assert_eq!(response.message, "No Shopify API secret is configured, so webhook signatures cannot be checked.");
}

#[actix_web::test]
async fn large_orders_are_accepted() {
    let _ = env_logger::try_init().ok();
    let description = "x".repeat(700);
    let items = (0..400)
        .map(|i| format!(r#"{{ "sku": "SKU-{i:04}", "quantity": 1, "title": "{description}" }}"#))
        .collect::<Vec<_>>()
        .join(",");
    let order = format!(
        r##"{{ "id": 5678901235, "name": "#1002", "created_at": "2024-03-05T07:00:00-05:00", "line_items": [{items}] }}"##
    );
    assert!(order.len() > 256 * 1024);
    let mut uploader = MockUploader::new();
    uploader
        .expect_upload_document()
        .withf(|_, doc| doc.contents.matches("<LineItem>").count() == 400)
        .times(1)
        .returning(|_, doc| Ok(receipt_for(&doc.file_name, doc.contents.len())));
    let req = signed_request("orders/create", &order);
    let (status, body) = send_request(req, configure(store_with_settings(), uploader, true)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response_json(&body).success);
}
