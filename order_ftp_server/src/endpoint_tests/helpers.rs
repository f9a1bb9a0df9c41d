use actix_web::{http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use log::debug;
use ofr_common::ShopDomain;
use order_ftp_engine::db_types::{FtpCredentials, FtpSettings};

pub const SHOP: &str = "velocity-test.myshopify.com";

pub fn shop() -> ShopDomain {
    SHOP.parse().unwrap()
}

pub fn saved_settings() -> FtpSettings {
    let timestamp = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
    FtpSettings {
        shop: shop(),
        credentials: FtpCredentials::new("ftp.example.com", 21, "merchant", "s3cret"),
        created_at: timestamp,
        updated_at: timestamp,
    }
}

/// Build an app with the given configuration, send it a single request, and return the status and body.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}
