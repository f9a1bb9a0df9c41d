//! Request handler definitions
//!
//! The settings API and the health check live here. The Shopify webhook handler has its own module,
//! [`crate::webhook_routes`].
//!
//! Handlers are generic over the settings store and the uploader so that the endpoint tests can run them against
//! mocks. FTP sessions block, so the uploader runs them on the blocking thread pool and the handlers only ever await.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use ofr_common::ShopDomain;
use order_ftp_engine::{
    db_types::{FtpSettingsView, NewFtpSettings},
    traits::{FtpSettingsStore, OrderUploader},
    OrderRelayApi,
};

use crate::{
    data_objects::{FtpSettingsForm, JsonResponse, ShopStatus},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Register the settings API routes. The caller is responsible for wrapping them in the admin token middleware.
pub fn configure_settings_routes<B, U>(cfg: &mut web::ServiceConfig)
where
    B: FtpSettingsStore + 'static,
    U: OrderUploader + 'static,
{
    cfg.service(FetchFtpSettingsRoute::<B, U>::new())
        .service(SaveFtpSettingsRoute::<B, U>::new())
        .service(TestFtpConnectionRoute::<B, U>::new())
        .service(ShopStatusRoute::<B, U>::new());
}

fn parse_shop(path: web::Path<String>) -> Result<ShopDomain, ServerError> {
    path.into_inner().parse::<ShopDomain>().map_err(|e| ServerError::InvalidRequestPath(e.to_string()))
}

// ----------------------------------------------   FTP settings  ----------------------------------------------------
route!(fetch_ftp_settings => Get "/shops/{shop}/ftp_settings" impl FtpSettingsStore, OrderUploader);
pub async fn fetch_ftp_settings<B, U>(
    path: web::Path<String>,
    api: web::Data<OrderRelayApi<B, U>>,
) -> Result<HttpResponse, ServerError>
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    let shop = parse_shop(path)?;
    debug!("💻️ GET FTP settings for {shop}");
    let settings = api
        .fetch_settings(&shop)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No FTP settings saved for {shop}")))?;
    Ok(HttpResponse::Ok().json(FtpSettingsView::from(&settings)))
}

route!(save_ftp_settings => Post "/shops/{shop}/ftp_settings" impl FtpSettingsStore, OrderUploader);
pub async fn save_ftp_settings<B, U>(
    path: web::Path<String>,
    body: web::Json<FtpSettingsForm>,
    api: web::Data<OrderRelayApi<B, U>>,
) -> Result<HttpResponse, ServerError>
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    let shop = parse_shop(path)?;
    debug!("💻️ POST FTP settings for {shop}");
    let saved_password = api.fetch_settings(&shop).await?.map(|s| s.credentials.password);
    let credentials = body.into_inner().into_credentials(saved_password)?;
    let settings = api.save_settings(NewFtpSettings::new(shop, credentials)).await?;
    Ok(HttpResponse::Ok().json(FtpSettingsView::from(&settings)))
}

route!(test_ftp_connection => Post "/shops/{shop}/ftp_settings/test" impl FtpSettingsStore, OrderUploader);
pub async fn test_ftp_connection<B, U>(
    path: web::Path<String>,
    body: web::Json<FtpSettingsForm>,
    api: web::Data<OrderRelayApi<B, U>>,
) -> Result<HttpResponse, ServerError>
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    let shop = parse_shop(path)?;
    debug!("💻️ Testing FTP connection for {shop}");
    let saved_password = api.fetch_settings(&shop).await?.map(|s| s.credentials.password);
    let credentials = body.into_inner().into_credentials(saved_password)?;
    let result = match api.test_connection(&credentials).await {
        Ok(()) => {
            info!("💻️ FTP connection test for {shop} ({credentials}) succeeded");
            JsonResponse::success("Connection successful!")
        },
        Err(e) => {
            info!("💻️ FTP connection test for {shop} ({credentials}) failed. {e}");
            JsonResponse::failure(format!("FTP connection failed: {e}"))
        },
    };
    Ok(HttpResponse::Ok().json(result))
}

route!(shop_status => Get "/shops/{shop}/status" impl FtpSettingsStore, OrderUploader);
pub async fn shop_status<B, U>(
    path: web::Path<String>,
    api: web::Data<OrderRelayApi<B, U>>,
) -> Result<HttpResponse, ServerError>
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    let shop = parse_shop(path)?;
    debug!("💻️ GET status for {shop}");
    let has_ftp_settings = api.fetch_settings(&shop).await?.is_some();
    Ok(HttpResponse::Ok().json(ShopStatus { shop, has_ftp_settings }))
}
