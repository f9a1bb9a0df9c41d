use std::{env, net::IpAddr, path::PathBuf};

use log::*;
use ofr_common::{helpers::env_flag, Secret};

const DEFAULT_OFR_HOST: &str = "127.0.0.1";
const DEFAULT_OFR_PORT: u16 = 8370;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    /// The bearer token that guards the `/api` settings routes. If `None`, every admin request is refused.
    pub admin_token: Option<Secret<String>>,
    /// The directory where order files are staged before they are uploaded.
    pub temp_dir: PathBuf,
    /// Shopify app configuration
    pub shopify_config: ShopifyConfig,
}

#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    /// The app's API secret. Shopify signs webhook bodies with this key.
    pub api_secret: Secret<String>,
    pub hmac_checks: bool,
    /// If supplied, requests against /shopify endpoints will be checked against a whitelist of Shopify IP addresses.
    /// To explicitly disable the whitelist, set this to "false", "none", or "0".
    pub whitelist: Option<Vec<IpAddr>>,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self { api_secret: Secret::default(), hmac_checks: true, whitelist: None }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OFR_HOST.to_string(),
            port: DEFAULT_OFR_PORT,
            database_url: String::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            admin_token: None,
            temp_dir: env::temp_dir(),
            shopify_config: ShopifyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OFR_HOST").ok().unwrap_or_else(|| DEFAULT_OFR_HOST.into());
        let port = env::var("OFR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OFR_PORT. {e} Using the default, {DEFAULT_OFR_PORT}, instead."
                    );
                    DEFAULT_OFR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OFR_PORT);
        let database_url = order_ftp_engine::db_url();
        let shopify_config = ShopifyConfig::from_env_or_defaults();
        let use_x_forwarded_for = env_flag("OFR_USE_X_FORWARDED_FOR", false);
        let use_forwarded = env_flag("OFR_USE_FORWARDED", false);
        let admin_token = env::var("OFR_ADMIN_TOKEN").ok().filter(|s| !s.trim().is_empty()).map(Secret::new);
        if admin_token.is_none() {
            warn!(
                "🪛️ OFR_ADMIN_TOKEN is not set. The settings API is disabled and will refuse every request until a \
                 token is configured."
            );
        }
        let temp_dir = env::var("OFR_TEMP_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            let dir = env::temp_dir();
            info!("🪛️ OFR_TEMP_DIR is not set. Order files will be staged in {}", dir.display());
            dir
        });
        Self { host, port, database_url, use_x_forwarded_for, use_forwarded, admin_token, temp_dir, shopify_config }
    }
}

impl ShopifyConfig {
    pub fn from_env_or_defaults() -> Self {
        let api_secret = env::var("OFR_SHOPIFY_API_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ OFR_SHOPIFY_API_SECRET is not set. Please set it to the API secret for your Shopify app. Until \
                 then every webhook will be rejected."
            );
            String::default()
        });
        let api_secret = Secret::new(api_secret);
        let hmac_checks = env_flag("OFR_SHOPIFY_HMAC_CHECKS", true);
        if !hmac_checks {
            warn!("🚨️ Shopify HMAC checks are DISABLED. Anyone can post orders to the webhook endpoint. 🚨️");
        }
        let whitelist = env::var("OFR_SHOPIFY_IP_WHITELIST").ok().and_then(|s| parse_whitelist(&s));
        match &whitelist {
            Some(whitelist) if whitelist.is_empty() => {
                warn!(
                    "🚨️ The Shopify IP whitelist was configured, but is empty.  The server will run, but won't \
                     authorise any Shopify incoming requests."
                );
            },
            None => {
                info!("🪛️ No Shopify IP whitelist is set. Only HMAC validation will be used.");
            },
            Some(v) => {
                let addrs = v.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                info!("🪛️ Shopify IP whitelist: {addrs}");
            },
        }
        Self { api_secret, hmac_checks, whitelist }
    }
}

fn parse_whitelist(s: &str) -> Option<Vec<IpAddr>> {
    if ["none", "false", "0", ""].contains(&s.trim().to_lowercase().as_str()) {
        info!(
            "🪛️ Shopify IP whitelist is disabled. If this is not what you want, set OFR_SHOPIFY_IP_WHITELIST to a \
             comma-separated list of IP addresses to enable it."
        );
        return None;
    }
    let ip_addrs = s
        .split(',')
        .filter_map(|s| {
            s.trim()
                .parse()
                .map_err(|e| {
                    warn!("🪛️ Ignoring invalid IP address ({s}) in OFR_SHOPIFY_IP_WHITELIST: {e}");
                })
                .ok()
        })
        .collect::<Vec<IpAddr>>();
    Some(ip_addrs)
}

//-------------------------------------------------  WebhookOptions  ---------------------------------------------------
/// The subset of the configuration the webhook handler needs.
#[derive(Clone, Debug)]
pub struct WebhookOptions {
    pub hmac_secret: Secret<String>,
    pub hmac_checks: bool,
}

impl WebhookOptions {
    pub fn new(hmac_secret: Secret<String>, hmac_checks: bool) -> Self {
        Self { hmac_secret, hmac_checks }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.shopify_config.api_secret.clone(), config.shopify_config.hmac_checks)
    }
}
