use std::{net::IpAddr, str::FromStr};

use actix_web::HttpRequest;
use hmac::{Hmac, Mac};
use log::{debug, trace, warn};
use regex::Regex;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, data: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(data);
    Some(mac)
}

/// Calculate the base64-encoded HMAC-SHA256 of `data`, the way Shopify signs webhook bodies.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> Option<String> {
    keyed_mac(secret, data).map(|mac| base64::encode(mac.finalize().into_bytes()))
}

/// Check a base64-encoded signature against `data` in constant time.
pub fn verify_hmac(secret: &str, data: &[u8], signature: &str) -> bool {
    let Ok(expected) = base64::decode(signature.trim()) else {
        warn!("🔐️ HMAC signature is not valid base64.");
        return false;
    };
    keyed_mac(secret, data).map(|mac| mac.verify_slice(&expected).is_ok()).unwrap_or(false)
}

/// Compare a shared token in constant time. Both sides are run through an HMAC first, so the comparison does not
/// leak the token's length either.
pub fn tokens_match(expected: &str, provided: &str) -> bool {
    let Some(expected) = calculate_mac_bytes(expected) else {
        return false;
    };
    keyed_mac(TOKEN_MAC_KEY, provided.as_bytes()).map(|mac| mac.verify_slice(&expected).is_ok()).unwrap_or(false)
}

const TOKEN_MAC_KEY: &str = "ofr-admin-token";

fn calculate_mac_bytes(token: &str) -> Option<Vec<u8>> {
    keyed_mac(TOKEN_MAC_KEY, token.as_bytes()).map(|mac| mac.finalize().into_bytes().to_vec())
}

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set to true in the configuration.
/// 2. The `Forwarded` header, iif `use_forwarded` is set to true in the configuration.
/// 3. The peer address from the connection info.
pub fn get_remote_ip(req: &HttpRequest, use_x_forwarded_for: bool, use_forwarded: bool) -> Option<IpAddr> {
    let mut result = None;
    if use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        // The left-most entry is the originating client
        result = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| IpAddr::from_str(s.trim()).ok());
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        result = req.headers().get("Forwarded").and_then(|v| v.to_str().ok()).and_then(forwarded_for);
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.peer_addr().map(|a| a.ip());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr
    })
}

fn forwarded_for(header: &str) -> Option<IpAddr> {
    let re = Regex::new(r#"for="?(?P<ip>[^;,"]+)"#).ok()?;
    re.captures(header).and_then(|caps| caps.name("ip")).and_then(|m| IpAddr::from_str(m.as_str()).ok())
}
