use crate::common::error::AppError;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct IpAddrInfo {
    /// `None` when neither a proxy header nor the socket gave a usable address.
    pub ip_addr: Option<IpAddr>,
}

/// The left-most `X-Forwarded-For` entry is the original client.
fn forwarded_ip(header: &str) -> Option<&str> {
    header.split(',').map(str::trim).find(|ip| !ip.is_empty())
}

/// Accepts a bare address or `address:port`, as some proxies send.
fn parse_ip(value: &str) -> Option<IpAddr> {
    let value = value.trim();
    IpAddr::from_str(value)
        .ok()
        .or_else(|| SocketAddr::from_str(value).ok().map(|addr| addr.ip()))
}

fn header_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let cf_ip = headers
        .get("CF-Connecting-IP")
        .and_then(|value| value.to_str().ok())
        .and_then(parse_ip);
    cf_ip.or_else(|| {
        headers
            .get("X-Forwarded-For")
            .and_then(|value| value.to_str().ok())
            .and_then(forwarded_ip)
            .and_then(parse_ip)
    })
}

fn get_ip_addr(parts: &Parts) -> IpAddrInfo {
    let ip_addr = header_ip(&parts.headers).or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.ip())
    });
    IpAddrInfo { ip_addr }
}

impl<S: Sync + Send> FromRequestParts<S> for IpAddrInfo {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(get_ip_addr(parts))
    }
}
