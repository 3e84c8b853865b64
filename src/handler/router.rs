//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! decoding, and dispatch into the static file pipeline.

use std::convert::Infallible;
use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use crate::cli::ServeContext;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    ctx: &ServeContext,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    // uri().path() never includes the query string
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let response = if let Some(resp) = check_method(&method) {
        resp
    } else {
        match decode_path(&path) {
            Ok(decoded) => static_files::serve(ctx, &decoded, &path, is_head).await,
            Err(InvalidPath) => {
                logger::log_warning(&format!("Malformed path from {peer_addr}: {path}"));
                http::build_400_response()
            }
        }
    };

    let body_bytes = response
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    logger::log_access(&AccessLogEntry::new(
        peer_addr,
        method.as_str(),
        &path,
        response.status().as_u16(),
        body_bytes,
    ));

    Ok(response)
}

/// Only GET and HEAD are served; anything else gets 405 with Allow.
fn check_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Marker for request paths that cannot be decoded.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidPath;

/// Decode percent-escapes in a request path.
///
/// Invalid escapes, non-UTF-8 results and embedded NUL bytes are rejected;
/// the caller answers 400.
fn decode_path(path: &str) -> Result<String, InvalidPath> {
    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| char::from(*b).to_digit(16));
            let lo = bytes.get(i + 2).and_then(|b| char::from(*b).to_digit(16));
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    decoded.push(u8::try_from(hi * 16 + lo).unwrap_or_default());
                    i += 3;
                }
                _ => return Err(InvalidPath),
            }
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    match String::from_utf8(decoded) {
        Ok(s) if !s.contains('\0') => Ok(s),
        _ => Err(InvalidPath),
    }
}
