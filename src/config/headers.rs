//! HTTP header name constants.
//!
//! This module lists the headers the relay removes before forwarding a request
//! or relaying a response.

/// Request headers that are never forwarded upstream.
///
/// Covers the hop-by-hop set from RFC 9110, the host header (reqwest derives it
/// from the target URL), and headers that identify the proxy deployment or the
/// browser page that called it.
pub const STRIPPED_REQUEST_HEADERS: &[&str] = &[
    "host",
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
    // The client does no decompression, so upstream bodies must arrive as-is
    "accept-encoding",
    "origin",
    "referer",
    "x-real-ip",
];

/// Request header prefixes that are never forwarded upstream.
/// Any header starting with one of these is dropped.
pub const STRIPPED_REQUEST_HEADER_PREFIXES: &[&str] = &["x-vercel-", "x-forwarded-"];

/// Response headers dropped when relaying an upstream response.
/// The server recomputes framing headers for the relayed body.
pub const STRIPPED_RESPONSE_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];
