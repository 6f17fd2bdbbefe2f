//! CORS-safe fetch relay.
//!
//! Browsers cannot call most update endpoints directly because of CORS. The
//! relay performs the request server-side and hands back the upstream status,
//! headers and body unchanged, apart from hop-by-hop headers.
//!
//! Every exchange (connect, request, full response body) is bounded by one
//! timeout. HTTP and HTTPS targets are handled the same way.

mod request;
mod response;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use reqwest::Client;

use crate::error_handling::{upstream_error, ProxyError};
use crate::utils::strip_query;

pub use request::{parse_target, strip_request_headers, ProxyRequest, TARGET_PARAM};
pub use response::{strip_response_headers, ProxiedResponse};

/// Anything that can carry a request to its upstream.
///
/// The dispatcher and the notifier are generic over this so they can be
/// driven by a recording fake in tests.
pub trait Forward: Send + Sync {
    /// Performs the exchange and returns the buffered upstream response.
    fn forward(
        &self,
        request: ProxyRequest,
    ) -> impl Future<Output = Result<ProxiedResponse, ProxyError>> + Send;
}

impl<T: Forward> Forward for Arc<T> {
    fn forward(
        &self,
        request: ProxyRequest,
    ) -> impl Future<Output = Result<ProxiedResponse, ProxyError>> + Send {
        (**self).forward(request)
    }
}

/// The `reqwest`-backed relay.
#[derive(Clone)]
pub struct Proxy {
    client: Arc<Client>,
    timeout: Duration,
}

impl Proxy {
    /// Creates a relay over a shared client.
    pub fn new(client: Arc<Client>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Upper bound for one exchange.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn exchange(&self, request: ProxyRequest) -> Result<ProxiedResponse, ProxyError> {
        let target = request.target.to_string();
        let carries_body = request.carries_body();

        let mut builder = self
            .client
            .request(request.method, request.target)
            .headers(request.headers);
        if carries_body {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| upstream_error(&target, &e))?;

        let status = response.status();
        let headers = strip_response_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| upstream_error(&target, &e))?;

        Ok(ProxiedResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

impl Forward for Proxy {
    async fn forward(&self, request: ProxyRequest) -> Result<ProxiedResponse, ProxyError> {
        let target = request.target.to_string();
        // Query strings may carry credentials and stay out of the logs
        let shown = strip_query(&target);
        let method = request.method.clone();
        let started = Instant::now();
        debug!("Relaying {} {}", method, shown);

        match tokio::time::timeout(self.timeout, self.exchange(request)).await {
            Ok(Ok(response)) => {
                debug!(
                    "{} {} -> {} in {:.2}s",
                    method,
                    shown,
                    response.status,
                    started.elapsed().as_secs_f64()
                );
                Ok(response)
            }
            Ok(Err(e)) => {
                warn!("Relay error: {}", e.redacted());
                Err(e)
            }
            Err(_) => {
                let elapsed_secs = started.elapsed().as_secs_f64();
                warn!("Relay timeout after {elapsed_secs:.1}s: {method} {shown}");
                Err(ProxyError::Timeout {
                    target,
                    elapsed_secs,
                })
            }
        }
    }
}
