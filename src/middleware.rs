/* src/middleware.rs */

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request},
    http::{HeaderMap, StatusCode, request::Parts},
    response::Response,
};
use futures_util::future::BoxFuture;
use std::{
    net::{IpAddr, SocketAddr},
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::debug;

use crate::error::BestIpError;
use crate::extractor::{IpExtractor, REMOTE_ADDR};
use crate::selector::BestIp;

/// Extension that holds the resolved client address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp {
    ip: IpAddr,
    routable: bool,
}

impl ClientIp {
    /// Get the IP address.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Whether the address is public.
    pub fn is_routable(&self) -> bool {
        self.routable
    }
}

impl TryFrom<BestIp> for ClientIp {
    type Error = BestIpError;

    fn try_from(best: BestIp) -> Result<Self, Self::Error> {
        Ok(Self {
            ip: best.ip_addr()?,
            routable: best.routable,
        })
    }
}

/// Metadata lookup over axum request headers and the peer address.
///
/// `HTTP_X_FORWARDED_FOR` reads the `x-forwarded-for` header; repeated
/// headers are joined with `", "`. `REMOTE_ADDR` only ever comes from the
/// socket, never from a header.
pub fn header_lookup(
    headers: &HeaderMap,
    remote: Option<IpAddr>,
) -> impl Fn(&str) -> Option<String> + '_ {
    move |key: &str| {
        if key.eq_ignore_ascii_case(REMOTE_ADDR) || key.eq_ignore_ascii_case("REMOTE-ADDR") {
            return remote.map(|ip| ip.to_string());
        }

        let name = key
            .strip_prefix("HTTP_")
            .unwrap_or(key)
            .replace('_', "-")
            .to_ascii_lowercase();

        let values: Vec<&str> = headers
            .get_all(name.as_str())
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }
}

fn resolve(extractor: &IpExtractor, headers: &HeaderMap, remote: Option<IpAddr>) -> BestIp {
    extractor.extract(&header_lookup(headers, remote))
}

/// Layer for resolving client addresses from HTTP requests.
///
/// Stores the result as a [`ClientIp`] request extension that handlers can
/// extract.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use best_ip::{BestIpLayer, ClientIp};
///
/// async fn handler(client: ClientIp) -> String {
///     client.ip().to_string()
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(BestIpLayer::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BestIpLayer {
    extractor: IpExtractor,
}

impl BestIpLayer {
    /// Create a new layer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new layer with custom extractor configuration.
    pub fn with_extractor(extractor: IpExtractor) -> Self {
        Self { extractor }
    }
}

impl<S> Layer<S> for BestIpLayer {
    type Service = BestIpService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BestIpService {
            inner,
            extractor: self.extractor.clone(),
        }
    }
}

/// Service that resolves client addresses.
#[derive(Debug, Clone)]
pub struct BestIpService<S> {
    inner: S,
    extractor: IpExtractor,
}

impl<S> Service<Request> for BestIpService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let remote = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0.ip());

        let best = resolve(&self.extractor, req.headers(), remote);
        match ClientIp::try_from(best) {
            Ok(client_ip) => {
                req.extensions_mut().insert(client_ip);
            }
            Err(err) => debug!(error = %err, "Client IP not resolved"),
        }

        let future = self.inner.call(req);
        Box::pin(async move { future.await })
    }
}

/// Axum extractor for the client address.
///
/// Uses the extension set by [`BestIpLayer`] when present, otherwise resolves
/// with the default configuration.
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(client_ip) = parts.extensions.get::<ClientIp>() {
            return Ok(client_ip.clone());
        }

        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0.ip());

        let best = resolve(&IpExtractor::default(), &parts.headers, remote);
        ClientIp::try_from(best)
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Unable to determine client IP"))
    }
}
