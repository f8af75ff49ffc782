/* demos/axum.rs */

use axum::{Router, extract::ConnectInfo, response::Json, routing::get};
use best_ip::{BestIpLayer, ClientIp, IpExtractor, ProxyOrder};
use serde_json::json;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("best_ip=debug")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_app();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();

    println!("Server starting on http://localhost:3000");
    println!("Test with headers:");
    println!("  curl -H 'X-Forwarded-For: 177.139.233.139, 10.0.0.1' http://localhost:3000/ip");
    println!(
        "  curl -H 'X-Forwarded-For: 10.0.0.1, 177.139.233.139' http://localhost:3000/right-most/ip"
    );
    println!("  curl -H 'X-Real-IP: 192.168.1.10' http://localhost:3000/ip");
    println!();

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

fn create_app() -> Router {
    let default_router = Router::new()
        .route("/ip", get(ip_handler))
        .layer(BestIpLayer::default());

    let right_most_router = Router::new()
        .route("/ip", get(ip_handler))
        .layer(BestIpLayer::with_extractor(
            IpExtractor::new().proxy_order(ProxyOrder::RightMost),
        ));

    Router::new()
        .merge(default_router)
        .nest("/right-most", right_most_router)
        .route("/debug", get(debug_handler))
}

/// Handler that returns the resolved address in JSON format
async fn ip_handler(client: ClientIp) -> Json<serde_json::Value> {
    let ip = client.ip();

    Json(json!({
        "client_ip": ip.to_string(),
        "ip_version": match ip {
            std::net::IpAddr::V4(_) => "IPv4",
            std::net::IpAddr::V6(_) => "IPv6",
        },
        "routable": client.is_routable(),
    }))
}

/// Debug handler comparing the resolved address with the socket peer
async fn debug_handler(
    client: ClientIp,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: axum::http::HeaderMap,
) -> Json<serde_json::Value> {
    let lookup = best_ip::header_lookup(&headers, Some(addr.ip()));
    let probed = best_ip::DEFAULT_META_KEYS
        .iter()
        .filter_map(|key| {
            best_ip::get_request_meta(&lookup, key).map(|value| (key.to_string(), value))
        })
        .collect::<std::collections::HashMap<String, String>>();

    Json(json!({
        "client_ip": client.ip().to_string(),
        "routable": client.is_routable(),
        "remote_addr": addr.to_string(),
        "probed_metadata": probed,
        "ip_matches_connection": client.ip() == addr.ip(),
    }))
}
