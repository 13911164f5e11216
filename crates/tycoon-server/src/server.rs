//! HTTP server lifecycle.
//!
//! [`start_server`] resolves the configured [`ApiConfig`] address, binds,
//! and serves the game API until `Ctrl-C`, then drains in-flight requests
//! before returning.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tycoon_core::config::ApiConfig;

use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// `server.host` is not an IP address.
    #[error("invalid listen host {host:?}: {source}")]
    InvalidHost {
        /// The configured host.
        host: String,
        /// The parse failure.
        source: AddrParseError,
    },

    /// The listener could not bind.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: SocketAddr,
        /// The I/O failure.
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("serve error: {source}")]
    Serve {
        /// The I/O failure.
        source: std::io::Error,
    },
}

/// The socket address described by `config`.
///
/// # Errors
///
/// Returns [`ServerError::InvalidHost`] if the host is not a literal IPv4
/// or IPv6 address.
pub fn listen_addr(config: &ApiConfig) -> Result<SocketAddr, ServerError> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|source| ServerError::InvalidHost {
            host: config.host.clone(),
            source,
        })?;
    Ok(SocketAddr::new(ip, config.port))
}

/// Bind to the configured address and serve the game API.
///
/// Returns `Ok(())` once a shutdown signal has been received and open
/// connections have finished.
///
/// # Errors
///
/// Returns [`ServerError`] if the address is invalid, the listener cannot
/// bind, or the accept loop fails.
pub async fn start_server(config: &ApiConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, "Tycoon server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| ServerError::Serve { source })?;

    info!("Tycoon server stopped");
    Ok(())
}

/// Resolves on `Ctrl-C`. If the handler cannot be installed the server
/// keeps running until the process is killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::DateTime;
    use tycoon_core::clock::ManualClock;
    use tycoon_core::config::TycoonConfig;
    use tycoon_core::random::ScriptedRandom;
    use tycoon_core::Engine;

    use super::*;

    fn api(host: &str, port: u16) -> ApiConfig {
        ApiConfig {
            host: host.to_owned(),
            port,
        }
    }

    fn app_state() -> Arc<AppState> {
        let clock = ManualClock::new(DateTime::from_timestamp(0, 0).unwrap());
        let engine = Engine::new(
            TycoonConfig::default(),
            Box::new(clock),
            Box::new(ScriptedRandom::new()),
        );
        Arc::new(AppState::new(engine))
    }

    #[test]
    fn default_api_config_listens_on_all_interfaces() {
        let addr = listen_addr(&ApiConfig::default()).unwrap();
        assert_eq!(addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn ipv6_host_is_accepted() {
        let addr = listen_addr(&api("::1", 8000)).unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn hostname_is_rejected() {
        let err = listen_addr(&api("game.local", 5000)).unwrap_err();
        assert!(matches!(err, ServerError::InvalidHost { ref host, .. } if host == "game.local"));
    }

    #[tokio::test]
    async fn start_server_reports_invalid_host() {
        let err = start_server(&api("nowhere", 5000), app_state())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidHost { .. }));
    }

    #[tokio::test]
    async fn start_server_reports_port_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = start_server(&api("127.0.0.1", port), app_state())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Bind { addr, .. } if addr.port() == port));
    }
}
