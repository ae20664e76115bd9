pub mod config;
pub mod transport;

pub use config::TransportConfig;
pub use transport::ReqwestTransport;

use scorecard_core::{AppError, AuthTransport, CachingTransport, RateLimitTransport};

/// The full outbound chain: cache, then rate limiting, then auth, then the network.
pub type ScorecardTransport =
    CachingTransport<RateLimitTransport<AuthTransport<ReqwestTransport>>>;

/// Assemble the transport chain described by `config`.
pub fn build_transport(config: &TransportConfig) -> Result<ScorecardTransport, AppError> {
    let network = ReqwestTransport::with_timeout(config.timeout)?;

    let auth = AuthTransport::new(network, config.token.as_deref())?;
    if !auth.is_authenticated() {
        tracing::warn!(
            "{} not set; using unauthenticated (heavily rate-limited) API access",
            config::TOKEN_ENV
        );
    }

    let rate_limited = RateLimitTransport::new(auth, config.rate_limit.clone());
    Ok(CachingTransport::new(rate_limited))
}
