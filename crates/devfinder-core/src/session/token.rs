//! Request token minting.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::debug;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Mint a request token from OS randomness, formatted as a UUID.
///
/// Falls back to `<unix-millis>-<hex suffix>` when the OS source fails.
pub fn mint_request_id() -> String {
    let mut bytes = [0u8; 16];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string(),
        Err(e) => {
            debug!(error = %e, "OS randomness unavailable, using timestamp token");
            fallback_request_id()
        }
    }
}

/// Mint a token guaranteed to differ from `previous`.
pub fn mint_distinct(previous: &str) -> String {
    loop {
        let token = mint_request_id();
        if token != previous {
            return token;
        }
    }
}

pub(crate) fn fallback_request_id() -> String {
    let now = Utc::now();
    let n = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mixed = (u64::from(now.timestamp_subsec_nanos()) << 16)
        ^ n.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ u64::from(std::process::id());
    format!("{}-{:012x}", now.timestamp_millis(), mixed & 0xffff_ffff_ffff)
}
