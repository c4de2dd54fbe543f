//! Tracing initialization
//!
//! Log lines are stamped in Hong Kong time regardless of the host timezone.
//! The filter comes from `RUST_LOG` when set; otherwise the crate logs at
//! `info`, or `debug` when `DEBUG=true`.

use chrono::{FixedOffset, Utc};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const HKT_OFFSET_SECS: i32 = 8 * 3600;

/// Timer rendering `YYYY-MM-DD HH:MM:SS HKT`
#[derive(Debug, Clone, Copy, Default)]
pub struct HongKongTime;

impl HongKongTime {
    fn now() -> String {
        let now = match FixedOffset::east_opt(HKT_OFFSET_SECS) {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Utc::now().naive_utc(),
        };
        format!("{} HKT", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl FormatTime for HongKongTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Self::now())
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    let debug = std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(debug)))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))?;

    let fmt_layer = fmt::layer()
        .with_timer(HongKongTime)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

fn default_directives(debug: bool) -> &'static str {
    if debug {
        "essay_grader=debug,tower_http=debug"
    } else {
        "essay_grader=info,tower_http=info"
    }
}
