use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "grand_exchanger";

/// Crate-level filter: debug output only when verbose, silent otherwise.
fn crate_filter(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    Targets::new().with_target(CRATE_TARGET, level)
}

/// Installs the global subscriber. Logs go to stderr as compact single lines
/// so that measurement lines on stdout stay machine readable.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "off" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(crate_filter(verbose))
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_verbose_enables_crate_debug() {
        let filter = crate_filter(true);
        assert!(filter.would_enable("grand_exchanger::providers::util", &Level::DEBUG));
        assert!(!filter.would_enable("grand_exchanger", &Level::TRACE));
        assert!(!filter.would_enable("reqwest", &Level::DEBUG));
    }

    #[test]
    fn test_quiet_by_default() {
        let filter = crate_filter(false);
        assert!(!filter.would_enable("grand_exchanger", &Level::ERROR));
    }
}
