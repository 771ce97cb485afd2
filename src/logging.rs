//! Logger bootstrap for the binary and for tests that want visible output.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter used when `RUST_LOG` is unset.
///
/// Only `aislewalk` targets follow `verbose`; Bevy and every other
/// dependency stay at `warn` so per-frame scheduler chatter does not drown
/// out navigation traces.
///
/// # Examples
/// ```
/// use aislewalk::logging::default_filter;
///
/// assert_eq!(default_filter(true), "warn,aislewalk=debug");
/// ```
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level.to_string().to_lowercase())
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, the step rejections and surface-query
/// fallbacks traced by the navigation modules are printed. `RUST_LOG`
/// overrides [`default_filter`].
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);

    // A second call finds the logger already set; tests rely on that being
    // harmless.
    let _ = builder.try_init();
}
