//! Serial runner for the navigation rspec suites.

use std::fmt::Debug;
use std::sync::Arc;

use rspec::block::Context;
use rspec::report::Report;
use rspec::{ConfigurationBuilder, Logger, Runner};

/// Builds a `given` suite around `fixture` and runs it on the calling thread.
///
/// Scenarios share one Bevy `App`, so they must not run in parallel. The
/// surrounding `#[test]` fails when any scenario fails.
pub fn run_scenarios<T, F>(given: &'static str, fixture: T, body: F)
where
    T: Clone + Send + Sync + Debug,
    F: FnOnce(&mut Context<T>),
{
    let suite = rspec::given(given, fixture, body);
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![logger]).run(&suite);
    assert!(
        report.is_success(),
        "{} of the '{given}' scenarios failed",
        report.get_failed()
    );
}
