#![cfg(feature = "test-support")]
//! Shared fixture for behavioural tests that drive `NavigationPlugin`.
//!
//! The rspec suites tick a Bevy `App` and need to:
//! - share that `App` across rspec closures,
//! - rebuild it from scratch before each scenario, and
//! - run `app.finish()` / `app.cleanup()` exactly once per build.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

/// Simulated seconds per tick.
pub const TICK: Duration = Duration::from_millis(50);

#[derive(Resource, Debug, Default)]
struct PluginsFinalized;

/// Navigation `App` that can sit inside an rspec environment.
#[derive(Debug)]
pub struct GuardedApp(App);

impl Deref for GuardedApp {
    type Target = App;

    fn deref(&self) -> &App {
        &self.0
    }
}

impl DerefMut for GuardedApp {
    fn deref_mut(&mut self) -> &mut App {
        &mut self.0
    }
}

// SAFETY: the app is only reached through `NavFixtureBase::app_guard`, which
// holds the mutex, and `run_scenarios` drives every scenario on one thread.
unsafe impl Send for GuardedApp {}
unsafe impl Sync for GuardedApp {}

/// Owns a rebuildable `App` behind a mutex.
#[derive(Debug, Clone)]
pub struct NavFixtureBase {
    app: Arc<Mutex<GuardedApp>>,
    build: fn() -> App,
}

impl NavFixtureBase {
    /// Creates the fixture; `build` produces a fully configured `App`.
    #[must_use]
    pub fn new(build: fn() -> App) -> Self {
        Self {
            app: Arc::new(Mutex::new(GuardedApp(Self::prepare(build)))),
            build,
        }
    }

    fn prepare(build: fn() -> App) -> App {
        let mut app = build();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));
        app
    }

    /// Replaces the `App` with a freshly built one.
    pub fn rebuild(&self) {
        let mut guard = self.app_guard();
        guard.0 = Self::prepare(self.build);
    }

    /// Locks the underlying `App` for direct inspection or mutation.
    pub fn app_guard(&self) -> MutexGuard<'_, GuardedApp> {
        self.app.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advances the application by `count` ticks.
    ///
    /// The first tick after a rebuild finalizes plugins and runs start-up.
    pub fn tick_n(&self, count: usize) {
        let mut app = self.app_guard();
        if app.world().get_resource::<PluginsFinalized>().is_none() {
            app.finish();
            app.cleanup();
            app.insert_resource(PluginsFinalized);
        }
        for _ in 0..count {
            app.update();
        }
    }

    /// Advances the application by a single tick.
    pub fn tick(&self) {
        self.tick_n(1);
    }
}
