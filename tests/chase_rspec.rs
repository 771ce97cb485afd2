#![cfg_attr(
    feature = "test-support",
    doc = "Behavioural tests for the one-shot chase using rust-rspec."
)]
#![cfg_attr(
    not(feature = "test-support"),
    doc = "Behavioural tests require the `test-support` feature."
)]
#![cfg(feature = "test-support")]
//! Behavioural test: the chase trigger spawns one pursuer that ends once.

#[path = "support/scenarios.rs"]
mod scenarios;

#[path = "support/nav_fixture.rs"]
mod nav_fixture;

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use aislewalk::surface::rect::RectSurface;
use aislewalk::{
    ChaseDirector, ChaseEndReason, ChaseEnded, ChaseResetRequest, ChaseSettings, ChaseTarget,
    ChaseTriggerRequest, NavConfig, NavigationPlugin, NavigationServices, RigMotion, RigSettings,
    WaypointContainer,
};
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use nav_fixture::{GuardedApp, NavFixtureBase};
use rspec::block::Context as Scenario;
use scenarios::run_scenarios;
use test_utils::agents::{EventLog, RecordingAgentHost};
use test_utils::raycast::ScriptedRayCaster;
use test_utils::scenes::aisle_container;

const SPAWN: Vec3 = Vec3::new(5.0, 0.0, 5.0);
const END: Vec3 = Vec3::new(15.0, 0.0, 5.0);

fn floor() -> RectSurface {
    RectSurface::new(Vec2::ZERO, Vec2::splat(20.0), 0.0)
}

/// Event log of the host installed by the most recent [`build_app`].
fn host_log() -> &'static Mutex<Option<EventLog>> {
    static LOG: OnceLock<Mutex<Option<EventLog>>> = OnceLock::new();
    LOG.get_or_init(Mutex::default)
}

#[derive(Resource, Debug, Default, Clone)]
struct Endings(Arc<Mutex<Vec<ChaseEndReason>>>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn record_ending(event: On<ChaseEnded>, endings: Res<Endings>) {
    endings
        .0
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(event.event().reason);
}

fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(NavigationServices {
        raycaster: Box::new(ScriptedRayCaster::with_floor(0.0)),
        surface: Box::new(floor()),
    });
    app.insert_resource(WaypointContainer(aisle_container()));
    app.insert_resource(RigMotion::new(
        Vec3::new(0.0, 1.6, 0.0),
        RigSettings::default(),
    ));

    let host = RecordingAgentHost::new(floor());
    *host_log().lock().unwrap_or_else(PoisonError::into_inner) = Some(host.log());
    app.insert_resource(ChaseDirector::new(
        Box::new(host),
        ChaseSettings::default(),
        SPAWN,
        Some(END),
    ));
    // The player stands beyond the end point so the pursuer passes it.
    app.insert_resource(ChaseTarget(Some(Vec3::new(18.0, 1.6, 5.0))));
    app.init_resource::<Endings>();
    app.add_observer(record_ending);
    app.add_plugins(NavigationPlugin::new(NavConfig::default()));
    app
}

/// Fixture for chase scenarios.
#[derive(Debug, Clone)]
struct ChaseFixture {
    base: NavFixtureBase,
}

impl ChaseFixture {
    fn bootstrap() -> Self {
        Self {
            base: NavFixtureBase::new(build_app),
        }
    }

    fn app_guard(&self) -> MutexGuard<'_, GuardedApp> {
        self.base.app_guard()
    }

    fn fresh(&self) {
        self.base.rebuild();
        self.base.tick();
    }

    fn trigger(&self) {
        self.app_guard().world_mut().trigger(ChaseTriggerRequest);
    }

    fn reset(&self) {
        self.app_guard().world_mut().trigger(ChaseResetRequest);
    }

    fn log(&self) -> EventLog {
        host_log()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .expect("build_app should install a host")
    }

    fn endings(&self) -> Vec<ChaseEndReason> {
        let app = self.app_guard();
        let endings = app.world().resource::<Endings>();
        let reasons = endings.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
        reasons
    }

    fn has_agent(&self) -> bool {
        self.app_guard()
            .world()
            .resource::<ChaseDirector>()
            .has_agent()
    }
}

#[test]
fn chase_trigger_behaviour() {
    let fixture = ChaseFixture::bootstrap();

    run_scenarios(
        "a chase armed at the spawn marker",
        fixture,
        |scenario: &mut Scenario<ChaseFixture>| {
            scenario.when("the trigger fires twice", |ctx| {
                ctx.before_each(|state| {
                    state.fresh();
                    state.trigger();
                    state.trigger();
                });

                ctx.then("exactly one pursuer is spawned", |state| {
                    assert_eq!(state.log().spawn_count(), 1);
                    assert!(state.has_agent());
                });
            });

            scenario.when("the pursuer runs past the end point", |ctx| {
                ctx.before_each(|state| {
                    state.fresh();
                    state.trigger();
                    state.base.tick_n(80);
                });

                ctx.then("the chase ends once and the pursuer is removed", |state| {
                    assert_eq!(state.endings(), [ChaseEndReason::ReachedEndPoint]);
                    assert!(!state.has_agent());
                    assert_eq!(state.log().live(), 0);
                });

                ctx.then("the trigger stays latched", |state| {
                    state.trigger();
                    assert!(!state.has_agent());
                    assert_eq!(state.log().spawn_count(), 1);
                });
            });

            scenario.when("the chase is reset after ending", |ctx| {
                ctx.before_each(|state| {
                    state.fresh();
                    state.trigger();
                    state.base.tick_n(80);
                    state.reset();
                    state.trigger();
                });

                ctx.then("a second pursuer starts", |state| {
                    assert_eq!(state.log().spawn_count(), 2);
                    assert!(state.has_agent());
                });
            });
        },
    );
}
