//! `evac-sim` — tick loop orchestrator for the evac framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.end_tick():
//!   ① Spawn      — if a wave is due, add its agents on the primary journey
//!                  with desired speed 0.
//!   ② Intents    — on re-evaluation ticks after premovement, call
//!                  BehaviorModel::reevaluate for every active agent
//!                  (parallel with the `parallel` feature).
//!   ③ Apply      — for each decision in ascending AgentId order:
//!                    switch_journey(..) then set_desired_speed(..).
//!                  Recoverable failures leave the agent untouched.
//!   ④ Step       — advance the motion engine; exited agents disappear.
//! ```
//!
//! # Modules
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`builder`]  | `SimBuilder`                                           |
//! | [`config`]   | `ScenarioConfig` JSON scenario files                   |
//! | [`observer`] | `SimObserver`, `DecisionRecord`                        |
//! | [`sim`]      | `Sim`, `JourneyTable`, `TickSummary`                   |
//! | [`spawn`]    | `SpawnArea`, `Spawner`, `distribute_in_area`           |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the intent phase on Rayon's thread pool.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use evac_sim::{NoopObserver, ScenarioConfig};
//!
//! let scenario = ScenarioConfig::load(Path::new("scenario.json"))?;
//! let mut sim = scenario.build_sim(Arc::new(visibility_map))?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod spawn;


pub use builder::{DEFAULT_REEVALUATION_SECS, SimBuilder};
pub use config::{
    ExitConfig, ExitsConfig, NavGraphConfig, RouteConfig, ScenarioConfig, ScenarioSim,
    SpawnConfig, SpeedConfig, WaypointConfig,
};
pub use error::{SimError, SimResult};
pub use observer::{DecisionRecord, NoopObserver, SimObserver};
pub use sim::{JourneyTable, Sim, TickSummary};
pub use spawn::{SpawnArea, Spawner, distribute_in_area};
