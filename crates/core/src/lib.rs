//! pk-core: state that survives between monitoring check invocations
//!
//! This crate provides:
//! - Persistence keys naming a check's store region and lock file
//! - A cross-process file lock guard with bounded retry
//! - A durable JSON store in a process-independent directory
//! - Probe wrappers that load state before and save it after probing
//! - The coordinator that ties one invocation together

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod guard;
pub mod key;
pub mod persistent;
pub mod probe;
pub mod store;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, StateConfig};
pub use coordinator::{Coordinator, CoordinatorError, Evaluate, Outcome, Verdict};
pub use guard::{Guard, GuardError, LockPolicy};
pub use key::{PersistenceKey, ResourceNames};
pub use persistent::{PersistentResource, PersistentValue, ResourceError};
pub use probe::{Metric, MetricValue, Probe, ProbeError, Warnings};
pub use store::{Store, StoreError};
