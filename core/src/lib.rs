//! Core client logic of the study-buddy app: subject-based group discovery
//! with capacity-aware joins, and the unread-activity notifier that turns
//! polled per-group counts into at-most-one notification per detected
//! increase.
//!
//! Both subsystems talk to the backend through the [`GroupService`] trait
//! and read durable flags through `studybuddy_settings::SettingsStore`, so
//! they run unchanged against the real HTTP client or in-memory fakes.

mod discovery;
mod error;
mod focus;
mod notifier;
mod service;

pub use discovery::GroupDiscoveryEngine;
pub use discovery::merge_groups;
pub use error::DiscoveryError;
pub use focus::FocusSignal;
pub use notifier::ActivityNotification;
pub use notifier::ActivityNotifier;
pub use notifier::DEFAULT_POLL_INTERVAL;
pub use notifier::spawn_poller;
pub use service::GroupService;

#[cfg(test)]
mod testing;
