//! Durable key-value client settings.
//!
//! The study-buddy client persists exactly two pieces of state across
//! sessions: the opaque session token attached to every backend request and
//! the user's notification preference. Both live behind the [`SettingsStore`]
//! trait so the engine and notifier can be tested without touching the
//! filesystem; [`JsonFileSettings`] is the on-disk backend used by the CLI
//! and [`MemorySettings`] backs tests.

mod error;
mod store;

pub use error::SettingsError;
pub use store::JsonFileSettings;
pub use store::MemorySettings;
pub use store::SettingsStore;

/// Key holding the bearer token for authenticated backend calls.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the JSON snapshot of the logged-in user.
pub const AUTH_USER_KEY: &str = "authUser";

/// Key holding the notification preference; absent means enabled.
pub const TOAST_NOTIFICATIONS_KEY: &str = "toastNotificationsEnabled";
