//! Typed client for the study-buddy REST backend.
//!
//! The backend is a black box reached over HTTP/JSON; this crate owns the
//! wire types and a thin [`BackendClient`] that attaches the stored session
//! token to every request and maps non-2xx responses to [`ApiError`] values
//! carrying the backend's error message.

mod client;
mod error;
mod types;

pub use client::BackendClient;
pub use error::ApiError;
pub use error::Result;
pub use types::AuthResponse;
pub use types::AuthUser;
pub use types::GROUP_CAPACITY;
pub use types::Group;
pub use types::GroupId;
pub use types::Member;
pub use types::MyGroupsResponse;
pub use types::Profile;
pub use types::RegisterRequest;
pub use types::SearchResponse;
pub use types::UnreadCountMap;
