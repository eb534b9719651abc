use studybuddy_backend_client::ApiError;
use studybuddy_backend_client::GroupId;
use thiserror::Error;

/// Errors of the discovery engine. The precondition variants are raised
/// locally, before any network call is made; the backend is only asked to
/// join groups the client already believes are joinable.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("group {0} is not in the current result list")]
    UnknownGroup(GroupId),

    #[error("group {0} is already full")]
    GroupFull(GroupId),

    #[error("already a member of group {0}")]
    AlreadyMember(GroupId),

    #[error(transparent)]
    Api(#[from] ApiError),
}
