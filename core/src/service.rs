use async_trait::async_trait;
use studybuddy_backend_client::ApiError;
use studybuddy_backend_client::BackendClient;
use studybuddy_backend_client::Group;
use studybuddy_backend_client::GroupId;
use studybuddy_backend_client::Member;
use studybuddy_backend_client::SearchResponse;
use studybuddy_backend_client::UnreadCountMap;

/// Backend operations the discovery engine and the activity notifier
/// consume. Implemented by [`BackendClient`] for production and by
/// in-memory fakes in tests, so neither subsystem needs a reachable
/// backend to be exercised.
#[async_trait]
pub trait GroupService: Send + Sync {
    async fn search_groups(&self, subject: &str) -> Result<SearchResponse, ApiError>;
    async fn join_group(&self, group_id: GroupId) -> Result<(), ApiError>;
    async fn group_members(&self, group_id: GroupId) -> Result<Vec<Member>, ApiError>;
    async fn my_groups(&self) -> Result<Vec<Group>, ApiError>;
    async fn unread_post_counts(&self) -> Result<UnreadCountMap, ApiError>;
    async fn mark_posts_read(&self, group_id: GroupId) -> Result<(), ApiError>;
}

#[async_trait]
impl GroupService for BackendClient {
    async fn search_groups(&self, subject: &str) -> Result<SearchResponse, ApiError> {
        BackendClient::search_groups(self, subject).await
    }

    async fn join_group(&self, group_id: GroupId) -> Result<(), ApiError> {
        BackendClient::join_group(self, group_id).await
    }

    async fn group_members(&self, group_id: GroupId) -> Result<Vec<Member>, ApiError> {
        BackendClient::group_members(self, group_id).await
    }

    async fn my_groups(&self) -> Result<Vec<Group>, ApiError> {
        Ok(BackendClient::my_groups(self).await?.groups)
    }

    async fn unread_post_counts(&self) -> Result<UnreadCountMap, ApiError> {
        BackendClient::unread_post_counts(self).await
    }

    async fn mark_posts_read(&self, group_id: GroupId) -> Result<(), ApiError> {
        BackendClient::mark_posts_read(self, group_id).await
    }
}
