use crate::service::GroupService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use studybuddy_backend_client::ApiError;
use studybuddy_backend_client::Group;
use studybuddy_backend_client::GroupId;
use studybuddy_backend_client::Member;
use studybuddy_backend_client::SearchResponse;
use studybuddy_backend_client::UnreadCountMap;
use tokio::sync::Notify;

pub(crate) fn group(id: GroupId, name: &str, member_count: u32, is_member: bool) -> Group {
    Group {
        id,
        name: name.to_string(),
        subject: "Analízis".to_string(),
        description: None,
        member_count,
        is_member,
        same_interest_members: 0,
    }
}

pub(crate) fn member(id: i64, name: &str) -> Member {
    Member {
        id,
        name: Some(name.to_string()),
        email: None,
        major: None,
    }
}

pub(crate) fn counts(entries: &[(GroupId, u64)]) -> UnreadCountMap {
    entries.iter().copied().collect()
}

fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
    }
}

/// In-memory `GroupService` with scripted responses and call counters.
///
/// Unread-count feeds are consumed front to back; the final entry repeats
/// so long-running pollers keep getting a stable reading.
#[derive(Default)]
pub(crate) struct FakeGroupService {
    search_responses: Mutex<HashMap<String, SearchResponse>>,
    members: Mutex<Vec<Member>>,
    membership: Mutex<Vec<Group>>,
    counts_feed: Mutex<VecDeque<UnreadCountMap>>,
    join_gate: Mutex<Option<Arc<Notify>>>,
    pub(crate) fail_search: AtomicBool,
    pub(crate) fail_join: AtomicBool,
    pub(crate) fail_members: AtomicBool,
    pub(crate) fail_counts: AtomicBool,
    pub(crate) search_calls: AtomicUsize,
    pub(crate) join_calls: AtomicUsize,
}

impl FakeGroupService {
    pub(crate) fn set_search_response(&self, subject: &str, response: SearchResponse) {
        lock(&self.search_responses).insert(subject.to_string(), response);
    }

    pub(crate) fn set_members(&self, members: Vec<Member>) {
        *lock(&self.members) = members;
    }

    pub(crate) fn set_membership(&self, groups: Vec<Group>) {
        *lock(&self.membership) = groups;
    }

    pub(crate) fn push_counts(&self, counts: UnreadCountMap) {
        lock(&self.counts_feed).push_back(counts);
    }

    pub(crate) fn set_join_gate(&self, gate: Arc<Notify>) {
        *lock(&self.join_gate) = Some(gate);
    }

    pub(crate) fn clear_join_gate(&self) {
        *lock(&self.join_gate) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl GroupService for FakeGroupService {
    async fn search_groups(&self, subject: &str) -> Result<SearchResponse, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(api_error(502, "search backend unavailable"));
        }
        Ok(lock(&self.search_responses)
            .get(subject)
            .cloned()
            .unwrap_or_default())
    }

    async fn join_group(&self, _group_id: GroupId) -> Result<(), ApiError> {
        self.join_calls.fetch_add(1, Ordering::SeqCst);
        let gate = lock(&self.join_gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_join.load(Ordering::SeqCst) {
            return Err(api_error(400, "Már van tanulócsoportod ehhez a tárgyhoz."));
        }
        Ok(())
    }

    async fn group_members(&self, _group_id: GroupId) -> Result<Vec<Member>, ApiError> {
        if self.fail_members.load(Ordering::SeqCst) {
            return Err(api_error(500, "member lookup failed"));
        }
        Ok(lock(&self.members).clone())
    }

    async fn my_groups(&self) -> Result<Vec<Group>, ApiError> {
        Ok(lock(&self.membership).clone())
    }

    async fn unread_post_counts(&self) -> Result<UnreadCountMap, ApiError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(api_error(502, "count fetch failed"));
        }
        let mut feed = lock(&self.counts_feed);
        match feed.len() {
            0 => Ok(UnreadCountMap::new()),
            1 => Ok(feed
                .front()
                .cloned()
                .unwrap_or_default()),
            _ => Ok(feed.pop_front().unwrap_or_default()),
        }
    }

    async fn mark_posts_read(&self, _group_id: GroupId) -> Result<(), ApiError> {
        Ok(())
    }
}
