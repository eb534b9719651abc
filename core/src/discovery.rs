use crate::error::DiscoveryError;
use crate::service::GroupService;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use studybuddy_backend_client::Group;
use studybuddy_backend_client::GroupId;
use studybuddy_backend_client::Member;
use tracing::debug;

/// Merge a subject search response into one deduplicated, order-preserving
/// list. Organic results come first in arrival order; the backend's
/// recommendation is appended last and only when it does not duplicate one
/// of them. The recommendation must never silently promote a group ahead of
/// organically-ranked results.
pub fn merge_groups(recommended: Option<Group>, all_groups: Vec<Group>) -> Vec<Group> {
    let mut merged = Vec::with_capacity(all_groups.len() + 1);
    let mut seen: HashSet<GroupId> = HashSet::new();
    for group in all_groups {
        if seen.insert(group.id) {
            merged.push(group);
        }
    }
    if let Some(group) = recommended
        && seen.insert(group.id)
    {
        merged.push(group);
    }
    merged
}

#[derive(Default)]
struct EngineState {
    groups: Vec<Group>,
    last_subject: Option<String>,
    joining: HashSet<GroupId>,
}

/// Turns subject queries into a single capacity-annotated candidate list
/// and performs joins against it.
///
/// The engine is shared behind an `Arc`; the state lock is never held
/// across an await. Overlapping searches therefore race freely and the
/// last response to arrive wins the stored list.
pub struct GroupDiscoveryEngine {
    service: Arc<dyn GroupService>,
    state: Mutex<EngineState>,
}

impl GroupDiscoveryEngine {
    pub fn new(service: Arc<dyn GroupService>) -> Self {
        Self {
            service,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Fetch and merge the groups for `subject`. On failure the previous
    /// list is cleared: it belonged to another query and keeping it would
    /// show stale candidates under the new subject heading.
    pub async fn search(&self, subject: &str) -> Result<Vec<Group>, DiscoveryError> {
        match self.service.search_groups(subject).await {
            Ok(response) => {
                let merged = merge_groups(response.recommended_group, response.all_groups);
                let mut state = self.state();
                state.groups = merged.clone();
                state.last_subject = Some(subject.to_string());
                Ok(merged)
            }
            Err(err) => {
                self.state().groups.clear();
                Err(err.into())
            }
        }
    }

    /// Join a group from the current list, then re-run the last search so
    /// the displayed member counts and membership flags are fresh.
    ///
    /// Preconditions are checked locally and an ineligible join never
    /// reaches the network. A join already in flight for the same id is an
    /// idempotent no-op; joins for different ids proceed independently.
    pub async fn join(&self, group_id: GroupId) -> Result<(), DiscoveryError> {
        let subject = {
            let mut state = self.state();
            let Some(group) = state.groups.iter().find(|g| g.id == group_id) else {
                return Err(DiscoveryError::UnknownGroup(group_id));
            };
            if group.is_member {
                return Err(DiscoveryError::AlreadyMember(group_id));
            }
            if !group.has_capacity() {
                return Err(DiscoveryError::GroupFull(group_id));
            }
            if !state.joining.insert(group_id) {
                debug!("join for group {group_id} already in flight, ignoring");
                return Ok(());
            }
            state.last_subject.clone()
        };

        let result = self.join_and_refresh(group_id, subject).await;
        self.state().joining.remove(&group_id);
        result
    }

    async fn join_and_refresh(
        &self,
        group_id: GroupId,
        subject: Option<String>,
    ) -> Result<(), DiscoveryError> {
        self.service.join_group(group_id).await?;
        if let Some(subject) = subject {
            self.search(&subject).await?;
        }
        Ok(())
    }

    /// Read-only roster fetch; does not touch the merged list.
    pub async fn view_members(&self, group_id: GroupId) -> Result<Vec<Member>, DiscoveryError> {
        Ok(self.service.group_members(group_id).await?)
    }

    /// Snapshot of the last merged result list.
    pub fn groups(&self) -> Vec<Group> {
        self.state().groups.clone()
    }

    pub fn last_subject(&self) -> Option<String> {
        self.state().last_subject.clone()
    }

    /// Whether a join for `group_id` is currently in flight (the UI keeps
    /// the button disabled while this is true).
    pub fn is_joining(&self, group_id: GroupId) -> bool {
        self.state().joining.contains(&group_id)
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
