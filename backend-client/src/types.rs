use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Stable backend identifier of a study group.
pub type GroupId = i64;

/// Hard member cap enforced by the backend; the client must not issue a
/// join once a group has reached it.
pub const GROUP_CAPACITY: u32 = 6;

/// A capacity-bounded study circle tied to one academic subject. The client
/// only ever holds read-only, possibly stale copies of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub is_member: bool,
    /// Members sharing an interest with the current user, as scored by the
    /// backend's recommendation pass.
    #[serde(default)]
    pub same_interest_members: u32,
}

impl Group {
    pub fn has_capacity(&self) -> bool {
        self.member_count < GROUP_CAPACITY
    }
}

/// Response of a subject search: a general result collection plus at most
/// one backend-suggested group, to be merged rather than shown separately.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub recommended_group: Option<Group>,
    #[serde(default)]
    pub all_groups: Vec<Group>,
}

/// One entry of a group's member roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
}

/// Groups the current user belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyGroupsResponse {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Per-group unread forum post counts, keyed by group id. `BTreeMap` keeps
/// the iteration order ascending by id, which pins down which group a
/// notification names when several counts rise in the same poll.
pub type UnreadCountMap = BTreeMap<GroupId, u64>;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub major: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Response of both the register and login endpoints. Login omits the user
/// snapshot on some backend versions, so it stays optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
