use crate::focus::FocusSignal;
use crate::service::GroupService;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use studybuddy_backend_client::ApiError;
use studybuddy_backend_client::GroupId;
use studybuddy_backend_client::UnreadCountMap;
use studybuddy_settings::SettingsStore;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// How often unread counts are polled while the dashboard is visible.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// One human-visible "new activity" event: the first group (ascending id)
/// whose unread count rose since the previous snapshot, and by how much.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityNotification {
    pub group_id: GroupId,
    pub group_name: String,
    pub new_posts: u64,
}

/// Detects newly-arrived forum activity by diffing successive unread-count
/// snapshots.
///
/// The very first snapshot only establishes the baseline; deltas are
/// reported from the second snapshot on, so pre-existing unread posts never
/// produce a burst at session start. At most one notification is emitted
/// per evaluation even when several groups gained posts, to avoid flooding.
/// The persisted notification preference suppresses emission only: the
/// baseline keeps advancing while muted, so re-enabling does not replay
/// already-absorbed activity.
pub struct ActivityNotifier {
    service: Arc<dyn GroupService>,
    settings: Arc<dyn SettingsStore>,
    previous_counts: UnreadCountMap,
    group_names: HashMap<GroupId, String>,
}

impl ActivityNotifier {
    pub fn new(service: Arc<dyn GroupService>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            service,
            settings,
            previous_counts: UnreadCountMap::new(),
            group_names: HashMap::new(),
        }
    }

    /// Refresh the id → display-name map from the membership list, so
    /// notifications can name the group they are about.
    pub async fn refresh_membership(&mut self) -> Result<(), ApiError> {
        let groups = self.service.my_groups().await?;
        self.group_names = groups.into_iter().map(|g| (g.id, g.name)).collect();
        Ok(())
    }

    /// Fetch the current counts and diff them against the baseline. On
    /// fetch failure the baseline is left untouched and the next
    /// evaluation diffs against it as usual.
    pub async fn poll_once(&mut self) -> Result<Option<ActivityNotification>, ApiError> {
        let current = self.service.unread_post_counts().await?;
        Ok(self.absorb(current))
    }

    fn absorb(&mut self, current: UnreadCountMap) -> Option<ActivityNotification> {
        let notification = if self.previous_counts.is_empty() {
            // No baseline yet; this snapshot becomes it.
            None
        } else {
            current.iter().find_map(|(&group_id, &count)| {
                let before = self.previous_counts.get(&group_id).copied().unwrap_or(0);
                (count > before).then(|| ActivityNotification {
                    group_id,
                    group_name: self.display_name(group_id),
                    new_posts: count - before,
                })
            })
        };
        self.previous_counts = current;

        if !self.settings.notifications_enabled() {
            return None;
        }
        notification
    }

    fn display_name(&self, group_id: GroupId) -> String {
        self.group_names
            .get(&group_id)
            .cloned()
            .unwrap_or_else(|| format!("Group #{group_id}"))
    }
}

/// Run the notifier on a fixed interval, with an immediate extra evaluation
/// whenever `focus` fires. Notifications go to `events`; the task ends when
/// `shutdown` is cancelled or the receiver is dropped. A poll whose
/// response arrives after cancellation is discarded without touching the
/// baseline or emitting.
pub fn spawn_poller(
    mut notifier: ActivityNotifier,
    events: UnboundedSender<ActivityNotification>,
    focus: FocusSignal,
    shutdown: CancellationToken,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            result = notifier.refresh_membership() => {
                if let Err(err) = result {
                    warn!("membership fetch for notifier failed: {err}");
                }
            }
        }

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
                _ = focus.wait() => {}
            }
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = notifier.poll_once() => result,
            };
            match result {
                Ok(Some(notification)) => {
                    if events.send(notification).is_err() {
                        // Receiver gone; nobody is listening anymore.
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("unread count poll failed: {err}"),
            }
        }
    })
}
