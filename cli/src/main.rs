use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use studybuddy_backend_client::BackendClient;
use studybuddy_backend_client::GROUP_CAPACITY;
use studybuddy_backend_client::Group;
use studybuddy_backend_client::GroupId;
use studybuddy_backend_client::Member;
use studybuddy_backend_client::RegisterRequest;
use studybuddy_core::ActivityNotifier;
use studybuddy_core::FocusSignal;
use studybuddy_core::GroupDiscoveryEngine;
use studybuddy_core::GroupService;
use studybuddy_core::spawn_poller;
use studybuddy_settings::JsonFileSettings;
use studybuddy_settings::SettingsStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studybuddy", about = "Study-group matching client")]
struct Cli {
    /// Base URL of the backend API.
    #[arg(long, env = "STUDY_BUDDY_API", default_value = "http://localhost:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and start a session.
    Register {
        email: String,
        password: String,
        name: String,
        major: String,
    },
    /// Log in and persist the session token.
    Login { email: String, password: String },
    /// Drop the stored session.
    Logout,
    /// Show the logged-in user's profile.
    Profile,
    /// Search study groups for a subject.
    Search { subject: String },
    /// Join a group found under a subject search.
    Join { subject: String, group_id: GroupId },
    /// List the member roster of a group.
    Members { group_id: GroupId },
    /// List the groups you belong to.
    MyGroups,
    /// Mark a group's forum posts as read.
    MarkRead { group_id: GroupId },
    /// Poll for new forum activity and print notifications.
    Watch {
        /// Poll interval in milliseconds.
        #[arg(long, default_value_t = 5000)]
        interval_ms: u64,
    },
    /// Enable, disable, or show activity notifications.
    Notifications {
        #[command(subcommand)]
        state: NotificationsCommand,
    },
}

#[derive(Subcommand)]
enum NotificationsCommand {
    On,
    Off,
    Status,
}

fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STUDY_BUDDY_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".study-buddy"))
}

fn print_groups(groups: &[Group]) {
    if groups.is_empty() {
        println!("No groups found for this subject yet.");
        return;
    }
    for group in groups {
        let membership = if group.is_member { " (member)" } else { "" };
        println!(
            "#{} {} [{}/{GROUP_CAPACITY}]{membership}",
            group.id, group.name, group.member_count
        );
        if let Some(description) = &group.description {
            println!("    {description}");
        }
    }
}

fn print_members(members: &[Member]) {
    if members.is_empty() {
        println!("No members in this group yet.");
        return;
    }
    for member in members {
        let name = member.name.as_deref().unwrap_or("Unnamed user");
        let detail = member
            .email
            .as_deref()
            .or(member.major.as_deref())
            .unwrap_or("");
        println!("- {name} {detail}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let settings: Arc<dyn SettingsStore> =
        Arc::new(JsonFileSettings::load(data_dir()?.join("settings.json")));
    let client = BackendClient::new(cli.api_url.as_str(), settings.clone())?;
    let service: Arc<dyn GroupService> = Arc::new(client.clone());

    match cli.command {
        Command::Register {
            email,
            password,
            name,
            major,
        } => {
            let auth = client
                .register(&RegisterRequest {
                    email,
                    password,
                    name,
                    major,
                })
                .await?;
            println!("{}", auth.message.unwrap_or_else(|| "Registered.".into()));
        }
        Command::Login { email, password } => {
            let auth = client.login(&email, &password).await?;
            println!("{}", auth.message.unwrap_or_else(|| "Logged in.".into()));
        }
        Command::Logout => {
            client.logout();
            println!("Session cleared.");
        }
        Command::Profile => {
            let profile = client.profile().await?;
            println!("Email: {}", profile.email);
            println!("Major: {}", profile.major.unwrap_or_default());
            if let Some(bio) = profile.bio {
                println!("Bio:   {bio}");
            }
        }
        Command::Search { subject } => {
            let engine = GroupDiscoveryEngine::new(service);
            let groups = engine.search(&subject).await?;
            print_groups(&groups);
        }
        Command::Join { subject, group_id } => {
            let engine = GroupDiscoveryEngine::new(service);
            engine.search(&subject).await?;
            engine.join(group_id).await?;
            println!("Joined group {group_id}.");
            print_groups(&engine.groups());
        }
        Command::Members { group_id } => {
            let engine = GroupDiscoveryEngine::new(service);
            match engine.view_members(group_id).await {
                Ok(members) => print_members(&members),
                Err(err) => {
                    // A failed roster fetch shows as an empty roster plus
                    // the error, not a crash.
                    eprintln!("Could not load members: {err}");
                    print_members(&[]);
                }
            }
        }
        Command::MyGroups => {
            let response = client.my_groups().await?;
            if response.groups.is_empty() {
                let message = response
                    .message
                    .unwrap_or_else(|| "You are not in any study group yet.".into());
                println!("{message}");
            } else {
                print_groups(&response.groups);
            }
        }
        Command::MarkRead { group_id } => {
            client.mark_posts_read(group_id).await?;
            println!("Marked group {group_id} as read.");
        }
        Command::Watch { interval_ms } => {
            let notifier = ActivityNotifier::new(service, settings);
            let (events, mut notifications) = mpsc::unbounded_channel();
            let shutdown = CancellationToken::new();
            let handle = spawn_poller(
                notifier,
                events,
                FocusSignal::new(),
                shutdown.clone(),
                Duration::from_millis(interval_ms),
            );
            println!("Watching for new posts, ctrl-c to stop.");
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    notification = notifications.recv() => match notification {
                        Some(n) => println!("{}: {} new post(s)", n.group_name, n.new_posts),
                        None => break,
                    },
                }
            }
            shutdown.cancel();
            handle.await?;
        }
        Command::Notifications { state } => match state {
            NotificationsCommand::On => {
                settings.set_notifications_enabled(true);
                println!("Notifications enabled.");
            }
            NotificationsCommand::Off => {
                settings.set_notifications_enabled(false);
                println!("Notifications disabled.");
            }
            NotificationsCommand::Status => {
                let state = if settings.notifications_enabled() {
                    "enabled"
                } else {
                    "disabled"
                };
                println!("Notifications are {state}.");
            }
        },
    }

    Ok(())
}
