use clap::{Parser, Subcommand};
use shiftbell_client::NotificationStore;
use shiftbell_core::Notification;
use shiftbell_sdk::NotifyClient;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "shiftbell-cli")]
#[command(about = "Shiftbell notification CLI client")]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Bearer token for the authenticated session
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notifications
    List {
        /// Only show unread notifications
        #[arg(long)]
        unread_only: bool,
    },
    /// Show the unread notification count
    Unread,
    /// Mark one notification as read
    MarkRead {
        /// Notification id
        id: i64,
    },
    /// Mark all notifications as read
    MarkAllRead,
    /// Delete a notification
    Remove {
        /// Notification id
        id: i64,
    },
    /// Notification preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Push device registrations
    Devices {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Send a test push notification to yourself
    TestPush,
    /// Poll the unread count and print changes
    Watch {
        /// Poll interval in seconds
        #[arg(long, default_value = "30")]
        interval: u64,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Show the current preferences document
    Get,
    /// Replace the preferences document with the given JSON
    Set {
        /// Preferences document as JSON
        json: String,
    },
}

#[derive(Subcommand)]
enum DeviceAction {
    /// List registered devices
    List,
    /// Register a push token
    Register {
        /// Platform-issued push token
        token: String,
        /// Human-readable device label
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a device registration
    Remove {
        /// Device id
        id: i64,
    },
}

fn print_notification(n: &Notification) {
    let read = if n.is_read { " " } else { "●" };
    println!(
        "{} {:>6}  [{}] {}",
        read,
        n.id,
        n.notification_type,
        n.title
    );
    if !n.body.is_empty() {
        println!("           {}", n.body);
    }
    println!("           {}", n.created_at.format("%Y-%m-%d %H:%M:%S"));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut client = NotifyClient::new(&cli.server);
    if let Some(token) = &cli.token {
        client.set_token(token);
    }

    match cli.command {
        Commands::List { unread_only } => {
            let notifications = client.list_notifications(unread_only).await?;
            println!("📬 Notifications ({} total):", notifications.len());
            for n in &notifications {
                print_notification(n);
            }
        }
        Commands::Unread => {
            let count = client.unread_count().await?;
            println!("🔔 Unread: {}", count);
        }
        Commands::MarkRead { id } => {
            client.mark_read(id).await?;
            println!("✅ Marked {} as read", id);
        }
        Commands::MarkAllRead => {
            client.mark_all_read().await?;
            println!("✅ Marked all notifications as read");
        }
        Commands::Remove { id } => {
            client.remove_notification(id).await?;
            println!("🗑️ Removed notification {}", id);
        }
        Commands::Prefs { action } => match action {
            PrefsAction::Get => {
                let prefs = client.get_preferences().await?;
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            }
            PrefsAction::Set { json } => {
                let prefs = serde_json::from_str(&json)?;
                let stored = client.update_preferences(&prefs).await?;
                println!("✅ Preferences updated:");
                println!("{}", serde_json::to_string_pretty(&stored)?);
            }
        },
        Commands::Devices { action } => match action {
            DeviceAction::List => {
                let devices = client.list_devices().await?;
                println!("📱 Devices ({} total):", devices.len());
                for d in &devices {
                    println!(
                        "  {:>4}  {}  ({})",
                        d.id,
                        d.device_name.as_deref().unwrap_or("unnamed"),
                        d.token
                    );
                }
            }
            DeviceAction::Register { token, name } => {
                let device = client.register_device(&token, name.as_deref()).await?;
                println!("✅ Registered device {}", device.id);
            }
            DeviceAction::Remove { id } => {
                client.remove_device(id).await?;
                println!("🗑️ Removed device {}", id);
            }
        },
        Commands::TestPush => {
            client.test_push().await?;
            println!("✅ Test push requested");
        }
        Commands::Watch { interval } => {
            let store = NotificationStore::new(Arc::new(client))
                .with_poll_interval(Duration::from_secs(interval));
            store.start_polling().await;

            let mut last = store.unread_count();
            println!("🔔 Unread: {} (Ctrl-C to stop)", last);
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(Duration::from_secs(1)) => {
                        let current = store.unread_count();
                        if current != last {
                            println!("🔔 Unread: {}", current);
                            last = current;
                        }
                    }
                }
            }
            store.stop_polling().await;
        }
    }

    Ok(())
}
