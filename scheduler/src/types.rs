//! Shared types and the collaborator boundaries the engine calls out to.

use std::collections::BTreeSet;
use std::fmt;

use prefs::model::{Channel, UserId};

/// Which countdown produced an execution or notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Automatic,
    Manual,
}

impl Track {
    pub fn label(&self) -> &'static str {
        match self {
            Track::Automatic => "automatic",
            Track::Manual => "manual",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A message ready for delivery, plus how long the host should keep it
/// visible. Rendering per channel is the dispatcher's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub body: String,
    pub display_secs: u64,
}

/// Performs the actual entity removal. Lives on the host side (world and
/// entity registry access); the engine only hands it the filter and reads
/// back a count.
#[async_trait::async_trait]
pub trait CleanupExecutor: Send + Sync {
    /// Remove every entity in the filtered categories; returns how many
    /// were removed.
    async fn execute(&self, filter: &BTreeSet<String>) -> anyhow::Result<u64>;
}

/// Delivers one notification to one recipient on their chosen channel.
///
/// Implementations own the channel semantics in a single match over the
/// closed enum: `Silent` is a no-op, `Summary` the brief surface,
/// `Detailed` the full one.
#[async_trait::async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn deliver(
        &self,
        user_id: UserId,
        note: &Notification,
        channel: Channel,
    ) -> anyhow::Result<()>;
}

/// The host's connected-user registry.
#[async_trait::async_trait]
pub trait RecipientRegistry: Send + Sync {
    async fn list_recipients(&self) -> Vec<UserId>;
}
