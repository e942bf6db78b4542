use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type UserId = uuid::Uuid;

/// How sweep notifications reach a user.
///
/// `Silent` suppresses delivery entirely, `Summary` is the brief overlay
/// form, `Detailed` the full message. Exactly one of these applies per
/// user; the dispatcher owns what each one means on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Silent,
    Summary,
    Detailed,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Channel::Silent => "Silent",
            Channel::Summary => "Summary",
            Channel::Detailed => "Detailed",
        };
        f.write_str(s)
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Silent" => Ok(Channel::Silent),
            "Summary" => Ok(Channel::Summary),
            "Detailed" => Ok(Channel::Detailed),
            other => Err(anyhow::anyhow!("Invalid Channel value: {}", other)),
        }
    }
}

/// One durable preference row: a user's explicit channel override.
///
/// Users without a record follow the configured default; records equal to
/// the default are deleted rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRecord {
    pub user_id: UserId,
    pub channel: Channel,
}
