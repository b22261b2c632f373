use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// One entry of the backend's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default, deserialize_with = "crate::utils::opaque_id")]
    pub id: String,
    pub user_name: String,
    pub description: String,
    #[serde(
        default,
        deserialize_with = "crate::utils::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Description substring match, optionally narrowed to one exact user name.
pub fn filter_logs<'a>(logs: &'a [LogEntry], term: &str, user: Option<&str>) -> Vec<&'a LogEntry> {
    logs.iter()
        .filter(|log| contains_ignore_case(&log.description, term))
        .filter(|log| user.map_or(true, |u| log.user_name == u))
        .collect()
}

pub fn log_users(logs: &[LogEntry]) -> Vec<String> {
    logs.iter()
        .map(|log| log.user_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
