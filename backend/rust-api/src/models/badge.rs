use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::lenient;

/// A badge row as stored. Older rows carry the award time under
/// different field casings, so all of them are kept and resolved through
/// [`EarnedBadge::best_timestamp`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EarnedBadge {
    #[serde(rename = "badgeId", alias = "badge_id", default, deserialize_with = "lenient::opt_i64")]
    pub badge_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "awardedAt", default, deserialize_with = "lenient::opt_timestamp")]
    pub awarded_at: Option<DateTime<Utc>>,
    #[serde(rename = "awarded_at", default, deserialize_with = "lenient::opt_timestamp")]
    pub awarded_at_snake: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "created_at", default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at_snake: Option<DateTime<Utc>>,
}

impl EarnedBadge {
    /// `awardedAt`, then `awarded_at`, then `createdAt`, then `created_at`.
    pub fn best_timestamp(&self) -> Option<DateTime<Utc>> {
        self.awarded_at
            .or(self.awarded_at_snake)
            .or(self.created_at)
            .or(self.created_at_snake)
    }

    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.best_timestamp().unwrap_or_default()
    }
}

/// Badge as shown on the student dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeView {
    pub badge_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub awarded_at: Option<DateTime<Utc>>,
}

impl From<EarnedBadge> for BadgeView {
    fn from(badge: EarnedBadge) -> Self {
        let awarded_at = badge.best_timestamp();
        Self {
            badge_id: badge.badge_id,
            name: badge.name,
            description: badge.description,
            icon: badge.icon,
            awarded_at,
        }
    }
}
