//! Focus statistics and leaderboard models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Rows per leaderboard page.
pub const RANKINGS_PAGE_SIZE: u32 = 25;

/// Activity summary for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub hours_spent: f64,
    pub days_accessed: u32,
    pub current_streak: u32,
    /// Timestamp or date string as reported by the server
    pub last_active: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ActivitySummary {
    /// Parse `last_active` as an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
    pub fn last_active_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_active.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|datetime| datetime.and_utc())
    }

    pub fn last_active_label(&self) -> String {
        self.last_active_at().map_or_else(
            || self.last_active.trim().to_string(),
            |timestamp| timestamp.format("%Y-%m-%d").to_string(),
        )
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Seconds of focus time
    pub total_focus_time: u64,
    pub streak: u32,
}

/// One page of the leaderboard plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingsPage {
    pub users: Vec<UserStats>,
    pub total: u64,
}

impl RankingsPage {
    pub fn total_pages(&self, limit: u32) -> u64 {
        total_pages(self.total, limit)
    }
}

/// Number of pages needed to show `total` rows at `limit` rows per page.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// 1-based rank of the first row on `page`.
pub fn first_rank_on_page(page: u32, limit: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(limit) + 1
}

/// Render a focus duration in seconds as `"{hours}h {minutes}m"`.
pub fn format_focus_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_focus_time_floors_minutes() {
        assert_eq!(format_focus_time(0), "0h 0m");
        assert_eq!(format_focus_time(59), "0h 0m");
        assert_eq!(format_focus_time(3_725), "1h 2m");
        assert_eq!(format_focus_time(90_000), "25h 0m");
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, RANKINGS_PAGE_SIZE), 0);
        assert_eq!(total_pages(25, RANKINGS_PAGE_SIZE), 1);
        assert_eq!(total_pages(26, RANKINGS_PAGE_SIZE), 2);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn first_rank_on_page_is_one_based() {
        assert_eq!(first_rank_on_page(1, 25), 1);
        assert_eq!(first_rank_on_page(3, 25), 51);
        assert_eq!(first_rank_on_page(0, 25), 1);
    }

    #[test]
    fn summary_parses_last_active_formats() {
        let mut summary = ActivitySummary {
            hours_spent: 12.5,
            days_accessed: 9,
            current_streak: 3,
            last_active: "2026-10-18T21:15:00Z".to_string(),
            username: "focus".to_string(),
            avatar_url: None,
        };
        assert_eq!(summary.last_active_label(), "2026-10-18");

        summary.last_active = "2026-10-17".to_string();
        assert_eq!(summary.last_active_label(), "2026-10-17");

        summary.last_active = "yesterday".to_string();
        assert!(summary.last_active_at().is_none());
        assert_eq!(summary.last_active_label(), "yesterday");
    }

    #[test]
    fn rankings_page_decodes_wire_shape() {
        let page: RankingsPage = serde_json::from_str(
            r#"{"users":[{"id":"u1","username":"ana","avatarUrl":null,"totalFocusTime":7200,"streak":4}],"total":51}"#,
        )
        .unwrap();
        assert_eq!(page.users[0].total_focus_time, 7200);
        assert_eq!(page.total_pages(RANKINGS_PAGE_SIZE), 3);
    }
}
