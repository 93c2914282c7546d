use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tournament {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub location: String,
    pub maps_link: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub fee: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle phase derived from the current time and the start/end window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl Tournament {
    /// Derive the lifecycle status at `now`. A zero-duration window is
    /// ongoing only at the single instant `now == start`.
    pub fn status_at(&self, now: DateTime<Utc>) -> TournamentStatus {
        TournamentStatus::derive(now, self.start_date, self.end_date)
    }

    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        now <= self.registration_deadline
    }
}

impl TournamentStatus {
    pub fn derive(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            TournamentStatus::Upcoming
        } else if now <= end {
            TournamentStatus::Ongoing
        } else {
            TournamentStatus::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_upcoming_before_start() {
        let start = ts("2024-06-01T10:00:00Z");
        let end = ts("2024-06-01T18:00:00Z");
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(
            TournamentStatus::derive(now, start, end),
            TournamentStatus::Upcoming
        );
    }

    #[test]
    fn test_ongoing_inside_window() {
        let start = ts("2024-06-01T10:00:00Z");
        let end = ts("2024-06-01T18:00:00Z");
        let now = ts("2024-06-01T12:00:00Z");
        assert_eq!(
            TournamentStatus::derive(now, start, end),
            TournamentStatus::Ongoing
        );
    }

    #[test]
    fn test_completed_after_end() {
        let start = ts("2024-06-01T10:00:00Z");
        let end = ts("2024-06-01T18:00:00Z");
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(
            TournamentStatus::derive(now, start, end),
            TournamentStatus::Completed
        );
    }

    #[test]
    fn test_ongoing_at_boundaries() {
        let start = ts("2024-06-01T10:00:00Z");
        let end = ts("2024-06-01T18:00:00Z");
        assert_eq!(
            TournamentStatus::derive(start, start, end),
            TournamentStatus::Ongoing
        );
        assert_eq!(
            TournamentStatus::derive(end, start, end),
            TournamentStatus::Ongoing
        );
    }

    #[test]
    fn test_zero_duration_window() {
        let instant = ts("2024-06-01T10:00:00Z");
        assert_eq!(
            TournamentStatus::derive(instant, instant, instant),
            TournamentStatus::Ongoing
        );
        assert_eq!(
            TournamentStatus::derive(instant + chrono::Duration::seconds(1), instant, instant),
            TournamentStatus::Completed
        );
    }
}
