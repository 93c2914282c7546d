use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Tournament, TournamentStatus};

/// Request payload for creating a new tournament
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub location: String,

    pub maps_link: Option<String>,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    pub registration_deadline: DateTime<Utc>,

    #[validate(range(min = 1, message = "Must allow at least one participant"))]
    pub max_participants: i32,

    #[validate(custom(function = "validate_fee"))]
    #[serde(default)]
    pub fee: Decimal,
}

/// Request payload for updating an existing tournament. Only provided
/// fields are changed; the merged record is re-validated as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub location: Option<String>,

    /// Absent leaves the link unchanged; an explicit JSON null clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub maps_link: Option<Option<String>>,

    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,

    pub registration_deadline: Option<DateTime<Utc>>,

    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,

    #[validate(custom(function = "validate_fee"))]
    pub fee: Option<Decimal>,
}

/// Response containing tournament details, annotated with the derived status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
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
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Tournament> for TournamentResponse {
    fn from(t: Tournament) -> Self {
        let status = t.status_at(Utc::now());
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            location: t.location,
            maps_link: t.maps_link,
            start_date: t.start_date,
            end_date: t.end_date,
            registration_deadline: t.registration_deadline,
            max_participants: t.max_participants,
            current_participants: t.current_participants,
            fee: t.fee,
            status,
            created_at: t.created_at,
        }
    }
}

/// Distinguishes an absent field (`None`) from an explicit null
/// (`Some(None)`) when deserializing a partial update.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_fee(fee: &Decimal) -> Result<(), validator::ValidationError> {
    if fee.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_fee"));
    }
    Ok(())
}

impl CreateTournamentRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        if self.end_date <= self.start_date {
            return Err("end_date must be after start_date");
        }

        if self.registration_deadline > self.start_date {
            return Err("registration_deadline must be on or before start_date");
        }

        Ok(())
    }
}

impl UpdateTournamentRequest {
    /// Merge this partial update over an existing tournament, producing the
    /// full field set to validate and write.
    pub fn apply(&self, existing: &Tournament) -> CreateTournamentRequest {
        CreateTournamentRequest {
            name: self.name.clone().unwrap_or_else(|| existing.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| existing.description.clone()),
            location: self
                .location
                .clone()
                .unwrap_or_else(|| existing.location.clone()),
            maps_link: match &self.maps_link {
                Some(value) => value.clone(),
                None => existing.maps_link.clone(),
            },
            start_date: self.start_date.unwrap_or(existing.start_date),
            end_date: self.end_date.unwrap_or(existing.end_date),
            registration_deadline: self
                .registration_deadline
                .unwrap_or(existing.registration_deadline),
            max_participants: self.max_participants.unwrap_or(existing.max_participants),
            fee: self.fee.unwrap_or(existing.fee),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_request() -> CreateTournamentRequest {
        let start = Utc::now() + Duration::days(7);
        CreateTournamentRequest {
            name: "Summer Kubb Open".to_string(),
            description: "Annual summer tournament".to_string(),
            location: "Central Park".to_string(),
            maps_link: None,
            start_date: start,
            end_date: start + Duration::hours(8),
            registration_deadline: start - Duration::days(1),
            max_participants: 16,
            fee: Decimal::new(500, 2),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let req = valid_request();
        assert!(req.validate().is_ok());
        assert!(req.validate_dates().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut req = valid_request();
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut req = valid_request();
        req.max_participants = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut req = valid_request();
        req.fee = Decimal::new(-100, 2);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut req = valid_request();
        req.end_date = req.start_date - Duration::hours(1);
        assert!(req.validate_dates().is_err());
    }

    #[test]
    fn test_deadline_after_start_rejected() {
        let mut req = valid_request();
        req.registration_deadline = req.start_date + Duration::hours(1);
        assert!(req.validate_dates().is_err());
    }

    #[test]
    fn test_null_maps_link_clears_it_but_absent_keeps_it() {
        let req = valid_request();
        let existing = Tournament {
            id: 1,
            name: req.name.clone(),
            description: req.description.clone(),
            location: req.location.clone(),
            maps_link: Some("https://maps.example.com/park".to_string()),
            start_date: req.start_date,
            end_date: req.end_date,
            registration_deadline: req.registration_deadline,
            max_participants: req.max_participants,
            current_participants: 0,
            fee: req.fee,
            created_at: Utc::now(),
        };

        let update: UpdateTournamentRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(update.apply(&existing).maps_link, existing.maps_link);

        let update: UpdateTournamentRequest =
            serde_json::from_str(r#"{"maps_link": null}"#).unwrap();
        assert_eq!(update.apply(&existing).maps_link, None);

        let update: UpdateTournamentRequest =
            serde_json::from_str(r#"{"maps_link": "https://maps.example.com/beach"}"#).unwrap();
        assert_eq!(
            update.apply(&existing).maps_link,
            Some("https://maps.example.com/beach".to_string())
        );
    }

    #[test]
    fn test_partial_update_keeps_unset_fields() {
        let req = valid_request();
        let existing = Tournament {
            id: 1,
            name: req.name.clone(),
            description: req.description.clone(),
            location: req.location.clone(),
            maps_link: None,
            start_date: req.start_date,
            end_date: req.end_date,
            registration_deadline: req.registration_deadline,
            max_participants: req.max_participants,
            current_participants: 3,
            fee: req.fee,
            created_at: Utc::now(),
        };

        let update = UpdateTournamentRequest {
            max_participants: Some(32),
            ..Default::default()
        };

        let merged = update.apply(&existing);
        assert_eq!(merged.max_participants, 32);
        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.start_date, existing.start_date);
        assert!(merged.validate().is_ok());
        assert!(merged.validate_dates().is_ok());
    }
}
