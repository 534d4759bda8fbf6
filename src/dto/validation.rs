//! Validation helpers for DTOs.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// JSON body extractor that runs [`Validate`] before handing the payload over.
///
/// Both malformed JSON and validation failures answer 400 with the usual error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Usernames: letters, digits, `_`, `-` and `.` only.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        let mut err = ValidationError::new("username_format");
        err.message =
            Some("username may only contain letters, digits, `_`, `-` and `.`".into());
        return Err(err);
    }
    Ok(())
}

/// RFC 3339 timestamp such as `2026-03-01T18:00:00Z`.
pub fn validate_timestamp(value: &str) -> Result<(), ValidationError> {
    if super::parse_timestamp(value).is_none() {
        let mut err = ValidationError::new("timestamp_format");
        err.message = Some(format!("`{value}` is not an RFC 3339 timestamp").into());
        return Err(err);
    }
    Ok(())
}

/// `min_teams` full teams of `players_per_team` must fit into `max_participants`.
pub fn validate_team_layout(
    max_participants: u32,
    min_teams: u32,
    players_per_team: u32,
) -> Result<(), ValidationError> {
    let required = u64::from(min_teams) * u64::from(players_per_team);
    if required > u64::from(max_participants) {
        let mut err = ValidationError::new("team_layout");
        err.message = Some(
            format!(
                "{min_teams} teams of {players_per_team} players need {required} slots \
                 but max_participants is {max_participants}"
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Spring Cup").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("zero_cool").is_ok());
        assert!(validate_username("acid.burn-95").is_ok());
        assert!(validate_username("crash override").is_err()); // space
        assert!(validate_username("l33t!").is_err()); // punctuation
    }

    #[test]
    fn test_validate_timestamp() {
        assert!(validate_timestamp("2026-03-01T18:00:00Z").is_ok());
        assert!(validate_timestamp("2026-03-01").is_err());
    }

    #[test]
    fn test_validate_team_layout() {
        assert!(validate_team_layout(10, 2, 5).is_ok());
        assert!(validate_team_layout(8, 2, 5).is_err());
        assert!(validate_team_layout(2, 2, 1).is_ok());
    }
}
