use garde::Validate;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// The request payload for issuing a session.
///
/// `user_id` is opaque; only its length is checked.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[garde(length(min = 1, max = 255))]
    pub user_id: String,
    #[garde(email)]
    pub email: String,
}

/// Validates a session request.
///
/// # Arguments
///
/// * `request` - The request to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the request is valid.
pub fn validate_create_session(request: &CreateSessionRequest) -> Result<()> {
    request
        .validate()
        .map_err(|report| AppError::Validation(report.to_string()))
}
