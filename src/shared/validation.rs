use crate::shared::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON body extractor that runs `validator` rules before the handler sees the value
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten field errors into `field: message` pairs, sorted for stable output
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: {}", field, err.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Ethiopian mobile number in international form, e.g. `+251911234567`
pub fn validate_phone_number(phone: &str) -> Result<(), validator::ValidationError> {
    let valid = phone.len() == 13
        && phone.starts_with("+251")
        && matches!(phone.as_bytes()[4], b'7' | b'9')
        && phone[5..].bytes().all(|b| b.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("phone_number")
            .with_message("Phone number must match +2517XXXXXXXX or +2519XXXXXXXX".into()))
    }
}
