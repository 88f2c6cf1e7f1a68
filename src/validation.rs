use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Flattens `validator` field errors into the single human-readable string
/// the API error body carries.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                error
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    parts.sort();
    parts.join(", ")
}

pub trait ValidateExt: Validate + Sized {
    /// Runs derive-based validation, mapping failures to a 400.
    fn validated(self) -> Result<Self, AppError> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(errors) => Err(AppError::Validation(validation_message(&errors))),
        }
    }
}

impl<T: Validate> ValidateExt for T {}
