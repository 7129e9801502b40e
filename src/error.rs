use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("You must be logged in.")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text a screen should show in its error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => self.to_string(),
            AppError::Validation(msg) | AppError::Upstream(msg) => msg.clone(),
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Something went wrong.".into()
            }
        }
    }

    /// Validation failures are fixed by correcting the form; everything else
    /// bubbles to the screen as a banner or retry affordance.
    pub fn is_recoverable_locally(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // Field name order keeps the reported message stable.
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);
        let message = fields
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input.".into());
        AppError::Validation(message)
    }
}

pub type AppResult<T> = Result<T, AppError>;
