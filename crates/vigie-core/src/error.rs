use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VigieError {
    #[error("invalid product input: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unsupported category '{0}'. Expected one of: food, cosmetics, detergents")]
    UnsupportedCategory(String),

    #[error("failed to load table from {path}: {reason}")]
    TableLoad { path: PathBuf, reason: String },

    #[error("invalid table: {0}")]
    TableInvalid(String),

    #[error("failed to load config from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VigieError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        VigieError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's product input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VigieError::Validation { .. } | VigieError::UnsupportedCategory(_)
        )
    }

    /// Remediation hint for input errors, suitable for showing to the caller.
    pub fn hint(&self) -> Option<String> {
        match self {
            VigieError::Validation { field, .. } => Some(match field.as_str() {
                "ingredients" => {
                    "ingredients required: provide a non-empty ingredientsText or ingredientsList"
                        .to_string()
                }
                "category" => "category required: one of food, cosmetics, detergents".to_string(),
                other => format!("check the '{other}' field of the product"),
            }),
            VigieError::UnsupportedCategory(_) => {
                Some("use one of: food, cosmetics, detergents".to_string())
            }
            _ => None,
        }
    }
}
