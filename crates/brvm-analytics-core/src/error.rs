use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient history: {usable} usable year(s), at least {required} required")]
    InsufficientHistory { usable: usize, required: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AnalyticsError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalyticsError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = AnalyticsError::invalid("balance_sheet.cash", "must not be negative (got -5)");
        assert_eq!(
            err.to_string(),
            "Invalid input: balance_sheet.cash — must not be negative (got -5)"
        );

        let err = AnalyticsError::InsufficientHistory {
            usable: 1,
            required: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient history: 1 usable year(s), at least 2 required"
        );
    }
}
