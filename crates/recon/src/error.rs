use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// Roster file missing, unreadable, or without a single usable name.
    #[error("invalid roster '{resource}': {reason}")]
    InvalidRoster { resource: String, reason: String },
    /// Export file missing, unreadable, missing a configured column, or
    /// without a single usable data row.
    #[error("invalid export '{resource}': {reason}")]
    InvalidExport { resource: String, reason: String },
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad delimiter, half-set name columns, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// IO error outside the two input resources (report output, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl ReconError {
    pub(crate) fn roster(resource: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRoster {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn export(resource: &str, reason: impl Into<String>) -> Self {
        Self::InvalidExport {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_resource() {
        let err = ReconError::roster("classes/10.8.txt", "no usable names");
        assert_eq!(err.to_string(), "invalid roster 'classes/10.8.txt': no usable names");

        let err = ReconError::export("grades.csv", "missing column 'Full name'");
        assert_eq!(err.to_string(), "invalid export 'grades.csv': missing column 'Full name'");
    }
}
