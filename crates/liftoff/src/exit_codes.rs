//! Exit codes for the CLI

use liftoff_core::error::{ConfigError, GitError, LiftoffError, LogFormatError, ReleasePrError};

/// General error, or a negative check
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// Unreadable persisted input (commit log or release PR body)
pub const INPUT_ERROR: i32 = 6;

/// Exit code for a failed command
pub fn for_error(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<LiftoffError>() {
        return match e {
            LiftoffError::Config(_) => CONFIG_ERROR,
            LiftoffError::Git(_) => GIT_ERROR,
            LiftoffError::LogFormat(_) | LiftoffError::ReleasePr(_) => INPUT_ERROR,
            _ => ERROR,
        };
    }

    if error.is::<ConfigError>() {
        CONFIG_ERROR
    } else if error.is::<GitError>() {
        GIT_ERROR
    } else if error.is::<LogFormatError>() || error.is::<ReleasePrError>() {
        INPUT_ERROR
    } else {
        ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let config: anyhow::Error = LiftoffError::from(ConfigError::InvalidValue {
            field: "tags.root_format".to_string(),
            message: "missing {version}".to_string(),
        })
        .into();
        assert_eq!(for_error(&config), CONFIG_ERROR);

        let git: anyhow::Error = GitError::NoCommits.into();
        assert_eq!(for_error(&git), GIT_ERROR);

        let heading: anyhow::Error = ReleasePrError::UnsupportedSchema {
            found: 2,
            supported: 1,
        }
        .into();
        assert_eq!(for_error(&heading), INPUT_ERROR);

        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
