//! Configuration validation

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_release(config)?;
    validate_tags(config)?;
    validate_changelog(config)?;
    validate_repository(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> crate::error::LiftoffError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
    .into()
}

fn validate_release(config: &Config) -> Result<()> {
    if config.release.release_id.trim().is_empty() {
        return Err(invalid("release.release_id", "release id cannot be empty"));
    }

    if config.release.release_id.contains("-->") {
        return Err(invalid(
            "release.release_id",
            "release id cannot contain an HTML comment terminator",
        ));
    }

    if config.release.release_branch.is_empty() {
        return Err(invalid("release.release_branch", "branch cannot be empty"));
    }

    Ok(())
}

fn validate_tags(config: &Config) -> Result<()> {
    if !config.tags.root_format.contains("{version}") {
        return Err(invalid(
            "tags.root_format",
            "must contain {version} placeholder",
        ));
    }

    if !config.tags.package_format.contains("{version}") {
        return Err(invalid(
            "tags.package_format",
            "must contain {version} placeholder",
        ));
    }

    if !config.tags.package_format.contains("{name}") {
        return Err(invalid(
            "tags.package_format",
            "must contain {name} placeholder",
        ));
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.types.is_empty() {
        return Err(invalid("changelog.types", "at least one commit type is required"));
    }

    let mut seen = HashSet::new();
    for (i, commit_type) in config.changelog.types.iter().enumerate() {
        if commit_type.key.trim().is_empty() {
            return Err(invalid(
                &format!("changelog.types[{}].type", i),
                "type cannot be empty",
            ));
        }

        if !seen.insert(commit_type.key.to_lowercase()) {
            return Err(invalid(
                &format!("changelog.types[{}].type", i),
                format!("duplicate type '{}'", commit_type.key),
            ));
        }
    }

    Ok(())
}

fn validate_repository(config: &Config) -> Result<()> {
    if let Some(repo) = &config.repository {
        let valid = repo
            .split_once('/')
            .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'));
        if !valid {
            return Err(invalid("repository", "must be in the form owner/repo"));
        }
    }

    Ok(())
}
