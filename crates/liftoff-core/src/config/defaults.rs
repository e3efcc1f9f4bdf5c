//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "liftoff.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "liftoff.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".liftoff.toml",
        ".liftoff.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# liftoff configuration

# repository = "owner/repo"

[release]
release_id = "[release-action]"
default_branch = "main"
release_branch = "release/main"
pr_title = "Version Packages"

[tags]
root_format = "v{version}"
package_format = "{name}@{version}"

[changelog]
title = "👉 Changelog"
file = "CHANGELOG.md"

[contributors]
enabled = true
lookup_url = "https://ungh.cc"
"#;
