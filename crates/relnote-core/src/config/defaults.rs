//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "relnote.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "relnote.yaml";

/// Default GitHub GraphQL endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com/graphql";

/// Environment variable the GitHub token is read from
pub const DEFAULT_TOKEN_ENV: &str = "RELNOTE_GITHUB_TOKEN";

/// Prefix of release branches (`release/1.12`)
pub const DEFAULT_RELEASE_BRANCH_PREFIX: &str = "release/";

/// Commits fetched from the previous release branch when looking for the
/// point where both branches meet. These are only the patches since that
/// release was cut, so this is generous.
pub const DEFAULT_PREVIOUS_RELEASE_DEPTH: usize = 250;

/// Authors whose pull requests never get a release note
pub const DEFAULT_SKIP_AUTHORS: [&str; 2] = ["dependabot[bot]", "dependabot-preview[bot]"];

/// Get list of config file names to search for, in order of preference
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".relnote.toml",
        ".relnote.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# relnote configuration

[source]
kind = "github"
remote = "origin"

[github]
# Read from the remote URL of the local clone when unset
# owner = "example"
# repository = "project"
token_env = "RELNOTE_GITHUB_TOKEN"
# Pull requests by these authors are left out of the changelog
skip_authors = ["dependabot[bot]", "dependabot-preview[bot]"]
# Fail when a pull request has neither release notes nor NONE
require_release_notes = false

[range]
release_branch_prefix = "release/"
previous_release_depth = 250

[output]
format = "markdown"
"#;
