use std::{env, sync::LazyLock};

use regex::{Captures, Regex};

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{env:([^{}]+)\}").expect("placeholder pattern is valid"));

/// Replaces environment variable placeholders in a string.
///
/// Placeholders use the format `${env:VAR_NAME}`. An unset variable is
/// replaced with an empty string; other `${...}` forms are kept as is.
///
/// # Example
///
/// ```rust
/// use viewtool::utils::replace_env_placeholders;
///
/// unsafe { std::env::set_var("VIEWTOOL_DOC_VAR", "views"); }
/// let result = replace_env_placeholders("${env:VIEWTOOL_DOC_VAR}/table.json");
/// assert_eq!(result, "views/table.json");
/// ```
pub fn replace_env_placeholders(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            match env::var(name) {
                Ok(value) => {
                    debug!("Using {name}={value}");
                    value
                }
                Err(_) => {
                    debug!("{name} is not set, replaced with empty string");
                    String::new()
                }
            }
        })
        .into_owned()
}
