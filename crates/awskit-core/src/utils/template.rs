/// `$[name]` placeholder substitution for email templates
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\[([A-Za-z0-9_.\-]+)\]").unwrap());

/// Replaces every `$[name]` token with `params[name]`.
///
/// Tokens without a matching parameter are left unchanged.
///
/// # Examples
/// ```
/// use awskit_core::utils::template::render_template;
/// use std::collections::HashMap;
///
/// let params = HashMap::from([("name".to_string(), "World".to_string())]);
/// assert_eq!(render_template("Hello $[name]", &params), "Hello World");
/// assert_eq!(render_template("Hi $[other]", &params), "Hi $[other]");
/// ```
pub fn render_template(template: &str, params: &HashMap<String, String>) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            params
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Names of all placeholders that appear in `template`, in order of first use
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_PATTERN.captures_iter(template) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Placeholders in `template` that `params` has no value for
pub fn missing_params(template: &str, params: &HashMap<String, String>) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|name| !params.contains_key(name))
        .collect()
}
