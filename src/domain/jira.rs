use regex::Regex;
use std::sync::OnceLock;

fn issue_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z]+-[0-9]+").expect("valid issue key regex"))
}

/// First Jira issue key (e.g. "AQUA-1234") in a commit message.
pub fn extract_issue_key(message: &str) -> Option<&str> {
    issue_key_regex().find(message).map(|m| m.as_str())
}

/// Unique issue keys across messages, in first-seen order.
pub fn unique_issue_keys<'a, I>(messages: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keys: Vec<String> = Vec::new();
    for message in messages {
        if let Some(key) = extract_issue_key(message) {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}
