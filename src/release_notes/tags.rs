use super::Collected;

/// Tags strictly between `previous` and `current` in `tags` (creation order).
pub fn tags_between(tags: &[String], previous: &str, current: &str) -> Collected<Vec<String>> {
    if previous.is_empty() {
        return Collected::skipped("the previous tag is empty");
    }
    if current.is_empty() {
        return Collected::skipped("the current tag is empty");
    }
    if previous == current {
        return Collected::skipped(format!(
            "previous tag {} and current tag {} are the same",
            previous, current
        ));
    }
    if tags.is_empty() {
        return Collected::skipped("the repository has no matching tags");
    }

    let Some(start) = tags.iter().position(|t| t == previous) else {
        return Collected::skipped(format!("previous tag {} is not in the tag list", previous));
    };
    let Some(end) = tags.iter().position(|t| t == current) else {
        return Collected::skipped(format!("current tag {} is not in the tag list", current));
    };

    if end <= start + 1 {
        return Collected::skipped(format!(
            "no tags between {} and {}",
            previous, current
        ));
    }

    Collected::Ready(tags[start + 1..end].to_vec())
}
