/*!
 * Utility functions for classname-scan
 */

/// Check whether `file_name` names the target file, ignoring case
pub fn is_target_file(file_name: &str, target: &str) -> bool {
    file_name.to_lowercase() == target.to_lowercase()
}

/// Shorten a path for display, keeping as many trailing segments as fit
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let parts: Vec<&str> = path.split(['/', '\\']).collect();
    let mut segments = Vec::new();
    let mut current_len = 3; // "..."

    for part in parts.iter().rev() {
        let part_len = part.chars().count() + 1;
        if current_len + part_len > max_len {
            break;
        }
        segments.push(*part);
        current_len += part_len;
    }

    // A single segment longer than the limit keeps its tail
    if segments.is_empty() {
        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    let mut result = String::from("...");
    for part in segments.iter().rev() {
        result.push('/');
        result.push_str(part);
    }
    result
}
