use crate::error::AppError;

/// Derives the slug candidate from a free-text name: trim, lower-case,
/// collapse every run of characters outside `[a-z0-9]` into a single `-`,
/// and strip leading/trailing dashes. A name that normalizes to nothing is
/// rejected with `InvalidName`.
pub fn slugify(name: &str) -> Result<String, AppError> {
    let lowered = name.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        return Err(AppError::InvalidName);
    }
    Ok(slug)
}

/// The n-th collision candidate for a base slug. Suffixes ascend strictly,
/// so the resolution loop in the topic service always terminates.
pub fn with_suffix(base: &str, suffix: u32) -> String {
    format!("{base}-{suffix}")
}
