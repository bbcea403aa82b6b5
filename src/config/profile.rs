use crate::error::{AppError, AppResult};

const DEFAULT_PROFILE: &str = "default";

/// Normalizes a profile name into a single directory component. Blank
/// names select the default profile.
pub fn resolve_profile(requested: &str) -> AppResult<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_PROFILE.to_string());
    }

    if trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
        || trimmed.chars().any(char::is_control)
    {
        return Err(AppError::InvalidInput(format!(
            "profile name `{trimmed}` cannot be used as a directory name"
        )));
    }

    Ok(trimmed.to_string())
}
