use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables. A variable that is
/// set but empty (or only whitespace) counts as missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads an environment variable, falling back to `default` when it is missing.
///
/// Returns the value together with a flag that is `true` when the fallback was used,
/// so callers can log that they are running on a default.
pub fn get_env_var_or(name: &str, default: &str) -> (String, bool) {
    match get_env_var(name) {
        Ok(value) => (value, false),
        Err(_) => (default.to_string(), true),
    }
}
