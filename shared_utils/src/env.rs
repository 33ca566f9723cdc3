use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an environment variable, falling back to `default` when it's unset.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
/// * `default` - The value used when the variable is missing.
pub fn env_var_or(name: &str, default: &str) -> String {
    get_env_var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_a_structured_error() {
        let err = get_env_var("SHARED_UTILS_TEST_DOES_NOT_EXIST").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHARED_UTILS_TEST_DOES_NOT_EXIST"
        );
    }

    #[test]
    fn fallback_applies_when_unset() {
        let got = env_var_or("SHARED_UTILS_TEST_DOES_NOT_EXIST", "fallback");
        assert_eq!(got, "fallback");
    }
}
