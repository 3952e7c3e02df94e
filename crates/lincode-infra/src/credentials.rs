//! Anthropic API key lookup.
//!
//! The key comes from the environment only (a `.env` file is loaded into the
//! environment before this runs). It is wrapped in [`SecretString`] as soon
//! as it is read.

use secrecy::SecretString;

use lincode_types::error::StartupError;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Read the API key from `ANTHROPIC_API_KEY`.
///
/// A variable that is unset, blank, or not valid Unicode counts as missing.
pub fn resolve_api_key() -> Result<SecretString, StartupError> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<SecretString, StartupError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(SecretString::from(key.trim().to_string())),
        _ => Err(StartupError::MissingCredential(API_KEY_VAR.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn present_key_is_returned_trimmed() {
        let key = api_key_from(Some(" sk-ant-abc \n".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "sk-ant-abc");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = api_key_from(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ANTHROPIC_API_KEY environment variable not set"
        );
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert!(matches!(
            api_key_from(Some("   ".to_string())),
            Err(StartupError::MissingCredential(ref var)) if var == API_KEY_VAR
        ));
    }
}
