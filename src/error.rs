//! Application-wide error types using thiserror
//!
//! Library paths that feed the logger never surface these to callers; they
//! are returned only from explicit operations (dotenv loading, direct remote
//! writes from the smoke binary).

use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::RemoteError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps() {
        let err: AppError = ConfigError::Dotenv("missing file".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Failed to load dotenv file: missing file"
        );
    }

    #[test]
    fn test_remote_error_wraps() {
        let err: AppError = RemoteError::Auth("token expired".to_string()).into();
        assert!(matches!(err, AppError::Remote(RemoteError::Auth(_))));
        assert!(err.to_string().contains("token expired"));
    }
}
