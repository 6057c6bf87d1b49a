//! Integration tests for error types

#[cfg(test)]
mod tests {
    use xcfetch_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://download.developer.apple.com".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));

        let err: Error = AuthError::NoCookie.into();
        assert!(matches!(err, Error::Auth(AuthError::NoCookie)));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidValue {
            field: "XCFETCH_PROGRESS_WIDTH".into(),
            value: "wide".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for XCFETCH_PROGRESS_WIDTH: wide"
        );
    }

    #[test]
    fn test_error_clone() {
        let err = NetworkError::HttpError {
            status: 404,
            message: "Not Found".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                path: None,
                ..
            }
        ));
    }

    #[test]
    fn test_user_facing_codes() {
        let err: Error = AuthError::NoCookie.into();
        assert_eq!(err.user_code(), Some("auth.no_cookie"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());

        let err: Error = NetworkError::HttpError {
            status: 503,
            message: "Service Unavailable".into(),
        }
        .into();
        assert!(err.is_retryable());
        assert_eq!(err.user_code(), Some("network.http_error"));
    }
}
