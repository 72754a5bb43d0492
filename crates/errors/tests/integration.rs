//! Integration tests for error types

#[cfg(test)]
mod tests {
    use officetpl_errors::*;
    use std::path::Path;

    #[test]
    fn test_error_conversion() {
        let author_err = AuthorError::Blocked {
            file: "Normal.dotx".into(),
            author: "evil.com".into(),
        };
        let err: Error = author_err.into();
        assert!(matches!(err, Error::Author(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::PayloadNotFound {
            path: r"C:\Users\me\Downloads".into(),
        };
        assert_eq!(
            err.to_string(),
            r"template folder could not be determined from C:\Users\me\Downloads"
        );
    }

    #[test]
    fn test_directory_listing_failure_is_not_an_archive_error() {
        let err = AuthorError::DirectoryUnreadable {
            path: "Templates".into(),
            message: "access denied".into(),
        };
        assert!(err.is_error());
        assert_eq!(err.user_code(), Some("author.directory_unreadable"));
        assert!(err.user_hint().is_none());
        assert_eq!(err.to_string(), "cannot list \"Templates\": access denied");
    }

    #[test]
    fn test_error_clone() {
        let err = InstallError::DeletePersisted {
            path: "Normal.dotm".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_copy_failure_carries_hint_and_code() {
        let io_err = std::io::Error::other("sharing violation");
        let err: Error = InstallError::copy_failed(
            "Book.xltx",
            Path::new("XLSTART/Book.xltx"),
            &io_err,
        )
        .into();
        assert_eq!(err.user_code(), Some("install.copy_failed"));
        assert!(err.user_hint().is_some_and(|hint| hint.contains("Close Office")));
        assert!(err.user_message().contains("sharing violation"));
    }
}
