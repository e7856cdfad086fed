//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    InvalidConfigurationValue(String),
    Io(std::io::Error),
    MissingConfigurationValue(String),
    Other(String),
    /// A request reached the backend but came back with a non-success status, the string
    /// names the endpoint that was called
    RequestError(reqwest::StatusCode, String),
    UnknownServiceHandler(String),
    Yaml(serde_yaml::Error),
}

impl convert::From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Http(err)
    }
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "{}", e),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::MissingConfigurationValue(key) => {
                write!(f, "missing required configuration value: {}", key)
            }
            Error::Other(msg) => write!(f, "{}", msg),
            Error::RequestError(code, endpoint) => {
                write!(f, "[{}] request failed with code: {}", endpoint, code)
            }
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

/// Turn any failure into the single line of text shown in the dashboard's error banner
pub fn user_message(err: &dyn std::error::Error) -> String {
    let msg = err.to_string();
    if !msg.trim().is_empty() {
        return msg;
    }
    // some transport errors only describe themselves through their source
    match err.source() {
        Some(source) => user_message(source),
        None => "unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Blank;

    impl fmt::Display for Blank {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    impl std::error::Error for Blank {}

    #[test]
    fn request_error_message_carries_status_code() {
        let err = Error::RequestError(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "recent".into());
        let msg = user_message(&err);
        assert!(msg.contains("500"));
        assert!(msg.starts_with("[recent]"));
    }

    #[test]
    fn blank_errors_still_produce_a_message() {
        assert_eq!(user_message(&Blank), "unknown error");
    }

    #[test]
    fn io_errors_pass_through() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::Other,
            "connection reset",
        ));
        assert_eq!(user_message(&err), "connection reset");
    }
}
