use std::path::PathBuf;
use thiserror::Error;

/// Various errors returned by the client.
///
/// A record that does not exist is not an error: read calls hand back an empty result instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configuration file passed to `Client::new()` does not exist.
    #[error("Zoho configuration file not found: {}", .0.display())]
    ConfigurationNotFound(PathBuf),

    /// The configuration file exists but could not be read or parsed.
    #[error("Invalid Zoho configuration: {0}")]
    Configuration(String),

    /// The API rejected the call, either with a non-200 status or with an error code embedded
    /// in a 200 response. `body` is the raw response body, untouched.
    #[error("API call failed with status {status}: {body}")]
    ApiCall { status: u16, body: String },

    /// A request or response document was not valid XML.
    #[error("Malformed XML: {0}")]
    Xml(String),

    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// General error message that encompasses anything else.
    #[error("{0}")]
    General(String),
}

impl ClientError {
    /// HTTP status of a failed API call.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ApiCall { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of a failed API call.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::ApiCall { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<String> for ClientError {
    fn from(err: String) -> ClientError {
        ClientError::General(err)
    }
}

impl From<&str> for ClientError {
    fn from(err: &str) -> ClientError {
        ClientError::General(String::from(err))
    }
}

impl From<serde_urlencoded::ser::Error> for ClientError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        ClientError::General(err.to_string())
    }
}

impl From<serde_yaml::Error> for ClientError {
    fn from(err: serde_yaml::Error) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

impl From<xml::reader::Error> for ClientError {
    fn from(err: xml::reader::Error) -> Self {
        ClientError::Xml(err.to_string())
    }
}

impl From<xml::writer::Error> for ClientError {
    fn from(err: xml::writer::Error) -> Self {
        ClientError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ClientError;
    use std::path::PathBuf;

    #[test]
    fn api_call_keeps_status_and_body() {
        let error = ClientError::ApiCall {
            status: 500,
            body: String::from("<response/>"),
        };

        assert_eq!(error.status(), Some(500));
        assert_eq!(error.body(), Some("<response/>"));
        assert_eq!(error.to_string(), "API call failed with status 500: <response/>");
    }

    #[test]
    fn missing_configuration_names_the_path() {
        let error = ClientError::ConfigurationNotFound(PathBuf::from("/nope/zoho.yaml"));

        assert_eq!(error.status(), None);
        assert!(error.to_string().contains("/nope/zoho.yaml"));
    }

    #[test]
    fn general_from_str() {
        let error = ClientError::from("something broke");

        assert_eq!(error.to_string(), "something broke");
    }
}
