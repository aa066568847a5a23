//! Various response objects returned from Zoho.

use crate::client_error::ClientError;
use crate::codec;
use std::fmt;

/// Error code Zoho embeds in a 200 response when there is no data to show.
pub const NO_DATA_CODE: &str = "4422";

/// Outcome of a single API call.
///
/// Zoho answers most application errors with HTTP 200 and an error code inside the body, so the
/// status alone says little. `classify()` looks at both.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// HTTP 200 without an embedded error code.
    Success(String),

    /// HTTP 200 carrying the "no data" code. Holds the raw body.
    NotFound(String),

    /// Any other status, or an embedded error code other than "no data".
    Failure { status: u16, body: String },
}

impl ApiResponse {
    /// Decide what a raw status and body amount to.
    pub fn classify(status: u16, body: String) -> ApiResponse {
        if status != 200 {
            return ApiResponse::Failure { status, body };
        }

        // a body that is not XML at all carries no embedded code; decoding it later will fail
        match codec::decode_error(&body).ok().flatten() {
            None => ApiResponse::Success(body),
            Some(error) if error.code == NO_DATA_CODE => ApiResponse::NotFound(body),
            Some(_) => ApiResponse::Failure { status, body },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    /// Raw body, whatever the outcome.
    pub fn body(&self) -> &str {
        match self {
            ApiResponse::Success(body) => body,
            ApiResponse::NotFound(body) => body,
            ApiResponse::Failure { body, .. } => body,
        }
    }

    /// Body of a read call. "No data" is a normal, empty answer.
    pub fn into_read_body(self) -> Result<Option<String>, ClientError> {
        match self {
            ApiResponse::Success(body) => Ok(Some(body)),
            ApiResponse::NotFound(_) => Ok(None),
            ApiResponse::Failure { status, body } => Err(ClientError::ApiCall { status, body }),
        }
    }

    /// Body of a write call. Anything but a clean success fails.
    pub fn into_write_body(self) -> Result<String, ClientError> {
        match self {
            ApiResponse::Success(body) => Ok(body),
            ApiResponse::NotFound(body) => Err(ClientError::ApiCall { status: 200, body }),
            ApiResponse::Failure { status, body } => Err(ClientError::ApiCall { status, body }),
        }
    }
}

/// The error Zoho embeds in a response body. `code` identifies the type of error, while the
/// `message` field *might* have more information.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DATA: &str = r#"<response uri="/crm/private/xml/Contacts/getRecords"><nodata><code>4422</code><message>There is no data to show</message></nodata></response>"#;
    const INVALID_TICKET: &str = r#"<response uri="/crm/private/xml/Contacts/insertRecords"><error><code>4834</code><message>Invalid Ticket Id</message></error></response>"#;
    const ROWS: &str = r#"<response><result><Contacts><row no="1"><FL val="Email">bob@smith.com</FL></row></Contacts></result></response>"#;

    #[test]
    fn success() {
        let response = ApiResponse::classify(200, ROWS.to_string());

        assert!(response.is_success());
        assert_eq!(response.into_read_body().unwrap(), Some(ROWS.to_string()));
    }

    #[test]
    fn no_data_is_not_found() {
        let response = ApiResponse::classify(200, NO_DATA.to_string());

        assert_eq!(response, ApiResponse::NotFound(NO_DATA.to_string()));
        assert_eq!(response.into_read_body().unwrap(), None);
    }

    #[test]
    fn no_data_fails_a_write() {
        let error = ApiResponse::classify(200, NO_DATA.to_string())
            .into_write_body()
            .unwrap_err();

        assert_eq!(error.status(), Some(200));
        assert_eq!(error.body(), Some(NO_DATA));
    }

    #[test]
    fn other_embedded_error_is_failure() {
        let response = ApiResponse::classify(200, INVALID_TICKET.to_string());

        assert!(!response.is_success());
        assert!(response.clone().into_read_body().is_err());
        assert!(response.into_write_body().is_err());
    }

    #[test]
    fn non_200_is_failure_with_verbatim_body() {
        let body = String::from("<html>Bad Gateway</html>");
        let error = ApiResponse::classify(502, body.clone())
            .into_write_body()
            .unwrap_err();

        assert_eq!(error.status(), Some(502));
        assert_eq!(error.body(), Some(body.as_str()));
    }

    #[test]
    fn non_200_fails_a_read() {
        let error = ApiResponse::classify(500, NO_DATA.to_string())
            .into_read_body()
            .unwrap_err();

        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn sentinel_inside_a_value_is_not_an_error() {
        let body = r#"<response><result><Contacts><row no="1"><FL val="Phone">4422</FL></row></Contacts></result></response>"#;

        assert!(ApiResponse::classify(200, body.to_string()).is_success());
    }
}
