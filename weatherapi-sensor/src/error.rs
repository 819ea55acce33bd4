use thiserror::Error;

/// Failures a sensor operation can report to its caller.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The request never produced an HTTP response (DNS, connect, TLS, body read).
    #[error("failed to reach weatherapi.com: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request to weatherapi.com timed out")]
    Timeout,

    /// The upstream answered 200 but the body was not a JSON object.
    #[error("failed to decode weatherapi.com response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The upstream answered with anything other than 200.
    ///
    /// The display text doubles as the `"error"` value of an error reading.
    #[error("weatherapi.com didn't return 200, instead got {status}")]
    UpstreamStatus { status: u16, body: String },

    #[error("{0} is not supported by this sensor")]
    NotSupported(&'static str),
}

/// The request URL carries the API key in its query, so it is stripped
/// before the error can reach a log line.
impl From<reqwest::Error> for SensorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SensorError::Timeout
        } else {
            SensorError::Transport(err.without_url())
        }
    }
}

impl SensorError {
    pub fn is_not_supported(&self) -> bool {
        matches!(self, SensorError::NotSupported(_))
    }
}
