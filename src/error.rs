/// Error type shared by every part of the showcase.
///
/// Transport problems ([`ShowcaseError::Network`], [`ShowcaseError::HttpStatus`])
/// are the "network failure" class: handlers catch them and render an inline
/// message instead of the expected content. Everything else is reported where
/// it happens.
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    /// The HTTP request itself failed (DNS, connect, timeout, body decode).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status code.
    #[error("endpoint returned HTTP {0}")]
    HttpStatus(u16),

    /// A record or payload could not be interpreted.
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// Invalid runtime configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShowcaseError {
    /// True for failures that mean "the endpoint could not be reached or refused us".
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            ShowcaseError::Network(_) | ShowcaseError::HttpStatus(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ShowcaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_network_failure() {
        let err = ShowcaseError::HttpStatus(502);
        assert!(err.is_network_failure());
        assert_eq!(err.to_string(), "endpoint returned HTTP 502");
    }

    #[test]
    fn malformed_data_is_not_network_failure() {
        let err = ShowcaseError::MalformedData("bad _row".into());
        assert!(!err.is_network_failure());
        assert_eq!(err.to_string(), "malformed data: bad _row");
    }
}
