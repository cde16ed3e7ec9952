use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{body}")]
    ServerRejected { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    pub(crate) fn rejected(status: u16, body: String, reason: Option<&str>) -> Self {
        // 空响应体时退回到状态描述，和浏览器 statusText 的表现一致
        let body = if body.trim().is_empty() {
            reason.unwrap_or("request rejected").to_string()
        } else {
            body
        };
        TransportError::ServerRejected { status, body }
    }
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Select a video file first.")]
    NoFileSelected,
    #[error("an upload is already in progress")]
    UploadInProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_keeps_body() {
        let err = TransportError::rejected(404, "video_id not found.".to_string(), Some("Not Found"));
        assert_eq!(err.to_string(), "video_id not found.");
        assert!(matches!(err, TransportError::ServerRejected { status: 404, .. }));
    }

    #[test]
    fn test_rejected_empty_body_falls_back_to_reason() {
        let err = TransportError::rejected(502, "  ".to_string(), Some("Bad Gateway"));
        assert_eq!(err.to_string(), "Bad Gateway");
    }
}
