use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    RateLimited,
    Unknown,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::RateLimited => "rate_limited",
            TransportErrorKind::Unknown => "unknown",
        }
    }

    /// Classification by HTTP status. `None` when the status carries no signal.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            429 => Some(TransportErrorKind::RateLimited),
            408 | 504 => Some(TransportErrorKind::Timeout),
            _ => None,
        }
    }

    /// Last-resort classification from free-form error text.
    pub fn classify_message(message: &str) -> Self {
        let msg = message.to_lowercase();
        if msg.contains("rate limit")
            || msg.contains("rate_limit")
            || msg.contains("too many requests")
            || msg.contains("429")
        {
            TransportErrorKind::RateLimited
        } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline")
        {
            TransportErrorKind::Timeout
        } else {
            TransportErrorKind::Unknown
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportErrorKind::Timeout | TransportErrorKind::RateLimited
        )
    }
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The call to the generation service did not produce a text payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("generation transport error ({kind}): {detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
    pub status: Option<u16>,
    pub provider: Option<String>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            status: None,
            provider: None,
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, detail)
    }

    pub fn rate_limited(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::RateLimited, detail)
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unknown, detail)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Status first, then message text.
    pub fn classify(status: Option<u16>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let kind = status
            .and_then(TransportErrorKind::from_status)
            .unwrap_or_else(|| TransportErrorKind::classify_message(&detail));
        let mut err = Self::new(kind, detail);
        err.status = status;
        err
    }
}

/// The upstream text held no recoverable JSON value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed generation output: {reason}")]
pub struct MalformedOutputError {
    pub reason: String,
    /// Raw upstream text, kept for diagnostic logging only.
    pub raw: String,
}

impl MalformedOutputError {
    pub fn new(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Raw text shortened for log lines.
    pub fn raw_excerpt(&self, max_chars: usize) -> String {
        let mut out: String = self.raw.chars().take(max_chars).collect();
        if self.raw.chars().count() > max_chars {
            out.push_str("...");
        }
        out
    }
}

/// A produced Evaluation broke one of its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("evaluation invariant violated on '{field}': {detail}")]
pub struct InvariantViolation {
    pub field: &'static str,
    pub detail: String,
}

impl InvariantViolation {
    pub fn new(field: &'static str, detail: impl Into<String>) -> Self {
        Self {
            field,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    TransportTimeout,
    TransportRateLimited,
    TransportUnknown,
    MalformedOutput,
    InvariantViolation,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::TransportTimeout => "transport_timeout",
            FailureKind::TransportRateLimited => "transport_rate_limited",
            FailureKind::TransportUnknown => "transport_unknown",
            FailureKind::MalformedOutput => "malformed_output",
            FailureKind::InvariantViolation => "invariant_violation",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any stage failure that the pipeline boundary turns into a fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Malformed(#[from] MalformedOutputError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl GradeFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            GradeFailure::Transport(e) => match e.kind {
                TransportErrorKind::Timeout => FailureKind::TransportTimeout,
                TransportErrorKind::RateLimited => FailureKind::TransportRateLimited,
                TransportErrorKind::Unknown => FailureKind::TransportUnknown,
            },
            GradeFailure::Malformed(_) => FailureKind::MalformedOutput,
            GradeFailure::Invariant(_) => FailureKind::InvariantViolation,
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_takes_precedence_over_message() {
        let err = TransportError::classify(Some(429), "upstream said: timeout");
        assert_eq!(err.kind, TransportErrorKind::RateLimited);
        assert_eq!(err.status, Some(429));

        let err = TransportError::classify(Some(504), "gateway");
        assert_eq!(err.kind, TransportErrorKind::Timeout);
    }

    #[test]
    fn message_classification_covers_infra_errors() {
        assert_eq!(
            TransportErrorKind::classify_message("Rate limit reached for gpt-4.1-mini"),
            TransportErrorKind::RateLimited
        );
        assert_eq!(
            TransportErrorKind::classify_message("operation timed out"),
            TransportErrorKind::Timeout
        );
        assert_eq!(
            TransportErrorKind::classify_message("connection reset by peer"),
            TransportErrorKind::Unknown
        );
        assert_eq!(
            TransportError::classify(Some(500), "internal error").kind,
            TransportErrorKind::Unknown
        );
    }

    #[test]
    fn failure_kind_codes_are_stable() {
        let f: GradeFailure = TransportError::rate_limited("429").into();
        assert_eq!(f.kind().as_str(), "transport_rate_limited");
        let f: GradeFailure = MalformedOutputError::new("no object", "hello").into();
        assert_eq!(f.kind(), FailureKind::MalformedOutput);
        let f: GradeFailure = InvariantViolation::new("grade", "mismatch").into();
        assert_eq!(f.kind().as_str(), "invariant_violation");
    }

    #[test]
    fn raw_excerpt_truncates_on_char_boundaries() {
        let err = MalformedOutputError::new("bad", "가나다라마바사");
        assert_eq!(err.raw_excerpt(3), "가나다...");
        assert_eq!(err.raw_excerpt(50), "가나다라마바사");
    }
}
