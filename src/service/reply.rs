use serde::Serialize;

/// Envelope for service results: `{ "success": true, ...data }` when the
/// operation produced a payload, `{ "success": false, "error": ... }` when it
/// did not. Persistence errors never escape as panics or raw `Err`s; they are
/// folded into the envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply<T: Serialize> {
    Success {
        success: bool,
        #[serde(flatten)]
        data: T,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl<T: Serialize> Reply<T> {
    pub fn ok(data: T) -> Self {
        Reply::Success {
            success: true,
            data,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Reply::Failure {
            success: false,
            error: error.into(),
        }
    }

    pub fn from_result(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(format!("{err:#}")),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success { .. })
    }
}

/// Envelope for operations with no payload beyond the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Folds a row-found result into the envelope: `Ok(false)` means the
    /// target row did not exist.
    pub fn from_found(result: anyhow::Result<bool>, missing: &str) -> Self {
        match result {
            Ok(true) => Self::ok(),
            Ok(false) => Self::err(missing),
            Err(err) => Self::err(format!("{err:#}")),
        }
    }
}
