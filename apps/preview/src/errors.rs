use thiserror::Error;

/// Application-level error type.
/// The CLI maps each variant to a stable code in its error log line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[test]
    fn test_codes_per_variant() {
        assert_eq!(AppError::Validation("x".into()).code(), "VALIDATION_ERROR");
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(AppError::from(io).code(), "IO_ERROR");
        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(AppError::from(json).code(), "JSON_ERROR");
        assert_eq!(AppError::from(anyhow::anyhow!("boom")).code(), "INTERNAL_ERROR");
    }

    /// Counts every event that reaches the subscriber.
    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_code_does_not_log() {
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter(Arc::clone(&events)));
        let err = AppError::from(anyhow::anyhow!("boom"));

        let code = tracing::subscriber::with_default(subscriber, || err.code());

        assert_eq!(code, "INTERNAL_ERROR");
        assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_display_includes_message() {
        let err = AppError::Validation("Name is required".to_string());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }
}
