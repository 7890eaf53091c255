use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog is empty: no model available")]
    EmptyCatalog,

    #[error("Catalog fetch failed: {0}")]
    Fetch(String),

    #[error("Model build failed: {0}")]
    Build(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Fetch("HTTP 503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "Catalog fetch failed: HTTP 503 Service Unavailable");
        assert_eq!(Error::EmptyCatalog.to_string(), "Catalog is empty: no model available");
    }

    #[test]
    fn test_build_error_is_distinct_from_fetch() {
        let err = Error::Build("task panicked".to_string());
        assert_eq!(err.to_string(), "Model build failed: task panicked");
        assert!(!matches!(err, Error::Fetch(_)));
    }
}
