use std::path::PathBuf;
use thiserror::Error;

/// Main error type for TableTalk
#[derive(Error, Debug)]
pub enum TableTalkError {
    #[error("Cannot read dataset at {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse dataset at {path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("Backend '{backend}' requires the {env_var} environment variable")]
    Authentication { backend: String, env_var: String },

    #[error("Query failed: {message}")]
    QueryExecution { message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_error_names_the_variable() {
        let err = TableTalkError::Authentication {
            backend: "groq-llama3-70b".to_string(),
            env_var: "GROQ_API_KEY".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("GROQ_API_KEY"));
        assert!(message.contains("groq-llama3-70b"));
    }

    #[test]
    fn file_access_error_carries_the_path() {
        let err = TableTalkError::FileAccess {
            path: PathBuf::from("missing.xlsx"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.xlsx"));
    }
}
