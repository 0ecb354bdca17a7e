use serde::{Deserialize, Serialize};

/// Knobs forwarded verbatim to the query engine on every question
///
/// `verbose` turns on prompt logging, `enable_cache` memoizes repeated
/// questions, and `allowed_dependencies` names the modules an
/// execution-backed engine may import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub verbose: bool,
    pub enable_cache: bool,
    pub allowed_dependencies: Vec<String>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            enable_cache: false,
            allowed_dependencies: vec!["collections".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_engine_contract() {
        let options = QueryOptions::default();
        assert!(options.verbose);
        assert!(!options.enable_cache);
        assert_eq!(options.allowed_dependencies, vec!["collections"]);
    }
}
