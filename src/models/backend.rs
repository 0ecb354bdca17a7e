use std::fmt;

use crate::constants::{
    DEFAULT_LOCAL_MODEL, DEFAULT_OPENAI_MODEL, GROQ_LLAMA3_70B, GROQ_MIXTRAL_8X7B,
};

/// The selectable chat backends
///
/// Selection is an exhaustive match: every variant maps to exactly one
/// client configuration and its own credential requirement. There is no
/// fallthrough to an implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBackend {
    /// Groq-hosted Llama 3 70B, the primary backend
    GroqLlama3_70b,
    /// Groq-hosted Mixtral 8x7B, same credential as the primary
    GroqMixtral8x7b,
    /// OpenAI-hosted chat model
    OpenAi,
    /// Locally served OpenAI-compatible endpoint, no credential
    Local,
}

impl ModelBackend {
    pub fn all() -> [ModelBackend; 4] {
        [
            ModelBackend::GroqLlama3_70b,
            ModelBackend::GroqMixtral8x7b,
            ModelBackend::OpenAi,
            ModelBackend::Local,
        ]
    }

    /// Parse a backend selector; accepts the backend id or the raw model id
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "groq-llama3-70b" | GROQ_LLAMA3_70B | "llama3" | "groq" => {
                Some(ModelBackend::GroqLlama3_70b)
            }
            "groq-mixtral-8x7b" | GROQ_MIXTRAL_8X7B | "mixtral" => {
                Some(ModelBackend::GroqMixtral8x7b)
            }
            "openai" | "gpt" => Some(ModelBackend::OpenAi),
            "local" | "ollama" => Some(ModelBackend::Local),
            _ => None,
        }
    }

    /// Stable identifier used in config files and CLI flags
    pub fn id(&self) -> &'static str {
        match self {
            ModelBackend::GroqLlama3_70b => "groq-llama3-70b",
            ModelBackend::GroqMixtral8x7b => "groq-mixtral-8x7b",
            ModelBackend::OpenAi => "openai",
            ModelBackend::Local => "local",
        }
    }

    /// Default model identifier sent on the wire
    pub fn default_model_id(&self) -> &'static str {
        match self {
            ModelBackend::GroqLlama3_70b => GROQ_LLAMA3_70B,
            ModelBackend::GroqMixtral8x7b => GROQ_MIXTRAL_8X7B,
            ModelBackend::OpenAi => DEFAULT_OPENAI_MODEL,
            ModelBackend::Local => DEFAULT_LOCAL_MODEL,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelBackend::GroqLlama3_70b => "Groq Llama 3 70B",
            ModelBackend::GroqMixtral8x7b => "Groq Mixtral 8x7B",
            ModelBackend::OpenAi => "OpenAI",
            ModelBackend::Local => "Local",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ModelBackend::Local)
    }
}

impl Default for ModelBackend {
    fn default() -> Self {
        ModelBackend::GroqLlama3_70b
    }
}

impl fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_ids_and_model_aliases() {
        assert_eq!(
            ModelBackend::parse("groq-llama3-70b"),
            Some(ModelBackend::GroqLlama3_70b)
        );
        assert_eq!(
            ModelBackend::parse("llama3-70b-8192"),
            Some(ModelBackend::GroqLlama3_70b)
        );
        assert_eq!(
            ModelBackend::parse("MIXTRAL"),
            Some(ModelBackend::GroqMixtral8x7b)
        );
        assert_eq!(ModelBackend::parse("openai"), Some(ModelBackend::OpenAi));
        assert_eq!(ModelBackend::parse(" ollama "), Some(ModelBackend::Local));
        assert_eq!(ModelBackend::parse("bamboo"), None);
    }

    #[test]
    fn test_ids_round_trip_through_parse() {
        for backend in ModelBackend::all() {
            assert_eq!(ModelBackend::parse(backend.id()), Some(backend));
        }
    }

    #[test]
    fn test_default_is_the_primary_groq_model() {
        assert_eq!(ModelBackend::default(), ModelBackend::GroqLlama3_70b);
        assert_eq!(ModelBackend::default().default_model_id(), "llama3-70b-8192");
    }
}
