use super::backend::ModelBackend;
use super::client::OpenAiCompatModel;
use super::traits::ChatModel;
use super::types::ModelParams;
use crate::app::Config;
use crate::constants::{GROQ_API_BASE_URL, OPENAI_API_BASE_URL};
use crate::utils::TableTalkError;

/// Factory for creating chat clients from a selected backend
///
/// A client is constructed fresh for every incoming message and never
/// pooled. Credential lookup happens here, before any request is sent:
/// a missing key fails construction and no client exists to call.
pub struct ModelFactory;

impl ModelFactory {
    pub fn create(
        backend: ModelBackend,
        config: &Config,
    ) -> Result<Box<dyn ChatModel>, TableTalkError> {
        let params = ModelParams {
            temperature: config.model.temperature,
            max_tokens: config.model.max_tokens,
            top_p: config.model.top_p,
        };

        let (base_url, model_id, api_key) = match backend {
            ModelBackend::GroqLlama3_70b | ModelBackend::GroqMixtral8x7b => {
                let key = require_env(backend, &config.backend.groq_api_key_env)?;
                (
                    GROQ_API_BASE_URL.to_string(),
                    backend.default_model_id().to_string(),
                    Some(key),
                )
            }
            ModelBackend::OpenAi => {
                let key = require_env(backend, &config.backend.openai_api_key_env)?;
                (
                    OPENAI_API_BASE_URL.to_string(),
                    config.backend.openai_model.clone(),
                    Some(key),
                )
            }
            ModelBackend::Local => (
                config.backend.local_base_url.clone(),
                config.backend.local_model.clone(),
                None,
            ),
        };

        let model = OpenAiCompatModel::new(base_url, model_id, api_key, params)
            .map_err(|e| TableTalkError::Config(e.to_string()))?;
        Ok(Box::new(model))
    }

    /// Readiness summary for every backend (used by the CLI)
    pub fn describe(config: &Config) -> Vec<BackendStatus> {
        ModelBackend::all()
            .into_iter()
            .map(|backend| {
                let env_var = match backend {
                    ModelBackend::GroqLlama3_70b | ModelBackend::GroqMixtral8x7b => {
                        Some(config.backend.groq_api_key_env.clone())
                    }
                    ModelBackend::OpenAi => Some(config.backend.openai_api_key_env.clone()),
                    ModelBackend::Local => None,
                };
                let model_id = match backend {
                    ModelBackend::OpenAi => config.backend.openai_model.clone(),
                    ModelBackend::Local => config.backend.local_model.clone(),
                    _ => backend.default_model_id().to_string(),
                };
                let credential_present = match &env_var {
                    Some(var) => env_present(var),
                    None => true,
                };
                BackendStatus {
                    backend,
                    model_id,
                    env_var,
                    credential_present,
                }
            })
            .collect()
    }
}

/// Credential / readiness summary for one backend
#[derive(Debug, Clone)]
pub struct BackendStatus {
    pub backend: ModelBackend,
    pub model_id: String,
    pub env_var: Option<String>,
    pub credential_present: bool,
}

fn env_present(var: &str) -> bool {
    std::env::var(var)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false)
}

/// Read a required credential from the environment
fn require_env(backend: ModelBackend, env_var: &str) -> Result<String, TableTalkError> {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TableTalkError::Authentication {
            backend: backend.id().to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test points at its own env var name so parallel tests cannot race

    #[test]
    fn test_missing_credential_fails_before_any_client_exists() {
        let mut config = Config::default();
        config.backend.groq_api_key_env = "TABLETALK_TEST_ABSENT_GROQ_KEY".to_string();
        std::env::remove_var("TABLETALK_TEST_ABSENT_GROQ_KEY");

        let err = ModelFactory::create(ModelBackend::GroqLlama3_70b, &config).unwrap_err();
        match err {
            TableTalkError::Authentication { backend, env_var } => {
                assert_eq!(backend, "groq-llama3-70b");
                assert_eq!(env_var, "TABLETALK_TEST_ABSENT_GROQ_KEY");
            }
            other => panic!("expected Authentication, got {other}"),
        }
    }

    #[test]
    fn test_blank_credential_counts_as_absent() {
        let mut config = Config::default();
        config.backend.groq_api_key_env = "TABLETALK_TEST_BLANK_GROQ_KEY".to_string();
        std::env::set_var("TABLETALK_TEST_BLANK_GROQ_KEY", "   ");

        let err = ModelFactory::create(ModelBackend::GroqMixtral8x7b, &config).unwrap_err();
        assert!(matches!(err, TableTalkError::Authentication { .. }));
    }

    #[test]
    fn test_present_credential_builds_a_client() {
        let mut config = Config::default();
        config.backend.groq_api_key_env = "TABLETALK_TEST_PRESENT_GROQ_KEY".to_string();
        std::env::set_var("TABLETALK_TEST_PRESENT_GROQ_KEY", "gsk_test");

        let model = ModelFactory::create(ModelBackend::GroqLlama3_70b, &config).unwrap();
        assert_eq!(model.name(), "llama3-70b-8192");
        assert!(!model.is_local());
    }

    #[test]
    fn test_openai_backend_reads_its_own_variable() {
        let mut config = Config::default();
        config.backend.openai_api_key_env = "TABLETALK_TEST_OPENAI_KEY".to_string();
        std::env::set_var("TABLETALK_TEST_OPENAI_KEY", "sk-test");

        let model = ModelFactory::create(ModelBackend::OpenAi, &config).unwrap();
        assert_eq!(model.name(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_local_backend_needs_no_credential() {
        let config = Config::default();
        let model = ModelFactory::create(ModelBackend::Local, &config).unwrap();
        assert!(model.is_local());
    }

    #[test]
    fn test_describe_covers_every_backend() {
        let mut config = Config::default();
        config.backend.groq_api_key_env = "TABLETALK_TEST_DESCRIBE_GROQ_KEY".to_string();
        std::env::remove_var("TABLETALK_TEST_DESCRIBE_GROQ_KEY");

        let statuses = ModelFactory::describe(&config);
        assert_eq!(statuses.len(), ModelBackend::all().len());

        let primary = &statuses[0];
        assert_eq!(primary.backend, ModelBackend::GroqLlama3_70b);
        assert!(!primary.credential_present);

        let local = statuses.last().unwrap();
        assert_eq!(local.backend, ModelBackend::Local);
        assert!(local.env_var.is_none());
        assert!(local.credential_present);
    }
}
