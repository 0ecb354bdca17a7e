/// Constants module to avoid magic numbers in the codebase

// Dataset Configuration
pub const DEFAULT_DATASET_PATH: &str = "adventureworks_2022_denormalized.xlsx";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const MAX_PREVIEW_ROWS: usize = 25;

// Chat Configuration
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

// Backend Endpoints (OpenAI-compatible chat completions)
pub const GROQ_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434/v1";

// Model Identifiers
pub const GROQ_LLAMA3_70B: &str = "llama3-70b-8192";
pub const GROQ_MIXTRAL_8X7B: &str = "mixtral-8x7b-32768";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LOCAL_MODEL: &str = "llama3";

// Credential Environment Variables
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;

// Default Model Configuration
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: usize = 4096;
pub const DEFAULT_TOP_P: f32 = 1.0;
