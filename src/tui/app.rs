use std::sync::Arc;

use crate::dataset::FieldDescriptions;
use crate::models::{ChatMessage, MessageRole};
use crate::session::ChatSession;

/// Status bar line
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: "Ready".to_string(),
            is_error: false,
        }
    }
}

/// Application state for the chat UI
///
/// `entries` is a display mirror of the session transcript; the session
/// itself is taken by the worker task while a turn is in flight and put
/// back when the answer arrives.
pub struct ChatApp {
    /// Display mirror of the transcript
    pub entries: Vec<ChatMessage>,
    /// User input buffer
    pub input: String,
    /// Is the app running?
    pub running: bool,
    /// Is a turn in flight?
    pub is_thinking: bool,
    /// Lines scrolled up from the bottom of the transcript, clamped at render time
    pub scroll_offset: u16,
    /// Show the schema sidebar
    pub show_schema: bool,
    /// Status bar state
    pub status: StatusLine,
    /// The chat session; None while the worker owns it
    pub session: Option<ChatSession>,
    /// Backend display name for the header
    pub backend_name: String,
    /// Dataset path for the header
    pub dataset_path: String,
    /// Column descriptions for the sidebar
    pub descriptions: Arc<FieldDescriptions>,
}

impl ChatApp {
    /// Create the UI state around a started session
    pub fn new(session: ChatSession) -> Self {
        let backend_name = session.backend().display_name().to_string();
        let dataset_path = session.dataset_path().display().to_string();
        let descriptions = Arc::clone(session.descriptions());
        let entries = session.transcript().entries().to_vec();

        Self {
            entries,
            input: String::new(),
            running: true,
            is_thinking: false,
            scroll_offset: 0,
            show_schema: false,
            status: StatusLine::default(),
            session: Some(session),
            backend_name,
            dataset_path,
            descriptions,
        }
    }

    /// Re-mirror the transcript after the session changed
    pub fn refresh_transcript(&mut self) {
        if let Some(session) = &self.session {
            self.entries = session.transcript().entries().to_vec();
        }
        self.scroll_to_bottom();
    }

    /// Append a display-only entry, bypassing the transcript
    pub fn push_ephemeral(&mut self, role: MessageRole, content: impl Into<String>) {
        self.entries.push(ChatMessage::new(role, content));
        self.scroll_to_bottom();
    }

    /// Clear the input buffer
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Toggle the schema sidebar
    pub fn toggle_schema(&mut self) {
        self.show_schema = !self.show_schema;
    }

    /// Set an informational status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = StatusLine {
            text: message.into(),
            is_error: false,
        };
    }

    /// Set an error status message
    ///
    /// Failed turns surface here and nowhere else in the UI.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = StatusLine {
            text: message.into(),
            is_error: true,
        };
    }

    /// Scroll the transcript view up
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    /// Scroll the transcript view down
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Follow the newest entry
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handle a slash command typed into the input box
    pub fn handle_slash_command(&mut self, command: &str) {
        match command.trim() {
            "/quit" | "/q" => {
                self.quit();
            }
            "/clear" => {
                if let Some(session) = &mut self.session {
                    session.reset();
                }
                self.refresh_transcript();
                self.set_status("Transcript cleared");
            }
            "/schema" => {
                self.toggle_schema();
            }
            "/help" | "/h" => {
                self.push_ephemeral(
                    MessageRole::System,
                    "Commands:\n\
                     /help - Show this help\n\
                     /schema - Toggle the schema sidebar\n\
                     /clear - Clear the transcript\n\
                     /quit - Quit the application\n\
                     \n\
                     Keys:\n\
                     Enter - Send the question\n\
                     Tab - Toggle the schema sidebar\n\
                     Up/Down - Scroll the transcript\n\
                     Ctrl+C - Quit",
                );
            }
            other => {
                self.set_status(format!("Unknown command: {} (try /help)", other));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::models::ModelBackend;
    use std::path::PathBuf;

    fn test_app() -> ChatApp {
        let mut config = Config::default();
        config.dataset.path = PathBuf::from("sales.csv");
        let descriptions = Arc::new(FieldDescriptions::from_pairs([(
            "product_name",
            "Name of the product sold",
        )]));
        let session = ChatSession::start(config, ModelBackend::Local, descriptions);
        ChatApp::new(session)
    }

    #[test]
    fn test_new_mirrors_the_system_seed() {
        let app = ChatApp::new({
            let mut config = Config::default();
            config.dataset.path = PathBuf::from("sales.csv");
            ChatSession::start(
                config,
                ModelBackend::GroqLlama3_70b,
                Arc::new(FieldDescriptions::adventure_works()),
            )
        });

        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].role, MessageRole::System);
        assert_eq!(app.backend_name, "Groq Llama 3 70B");
        assert_eq!(app.dataset_path, "sales.csv");
        assert!(app.running);
        assert!(!app.is_thinking);
    }

    #[test]
    fn test_clear_command_resets_to_the_seed() {
        let mut app = test_app();
        app.push_ephemeral(MessageRole::User, "leftover");
        app.handle_slash_command("/clear");

        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].role, MessageRole::System);
        assert_eq!(app.status.text, "Transcript cleared");
    }

    #[test]
    fn test_help_command_is_display_only() {
        let mut app = test_app();
        app.handle_slash_command("/help");

        assert_eq!(app.entries.len(), 2);
        assert_eq!(app.entries[1].role, MessageRole::System);
        assert!(app.entries[1].content.contains("/schema"));
        // The session transcript is untouched
        assert_eq!(app.session.as_ref().unwrap().transcript().len(), 1);
    }

    #[test]
    fn test_quit_command_stops_the_loop() {
        let mut app = test_app();
        app.handle_slash_command("/quit");
        assert!(!app.running);
    }

    #[test]
    fn test_schema_command_toggles_the_sidebar() {
        let mut app = test_app();
        assert!(!app.show_schema);
        app.handle_slash_command("/schema");
        assert!(app.show_schema);
        app.handle_slash_command("/schema");
        assert!(!app.show_schema);
    }

    #[test]
    fn test_unknown_command_reports_in_the_status_bar() {
        let mut app = test_app();
        app.handle_slash_command("/frobnicate");
        assert!(app.status.text.contains("/frobnicate"));
        assert_eq!(app.entries.len(), 1);
    }

    #[test]
    fn test_error_status_is_flagged() {
        let mut app = test_app();
        app.set_error("Query failed: boom");
        assert!(app.status.is_error);
        app.set_status("Ready");
        assert!(!app.status.is_error);
    }
}
