//! Replay script format.
//!
//! ```toml
//! conversation_id = "demo"
//! replies = ["First scripted answer", "Second scripted answer"]
//!
//! [capabilities]
//! can_speak = true
//!
//! [[messages]]
//! id = "u1"
//! role = "user"
//! text = "Outline a fantasy plot."
//!
//! [[steps]]
//! action = "restart_from"
//! message_id = "u1"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use threadline_core::conversation::Conversation;
use threadline_core::message::{Message, MessageRole};
use threadline_core::port::{Capabilities, Ephemeral};

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_conversation_id")]
    pub conversation_id: String,
    /// Answers handed out by the scripted engine, in order.
    #[serde(default)]
    pub replies: Vec<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub ephemerals: Vec<Ephemeral>,
    #[serde(default)]
    pub messages: Vec<MessageSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_conversation_id() -> String {
    "replay".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSpec {
    pub id: Option<String>,
    pub role: MessageRole,
    pub text: String,
}

impl MessageSpec {
    fn to_message(&self) -> Message {
        match &self.id {
            Some(id) => Message::with_id(id.clone(), self.role, self.text.clone()),
            None => Message::new(self.role, self.text.clone()),
        }
    }
}

/// One host gesture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Branch {
        message_id: String,
    },
    Truncate {
        message_id: String,
    },
    RestartFrom {
        message_id: String,
        #[serde(default)]
        offset: isize,
        #[serde(default)]
        multi_candidate: bool,
    },
    RunExample {
        text: String,
    },
    DeleteMessage {
        message_id: String,
    },
    EditMessage {
        message_id: String,
        text: String,
    },
    RequestDiagram {
        message_id: String,
        text: String,
    },
    ShowSystemMessages {
        on: bool,
    },
    EnterSelection,
    ExitSelection,
    Escape,
    SelectAll {
        #[serde(default = "default_on")]
        on: bool,
    },
    Toggle {
        message_id: String,
        #[serde(default = "default_on")]
        on: bool,
    },
    DeleteSelected,
    Speak {
        text: String,
    },
    Imagine {
        text: String,
    },
    /// Captures the rendered timeline at this point.
    Render,
}

fn default_on() -> bool {
    true
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Branch { .. } => "branch",
            Step::Truncate { .. } => "truncate",
            Step::RestartFrom { .. } => "restart_from",
            Step::RunExample { .. } => "run_example",
            Step::DeleteMessage { .. } => "delete_message",
            Step::EditMessage { .. } => "edit_message",
            Step::RequestDiagram { .. } => "request_diagram",
            Step::ShowSystemMessages { .. } => "show_system_messages",
            Step::EnterSelection => "enter_selection",
            Step::ExitSelection => "exit_selection",
            Step::Escape => "escape",
            Step::SelectAll { .. } => "select_all",
            Step::Toggle { .. } => "toggle",
            Step::DeleteSelected => "delete_selected",
            Step::Speak { .. } => "speak",
            Step::Imagine { .. } => "imagine",
            Step::Render => "render",
        }
    }
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid replay script {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The seeded conversation the replay starts from.
    pub fn conversation(&self) -> Conversation {
        Conversation::with_messages(
            self.conversation_id.clone(),
            self.messages.iter().map(MessageSpec::to_message).collect(),
        )
    }
}
