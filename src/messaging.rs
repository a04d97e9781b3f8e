/// Runtime messages exchanged between popup, content script and background
use serde::{Deserialize, Serialize};

pub const BUTTON_CLICKED_ACTION: &str = "buttonClicked";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn received() -> Self {
        MessageResponse {
            status: "received".to_string(),
            message: None,
        }
    }
}

/// Background reply; only `buttonClicked` is answered
pub fn background_reply(message: &Message) -> Option<MessageResponse> {
    match message.action.as_deref() {
        Some(BUTTON_CLICKED_ACTION) => Some(MessageResponse {
            status: "success".to_string(),
            message: Some("Background received the message".to_string()),
        }),
        _ => None,
    }
}

/// Why `runtime.onInstalled` fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    Other(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstalledDetails {
    #[serde(default)]
    pub reason: String,
}

impl InstalledDetails {
    pub fn reason(&self) -> InstallReason {
        match self.reason.as_str() {
            "install" => InstallReason::Install,
            "update" => InstallReason::Update,
            other => InstallReason::Other(other.to_string()),
        }
    }
}
