//! Client-facing shapes referenced by the configuration: action buttons,
//! keyboard shortcuts and emoji settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A button in the top bar that runs a named command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButton {
    /// Icon name, e.g. `Home`.
    pub icon: String,
    /// Tooltip text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Command to run when clicked.
    pub command: String,
    /// Fixed arguments passed to the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<serde_json::Value>>,
    /// Restrict the button to (or hide it from) mobile layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
}

impl ActionButton {
    pub fn new(icon: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            description: None,
            command: command.into(),
            args: None,
            mobile: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Key binding override for a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Binding used on macOS instead of `key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slash_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

/// Emoji aliasing: alias name -> emoji.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmojiConfig {
    pub aliases: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_button_skips_absent_fields() {
        let button = ActionButton::new("Home", "Navigate: Home");
        let json = serde_json::to_value(&button).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "icon": "Home", "command": "Navigate: Home" })
        );
    }

    #[test]
    fn shortcut_uses_camel_case() {
        let shortcut: Shortcut = serde_json::from_value(serde_json::json!({
            "command": "Insert Template",
            "slashCommand": "tpl",
            "priority": 2
        }))
        .expect("deserialize");
        assert_eq!(shortcut.slash_command.as_deref(), Some("tpl"));
        assert_eq!(shortcut.priority, Some(2.0));
        assert!(shortcut.key.is_none());
    }
}
