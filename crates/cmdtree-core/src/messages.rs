//! Localized message catalog and dispatch settings
//!
//! Every user-facing string the engine produces comes from [`Messages`].
//! A catalog can be loaded from TOML; keys that are absent keep their
//! default text, so a file only needs to name what it overrides.
//!
//! Templates use `{name}` placeholders filled by [`render`].

use std::path::Path;

use serde::Deserialize;

use crate::errors::{ExError, ExErrorKind, Result};

/// Default help trigger keywords, compared case-insensitively
pub const DEFAULT_HELP_KEYWORDS: [&str; 3] = ["help", "?", "--help"];

/// User-facing message templates
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Sent when a permission-gated argument is read without the permission
    pub no_permission: String,
    /// Sent in place of "permission denied" so restricted commands stay hidden
    pub unknown_command: String,
    /// Sent when a player-only command is run by the console
    pub player_only: String,
    /// Sent when a console-only command is run by a player
    pub console_only: String,
    /// Usage line; `{command}` is the qualified name, `{args}` the argument description
    pub usage: String,
    /// Generic message for unexpected handler faults
    pub internal_error: String,
    /// Sent by cooldown checks; `{seconds}` is the remaining time
    pub cooldown: String,
    /// First line of a help listing; `{command}` is the qualified name
    pub help_header: String,
    /// One line per child in a help listing; `{command}` and `{args}`
    pub help_entry: String,
    /// Appended to a help entry when the child has a description
    pub help_description: String,
    /// Fallback invalid message for custom lookups; `{type}` and `{arg}`
    pub invalid_value: String,
    /// Invalid text value (only reachable through custom validation)
    pub invalid_string: String,
    pub invalid_char: String,
    pub invalid_chars: String,
    pub invalid_bool: String,
    pub invalid_byte: String,
    pub invalid_short: String,
    pub invalid_int: String,
    pub invalid_long: String,
    pub invalid_float: String,
    pub invalid_double: String,
    pub invalid_uuid: String,
    pub invalid_duration: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_permission: "You don't have permission to use this argument.".to_string(),
            unknown_command: "Unknown command. Type \"/help\" for help.".to_string(),
            player_only: "Only players can use this command.".to_string(),
            console_only: "This command can only be used from the console.".to_string(),
            usage: "Usage: /{command} {args}".to_string(),
            internal_error: "An internal error occurred while executing this command."
                .to_string(),
            cooldown: "You must wait {seconds}s before using this command again.".to_string(),
            help_header: "Help for /{command}:".to_string(),
            help_entry: "/{command} {args}".to_string(),
            help_description: " - {description}".to_string(),
            invalid_value: "'{arg}' is not a valid {type}.".to_string(),
            invalid_string: "'{arg}' is not a valid text.".to_string(),
            invalid_char: "'{arg}' is not a single character.".to_string(),
            invalid_chars: "'{arg}' is not a valid character sequence.".to_string(),
            invalid_bool: "'{arg}' is not a valid boolean (use true or false).".to_string(),
            invalid_byte: "'{arg}' is not a valid byte.".to_string(),
            invalid_short: "'{arg}' is not a valid short number.".to_string(),
            invalid_int: "'{arg}' is not a valid integer.".to_string(),
            invalid_long: "'{arg}' is not a valid long number.".to_string(),
            invalid_float: "'{arg}' is not a valid decimal number.".to_string(),
            invalid_double: "'{arg}' is not a valid decimal number.".to_string(),
            invalid_uuid: "'{arg}' is not a valid UUID.".to_string(),
            invalid_duration: "'{arg}' is not a valid duration (e.g. 30s, 5m, 2h).".to_string(),
        }
    }
}

impl Messages {
    /// Parse a catalog from TOML text
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the text is not valid TOML or a key has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("messages_parse")
                .with_message(format!("TOML parse error: {}", e))
        })
    }

    /// Load a catalog from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, or `InvalidConfig` if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("messages_load")
                .with_message(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Usage line for a command
    pub fn usage_line(&self, command: &str, args: &str) -> String {
        render(&self.usage, &[("command", command), ("args", args)])
            .trim_end()
            .to_string()
    }
}

/// Fill `{key}` placeholders in a template
///
/// Unknown placeholders are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Settings shared by every dispatch through one registry
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Message catalog
    pub messages: Messages,
    /// Tokens that trigger a help listing on nodes with children
    pub help_keywords: Vec<String>,
    /// Whether privileged principals see the fault message after the generic one
    pub show_fault_details: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            messages: Messages::default(),
            help_keywords: DEFAULT_HELP_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            show_fault_details: true,
        }
    }
}

impl DispatchSettings {
    /// Settings with a custom message catalog
    pub fn with_messages(messages: Messages) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Whether `token` is a help trigger
    pub fn is_help_keyword(&self, token: &str) -> bool {
        self.help_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(token))
    }
}
