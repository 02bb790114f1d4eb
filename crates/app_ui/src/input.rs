//! Input handling and keybinding resolution

use app_core::{Command, CommandId};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Maps key presses to commands using the configured keybindings
pub struct InputHandler {
    /// Lowercased key string -> command ID
    bindings: HashMap<String, String>,
    modifiers: ModifiersState,
}

impl InputHandler {
    /// Create a handler from `command -> keys` bindings
    pub fn new(bindings: HashMap<String, Vec<String>>) -> Self {
        let mut key_to_command = HashMap::new();

        for (command, keys) in bindings {
            for key in keys {
                let key = key.to_lowercase();
                if let Some(previous) = key_to_command.insert(key.clone(), command.clone()) {
                    tracing::warn!("Key {} bound to both {} and {}", key, previous, command);
                }
            }
        }

        Self {
            bindings: key_to_command,
            modifiers: ModifiersState::empty(),
        }
    }

    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Handle a key event and return the bound command
    pub fn handle_key(&self, event: &KeyEvent) -> Option<Command> {
        if event.state != ElementState::Pressed {
            return None;
        }
        let key = key_name(&event.logical_key)?;
        self.resolve(&build_key_string(self.modifiers, &key))
    }

    /// Look up a full key string such as `Ctrl+r`
    pub fn resolve(&self, key_string: &str) -> Option<Command> {
        tracing::trace!("Key pressed: {}", key_string);
        self.bindings
            .get(&key_string.to_lowercase())
            .map(|cmd_id| Command::new(cmd_id))
    }

    /// Mouse back/forward buttons step through the modal
    pub fn handle_mouse_button(&self, button: MouseButton, state: ElementState) -> Option<Command> {
        if state != ElementState::Pressed {
            return None;
        }
        match button {
            MouseButton::Back => Some(Command::new(CommandId::NAV_PREV_ITEM)),
            MouseButton::Forward => Some(Command::new(CommandId::NAV_NEXT_ITEM)),
            _ => None,
        }
    }
}

/// Prefix a key name with the held modifiers, e.g. `Ctrl+Shift+r`
pub fn build_key_string(modifiers: ModifiersState, key: &str) -> String {
    let mut parts = Vec::new();

    if modifiers.control_key() {
        parts.push("Ctrl");
    }
    if modifiers.alt_key() {
        parts.push("Alt");
    }
    if modifiers.shift_key() {
        parts.push("Shift");
    }
    if modifiers.super_key() {
        parts.push("Super");
    }

    parts.push(key);
    parts.join("+")
}

/// Name of a logical key as written in keybindings
pub fn key_name(key: &Key) -> Option<String> {
    let name = match key {
        Key::Named(named) => match named {
            NamedKey::Space => "Space".to_string(),
            NamedKey::Enter => "Return".to_string(),
            NamedKey::Tab => "Tab".to_string(),
            NamedKey::Escape => "Escape".to_string(),
            NamedKey::Backspace => "Backspace".to_string(),
            NamedKey::Delete => "Delete".to_string(),
            NamedKey::Home => "Home".to_string(),
            NamedKey::End => "End".to_string(),
            NamedKey::PageUp => "PageUp".to_string(),
            NamedKey::PageDown => "PageDown".to_string(),
            NamedKey::ArrowUp => "Up".to_string(),
            NamedKey::ArrowDown => "Down".to_string(),
            NamedKey::ArrowLeft => "Left".to_string(),
            NamedKey::ArrowRight => "Right".to_string(),
            // Modifiers alone never form a binding
            NamedKey::Control | NamedKey::Alt | NamedKey::Shift | NamedKey::Super => return None,
            _ => format!("{:?}", named),
        },
        Key::Character(c) => c.to_string(),
        _ => return None,
    };
    Some(name)
}
