//! Keyboard commands

use crate::dispatcher::UserAction;
use serde::{Deserialize, Serialize};

/// Command identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Navigation commands
    pub const NAV_NEXT_ITEM: &'static str = "nav.next_item";
    pub const NAV_PREV_ITEM: &'static str = "nav.prev_item";

    // View commands
    pub const VIEW_CLOSE_MODAL: &'static str = "view.close_modal";

    // App commands
    pub const APP_REFRESH: &'static str = "app.refresh";
    pub const APP_EXIT: &'static str = "app.exit";
}

/// A resolved keyboard command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
}

impl Command {
    pub fn new(id: &str) -> Self {
        Self {
            id: CommandId::new(id),
        }
    }

    /// Gallery action this command maps to.
    ///
    /// `app.exit` and unknown ids have no gallery action; the event loop
    /// handles exit itself.
    pub fn to_action(&self) -> Option<UserAction> {
        match self.id.as_str() {
            CommandId::NAV_NEXT_ITEM => Some(UserAction::ModalNext),
            CommandId::NAV_PREV_ITEM => Some(UserAction::ModalPrev),
            CommandId::VIEW_CLOSE_MODAL => Some(UserAction::CloseModal),
            CommandId::APP_REFRESH => Some(UserAction::Refresh),
            _ => None,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.id.as_str() == CommandId::APP_EXIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_actions() {
        assert_eq!(Command::new("nav.next_item").to_action(), Some(UserAction::ModalNext));
        assert_eq!(Command::new("view.close_modal").to_action(), Some(UserAction::CloseModal));
        assert_eq!(Command::new("app.exit").to_action(), None);
        assert!(Command::new("app.exit").is_exit());
        assert_eq!(Command::new("nav.sideways").to_action(), None);
    }
}
