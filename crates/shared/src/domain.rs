use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque token naming the current position in the guided flow.
///
/// Issued by the server with every question and echoed back verbatim with
/// the answer to that question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Flow,
    Rag,
}

impl ChatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Flow => "flow",
            ChatMode::Rag => "rag",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    User,
    Bot,
}

/// Page identity. Every page is a full load: navigating discards all
/// client-side session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    FlowChat,
    RagChat,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::FlowChat => "/flow-chat",
            Page::RagChat => "/rag-chat",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" | "" => Some(Page::Home),
            "/flow-chat" => Some(Page::FlowChat),
            "/rag-chat" => Some(Page::RagChat),
            _ => None,
        }
    }

    /// Chat mode hosted by this page; the home page only offers navigation.
    pub fn mode(self) -> Option<ChatMode> {
        match self {
            Page::Home => None,
            Page::FlowChat => Some(ChatMode::Flow),
            Page::RagChat => Some(ChatMode::Rag),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown page '{0}' (expected home, flow-chat or rag-chat)")]
pub struct UnknownPage(pub String);

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(page) = Page::from_path(trimmed) {
            return Ok(page);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "home" => Ok(Page::Home),
            "flow" | "flow-chat" => Ok(Page::FlowChat),
            "rag" | "rag-chat" => Ok(Page::RagChat),
            _ => Err(UnknownPage(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_paths_round_trip_through_from_path() {
        for page in [Page::Home, Page::FlowChat, Page::RagChat] {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
        assert_eq!(Page::from_path("/settings"), None);
    }

    #[test]
    fn page_parses_short_names_and_paths() {
        assert_eq!("flow".parse::<Page>(), Ok(Page::FlowChat));
        assert_eq!("/rag-chat".parse::<Page>(), Ok(Page::RagChat));
        assert_eq!(" Home ".parse::<Page>(), Ok(Page::Home));
        assert!("admin".parse::<Page>().is_err());
    }

    #[test]
    fn only_chat_pages_carry_a_mode() {
        assert_eq!(Page::Home.mode(), None);
        assert_eq!(Page::FlowChat.mode(), Some(ChatMode::Flow));
        assert_eq!(Page::RagChat.mode(), Some(ChatMode::Rag));
    }
}
