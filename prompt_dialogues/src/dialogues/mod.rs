pub mod prompt;
pub mod validator;

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    text: String,
}

impl OutgoingMessage {
    pub fn new(text: String) -> Self {
        OutgoingMessage { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<String> for OutgoingMessage {
    fn from(val: String) -> Self {
        OutgoingMessage::new(val)
    }
}

impl From<&str> for OutgoingMessage {
    fn from(val: &str) -> Self {
        OutgoingMessage::new(val.into())
    }
}

impl From<OutgoingMessage> for String {
    fn from(val: OutgoingMessage) -> Self {
        val.text
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);
impl Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversationId(pub String);
impl ConversationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<String> for ConversationId {
    fn from(val: String) -> Self {
        Self(val)
    }
}
impl From<&str> for ConversationId {
    fn from(val: &str) -> Self {
        Self(val.to_string())
    }
}
impl From<i64> for ConversationId {
    fn from(val: i64) -> Self {
        Self(val.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Message,
    /// Any activity that isn't a user message (edits, member updates, etc.).
    Other,
}

#[derive(Clone, Debug)]
pub struct InboundEvent {
    pub conversation_id: ConversationId,
    pub kind: EventKind,
    pub text: Option<String>,
}

impl InboundEvent {
    pub fn new(conversation_id: ConversationId, kind: EventKind, text: Option<String>) -> Self {
        InboundEvent {
            conversation_id,
            kind,
            text,
        }
    }

    pub fn message<C: Into<ConversationId>>(conversation_id: C, text: Option<String>) -> Self {
        Self::new(conversation_id.into(), EventKind::Message, text)
    }

    pub fn other<C: Into<ConversationId>>(conversation_id: C) -> Self {
        Self::new(conversation_id.into(), EventKind::Other, None)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_message(&self) -> bool {
        self.kind == EventKind::Message
    }
}
