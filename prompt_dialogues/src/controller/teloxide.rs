use anyhow::{Context, Result};
use teloxide::requests::Requester;
use teloxide::types::ChatId;
use teloxide::Bot;
use tracing::{instrument, Level};

use super::BotAdapter;
use crate::dialogues::{self, ConversationId, InboundEvent, MessageId, OutgoingMessage};

impl From<teloxide::types::MessageId> for dialogues::MessageId {
    fn from(val: teloxide::types::MessageId) -> Self {
        dialogues::MessageId(val.0)
    }
}

impl From<ChatId> for ConversationId {
    fn from(val: ChatId) -> Self {
        val.0.into()
    }
}

impl TryFrom<&ConversationId> for ChatId {
    type Error = anyhow::Error;

    fn try_from(val: &ConversationId) -> Result<Self> {
        val.as_str()
            .parse::<i64>()
            .map(ChatId)
            .with_context(|| format!("Conversation {val} is not a telegram chat id"))
    }
}

impl From<teloxide::types::Message> for InboundEvent {
    fn from(val: teloxide::types::Message) -> Self {
        InboundEvent::message(val.chat.id, val.text().map(|t| t.to_string()))
    }
}

/// Turns a non-message update into an event of its chat. Updates without a
/// chat can't be attributed to a conversation.
pub fn other_update_event(update: &teloxide::types::Update) -> Option<InboundEvent> {
    update.chat().map(|chat| InboundEvent::other(chat.id))
}

#[derive(Clone)]
pub struct TeloxideAdapter {
    bot: Bot,
}

impl TeloxideAdapter {
    pub fn new(bot: Bot) -> Self {
        TeloxideAdapter { bot }
    }
}

impl BotAdapter for TeloxideAdapter {
    #[instrument(level = Level::DEBUG, skip(self, msg))]
    async fn send_message(
        &self,
        conversation: &ConversationId,
        msg: OutgoingMessage,
    ) -> Result<MessageId> {
        let chat_id = ChatId::try_from(conversation)?;

        self.bot
            .send_message(chat_id, String::from(msg))
            .await
            .map(|msg| msg.id.into())
            .with_context(|| format!("Failed message for {conversation} sending"))
    }
}
