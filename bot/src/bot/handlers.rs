use std::error::Error;
use std::sync::Arc;

use prompt_dialogues::controller::handler::{handle_interaction, HandlerResult};
use prompt_dialogues::controller::teloxide::other_update_event;
use prompt_dialogues::InboundEvent;
use teloxide::{
    dispatching::{DpHandlerDescription, UpdateFilterExt},
    dptree,
    prelude::{DependencyMap, Handler},
    types::{Message, Update},
};

use super::BotContext;

pub fn build_handler(
) -> Handler<'static, DependencyMap, Result<(), Box<dyn Error + Send + Sync>>, DpHandlerDescription>
{
    let messages_handler = Update::filter_message().endpoint(main_state_handler);

    let updates_handler =
        dptree::filter_map(|upd: Update| other_update_event(&upd)).endpoint(other_update_handler);

    dptree::entry()
        .branch(messages_handler)
        .branch(updates_handler)
}

async fn main_state_handler(msg: Message, context: Arc<BotContext>) -> HandlerResult {
    log::debug!(
        "Handling message. chat_id={} from={:?}",
        msg.chat.id,
        msg.from.as_ref().map(|f| f.id)
    );

    handle_interaction(
        &context.turns,
        &context.bot_adapter,
        msg.into(),
        &context.cancel,
    )
    .await
    .map(|_| ())
}

async fn other_update_handler(event: InboundEvent, context: Arc<BotContext>) -> HandlerResult {
    log::debug!(
        "Handling non-message update. chat_id={}",
        event.conversation_id
    );

    handle_interaction(&context.turns, &context.bot_adapter, event, &context.cancel)
        .await
        .map(|_| ())
}
