use state_store::StateStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug_span, instrument, Instrument, Level};

use crate::dialogues::{prompt::ConversationState, InboundEvent, MessageId};

use super::{BotAdapter, TurnHandler};

pub type AnyResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
pub type HandlerResult = AnyResult<()>;

/// Runs a turn for `event` and delivers its reply, if there is one.
///
/// Nothing is sent when the turn fails.
#[instrument(level = Level::DEBUG, skip_all, fields(conversation = %event.conversation_id))]
pub async fn handle_interaction<S, B>(
    turns: &TurnHandler<S>,
    bot: &B,
    event: InboundEvent,
    cancel: &CancellationToken,
) -> AnyResult<Option<MessageId>>
where
    S: StateStore<ConversationState>,
    B: BotAdapter,
{
    let conversation = event.conversation_id.clone();
    let outcome = turns.handle_turn(event, cancel).await?;

    match outcome.reply {
        Some(reply) => {
            let msg_id = bot
                .send_message(&conversation, reply)
                .instrument(debug_span!("reply"))
                .await?;
            Ok(Some(msg_id))
        }
        None => {
            tracing::debug!("Nothing to send");
            Ok(None)
        }
    }
}
