pub mod handler;
#[cfg(feature = "teloxide-adapter")]
pub mod teloxide;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, MutexGuard, PoisonError};

use anyhow::Result;
use state_store::{StateStore, StoreError};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{instrument, Level};

use crate::dialogues::{
    prompt::{ConversationState, TextPrompt},
    ConversationId, EventKind, InboundEvent, MessageId, OutgoingMessage,
};

pub trait BotAdapter {
    fn send_message(
        &self,
        conversation: &ConversationId,
        msg: OutgoingMessage,
    ) -> impl Future<Output = Result<MessageId>> + Send;
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("invalid inbound event: {0}")]
    InvalidInput(&'static str),
    #[error("state store failed for conversation {conversation}: {source}")]
    Store {
        conversation: ConversationId,
        #[source]
        source: StoreError,
    },
    #[error("turn for conversation {0} was cancelled")]
    Cancelled(ConversationId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub state: ConversationState,
    pub reply: Option<OutgoingMessage>,
}

/// Computes one turn without touching any storage.
///
/// Only message events move the prompt; anything else keeps the state as is
/// and produces no reply.
pub fn apply_turn(
    prompt: &TextPrompt,
    event: &InboundEvent,
    state: ConversationState,
) -> TurnOutcome {
    match event.kind {
        EventKind::Message => {
            let (state, reply) = prompt.step(state, event.text());
            TurnOutcome {
                state,
                reply: Some(reply),
            }
        }
        EventKind::Other => TurnOutcome { state, reply: None },
    }
}

type LocksTable = HashMap<ConversationId, Arc<Mutex<()>>>;

#[derive(Default)]
struct ConversationLocks(std::sync::Mutex<LocksTable>);

/// Holds a conversation lock; the table entry goes away with the last user.
struct ConversationGuard<'a> {
    locks: &'a ConversationLocks,
    conversation: ConversationId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ConversationLocks {
    async fn acquire(&self, conversation: &ConversationId) -> ConversationGuard<'_> {
        let mut entry = ConversationGuard {
            locks: self,
            conversation: conversation.clone(),
            guard: None,
        };
        let lock = self.table().entry(conversation.clone()).or_default().clone();
        entry.guard = Some(lock.lock_owned().await);
        entry
    }

    fn table(&self) -> MutexGuard<'_, LocksTable> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn len(&self) -> usize {
        self.table().len()
    }
}

impl Drop for ConversationGuard<'_> {
    fn drop(&mut self) {
        let mut table = self.locks.table();
        drop(self.guard.take());
        if table
            .get(&self.conversation)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(&self.conversation);
        }
    }
}

/// Runs turns against a [`StateStore`], one at a time per conversation.
pub struct TurnHandler<S> {
    prompt: TextPrompt,
    store: S,
    locks: ConversationLocks,
}

impl<S> TurnHandler<S>
where
    S: StateStore<ConversationState>,
{
    pub fn new(prompt: TextPrompt, store: S) -> Self {
        TurnHandler {
            prompt,
            store,
            locks: ConversationLocks::default(),
        }
    }

    pub fn prompt(&self) -> &TextPrompt {
        &self.prompt
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the conversation state, applies the event and saves the result.
    ///
    /// The state is saved for every accepted event, message or not. The save
    /// is the commit point: cancellation is honored up to it, never during
    /// it, and a reply is returned only after it succeeded.
    #[instrument(
        level = Level::DEBUG,
        skip(self, event, cancel),
        fields(conversation = %event.conversation_id, kind = ?event.kind)
    )]
    pub async fn handle_turn(
        &self,
        event: InboundEvent,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, TurnError> {
        if event.conversation_id.as_str().is_empty() {
            return Err(TurnError::InvalidInput("conversation id is empty"));
        }
        let conversation = event.conversation_id.clone();
        let _guard = self.locks.acquire(&conversation).await;

        let state = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(TurnError::Cancelled(conversation)),
            result = self.store.load(conversation.as_str()) => {
                result.map_err(|source| store_failure(&conversation, source))?
            }
        }
        .unwrap_or_default();
        tracing::debug!("Loaded state {:?}", state.phase);

        let outcome = apply_turn(&self.prompt, &event, state);

        if cancel.is_cancelled() {
            return Err(TurnError::Cancelled(conversation));
        }
        self.store
            .save(conversation.as_str(), &outcome.state)
            .await
            .map_err(|source| store_failure(&conversation, source))?;
        tracing::debug!(
            "Saved state {:?}, reply: {}",
            outcome.state.phase,
            outcome.reply.is_some()
        );

        Ok(outcome)
    }
}

fn store_failure(conversation: &ConversationId, source: StoreError) -> TurnError {
    tracing::error!("State store failed for {conversation}: {source}");
    TurnError::Store {
        conversation: conversation.clone(),
        source,
    }
}
