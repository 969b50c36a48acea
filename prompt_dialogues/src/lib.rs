pub mod controller;
pub mod dialogues;

pub use controller::{
    apply_turn, handler::handle_interaction, BotAdapter, TurnError, TurnHandler, TurnOutcome,
};
pub use dialogues::{
    prompt::{ConversationState, Phase, TextPrompt},
    validator::{validate_name, PromptValidator, ValidationOutcome},
    ConversationId, EventKind, InboundEvent, MessageId, OutgoingMessage,
};
