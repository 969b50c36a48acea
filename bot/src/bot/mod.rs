mod handlers;

use std::sync::Arc;

use prompt_dialogues::controller::teloxide::TeloxideAdapter;
use prompt_dialogues::{ConversationState, TextPrompt, TurnHandler};
use state_store::{file::FileStateStore, memory::MemoryStateStore, StateStore, StoreResult};
use tokio_util::sync::CancellationToken;

use crate::config::BotConfig;

pub use handlers::build_handler;

pub type SharedStore = Arc<dyn StateStore<ConversationState>>;

pub struct BotContext {
    pub turns: TurnHandler<SharedStore>,
    pub bot_adapter: TeloxideAdapter,
    pub cancel: CancellationToken,
}

impl BotContext {
    pub fn new(bot_adapter: TeloxideAdapter, store: SharedStore, cancel: CancellationToken) -> Self {
        BotContext {
            turns: TurnHandler::new(TextPrompt::name_prompt(), store),
            bot_adapter,
            cancel,
        }
    }
}

pub fn open_store(config: &BotConfig) -> StoreResult<SharedStore> {
    match &config.state_dir {
        Some(dir) => {
            log::info!("Keeping conversation states in {:?}", dir);
            Ok(Arc::new(FileStateStore::create(dir.clone())?))
        }
        None => {
            log::info!("Keeping conversation states in memory");
            Ok(Arc::new(MemoryStateStore::new()))
        }
    }
}
