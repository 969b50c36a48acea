use std::path::Path;
use std::sync::Arc;

use bot::bot::{build_handler, open_store, BotContext};
use bot::config::BotConfig;
use prompt_dialogues::controller::teloxide::TeloxideAdapter;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            log::info!("Ctrl-C received, cancelling pending turns");
            cancel.cancel();
        }
        Err(err) => log::error!("Failed Ctrl-C listening: {}", err),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        let env_file = Path::new(".env");
        if env_file.exists() {
            dotenv::from_filename(".env")?;
        }
    }
    let config = BotConfig::from_env()?;
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&config.log_filter)
        .init();

    log::info!("Starting bot...");
    let bot = Bot::from_env();
    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let context = Arc::new(BotContext::new(
        TeloxideAdapter::new(bot.clone()),
        open_store(&config)?,
        cancel,
    ));

    Dispatcher::builder(bot, build_handler())
        .dependencies(dptree::deps![context])
        .default_handler(|upd| async move {
            log::warn!("Unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
