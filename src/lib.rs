pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod lifecycle;
pub mod location;
pub mod services;
pub mod state;
pub mod submission;

use crate::config::AppConfig;
use crate::feed::StoryCard;
use crate::services::stories::{HttpStoryClient, StoryClient};

/// Initialise `env_logger`, defaulting to `info` unless `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Fetch the story feed and print one line per card.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let client = HttpStoryClient::new(&config.api_base_url, config.request_timeout())?;

    let stories = client.list_stories().await?;
    if stories.is_empty() {
        println!("{}", feed::cards::EMPTY_FEED_MESSAGE);
        return Ok(());
    }
    for story in &stories {
        let card = StoryCard::from(story);
        println!("{}  {}  {}  {}", card.date_label, card.location_label, story.name, story.id);
    }
    Ok(())
}
