#[tokio::main(flavor = "current_thread")]
async fn main() {
    story_capture::init_logging();
    if let Err(e) = story_capture::run().await {
        log::error!("Failed to load stories: {}", e);
        std::process::exit(1);
    }
}
