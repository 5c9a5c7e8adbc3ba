pub mod client;
pub mod model;

pub use client::{HttpStoryClient, StoryClient};
pub use model::{NewStory, StoryRecord};
