//! HTTP client for the story catalog.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::services::stories::model::{Ack, Envelope, NewStory, StoryDetail, StoryList, StoryRecord};

#[async_trait::async_trait(?Send)]
pub trait StoryClient {
    async fn list_stories(&self) -> Result<Vec<StoryRecord>, ApiError>;

    async fn create_story(&self, story: NewStory) -> Result<(), ApiError>;

    async fn get_story(&self, id: &str) -> Result<StoryRecord, ApiError>;
}

pub struct HttpStoryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpStoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidUrl(base_url.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("story-capture/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
        })
    }

    pub fn stories_url(&self) -> Url {
        self.endpoint(&["stories"])
    }

    /// The id is percent-encoded as a single path segment.
    pub fn story_url(&self, id: &str) -> Url {
        self.endpoint(&["stories", id])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // base was checked in `new`, so it always has path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response, fallback: &str) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => envelope.into_body(fallback),
            Err(_) if !status.is_success() => Err(ApiError::Rejected(format!("{} (HTTP {})", fallback, status))),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl StoryClient for HttpStoryClient {
    async fn list_stories(&self) -> Result<Vec<StoryRecord>, ApiError> {
        log::debug!("Fetching stories from {}", self.stories_url());
        let response = self.client.get(self.stories_url()).send().await?;
        let list: StoryList = Self::read(response, "Failed to fetch stories").await?;
        log::info!("Fetched {} stories", list.list_story.len());
        Ok(list.list_story)
    }

    async fn create_story(&self, story: NewStory) -> Result<(), ApiError> {
        let photo = Part::bytes(story.photo.bytes().to_vec())
            .file_name(story.photo.file_name())
            .mime_str(story.photo.mime_type())?;
        let form = Form::new()
            .text("name", story.name)
            .text("description", story.description)
            .part("photo", photo)
            .text("lat", story.location.lat.to_string())
            .text("lon", story.location.lng.to_string());

        let response = self.client.post(self.stories_url()).multipart(form).send().await?;
        let _: Ack = Self::read(response, "Failed to add story").await?;
        log::info!("Story created");
        Ok(())
    }

    async fn get_story(&self, id: &str) -> Result<StoryRecord, ApiError> {
        let response = self.client.get(self.story_url(id)).send().await?;
        let detail: StoryDetail = Self::read(response, "Failed to fetch story detail").await?;
        detail
            .story
            .ok_or_else(|| ApiError::Rejected("Failed to fetch story detail".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_without_double_slash() {
        let client = HttpStoryClient::new("https://story-api.dicoding.dev/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.stories_url().as_str(), "https://story-api.dicoding.dev/v1/stories");
        assert_eq!(
            client.story_url("story-abc").as_str(),
            "https://story-api.dicoding.dev/v1/stories/story-abc"
        );
    }

    #[test]
    fn story_id_is_a_single_encoded_segment() {
        let client = HttpStoryClient::new("https://story-api.dicoding.dev/v1", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.story_url("../admin?x=1").as_str(),
            "https://story-api.dicoding.dev/v1/stories/..%2Fadmin%3Fx=1"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpStoryClient::new("mailto:someone@example.com", Duration::from_secs(5)),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(HttpStoryClient::new("not a url", Duration::from_secs(5)).is_err());
    }
}
