use chrono::Local;

use crate::config::MapConfig;
use crate::error::LocationError;
use crate::feed::cards::format_date_short;
use crate::feed::{escape_html, truncate};
use crate::location::{Bounds, MapBackend, MapEvent, MapWidget, MarkerId, MarkerKind, MarkerSpec};
use crate::services::stories::StoryRecord;

pub const STORIES_MAP_CONTAINER: &str = "stories-map";
pub const POPUP_EXCERPT_CHARS: usize = 100;

/// Map of every story that has coordinates.
pub struct StoriesMap<B: MapBackend> {
    backend: B,
    widget: Option<B::Widget>,
    config: MapConfig,
    markers: Vec<MarkerId>,
    error: Option<LocationError>,
}

fn popup_html(story: &StoryRecord) -> String {
    let name = escape_html(&story.name);
    format!(
        r#"<div class="story-popup">
    <h4>{name}</h4>
    <img src="{}" alt="{name}">
    <p>{}</p>
    <small>📅 {}</small>
</div>"#,
        escape_html(&story.photo_url),
        escape_html(&truncate(&story.description, POPUP_EXCERPT_CHARS)),
        format_date_short(&story.created_at.with_timezone(&Local)),
    )
}

impl<B: MapBackend> StoriesMap<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        Self {
            backend,
            widget: None,
            config,
            markers: Vec::new(),
            error: None,
        }
    }

    pub fn widget(&self) -> Option<&B::Widget> {
        self.widget.as_ref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn error(&self) -> Option<&LocationError> {
        self.error.as_ref()
    }

    pub fn initialize(&mut self) {
        self.cleanup();
        match self
            .backend
            .create(STORIES_MAP_CONTAINER, self.config.default_center, self.config.stories_zoom)
        {
            Ok(widget) => {
                self.widget = Some(widget);
                log::info!("Stories map initialized");
            }
            Err(err) => {
                log::error!("Error initializing stories map: {}", err);
                self.error = Some(LocationError::MapUnavailable("Failed to load stories map".into()));
            }
        }
    }

    /// Replace all story markers. Returns how many were placed.
    pub fn update(&mut self, stories: &[StoryRecord]) -> usize {
        let Some(widget) = self.widget.as_mut() else {
            return 0;
        };
        for id in self.markers.drain(..) {
            widget.remove_marker(id);
        }

        let mut placed = Vec::new();
        for story in stories {
            if let Some(position) = story.location() {
                self.markers.push(widget.add_marker(MarkerSpec {
                    position,
                    kind: MarkerKind::Story,
                    popup: Some(popup_html(story)),
                }));
                placed.push(position);
            }
        }

        if let Some(bounds) = Bounds::enclosing(placed.iter().copied()) {
            widget.fit_bounds(bounds, self.config.fit_padding, self.config.fit_max_zoom);
        }
        log::info!("Added {} story markers to map", placed.len());
        placed.len()
    }

    pub fn handle_event(&mut self, event: MapEvent) {
        if let (MapEvent::Resize, Some(widget)) = (event, self.widget.as_mut()) {
            widget.invalidate_size();
        }
    }

    pub fn cleanup(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            widget.remove();
        }
        self.markers.clear();
        self.error = None;
    }
}

impl<B: MapBackend> Drop for StoriesMap<B> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
