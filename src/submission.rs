//! Submission flow: validate the draft, upload it, then reset the view.

use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use crate::capture::CaptureSession;
use crate::config::AppConfig;
use crate::error::SubmitError;
use crate::events::{MessageKind, Route, SubmitControl, UiEvent};
use crate::location::{LocationPicker, MapBackend};
use crate::services::stories::{NewStory, StoryClient};
use crate::services::validation::{sanitize_input, validate};
use crate::state::draft::SharedDraft;

pub const SUBMIT_LABEL: &str = "Share Story";
pub const SUBMIT_BUSY_LABEL: &str = "Sharing Story...";
pub const SUCCESS_MESSAGE: &str = "Story shared successfully! 🎉";
pub const GLOBAL_ERROR_MESSAGE: &str = "Something went wrong. Please refresh the page and try again.";

/// A navigation the host should perform once `delay` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTransition {
    pub route: Route,
    pub delay: Duration,
}

impl ViewTransition {
    pub async fn wait(self) -> Route {
        tokio::time::sleep(self.delay).await;
        self.route
    }
}

#[derive(Debug, Clone)]
struct ErrorBanner {
    message: String,
    raised_at: Instant,
    ttl: Duration,
}

pub struct StoryComposer {
    draft: SharedDraft,
    redirect_delay: Duration,
    banner_ttl: Duration,
    control: SubmitControl,
    banner: Option<ErrorBanner>,
    events: UnboundedSender<UiEvent>,
}

impl StoryComposer {
    pub fn new(draft: SharedDraft, config: &AppConfig) -> (Self, UnboundedReceiver<UiEvent>) {
        let (events, rx) = unbounded_channel();
        let composer = Self {
            draft,
            redirect_delay: config.redirect_delay(),
            banner_ttl: config.banner_ttl(),
            control: SubmitControl {
                disabled: false,
                label: SUBMIT_LABEL.to_string(),
            },
            banner: None,
            events,
        };
        (composer, rx)
    }

    pub fn draft(&self) -> &SharedDraft {
        &self.draft
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.control
    }

    pub fn set_fields(&self, name: &str, description: &str) {
        self.draft.set_text(name, description);
    }

    /// Validate and upload the current draft.
    ///
    /// On success both subsystems are cleaned up and the returned transition
    /// says where to go next. On failure the photo and location are kept so
    /// the user can retry without recapturing.
    pub async fn submit<C, B>(
        &mut self,
        client: &C,
        capture: &mut CaptureSession,
        picker: &mut LocationPicker<B>,
    ) -> Result<ViewTransition, SubmitError>
    where
        C: StoryClient + ?Sized,
        B: MapBackend,
    {
        self.set_busy(true);
        let result = self.try_submit(client, capture, picker).await;
        self.set_busy(false);
        result
    }

    async fn try_submit<C, B>(
        &mut self,
        client: &C,
        capture: &mut CaptureSession,
        picker: &mut LocationPicker<B>,
    ) -> Result<ViewTransition, SubmitError>
    where
        C: StoryClient + ?Sized,
        B: MapBackend,
    {
        // validate the text that will actually be sent
        let mut draft = self.draft.snapshot();
        draft.name = sanitize_input(&draft.name);
        draft.description = sanitize_input(&draft.description);
        let mut errors = validate(&draft);
        let (photo, location) = match (draft.photo, draft.location) {
            (Some(photo), Some(location)) if errors.is_empty() => (photo, location),
            _ => {
                if errors.is_empty() {
                    errors.insert("photo", "Please capture a photo for your story".to_string());
                }
                log::warn!("Story draft incomplete: {:?}", errors.keys().collect::<Vec<_>>());
                self.emit(UiEvent::FieldErrors {
                    errors: errors.clone(),
                });
                return Err(SubmitError::Validation(errors));
            }
        };

        let story = NewStory {
            name: draft.name,
            description: draft.description,
            photo,
            location,
        };

        match client.create_story(story).await {
            Ok(()) => {
                self.emit(UiEvent::Message {
                    kind: MessageKind::Success,
                    text: SUCCESS_MESSAGE.to_string(),
                });
                self.draft.clear_text();
                capture.cleanup();
                picker.cleanup();

                let transition = ViewTransition {
                    route: Route::Home,
                    delay: self.redirect_delay,
                };
                self.emit(UiEvent::Navigate {
                    route: transition.route,
                    delay_ms: transition.delay.as_millis() as u64,
                });
                Ok(transition)
            }
            Err(err) => {
                log::error!("Error submitting story: {}", err);
                let err = SubmitError::from(err);
                self.emit(UiEvent::Message {
                    kind: MessageKind::Error,
                    text: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Surface an unexpected failure as a transient banner. The running
    /// session is left as it is.
    pub fn report_uncaught(&mut self, err: &dyn std::error::Error) {
        log::error!("Uncaught error: {}", err);
        self.banner = Some(ErrorBanner {
            message: GLOBAL_ERROR_MESSAGE.to_string(),
            raised_at: Instant::now(),
            ttl: self.banner_ttl,
        });
        self.emit(UiEvent::Banner {
            message: GLOBAL_ERROR_MESSAGE.to_string(),
            dismiss_after_ms: self.banner_ttl.as_millis() as u64,
        });
    }

    /// The banner text, until it auto-dismisses.
    pub fn visible_banner(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.raised_at.elapsed() < b.ttl)
            .map(|b| b.message.as_str())
    }

    fn set_busy(&mut self, busy: bool) {
        self.control = SubmitControl {
            disabled: busy,
            label: (if busy { SUBMIT_BUSY_LABEL } else { SUBMIT_LABEL }).to_string(),
        };
        self.emit(UiEvent::SubmitState(self.control.clone()));
    }

    fn emit(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            log::debug!("UI event dropped, no listener");
        }
    }
}
