use serde::Serialize;

use crate::error::FieldErrors;

/// Event names for core -> UI communication
pub const FIELD_ERRORS: &str = "form:field-errors";
pub const SUBMIT_STATE_CHANGED: &str = "form:submit-state";
pub const STORY_MESSAGE: &str = "story:message";
pub const VIEW_NAVIGATE: &str = "view:navigate";
pub const GLOBAL_ERROR: &str = "app:error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Add,
}

impl Route {
    pub fn hash(&self) -> &'static str {
        match self {
            Route::Home => "#home",
            Route::Add => "#add",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiEvent {
    FieldErrors { errors: FieldErrors },
    SubmitState(SubmitControl),
    Message { kind: MessageKind, text: String },
    Navigate { route: Route, delay_ms: u64 },
    Banner { message: String, dismiss_after_ms: u64 },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::FieldErrors { .. } => FIELD_ERRORS,
            UiEvent::SubmitState(_) => SUBMIT_STATE_CHANGED,
            UiEvent::Message { .. } => STORY_MESSAGE,
            UiEvent::Navigate { .. } => VIEW_NAVIGATE,
            UiEvent::Banner { .. } => GLOBAL_ERROR,
        }
    }
}
