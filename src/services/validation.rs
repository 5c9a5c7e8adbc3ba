use crate::error::FieldErrors;
use crate::state::draft::DraftRecord;

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 1000;

/// Trim and drop angle brackets so text cannot smuggle markup.
pub fn sanitize_input(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    stripped.trim().to_string()
}

/// Check a draft. An empty map means the draft can be submitted.
pub fn validate(draft: &DraftRecord) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required".to_string());
    } else if name.chars().count() > NAME_MAX {
        errors.insert("name", format!("Name must be at most {} characters", NAME_MAX));
    }

    let description = draft.description.trim();
    let len = description.chars().count();
    if description.is_empty() {
        errors.insert("description", "Description is required".to_string());
    } else if len < DESCRIPTION_MIN {
        errors.insert(
            "description",
            format!("Description must be at least {} characters", DESCRIPTION_MIN),
        );
    } else if len > DESCRIPTION_MAX {
        errors.insert(
            "description",
            format!("Description must be at most {} characters", DESCRIPTION_MAX),
        );
    }

    if draft.photo.is_none() {
        errors.insert("photo", "Please capture a photo for your story".to_string());
    }
    if draft.location.is_none() {
        errors.insert("location", "Please select a location on the map".to_string());
    }

    errors
}
