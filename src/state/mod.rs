pub mod draft;

pub use draft::{DraftRecord, SharedDraft};
