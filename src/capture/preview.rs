//! Transient display handles for captured photos.
//!
//! A handle stands in for a `blob:` object URL. It stays registered until it
//! is dropped, which is how the session revokes it.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct PreviewUrls {
    live: Rc<RefCell<HashSet<String>>>,
}

impl PreviewUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> DisplayHandle {
        let url = format!("blob:story-capture/{}", Uuid::new_v4());
        self.live.borrow_mut().insert(url.clone());
        DisplayHandle {
            url,
            registry: self.clone(),
        }
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.borrow().contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    fn revoke(&self, url: &str) {
        if self.live.borrow_mut().remove(url) {
            log::debug!("Revoked preview {}", url);
        }
    }
}

#[derive(Debug)]
pub struct DisplayHandle {
    url: String,
    registry: PreviewUrls,
}

impl DisplayHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_handle_revokes_url() {
        let urls = PreviewUrls::new();
        let handle = urls.create();
        let url = handle.url().to_string();
        assert!(url.starts_with("blob:"));
        assert!(urls.is_live(&url));

        drop(handle);
        assert!(!urls.is_live(&url));
        assert_eq!(urls.live_count(), 0);
    }
}
