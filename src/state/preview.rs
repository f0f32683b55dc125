/// Image preview resources
///
/// A preview is a decoded display handle for an image the user picked but
/// has not uploaded yet. Previews are owned here and handed out by id; the
/// owner of an id must `release` it when the image is replaced or the form
/// is reset. Nothing is reclaimed implicitly.

use iced::widget::image::Handle;
use std::collections::HashMap;
use tracing::debug;

use super::data::SelectedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(u64);

#[derive(Debug, Default)]
pub struct PreviewStore {
    live: HashMap<PreviewId, Handle>,
    next_id: u64,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for a selected image
    pub fn create(&mut self, image: &SelectedImage) -> PreviewId {
        self.next_id += 1;
        let id = PreviewId(self.next_id);
        self.live
            .insert(id, Handle::from_bytes(image.bytes.clone()));
        debug!("Created preview {:?} for {}", id, image.file_name);
        id
    }

    /// Display handle for a live preview
    pub fn get(&self, id: PreviewId) -> Option<&Handle> {
        self.live.get(&id)
    }

    /// Release a preview. Returns false if it was already gone.
    pub fn release(&mut self, id: PreviewId) -> bool {
        let released = self.live.remove(&id).is_some();
        if released {
            debug!("Released preview {:?}", id);
        }
        released
    }

    /// Number of previews currently held
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> SelectedImage {
        SelectedImage {
            file_name: name.to_string(),
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_create_and_release() {
        let mut store = PreviewStore::new();
        let a = store.create(&image("a.png"));
        let b = store.create(&image("b.png"));

        assert_ne!(a, b);
        assert_eq!(store.live_count(), 2);
        assert!(store.get(a).is_some());

        assert!(store.release(a));
        assert!(store.get(a).is_none());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_double_release_is_harmless() {
        let mut store = PreviewStore::new();
        let a = store.create(&image("a.png"));

        assert!(store.release(a));
        assert!(!store.release(a));
        assert_eq!(store.live_count(), 0);
    }
}
