// SPDX-License-Identifier: GPL-3.0-only

//! Submitted image payloads

use std::fmt;
use std::sync::Arc;

/// An immutable image payload together with the name it was submitted under
///
/// Cloning is cheap: the bytes are shared, never copied. The `(name, len)`
/// pair is what duplicate detection compares.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Original filename
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mime type sent with the upload
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the payload
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether `other` counts as a re-submission of this image
    pub fn is_duplicate_of(&self, other: &SourceImage) -> bool {
        self.name == other.name && self.len() == other.len()
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_matches_name_and_length_only() {
        let a = SourceImage::new("a.jpg", "image/jpeg", vec![1u8; 1024]);
        let same = SourceImage::new("a.jpg", "image/png", vec![7u8; 1024]);
        let renamed = SourceImage::new("b.jpg", "image/jpeg", vec![1u8; 1024]);
        let resized = SourceImage::new("a.jpg", "image/jpeg", vec![1u8; 1023]);

        assert!(a.is_duplicate_of(&same));
        assert!(!a.is_duplicate_of(&renamed));
        assert!(!a.is_duplicate_of(&resized));
    }

    #[test]
    fn test_clone_shares_bytes() {
        let a = SourceImage::new("a.jpg", "image/jpeg", vec![0u8; 16]);
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.shared_bytes(), &b.shared_bytes()));
    }
}
