// ABOUTME: Domain types for settings updates
// ABOUTME: In-flight representation of an uploaded avatar

/// An avatar payload as received at the boundary, before validation.
/// `content_type` and `file_name` are the caller's declarations; the actual
/// bytes are what validation judges.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub content: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl AvatarUpload {
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}
