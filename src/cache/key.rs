use std::fmt;

/// Revision-scoped cache key: `{page_id}-{revision_id}-{TARGET}`.
///
/// Any edit of the base page produces a new revision id and therefore a new
/// key, so stale translations are never served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(page_id: u64, revision_id: u64, target_lang: &str) -> Self {
        Self(format!(
            "{page_id}-{revision_id}-{}",
            target_lang.trim().to_uppercase()
        ))
    }

    /// Rebuilds a key carried in a job payload.
    pub const fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the translated page title.
    pub fn title(&self) -> String {
        format!("{}-title", self.0)
    }

    /// Key of the in-flight job marker.
    pub fn progress(&self) -> String {
        format!("{}-progress", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
