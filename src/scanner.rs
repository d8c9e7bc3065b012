//! Conversation fragment discovery.
//!
//! Walks `<raw root>/messages/inbox` and yields every fragment file together
//! with the conversation identifier of its directory. Filtering rules are
//! plain functions so they can be checked against synthetic paths.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::models::FragmentRef;
use crate::stager::{check_raw_root, inbox_dir};

/// Default fragment file extension
pub const DEFAULT_FRAGMENT_EXTENSION: &str = "json";

/// Default separator limit, counted as for `raw-data/<archive>/...`
pub const DEFAULT_MAX_PATH_SEPARATORS: usize = 6;

/// Separators contributed by the `<raw dir>/<archive id>/` prefix
const ROOT_PREFIX_SEPARATORS: usize = 2;

fn conversation_id_re() -> &'static Regex {
    static CONVERSATION_ID_RE: OnceLock<Regex> = OnceLock::new();
    CONVERSATION_ID_RE.get_or_init(|| Regex::new(r"\w[a-zA-Z0-9_\-]+$").expect("valid conversation id regex"))
}

/// True when `path` has the fragment extension (case-sensitive)
#[must_use]
pub fn has_fragment_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Number of separators in `relative` once the raw root prefix is added.
///
/// `messages/inbox/alice_1/message_1.json` counts as 5.
#[must_use]
pub fn separator_depth(relative: &Path) -> usize {
    relative.components().count().saturating_sub(1) + ROOT_PREFIX_SEPARATORS
}

/// True when a fragment at `relative` (to the raw root) is shallow enough
#[must_use]
pub fn within_depth(relative: &Path, max_separators: usize) -> bool {
    separator_depth(relative) < max_separators
}

/// Trailing identifier token of a directory path string
#[must_use]
pub fn conversation_id_from_dir(dir: &str) -> Option<String> {
    conversation_id_re().find(dir).map(|m| m.as_str().to_string())
}

/// Conversation identifier of a fragment file, taken from its parent directory
#[must_use]
pub fn conversation_id(fragment: &Path) -> Option<String> {
    let parent = fragment.parent()?;
    conversation_id_from_dir(&parent.to_string_lossy())
}

/// Discovers conversation fragments under a raw export root
#[derive(Debug, Clone)]
pub struct ConversationScanner {
    raw_root: PathBuf,
    inbox: PathBuf,
    extension: String,
    max_separators: usize,
}

impl ConversationScanner {
    /// Scanner with the default extension and depth limit
    pub fn new(raw_root: impl Into<PathBuf>) -> Self {
        let raw_root = raw_root.into();
        Self {
            inbox: inbox_dir(&raw_root),
            raw_root,
            extension: DEFAULT_FRAGMENT_EXTENSION.to_string(),
            max_separators: DEFAULT_MAX_PATH_SEPARATORS,
        }
    }

    /// Override the fragment extension
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Override the separator limit
    #[must_use]
    pub fn with_max_separators(mut self, max_separators: usize) -> Self {
        self.max_separators = max_separators;
        self
    }

    /// Start a new scan.
    ///
    /// Fails immediately if the raw root or its inbox is missing. The
    /// returned iterator is lazy and each call starts from the beginning.
    /// Entries within a directory are visited in file-name order.
    pub fn scan(&self) -> Result<impl Iterator<Item = Result<FragmentRef>> + '_> {
        check_raw_root(&self.raw_root)?;

        let walker = WalkDir::new(&self.inbox)
            .sort_by_file_name()
            .into_iter();

        Ok(walker.filter_map(move |entry| match entry {
            Ok(entry) => self.accept(entry.path()).map(Ok),
            Err(e) => Some(Err(e.into())),
        }))
    }

    fn accept(&self, path: &Path) -> Option<FragmentRef> {
        if !path.is_file() || !has_fragment_extension(path, &self.extension) {
            return None;
        }

        let relative = path.strip_prefix(&self.raw_root).unwrap_or(path);
        if !within_depth(relative, self.max_separators) {
            debug!(path = %path.display(), "Skipping fragment nested too deep");
            return None;
        }

        if path.parent() == Some(self.inbox.as_path()) {
            warn!(path = %path.display(), "Fragment outside any conversation directory, skipping");
            return None;
        }

        match conversation_id(path) {
            Some(conversation_id) => Some(FragmentRef {
                path: path.to_path_buf(),
                conversation_id,
            }),
            None => {
                warn!(path = %path.display(), "No conversation identifier in directory name, skipping");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_from_dir() {
        assert_eq!(
            conversation_id_from_dir("raw-data/x/messages/inbox/alice_abc123").as_deref(),
            Some("alice_abc123")
        );
        assert_eq!(
            conversation_id_from_dir("raw-data/x/messages/inbox/bob-smith_9").as_deref(),
            Some("bob-smith_9")
        );
    }

    #[test]
    fn test_conversation_id_stops_at_invalid_char() {
        assert_eq!(conversation_id_from_dir("inbox/weird.name_12").as_deref(), Some("name_12"));
        assert_eq!(conversation_id_from_dir("inbox/"), None);
    }

    #[test]
    fn test_conversation_id_of_file() {
        let path = Path::new("raw/messages/inbox/alice_123/message_1.json");
        assert_eq!(conversation_id(path).as_deref(), Some("alice_123"));
    }

    #[test]
    fn test_depth_predicate() {
        let ok = Path::new("messages/inbox/alice_1/message_1.json");
        let deep = Path::new("messages/inbox/alice_1/files/message_1.json");
        assert_eq!(separator_depth(ok), 5);
        assert!(within_depth(ok, DEFAULT_MAX_PATH_SEPARATORS));
        assert_eq!(separator_depth(deep), 6);
        assert!(!within_depth(deep, DEFAULT_MAX_PATH_SEPARATORS));
    }

    #[test]
    fn test_extension_predicate() {
        assert!(has_fragment_extension(Path::new("message_1.json"), "json"));
        assert!(!has_fragment_extension(Path::new("photo.jpg"), "json"));
        assert!(!has_fragment_extension(Path::new("json"), "json"));
    }
}
