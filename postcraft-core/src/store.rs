//! Storage interface for posts and user settings.
//!
//! [`PostStore`] is the narrow contract the rest of postcraft depends on.
//! [`InMemoryStore`] backs tests; [`crate::persistence::SqliteStore`] backs
//! the application.

use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::types::{Post, PostDraft, PostId, UserSettings};

/// Persistence contract for saved posts and the settings singleton.
pub trait PostStore {
    /// Insert a new post and return the id assigned to it.
    ///
    /// # Errors
    /// Returns [`crate::PersistenceError`] if the row cannot be written.
    fn save_post(&self, draft: &PostDraft) -> Result<PostId>;

    /// All saved posts, most recent first. A stored row that no longer
    /// decodes is logged and left out rather than failing the listing.
    ///
    /// # Errors
    /// Returns [`crate::PersistenceError`] if the rows cannot be read.
    fn get_all_posts(&self) -> Result<Vec<Post>>;

    /// Delete a post. Deleting an id that does not exist is not an error.
    ///
    /// Returns `true` if a row was removed.
    ///
    /// # Errors
    /// Returns [`crate::PersistenceError`] on storage failure.
    fn delete_post(&self, id: PostId) -> Result<bool>;

    /// Number of saved posts.
    ///
    /// # Errors
    /// Returns [`crate::PersistenceError`] on storage failure.
    fn post_count(&self) -> Result<usize>;

    /// Write the settings singleton, creating it if absent.
    ///
    /// # Errors
    /// Returns [`crate::PersistenceError`] if the row cannot be written.
    fn save_settings(&self, settings: &UserSettings) -> Result<()>;

    /// Read the settings singleton, or the defaults if none were saved.
    ///
    /// # Errors
    /// Returns [`crate::PersistenceError`] if the row cannot be read.
    fn load_settings(&self) -> Result<UserSettings>;
}

/// Volatile store for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<InMemoryInner>,
}

#[derive(Debug, Default)]
struct InMemoryInner {
    posts: Vec<Post>,
    settings: Option<UserSettings>,
    next_id: i64,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostStore for InMemoryStore {
    fn save_post(&self, draft: &PostDraft) -> Result<PostId> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = PostId(inner.next_id);
        inner.posts.push(Post::from_draft(id, draft.clone()));
        debug!(%id, platform = %draft.platform, "Saved post (in-memory)");
        Ok(id)
    }

    fn get_all_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.inner.lock().posts.clone();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    fn delete_post(&self, id: PostId) -> Result<bool> {
        let mut inner = self.inner.lock();
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);
        Ok(inner.posts.len() < before)
    }

    fn post_count(&self) -> Result<usize> {
        Ok(self.inner.lock().posts.len())
    }

    fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        self.inner.lock().settings = Some(settings.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<UserSettings> {
        Ok(self.inner.lock().settings.clone().unwrap_or_default())
    }
}
