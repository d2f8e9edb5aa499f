//! Process-local implementation of every store port.
//!
//! All tables live behind one lock so multi-table operations (cascading deletes, the like
//! toggle) are atomic with respect to each other. Used with `STORE_BACKEND=memory` and in tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::like_repository::LikeRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::token_repository::TokenRepository;
use crate::application::ports::user_repository::{NewUser, UserRepository, UserRow};
use crate::domain::posts::comment::{Comment, CommentChanges};
use crate::domain::posts::like::{Like, LikeState, LikeToggle};
use crate::domain::posts::post::{Post, PostChanges};
use crate::infrastructure::crypto::generate_token_key;

#[derive(Debug, Clone)]
struct PostRecord {
    title: String,
    content: String,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    post_id: i64,
    author_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct LikeRecord {
    post_id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, UserRow>,
    // key -> user_id, and the reverse for get_or_create
    tokens: HashMap<String, i64>,
    token_of_user: HashMap<i64, String>,
    posts: BTreeMap<i64, PostRecord>,
    comments: BTreeMap<i64, CommentRecord>,
    likes: BTreeMap<i64, LikeRecord>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
    last_like_id: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn username(&self, user_id: i64) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn post(&self, id: i64, rec: &PostRecord) -> Post {
        Post {
            id,
            title: rec.title.clone(),
            content: rec.content.clone(),
            author_id: rec.author_id,
            author_username: self.username(rec.author_id),
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }

    fn comment(&self, id: i64, rec: &CommentRecord) -> Comment {
        Comment {
            id,
            post_id: rec.post_id,
            author_id: rec.author_id,
            author_username: self.username(rec.author_id),
            content: rec.content.clone(),
            created_at: rec.created_at,
        }
    }

    fn like(&self, id: i64, rec: &LikeRecord) -> Like {
        Like {
            id,
            post_id: rec.post_id,
            user_id: rec.user_id,
            username: self.username(rec.user_id),
            created_at: rec.created_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `is_active` for a user; returns false if the username is unknown.
    pub async fn set_active(&self, username: &str, active: bool) -> bool {
        let mut t = self.tables.lock().await;
        match t.users.values_mut().find(|u| u.username == username) {
            Some(user) => {
                user.is_active = active;
                true
            }
            None => false,
        }
    }

    pub async fn counts(&self) -> StoreCounts {
        let t = self.tables.lock().await;
        StoreCounts {
            users: t.users.len(),
            posts: t.posts.len(),
            comments: t.comments.len(),
            likes: t.likes.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub likes: usize,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &NewUser<'_>) -> anyhow::Result<Option<UserRow>> {
        let mut t = self.tables.lock().await;
        let taken = t
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Ok(None);
        }
        let id = next_id(&mut t.last_user_id);
        let row = UserRow {
            id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            password_hash: Some(user.password_hash.to_string()),
            is_active: true,
        };
        t.users.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let t = self.tables.lock().await;
        Ok(t.users.values().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let t = self.tables.lock().await;
        Ok(t.users.values().any(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn get_or_create(&self, user_id: i64) -> anyhow::Result<String> {
        let mut t = self.tables.lock().await;
        if let Some(key) = t.token_of_user.get(&user_id) {
            return Ok(key.clone());
        }
        anyhow::ensure!(t.users.contains_key(&user_id), "user {user_id} not found");
        let key = generate_token_key();
        t.tokens.insert(key.clone(), user_id);
        t.token_of_user.insert(user_id, key.clone());
        Ok(key)
    }

    async fn find_user_by_key(&self, key: &str) -> anyhow::Result<Option<UserRow>> {
        let t = self.tables.lock().await;
        Ok(t.tokens
            .get(key)
            .and_then(|uid| t.users.get(uid))
            .map(|u| UserRow {
                password_hash: None,
                ..u.clone()
            }))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        let t = self.tables.lock().await;
        Ok(t.posts.iter().map(|(id, rec)| t.post(*id, rec)).collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Post>> {
        let t = self.tables.lock().await;
        Ok(t.posts.get(&id).map(|rec| t.post(id, rec)))
    }

    async fn exists(&self, id: i64) -> anyhow::Result<bool> {
        let t = self.tables.lock().await;
        Ok(t.posts.contains_key(&id))
    }

    async fn create(&self, author_id: i64, title: &str, content: &str) -> anyhow::Result<Post> {
        let mut t = self.tables.lock().await;
        anyhow::ensure!(t.users.contains_key(&author_id), "user {author_id} not found");
        let id = next_id(&mut t.last_post_id);
        let now = Utc::now();
        let rec = PostRecord {
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        };
        let post = t.post(id, &rec);
        t.posts.insert(id, rec);
        Ok(post)
    }

    async fn update(
        &self,
        id: i64,
        author_id: i64,
        changes: &PostChanges,
    ) -> anyhow::Result<Option<Post>> {
        let mut t = self.tables.lock().await;
        let Some(rec) = t.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            rec.title = title.clone();
        }
        if let Some(content) = &changes.content {
            rec.content = content.clone();
        }
        rec.author_id = author_id;
        rec.updated_at = Utc::now();
        let rec = rec.clone();
        Ok(Some(t.post(id, &rec)))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().await;
        if t.posts.remove(&id).is_none() {
            return Ok(false);
        }
        t.comments.retain(|_, c| c.post_id != id);
        t.likes.retain(|_, l| l.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Comment>> {
        let t = self.tables.lock().await;
        Ok(t.comments
            .iter()
            .filter(|(_, c)| c.post_id == post_id)
            .map(|(id, c)| t.comment(*id, c))
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Comment>> {
        let t = self.tables.lock().await;
        Ok(t.comments.get(&id).map(|c| t.comment(id, c)))
    }

    async fn create(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> anyhow::Result<Option<Comment>> {
        let mut t = self.tables.lock().await;
        if !t.posts.contains_key(&post_id) {
            return Ok(None);
        }
        let id = next_id(&mut t.last_comment_id);
        let rec = CommentRecord {
            post_id,
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let comment = t.comment(id, &rec);
        t.comments.insert(id, rec);
        Ok(Some(comment))
    }

    async fn update(&self, id: i64, changes: &CommentChanges) -> anyhow::Result<Option<Comment>> {
        let mut t = self.tables.lock().await;
        if let Some(pid) = changes.post_id {
            anyhow::ensure!(t.posts.contains_key(&pid), "post {pid} not found");
        }
        let Some(rec) = t.comments.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(content) = &changes.content {
            rec.content = content.clone();
        }
        if let Some(pid) = changes.post_id {
            rec.post_id = pid;
        }
        let rec = rec.clone();
        Ok(Some(t.comment(id, &rec)))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().await;
        Ok(t.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn list_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Like>> {
        let t = self.tables.lock().await;
        Ok(t.likes
            .iter()
            .filter(|(_, l)| l.post_id == post_id)
            .map(|(id, l)| t.like(*id, l))
            .collect())
    }

    async fn toggle(&self, post_id: i64, user_id: i64) -> anyhow::Result<Option<LikeToggle>> {
        let mut t = self.tables.lock().await;
        if !t.posts.contains_key(&post_id) {
            return Ok(None);
        }
        let existing = t
            .likes
            .iter()
            .find(|(_, l)| l.post_id == post_id && l.user_id == user_id)
            .map(|(id, _)| *id);
        let state = if existing.is_some() {
            LikeState::Present
        } else {
            LikeState::Absent
        };
        let (_, outcome) = state.toggle();
        match (outcome, existing) {
            (LikeToggle::Unliked, Some(id)) => {
                t.likes.remove(&id);
            }
            _ => {
                let id = next_id(&mut t.last_like_id);
                t.likes.insert(
                    id,
                    LikeRecord {
                        post_id,
                        user_id,
                        created_at: Utc::now(),
                    },
                );
            }
        }
        Ok(Some(outcome))
    }
}
