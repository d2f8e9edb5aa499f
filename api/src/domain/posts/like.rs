#[derive(Debug, Clone)]
pub struct Like {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Existence of the like for one (post, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Absent,
    Present,
}

/// Outcome of a toggle, named after the transition that was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeState {
    pub fn toggle(self) -> (LikeState, LikeToggle) {
        match self {
            LikeState::Absent => (LikeState::Present, LikeToggle::Liked),
            LikeState::Present => (LikeState::Absent, LikeToggle::Unliked),
        }
    }
}

impl LikeToggle {
    pub fn message(self) -> &'static str {
        match self {
            LikeToggle::Liked => "Post Liked",
            LikeToggle::Unliked => "Post unliked",
        }
    }
}
