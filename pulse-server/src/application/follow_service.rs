use std::sync::Arc;

use crate::application::pagination::{Page, Pager};
use crate::data::follow_repository::FollowRepository;
use crate::data::post_repository::{PostFilter, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, follow::Follow, post::Post, user::User};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    pager: Pager,
}

impl FollowService {
    pub fn new(
        follows: Arc<dyn FollowRepository>,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        pager: Pager,
    ) -> Self {
        Self {
            follows,
            users,
            posts,
            pager,
        }
    }

    pub async fn feed_page(
        &self,
        user_id: Uuid,
        page: Option<&str>,
    ) -> Result<Page<Post>, DomainError> {
        let filter = PostFilter::FeedOf(user_id);
        let total = self.posts.count(filter).await?;
        let request = self.pager.locate(page, total);
        let items = self
            .posts
            .page(filter, request.limit(), request.offset())
            .await?;
        Ok(Page::assemble(items, request))
    }

    /// Whether `viewer` follows `author_id`. None when there is no viewer.
    pub async fn is_following(
        &self,
        viewer: Option<Uuid>,
        author_id: Uuid,
    ) -> Result<Option<bool>, DomainError> {
        match viewer {
            Some(user_id) => Ok(Some(self.follows.exists(user_id, author_id).await?)),
            None => Ok(None),
        }
    }

    /// Idempotent: already-following and self-follow are silent no-ops.
    /// The check-then-insert pair is not atomic; a racing duplicate lands on
    /// the primary key inside `insert` and is swallowed there.
    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: Uuid, target_username: &str) -> Result<User, DomainError> {
        let target = self.get_target(target_username).await?;
        if !self.follows.exists(user_id, target.id).await? && target.id != user_id {
            self.follows
                .insert(Follow {
                    user_id,
                    author_id: target.id,
                })
                .await?;
        }
        Ok(target)
    }

    /// Idempotent: removing an absent edge is a no-op.
    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: Uuid, target_username: &str) -> Result<(), DomainError> {
        let target = self.get_target(target_username).await?;
        self.follows.delete(user_id, target.id).await?;
        Ok(())
    }

    async fn get_target(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }
}
