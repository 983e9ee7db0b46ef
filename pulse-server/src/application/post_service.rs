use std::sync::Arc;

use crate::application::pagination::{Page, Pager};
use crate::data::comment_repository::CommentRepository;
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::{PostFilter, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::validation::{min_size, size_comment};
use crate::domain::{comment::Comment, error::DomainError, group::Group, post::Post, user::User};
use crate::infrastructure::media::{ImageData, MediaStore};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
    media: MediaStore,
    pager: Pager,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        media: MediaStore,
        pager: Pager,
    ) -> Self {
        Self {
            posts,
            groups,
            comments,
            users,
            media,
            pager,
        }
    }

    pub async fn index_page(&self, page: Option<&str>) -> Result<Page<Post>, DomainError> {
        self.page_of(PostFilter::All, page).await
    }

    pub async fn group_page(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<(Group, Page<Post>), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;
        let posts = self.page_of(PostFilter::Group(group.id), page).await?;
        Ok((group, posts))
    }

    pub async fn author_page(
        &self,
        username: &str,
        page: Option<&str>,
    ) -> Result<(User, Page<Post>), DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        let posts = self.page_of(PostFilter::Author(author.id), page).await?;
        Ok((author, posts))
    }

    pub async fn detail(&self, id: Uuid) -> Result<(Post, Vec<Comment>), DomainError> {
        let post = self.get_post(id).await?;
        let comments = self.comments.list_by_post(id).await?;
        Ok((post, comments))
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, text, image))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        text: String,
        group_slug: Option<&str>,
        image: Option<ImageData>,
    ) -> Result<Post, DomainError> {
        min_size(&text)?;
        let group_id = self.resolve_group(group_slug).await?;
        let image_path = match image {
            Some(data) => Some(self.media.save(data)?),
            None => None,
        };

        let post = Post::new(author_id, text, group_id, image_path);
        self.posts.insert(post).await
    }

    /// Loads the post for the edit form; anyone but the author is turned away.
    pub async fn editable_post(&self, editor_id: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self.get_post(post_id).await?;
        ensure_author(&post, editor_id)?;
        Ok(post)
    }

    #[instrument(skip(self, text))]
    pub async fn edit_post(
        &self,
        editor_id: Uuid,
        post_id: Uuid,
        text: String,
        group_slug: Option<&str>,
    ) -> Result<Post, DomainError> {
        let post = self.get_post(post_id).await?;
        ensure_author(&post, editor_id)?;

        min_size(&text)?;
        let group_id = self.resolve_group(group_slug).await?;

        self.posts
            .update(post_id, text, group_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        let post = self.get_post(post_id).await?;
        size_comment(&text)?;
        self.comments
            .insert(Comment::new(post.id, author_id, text))
            .await
    }

    async fn page_of(
        &self,
        filter: PostFilter,
        page: Option<&str>,
    ) -> Result<Page<Post>, DomainError> {
        let total = self.posts.count(filter).await?;
        let request = self.pager.locate(page, total);
        let items = self
            .posts
            .page(filter, request.limit(), request.offset())
            .await?;
        Ok(Page::assemble(items, request))
    }

    async fn resolve_group(&self, slug: Option<&str>) -> Result<Option<Uuid>, DomainError> {
        match slug {
            Some(slug) => {
                let group = self
                    .groups
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;
                Ok(Some(group.id))
            }
            None => Ok(None),
        }
    }
}

fn ensure_author(post: &Post, editor_id: Uuid) -> Result<(), DomainError> {
    if post.author_id != editor_id {
        return Err(DomainError::EditForbidden(post.id));
    }
    Ok(())
}
