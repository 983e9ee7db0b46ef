use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

mod error;
mod http_client;

pub use error::PulseClientError;
pub use http_client::PulseClientHttp;

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupPage {
    pub group: Group,
    pub page: Page<Post>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileAuthor {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub author: ProfileAuthor,
    pub following: Option<bool>,
    pub page: Page<Post>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// An image to attach to a post: original file name plus raw bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait(?Send)]
pub trait PulseApi {
    async fn register(
        &mut self,
        username: String,
        email: String,
        password: String,
    ) -> Result<(), PulseClientError>;
    async fn login(&mut self, username: String, password: String) -> Result<(), PulseClientError>;
    async fn index(&self, page: Option<u32>) -> Result<Page<Post>, PulseClientError>;
    async fn group_posts(
        &self,
        slug: &str,
        page: Option<u32>,
    ) -> Result<GroupPage, PulseClientError>;
    async fn profile(
        &self,
        username: &str,
        page: Option<u32>,
    ) -> Result<Profile, PulseClientError>;
    async fn post_detail(&self, id: Uuid) -> Result<PostDetail, PulseClientError>;
    async fn create_post(
        &self,
        text: String,
        group: Option<String>,
        image: Option<ImageUpload>,
    ) -> Result<Post, PulseClientError>;
    async fn edit_post(
        &self,
        id: Uuid,
        text: String,
        group: Option<String>,
    ) -> Result<Post, PulseClientError>;
    /// Returns None when the server discarded the comment as out of range.
    async fn add_comment(
        &self,
        post_id: Uuid,
        text: String,
    ) -> Result<Option<Comment>, PulseClientError>;
    async fn feed(&self, page: Option<u32>) -> Result<Page<Post>, PulseClientError>;
    async fn follow(&self, username: &str) -> Result<(), PulseClientError>;
    async fn unfollow(&self, username: &str) -> Result<(), PulseClientError>;
}
