use crate::application::pagination::Page;
use crate::domain::comment::Comment;
use crate::domain::group::Group;
use crate::domain::post::Post;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(rename = "token_type")]
    pub token_type: String, // "Bearer"
}

// ======================= POSTS =======================

/// Raw page parameter; anything non-numeric resolves to page 1 downstream.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImagePayload {
    pub file_name: String,
    /// base64-encoded bytes
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub text: String,
    /// group slug
    pub group: Option<String>,
    pub image: Option<ImagePayload>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub text: String,
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GroupPageResponse {
    pub group: Group,
    pub page: Page<Post>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub comments: Vec<Comment>,
}

// ======================= PROFILE =======================

/// Public view of an author; never exposes email or credentials.
#[derive(Debug, Serialize)]
pub struct ProfileAuthor {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub author: ProfileAuthor,
    /// None when the viewer is anonymous.
    pub following: Option<bool>,
    pub page: Page<Post>,
}
