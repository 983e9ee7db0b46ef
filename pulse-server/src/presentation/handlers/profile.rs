use crate::application::follow_service::FollowService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{PageQuery, ProfileAuthor, ProfileResponse};
use crate::presentation::middleware::RequestId;
use crate::presentation::utils::{AuthenticatedUser, MaybeUser};
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, web};
use tracing::info;

#[get("/profile/{username}")]
pub async fn profile(
    posts: web::Data<PostService>,
    follows: web::Data<FollowService>,
    viewer: MaybeUser,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let username = path.into_inner();
    let (author, page) = posts.author_page(&username, query.page.as_deref()).await?;
    let following = follows
        .is_following(viewer.0.map(|u| u.id), author.id)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        author: ProfileAuthor {
            id: author.id,
            username: author.username,
        },
        following,
        page,
    }))
}

#[get("/follow")]
pub async fn follow_feed(
    user: AuthenticatedUser,
    follows: web::Data<FollowService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = follows.feed_page(user.id, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/profile/{username}/follow")]
pub async fn profile_follow(
    req: HttpRequest,
    user: AuthenticatedUser,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let target = follows.follow(user.id, &path.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        follower = %user.username,
        author = %target.username,
        "follow handled"
    );

    Ok(HttpResponse::SeeOther()
        .insert_header((
            header::LOCATION,
            format!("/api/profile/{}", target.username),
        ))
        .finish())
}

#[get("/profile/{username}/unfollow")]
pub async fn profile_unfollow(
    req: HttpRequest,
    user: AuthenticatedUser,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let username = path.into_inner();
    follows.unfollow(user.id, &username).await?;

    info!(
        request_id = %request_id(&req),
        follower = %user.username,
        author = %username,
        "unfollow handled"
    );

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/api/follow"))
        .finish())
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
