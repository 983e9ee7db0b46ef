use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::validation::ValidationError;
use crate::infrastructure::media::ImageData;
use crate::presentation::dto::{
    CommentRequest, CreatePostRequest, GroupPageResponse, ImagePayload, PageQuery,
    PostDetailResponse, UpdatePostRequest,
};
use crate::presentation::middleware::RequestId;
use crate::presentation::utils::AuthenticatedUser;
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, post, web};
use base64::Engine;
use tracing::info;
use uuid::Uuid;

/// Home listing. Registered behind the `CachePage` middleware, so most
/// requests inside the cache window never reach this function.
pub async fn index(
    posts: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = posts.index_page(query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/group/{slug}")]
pub async fn group_posts(
    posts: web::Data<PostService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let (group, page) = posts.group_page(&slug, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(GroupPageResponse { group, page }))
}

#[get("/posts/{id}")]
pub async fn post_detail(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let (post, comments) = posts.detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostDetailResponse { post, comments }))
}

#[post("/create")]
pub async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let CreatePostRequest { text, group, image } = payload.into_inner();
    let image = image.map(decode_image).transpose()?;

    let post = posts
        .create_post(user.id, text, group.as_deref(), image)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/profile/{}", user.username)))
        .json(post))
}

/// The author gets the editable fields back; anyone else is bounced to the
/// post detail without a form (via `DomainError::EditForbidden`).
#[get("/posts/{id}/edit")]
pub async fn edit_post_form(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.editable_post(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("/posts/{id}/edit")]
pub async fn edit_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<UpdatePostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let UpdatePostRequest { text, group } = payload.into_inner();

    let post = posts
        .edit_post(user.id, post_id, text, group.as_deref())
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, format!("/api/posts/{}", post.id)))
        .json(post))
}

#[post("/posts/{id}/comment")]
pub async fn add_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<CommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let detail_location = (header::LOCATION, format!("/api/posts/{post_id}"));

    match posts
        .add_comment(user.id, post_id, payload.text.clone())
        .await
    {
        Ok(comment) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %post_id,
                "comment created"
            );
            Ok(HttpResponse::Created()
                .insert_header(detail_location)
                .json(comment))
        }
        // an out-of-range comment is discarded silently; the caller lands
        // back on the post detail either way
        Err(DomainError::Validation(_)) => Ok(HttpResponse::SeeOther()
            .insert_header(detail_location)
            .finish()),
        Err(e) => Err(e),
    }
}

fn decode_image(payload: ImagePayload) -> Result<ImageData, DomainError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.data.as_bytes())
        .map_err(|_| {
            DomainError::Validation(ValidationError {
                field: "image",
                message: "image data is not valid base64".to_string(),
                value: payload.file_name.clone(),
            })
        })?;
    Ok(ImageData {
        file_name: payload.file_name,
        bytes,
    })
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
