use std::sync::Arc;
use std::time::Duration;

use pulse_server::application::auth_service::AuthService;
use pulse_server::application::follow_service::FollowService;
use pulse_server::application::pagination::Pager;
use pulse_server::application::post_service::PostService;
use pulse_server::data::comment_repository::PostgresCommentRepository;
use pulse_server::data::follow_repository::PostgresFollowRepository;
use pulse_server::data::group_repository::PostgresGroupRepository;
use pulse_server::data::post_repository::PostgresPostRepository;
use pulse_server::data::user_repository::PostgresUserRepository;
use pulse_server::infrastructure::cache::PageCache;
use pulse_server::infrastructure::config::AppConfig;
use pulse_server::infrastructure::database::init_database;
use pulse_server::infrastructure::logging::init_logging;
use pulse_server::infrastructure::media::MediaStore;
use pulse_server::infrastructure::security::JwtKeys;
use pulse_server::server::{AppContext, start_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = init_database(&config.database_url).await?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let group_repo = Arc::new(PostgresGroupRepository::new(pool.clone()));
    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let comment_repo = Arc::new(PostgresCommentRepository::new(pool.clone()));
    let follow_repo = Arc::new(PostgresFollowRepository::new(pool.clone()));

    let pager = Pager::new(config.page_size);
    let media = MediaStore::new(config.media_root.clone());

    let ctx = AppContext {
        auth: AuthService::new(
            user_repo.clone(),
            JwtKeys::new(config.jwt_secret.clone()),
        ),
        posts: PostService::new(
            post_repo.clone(),
            group_repo,
            comment_repo,
            user_repo.clone(),
            media,
            pager,
        ),
        follows: FollowService::new(follow_repo, user_repo, post_repo, pager),
        cache: PageCache::new(Duration::from_secs(config.cache_ttl_seconds)),
    };

    start_server(config, ctx).await
}
