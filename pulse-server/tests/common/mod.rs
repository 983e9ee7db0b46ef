//! In-memory repository doubles and app assembly shared by the API tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use uuid::Uuid;

use pulse_server::application::auth_service::AuthService;
use pulse_server::application::follow_service::FollowService;
use pulse_server::application::pagination::Pager;
use pulse_server::application::post_service::PostService;
use pulse_server::data::comment_repository::CommentRepository;
use pulse_server::data::follow_repository::FollowRepository;
use pulse_server::data::group_repository::GroupRepository;
use pulse_server::data::post_repository::{PostFilter, PostRepository};
use pulse_server::data::user_repository::UserRepository;
use pulse_server::domain::comment::Comment;
use pulse_server::domain::error::DomainError;
use pulse_server::domain::follow::Follow;
use pulse_server::domain::group::Group;
use pulse_server::domain::post::Post;
use pulse_server::domain::user::User;
use pulse_server::infrastructure::cache::PageCache;
use pulse_server::infrastructure::media::MediaStore;
use pulse_server::infrastructure::security::JwtKeys;
use pulse_server::server::AppContext;

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(
                "username already taken".to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(
                "email already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryGroupRepository {
    pub groups: Mutex<Vec<Group>>,
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create(&self, group: Group) -> Result<Group, DomainError> {
        self.groups.lock().unwrap().push(group.clone());
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, DomainError> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.slug == slug)
            .cloned())
    }
}

pub struct InMemoryPostRepository {
    pub posts: Mutex<Vec<Post>>,
    edges: Arc<Mutex<Vec<Follow>>>,
}

impl InMemoryPostRepository {
    fn new(edges: Arc<Mutex<Vec<Follow>>>) -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            edges,
        }
    }

    fn matching(&self, filter: PostFilter) -> Vec<Post> {
        let posts = self.posts.lock().unwrap();
        let mut selected: Vec<Post> = match filter {
            PostFilter::All => posts.clone(),
            PostFilter::Group(group_id) => posts
                .iter()
                .filter(|p| p.group_id == Some(group_id))
                .cloned()
                .collect(),
            PostFilter::Author(author_id) => posts
                .iter()
                .filter(|p| p.author_id == author_id)
                .cloned()
                .collect(),
            PostFilter::FeedOf(user_id) => {
                let edges = self.edges.lock().unwrap();
                posts
                    .iter()
                    .filter(|p| {
                        edges
                            .iter()
                            .any(|f| f.user_id == user_id && f.author_id == p.author_id)
                    })
                    .cloned()
                    .collect()
            }
        };
        selected.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        selected
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, DomainError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        text: String,
        group_id: Option<Uuid>,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.text = text;
                post.group_id = group_id;
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn count(&self, filter: PostFilter) -> Result<usize, DomainError> {
        Ok(self.matching(filter).len())
    }

    async fn page(
        &self,
        filter: PostFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    pub comments: Mutex<Vec<Comment>>,
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<Comment, DomainError> {
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let mut selected: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(selected)
    }
}

pub struct InMemoryFollowRepository {
    pub edges: Arc<Mutex<Vec<Follow>>>,
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn insert(&self, follow: Follow) -> Result<bool, DomainError> {
        let mut edges = self.edges.lock().unwrap();
        if edges.contains(&follow) {
            return Ok(false);
        }
        edges.push(follow);
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        let mut edges = self.edges.lock().unwrap();
        let before = edges.len();
        edges.retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(edges.len() < before)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }
}

/// One application wired over in-memory stores plus handles to poke them
/// directly from tests.
pub struct TestApp {
    pub ctx: AppContext,
    pub keys: JwtKeys,
    pub users: Arc<InMemoryUserRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub comments: Arc<InMemoryCommentRepository>,
    pub follows: Arc<InMemoryFollowRepository>,
    // keeps the media scratch directory alive for the app's lifetime
    pub media_dir: TempDir,
}

pub fn test_app() -> TestApp {
    test_app_with(10, Duration::from_secs(20))
}

pub fn test_app_with(page_size: usize, cache_ttl: Duration) -> TestApp {
    let edges = Arc::new(Mutex::new(Vec::new()));

    let users = Arc::new(InMemoryUserRepository::default());
    let groups = Arc::new(InMemoryGroupRepository::default());
    let posts = Arc::new(InMemoryPostRepository::new(edges.clone()));
    let comments = Arc::new(InMemoryCommentRepository::default());
    let follows = Arc::new(InMemoryFollowRepository { edges });

    let media_dir = tempfile::tempdir().expect("media tempdir");
    let keys = JwtKeys::new("test-secret".to_string());
    let pager = Pager::new(page_size);

    let ctx = AppContext {
        auth: AuthService::new(users.clone(), keys.clone()),
        posts: PostService::new(
            posts.clone(),
            groups.clone(),
            comments.clone(),
            users.clone(),
            MediaStore::new(media_dir.path()),
            pager,
        ),
        follows: FollowService::new(follows.clone(), users.clone(), posts.clone(), pager),
        cache: PageCache::new(cache_ttl),
    };

    TestApp {
        ctx,
        keys,
        users,
        groups,
        posts,
        comments,
        follows,
        media_dir,
    }
}

impl TestApp {
    /// Seeds a user directly in the store. The hash is a placeholder; tests
    /// that exercise passwords go through the register endpoint instead.
    pub async fn seed_user(&self, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "seeded-hash".to_string(),
        );
        self.users.create(user).await.unwrap()
    }

    pub async fn seed_group(&self, title: &str, slug: &str) -> Group {
        let group = Group::new(title.to_string(), slug.to_string(), None);
        self.groups.create(group).await.unwrap()
    }

    pub async fn seed_post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let post = Post::new(author.id, text.to_string(), group.map(|g| g.id), None);
        self.posts.insert(post).await.unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.keys.generate_token(user.id).unwrap()
    }
}
