//! In-memory adapters backing the integration tests.
//!
//! These honor the same port contracts as the Postgres adapters (duplicate
//! detection, invitation consumption, conditional version writes, follower
//! joins) so the domain services can be exercised end to end without
//! external services. The user, post, and comment fakes share their tables
//! through the harness, mirroring the joins the SQL adapters perform.

// Each integration test binary compiles this module separately and uses a
// different slice of it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use content_service::domain::authorization::errors::AuthorizationError;
use content_service::domain::authorization::models::Role;
use content_service::domain::authorization::models::RoleKey;
use content_service::domain::authorization::ports::RoleRepository;
use content_service::domain::comment::errors::CommentError;
use content_service::domain::comment::models::Comment;
use content_service::domain::comment::models::CommentId;
use content_service::domain::comment::models::NewComment;
use content_service::domain::comment::ports::CommentRepository;
use content_service::domain::comment::service::CommentService;
use content_service::domain::post::errors::PostError;
use content_service::domain::post::models::FeedItem;
use content_service::domain::post::models::FeedQuery;
use content_service::domain::post::models::NewPost;
use content_service::domain::post::models::Post;
use content_service::domain::post::models::PostId;
use content_service::domain::post::ports::PostRepository;
use content_service::domain::post::service::PostService;
use content_service::domain::user::errors::NotifierError;
use content_service::domain::user::errors::UserError;
use content_service::domain::user::models::Identity;
use content_service::domain::user::models::NewUser;
use content_service::domain::user::models::UserId;
use content_service::domain::user::ports::Notifier;
use content_service::domain::user::ports::Template;
use content_service::domain::user::ports::UserRepository;
use content_service::domain::user::service::RegistrationSettings;
use content_service::domain::user::service::UserService;
use content_service::outbound::cache::InMemoryUserCache;

type UserTable = Arc<Mutex<HashMap<i64, Identity>>>;
/// Follow edges as (follower_id, followed_id) pairs.
type FollowTable = Arc<Mutex<HashSet<(i64, i64)>>>;
type PostTable = Arc<Mutex<HashMap<i64, Post>>>;
type CommentTable = Arc<Mutex<HashMap<i64, Comment>>>;

pub struct InMemoryUserRepository {
    users: UserTable,
    invitations: Mutex<HashMap<String, (i64, DateTime<Utc>)>>,
    follows: FollowTable,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::sharing(UserTable::default(), FollowTable::default())
    }

    fn sharing(users: UserTable, follows: FollowTable) -> Self {
        Self {
            users,
            invitations: Mutex::new(HashMap::new()),
            follows,
            next_id: AtomicI64::new(1),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_and_invite(
        &self,
        user: NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<Identity, UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|u| u.username.as_str() == user.username.as_str())
        {
            return Err(UserError::DuplicateUsername(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|u| u.email.as_str() == user.email.as_str()) {
            return Err(UserError::DuplicateEmail(user.email.as_str().to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let identity = Identity {
            id: UserId(id),
            username: user.username,
            email: user.email,
            role: Role {
                key: RoleKey::User,
                level: 1,
            },
            active: false,
            created_at: Utc::now(),
        };
        users.insert(id, identity.clone());

        self.invitations
            .lock()
            .unwrap()
            .insert(token_hash.to_string(), (id, Utc::now() + ttl));

        Ok(identity)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn activate_by_token_hash(&self, token_hash: &str) -> Result<(), UserError> {
        let mut invitations = self.invitations.lock().unwrap();

        let (user_id, expiry) = invitations
            .get(token_hash)
            .copied()
            .ok_or(UserError::InvitationNotFound)?;
        if expiry <= Utc::now() {
            return Err(UserError::InvitationNotFound);
        }

        let mut users = self.users.lock().unwrap();
        let identity = users
            .get_mut(&user_id)
            .ok_or(UserError::InvitationNotFound)?;
        identity.active = true;

        invitations.remove(token_hash);
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id.0)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.0))
    }

    async fn follow(&self, follower: UserId, user: UserId) -> Result<(), UserError> {
        if !self.follows.lock().unwrap().insert((follower.0, user.0)) {
            return Err(UserError::AlreadyFollowing(user.0));
        }
        Ok(())
    }

    async fn unfollow(&self, follower: UserId, user: UserId) -> Result<(), UserError> {
        self.follows.lock().unwrap().remove(&(follower.0, user.0));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentNotification {
    pub template_key: &'static str,
    pub recipient_address: String,
    pub data: serde_json::Value,
    pub sandbox: bool,
}

/// Notifier that records every dispatch, with a switchable failure mode.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentNotification>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        template: Template,
        _recipient_name: &str,
        recipient_address: &str,
        data: serde_json::Value,
        sandbox: bool,
    ) -> Result<(), NotifierError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifierError::SendFailed("mail api unavailable".into()));
        }

        self.sent.lock().unwrap().push(SentNotification {
            template_key: template.key(),
            recipient_address: recipient_address.to_string(),
            data,
            sandbox,
        });
        Ok(())
    }
}

pub struct InMemoryPostRepository {
    posts: PostTable,
    users: UserTable,
    follows: FollowTable,
    comments: CommentTable,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::sharing(
            PostTable::default(),
            UserTable::default(),
            FollowTable::default(),
            CommentTable::default(),
        )
    }

    fn sharing(
        posts: PostTable,
        users: UserTable,
        follows: FollowTable,
        comments: CommentTable,
    ) -> Self {
        Self {
            posts,
            users,
            follows,
            comments,
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let post = Post {
            id: PostId(id),
            title: post.title,
            content: post.content,
            owner_id: post.owner_id,
            tags: post.tags,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().insert(id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError> {
        Ok(self.posts.lock().unwrap().get(&id.0).cloned())
    }

    async fn update_if_version_matches(&self, post: &Post) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().unwrap();

        // Compare-and-increment under one lock, like the single SQL statement.
        match posts.get_mut(&post.id.0) {
            Some(stored) if stored.version == post.version => {
                stored.title = post.title.clone();
                stored.content = post.content.clone();
                stored.tags = post.tags.clone();
                stored.version += 1;
                stored.updated_at = Utc::now();
                Ok(stored.clone())
            }
            _ => Err(PostError::Conflict),
        }
    }

    async fn delete(&self, id: PostId) -> Result<(), PostError> {
        self.posts
            .lock()
            .unwrap()
            .remove(&id.0)
            .map(|_| ())
            .ok_or(PostError::NotFound(id.0))
    }

    async fn feed(&self, user: UserId, query: FeedQuery) -> Result<Vec<FeedItem>, PostError> {
        let posts = self.posts.lock().unwrap();
        let users = self.users.lock().unwrap();
        let follows = self.follows.lock().unwrap();
        let comments = self.comments.lock().unwrap();

        let mut items: Vec<FeedItem> = posts
            .values()
            .filter(|post| {
                post.owner_id == user || follows.contains(&(user.0, post.owner_id.0))
            })
            .map(|post| FeedItem {
                id: post.id,
                title: post.title.clone(),
                content: post.content.clone(),
                owner_id: post.owner_id,
                author_username: users
                    .get(&post.owner_id.0)
                    .map(|author| author.username.as_str().to_string())
                    .unwrap_or_default(),
                tags: post.tags.clone(),
                version: post.version,
                created_at: post.created_at,
                comment_count: comments
                    .values()
                    .filter(|comment| comment.post_id == post.id)
                    .count() as i64,
            })
            .collect();

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));

        Ok(items
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }
}

pub struct InMemoryCommentRepository {
    comments: CommentTable,
    users: UserTable,
    posts: PostTable,
    next_id: AtomicI64,
}

impl InMemoryCommentRepository {
    fn sharing(comments: CommentTable, users: UserTable, posts: PostTable) -> Self {
        Self {
            comments,
            users,
            posts,
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, CommentError> {
        if !self.posts.lock().unwrap().contains_key(&comment.post_id.0) {
            return Err(CommentError::PostNotFound(comment.post_id.0));
        }

        let author_username = self
            .users
            .lock()
            .unwrap()
            .get(&comment.author_id.0)
            .map(|author| author.username.as_str().to_string())
            .ok_or_else(|| CommentError::DatabaseError("unknown author".to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let comment = Comment {
            id: CommentId(id),
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_username,
            content: comment.content,
            created_at: Utc::now(),
        };
        self.comments.lock().unwrap().insert(id, comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentError> {
        let mut listed: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();

        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(listed)
    }
}

pub struct InMemoryRoleRepository;

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_key(&self, key: RoleKey) -> Result<Option<Role>, AuthorizationError> {
        let level = match key {
            RoleKey::User => 1,
            RoleKey::Moderator => 2,
            RoleKey::Admin => 3,
        };
        Ok(Some(Role { key, level }))
    }
}

pub fn role(key: RoleKey) -> Role {
    let level = match key {
        RoleKey::User => 1,
        RoleKey::Moderator => 2,
        RoleKey::Admin => 3,
    };
    Role { key, level }
}

pub struct TestHarness {
    pub user_repository: Arc<InMemoryUserRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub user_service:
        UserService<InMemoryUserRepository, InMemoryUserCache, RecordingNotifier>,
    pub post_repository: Arc<InMemoryPostRepository>,
    pub post_service: PostService<InMemoryPostRepository, InMemoryRoleRepository>,
    pub comment_repository: Arc<InMemoryCommentRepository>,
    pub comment_service: CommentService<InMemoryCommentRepository, InMemoryPostRepository>,
}

impl TestHarness {
    pub fn new() -> Self {
        let users = UserTable::default();
        let follows = FollowTable::default();
        let posts = PostTable::default();
        let comments = CommentTable::default();

        let user_repository = Arc::new(InMemoryUserRepository::sharing(
            Arc::clone(&users),
            Arc::clone(&follows),
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let user_service = UserService::new(
            Arc::clone(&user_repository),
            Arc::new(InMemoryUserCache::new()),
            Arc::clone(&notifier),
            true,
            RegistrationSettings {
                invite_ttl: Duration::hours(72),
                activation_base_url: "http://localhost:8080".to_string(),
                sandbox: true,
            },
        );

        let post_repository = Arc::new(InMemoryPostRepository::sharing(
            Arc::clone(&posts),
            Arc::clone(&users),
            follows,
            Arc::clone(&comments),
        ));
        let post_service =
            PostService::new(Arc::clone(&post_repository), Arc::new(InMemoryRoleRepository));

        let comment_repository = Arc::new(InMemoryCommentRepository::sharing(comments, users, posts));
        let comment_service = CommentService::new(
            Arc::clone(&comment_repository),
            Arc::clone(&post_repository),
        );

        Self {
            user_repository,
            notifier,
            user_service,
            post_repository,
            post_service,
            comment_repository,
            comment_service,
        }
    }
}
