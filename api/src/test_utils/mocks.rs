//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.
//! Maps are ordered by id so listings come back in insertion order, as they do from Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Article, ArticleChanges, ArticleId, ArticleSummary, Artist, ArtistChanges, ArtistId, Comment,
    CommentId, CommentWithArticle, NewArticle, NewArtist, NewComment, NewSession, NewUser,
    ProfileChanges, Session, SessionId, User, UserId,
};
use crate::domain::ports::{
    ArticleRepository, ArtistRepository, CommentRepository, SessionRepository, UserRepository,
};
use crate::error::DomainError;

/// Id sequence that stays ahead of any id inserted by hand
#[derive(Clone)]
struct IdSequence(Arc<AtomicI64>);

impl Default for IdSequence {
    fn default() -> Self {
        Self(Arc::new(AtomicI64::new(1)))
    }
}

impl IdSequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    fn observe(&self, id: i64) {
        self.0.fetch_max(id + 1, Ordering::SeqCst);
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, limit: Option<u64>, offset: u64) -> Vec<T> {
    let items = items.skip(offset as usize);
    match limit {
        Some(limit) => items.take(limit as usize).collect(),
        None => items.collect(),
    }
}

// ============================================================================
// In-Memory Article Repository
// ============================================================================

/// Articles, sharing the comment table with `InMemoryCommentRepository`
/// so deletes cascade
#[derive(Clone, Default)]
pub struct InMemoryArticleRepository {
    articles: Arc<RwLock<BTreeMap<ArticleId, Article>>>,
    comments: Arc<RwLock<BTreeMap<CommentId, Comment>>>,
    ids: IdSequence,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an article for testing
    pub fn with_article(self, article: Article) -> Self {
        self.ids.observe(article.id.0);
        self.articles.write().unwrap().insert(article.id, article);
        self
    }

    fn summary(&self, id: &ArticleId) -> Option<ArticleSummary> {
        self.articles
            .read()
            .unwrap()
            .get(id)
            .map(|a| ArticleSummary {
                id: a.id,
                title: a.title.clone(),
            })
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Article>, DomainError> {
        let articles = self.articles.read().unwrap();
        Ok(page(articles.values().cloned(), limit, offset))
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, DomainError> {
        Ok(self.articles.read().unwrap().get(id).cloned())
    }

    async fn create(&self, new_article: &NewArticle) -> Result<Article, DomainError> {
        let now = Utc::now();
        let article = Article {
            id: ArticleId(self.ids.next()),
            title: new_article.title.clone(),
            content: new_article.content.clone(),
            image: new_article.image.clone(),
            created_at: now,
            updated_at: now,
        };
        self.articles
            .write()
            .unwrap()
            .insert(article.id, article.clone());
        Ok(article)
    }

    async fn update(
        &self,
        id: &ArticleId,
        changes: &ArticleChanges,
    ) -> Result<Article, DomainError> {
        let mut articles = self.articles.write().unwrap();
        let article = articles
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Article {} not found", id)))?;
        changes.apply(article);
        article.updated_at = Utc::now();
        Ok(article.clone())
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, DomainError> {
        let removed = self.articles.write().unwrap().remove(id).is_some();
        if removed {
            self.comments
                .write()
                .unwrap()
                .retain(|_, c| c.article_id != *id);
        }
        Ok(removed)
    }
}

// ============================================================================
// In-Memory Comment Repository
// ============================================================================

pub struct InMemoryCommentRepository {
    articles: InMemoryArticleRepository,
    ids: IdSequence,
}

impl InMemoryCommentRepository {
    /// Comments stored alongside `articles`
    pub fn new(articles: InMemoryArticleRepository) -> Self {
        Self {
            articles,
            ids: IdSequence::default(),
        }
    }

    /// Pre-populate with a comment for testing
    pub fn with_comment(self, comment: Comment) -> Self {
        self.ids.observe(comment.id.0);
        self.articles
            .comments
            .write()
            .unwrap()
            .insert(comment.id, comment);
        self
    }

    fn with_summary(&self, comment: Comment) -> Option<CommentWithArticle> {
        let article = self.articles.summary(&comment.article_id)?;
        Some(CommentWithArticle { comment, article })
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list(&self) -> Result<Vec<CommentWithArticle>, DomainError> {
        let comments: Vec<Comment> = self
            .articles
            .comments
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect();
        Ok(comments
            .into_iter()
            .filter_map(|c| self.with_summary(c))
            .collect())
    }

    async fn list_by_article(&self, article_id: &ArticleId) -> Result<Vec<Comment>, DomainError> {
        let comments = self.articles.comments.read().unwrap();
        Ok(comments
            .values()
            .filter(|c| c.article_id == *article_id)
            .cloned()
            .collect())
    }

    async fn count_by_article(&self, article_id: &ArticleId) -> Result<i64, DomainError> {
        let comments = self.articles.comments.read().unwrap();
        Ok(comments
            .values()
            .filter(|c| c.article_id == *article_id)
            .count() as i64)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<CommentWithArticle>, DomainError> {
        let comment = self.articles.comments.read().unwrap().get(id).cloned();
        Ok(comment.and_then(|c| self.with_summary(c)))
    }

    async fn create(&self, new_comment: &NewComment) -> Result<Comment, DomainError> {
        if self.articles.summary(&new_comment.article_id).is_none() {
            return Err(DomainError::NotFound(format!(
                "Article {} not found",
                new_comment.article_id
            )));
        }
        let now = Utc::now();
        let comment = Comment {
            id: CommentId(self.ids.next()),
            article_id: new_comment.article_id,
            content: new_comment.content.clone(),
            author_name: new_comment.author_name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.articles
            .comments
            .write()
            .unwrap()
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_content(&self, id: &CommentId, content: &str) -> Result<Comment, DomainError> {
        let mut comments = self.articles.comments.write().unwrap();
        let comment = comments
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Comment {} not found", id)))?;
        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, DomainError> {
        Ok(self.articles.comments.write().unwrap().remove(id).is_some())
    }
}

// ============================================================================
// In-Memory Artist Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryArtistRepository {
    artists: Arc<RwLock<BTreeMap<ArtistId, Artist>>>,
    ids: IdSequence,
}

impl InMemoryArtistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an artist for testing
    pub fn with_artist(self, artist: Artist) -> Self {
        self.ids.observe(artist.id.0);
        self.artists.write().unwrap().insert(artist.id, artist);
        self
    }
}

#[async_trait]
impl ArtistRepository for InMemoryArtistRepository {
    async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Artist>, DomainError> {
        let artists = self.artists.read().unwrap();
        Ok(page(artists.values().cloned(), limit, offset))
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Artist>, DomainError> {
        let query = query.to_lowercase();
        let artists = self.artists.read().unwrap();
        Ok(artists
            .values()
            .filter(|a| a.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ArtistId) -> Result<Option<Artist>, DomainError> {
        Ok(self.artists.read().unwrap().get(id).cloned())
    }

    async fn create(&self, new_artist: &NewArtist) -> Result<Artist, DomainError> {
        let artist = Artist {
            id: ArtistId(self.ids.next()),
            name: new_artist.name.clone(),
            agency: new_artist.agency.clone(),
            debut_date: new_artist.debut_date,
            is_group: new_artist.is_group,
        };
        self.artists
            .write()
            .unwrap()
            .insert(artist.id, artist.clone());
        Ok(artist)
    }

    async fn update(&self, id: &ArtistId, changes: &ArtistChanges) -> Result<Artist, DomainError> {
        let mut artists = self.artists.write().unwrap();
        let artist = artists
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Artist {} not found", id)))?;
        artist.agency = changes.agency.clone();
        artist.is_group = changes.is_group;
        Ok(artist.clone())
    }

    async fn delete(&self, id: &ArtistId) -> Result<bool, DomainError> {
        Ok(self.artists.write().unwrap().remove(id).is_some())
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
    ids: IdSequence,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify(&self, id: &UserId, f: impl FnOnce(&mut User)) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;
        f(user);
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == new_user.username) {
            return Err(DomainError::AlreadyExists(format!(
                "User '{}' already exists",
                new_user.username
            )));
        }
        let user = User {
            id: UserId(self.ids.next()),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            date_joined: Utc::now(),
            last_login: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<User, DomainError> {
        self.modify(id, |user| changes.apply(user))
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<User, DomainError> {
        self.modify(id, |user| user.password_hash = password_hash.to_string())
    }

    async fn update_last_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.modify(id, |user| user.last_login = Some(at)).map(|_| ())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.users.write().unwrap().remove(id).is_some())
    }
}

// ============================================================================
// In-Memory Session Repository
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<BTreeMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push every stored session's expiry into the past
    pub fn expire_all(&self) {
        let past = Utc::now() - chrono::Duration::seconds(1);
        for session in self.sessions.write().unwrap().values_mut() {
            session.expires_at = past;
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().unwrap().get(token_hash).cloned())
    }

    async fn create(&self, new_session: &NewSession) -> Result<Session, DomainError> {
        let session = Session {
            id: SessionId::new(),
            user_id: new_session.user_id,
            token_hash: new_session.token_hash.clone(),
            auth_hash: new_session.auth_hash.clone(),
            created_at: Utc::now(),
            expires_at: new_session.expires_at,
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn update_auth_hash(&self, id: &SessionId, auth_hash: &str) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .values_mut()
            .find(|s| s.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Session {} not found", id)))?;
        session.auth_hash = auth_hash.to_string();
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions.write().unwrap().retain(|_, s| s.id != *id);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != *user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}
