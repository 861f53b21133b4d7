//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod article;
pub mod artist;
pub mod comment;
pub mod session;
pub mod user;

pub use article::{Article, ArticleChanges, ArticleDetail, ArticleId, NewArticle};
pub use artist::{Artist, ArtistChanges, ArtistId, NewArtist};
pub use comment::{
    ArticleSummary, Comment, CommentId, CommentWithArticle, NewComment, ANONYMOUS_AUTHOR,
};
pub use session::{AuthContext, NewSession, Session, SessionId};
pub use user::{NewUser, ProfileChanges, User, UserId};
