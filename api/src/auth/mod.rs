//! Authentication
//!
//! Password hashing, session tokens, and the middleware that resolves a
//! bearer token into an `AuthContext`.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{auth_middleware, optional_auth_middleware};
pub use password::{dummy_password_hash, hash_password, verify_password};
pub use token::{
    generate_session_token, hash_session_token, session_auth_hash, verify_session_auth_hash,
};
