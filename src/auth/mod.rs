//! Authentication and authorization.
//!
//! Password hashing, registration, login, bearer token issuance, request
//! credential resolution and the permission gate.

mod login;
mod password;
pub mod permission;
mod registration;
pub mod resolver;
pub mod token;

pub use login::{login, LoginError};
pub use password::{hash_password, verify_dummy, verify_password, PasswordError};
pub use permission::{
    authorize, authorize_path, has_permission, resolve_target, PermissionError, PermissionTable,
    Permissions, SELF_ALIAS,
};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use resolver::{extract_credential, AuthError, Resolver, BEARER_PREFIX, TOKEN_COOKIE};
pub use token::{generate_secret, hash_secret, IssuedToken, TokenError, TokenStore};
