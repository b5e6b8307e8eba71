pub mod login;
pub mod register;
pub mod session;

use serde::Serialize;

use crate::database::models::PublicUser;

/// Response body for register/login: the public user plus a bearer token.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: PublicUser,
    pub token: String,
}

pub use login::login;
pub use register::register;
pub use session::{logout, me};
