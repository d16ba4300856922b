//! Partner session handling: the session token, the private cookie it lives
//! in, and the check route handlers use before touching partner-only data.

mod cookie;
mod token;

pub(crate) use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie, verify_partner,
};
pub(crate) use token::Token;
