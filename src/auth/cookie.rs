//! Defines functions for handling partner authentication with cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, partner::PartnerId};

use super::Token;

pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(8);

/// Add an auth cookie to the cookie jar, indicating that a partner is logged in.
///
/// Sets the expiry of the cookie and of the token inside it to `duration`
/// from the current time. Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns a [Error::JsonSerializationError] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    partner_id: PartnerId,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        partner_id,
        expires_at: OffsetDateTime::now_utc() + duration,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Check that `jar` holds a valid, unexpired session token for a partner.
///
/// This check must be performed before any partner-only data access.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no token cookie in the jar.
/// - [Error::InvalidCredentials] if the token is malformed or expired.
pub(crate) fn verify_partner(jar: &PrivateCookieJar) -> Result<PartnerId, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token =
        serde_json::from_str(cookie.value()).map_err(|_| Error::InvalidCredentials)?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::InvalidCredentials);
    }

    Ok(token.partner_id)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::{Error, partner::PartnerId};

    use super::{invalidate_auth_cookie, set_auth_cookie, verify_partner};

    fn get_test_jar() -> PrivateCookieJar {
        let hash = Sha512::digest("the cookie secret");
        PrivateCookieJar::new(Key::from(&hash))
    }

    #[test]
    fn verify_partner_accepts_fresh_cookie() {
        let jar = get_test_jar();

        let jar = set_auth_cookie(jar, PartnerId::new(7), Duration::minutes(5)).unwrap();

        assert_eq!(verify_partner(&jar), Ok(PartnerId::new(7)));
    }

    #[test]
    fn verify_partner_rejects_empty_jar() {
        let jar = get_test_jar();

        assert_eq!(verify_partner(&jar), Err(Error::CookieMissing));
    }

    #[test]
    fn verify_partner_rejects_expired_token() {
        let jar = get_test_jar();

        let jar = set_auth_cookie(jar, PartnerId::new(7), Duration::minutes(-5)).unwrap();

        assert_eq!(verify_partner(&jar), Err(Error::InvalidCredentials));
    }

    #[test]
    fn verify_partner_rejects_invalidated_cookie() {
        let jar = get_test_jar();

        let jar = set_auth_cookie(jar, PartnerId::new(7), Duration::minutes(5)).unwrap();
        let jar = invalidate_auth_cookie(jar);

        assert_eq!(verify_partner(&jar), Err(Error::InvalidCredentials));
    }
}
