//! Defines the session token stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::partner::PartnerId;

/// A token identifying a logged-in partner.
///
/// The expiry is stored as a unix timestamp, which keeps the cookie payload
/// compact. Sub-second precision is lost on the round trip, which is more
/// than enough for an expiry check.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct Token {
    pub partner_id: PartnerId,

    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}
