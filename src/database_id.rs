//! The integer ID type shared by rows in the application database.

/// The integer type used for row IDs in the application database.
pub type DatabaseId = i64;
