//! Health check for already parsed OpenPGP-style keys.
//!
//! [`key_warnings`] looks at the identities and encryption subkeys of a
//! [`Key`] and reports whether they are expired, due or overdue for rotation,
//! or set to expire too far in the future.

mod expiry;
mod key;
pub mod policy;
mod status;
mod timestamp;
mod warning;

pub use expiry::{resolve_expiry, Expiry};
pub use key::{BindingSignature, Identity, Key, KeyFlags, KeyId, SelfSignature, Subkey};
pub use status::{key_warnings, key_warnings_at};
pub use warning::KeyWarning;

pub mod error {
    pub use crate::policy::PolicyError;
    pub use crate::status::StatusError;
    pub use crate::timestamp::TimestampError;
}
