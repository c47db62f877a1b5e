use crate::policy::{self, PolicyError, RotationState};
use crate::{Expiry, Key, KeyId, KeyWarning};
use jiff::Timestamp;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum StatusError {
    #[snafu(display("evaluating primary key"))]
    PrimaryKey { source: PolicyError },
    #[snafu(display("evaluating encryption subkey {subkey_id}"))]
    Subkey {
        subkey_id: KeyId,
        source: PolicyError,
    },
}

/// Warnings for `key` as of right now, see [`key_warnings_at`]
pub fn key_warnings(key: &Key) -> Result<Vec<KeyWarning>, StatusError> {
    key_warnings_at(key, Timestamp::now())
}

/// Problems found on `key` at `now`: primary key warnings first, then
/// encryption subkey warnings.
///
/// An error means one of the policy preconditions did not hold, which is a
/// bug rather than something about the key.
#[tracing::instrument(
    skip(key),
    fields(identities = key.identities().len(), subkeys = key.subkeys().len())
)]
pub fn key_warnings_at(key: &Key, now: Timestamp) -> Result<Vec<KeyWarning>, StatusError> {
    let mut warnings = primary_key_warnings(key, now).context(PrimaryKeySnafu)?;
    warnings.extend(encryption_subkey_warnings(key, now)?);

    tracing::debug!(?warnings, "key evaluated");
    Ok(warnings)
}

fn primary_key_warnings(key: &Key, now: Timestamp) -> Result<Vec<KeyWarning>, PolicyError> {
    let Expiry::At(expiry) = key.primary_expiry() else {
        return Ok(vec![KeyWarning::PrimaryKeyNoExpiry]);
    };

    let mut warnings = Vec::new();

    match policy::rotation_state(expiry, now)? {
        Some(RotationState::Expired { days_since_expiry }) => {
            warnings.push(KeyWarning::PrimaryKeyExpired { days_since_expiry })
        }
        Some(RotationState::Overdue { days_until_expiry }) => {
            warnings.push(KeyWarning::PrimaryKeyOverdueForRotation { days_until_expiry })
        }
        Some(RotationState::Due) => warnings.push(KeyWarning::PrimaryKeyDueForRotation),
        None => {}
    }

    if policy::is_expiry_too_long(expiry, now)? {
        warnings.push(KeyWarning::PrimaryKeyLongExpiry);
    }

    Ok(warnings)
}

fn encryption_subkey_warnings(key: &Key, now: Timestamp) -> Result<Vec<KeyWarning>, StatusError> {
    let Some(subkey) = key.encryption_subkey() else {
        tracing::debug!("no subkey with valid encryption flags");
        return Ok(vec![KeyWarning::NoValidEncryptionSubkey]);
    };

    let subkey_id = subkey.key_id();
    tracing::debug!(%subkey_id, created_at = %subkey.created_at(), "selected encryption subkey");

    subkey_warnings(subkey_id, subkey.expiry(), now).context(SubkeySnafu { subkey_id })
}

fn subkey_warnings(
    subkey_id: KeyId,
    expiry: Expiry,
    now: Timestamp,
) -> Result<Vec<KeyWarning>, PolicyError> {
    let Expiry::At(expiry) = expiry else {
        return Ok(vec![KeyWarning::SubkeyNoExpiry { subkey_id }]);
    };

    let mut warnings = Vec::new();

    match policy::rotation_state(expiry, now)? {
        // An expired encryption subkey is as good as none
        Some(RotationState::Expired { .. }) => warnings.push(KeyWarning::NoValidEncryptionSubkey),
        Some(RotationState::Overdue { days_until_expiry }) => {
            warnings.push(KeyWarning::SubkeyOverdueForRotation {
                subkey_id,
                days_until_expiry,
            })
        }
        Some(RotationState::Due) => warnings.push(KeyWarning::SubkeyDueForRotation { subkey_id }),
        None => {}
    }

    if policy::is_expiry_too_long(expiry, now)? {
        warnings.push(KeyWarning::SubkeyLongExpiry { subkey_id });
    }

    Ok(warnings)
}
