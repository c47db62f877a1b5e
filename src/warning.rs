use crate::KeyId;

/// Problem found on a key, each kind carrying only what describes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyWarning {
    /// None of the identities sets an expiry
    PrimaryKeyNoExpiry,

    /// Earliest identity expiry has passed
    PrimaryKeyExpired { days_since_expiry: u64 },

    /// More than 10 days past the rotation time of the primary key
    PrimaryKeyOverdueForRotation { days_until_expiry: u64 },

    /// Rotation time of the primary key has passed
    PrimaryKeyDueForRotation,

    /// Primary key expiry is further away than the policy allows
    PrimaryKeyLongExpiry,

    /// No subkey usable for encryption, or the newest one has expired
    NoValidEncryptionSubkey,

    SubkeyNoExpiry {
        subkey_id: KeyId,
    },

    SubkeyOverdueForRotation {
        subkey_id: KeyId,
        days_until_expiry: u64,
    },

    SubkeyDueForRotation {
        subkey_id: KeyId,
    },

    SubkeyLongExpiry {
        subkey_id: KeyId,
    },
}

impl KeyWarning {
    /// Subkey the warning is about, if any
    pub fn subkey_id(&self) -> Option<KeyId> {
        match self {
            Self::SubkeyNoExpiry { subkey_id }
            | Self::SubkeyOverdueForRotation { subkey_id, .. }
            | Self::SubkeyDueForRotation { subkey_id }
            | Self::SubkeyLongExpiry { subkey_id } => Some(*subkey_id),
            _ => None,
        }
    }

    pub fn is_primary_key(&self) -> bool {
        matches!(
            self,
            Self::PrimaryKeyNoExpiry
                | Self::PrimaryKeyExpired { .. }
                | Self::PrimaryKeyOverdueForRotation { .. }
                | Self::PrimaryKeyDueForRotation
                | Self::PrimaryKeyLongExpiry
        )
    }
}

fn plural(count: u64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

impl std::fmt::Display for KeyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryKeyNoExpiry => write!(f, "Primary key never expires"),
            Self::PrimaryKeyExpired { days_since_expiry } => write!(
                f,
                "Primary key expired {days_since_expiry} day{} ago",
                plural(*days_since_expiry)
            ),
            Self::PrimaryKeyOverdueForRotation { days_until_expiry } => write!(
                f,
                "Primary key overdue for rotation, expires in {days_until_expiry} day{}",
                plural(*days_until_expiry)
            ),
            Self::PrimaryKeyDueForRotation => write!(f, "Primary key due for rotation"),
            Self::PrimaryKeyLongExpiry => write!(f, "Primary key has long expiry"),
            Self::NoValidEncryptionSubkey => write!(f, "Missing encryption subkey"),
            Self::SubkeyNoExpiry { subkey_id } => {
                write!(f, "Encryption subkey {subkey_id} never expires")
            }
            Self::SubkeyOverdueForRotation {
                subkey_id,
                days_until_expiry,
            } => write!(
                f,
                "Encryption subkey {subkey_id} overdue for rotation, expires in {days_until_expiry} day{}",
                plural(*days_until_expiry)
            ),
            Self::SubkeyDueForRotation { subkey_id } => {
                write!(f, "Encryption subkey {subkey_id} due for rotation")
            }
            Self::SubkeyLongExpiry { subkey_id } => {
                write!(f, "Encryption subkey {subkey_id} has long expiry")
            }
        }
    }
}
