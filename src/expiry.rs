use jiff::{SignedDuration, Timestamp};

/// When a key stops being usable, derived from a creation time and a key lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiry {
    /// The key never expires
    Never,

    /// The key expires at this instant
    At(Timestamp),
}

impl Expiry {
    /// Compute the expiry from a creation time and a key lifetime in seconds.
    ///
    /// From <https://tools.ietf.org/html/rfc4880#section-5.2.3.6>:
    /// "If this is not present or has a value of zero, the key never expires."
    pub fn resolve(created_at: Timestamp, lifetime_secs: Option<u32>) -> Self {
        match lifetime_secs {
            None | Some(0) => Self::Never,
            Some(secs) => {
                Self::At(created_at.saturating_add(SignedDuration::from_secs(i64::from(secs))))
            }
        }
    }

    pub fn has_expiry(&self) -> bool {
        matches!(self, Self::At(_))
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Never => None,
            Self::At(timestamp) => Some(*timestamp),
        }
    }
}

impl From<Option<Timestamp>> for Expiry {
    fn from(value: Option<Timestamp>) -> Self {
        value.map_or(Self::Never, Self::At)
    }
}

/// See [`Expiry::resolve`]
pub fn resolve_expiry(created_at: Timestamp, lifetime_secs: Option<u32>) -> Expiry {
    Expiry::resolve(created_at, lifetime_secs)
}

/// Soonest of the given instants, `None` when there are none
pub(crate) fn earliest(timestamps: impl IntoIterator<Item = Timestamp>) -> Option<Timestamp> {
    timestamps.into_iter().min()
}
