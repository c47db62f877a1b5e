use crate::expiry::{earliest, Expiry};
use jiff::Timestamp;

/// 64-bit key identifier, written as 16 hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u64);

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<u64> for KeyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

mod key_id_serde {
    use super::KeyId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for KeyId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&hex::encode_upper(self.0.to_be_bytes()))
        }
    }

    impl<'de> Deserialize<'de> for KeyId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let key_id_in_hex: String = Deserialize::deserialize(deserializer)?;
            let mut bytes = [0u8; 8];
            hex::decode_to_slice(key_id_in_hex, &mut bytes).map_err(serde::de::Error::custom)?;
            Ok(KeyId(u64::from_be_bytes(bytes)))
        }
    }
}

/// Self-signature binding an identity to the primary key
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SelfSignature {
    /// Key expiration time subpacket, relative to the primary key creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_lifetime_secs: Option<u32>,
}

/// What a subkey may be used for, as advertised by its binding signature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyFlags {
    #[serde(default)]
    pub encrypt_communications: bool,
    #[serde(default)]
    pub encrypt_storage: bool,
}

impl KeyFlags {
    /// Both encryption flags set, what most tools generate
    pub fn encryption() -> Self {
        Self {
            encrypt_communications: true,
            encrypt_storage: true,
        }
    }

    pub fn can_encrypt(&self) -> bool {
        self.encrypt_communications || self.encrypt_storage
    }
}

/// Signature binding a subkey to the primary key
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BindingSignature {
    /// Key expiration time subpacket, relative to the subkey creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_lifetime_secs: Option<u32>,

    /// `None` when the signature carries no valid key flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<KeyFlags>,
}

/// User id bound to the primary key
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    user_id: String,
    #[serde(default)]
    self_signature: SelfSignature,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            self_signature: SelfSignature::default(),
        }
    }

    pub fn with_lifetime(mut self, secs: u32) -> Self {
        self.self_signature.key_lifetime_secs = Some(secs);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn self_signature(&self) -> &SelfSignature {
        &self.self_signature
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Subkey {
    key_id: KeyId,

    /// Creation time of the subkey itself, not of its binding signature
    #[serde(with = "crate::timestamp::required")]
    created_at: Timestamp,

    #[serde(default)]
    binding_signature: BindingSignature,
}

impl Subkey {
    pub fn new(key_id: KeyId, created_at: Timestamp) -> Self {
        Self {
            key_id,
            created_at,
            binding_signature: BindingSignature::default(),
        }
    }

    pub fn with_lifetime(mut self, secs: u32) -> Self {
        self.binding_signature.key_lifetime_secs = Some(secs);
        self
    }

    pub fn with_flags(mut self, flags: KeyFlags) -> Self {
        self.binding_signature.flags = Some(flags);
        self
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn binding_signature(&self) -> &BindingSignature {
        &self.binding_signature
    }

    /// Valid key flags with at least one encryption capability
    pub fn is_encryption_subkey(&self) -> bool {
        self.binding_signature
            .flags
            .is_some_and(|flags| flags.can_encrypt())
    }

    pub fn expiry(&self) -> Expiry {
        Expiry::resolve(self.created_at, self.binding_signature.key_lifetime_secs)
    }
}

/// Already parsed key: primary key creation time, identities and subkeys
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Key {
    /// Creation time of the primary key, not of any self-signature
    #[serde(with = "crate::timestamp::required")]
    created_at: Timestamp,

    #[serde(default)]
    identities: Vec<Identity>,

    #[serde(default)]
    subkeys: Vec<Subkey>,
}

impl Key {
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            created_at,
            identities: Vec::new(),
            subkeys: Vec::new(),
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    pub fn with_subkey(mut self, subkey: Subkey) -> Self {
        self.subkeys.push(subkey);
        self
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn subkeys(&self) -> &[Subkey] {
        &self.subkeys
    }

    /// Expiry of one identity, counted from the primary key creation
    pub fn identity_expiry(&self, identity: &Identity) -> Expiry {
        Expiry::resolve(self.created_at, identity.self_signature.key_lifetime_secs)
    }

    /// Roughly "the expiry of the primary key".
    ///
    /// Each identity is signed with its own expiry, and the key stops working
    /// properly as soon as the first of them passes, so the earliest one wins.
    /// Identities without an expiry are ignored: the key only counts as never
    /// expiring when none of them has one.
    pub fn primary_expiry(&self) -> Expiry {
        earliest(
            self.identities
                .iter()
                .filter_map(|identity| self.identity_expiry(identity).timestamp()),
        )
        .into()
    }

    /// Soonest expiry across identities and all subkeys, the point at which the
    /// key loses some functionality
    pub fn earliest_expiry(&self) -> Expiry {
        let identities = self
            .identities
            .iter()
            .filter_map(|identity| self.identity_expiry(identity).timestamp());
        let subkeys = self
            .subkeys
            .iter()
            .filter_map(|subkey| subkey.expiry().timestamp());

        earliest(identities.chain(subkeys)).into()
    }

    /// Encryption subkey with the latest (future-most) creation time.
    ///
    /// On equal creation times the first one in key order is returned.
    pub fn encryption_subkey(&self) -> Option<&Subkey> {
        self.subkeys
            .iter()
            .filter(|subkey| subkey.is_encryption_subkey())
            .min_by_key(|subkey| std::cmp::Reverse(subkey.created_at))
    }
}
