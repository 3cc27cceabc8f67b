use crate::{error::Error, ClResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Raw attribute values for one holder, keyed by attribute name
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes(pub BTreeMap<String, String>);

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Attributes {
    /// The sorted attribute names
    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Map every value to the integer that gets signed.
    ///
    /// Decimal strings are used as is, anything else is the big endian
    /// SHA-256 digest of its UTF-8 bytes.
    pub fn encoded(&self) -> BTreeMap<String, BigUint> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), encode_value(value)))
            .collect()
    }
}

/// Encode a single attribute value
pub fn encode_value(value: &str) -> BigUint {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(n) = BigUint::parse_bytes(value.as_bytes(), 10) {
            return n;
        }
    }
    BigUint::from_bytes_be(&Sha256::digest(value.as_bytes()))
}

/// Where the issuer reads the values it signs
pub trait AttributeRepository: Send + Sync {
    /// Fetch the attributes registered for `holder_id`
    fn get_attributes(&self, holder_id: &str) -> ClResult<Attributes>;
}

/// An [`AttributeRepository`] kept in memory
#[derive(Debug, Default)]
pub struct InMemoryAttributeRepository {
    holders: RwLock<BTreeMap<String, Attributes>>,
}

impl InMemoryAttributeRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the attributes of `holder_id`
    pub fn insert(&self, holder_id: impl Into<String>, attributes: Attributes) -> ClResult<()> {
        let mut holders = self
            .holders
            .write()
            .map_err(|_| Error::InvalidInput("attribute repository lock poisoned"))?;
        holders.insert(holder_id.into(), attributes);
        Ok(())
    }
}

impl AttributeRepository for InMemoryAttributeRepository {
    fn get_attributes(&self, holder_id: &str) -> ClResult<Attributes> {
        let holders = self
            .holders
            .read()
            .map_err(|_| Error::InvalidInput("attribute repository lock poisoned"))?;
        holders
            .get(holder_id)
            .cloned()
            .ok_or_else(|| Error::LookupFailed(format!("attributes of holder {}", holder_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_values_encode_as_themselves() {
        assert_eq!(encode_value("1234"), BigUint::from(1234u32));
        assert_eq!(encode_value("0"), BigUint::from(0u32));
    }

    #[test]
    fn other_values_are_hashed() {
        let encoded = encode_value("Alex");
        assert_eq!(encoded, BigUint::from_bytes_be(&Sha256::digest(b"Alex")));
        assert_ne!(encode_value("-5"), BigUint::from(5u32));
        assert_ne!(encode_value(""), BigUint::from(0u32));
    }

    #[test]
    fn repository_lookup() {
        let repo = InMemoryAttributeRepository::new();
        let attrs: Attributes = [("name", "Alex"), ("age", "28")].into_iter().collect();
        repo.insert("holder-1", attrs.clone()).unwrap();
        assert_eq!(repo.get_attributes("holder-1").unwrap(), attrs);
        assert_eq!(attrs.names(), vec!["age".to_string(), "name".to_string()]);
        assert!(matches!(
            repo.get_attributes("holder-2"),
            Err(Error::LookupFailed(_))
        ));
    }
}
