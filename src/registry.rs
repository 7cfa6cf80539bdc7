use std::collections::BTreeMap;

use super::{Error, KeyId, key::KeyMaterial};

/// The ordered, immutable set of keys a keyring can use.
#[derive(Debug)]
pub(crate) struct KeyRegistry {
	keys: BTreeMap<KeyId, KeyMaterial>,
}

impl KeyRegistry {
	#[tracing::instrument(level = "trace", skip(keys))]
	pub(crate) fn new(keys: impl IntoIterator<Item = KeyMaterial>) -> Result<Self, Error> {
		let mut key_map = BTreeMap::new();

		for key in keys {
			let key_id = key.id();
			if key_map.insert(key_id, key).is_some() {
				tracing::debug!(%key_id, "Duplicate key id");
				return Err(Error::DuplicateKeyId(key_id));
			}
			tracing::debug!(%key_id, "Including key");
		}

		if key_map.is_empty() {
			return Err(Error::EmptyKeyring);
		}

		Ok(Self { keys: key_map })
	}

	/// The key with the highest id, which is what all new encryptions use.
	pub(crate) fn current(&self) -> &KeyMaterial {
		self.keys
			.last_key_value()
			.map(|(_, key)| key)
			.expect("CAN'T HAPPEN: empty registry was constructed")
	}

	pub(crate) fn find(&self, id: KeyId) -> Result<&KeyMaterial, Error> {
		self.keys.get(&id).ok_or_else(|| {
			tracing::debug!(key_id=%id, "Key not found");
			Error::UnknownKeyId(id)
		})
	}

	pub(crate) fn ids(&self) -> impl DoubleEndedIterator<Item = KeyId> + '_ {
		self.keys.keys().copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Algorithm;

	fn key(id: &str) -> KeyMaterial {
		KeyMaterial::new(id, [0u8; 32].into(), Algorithm::Aes128Cbc).unwrap()
	}

	#[test]
	fn current_is_highest_id() {
		let registry = KeyRegistry::new([key("2"), key("10"), key("9")]).unwrap();
		assert_eq!(KeyId::from(10), registry.current().id());
	}

	#[test]
	fn single_key_is_current() {
		let registry = KeyRegistry::new([key("0")]).unwrap();
		assert_eq!(KeyId::from(0), registry.current().id());
	}

	#[test]
	fn find_exact_match() {
		let registry = KeyRegistry::new([key("1"), key("2")]).unwrap();
		assert_eq!(KeyId::from(1), registry.find(1.into()).unwrap().id());
		assert!(matches!(
			registry.find(3.into()),
			Err(Error::UnknownKeyId(id)) if id == KeyId::from(3)
		));
	}

	#[test]
	fn empty() {
		assert!(matches!(
			KeyRegistry::new(Vec::<KeyMaterial>::new()),
			Err(Error::EmptyKeyring)
		));
	}

	#[test]
	fn duplicate_ids() {
		let result = KeyRegistry::new([key("1"), key("01")]);
		assert!(matches!(result, Err(Error::DuplicateKeyId(id)) if id == KeyId::from(1)));
	}

	#[test]
	fn ids_ascend() {
		let registry = KeyRegistry::new([key("5"), key("1"), key("3")]).unwrap();
		assert_eq!(
			vec![1, 3, 5],
			registry.ids().map(u64::from).collect::<Vec<_>>()
		);
	}
}
