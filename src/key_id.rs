use super::Error;

/// The version number of a key in a [`Keyring`](super::Keyring).
///
/// Key ids are non-negative integers, and the key with the highest id is the one that gets used
/// for encryption.  You need to store the id alongside each envelope, because it's needed to
/// pick the right key when decrypting.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct KeyId(u64);

impl KeyId {
	pub fn get(self) -> u64 {
		self.0
	}

	#[tracing::instrument(level = "trace")]
	pub(super) fn parse(s: &str) -> Result<Self, Error> {
		// u64::from_str is happy with a leading '+', which we are not
		if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
			return Err(Error::invalid_key_id(s));
		}

		s.parse::<u64>()
			.map(Self)
			.map_err(|_| Error::invalid_key_id(s))
	}
}

impl From<u64> for KeyId {
	fn from(id: u64) -> Self {
		Self(id)
	}
}

impl From<KeyId> for u64 {
	fn from(id: KeyId) -> Self {
		id.0
	}
}

impl std::str::FromStr for KeyId {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Error> {
		Self::parse(s)
	}
}

impl std::fmt::Display for KeyId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_fmt(format_args!("{}", self.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_integers() {
		assert_eq!(KeyId(0), KeyId::parse("0").unwrap());
		assert_eq!(KeyId(42), KeyId::parse("42").unwrap());
		assert_eq!(KeyId(7), KeyId::parse("007").unwrap());
		assert_eq!(KeyId(u64::MAX), KeyId::parse(&u64::MAX.to_string()).unwrap());
	}

	#[test]
	fn rejects_everything_else() {
		for s in ["", "a", "1a", "-1", "+1", " 1", "1 ", "1.0", "18446744073709551616"] {
			let result = KeyId::parse(s);
			assert!(
				matches!(&result, Err(Error::InvalidKeyId(id)) if id == s),
				"{s:?} parsed as {result:?}"
			);
		}
	}

	#[test]
	fn ordering_is_numeric() {
		let mut ids: Vec<KeyId> = ["10", "9", "100", "0"]
			.into_iter()
			.map(|s| s.parse().unwrap())
			.collect();
		ids.sort();
		assert_eq!(vec![0, 9, 10, 100], ids.into_iter().map(u64::from).collect::<Vec<_>>());
	}
}
