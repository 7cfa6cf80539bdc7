use super::KeyId;

#[derive(Debug, thiserror::Error, thiserror_ext::Construct)]
#[non_exhaustive]
pub enum Error {
	#[error("no digest salt was configured")]
	MissingSalt,

	#[error("unsupported encryption algorithm: {0:?}")]
	UnsupportedAlgorithm(String),

	#[error("key {key_id} is {actual} bytes long, expected {expected}")]
	KeyLengthMismatch {
		key_id: String,
		expected: usize,
		actual: usize,
	},

	#[error("key id {0:?} is not a non-negative integer")]
	InvalidKeyId(String),

	#[error("key {0} is not valid base64")]
	InvalidKeyEncoding(String),

	#[error("key id {0} was specified more than once")]
	DuplicateKeyId(KeyId),

	#[error("a keyring needs at least one key")]
	EmptyKeyring,

	#[error("no key with id {0} in keyring")]
	UnknownKeyId(KeyId),

	#[error("envelope failed integrity check")]
	Integrity,

	#[error("invalid envelope: {0}")]
	InvalidEnvelope(String),

	#[error("failed to decrypt envelope")]
	Decryption,

	#[error("failed to encrypt plaintext")]
	Encryption,
}

/// The broad category an [`Error`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
	/// The [`KeyringConfig`](super::KeyringConfig) was incomplete or named something we don't do.
	Configuration,
	/// One or more of the supplied keys could not be turned into usable key material.
	KeyMaterial,
	/// The key an envelope was encrypted with isn't in the keyring.
	Lookup,
	/// The envelope has been tampered with, or was encrypted with a different key.
	Integrity,
	/// The envelope was malformed, or did not decrypt to a string.
	Decryption,
	/// Encryption itself failed.
	Encryption,
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::MissingSalt | Self::UnsupportedAlgorithm(_) => ErrorKind::Configuration,
			Self::KeyLengthMismatch { .. }
			| Self::InvalidKeyId(_)
			| Self::InvalidKeyEncoding(_)
			| Self::DuplicateKeyId(_)
			| Self::EmptyKeyring => ErrorKind::KeyMaterial,
			Self::UnknownKeyId(_) => ErrorKind::Lookup,
			Self::Integrity => ErrorKind::Integrity,
			Self::InvalidEnvelope(_) | Self::Decryption => ErrorKind::Decryption,
			Self::Encryption => ErrorKind::Encryption,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds() {
		assert_eq!(ErrorKind::Configuration, Error::MissingSalt.kind());
		assert_eq!(
			ErrorKind::KeyMaterial,
			Error::key_length_mismatch("0", 32usize, 31usize).kind()
		);
		assert_eq!(ErrorKind::KeyMaterial, Error::EmptyKeyring.kind());
		assert_eq!(ErrorKind::Lookup, Error::UnknownKeyId(KeyId::from(3)).kind());
		assert_eq!(ErrorKind::Integrity, Error::Integrity.kind());
		assert_eq!(ErrorKind::Decryption, Error::invalid_envelope("short").kind());
	}

	#[test]
	fn messages() {
		assert_eq!(
			"key 7 is 31 bytes long, expected 32",
			Error::key_length_mismatch("7", 32usize, 31usize).to_string()
		);
		assert_eq!(
			"key id \"seven\" is not a non-negative integer",
			Error::invalid_key_id("seven").to_string()
		);
		assert_eq!(
			"no key with id 42 in keyring",
			Error::UnknownKeyId(42.into()).to_string()
		);
	}
}
