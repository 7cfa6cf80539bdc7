use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use secrecy::{ExposeSecret as _, SecretSlice};

use super::{Algorithm, Error, KeyId};

/// The secret for one version of a key, as handed to [`Keyring::new`](super::Keyring::new).
///
/// Secrets are usually stored base64-encoded (in an environment variable, say), so string
/// values are decoded as base64.  If you already have the raw bytes, pass them as bytes.
///
/// Either way, the decoded secret must be exactly twice the [key
/// size](super::Algorithm::key_size) of the chosen algorithm: the first half is used for
/// signing, the second half for encryption.
pub enum KeySecret {
	Base64(String),
	Raw(Vec<u8>),
}

impl std::fmt::Debug for KeySecret {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		match self {
			Self::Base64(_) => f.write_str("KeySecret::Base64([REDACTED])"),
			Self::Raw(_) => f.write_str("KeySecret::Raw([REDACTED])"),
		}
	}
}

impl From<&str> for KeySecret {
	fn from(s: &str) -> Self {
		Self::Base64(s.to_string())
	}
}

impl From<String> for KeySecret {
	fn from(s: String) -> Self {
		Self::Base64(s)
	}
}

impl From<&String> for KeySecret {
	fn from(s: &String) -> Self {
		Self::Base64(s.clone())
	}
}

impl From<Vec<u8>> for KeySecret {
	fn from(b: Vec<u8>) -> Self {
		Self::Raw(b)
	}
}

impl From<&[u8]> for KeySecret {
	fn from(b: &[u8]) -> Self {
		Self::Raw(b.to_vec())
	}
}

impl<const N: usize> From<[u8; N]> for KeySecret {
	fn from(b: [u8; N]) -> Self {
		Self::Raw(b.to_vec())
	}
}

/// One validated version of a key, split into its signing and encryption halves.
pub(crate) struct KeyMaterial {
	id: KeyId,
	signing_key: SecretSlice<u8>,
	encryption_key: SecretSlice<u8>,
}

impl KeyMaterial {
	#[tracing::instrument(level = "trace", skip(secret))]
	pub(crate) fn new(id: &str, secret: KeySecret, algorithm: Algorithm) -> Result<Self, Error> {
		let key_id = KeyId::parse(id)?;

		let bytes = match secret {
			KeySecret::Base64(s) => BASE64.decode(s.as_bytes()).map_err(|e| {
				tracing::debug!(%key_id, error=%e, "Key is not valid base64");
				Error::invalid_key_encoding(id)
			})?,
			KeySecret::Raw(b) => b,
		};
		let bytes: SecretSlice<u8> = bytes.into();

		let key_size = algorithm.key_size();
		let actual = bytes.expose_secret().len();

		if actual != 2 * key_size {
			tracing::debug!(%key_id, %algorithm, actual, "Key is the wrong length");
			return Err(Error::key_length_mismatch(id, 2 * key_size, actual));
		}

		let (signing, encryption) = bytes.expose_secret().split_at(key_size);

		Ok(Self {
			id: key_id,
			signing_key: signing.to_vec().into(),
			encryption_key: encryption.to_vec().into(),
		})
	}

	pub(crate) fn id(&self) -> KeyId {
		self.id
	}

	pub(crate) fn signing_key(&self) -> &[u8] {
		self.signing_key.expose_secret()
	}

	pub(crate) fn encryption_key(&self) -> &[u8] {
		self.encryption_key.expose_secret()
	}
}

impl std::fmt::Debug for KeyMaterial {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		f.debug_struct("KeyMaterial").field("id", &self.id).finish()
	}
}
