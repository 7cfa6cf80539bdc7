use std::{fmt::Debug, sync::Arc};

use super::{
	Algorithm, Error, KeyId, KeySecret, KeyringConfig, authenticator,
	cipher::{CipherEngine, Iv},
	digest,
	envelope::Envelope,
	key::KeyMaterial,
	registry::KeyRegistry,
};

/// The result of encrypting a value with a [`Keyring`].
///
/// All three parts need to be stored: the `envelope` is the encrypted value itself, the `key_id`
/// says which key is needed to decrypt it again, and the `digest` lets you search for records by
/// value without decrypting them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encrypted {
	pub envelope: String,
	pub key_id: KeyId,
	pub digest: String,
}

/// A versioned set of keys, and the operations that use them.
///
/// A [`Keyring`] is built once, from a set of numbered keys and a [`KeyringConfig`], and never
/// changes after that.  It always encrypts with the key with the highest id (the "current" key),
/// and can decrypt anything encrypted by any key it holds, provided you tell it which key id was
/// used.
///
/// Rotating keys is done by building a *new* [`Keyring`] with an additional key, whose id is
/// higher than all the others.  New encryptions will use the new key, while values encrypted
/// with older keys remain decryptable for as long as you keep those keys in the set.  Nothing
/// gets re-encrypted behind your back; if you want an old value moved to the new key, call
/// [`reencrypt`](Self::reencrypt) and save the result.
///
/// Encrypted values are authenticated (encrypt-then-MAC, with HMAC-SHA256), so tampering with an
/// envelope, or trying to decrypt it with the wrong key, gets you [`Error::Integrity`] and never
/// any plaintext.
///
/// # Example
///
/// ```rust
/// use strong_keyring::{Algorithm, Error, Keyring, KeyringConfig};
/// # fn main() -> Result<(), Error> {
///
/// let config = KeyringConfig::new(Algorithm::Aes128Cbc, "some salt");
///
/// let keyring = Keyring::new(
///     [("1", "uDiMcWVNTuz//naQ88sOcN+E40CyBRGzGTT7OkoBS6M=")],
///     config.clone(),
/// )?;
///
/// let encrypted = keyring.encrypt("super sekrit")?;
/// assert_eq!(1, encrypted.key_id.get());
/// assert_eq!("super sekrit", keyring.decrypt(&encrypted.envelope, encrypted.key_id)?);
///
/// // Time passes, and a new key is added
/// let rotated = Keyring::new(
///     [
///         ("1", "uDiMcWVNTuz//naQ88sOcN+E40CyBRGzGTT7OkoBS6M="),
///         ("2", "Xst9XZ2VQ8Smh/6nPPh1TBsVq5SsSL1vP6B+O0Q7wVM="),
///     ],
///     config,
/// )?;
///
/// // Old values can still be read...
/// assert_eq!("super sekrit", rotated.decrypt(&encrypted.envelope, 1)?);
///
/// // ... new values use the new key...
/// assert_eq!(2, rotated.encrypt("hello")?.key_id.get());
///
/// // ... and the digest doesn't care about keys at all
/// assert_eq!(encrypted.digest, rotated.digest("super sekrit"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Keyring {
	inner: Arc<Inner>,
}

struct Inner {
	config: KeyringConfig,
	cipher: CipherEngine,
	registry: KeyRegistry,
}

impl Keyring {
	/// Create a new [`Keyring`].
	///
	/// The keys are given as `(id, secret)` pairs, where the id is a string containing a
	/// non-negative integer, and the secret is anything that can be turned into a [`KeySecret`]
	/// (a base64 string, or raw bytes).
	///
	/// # Errors
	///
	/// * [`Error::EmptyKeyring`] if no keys were given.
	/// * [`Error::InvalidKeyId`] if an id isn't a non-negative integer.
	/// * [`Error::DuplicateKeyId`] if two ids have the same numeric value.
	/// * [`Error::InvalidKeyEncoding`] if a string secret isn't valid base64.
	/// * [`Error::KeyLengthMismatch`] if a secret isn't exactly twice the
	///   [key size](Algorithm::key_size) of the configured algorithm.
	#[tracing::instrument(level = "debug", skip(keys))]
	pub fn new<K, V>(
		keys: impl IntoIterator<Item = (K, V)>,
		config: KeyringConfig,
	) -> Result<Self, Error>
	where
		K: AsRef<str>,
		V: Into<KeySecret>,
	{
		let algorithm = config.algorithm();

		let keys = keys
			.into_iter()
			.map(|(id, secret)| KeyMaterial::new(id.as_ref(), secret.into(), algorithm))
			.collect::<Result<Vec<_>, _>>()?;

		let registry = KeyRegistry::new(keys)?;
		tracing::debug!(%algorithm, current_key_id=%registry.current().id(), "Keyring ready");

		Ok(Self {
			inner: Arc::new(Inner {
				cipher: CipherEngine::new(algorithm),
				config,
				registry,
			}),
		})
	}

	/// Encrypt a value with the current key.
	///
	/// # Errors
	///
	/// Will return [`Error::Encryption`] in the (extremely unlikely) event something goes
	/// horribly wrong.
	#[tracing::instrument(level = "debug", skip(self, plaintext))]
	pub fn encrypt(&self, plaintext: &str) -> Result<Encrypted, Error> {
		let key = self.inner.registry.current();
		tracing::debug!(key_id=%key.id(), "Encrypting");

		let (iv, ciphertext) = self.inner.cipher.encrypt(key, plaintext.as_bytes())?;

		self.seal(key, iv, ciphertext, plaintext)
	}

	fn seal(
		&self,
		key: &KeyMaterial,
		iv: Iv,
		ciphertext: Vec<u8>,
		plaintext: &str,
	) -> Result<Encrypted, Error> {
		let tag = authenticator::sign(key, &iv, &ciphertext)?;

		Ok(Encrypted {
			envelope: Envelope::new(tag, iv, ciphertext).encode(),
			key_id: key.id(),
			digest: self.digest(plaintext),
		})
	}

	/// Decrypt an envelope, using the key with the given id.
	///
	/// # Errors
	///
	/// Will return one of the following:
	/// * [`Error::UnknownKeyId`] if this keyring has no key with that id.
	/// * [`Error::Integrity`] if the envelope was modified after it was created, or was
	///   encrypted with a different key.
	/// * [`Error::InvalidEnvelope`] if the envelope isn't something [`encrypt`](Self::encrypt)
	///   could have produced.
	/// * [`Error::Decryption`] if the authenticated envelope still failed to decrypt to a string.
	#[tracing::instrument(level = "debug", skip(self, envelope))]
	pub fn decrypt(&self, envelope: &str, key_id: impl Into<KeyId> + Debug) -> Result<String, Error> {
		let key = self.inner.registry.find(key_id.into())?;
		let envelope = Envelope::decode(envelope)?;

		let expected = authenticator::sign(key, &envelope.iv, &envelope.ciphertext)?;
		if !authenticator::verify(&expected, &envelope.tag) {
			tracing::debug!(key_id=%key.id(), "Envelope tag mismatch");
			return Err(Error::Integrity);
		}

		tracing::debug!(key_id=%key.id(), "Decrypting");
		let plaintext = self
			.inner
			.cipher
			.decrypt(key, &envelope.iv, &envelope.ciphertext)?;

		String::from_utf8(plaintext).map_err(|_| {
			tracing::debug!(key_id=%key.id(), "Plaintext is not UTF-8");
			Error::Decryption
		})
	}

	/// Decrypt an envelope encrypted with any of this keyring's keys, and encrypt it again with
	/// the current key.
	///
	/// # Errors
	///
	/// Anything [`decrypt`](Self::decrypt) or [`encrypt`](Self::encrypt) can return.
	#[tracing::instrument(level = "debug", skip(self, envelope))]
	pub fn reencrypt(
		&self,
		envelope: &str,
		key_id: impl Into<KeyId> + Debug,
	) -> Result<Encrypted, Error> {
		let plaintext = self.decrypt(envelope, key_id)?;
		self.encrypt(&plaintext)
	}

	/// Whether a value encrypted with the given key id is due to be [re-encrypted](Self::reencrypt)
	/// with the current key.
	pub fn needs_reencryption(&self, key_id: impl Into<KeyId>) -> bool {
		key_id.into() != self.current_id()
	}

	/// The blind-index [`digest`](crate::digest()) of a value, using this keyring's salt.
	pub fn digest(&self, plaintext: &str) -> String {
		digest::digest(plaintext, self.inner.config.salt())
	}

	/// The id of the key that will be used by [`encrypt`](Self::encrypt).
	pub fn current_id(&self) -> KeyId {
		self.inner.registry.current().id()
	}

	/// All key ids in this keyring, lowest first.
	pub fn key_ids(&self) -> impl DoubleEndedIterator<Item = KeyId> + '_ {
		self.inner.registry.ids()
	}

	pub fn contains(&self, key_id: impl Into<KeyId>) -> bool {
		self.inner.registry.find(key_id.into()).is_ok()
	}

	pub fn algorithm(&self) -> Algorithm {
		self.inner.config.algorithm()
	}

	#[cfg(test)]
	fn encrypt_with_iv(&self, plaintext: &[u8], iv: Iv) -> Result<String, Error> {
		let key = self.inner.registry.current();
		let ciphertext = self.inner.cipher.encrypt_with_iv(key, &iv, plaintext)?;
		let tag = authenticator::sign(key, &iv, &ciphertext)?;

		Ok(Envelope::new(tag, iv, ciphertext).encode())
	}
}

impl Debug for Keyring {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		f.debug_struct("Keyring")
			.field("algorithm", &self.algorithm())
			.field("key_ids", &self.key_ids().collect::<Vec<_>>())
			.finish()
	}
}
