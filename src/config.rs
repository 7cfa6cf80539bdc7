use std::fmt::Debug;

use super::Error;

/// The block cipher used to encrypt values.
///
/// All of the supported algorithms are AES in CBC mode with PKCS#7 padding; they differ only in
/// key size, and therefore in how long each key's secret needs to be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
	#[default]
	Aes128Cbc,
	Aes192Cbc,
	Aes256Cbc,
}

impl Algorithm {
	/// Size, in bytes, of the encryption (and signing) sub-key.
	///
	/// The secret supplied for each key must be exactly twice this long.
	pub fn key_size(self) -> usize {
		match self {
			Self::Aes128Cbc => 16,
			Self::Aes192Cbc => 24,
			Self::Aes256Cbc => 32,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Aes128Cbc => "aes-128-cbc",
			Self::Aes192Cbc => "aes-192-cbc",
			Self::Aes256Cbc => "aes-256-cbc",
		}
	}
}

impl std::str::FromStr for Algorithm {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Error> {
		match s.trim().to_ascii_lowercase().as_str() {
			"aes-128-cbc" => Ok(Self::Aes128Cbc),
			"aes-192-cbc" => Ok(Self::Aes192Cbc),
			"aes-256-cbc" => Ok(Self::Aes256Cbc),
			_ => Err(Error::unsupported_algorithm(s)),
		}
	}
}

impl std::fmt::Display for Algorithm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// How a [`Keyring`](super::Keyring) encrypts and digests values.
///
/// The salt is mixed into every digest the keyring produces.  It is required, because silently
/// digesting without one would make your blind index trivially guessable, but it may be empty
/// if that's really what you want.
///
/// # Example
///
/// ```rust
/// use strong_keyring::{Algorithm, Error, KeyringConfig};
/// # fn main() -> Result<(), Error> {
///
/// // When you know exactly what you want
/// let config = KeyringConfig::new(Algorithm::Aes256Cbc, "pepper");
/// assert_eq!(256 / 8, config.algorithm().key_size());
///
/// // When the settings come from somewhere less trustworthy, like the environment
/// let config = KeyringConfig::builder()
///     .algorithm_name("aes-192-cbc")
///     .salt("")
///     .build()?;
/// assert_eq!(Algorithm::Aes192Cbc, config.algorithm());
///
/// // No salt, no keyring
/// let result = KeyringConfig::builder().algorithm(Algorithm::Aes128Cbc).build();
/// assert!(matches!(result, Err(Error::MissingSalt)));
///
/// let result = KeyringConfig::builder().algorithm_name("rot13").salt("x").build();
/// assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct KeyringConfig {
	algorithm: Algorithm,
	salt: String,
}

impl KeyringConfig {
	pub fn new(algorithm: Algorithm, salt: impl Into<String>) -> Self {
		Self {
			algorithm,
			salt: salt.into(),
		}
	}

	pub fn builder() -> KeyringConfigBuilder {
		KeyringConfigBuilder::default()
	}

	pub fn algorithm(&self) -> Algorithm {
		self.algorithm
	}

	pub fn salt(&self) -> &str {
		&self.salt
	}
}

// Salts stay out of logs
impl Debug for KeyringConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		f.debug_struct("KeyringConfig")
			.field("algorithm", &self.algorithm)
			.field("salt", &"[REDACTED]")
			.finish()
	}
}

#[derive(Clone, Debug, Default)]
enum AlgorithmChoice {
	#[default]
	Unset,
	Known(Algorithm),
	Named(String),
}

/// Incrementally assemble a [`KeyringConfig`], validating it all at once in [`build`](Self::build).
#[derive(Clone, Default)]
pub struct KeyringConfigBuilder {
	algorithm: AlgorithmChoice,
	salt: Option<String>,
}

impl Debug for KeyringConfigBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		f.debug_struct("KeyringConfigBuilder")
			.field("algorithm", &self.algorithm)
			.field("salt", &self.salt.as_ref().map(|_| "[REDACTED]"))
			.finish()
	}
}

impl KeyringConfigBuilder {
	pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
		self.algorithm = AlgorithmChoice::Known(algorithm);
		self
	}

	/// Select the algorithm by its name (such as `aes-256-cbc`).  The name isn't checked until
	/// [`build`](Self::build) is called.
	pub fn algorithm_name(mut self, name: impl Into<String>) -> Self {
		self.algorithm = AlgorithmChoice::Named(name.into());
		self
	}

	pub fn salt(mut self, salt: impl Into<String>) -> Self {
		self.salt = Some(salt.into());
		self
	}

	/// # Errors
	///
	/// * [`Error::MissingSalt`] if [`salt`](Self::salt) was never called.
	/// * [`Error::UnsupportedAlgorithm`] if the algorithm name isn't one we know.
	#[tracing::instrument(level = "debug", skip(self))]
	pub fn build(self) -> Result<KeyringConfig, Error> {
		let algorithm = match self.algorithm {
			AlgorithmChoice::Unset => Algorithm::default(),
			AlgorithmChoice::Known(a) => a,
			AlgorithmChoice::Named(name) => name.parse()?,
		};

		let Some(salt) = self.salt else {
			tracing::debug!(%algorithm, "No salt provided");
			return Err(Error::MissingSalt);
		};

		Ok(KeyringConfig { algorithm, salt })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn algorithm_names() {
		for a in [Algorithm::Aes128Cbc, Algorithm::Aes192Cbc, Algorithm::Aes256Cbc] {
			assert_eq!(a, a.to_string().parse::<Algorithm>().unwrap());
		}

		assert_eq!(Algorithm::Aes256Cbc, " AES-256-CBC\n".parse().unwrap());
		assert!(matches!(
			"aes-256-gcm".parse::<Algorithm>(),
			Err(Error::UnsupportedAlgorithm(n)) if n == "aes-256-gcm"
		));
	}

	#[test]
	fn key_sizes() {
		assert_eq!(16, Algorithm::Aes128Cbc.key_size());
		assert_eq!(24, Algorithm::Aes192Cbc.key_size());
		assert_eq!(32, Algorithm::Aes256Cbc.key_size());
	}

	#[test]
	fn builder_defaults_to_aes_128() {
		let config = KeyringConfig::builder().salt("s").build().unwrap();
		assert_eq!(Algorithm::Aes128Cbc, config.algorithm());
		assert_eq!("s", config.salt());
	}

	#[test]
	fn empty_salt_is_still_a_salt() {
		let config = KeyringConfig::builder().salt("").build().unwrap();
		assert_eq!("", config.salt());
	}

	#[test]
	fn salt_is_required() {
		let result = KeyringConfig::builder()
			.algorithm(Algorithm::Aes192Cbc)
			.build();
		assert!(matches!(result, Err(Error::MissingSalt)));
	}

	#[test]
	fn bad_algorithm_name() {
		let result = KeyringConfig::builder()
			.algorithm_name("des-cbc")
			.salt("")
			.build();
		assert!(matches!(result, Err(Error::UnsupportedAlgorithm(n)) if n == "des-cbc"));
	}

	#[test]
	fn salt_not_in_debug() {
		let config = KeyringConfig::new(Algorithm::Aes128Cbc, "super secret salt");
		assert!(!format!("{config:?}").contains("super secret salt"));
	}
}
