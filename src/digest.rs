use sha1::{Digest as _, Sha1};

/// Compute the blind-index digest of a plaintext value.
///
/// This is the lowercase hex SHA-1 of the plaintext with the salt appended, and it is the same
/// no matter which keys or algorithm a [`Keyring`](super::Keyring) uses.  That's the point: if you
/// store the digest next to each envelope, you can find every record containing a given value
/// (by digesting the value you're searching for) without decrypting anything.
///
/// SHA-1 is fine here, as the digest only needs to be a stable, salted fingerprint.  It is
/// not a commitment to the ciphertext, and it is not a password hash; don't use it as one.
///
/// ```rust
/// assert_eq!(
///     "118c884d37dde5fb6816daba052d94e82f1dc41f",
///     strong_keyring::digest("42", "a")
/// );
/// ```
#[tracing::instrument(level = "trace", skip_all)]
pub fn digest(plaintext: &str, salt: &str) -> String {
	let mut hasher = Sha1::new();
	hasher.update(plaintext.as_bytes());
	hasher.update(salt.as_bytes());

	hex::encode(hasher.finalize())
}
