use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{Error, key::KeyMaterial};

pub(crate) const TAG_LEN: usize = 32;

pub(crate) type Tag = [u8; TAG_LEN];

/// Produce the HMAC-SHA256 tag over an IV and the ciphertext that follows it.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn sign(key: &KeyMaterial, iv: &[u8], ciphertext: &[u8]) -> Result<Tag, Error> {
	let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key.signing_key()).map_err(|_| {
		tracing::debug!("Signing key rejected by HMAC");
		Error::Encryption
	})?;
	mac.update(iv);
	mac.update(ciphertext);

	let mut tag: Tag = [0u8; TAG_LEN];
	tag.copy_from_slice(&mac.finalize().into_bytes());

	Ok(tag)
}

/// Compare two tags without giving away, through timing, how much of them matched.
///
/// Differing lengths aren't secret, so they're rejected straight away.
pub(crate) fn verify(expected: &[u8], actual: &[u8]) -> bool {
	constant_time_eq::constant_time_eq(expected, actual)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Algorithm;

	fn key(fill: u8) -> KeyMaterial {
		KeyMaterial::new("0", [fill; 32].into(), Algorithm::Aes128Cbc).unwrap()
	}

	#[test]
	fn known_answer() {
		// HMAC-SHA256 with a 16-byte key of 0x0b, over "Hi There" split across IV and ciphertext
		let key = KeyMaterial::new(
			"0",
			[[0x0bu8; 16], [0u8; 16]].concat().into(),
			Algorithm::Aes128Cbc,
		)
		.unwrap();

		assert_eq!(
			"492ce020fe2534a5789dc3848806c78f4f6711397f08e7e7a12ca5a4483c8aa6",
			hex::encode(sign(&key, b"Hi ", b"There").unwrap())
		);
	}

	#[test]
	fn covers_iv_and_ciphertext() {
		let key = key(1);
		let tag = sign(&key, b"iv", b"ciphertext").unwrap();

		assert_eq!(tag, sign(&key, b"iv", b"ciphertext").unwrap());
		assert_ne!(tag, sign(&key, b"iV", b"ciphertext").unwrap());
		assert_ne!(tag, sign(&key, b"iv", b"Ciphertext").unwrap());
		assert_ne!(tag, sign(&self::key(2), b"iv", b"ciphertext").unwrap());
	}

	#[test]
	fn verify_compares_everything() {
		let tag = sign(&key(1), b"iv", b"ciphertext").unwrap();

		assert!(verify(&tag, &tag));
		assert!(!verify(&tag, &tag[..31]));
		assert!(!verify(&tag[..31], &tag));
		assert!(!verify(&tag, &[]));

		for i in 0..TAG_LEN {
			let mut other = tag;
			other[i] ^= 0x80;
			assert!(!verify(&tag, &other), "difference at byte {i} went unnoticed");
		}
	}
}
