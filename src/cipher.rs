use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::{RngCore as _, rng};

use super::{Algorithm, Error, key::KeyMaterial};

pub(crate) const IV_LEN: usize = 16;

pub(crate) type Iv = [u8; IV_LEN];

/// AES-CBC encryption and decryption, with PKCS#7 padding.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CipherEngine {
	algorithm: Algorithm,
}

impl CipherEngine {
	pub(crate) fn new(algorithm: Algorithm) -> Self {
		Self { algorithm }
	}

	/// Encrypt under a freshly-generated random IV.
	#[tracing::instrument(level = "trace", skip(self, key, plaintext))]
	pub(crate) fn encrypt(
		&self,
		key: &KeyMaterial,
		plaintext: &[u8],
	) -> Result<(Iv, Vec<u8>), Error> {
		let mut iv: Iv = [0u8; IV_LEN];
		rng().fill_bytes(&mut iv);

		let ciphertext = self.encrypt_with_iv(key, &iv, plaintext)?;

		Ok((iv, ciphertext))
	}

	pub(crate) fn encrypt_with_iv(
		&self,
		key: &KeyMaterial,
		iv: &Iv,
		plaintext: &[u8],
	) -> Result<Vec<u8>, Error> {
		let key = key.encryption_key();

		match self.algorithm {
			Algorithm::Aes128Cbc => seal::<cbc::Encryptor<aes::Aes128>>(key, iv, plaintext),
			Algorithm::Aes192Cbc => seal::<cbc::Encryptor<aes::Aes192>>(key, iv, plaintext),
			Algorithm::Aes256Cbc => seal::<cbc::Encryptor<aes::Aes256>>(key, iv, plaintext),
		}
	}

	#[tracing::instrument(level = "trace", skip(self, key, iv, ciphertext))]
	pub(crate) fn decrypt(
		&self,
		key: &KeyMaterial,
		iv: &Iv,
		ciphertext: &[u8],
	) -> Result<Vec<u8>, Error> {
		let key = key.encryption_key();

		match self.algorithm {
			Algorithm::Aes128Cbc => open::<cbc::Decryptor<aes::Aes128>>(key, iv, ciphertext),
			Algorithm::Aes192Cbc => open::<cbc::Decryptor<aes::Aes192>>(key, iv, ciphertext),
			Algorithm::Aes256Cbc => open::<cbc::Decryptor<aes::Aes256>>(key, iv, ciphertext),
		}
	}
}

fn seal<C: KeyIvInit + BlockEncryptMut>(
	key: &[u8],
	iv: &Iv,
	plaintext: &[u8],
) -> Result<Vec<u8>, Error> {
	let cipher = C::new_from_slices(key, iv).map_err(|_| {
		tracing::debug!(key_len = key.len(), "Encryption key rejected by cipher");
		Error::Encryption
	})?;

	Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn open<C: KeyIvInit + BlockDecryptMut>(
	key: &[u8],
	iv: &Iv,
	ciphertext: &[u8],
) -> Result<Vec<u8>, Error> {
	let cipher = C::new_from_slices(key, iv).map_err(|_| {
		tracing::debug!(key_len = key.len(), "Decryption key rejected by cipher");
		Error::Decryption
	})?;

	cipher
		.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
		.map_err(|_| {
			tracing::debug!("Bad padding");
			Error::Decryption
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(algorithm: Algorithm) -> KeyMaterial {
		let secret: Vec<u8> = (0..(algorithm.key_size() * 2) as u8).collect();
		KeyMaterial::new("0", secret.into(), algorithm).unwrap()
	}

	#[test]
	fn round_trip() {
		for algorithm in [Algorithm::Aes128Cbc, Algorithm::Aes192Cbc, Algorithm::Aes256Cbc] {
			let engine = CipherEngine::new(algorithm);
			let key = key(algorithm);

			for len in [0, 1, 15, 16, 17, 100] {
				let plaintext = vec![0x5au8; len];
				let (iv, ciphertext) = engine.encrypt(&key, &plaintext).unwrap();

				// Padding always adds at least one byte
				assert_eq!((len / 16 + 1) * 16, ciphertext.len());
				assert_eq!(plaintext, engine.decrypt(&key, &iv, &ciphertext).unwrap());
			}
		}
	}

	#[test]
	fn fresh_iv_every_time() {
		let engine = CipherEngine::new(Algorithm::Aes128Cbc);
		let key = key(Algorithm::Aes128Cbc);

		let (iv1, ct1) = engine.encrypt(&key, b"same").unwrap();
		let (iv2, ct2) = engine.encrypt(&key, b"same").unwrap();

		assert_ne!(iv1, iv2);
		assert_ne!(ct1, ct2);
	}

	#[test]
	fn ragged_ciphertext() {
		let engine = CipherEngine::new(Algorithm::Aes256Cbc);
		let key = key(Algorithm::Aes256Cbc);

		let (iv, mut ciphertext) = engine.encrypt(&key, b"hello").unwrap();
		ciphertext.pop();

		assert!(matches!(
			engine.decrypt(&key, &iv, &ciphertext),
			Err(Error::Decryption)
		));
		assert!(matches!(engine.decrypt(&key, &iv, &[]), Err(Error::Decryption)));
	}
}
