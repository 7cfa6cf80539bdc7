use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use super::{
	Error,
	authenticator::{TAG_LEN, Tag},
	cipher::{IV_LEN, Iv},
};

// Padding guarantees at least one block of ciphertext
const MIN_CIPHERTEXT_LEN: usize = 16;

/// The decoded form of an encrypted value: `tag ‖ iv ‖ ciphertext`, base64-encoded on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Envelope {
	pub(crate) tag: Tag,
	pub(crate) iv: Iv,
	pub(crate) ciphertext: Vec<u8>,
}

impl Envelope {
	pub(crate) fn new(tag: Tag, iv: Iv, ciphertext: Vec<u8>) -> Self {
		Self {
			tag,
			iv,
			ciphertext,
		}
	}

	pub(crate) fn to_bytes(&self) -> Vec<u8> {
		let mut v = Vec::with_capacity(TAG_LEN + IV_LEN + self.ciphertext.len());

		v.extend_from_slice(&self.tag);
		v.extend_from_slice(&self.iv);
		v.extend_from_slice(&self.ciphertext);

		v
	}

	pub(crate) fn encode(&self) -> String {
		BASE64.encode(self.to_bytes())
	}

	#[tracing::instrument(level = "trace", skip_all)]
	pub(crate) fn decode(s: &str) -> Result<Self, Error> {
		let b = BASE64.decode(s.trim().as_bytes()).map_err(|e| {
			tracing::debug!(error=%e, "Envelope is not base64");
			Error::invalid_envelope("not base64")
		})?;

		Self::try_from(&b[..])
	}
}

impl TryFrom<&[u8]> for Envelope {
	type Error = Error;

	fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
		if b.len() < TAG_LEN + IV_LEN + MIN_CIPHERTEXT_LEN {
			tracing::debug!(len = b.len(), "Envelope too short");
			return Err(Error::invalid_envelope("too short"));
		}

		let (tag, rest) = b.split_at(TAG_LEN);
		let (iv, ciphertext) = rest.split_at(IV_LEN);

		Ok(Self {
			tag: tag
				.try_into()
				.map_err(|_| Error::invalid_envelope("bad tag"))?,
			iv: iv.try_into().map_err(|_| Error::invalid_envelope("bad iv"))?,
			ciphertext: ciphertext.to_vec(),
		})
	}
}
