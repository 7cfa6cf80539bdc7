//! Versioned encryption for individual values, such as sensitive database columns.
//!
//! A [`Keyring`] holds a set of numbered keys.  It encrypts a string into a self-contained
//! *envelope* using the key with the highest number, and tells you which key it used, so that
//! you can store the key id next to the envelope.  To get the plaintext back, hand the keyring
//! the envelope and the key id.
//!
//! Envelopes are AES-CBC ciphertexts authenticated with HMAC-SHA256 (encrypt-then-MAC), so any
//! modification of an envelope is detected before decryption is even attempted.  The wire format
//! is `base64(hmac ‖ iv ‖ ciphertext)`, with a 32 byte HMAC and a 16 byte IV.
//!
//! Each key's secret is split in two: the first half is used to sign envelopes, and the second
//! half to encrypt them.  The secret must therefore be twice as long as the key size of the
//! [`Algorithm`] you pick (32, 48, or 64 bytes for AES-128, AES-192, and AES-256 respectively).
//!
//! # Key Rotation
//!
//! Every key gets weaker the more it is used, and keys have a habit of leaking.  To rotate, add
//! a new key with a higher id than any existing key, and construct a new [`Keyring`].  From
//! then on, all encryptions use the new key, while everything encrypted with the old keys can
//! still be decrypted, for as long as you keep the old keys around.  When you save a record that
//! was encrypted under an old key, [`Keyring::needs_reencryption`] and [`Keyring::reencrypt`]
//! help you move it onto the new key, after which the old key can eventually be retired.
//!
//! # Searching Encrypted Values
//!
//! Encrypting the same value twice produces two different envelopes, which makes finding
//! records by value rather difficult.  So [`Keyring::encrypt`] also returns a *digest* of the
//! plaintext: a salted SHA-1 hash, which doesn't depend on the keys at all.  Store the digest in
//! an indexed column, and look records up by [digesting](Keyring::digest) the value you're
//! searching for.
mod authenticator;
mod cipher;
mod config;
mod digest;
mod envelope;
mod error;
mod keyring;
mod registry;

pub use config::{Algorithm, KeyringConfig, KeyringConfigBuilder};
pub use digest::digest;
pub use error::{Error, ErrorKind};
pub use keyring::{Encrypted, Keyring};

mod key;
mod key_id;

pub use key::KeySecret;
pub use key_id::KeyId;
