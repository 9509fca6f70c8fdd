// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guest access credential hashing.
//!
//! Guest passwords are case-insensitive: the password is uppercased before
//! hashing on both the write path (invitation creation) and the read path
//! (verification). The stored form is the lowercase-hex rendering of the
//! SHA-256 digest of the uppercased password.

use sha2::{Digest, Sha256};

/// Computes the access hash for a guest password.
///
/// The hash is `hex(sha256(utf8(uppercase(password))))`. Any case variant
/// of the same password produces the same hash.
///
/// # Arguments
///
/// * `password` - The plain-text password
#[must_use]
pub fn access_hash(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.to_uppercase().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Verifies a guest password against a stored access hash.
///
/// # Arguments
///
/// * `password` - The plain-text password supplied by the guest
/// * `stored_hash` - The access hash recorded at invitation time
#[must_use]
pub fn verify_access_password(password: &str, stored_hash: &str) -> bool {
    access_hash(password) == stored_hash
}
