// ABOUTME: Encryption key commands for credvault-cli
// ABOUTME: Generates DATA_ENCRYPTION_KEY values with the exact length the cipher requires
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use rand::RngCore;

/// Print a fresh encryption key to stdout.
///
/// The cipher takes the raw bytes of the environment string as its key,
/// so 16 random bytes hex-encoded yield the required 32-byte value while
/// staying copy-pasteable into an env file.
pub fn generate() {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);

    println!("{}", hex::encode(bytes));
    eprintln!("Set this as DATA_ENCRYPTION_KEY; the vault cannot decrypt without it.");
}
