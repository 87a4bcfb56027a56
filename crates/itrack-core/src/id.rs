//! ID generation for itrack issues
//!
//! IDs are opaque 16-char lowercase strings. They are derived from a random
//! UUID, so uniqueness does not depend on the clock moving forward.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of a generated ID in characters (80 bits of base32)
pub const ID_LEN: usize = 16;

/// Generate a unique issue ID
///
/// Uses UUID + timestamp hash, encoded as Crockford base32 lowercase.
pub fn generate_id() -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    // 10 bytes encode to exactly 16 base32 chars
    base32::encode(base32::Alphabet::Crockford, &hash[..10]).to_lowercase()
}
