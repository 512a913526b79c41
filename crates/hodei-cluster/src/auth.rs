use thiserror::Error;

const MIN_SHARED_SECRET_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum PeerAuthError {
    #[error("shared secret too short: minimum {MIN_SHARED_SECRET_LEN} characters")]
    SecretTooShort,

    #[error("shared secret does not match")]
    Mismatch,

    #[error("bcrypt error: {0}")]
    Bcrypt(String),
}

/// Hashes a new shared secret for storage, rejecting anything shorter than
/// the spec's 16-character minimum.
pub fn hash_shared_secret(secret: &str) -> Result<String, PeerAuthError> {
    if secret.len() < MIN_SHARED_SECRET_LEN {
        return Err(PeerAuthError::SecretTooShort);
    }
    bcrypt::hash(secret, bcrypt::DEFAULT_COST).map_err(|err| PeerAuthError::Bcrypt(err.to_string()))
}

/// Verifies a peer-presented shared secret against the stored bcrypt hash.
pub fn verify_shared_secret(presented: &str, stored_hash: &str) -> Result<(), PeerAuthError> {
    if presented.len() < MIN_SHARED_SECRET_LEN {
        return Err(PeerAuthError::SecretTooShort);
    }
    let matches = bcrypt::verify(presented, stored_hash).map_err(|err| PeerAuthError::Bcrypt(err.to_string()))?;
    if matches {
        Ok(())
    } else {
        Err(PeerAuthError::Mismatch)
    }
}
