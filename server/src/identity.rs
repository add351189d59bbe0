//! `IdentityVerifier`: the external identity/authentication service.
//!
//! This is an interface-only collaborator (see `SPEC_FULL.md` §1) — the
//! real implementation lives outside this repo and is reached over some
//! out-of-process RPC. `StubIdentityVerifier` always accepts, using the
//! token itself as both the global id and the display name, so the
//! controller and hub are fully exercisable without a real identity
//! backend.

use async_trait::async_trait;
use crate::error::IdentityError;

pub struct Identity {
    pub global_id: String,
    pub display_name: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError>;
}

pub struct StubIdentityVerifier;

#[async_trait]
impl IdentityVerifier for StubIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        if token.is_empty() {
            return Err(IdentityError::Rejected);
        }
        Ok(Identity {
            global_id: token.to_string(),
            display_name: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_rejects_empty_token() {
        let verifier = StubIdentityVerifier;
        assert!(verifier.verify("").await.is_err());
    }

    #[tokio::test]
    async fn stub_accepts_nonempty_token() {
        let verifier = StubIdentityVerifier;
        let identity = verifier.verify("player-one").await.unwrap();
        assert_eq!(identity.global_id, "player-one");
    }
}
