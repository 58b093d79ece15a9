//! Hash provider for password fields
//!
//! Password values are only ever stored as one-way Argon2id hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::errors::{CollaboratorError, CollaboratorResult};

/// One-way hashing of secret field values.
pub trait HashProvider {
    fn hash(&self, plaintext: &str) -> CollaboratorResult<String>;
}

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Option<Params>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses explicit cost parameters instead of the argon2 defaults.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> CollaboratorResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| CollaboratorError::Hash(format!("invalid argon2 params: {}", e)))?;
        Ok(Self {
            params: Some(params),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        match &self.params {
            Some(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            None => Argon2::default(),
        }
    }

    /// Checks a plaintext against a stored PHC hash.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self.argon2().verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

impl HashProvider for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> CollaboratorResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CollaboratorError::Hash(e.to_string()))
    }
}
