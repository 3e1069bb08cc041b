//! Record-access setup.
//!
//! Row-level authorization is delegated to the database: on boot we generate
//! an ephemeral EdDSA keypair, register its public key as a record access
//! method, and later mint short-lived JWTs so each request can run queries as
//! a specific `user` record subject to table `PERMISSIONS` clauses.

use crate::error::DatabaseError;
use ed25519_dalek::SigningKey;
use getrandom::fill;
use jsonwebtoken::EncodingKey;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

#[derive(Debug, Serialize)]
pub(crate) struct Claims<'a> {
    pub ns: &'a str,
    pub db: &'a str,
    pub ac: &'static str,
    pub id: String,
    pub exp: i64,
}

#[derive(Debug)]
pub(crate) struct RecordAccess {
    pub encoding_key: EncodingKey,
    public_key_hex: String,
}

impl RecordAccess {
    pub(crate) fn init() -> Result<Self, DatabaseError> {
        let mut seed = [0u8; 32];
        fill(&mut seed)
            .map_err(|e| DatabaseError::Internal(format!("Failed to generate key seed: {e}")))?;

        let signing_key = SigningKey::from_bytes(&seed);
        let public_key_hex = hex::encode(signing_key.verifying_key().to_bytes());
        let encoding_key = EncodingKey::from_ed_der(signing_key.to_bytes().as_ref());

        Ok(Self { encoding_key, public_key_hex })
    }

    pub(crate) async fn register(&self, db: &Surreal<Any>) -> Result<(), DatabaseError> {
        db.query("DEFINE ACCESS OVERWRITE user ON DATABASE TYPE RECORD WITH JWT ALGORITHM EDDSA KEY $public_key;")
            .bind(("public_key", self.public_key_hex.clone()))
            .await?;
        Ok(())
    }
}
