//! Identity records and the provider boundary.
//!
//! Tier membership lives as arbitrary metadata on identity records owned by
//! an external provider. This module reads that metadata defensively (an
//! unknown or missing value is never an error, it is `free`) and writes tier
//! updates back through the [`IdentityProvider`] seam. The file-backed
//! provider stands in for the hosted one during local operation and tests.

use std::{fs, path::PathBuf};

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tier::Tier;

/// Provider-owned representation of an authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identity token.
    pub token: String,
    /// Display name or contact.
    pub name: String,
    /// Arbitrary provider metadata. The `tier` key is the only one this
    /// service reads or writes, and it is validated on every read.
    #[serde(default)]
    pub metadata: Value,
}

/// Resolve the caller's current tier from identity metadata.
///
/// Absent, malformed, or out-of-set values degrade to `free` rather than
/// erroring; unknown state must not be permissive.
pub fn resolve_tier(identity: &Identity) -> Tier {
    identity
        .metadata
        .get("tier")
        .and_then(Value::as_str)
        .map(Tier::parse_lenient)
        .unwrap_or(Tier::Free)
}

/// External identity provider boundary.
///
/// Both calls are single-attempt operations; the only contract relied upon is
/// success/failure plus read-after-write visibility within the same session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the record for `token`, or `None` when the provider holds no
    /// such identity.
    async fn fetch(&self, token: &str) -> Result<Option<Identity>>;

    /// Persist a new tier value onto the record for `token`.
    async fn write_tier(&self, token: &str, tier: Tier) -> Result<()>;
}

/// File-backed provider storing one JSON record per token under `root`.
#[derive(Clone)]
pub struct FileProvider {
    root: PathBuf,
}

impl FileProvider {
    /// Create a provider rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Ensure the record directory exists.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Create or replace a record. Used by the `register` admin command.
    pub fn put(&self, identity: &Identity) -> Result<()> {
        let path = self.record_path(&identity.token)?;
        fs::create_dir_all(&self.root)?;
        // Write atomically so a concurrent fetch never sees a partial record.
        let tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        serde_json::to_writer(&tmp, identity)?;
        tmp.persist(path)?;
        Ok(())
    }

    fn record_path(&self, token: &str) -> Result<PathBuf> {
        ensure!(
            !token.is_empty()
                && token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')),
            "invalid identity token: {token:?}"
        );
        Ok(self.root.join(format!("{token}.json")))
    }

    fn read(&self, token: &str) -> Result<Option<Identity>> {
        let path = self.record_path(token)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading identity record {}", path.display()))?;
        let identity = serde_json::from_str(&data)
            .with_context(|| format!("parsing identity record {}", path.display()))?;
        Ok(Some(identity))
    }
}

#[async_trait]
impl IdentityProvider for FileProvider {
    async fn fetch(&self, token: &str) -> Result<Option<Identity>> {
        self.read(token)
    }

    async fn write_tier(&self, token: &str, tier: Tier) -> Result<()> {
        let mut identity = self
            .read(token)?
            .with_context(|| format!("unknown identity: {token}"))?;
        match identity.metadata.as_object_mut() {
            Some(map) => {
                map.insert("tier".into(), json!(tier.as_str()));
            }
            // Provider metadata is untyped; replace anything non-object.
            None => identity.metadata = json!({ "tier": tier.as_str() }),
        }
        self.put(&identity)
    }
}
