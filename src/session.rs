//! Per-caller session state and the tier upgrade transaction.

use thiserror::Error;

use crate::identity::{resolve_tier, Identity, IdentityProvider};
use crate::tier::Tier;

/// Why an upgrade did not go through.
///
/// A precondition failure is a rejected operation; a provider failure is a
/// fault the caller may retry. The two must stay distinguishable at the
/// boundary.
#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("tier '{requested}' does not increase current tier '{current}'")]
    NotAnUpgrade { current: Tier, requested: Tier },
    #[error("identity provider write failed: {0}")]
    Provider(anyhow::Error),
}

/// A resolved caller: identity attributes plus the tier every entitlement
/// check in this session uses.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub name: String,
    pub tier: Tier,
}

impl Session {
    /// Build a session from a provider record, resolving the tier
    /// defensively (missing or malformed metadata starts the session at
    /// `free`).
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            token: identity.token.clone(),
            name: identity.name.clone(),
            tier: resolve_tier(identity),
        }
    }

    /// Move the session to a strictly higher tier.
    ///
    /// The provider write happens first and the in-memory tier is updated
    /// only once it succeeds: a failed write leaves both sides unchanged,
    /// while a successful one is visible to the very next entitlement check
    /// or listing fetch. Single attempt, no automatic retry.
    pub async fn upgrade(
        &mut self,
        provider: &dyn IdentityProvider,
        requested: Tier,
    ) -> Result<(), UpgradeError> {
        if requested.rank() <= self.tier.rank() {
            return Err(UpgradeError::NotAnUpgrade {
                current: self.tier,
                requested,
            });
        }
        provider
            .write_tier(&self.token, requested)
            .await
            .map_err(UpgradeError::Provider)?;
        self.tier = requested;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::FileProvider;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;

    /// Provider whose write path always fails.
    struct BrokenProvider;

    #[async_trait]
    impl IdentityProvider for BrokenProvider {
        async fn fetch(&self, _token: &str) -> Result<Option<Identity>> {
            Ok(None)
        }

        async fn write_tier(&self, _token: &str, _tier: Tier) -> Result<()> {
            Err(anyhow!("provider offline"))
        }
    }

    fn registered(dir: &TempDir, tier: &str) -> (FileProvider, Session) {
        let provider = FileProvider::new(dir.path().join("identities"));
        provider.init().unwrap();
        let identity = Identity {
            token: "tok1".into(),
            name: "Ada".into(),
            metadata: json!({ "tier": tier }),
        };
        provider.put(&identity).unwrap();
        let session = Session::from_identity(&identity);
        (provider, session)
    }

    #[test]
    fn session_resolves_tier_defensively() {
        let identity = Identity {
            token: "tok1".into(),
            name: "Ada".into(),
            metadata: json!({ "tier": "mithril" }),
        };
        assert_eq!(Session::from_identity(&identity).tier, Tier::Free);
    }

    #[tokio::test]
    async fn upgrade_applies_immediately_and_persists() {
        let dir = TempDir::new().unwrap();
        let (provider, mut session) = registered(&dir, "free");
        session.upgrade(&provider, Tier::Silver).await.unwrap();
        assert_eq!(session.tier, Tier::Silver);
        // Read-after-write: a fresh resolve sees the new tier.
        let fetched = provider.fetch("tok1").await.unwrap().unwrap();
        assert_eq!(Session::from_identity(&fetched).tier, Tier::Silver);
    }

    #[tokio::test]
    async fn downgrade_is_rejected_and_leaves_tier_alone() {
        let dir = TempDir::new().unwrap();
        let (provider, mut session) = registered(&dir, "gold");
        let err = session.upgrade(&provider, Tier::Silver).await.unwrap_err();
        assert!(matches!(
            err,
            UpgradeError::NotAnUpgrade {
                current: Tier::Gold,
                requested: Tier::Silver
            }
        ));
        assert_eq!(session.tier, Tier::Gold);
        let fetched = provider.fetch("tok1").await.unwrap().unwrap();
        assert_eq!(Session::from_identity(&fetched).tier, Tier::Gold);
    }

    #[tokio::test]
    async fn same_tier_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (provider, mut session) = registered(&dir, "silver");
        let err = session.upgrade(&provider, Tier::Silver).await.unwrap_err();
        assert!(matches!(err, UpgradeError::NotAnUpgrade { .. }));
    }

    #[tokio::test]
    async fn provider_failure_leaves_session_unchanged() {
        let mut session = Session {
            token: "tok1".into(),
            name: "Ada".into(),
            tier: Tier::Free,
        };
        let err = session
            .upgrade(&BrokenProvider, Tier::Platinum)
            .await
            .unwrap_err();
        assert!(matches!(err, UpgradeError::Provider(_)));
        assert_eq!(session.tier, Tier::Free);
    }
}
