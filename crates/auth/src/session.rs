use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use venuehub_store::models::Role;

/// An authenticated session. The role claim is captured at issue time and
/// never re-read from the profile table while the session lives.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub profile_id: Uuid,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session table keyed by opaque bearer token.
pub struct SessionManager {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh session for a signed-in profile.
    pub async fn issue(&self, profile_id: Uuid, role: Role) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            profile_id,
            role,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        tracing::debug!(profile = %profile_id, role = ?role, "session issued");
        session
    }

    /// Resolve a bearer token to a live session. Expired entries are dropped
    /// on the way out rather than by a sweeper task.
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let mut table = self.sessions.write().await;
        match table.get(token) {
            Some(session) if !session.is_expired(now) => Some(session.clone()),
            Some(_) => {
                table.remove(token);
                None
            }
            None => None,
        }
    }

    /// Revoke a session; revoking an unknown token is a no-op.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_session_resolves_until_revoked() {
        let sessions = SessionManager::new(60);
        let profile = Uuid::now_v7();
        let session = sessions.issue(profile, Role::Host).await;

        let resolved = sessions.resolve(&session.token).await.unwrap();
        assert_eq!(resolved.profile_id, profile);
        assert_eq!(resolved.role, Role::Host);

        assert!(sessions.revoke(&session.token).await);
        assert!(!sessions.revoke(&session.token).await);
        assert!(sessions.resolve(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_sessions_expire_immediately() {
        let sessions = SessionManager::new(0);
        let session = sessions.issue(Uuid::now_v7(), Role::Guest).await;
        assert!(sessions.resolve(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn role_claim_is_frozen_at_issue_time() {
        let sessions = SessionManager::new(60);
        let profile = Uuid::now_v7();
        let session = sessions.issue(profile, Role::Guest).await;
        // Whatever happens to the profile row afterwards, the claim stands
        // until the next sign-in.
        assert_eq!(
            sessions.resolve(&session.token).await.unwrap().role,
            Role::Guest
        );
    }
}
