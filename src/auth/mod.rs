use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

/// Authenticated principal handed to the event repository for ownership
/// and gating decisions.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}

/// Delivered to subscribers whenever a session starts or ends.
#[derive(Debug, Clone, Serialize)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for {0}")]
    AlreadyRegistered(String),
}

/// Opaque authentication capability: sign-in, sign-up, sign-out, session
/// lookup, plus a change-notification subscription. The provider's
/// internal mechanics are out of scope for this service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, signup: Signup) -> Result<Session, AuthError>;

    async fn sign_in(&self, credentials: Credentials) -> Result<Session, AuthError>;

    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Resolves a bearer token to its user, if the session is live.
    async fn current_user(&self, token: &str) -> Option<AuthUser>;

    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}

struct Account {
    user: AuthUser,
    password: String,
}

/// Bundled provider keeping accounts and sessions in process memory.
/// Stands in for a hosted identity service; good enough for the binary's
/// default wiring and for tests.
pub struct InMemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, AuthUser>>,
    changes: broadcast::Sender<AuthChange>,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn open_session(&self, user: AuthUser) -> Session {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .unwrap()
            .insert(token.clone(), user.clone());

        let session = Session { token, user };
        let _ = self.changes.send(AuthChange {
            event: AuthEvent::SignedIn,
            session: Some(session.clone()),
        });
        session
    }
}

impl Default for InMemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuth {
    async fn sign_up(&self, signup: Signup) -> Result<Session, AuthError> {
        let email = signup.email.trim().to_lowercase();

        let user = AuthUser {
            id: Uuid::new_v4(),
            email: email.clone(),
            metadata: json!({
                "full_name": signup.name,
                "user_type": signup.user_type.unwrap_or_else(|| "attendee".to_string()),
            }),
        };

        {
            let mut accounts = self.accounts.write().unwrap();
            if accounts.contains_key(&email) {
                return Err(AuthError::AlreadyRegistered(email));
            }
            accounts.insert(
                email.clone(),
                Account {
                    user: user.clone(),
                    password: signup.password,
                },
            );
        }

        info!("Registered account {}", email);
        Ok(self.open_session(user))
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let email = credentials.email.trim().to_lowercase();

        let user = {
            let accounts = self.accounts.read().unwrap();
            let account = accounts.get(&email).ok_or(AuthError::InvalidCredentials)?;
            if account.password != credentials.password {
                return Err(AuthError::InvalidCredentials);
            }
            account.user.clone()
        };

        Ok(self.open_session(user))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.write().unwrap().remove(token);

        let _ = self.changes.send(AuthChange {
            event: AuthEvent::SignedOut,
            session: None,
        });
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Option<AuthUser> {
        self.sessions.read().unwrap().get(token).cloned()
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }
}
