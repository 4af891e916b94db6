//! Authenticated-user context shared by the client, tables and workflows.
//!
//! Constructed explicitly and handed around as `Arc<Session>`; nothing in
//! the crate reaches for a global. Uses `RwLock` so the many readers (every
//! request reads the token) never contend with each other.

use std::sync::{RwLock, RwLockReadGuard};

use crate::error::ClientError;
use crate::models::{AuthUser, Role};

pub struct Session {
    user: RwLock<Option<AuthUser>>,
}

impl Session {
    /// Create a signed-out session.
    pub fn new() -> Self {
        Self {
            user: RwLock::new(None),
        }
    }

    pub fn with_user(user: AuthUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    fn read(&self) -> Option<RwLockReadGuard<'_, Option<AuthUser>>> {
        match self.user.read() {
            Ok(guard) => Some(guard),
            Err(_) => {
                tracing::error!("Session lock poisoned");
                None
            }
        }
    }

    /// Set the signed-in user (login).
    pub fn set_user(&self, user: AuthUser) {
        match self.user.write() {
            Ok(mut guard) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Session started");
                *guard = Some(user);
            }
            Err(_) => tracing::error!("Session lock poisoned, login not recorded"),
        }
    }

    /// Drop the signed-in user (logout).
    pub fn clear(&self) {
        match self.user.write() {
            Ok(mut guard) => {
                *guard = None;
                tracing::info!("Session cleared");
            }
            Err(_) => tracing::error!("Session lock poisoned, logout not recorded"),
        }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.read().and_then(|guard| guard.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.read().and_then(|guard| guard.as_ref().map(|u| u.role))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_ok()
    }

    /// Bearer token for the next request.
    pub fn token(&self) -> Result<String, ClientError> {
        self.read()
            .and_then(|guard| guard.as_ref().map(|u| u.token.clone()))
            .filter(|t| !t.trim().is_empty())
            .ok_or(ClientError::NotAuthenticated)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn test_user(role: Role, token: &str) -> AuthUser {
    AuthUser {
        id: format!("{}-1", role.as_str()),
        name: "Ada Obi".into(),
        email: "ada@example.org".into(),
        phone: Some("08030000000".into()),
        role,
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn new_session_has_no_token() {
        let session = Session::new();
        assert!(matches!(session.token(), Err(ClientError::NotAuthenticated)));
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn set_and_clear_user() {
        let session = Session::new();
        session.set_user(test_user(Role::Doctor, "tok"));
        assert_eq!(session.token().unwrap(), "tok");
        assert_eq!(session.role(), Some(Role::Doctor));

        session.clear();
        assert!(session.current_user().is_none());
        assert!(session.token().is_err());
    }

    #[test]
    fn clear_on_poisoned_lock_logs_error() {
        let session = Arc::new(Session::with_user(test_user(Role::Admin, "tok")));
        let holder = session.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.user.write().unwrap();
            panic!("poison session lock");
        })
        .join();

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || session.clear());

        let text = log.text();
        assert!(text.contains("ERROR"), "{text}");
        assert!(text.contains("logout not recorded"), "{text}");
        assert!(!text.contains("Session cleared"), "{text}");
    }

    #[test]
    fn blank_token_counts_as_signed_out() {
        let session = Session::with_user(test_user(Role::Patient, "   "));
        assert!(session.current_user().is_some());
        assert!(matches!(session.token(), Err(ClientError::NotAuthenticated)));
    }
}
