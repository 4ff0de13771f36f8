use reqwest::StatusCode;

use super::HookError;
use crate::{
    AppContext,
    capability::MenuItem,
    state::{AuthState, Session},
};

/// Hook over the logged in session.
pub struct SessionHook<'a> {
    ctx: &'a AppContext,
}

pub fn use_session(ctx: &AppContext) -> SessionHook<'_> {
    SessionHook { ctx }
}

impl SessionHook<'_> {
    pub fn session(&self) -> Option<Session> {
        self.ctx.state().session().cloned()
    }

    /// Menu for the current session; empty when logged out.
    pub fn menu(&self) -> &'static [MenuItem] {
        self.ctx
            .state()
            .capability()
            .map(|capability| capability.menu())
            .unwrap_or_default()
    }

    /// Fetch the profile for the configured credentials and resolve the
    /// session from it. An unauthorized response logs the client out.
    #[tracing::instrument(skip(self))]
    pub async fn load_profile(&self) -> Result<Session, HookError> {
        match self.ctx.client().user_profile().await {
            Ok(profile) => {
                let session = Session::resolve(profile);
                tracing::info!(
                    user_id = %session.profile.id,
                    role = %session.profile.role,
                    "session resolved"
                );
                let logged_in = session.clone();
                self.ctx.dispatch().reduce_mut(move |state| {
                    state.auth_state = AuthState::LoggedIn(logged_in);
                });
                Ok(session)
            }
            Err(e) => {
                if e.status() == Some(StatusCode::UNAUTHORIZED) {
                    self.logout();
                }
                tracing::warn!("failed to load profile: {e}");
                Err(e.into())
            }
        }
    }

    /// Forget the session and every cached entity.
    pub fn logout(&self) {
        self.ctx.dispatch().reduce_mut(|state| state.logout());
    }
}
