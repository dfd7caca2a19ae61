//! Session Store
//!
//! Who is signed in. Lifecycle is explicit: `init` once at startup,
//! `refresh` after a credential change, `clear` to drop it. Views read the
//! [`AuthSession`] snapshot that the app mirrors into its store.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::json;
use thiserror::Error;

use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::models::{CoderProfile, LoginResponse};
use crate::validation::{validate_login, validate_registration, FieldError, RegistrationForm};

const ME_PATH: &str = "/api/auth/me";
const LOGIN_PATH: &str = "/api/auth/login";
const GOOGLE_PATH: &str = "/api/auth/google";
const REGISTER_PATH: &str = "/api/auth/register";
const LOGOUT_PATH: &str = "/api/auth/logout";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Credential present, current user not yet confirmed
    Unknown,
    Authenticated(CoderProfile),
    Anonymous,
}

/// What views see
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthSession {
    pub coder: Option<CoderProfile>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthSession {
    pub fn is_admin(&self) -> bool {
        self.coder.as_ref().is_some_and(CoderProfile::is_admin)
    }
}

impl From<&SessionState> for AuthSession {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Unknown => Self {
                coder: None,
                is_authenticated: false,
                is_loading: true,
            },
            SessionState::Authenticated(coder) => Self {
                coder: Some(coder.clone()),
                is_authenticated: true,
                is_loading: false,
            },
            SessionState::Anonymous => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Full-page navigation, outside the router
pub trait Navigator {
    fn current_path(&self) -> String;
    /// Leave the current page for `path`
    fn redirect(&self, path: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|win| win.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn redirect(&self, path: &str) {
        if let Some(win) = web_sys::window() {
            if let Err(e) = win.location().set_href(path) {
                log::error!("[AUTH] redirect to {} failed: {:?}", path, e);
            }
        }
    }
}

type Listener = Rc<dyn Fn(&SessionState)>;

struct SessionInner {
    api: ApiClient,
    navigator: Rc<dyn Navigator>,
    google_client_id: Option<String>,
    state: RefCell<SessionState>,
    listeners: RefCell<Vec<Listener>>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    /// Creates the store and takes over the client's 401 handling
    pub fn new(api: ApiClient, navigator: Rc<dyn Navigator>, google_client_id: Option<String>) -> Self {
        let initial = if api.credentials().token().is_some() {
            SessionState::Unknown
        } else {
            SessionState::Anonymous
        };
        let store = Self {
            inner: Rc::new(SessionInner {
                api,
                navigator,
                google_client_id,
                state: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
            }),
        };

        let weak: Weak<SessionInner> = Rc::downgrade(&store.inner);
        store.inner.api.set_unauthorized_handler(move || {
            if let Some(inner) = weak.upgrade() {
                SessionStore { inner }.handle_unauthorized();
            }
        });
        store
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn snapshot(&self) -> AuthSession {
        AuthSession::from(&*self.inner.state.borrow())
    }

    pub fn google_enabled(&self) -> bool {
        self.inner.google_client_id.is_some()
    }

    pub fn google_client_id(&self) -> Option<&str> {
        self.inner.google_client_id.as_deref()
    }

    /// Called with the new state after every transition
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn set_state(&self, next: SessionState) {
        {
            let mut state = self.inner.state.borrow_mut();
            if *state == next {
                return;
            }
            *state = next.clone();
        }
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&next);
        }
    }

    // ========================
    // Lifecycle
    // ========================

    /// Resolve the session once at startup
    pub async fn init(&self) {
        if self.inner.api.credentials().token().is_none() {
            log::info!("[AUTH] no stored credential");
            self.set_state(SessionState::Anonymous);
            return;
        }
        self.refresh().await;
    }

    /// Ask the backend who the stored credential belongs to
    pub async fn refresh(&self) {
        self.set_state(SessionState::Unknown);
        match self.inner.api.send_json::<CoderProfile>(ApiRequest::get(ME_PATH)).await {
            Ok(coder) => {
                log::info!("[AUTH] signed in as {}", coder.coder_name);
                self.set_state(SessionState::Authenticated(coder));
            }
            Err(ApiError::Unauthorized) => {
                // credential already dropped by the 401 handler
                self.set_state(SessionState::Anonymous);
            }
            Err(e) => {
                log::warn!("[AUTH] could not load current user: {}", e);
                self.set_state(SessionState::Anonymous);
            }
        }
    }

    pub fn clear(&self) {
        self.inner.api.credentials().clear();
        self.set_state(SessionState::Anonymous);
    }

    // ========================
    // Sign-in / sign-out
    // ========================

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        validate_login(email, password).map_err(AuthError::Invalid)?;
        let body = json!({ "email": email.trim(), "password": password });
        self.exchange(ApiRequest::post(LOGIN_PATH, body)).await
    }

    /// Exchange a Google ID token for a session
    pub async fn login_with_google(&self, credential: &str) -> Result<(), AuthError> {
        if self.inner.google_client_id.is_none() {
            return Err(ApiError::Config("Google sign-in".to_string()).into());
        }
        let body = json!({ "credential": credential });
        self.exchange(ApiRequest::post(GOOGLE_PATH, body)).await
    }

    /// Create an account; the caller signs in afterwards
    pub async fn register(&self, form: &RegistrationForm) -> Result<(), AuthError> {
        validate_registration(form).map_err(AuthError::Invalid)?;
        let body = json!({
            "coderName": form.coder_name.trim(),
            "email": form.email.trim(),
            "password": form.password,
        });
        self.inner.api.send(ApiRequest::post(REGISTER_PATH, body).anonymous()).await?;
        log::info!("[AUTH] registered {}", form.email.trim());
        Ok(())
    }

    async fn exchange(&self, request: ApiRequest) -> Result<(), AuthError> {
        let response: LoginResponse = self.inner.api.send_json(request.anonymous()).await?;
        self.inner.api.credentials().store(&response.token);
        self.refresh().await;
        Ok(())
    }

    /// Sign out and reload the app at `/`
    pub async fn logout(&self) {
        let token = self.inner.api.credentials().token();
        self.clear();
        if let Some(token) = token {
            let mut request = ApiRequest::post(LOGOUT_PATH, json!({}));
            request.bearer = Some(token);
            if let Err(e) = self.inner.api.send(request).await {
                log::debug!("[AUTH] logout call failed: {}", e);
            }
        }
        self.inner.navigator.redirect("/");
    }

    /// An authenticated call came back 401
    fn handle_unauthorized(&self) {
        if self.state() == SessionState::Anonymous && self.inner.api.credentials().token().is_none() {
            return;
        }
        log::warn!("[AUTH] credential rejected, signing out");
        self.clear();
        if self.inner.navigator.current_path() != "/" {
            self.inner.navigator.redirect("/");
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::Navigator;
    use std::cell::RefCell;

    pub struct RecordingNavigator {
        pub path: RefCell<String>,
        pub redirects: RefCell<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn at(path: &str) -> Self {
            Self {
                path: RefCell::new(path.to_string()),
                redirects: RefCell::new(Vec::new()),
            }
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.path.borrow().clone()
        }

        fn redirect(&self, path: &str) {
            self.redirects.borrow_mut().push(path.to_string());
            *self.path.borrow_mut() = path.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNavigator;
    use super::*;
    use crate::api::testing::*;
    use crate::api::Method;
    use crate::credentials::{CredentialStore, MemoryCredentials};
    use crate::validation::ValidationError;
    use serde_json::Value;

    fn me() -> Value {
        json!({ "coderID": 1, "coderName": "an", "role": "admin" })
    }

    fn session(
        transport: Rc<MockTransport>,
        credentials: MemoryCredentials,
        path: &str,
        google: Option<&str>,
    ) -> (SessionStore, Harness, Rc<RecordingNavigator>) {
        let h = harness(transport, credentials);
        let navigator = Rc::new(RecordingNavigator::at(path));
        let store = SessionStore::new(h.client.clone(), navigator.clone(), google.map(str::to_string));
        (store, h, navigator)
    }

    #[tokio::test]
    async fn test_no_credential_is_anonymous_without_network() {
        let transport = MockTransport::new(|_| respond(200, me()));
        let (store, _, _) = session(transport.clone(), MemoryCredentials::default(), "/", None);

        store.init().await;
        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(!snapshot.is_loading);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stored_credential_resolves_current_user() {
        let transport = MockTransport::new(|request| {
            assert_eq!(request.bearer.as_deref(), Some("tok"));
            respond(200, me())
        });
        let (store, _, _) = session(transport.clone(), MemoryCredentials::with_token("tok"), "/", None);
        assert!(store.snapshot().is_loading);

        store.init().await;
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated);
        assert!(snapshot.is_admin());
        assert_eq!(transport.calls(), vec!["GET http://api.test/api/auth/me"]);
    }

    #[tokio::test]
    async fn test_expired_credential_signs_out_and_redirects() {
        let transport = MockTransport::new(|_| respond(401, json!({})));
        let (store, h, navigator) =
            session(transport, MemoryCredentials::with_token("expired"), "/admin/courses", None);

        store.init().await;
        assert_eq!(store.state(), SessionState::Anonymous);
        assert_eq!(h.credentials.token(), None);
        assert_eq!(*navigator.redirects.borrow(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn test_401_at_root_does_not_redirect() {
        let transport = MockTransport::new(|_| respond(401, json!({})));
        let (store, _, navigator) = session(transport, MemoryCredentials::with_token("expired"), "/", None);

        store.init().await;
        assert_eq!(store.state(), SessionState::Anonymous);
        assert!(navigator.redirects.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_credential() {
        let transport = MockTransport::new(|_| Err(ApiError::Network("offline".into())));
        let (store, h, _) = session(transport, MemoryCredentials::with_token("tok"), "/", None);

        store.init().await;
        assert_eq!(store.state(), SessionState::Anonymous);
        assert_eq!(h.credentials.token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_invalid_login_sends_nothing() {
        let transport = MockTransport::new(|_| respond(200, json!({})));
        let (store, _, _) = session(transport.clone(), MemoryCredentials::default(), "/login", None);

        let err = store.login("not-an-email", "").await.unwrap_err();
        match err {
            AuthError::Invalid(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].error, ValidationError::InvalidEmail);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_stores_token_and_refreshes() {
        let transport = MockTransport::new(|request| match request.path.as_str() {
            LOGIN_PATH => {
                assert!(request.bearer.is_none());
                respond(200, json!({ "token": "fresh" }))
            }
            ME_PATH => {
                assert_eq!(request.bearer.as_deref(), Some("fresh"));
                respond(200, me())
            }
            _ => respond(404, json!({})),
        });
        let (store, h, _) = session(transport.clone(), MemoryCredentials::default(), "/login", None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |state| sink.borrow_mut().push(state.clone()));

        store.login("an@ntu.edu.vn", "secret").await.unwrap();
        assert_eq!(h.credentials.token().as_deref(), Some("fresh"));
        assert!(store.snapshot().is_authenticated);
        assert_eq!(seen.borrow()[0], SessionState::Unknown);
        assert!(matches!(seen.borrow()[1], SessionState::Authenticated(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_does_not_redirect() {
        let transport = MockTransport::new(|_| respond(401, json!({ "message": "Wrong email or password" })));
        let (store, _, navigator) = session(transport, MemoryCredentials::default(), "/login", None);

        let err = store.login("an@ntu.edu.vn", "nope").await.unwrap_err();
        assert_eq!(err, AuthError::Api(ApiError::Unauthorized));
        assert!(navigator.redirects.borrow().is_empty());
        assert_eq!(store.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_google_login_needs_client_id() {
        let transport = MockTransport::new(|_| respond(200, json!({ "token": "g" })));
        let (store, _, _) = session(transport.clone(), MemoryCredentials::default(), "/login", None);

        let err = store.login_with_google("id-token").await.unwrap_err();
        assert!(matches!(err, AuthError::Api(ApiError::Config(_))));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_google_login_exchanges_credential() {
        let transport = MockTransport::new(|request| match request.path.as_str() {
            GOOGLE_PATH => {
                assert_eq!(request.body, Some(json!({ "credential": "id-token" })));
                respond(200, json!({ "token": "g" }))
            }
            _ => respond(200, me()),
        });
        let (store, h, _) = session(transport, MemoryCredentials::default(), "/login", Some("client.apps"));

        store.login_with_google("id-token").await.unwrap();
        assert_eq!(h.credentials.token().as_deref(), Some("g"));
        assert!(store.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_and_reloads_root() {
        let transport = MockTransport::new(|request| match request.method {
            Method::Post => {
                assert_eq!(request.bearer.as_deref(), Some("tok"));
                respond(401, json!({}))
            }
            _ => respond(200, me()),
        });
        let (store, h, navigator) = session(transport, MemoryCredentials::with_token("tok"), "/courses", None);
        store.init().await;

        store.logout().await;
        assert_eq!(store.state(), SessionState::Anonymous);
        assert_eq!(h.credentials.token(), None);
        assert_eq!(*navigator.redirects.borrow(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn test_register_validates_before_sending() {
        let transport = MockTransport::new(|_| respond(201, json!({})));
        let (store, _, _) = session(transport.clone(), MemoryCredentials::default(), "/register", None);

        let mut form = RegistrationForm {
            coder_name: "an".into(),
            email: "an@ntu.edu.vn".into(),
            password: "weak".into(),
            confirm_password: "weak".into(),
        };
        assert!(matches!(store.register(&form).await, Err(AuthError::Invalid(_))));
        assert_eq!(transport.call_count(), 0);

        form.password = "Str0ng!pass".into();
        form.confirm_password = "Str0ng!pass".into();
        store.register(&form).await.unwrap();
        assert_eq!(transport.calls(), vec!["POST http://api.test/api/auth/register"]);
    }
}
