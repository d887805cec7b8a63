//! HTTP Basic authentication and role checks.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use metrics::counter;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use hr_records_util::AppConfig;

use crate::problem::ProblemResponse;
use crate::router::AppState;

const REALM_CHALLENGE: &str = "Basic realm=\"hr-records\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

/// Authenticated caller attached to the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Source of truth for usernames, passwords and their role claims.
pub trait CredentialStore: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<Principal>;
}

struct StaticAccount {
    username: String,
    password: String,
    roles: Vec<Role>,
}

/// In-memory credential store seeded from configuration.
#[derive(Default)]
pub struct StaticCredentialStore {
    accounts: Vec<StaticAccount>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        self.accounts.push(StaticAccount {
            username: username.into(),
            password: password.into(),
            roles,
        });
        self
    }

    /// Builds the default administrative and standard accounts.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_account(
                config.admin_account.username.clone(),
                config.admin_account.password.clone(),
                vec![Role::Admin],
            )
            .with_account(
                config.user_account.username.clone(),
                config.user_account.password.clone(),
                vec![Role::User],
            )
    }
}

impl CredentialStore for StaticCredentialStore {
    /// Compares against every account so the time taken does not reveal
    /// whether the username exists.
    fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        let mut matched = None;
        for account in &self.accounts {
            let username_ok = account.username.as_bytes().ct_eq(username.as_bytes());
            let password_ok = account.password.as_bytes().ct_eq(password.as_bytes());
            if bool::from(username_ok & password_ok) {
                matched = Some(account);
            }
        }
        matched.map(|account| Principal {
            username: account.username.clone(),
            roles: account.roles.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthFailure {
    MissingHeader,
    MalformedHeader,
    BadCredentials,
}

impl AuthFailure {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_credentials",
            Self::MalformedHeader => "malformed_credentials",
            Self::BadCredentials => "bad_credentials",
        }
    }
}

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedHeader)?;
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthFailure::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthFailure::MalformedHeader);
    }
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthFailure::MalformedHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::MalformedHeader)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthFailure::MalformedHeader)?;
    Ok((username.to_string(), password.to_string()))
}

/// Rejects requests without valid Basic credentials and stores the [`Principal`] otherwise.
pub async fn require_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = basic_credentials(request.headers()).and_then(|(username, password)| {
        state
            .credentials()
            .authenticate(&username, &password)
            .ok_or(AuthFailure::BadCredentials)
    });

    match outcome {
        Ok(principal) => {
            debug!(stage = "auth", username = %principal.username, "request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(failure) => {
            counter!("auth_failures_total", "reason" => failure.as_str()).increment(1);
            warn!(
                stage = "auth",
                reason = failure.as_str(),
                path = %request.uri().path(),
                "authentication failed"
            );
            unauthorized()
        }
    }
}

/// Allows the request through only when the authenticated principal holds [`Role::Admin`].
pub async fn require_admin(request: Request, next: Next) -> Response {
    let principal = request.extensions().get::<Principal>();
    if principal.is_some_and(|principal| principal.has_role(Role::Admin)) {
        return next.run(request).await;
    }

    counter!("auth_failures_total", "reason" => "forbidden").increment(1);
    warn!(
        stage = "auth",
        username = principal.map(|p| p.username.as_str()).unwrap_or("anonymous"),
        required = Role::Admin.as_str(),
        "role check failed"
    );
    ProblemResponse::new(
        StatusCode::FORBIDDEN,
        "forbidden",
        "administrative role required",
    )
    .into_response()
}

fn unauthorized() -> Response {
    let mut response = ProblemResponse::new(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "valid credentials are required",
    )
    .into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static(REALM_CHALLENGE),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StaticCredentialStore {
        StaticCredentialStore::new()
            .with_account("admin", "admin", vec![Role::Admin])
            .with_account("user", "user", vec![Role::User])
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("header value"),
        );
        headers
    }

    #[test]
    fn authenticates_known_accounts_with_roles() {
        let principal = store().authenticate("admin", "admin").expect("admin");
        assert!(principal.has_role(Role::Admin));
        assert!(!principal.has_role(Role::User));

        let principal = store().authenticate("user", "user").expect("user");
        assert_eq!(principal.roles, vec![Role::User]);
    }

    #[test]
    fn rejects_wrong_password_and_unknown_user() {
        assert!(store().authenticate("admin", "user").is_none());
        assert!(store().authenticate("admin", "admin2").is_none());
        assert!(store().authenticate("ghost", "admin").is_none());
    }

    #[test]
    fn usernames_must_match_exactly() {
        assert!(store().authenticate("admin ", "admin").is_none());
        assert!(store().authenticate("Admin", "admin").is_none());
        assert!(store().authenticate("", "").is_none());
    }

    #[test]
    fn shared_passwords_resolve_to_the_named_account() {
        let store = StaticCredentialStore::new()
            .with_account("alice", "same", vec![Role::Admin])
            .with_account("bob", "same", vec![Role::User]);

        let bob = store.authenticate("bob", "same").expect("bob");
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.roles, vec![Role::User]);
        let alice = store.authenticate("alice", "same").expect("alice");
        assert_eq!(alice.roles, vec![Role::Admin]);
    }

    #[test]
    fn decodes_basic_header() {
        let encoded = STANDARD.encode("user:pa:ss");
        let headers = headers_with(&format!("Basic {encoded}"));
        let (username, password) = basic_credentials(&headers).expect("credentials");
        assert_eq!(username, "user");
        assert_eq!(password, "pa:ss");
    }

    #[test]
    fn classifies_header_failures() {
        assert_eq!(
            basic_credentials(&HeaderMap::new()),
            Err(AuthFailure::MissingHeader)
        );
        assert_eq!(
            basic_credentials(&headers_with("Bearer abc")),
            Err(AuthFailure::MalformedHeader)
        );
        assert_eq!(
            basic_credentials(&headers_with("Basic !!!")),
            Err(AuthFailure::MalformedHeader)
        );
        let no_colon = STANDARD.encode("useronly");
        assert_eq!(
            basic_credentials(&headers_with(&format!("Basic {no_colon}"))),
            Err(AuthFailure::MalformedHeader)
        );
    }
}
