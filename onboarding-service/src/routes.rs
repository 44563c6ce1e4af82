//! Route policy shared with the host routing layer.

/// Email/password signup. The only path the signup abuse policy inspects.
pub const SIGN_UP_EMAIL_PATH: &str = "/sign-up/email";

/// Email/password sign-in.
pub const SIGN_IN_EMAIL_PATH: &str = "/sign-in/email";

/// Privileged account creation, allowed to carry explicit organization fields.
pub const ADMIN_CREATE_USER_PATH: &str = "/admin/create-user";

pub const SIGN_IN_PAGE: &str = "/sign-in";

/// Exact paths reachable without a session.
const PUBLIC_PATHS: &[&str] = &["/", SIGN_IN_PAGE, "/sign-up", "/health"];

/// Path prefixes reachable without a session.
const PUBLIC_PREFIXES: &[&str] = &["/api/auth/"];

/// Signup paths the decision evaluator applies to.
const MONITORED_SIGNUP_PATHS: &[&str] = &[SIGN_UP_EMAIL_PATH];

/// Paths that carry a dedicated rate-limit rule.
pub const RATE_LIMITED_PATHS: &[&str] = &[SIGN_UP_EMAIL_PATH, SIGN_IN_EMAIL_PATH];

pub fn is_public_route(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn is_monitored_signup_path(path: &str) -> bool {
    MONITORED_SIGNUP_PATHS.contains(&path)
}

pub fn is_rate_limited_path(path: &str) -> bool {
    RATE_LIMITED_PATHS.contains(&path)
}

/// Build the sign-in redirect for an unauthenticated request, carrying the
/// original location (path plus query string) percent-encoded in `redirectTo`.
///
/// `search` is the raw query string including its leading `?`, or empty.
pub fn sign_in_redirect_url(pathname: &str, search: &str) -> String {
    let original = format!("{}{}", pathname, search);
    format!(
        "{}?redirectTo={}",
        SIGN_IN_PAGE,
        urlencoding::encode(&original)
    )
}
