//! Client configuration: endpoint, credentials, timeout and default wallet.
//!
//! A [`RpcConfig`] is assembled once by a builder and never mutated
//! afterwards; every call reads it through a shared `Arc`.

use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;
use crate::protocol::RequestId;

pub const DEFAULT_URL: &str = "http://localhost";
pub const DEFAULT_PORT: u16 = 8332;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
/// Id attached to every single (non-batch) call.
pub const DEFAULT_REQUEST_ID: &str = "rpc-bitcoin";

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) auth: Option<(String, String)>,
    pub(crate) wallet: Option<String>,
    pub(crate) request_id: RequestId,
}

impl RpcConfig {
    /// `<url>:<port>`, the prefix every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user(&self) -> Option<&str> {
        self.auth.as_ref().map(|(user, _)| user.as_str())
    }

    pub fn wallet(&self) -> Option<&str> {
        self.wallet.as_deref()
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            base_url: format!("{DEFAULT_URL}:{DEFAULT_PORT}"),
            timeout: DEFAULT_TIMEOUT,
            auth: None,
            wallet: None,
            request_id: RequestId::from(DEFAULT_REQUEST_ID),
        }
    }
}

/// Basic-auth credentials for the daemon: an explicit password (the user
/// defaults to empty), else the `.cookie` file, else none.
pub(crate) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
    cookie_file: Option<&Path>,
) -> Result<Option<(String, String)>, ClientError> {
    if let Some(pass) = pass {
        return Ok(Some((user.unwrap_or_default().to_owned(), pass.to_owned())));
    }
    if user.is_some() {
        return Err(ClientError::Config(
            "rpc user is set but rpc pass is missing".to_owned(),
        ));
    }
    cookie_file.map(read_cookie).transpose()
}

/// Bitcoin Core writes `__cookie__:<token>` to `<datadir>/.cookie` while it
/// runs.
fn read_cookie(path: &Path) -> Result<(String, String), ClientError> {
    let cookie_error =
        |reason: String| ClientError::Config(format!("cookie file {}: {reason}", path.display()));

    let contents = std::fs::read_to_string(path).map_err(|e| cookie_error(e.to_string()))?;
    match contents.trim_end().split_once(':') {
        Some((user, token)) if !user.is_empty() && !token.is_empty() => {
            Ok((user.to_owned(), token.to_owned()))
        }
        Some(_) => Err(cookie_error("empty user or token".to_owned())),
        None => Err(cookie_error("expected `user:token`".to_owned())),
    }
}

/// Join `url` and `port` into the base URL and check it is HTTP(S).
pub(crate) fn build_base_url(url: &str, port: u16) -> Result<String, ClientError> {
    let base = format!("{}:{port}", url.trim_end_matches('/'));
    let parsed = Url::parse(&base).map_err(|e| {
        ClientError::Config(format!(
            "invalid rpc url `{base}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(base),
        other => Err(ClientError::Config(format!(
            "unsupported rpc url scheme `{other}`; expected http or https"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    static COOKIE_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_cookie(contents: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time must be after unix epoch")
            .as_nanos();
        let seq = COOKIE_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("rpc-bitcoin-cookie-{unique}-{seq}.txt"));
        fs::write(&path, contents).expect("cookie file must be writable");
        path
    }

    #[test]
    fn defaults_point_at_local_mainnet_port() {
        let config = RpcConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8332");
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.request_id(), &RequestId::from("rpc-bitcoin"));
        assert!(config.wallet().is_none());
        assert!(config.user().is_none());
    }

    #[test]
    fn build_base_url_appends_port() {
        let base = build_base_url("http://www.example.com", 12345).expect("should parse");
        assert_eq!(base, "http://www.example.com:12345");
    }

    #[test]
    fn build_base_url_ignores_trailing_slash() {
        let base = build_base_url("https://node.local/", 8332).expect("should parse");
        assert_eq!(base, "https://node.local:8332");
    }

    #[test]
    fn build_base_url_rejects_other_schemes() {
        let err = build_base_url("ftp://example.com", 21).expect_err("must reject ftp");
        assert!(err.to_string().contains("unsupported rpc url scheme"));
    }

    #[test]
    fn resolve_auth_defaults_user_to_empty() {
        let auth = resolve_auth(None, Some("rpcpassword"), None).expect("auth must resolve");
        assert_eq!(auth, Some((String::new(), "rpcpassword".to_owned())));
    }

    #[test]
    fn resolve_auth_rejects_user_without_pass() {
        let err = resolve_auth(Some("alice"), None, None).expect_err("must reject partial auth");
        assert!(err.to_string().contains("rpc pass is missing"));
    }

    #[test]
    fn resolve_auth_prefers_explicit_credentials_over_cookie() {
        let cookie = temp_cookie("__cookie__:token\n");
        let auth = resolve_auth(Some("alice"), Some("secret"), Some(&cookie)).unwrap();
        assert_eq!(auth, Some(("alice".to_owned(), "secret".to_owned())));
        let _ = fs::remove_file(cookie);
    }

    #[test]
    fn resolve_auth_reads_cookie_file() {
        let cookie = temp_cookie("__cookie__:token\n");
        let auth = resolve_auth(None, None, Some(&cookie)).expect("cookie must parse");
        assert_eq!(auth, Some(("__cookie__".to_owned(), "token".to_owned())));
        let _ = fs::remove_file(cookie);
    }

    #[test]
    fn resolve_auth_rejects_malformed_cookie() {
        let cookie = temp_cookie("no-separator\n");
        let err = resolve_auth(None, None, Some(&cookie)).expect_err("must reject cookie");
        assert!(err.to_string().contains("expected `user:token`"));
        let _ = fs::remove_file(cookie);
    }

    #[test]
    fn resolve_auth_rejects_cookie_without_token() {
        let cookie = temp_cookie("__cookie__:\n");
        let err = resolve_auth(None, None, Some(&cookie)).expect_err("must reject cookie");
        assert!(matches!(err, ClientError::Config(ref msg) if msg.contains("empty user or token")));
        let _ = fs::remove_file(cookie);
    }

    #[test]
    fn resolve_auth_reports_missing_cookie_file() {
        let missing = std::env::temp_dir().join("rpc-bitcoin-no-such-cookie");
        let err = resolve_auth(None, None, Some(&missing)).expect_err("must fail to read");
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn resolve_auth_none_without_credentials() {
        assert_eq!(resolve_auth(None, None, None).unwrap(), None);
    }
}
