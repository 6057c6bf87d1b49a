//! Download authorization handshake

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::StatusCode;
use tracing::{debug, warn};
use xcfetch_errors::{AuthError, Error};
use xcfetch_types::{AuthSession, Package, DOWNLOAD_AUTH_COOKIE};

use crate::client::{HttpClient, HttpRequest};
use crate::cookie::{parse_set_cookie_headers, CookieOrigin};
use crate::urls::authentication_url;

/// Isolates the `ADCDownloadAuth` cookie from an authentication response
#[derive(Debug, Clone)]
pub struct AuthCookieExtractor {
    origin: CookieOrigin,
}

impl Default for AuthCookieExtractor {
    fn default() -> Self {
        Self::new(CookieOrigin::developer_portal())
    }
}

impl AuthCookieExtractor {
    #[must_use]
    pub fn new(origin: CookieOrigin) -> Self {
        Self { origin }
    }

    /// Pull the session out of the response's `Set-Cookie` headers
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoCookie`] when there is no `Set-Cookie` header,
    /// or when zero or several live `ADCDownloadAuth` cookies parse out of
    /// it, or when the one found has an empty value.
    pub fn extract(&self, headers: &HeaderMap) -> Result<AuthSession, Error> {
        self.extract_at(headers, Utc::now())
    }

    /// [`extract`](Self::extract) for a response received at `received_at`
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract).
    pub fn extract_at(
        &self,
        headers: &HeaderMap,
        received_at: DateTime<Utc>,
    ) -> Result<AuthSession, Error> {
        let values: Vec<String> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            debug!("Authentication response carried no Set-Cookie header");
            return Err(AuthError::NoCookie.into());
        }

        let cookies = parse_set_cookie_headers(
            values.iter().map(String::as_str),
            &self.origin,
            received_at,
        );
        let mut matching = cookies
            .into_iter()
            .filter(|cookie| cookie.name == DOWNLOAD_AUTH_COOKIE);

        match (matching.next(), matching.next()) {
            (Some(cookie), None) if cookie.value.is_empty() => {
                debug!("{DOWNLOAD_AUTH_COOKIE} cookie in authentication response is empty");
                Err(AuthError::NoCookie.into())
            }
            (Some(cookie), None) => Ok(AuthSession::new(cookie.value)),
            (None, _) => {
                debug!("No {DOWNLOAD_AUTH_COOKIE} cookie in authentication response");
                Err(AuthError::NoCookie.into())
            }
            (Some(_), Some(_)) => {
                warn!("Several {DOWNLOAD_AUTH_COOKIE} cookies in authentication response");
                Err(AuthError::NoCookie.into())
            }
        }
    }
}

/// Ask the authentication service for a download session
///
/// `session_cookie` is the raw `Cookie` header of a signed-in developer
/// session, forwarded as-is.
///
/// # Errors
///
/// Transport errors pass through unchanged. A response without exactly one
/// download cookie fails with [`AuthError::NoCookie`], or with
/// [`AuthError::SessionRejected`] when the service answered 401/403.
pub async fn authenticate<C>(
    client: &C,
    package: &Package,
    session_cookie: Option<&str>,
) -> Result<AuthSession, Error>
where
    C: HttpClient + ?Sized,
{
    let url = authentication_url(package)?;
    debug!(url = %url, package = %package, "Requesting download authorization");

    let mut request = HttpRequest::get(url);
    if let Some(cookie) = session_cookie {
        request = request.with_cookie(cookie);
    }

    let response = client.send(request).await?;
    let status = response.status();

    match AuthCookieExtractor::default().extract(response.headers()) {
        Ok(session) => {
            debug!(status = status.as_u16(), "Download authorization granted");
            Ok(session)
        }
        Err(_) if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            Err(AuthError::SessionRejected {
                status: status.as_u16(),
            }
            .into())
        }
        Err(e) => Err(e),
    }
}
