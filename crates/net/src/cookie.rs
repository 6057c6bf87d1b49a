//! `Set-Cookie` parsing (RFC 6265 subset)
//!
//! Only what is needed to pick a cookie out of a response: the name/value
//! pair, domain and path scoping against an origin, expiry and flags.
//! Unknown attributes are kept verbatim.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Host and request path cookies are scoped against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOrigin {
    host: String,
    path: String,
}

impl CookieOrigin {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into().to_ascii_lowercase(),
            path: path.into(),
        }
    }

    /// Origin of the developer portal, where the download cookie is scoped
    #[must_use]
    pub fn developer_portal() -> Self {
        Self::new("developer.apple.com", "/")
    }
}

/// One parsed cookie
#[derive(Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    /// No `Domain` attribute: only sent back to the exact origin host
    pub host_only: bool,
    pub path: String,
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<String>,
    /// Attributes not understood above, in header order
    pub attributes: Vec<(String, String)>,
}

impl Cookie {
    /// Whether the cookie had already expired at `now`
    ///
    /// `Max-Age` wins over `Expires`; a non-positive `Max-Age` means expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, received_at: DateTime<Utc>) -> bool {
        if let Some(max_age) = self.max_age {
            if max_age <= 0 {
                return true;
            }
            return chrono::TimeDelta::try_seconds(max_age)
                .and_then(|lifetime| received_at.checked_add_signed(lifetime))
                .is_some_and(|deadline| deadline <= now);
        }
        self.expires.is_some_and(|expires| expires <= now)
    }
}

// Cookie values are credentials; keep them out of logs
impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("domain", &self.domain)
            .field("host_only", &self.host_only)
            .field("path", &self.path)
            .field("expires", &self.expires)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Parse every live cookie out of a set of `Set-Cookie` header values
///
/// Each value may itself be several cookies folded with commas. Cookies
/// that fail to parse, fall outside `origin`, or are already expired at
/// `received_at` are dropped.
pub fn parse_set_cookie_headers<'a, I>(
    values: I,
    origin: &CookieOrigin,
    received_at: DateTime<Utc>,
) -> Vec<Cookie>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .flat_map(split_set_cookie)
        .filter_map(|raw| parse_set_cookie(raw, origin))
        .filter(|cookie| !cookie.is_expired_at(received_at, received_at))
        .collect()
}

/// Split a folded header value into individual cookie strings
///
/// A comma only separates cookies when the text after it opens a new
/// `name=` pair, so commas inside `Expires` dates survive.
#[must_use]
pub fn split_set_cookie(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes && starts_new_cookie(&value[i + 1..]) => {
                parts.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Parse a single `Set-Cookie` string scoped against `origin`
///
/// Returns `None` for a missing `=`, an empty name, or a `Domain` the
/// origin host does not domain-match. A single-label `Domain` such as
/// `com` only matches a host of exactly that name.
#[must_use]
pub fn parse_set_cookie(raw: &str, origin: &CookieOrigin) -> Option<Cookie> {
    let mut parts = split_outside_quotes(raw, ';').into_iter();
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie {
        name: name.to_string(),
        value: unquote(value.trim()).to_string(),
        domain: origin.host.clone(),
        host_only: true,
        path: default_path(&origin.path),
        expires: None,
        max_age: None,
        secure: false,
        http_only: false,
        same_site: None,
        attributes: Vec::new(),
    };

    for part in parts {
        let (key, value) = match part.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (part.trim(), ""),
        };
        if key.is_empty() {
            continue;
        }

        match key.to_ascii_lowercase().as_str() {
            "domain" => {
                let domain = value.trim_start_matches('.').to_ascii_lowercase();
                if domain.is_empty() {
                    continue;
                }
                if !domain_matches(&origin.host, &domain)
                    || (!domain.contains('.') && domain != origin.host)
                {
                    return None;
                }
                cookie.domain = domain;
                cookie.host_only = false;
            }
            "path" => {
                if value.starts_with('/') {
                    cookie.path = value.to_string();
                }
            }
            "expires" => {
                if let Some(expires) = parse_cookie_date(value) {
                    cookie.expires = Some(expires);
                }
            }
            "max-age" => {
                if let Ok(seconds) = value.parse::<i64>() {
                    cookie.max_age = Some(seconds);
                }
            }
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "samesite" => cookie.same_site = Some(value.to_string()),
            _ => cookie.attributes.push((key.to_string(), value.to_string())),
        }
    }

    Some(cookie)
}

/// RFC 6265 §5.1.3
fn domain_matches(host: &str, domain: &str) -> bool {
    if host == domain {
        return true;
    }
    let is_ip = host.parse::<std::net::IpAddr>().is_ok();
    !is_ip
        && host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

/// RFC 6265 §5.1.4
fn default_path(request_path: &str) -> String {
    if !request_path.starts_with('/') {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => request_path[..idx].to_string(),
    }
}

fn starts_new_cookie(rest: &str) -> bool {
    let rest = rest.trim_start();
    match rest.find('=') {
        Some(eq) if eq > 0 => {
            !rest[..eq].contains(|c: char| c == ';' || c == ',' || c.is_whitespace())
        }
        _ => false,
    }
}

fn split_outside_quotes(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, ch) in value.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == separator && !in_quotes {
            parts.push(&value[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// RFC 1123 dates, plus the dashed `Wed, 21-Oct-2015 07:28:00 GMT` variant
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> CookieOrigin {
        CookieOrigin::developer_portal()
    }

    #[test]
    fn test_parse_full_cookie() {
        let raw = "ADCDownloadAuth=abc123;Version=1;Comment=;Domain=apple.com;Path=/;Max-Age=108000;HttpOnly;Secure;Expires=Sun, 24 Mar 2024 02:45:00 GMT";
        let cookie = parse_set_cookie(raw, &origin()).unwrap();

        assert_eq!(cookie.name, "ADCDownloadAuth");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "apple.com");
        assert!(!cookie.host_only);
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.max_age, Some(108_000));
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(
            cookie.expires.unwrap().to_rfc3339(),
            "2024-03-24T02:45:00+00:00"
        );
        assert_eq!(
            cookie.attributes,
            vec![
                ("Version".to_string(), "1".to_string()),
                ("Comment".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_host_only_default() {
        let cookie = parse_set_cookie("a=b", &origin()).unwrap();
        assert_eq!(cookie.domain, "developer.apple.com");
        assert!(cookie.host_only);
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_foreign_domain_rejected() {
        assert!(parse_set_cookie("a=b; Domain=example.com", &origin()).is_none());
        assert!(parse_set_cookie("a=b; Domain=le.com", &origin()).is_none());
        assert!(parse_set_cookie("a=b; Domain=.apple.com", &origin()).is_some());
    }

    #[test]
    fn test_top_level_domain_rejected() {
        assert!(parse_set_cookie("a=b; Domain=com", &origin()).is_none());
        assert!(parse_set_cookie("a=b; Domain=.com", &origin()).is_none());

        let local = CookieOrigin::new("localhost", "/");
        let cookie = parse_set_cookie("a=b; Domain=localhost", &local).unwrap();
        assert_eq!(cookie.domain, "localhost");
    }

    #[test]
    fn test_malformed_pairs_rejected() {
        assert!(parse_set_cookie("novalue", &origin()).is_none());
        assert!(parse_set_cookie("=value", &origin()).is_none());
    }

    #[test]
    fn test_quoted_value_keeps_semicolon() {
        let cookie = parse_set_cookie(r#"a="x;y"; Path=/download"#, &origin()).unwrap();
        assert_eq!(cookie.value, "x;y");
        assert_eq!(cookie.path, "/download");
    }

    #[test]
    fn test_relative_path_ignored() {
        let cookie = parse_set_cookie("a=b; Path=download", &origin()).unwrap();
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_default_path() {
        assert_eq!(default_path(""), "/");
        assert_eq!(default_path("/"), "/");
        assert_eq!(default_path("/services"), "/");
        assert_eq!(default_path("/services/download"), "/services");
    }

    #[test]
    fn test_split_keeps_expires_commas() {
        let value = "a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/, b=2; Path=/";
        assert_eq!(
            split_set_cookie(value),
            vec!["a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/", "b=2; Path=/"]
        );
    }

    #[test]
    fn test_split_single_cookie_with_comma_value() {
        assert_eq!(split_set_cookie("a=x,y; Path=/"), vec!["a=x,y; Path=/"]);
    }

    #[test]
    fn test_dashed_expires() {
        let cookie =
            parse_set_cookie("a=b; Expires=Wed, 21-Oct-2015 07:28:00 GMT", &origin()).unwrap();
        assert_eq!(
            cookie.expires.unwrap().to_rfc3339(),
            "2015-10-21T07:28:00+00:00"
        );
    }

    #[test]
    fn test_expiry() {
        let received = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = received + chrono::Duration::seconds(10);

        let cookie = parse_set_cookie("a=b; Max-Age=5", &origin()).unwrap();
        assert!(cookie.is_expired_at(later, received));

        let cookie = parse_set_cookie("a=b; Max-Age=60", &origin()).unwrap();
        assert!(!cookie.is_expired_at(later, received));

        let cookie = parse_set_cookie("a=b; Max-Age=0", &origin()).unwrap();
        assert!(cookie.is_expired_at(received, received));
    }

    #[test]
    fn test_expired_cookies_dropped() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let cookies = parse_set_cookie_headers(
            [
                "gone=deleted; Max-Age=0",
                "old=1; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
                "stale=1; Max-Age=-1; Expires=Wed, 21 Oct 2099 07:28:00 GMT",
                "fresh=1; Max-Age=60; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
                "later=1; Expires=Wed, 21 Oct 2099 07:28:00 GMT",
                "session=1",
            ],
            &origin(),
            now,
        );
        let names: Vec<&str> = cookies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["fresh", "later", "session"]);
    }

    #[test]
    fn test_debug_redacts_value() {
        let cookie = parse_set_cookie("ADCDownloadAuth=s3cr3t", &origin()).unwrap();
        assert!(!format!("{cookie:?}").contains("s3cr3t"));
    }
}
