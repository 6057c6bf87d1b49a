//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use url::Url;
    use xcfetch_errors::{AuthError, Error, NetworkError};
    use xcfetch_net::*;
    use xcfetch_types::{AuthSession, Package};

    const XCODE_PATH: &str = "/Developer_Tools/Xcode_15/Xcode_15.xip";

    /// Sends every request to the mock server, keeping path and query
    struct RedirectingClient {
        inner: NetClient,
        base: Url,
    }

    impl RedirectingClient {
        fn new(server: &MockServer) -> Self {
            Self {
                inner: NetClient::with_defaults().unwrap(),
                base: parse_url(&server.base_url()).unwrap(),
            }
        }
    }

    #[async_trait]
    impl HttpClient for RedirectingClient {
        async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
            request.url.set_scheme(self.base.scheme()).unwrap();
            request.url.set_host(self.base.host_str()).unwrap();
            request.url.set_port(self.base.port()).unwrap();
            self.inner.send(request).await
        }
    }

    #[tokio::test]
    async fn test_download_to_file() {
        let server = MockServer::start();
        let content = b"xip archive bytes";
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(XCODE_PATH)
                .header("cookie", "ADCDownloadAuth=TOKEN");
            then.status(200)
                .header("content-length", content.len().to_string())
                .body(content);
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("nested").join("Xcode_15.xip");
        let client = NetClient::with_defaults().unwrap();
        let url = parse_url(&server.url(XCODE_PATH)).unwrap();

        let mut ticks = Vec::new();
        let size = download_to_file(
            &client,
            url,
            &AuthSession::new("TOKEN"),
            &dest,
            |downloaded, total| ticks.push((downloaded, total)),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(size, content.len() as u64);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), content);
        assert!(!partial_path(&dest).exists());

        let last = ticks.last().copied().unwrap();
        assert_eq!(last, (content.len() as u64, Some(content.len() as u64)));
    }

    #[tokio::test]
    async fn test_download_http_error_leaves_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(XCODE_PATH);
            then.status(404).body("Not Found");
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("Xcode_15.xip");
        let client = NetClient::with_defaults().unwrap();
        let url = parse_url(&server.url(XCODE_PATH)).unwrap();

        let error = download_to_file(&client, url, &AuthSession::new("TOKEN"), &dest, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_authenticate_forwards_session() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/services/download")
                .query_param("path", XCODE_PATH)
                .header("cookie", "myacinfo=abc");
            then.status(200).header(
                "set-cookie",
                "ADCDownloadAuth=TOKEN;Version=1;Comment=;Domain=apple.com;Path=/;Max-Age=108000;HttpOnly;Secure",
            );
        });

        let client = RedirectingClient::new(&server);
        let package = Package::from_path(XCODE_PATH);
        let session = authenticate(&client, &package, Some("myacinfo=abc"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(session.cookie_value(), "TOKEN");
    }

    #[tokio::test]
    async fn test_authenticate_without_cookie() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services/download");
            then.status(200).body("{}");
        });

        let client = RedirectingClient::new(&server);
        let package = Package::from_path(XCODE_PATH);
        let error = authenticate(&client, &package, None).await.unwrap_err();

        assert!(matches!(error, Error::Auth(AuthError::NoCookie)));
    }

    #[tokio::test]
    async fn test_authenticate_rejected_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services/download");
            then.status(403);
        });

        let client = RedirectingClient::new(&server);
        let package = Package::from_path(XCODE_PATH);
        let error = authenticate(&client, &package, Some("myacinfo=stale"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::Auth(AuthError::SessionRejected { status: 403 })
        ));
    }

    #[tokio::test]
    async fn test_authenticate_then_download_package() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services/download");
            then.status(200)
                .header("set-cookie", "ADCDownloadAuth=FRESH; Path=/; Domain=apple.com");
        });
        let download = server.mock(|when, then| {
            when.method(GET)
                .path(XCODE_PATH)
                .header("cookie", "ADCDownloadAuth=FRESH");
            then.status(200).body("0123456789");
        });

        let client = RedirectingClient::new(&server);
        let package = Package::from_path(XCODE_PATH);
        let session = authenticate(&client, &package, None).await.unwrap();

        let temp = tempdir().unwrap();
        let dest = temp.path().join(package.file_name().unwrap());
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        let size = download_package(&client, &package, &session, &dest, move |_, _| {
            *counter.lock().unwrap() += 1;
        })
        .await
        .unwrap();

        download.assert();
        assert_eq!(size, 10);
        assert!(*calls.lock().unwrap() >= 1);
        assert_eq!(tokio::fs::read_to_string(&dest).await.unwrap(), "0123456789");
    }

    #[tokio::test]
    async fn test_connection_refused_passes_through() {
        let client = NetClient::with_defaults().unwrap();
        let url = parse_url("http://127.0.0.1:9/unreachable").unwrap();
        let error = client.send(HttpRequest::get(url)).await.unwrap_err();
        assert!(matches!(error, Error::Network(_)));
    }
}
