//! Operations that finish in a single request

use tracing::{info, warn};
use xcfetch_errors::Error;
use xcfetch_net::package_urls;
use xcfetch_progress::{OutputSink, ProgressMode, ProgressRenderer};
use xcfetch_types::{AuthSession, Package, PackageUrls};

use crate::OpsCtx;

/// Both endpoints for `package`
///
/// # Errors
///
/// Returns an error if the package path cannot be turned into a URL.
pub fn urls(package: &Package) -> Result<PackageUrls, Error> {
    package_urls(package)
}

/// Run the authorization handshake for `package`
///
/// The session cookie comes from `ctx.config.auth`. Progress is drawn as a
/// single counting step followed by the result marker.
///
/// # Errors
///
/// Returns an error if the request fails or no download cookie is granted.
pub async fn authenticate<S: OutputSink>(
    ctx: &mut OpsCtx<S>,
    package: &Package,
) -> Result<AuthSession, Error> {
    let OpsCtx {
        client,
        sink,
        config,
        ..
    } = ctx;

    let mut step = ProgressRenderer::new(&mut *sink, ProgressMode::Counting);
    step.update(1, 1, &format!("Authenticating for {package}"))?;

    match xcfetch_net::authenticate(&**client, package, config.auth.session_cookie.as_deref())
        .await
    {
        Ok(session) => {
            step.complete(true)?;
            info!(package = %package, "Download authorized");
            Ok(session)
        }
        Err(e) => {
            if let Err(render) = step.complete(false) {
                warn!(error = %render, "Failed to render error marker");
            }
            Err(e)
        }
    }
}
