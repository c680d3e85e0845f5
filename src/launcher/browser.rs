/// Opens `url` in the default browser. Failure is logged, not fatal.
pub fn open_browser(url: &str) {
    tracing::info!("Opening {url}");
    if let Err(e) = open::that(url) {
        tracing::warn!("Could not open a browser ({e}); visit {url} manually");
    }
}
