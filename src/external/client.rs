use std::sync::LazyLock;
use std::time::Duration;

/// Global HTTP client shared by the token source, FCM provider and
/// Firestore delivery log.
///
/// Initialized lazily on first access. The 30 s request timeout is the only
/// bound on an outbound call; there is no retry layer on top of it.
///
/// # Example
/// ```ignore
/// use pushnote::external::client::HTTP_CLIENT;
///
/// async fn fetch(url: &str) -> Result<String, reqwest::Error> {
///     HTTP_CLIENT.get(url).send().await?.text().await
/// }
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .user_agent(user_agent())
        .build()
        .expect("Failed to build HTTP client")
});

/// `pushnote/<version>`
pub fn user_agent() -> String {
    format!("pushnote/{}", crate::pkg_version())
}
