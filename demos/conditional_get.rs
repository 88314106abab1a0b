//! Fetches a URL twice and reports whether the second response was `304`.
//!
//! ```text
//! RUST_LOG=etagcache=debug cargo run --example conditional_get -- http://127.0.0.1:8080/
//! ```

use etagcache::client::ConditionalClient;
use etagcache::http::Request;
use etagcache::transport::{LoggingTransport, TcpTransport};
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080/".to_owned());
    let url = Url::parse(&target)?;

    let client = ConditionalClient::with_memory_store(LoggingTransport::new(TcpTransport::default()));

    let first = client.fetch(Request::get(url.clone())).await?;
    println!(
        "first:  {} ({} bytes, etag {:?})",
        first.response().status_code(),
        first.response().body().len(),
        first.response().etag()
    );

    let second = client.fetch(Request::get(url)).await?;
    if second.is_unmodified() {
        println!("second: 304, reusing {} cached bytes", first.response().body().len());
    } else {
        println!(
            "second: {} ({} bytes), server sent a fresh body",
            second.response().status_code(),
            second.response().body().len()
        );
    }

    Ok(())
}
