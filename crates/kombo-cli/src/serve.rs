//! Serve command implementation for Kombo CLI.
//!
//! Hosts the staged bundle until Ctrl+C.

use std::net::SocketAddr;
use std::path::Path;

use kombo_server::{ServerConfig, ServerError};

use crate::colors;

/// Serve the staging directory.
///
/// The banner is printed once the listener is bound, so it always shows the
/// address actually being served.
pub async fn execute(staging: &Path, config: ServerConfig) -> anyhow::Result<()> {
    if !staging.is_dir() {
        return Err(ServerError::RootMissing(staging.to_path_buf()).into());
    }

    let listener = kombo_server::bind(&config).await?;
    let addr = listener.local_addr().map_err(ServerError::from)?;

    print!("{}", banner(staging, addr));
    colors::flush_stdout();

    kombo_server::serve_until_interrupt(listener, staging).await?;

    Ok(())
}

fn banner(staging: &Path, addr: SocketAddr) -> String {
    format!(
        "\n{bold}Kombo Server{reset} - Local testing only\n\
         {rule}\n\
         {cyan}  ◆ Root:{reset} {root}\n\
         {cyan}  ◆ Server:{reset} http://{addr}\n\
         {rule}\n\
         {green}Press Ctrl+C to stop{reset}\n\n",
        bold = colors::BOLD,
        reset = colors::RESET,
        cyan = colors::CYAN,
        green = colors::GREEN,
        rule = colors::rule(),
        root = staging.display(),
        addr = addr,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_banner_shows_bound_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let listener = kombo_server::bind(&config).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let text = banner(Path::new("web"), addr);
        assert!(text.contains(&format!("http://127.0.0.1:{}", addr.port())));
        assert!(!text.contains("127.0.0.1:0\n"));
    }

    #[tokio::test]
    async fn test_taken_port_fails_before_banner() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let temp = std::env::temp_dir();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
        };

        let err = execute(&temp, config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServerError>(),
            Some(ServerError::Bind { .. })
        ));
    }
}
