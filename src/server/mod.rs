// Server module entry point
// Accept loop for the bundled demo server; the parsing and response
// building all happens in the library.

mod connection;
mod handler;

use std::sync::Arc;
use tokio::net::TcpListener;

use rawhttp::config::Config;
use rawhttp::logger;

/// Accept connections until Ctrl+C
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.get_socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    logger::log_server_start(&addr, &config);

    let config = Arc::new(config);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_connection_accepted(&peer_addr);
                        let config = Arc::clone(&config);
                        tokio::spawn(async move {
                            if let Err(e) = connection::serve(stream, peer_addr, &config).await {
                                logger::log_connection_error(&peer_addr, &e);
                            }
                        });
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                logger::log_info("[Shutdown] Ctrl+C received, stopping accept loop");
                return Ok(());
            }
        }
    }
}
