use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bannr_common::config::Config;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Fast settings so a test scan finishes in well under a second.
pub fn test_config(concurrency: usize) -> Config {
    Config {
        concurrency,
        connect_timeout: Duration::from_millis(300),
        probe_delay: Duration::from_millis(5),
        scan_timeout: None,
        quiet: 2,
    }
}

/// Tracks how many connections a listener is holding right now, and the most ever.
#[derive(Default)]
pub struct ConnectionGauge {
    active: AtomicUsize,
    peak: AtomicUsize,
    accepted: AtomicUsize,
}

impl ConnectionGauge {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        self.accepted.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Listener on 127.0.0.1 that greets every client with `banner` (nothing if
/// empty), then holds the connection until the client hangs up.
pub async fn spawn_listener(banner: &'static [u8]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(hold(socket, banner));
        }
    });

    port
}

pub async fn spawn_banner_listener(banner: &'static [u8]) -> u16 {
    spawn_listener(banner).await
}

pub async fn spawn_silent_listener() -> u16 {
    spawn_listener(b"").await
}

/// Listener that waits `greet_after`, sends `banner` and hangs up at once.
///
/// Each connection is counted from accept to hang-up, which always falls
/// inside the window where the client holds its permit.
pub async fn spawn_counting_listener(
    banner: &'static [u8],
    greet_after: Duration,
) -> (u16, Arc<ConnectionGauge>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let gauge = Arc::new(ConnectionGauge::default());

    let server_gauge = Arc::clone(&gauge);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let gauge = Arc::clone(&server_gauge);
            gauge.enter();
            tokio::spawn(async move {
                tokio::time::sleep(greet_after).await;
                let _ = socket.write_all(banner).await;
                drop(socket);
                gauge.leave();
            });
        }
    });

    (port, gauge)
}

/// A port on 127.0.0.1 that was free a moment ago, so connecting is refused.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn hold(mut socket: TcpStream, banner: &[u8]) {
    if !banner.is_empty() && socket.write_all(banner).await.is_err() {
        return;
    }

    let mut buf = [0u8; 64];
    while let Ok(n) = socket.read(&mut buf).await {
        if n == 0 {
            break;
        }
    }
}
