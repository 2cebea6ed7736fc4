// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TCP reachability probe for the SMB port.

use std::time::Duration;

use smbcheck_core::SmbError;
use tokio::net::TcpStream;
use tracing::debug;

/// Try to open a TCP connection to `host:port` within `timeout`.
///
/// The deadline covers name resolution and the handshake. The connection is
/// closed straight away. Failures of any kind come back as
/// [`SmbError::Reachability`] with a human-readable reason.
pub async fn check_reachable(host: &str, port: u16, timeout: Duration) -> Result<(), SmbError> {
    let unreachable = |reason: String| SmbError::Reachability {
        host: host.to_string(),
        port,
        reason,
    };

    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            debug!(host, port, peer = ?stream.peer_addr().ok(), "port open");
            Ok(())
        }
        Ok(Err(e)) => Err(unreachable(e.to_string())),
        Err(_) => Err(unreachable(format!(
            "no answer within {}s",
            timeout.as_secs_f32()
        ))),
    }
}

/// Boolean form of [`check_reachable`].
pub async fn is_reachable(host: &str, port: u16, timeout: Duration) -> bool {
    check_reachable(host, port, timeout).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn open_port_is_reachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(is_reachable("127.0.0.1", port, Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn closed_port_fails_within_bound() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let started = Instant::now();
        let err = check_reachable("127.0.0.1", port, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(started.elapsed() <= Duration::from_secs(6));
        match err {
            SmbError::Reachability { host, port: p, .. } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(p, port);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unresolvable_host_is_unreachable() {
        let started = Instant::now();
        let reachable = is_reachable("smbcheck.invalid", 445, Duration::from_secs(5)).await;
        assert!(!reachable);
        assert!(started.elapsed() <= Duration::from_secs(6));
    }
}
