use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Well-known public resolvers used as reachability beacons, one per
/// address family.
const PROBE_ADDRS: [SocketAddr; 2] = [
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53),
    SocketAddr::new(
        IpAddr::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888)),
        53,
    ),
];

/// Advisory connectivity check. A positive answer does not guarantee the
/// following remote write succeeds.
pub trait Probe {
    async fn is_remote_reachable(&mut self) -> bool;
}

pub struct NetProbe {
    addrs: Vec<SocketAddr>,
    timeout: Duration,
}

impl NetProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            addrs: PROBE_ADDRS.to_vec(),
            timeout,
        }
    }

    #[cfg(test)]
    fn with_addrs(addrs: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { addrs, timeout }
    }
}

impl Probe for NetProbe {
    async fn is_remote_reachable(&mut self) -> bool {
        for addr in &self.addrs {
            match tokio::time::timeout(self.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_)) => return true,
                Ok(Err(e)) => debug!("probe to {} failed: {}", addr, e),
                Err(_) => debug!("probe to {} timed out after {:?}", addr, self.timeout),
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_port_addr() -> SocketAddr {
        // Bind then drop so the port is closed by the time it is probed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    #[tokio::test]
    async fn test_reachable_when_listener_accepts() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut probe = NetProbe::with_addrs(vec![addr], Duration::from_secs(1));
        assert!(probe.is_remote_reachable().await);
    }

    #[tokio::test]
    async fn test_unreachable_when_all_probes_fail() {
        let addr = closed_port_addr();
        let mut probe = NetProbe::with_addrs(vec![addr, addr], Duration::from_millis(500));
        assert!(!probe.is_remote_reachable().await);
    }

    #[tokio::test]
    async fn test_secondary_address_rescues_the_probe() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let good = listener.local_addr().unwrap();
        let bad = closed_port_addr();

        let mut probe = NetProbe::with_addrs(vec![bad, good], Duration::from_millis(500));
        assert!(probe.is_remote_reachable().await);
    }
}
