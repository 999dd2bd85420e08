use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::UdpSocket;

use telemetry_api::{PublishError, SendFuture, TransportSink, WireUnit};

/// Датаграммный sink: один unit: одна датаграмма на `dest`.
///
/// Семейство сокета выбирается по адресу назначения при открытии и
/// больше не меняется. Multicast-адреса отправляются так же, как unicast,
/// TTL и membership остаются по умолчанию.
pub struct UdpSink {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl UdpSink {
    /// Открыть сокет на эфемерном локальном порту того же семейства, что и `dest`.
    pub async fn open(dest: SocketAddr) -> Result<Self, PublishError> {
        let local = match dest.ip() {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| PublishError::init(format!("UDP bind {local}: {e}")))?;

        let family = if dest.is_ipv6() { "IPv6" } else { "IPv4" };
        tracing::info!(
            family,
            address = %dest.ip(),
            port = dest.port(),
            "opened UDP socket"
        );
        Ok(Self { socket, dest })
    }

    pub fn destination(&self) -> SocketAddr {
        self.dest
    }

    pub fn local_addr(&self) -> Result<SocketAddr, PublishError> {
        Ok(self.socket.local_addr()?)
    }
}

impl TransportSink for UdpSink {
    fn send<'a>(&'a mut self, unit: &'a WireUnit) -> SendFuture<'a> {
        Box::pin(async move {
            let [payload] = unit.parts() else {
                return Err(PublishError::format_err(format!(
                    "datagram unit must have exactly 1 part, got {}",
                    unit.len()
                )));
            };
            self.socket
                .send_to(payload, self.dest)
                .await
                .map(|_| ())
                .map_err(|e| PublishError::io(format!("UDP send to {}: {e}", self.dest)))
        })
    }

    fn describe(&self) -> String {
        format!("udp://{}", self.dest)
    }

    fn max_parts(&self) -> usize {
        1
    }
}
