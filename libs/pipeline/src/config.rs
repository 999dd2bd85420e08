use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use telemetry_api::PublishError;

/// Адрес датаграмм по умолчанию (loopback IPv4).
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
/// Порт датаграмм по умолчанию.
pub const DEFAULT_PORT: u16 = 9870;
/// Порт публикации pub/sub (не настраивается из CLI).
pub const PUBSUB_PORT: u16 = 9872;

// ═══════════════════════════════════════════════════════════════
//  Transport kind / address family
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connectionless UDP, один буфер на отправку.
    Datagram,
    /// PUB-сокет, multi-part сообщение на отправку.
    PubSub,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Datagram => f.write_str("datagram"),
            TransportKind::PubSub => f.write_str("pub-sub"),
        }
    }
}

/// Семейство адресов. Определяется синтаксисом литерала один раз при
/// старте и не меняется до конца процесса.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    pub fn version(self) -> u8 {
        match self {
            AddressFamily::V4 => 4,
            AddressFamily::V6 => 6,
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IPv{}", self.version())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Endpoint Config
// ═══════════════════════════════════════════════════════════════

/// Неизменяемая конфигурация endpoint'а. Собирается один раз при старте
/// и передаётся явно синтезатору, framing'у и транспорту.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    transport: TransportKind,
    address: IpAddr,
    port: u16,
    topic: Option<String>,
    include_timestamp: bool,
}

impl EndpointConfig {
    /// Датаграммы на `address:port`. Принимается только IP-литерал
    /// (v4 или v6, unicast или multicast), без DNS.
    pub fn datagram(address: &str, port: u16) -> Result<Self, PublishError> {
        let address: IpAddr = address
            .parse()
            .map_err(|e| PublishError::config(format!("invalid address '{address}': {e}")))?;
        Ok(Self {
            transport: TransportKind::Datagram,
            address,
            port,
            topic: None,
            include_timestamp: false,
        })
    }

    /// Публикация на всех локальных интерфейсах, порт `PUBSUB_PORT`.
    /// Пустой топик равносилен отсутствию топика.
    pub fn pub_sub(topic: Option<String>, include_timestamp: bool) -> Self {
        Self {
            transport: TransportKind::PubSub,
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: PUBSUB_PORT,
            topic: topic.filter(|t| !t.is_empty()),
            include_timestamp,
        }
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.address)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn include_timestamp(&self) -> bool {
        self.include_timestamp
    }

    /// Метка времени без топика допустима, но подписчики с фильтром
    /// по первой части увидят там payload.
    pub fn timestamp_without_topic(&self) -> bool {
        self.include_timestamp && self.topic.is_none()
    }
}
