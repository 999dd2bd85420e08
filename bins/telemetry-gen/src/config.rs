use clap::{Args, Parser, Subcommand};

use pipeline::config::{DEFAULT_ADDRESS, DEFAULT_PORT};
use pipeline::EndpointConfig;
use telemetry_api::PublishError;

#[derive(Parser)]
#[command(name = "telemetry-gen", about = "Synthetic telemetry publisher (UDP / ZeroMQ)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// JSON-датаграммы каждые 50 мс (IPv4/IPv6, unicast/multicast)
    Udp(UdpArgs),
    /// Multi-part сообщения на PUB-сокет tcp://*:9872 каждые 100 мс
    Zmq(ZmqArgs),
}

#[derive(Args, Clone, Debug)]
pub struct UdpArgs {
    /// IP-адрес назначения. Для multicast: 239.0.0.1 или ff02::1
    #[arg(long, default_value = DEFAULT_ADDRESS, env = "TELEMETRY_GEN_ADDRESS")]
    pub address: String,

    /// UDP-порт назначения
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TELEMETRY_GEN_PORT")]
    pub port: u16,
}

impl UdpArgs {
    pub fn endpoint(&self) -> Result<EndpointConfig, PublishError> {
        EndpointConfig::datagram(&self.address, self.port)
    }
}

#[derive(Args, Clone, Debug)]
pub struct ZmqArgs {
    /// Топик, на котором публикуются сообщения
    #[arg(short = 't', long, env = "TELEMETRY_GEN_TOPIC")]
    pub topic: Option<String>,

    /// Добавить метку времени последней частью (имеет смысл вместе с --topic)
    #[arg(long)]
    pub timestamp: bool,
}

impl ZmqArgs {
    pub fn endpoint(&self) -> EndpointConfig {
        EndpointConfig::pub_sub(self.topic.clone(), self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{AddressFamily, TransportKind};

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn udp_defaults() {
        let Commands::Udp(args) = parse(&["telemetry-gen", "udp"]) else {
            panic!("expected udp");
        };
        let cfg = args.endpoint().unwrap();
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:9870");
        assert_eq!(cfg.family(), AddressFamily::V4);
    }

    #[test]
    fn udp_ipv6_address() {
        let Commands::Udp(args) = parse(&["telemetry-gen", "udp", "--address", "::1", "--port", "9999"]) else {
            panic!("expected udp");
        };
        assert_eq!(args.endpoint().unwrap().family(), AddressFamily::V6);
    }

    #[test]
    fn zmq_topic_and_timestamp() {
        let Commands::Zmq(args) = parse(&["telemetry-gen", "zmq", "-t", "imu", "--timestamp"]) else {
            panic!("expected zmq");
        };
        let cfg = args.endpoint();
        assert_eq!(cfg.transport(), TransportKind::PubSub);
        assert_eq!(cfg.topic(), Some("imu"));
        assert!(cfg.include_timestamp());
        assert_eq!(cfg.port(), 9872);
    }

    #[test]
    fn bad_port_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["telemetry-gen", "udp", "--port", "70000"]).is_err());
    }
}
