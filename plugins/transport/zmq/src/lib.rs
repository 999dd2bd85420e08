use std::net::SocketAddr;

use bytes::Bytes;
use zeromq::{PubSocket, Socket, SocketSend, ZmqMessage};

use telemetry_api::{PublishError, SendFuture, TransportSink, WireUnit};

/// PUB-сокет ZeroMQ: один unit: одно multi-part сообщение.
///
/// Подписчики фильтруют по префиксу первой части, поэтому топик
/// (если есть) всегда идёт первым. Число подписчиков не отслеживается,
/// сообщения без подписчиков молча отбрасываются сокетом.
pub struct ZmqPubSink {
    socket: PubSocket,
    endpoint: String,
}

impl ZmqPubSink {
    /// Bind на zmq endpoint, например `tcp://0.0.0.0:9872`.
    pub async fn bind(endpoint: &str) -> Result<Self, PublishError> {
        let mut socket = PubSocket::new();
        let bound = socket
            .bind(endpoint)
            .await
            .map_err(|e| PublishError::init(format!("zmq bind {endpoint}: {e}")))?;
        let endpoint = bound.to_string();
        tracing::info!(%endpoint, "zmq publisher bound");
        Ok(Self { socket, endpoint })
    }

    /// Bind на TCP-адрес.
    pub async fn bind_addr(addr: SocketAddr) -> Result<Self, PublishError> {
        Self::bind(&format!("tcp://{addr}")).await
    }

    /// Фактический endpoint после bind (с реальным портом, если был запрошен 0).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Собрать multi-part сообщение, сохраняя порядок частей.
fn to_message(unit: &WireUnit) -> Result<ZmqMessage, PublishError> {
    let mut parts = unit.parts().iter();
    let first = parts
        .next()
        .ok_or_else(|| PublishError::format_err("cannot publish empty unit"))?;
    let mut message = ZmqMessage::from(Bytes::copy_from_slice(first));
    for part in parts {
        message.push_back(Bytes::copy_from_slice(part));
    }
    Ok(message)
}

impl TransportSink for ZmqPubSink {
    fn send<'a>(&'a mut self, unit: &'a WireUnit) -> SendFuture<'a> {
        Box::pin(async move {
            let message = to_message(unit)?;
            self.socket
                .send(message)
                .await
                .map_err(|e| PublishError::io(format!("zmq send on {}: {e}", self.endpoint)))
        })
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
