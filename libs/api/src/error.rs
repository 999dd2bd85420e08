/// Что сломалось при публикации телеметрии.
///
/// `Config` и `Init` возникают до первого тика и завершают процесс с кодом 1.
/// `Io` и `Format` возникают внутри цикла: теряется одна запись или один тик,
/// каденция не сбивается.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Адрес не является IP-литералом.
    Config,
    /// Не удалось открыть UDP-сокет или занять порт PUB.
    Init,
    /// Отправка блока не удалась, тик потерян.
    Io,
    /// Запись не сериализовалась или не влезла в фрейминг транспорта.
    Format,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Init => f.write_str("init"),
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Format => f.write_str("format"),
        }
    }
}

/// Ошибка кодека, фрейминга или отправки одного блока телеметрии.
///
/// `Display` печатает только сообщение: бинарник выводит его как
/// `Error: <message>`. Вид ошибки виден в `Debug` (`[init] ...`).
/// Ошибка разбора адреса считается `Config`, сбой `send_to` считается `Io`,
/// ошибка сериализации записи считается `Format`.
#[derive(Clone)]
pub struct PublishError {
    kind: ErrorKind,
    message: String,
}

impl PublishError {
    /// Неверный адрес назначения.
    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into() }
    }

    /// Сокет транспорта не открылся.
    pub fn init(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Init, message: msg.into() }
    }

    /// Сбой отправки одного блока.
    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Io, message: msg.into() }
    }

    /// Запись пропускается, остальные записи тика уходят.
    pub fn format_err(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Format, message: msg.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `true` для ошибок, после которых цикл публикации продолжается.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::Io | ErrorKind::Format)
    }
}

impl std::fmt::Debug for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PublishError {}

impl From<std::io::Error> for PublishError {
    fn from(e: std::io::Error) -> Self { Self { kind: ErrorKind::Io, message: e.to_string() } }
}

impl From<serde_json::Error> for PublishError {
    fn from(e: serde_json::Error) -> Self { Self { kind: ErrorKind::Format, message: e.to_string() } }
}

impl From<std::net::AddrParseError> for PublishError {
    fn from(e: std::net::AddrParseError) -> Self { Self { kind: ErrorKind::Config, message: e.to_string() } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_from_conversions() {
        let io: PublishError = std::io::Error::other("boom").into();
        assert_eq!(io.kind(), ErrorKind::Io);
        assert!(io.is_transient());

        let addr: PublishError = "not-an-ip".parse::<std::net::IpAddr>().unwrap_err().into();
        assert_eq!(addr.kind(), ErrorKind::Config);
        assert!(!addr.is_transient());
    }

    #[test]
    fn startup_errors_are_fatal_and_loop_errors_drop_one_unit() {
        assert!(!PublishError::config("invalid address ' 127.0.0.1 '").is_transient());
        assert!(!PublishError::init("zmq bind tcp://0.0.0.0:9872: in use").is_transient());
        assert!(PublishError::io("udp send to 127.0.0.1:9870: refused").is_transient());
        assert!(PublishError::format_err("unit has 3 parts").is_transient());

        let json: PublishError = serde_json::from_str::<f64>("nope").unwrap_err().into();
        assert_eq!(json.kind(), ErrorKind::Format);
    }

    #[test]
    fn debug_carries_kind() {
        let e = PublishError::init("bind tcp://0.0.0.0:9872: address in use");
        assert_eq!(format!("{e:?}"), "[init] bind tcp://0.0.0.0:9872: address in use");
        assert_eq!(e.to_string(), "bind tcp://0.0.0.0:9872: address in use");
    }
}
