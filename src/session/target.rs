//! Where to connect: a unix socket or a TCP host and port.

use crate::error::ConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;

/// Socket locations probed, in order, when none is given.
pub const DEFAULT_SOCKET_LOCATIONS: [&str; 3] = [
    "/tmp/mysql.sock",             // MySQL's own default
    "/var/lib/mysql/mysql.sock",   // RH-type / RPM systems
    "/var/run/mysqld/mysqld.sock", // Debian-type systems
];

/// Target as requested by configuration, before socket discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSpec {
    /// `None` means search [`DEFAULT_SOCKET_LOCATIONS`].
    Socket(Option<PathBuf>),
    HostPort { host: String, port: u16 },
}

impl TargetSpec {
    /// Parse a socket argument; `default` (any case) requests discovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty.
    pub fn from_socket_arg(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::EmptySocket);
        }
        if raw.eq_ignore_ascii_case("default") {
            return Ok(Self::Socket(None));
        }
        Ok(Self::Socket(Some(PathBuf::from(raw))))
    }

    /// Parse `host`, `host:port` or `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, has more than one `:` or the
    /// port is not an integer.
    pub fn from_host_port(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::EmptyHostPort);
        }
        if raw.eq_ignore_ascii_case("default") {
            return Ok(Self::HostPort {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            });
        }

        let parts: Vec<&str> = raw.split(':').collect();
        match parts.as_slice() {
            [host] => Ok(Self::HostPort {
                host: (*host).to_string(),
                port: DEFAULT_PORT,
            }),
            [host, port] => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidHostPort(raw.to_string()))?;
                Ok(Self::HostPort {
                    host: (*host).to_string(),
                    port,
                })
            }
            _ => Err(ConfigError::InvalidHostPort(raw.to_string())),
        }
    }
}

/// A resolved, connectable target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectTarget {
    Socket(PathBuf),
    Tcp { host: String, port: u16 },
}

impl ConnectTarget {
    /// Resolve a spec, verifying or discovering the socket file.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit socket path is not a socket, or if no
    /// default socket location holds one.
    pub fn resolve(spec: TargetSpec, probe: &dyn SocketProbe) -> Result<Self, ConfigError> {
        match spec {
            TargetSpec::HostPort { host, port } => Ok(Self::Tcp { host, port }),
            TargetSpec::Socket(Some(path)) => match probe.is_socket(&path) {
                Ok(true) => Ok(Self::Socket(path)),
                Ok(false) => Err(ConfigError::NotASocket(path)),
                Err(source) => Err(ConfigError::Stat { path, source }),
            },
            TargetSpec::Socket(None) => {
                discover_socket(&DEFAULT_SOCKET_LOCATIONS, probe).map(Self::Socket)
            }
        }
    }
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socket(path) => write!(f, "{}", path.display()),
            Self::Tcp { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

/// First candidate that exists and is a socket special file.
///
/// # Errors
///
/// Returns an error if no candidate qualifies.
pub fn discover_socket<P: AsRef<Path>>(
    candidates: &[P],
    probe: &dyn SocketProbe,
) -> Result<PathBuf, ConfigError> {
    for candidate in candidates {
        let path = candidate.as_ref();
        match probe.is_socket(path) {
            Ok(true) => {
                debug!(socket = %path.display(), "using default socket location");
                return Ok(path.to_path_buf());
            }
            Ok(false) => debug!(socket = %path.display(), "not a socket, skipping"),
            Err(e) => warn!(socket = %path.display(), error = %e, "couldn't stat socket candidate"),
        }
    }
    Err(ConfigError::NoDefaultSocket)
}

/// Filesystem check used for socket resolution.
pub trait SocketProbe {
    /// `Ok(false)` for a missing path or a non-socket file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but cannot be inspected.
    fn is_socket(&self, path: &Path) -> std::io::Result<bool>;
}

/// Probe backed by `stat(2)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl SocketProbe for FsProbe {
    fn is_socket(&self, path: &Path) -> std::io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(is_socket_type(&meta.file_type())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(unix)]
fn is_socket_type(file_type: &std::fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_socket()
}

#[cfg(not(unix))]
fn is_socket_type(_file_type: &std::fs::FileType) -> bool {
    false
}
