use std::net::{IpAddr, SocketAddr};

// =======================================================
// PROXY CONFIG + DEFAULTS
// =======================================================

/// Runtime configuration for the proxy.
///
/// The bind address and port come from the command line; everything
/// else is a fixed deployment constant with a `Default` value.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// IPv4 address the listening socket binds to.
    pub bind_addr: IpAddr,
    /// Port the listening socket binds to.
    pub bind_port: u16,
    /// Maximum number of entries the page cache holds.
    pub cache_capacity: usize,
    /// Port used for all origin connections.
    pub upstream_port: u16,
    /// Size of the client receive buffer; a full request is expected
    /// to arrive within one read of this size.
    pub recv_buffer_bytes: usize,
    /// Maximum number of simultaneously handled client connections.
    pub max_connections: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            bind_port: 8080,
            cache_capacity: 10,
            upstream_port: 80,
            recv_buffer_bytes: 4096,
            max_connections: 100,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("too few arguments: expected a bind IP address and a port")]
    TooFewArguments,
    #[error("too many arguments: only a bind IP address and a port are allowed")]
    TooManyArguments,
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

impl ProxyConfig {
    /// Builds the configuration from the process arguments
    /// (exactly two positional values: bind IP and bind port).
    ///
    /// `args` includes the program name in position 0, as handed out
    /// by `std::env::args`.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        if args.len() < 3 {
            return Err(ConfigError::TooFewArguments);
        }
        if args.len() > 3 {
            return Err(ConfigError::TooManyArguments);
        }

        let bind_addr: IpAddr = args[1]
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(args[1].clone()))?;
        let bind_port: u16 = args[2]
            .parse()
            .map_err(|_| ConfigError::InvalidPort(args[2].clone()))?;

        Ok(Self {
            bind_addr,
            bind_port,
            ..Self::default()
        })
    }

    /// Socket address the listener binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.bind_port)
    }
}
