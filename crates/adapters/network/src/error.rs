//! Network adapter error types.

use smarthub_domain::error::ProviderError;

/// Errors specific to the network adapter.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The `ping` program could not be run.
    #[error("failed to run ping")]
    Ping(#[source] std::io::Error),

    /// The DHCP listener could not bind its socket.
    #[error("failed to bind DHCP listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Not a MAC address.
    #[error("invalid MAC address {0:?}")]
    InvalidMac(String),

    /// A host name that would be read as a `ping` option.
    #[error("invalid host {0:?}")]
    InvalidHost(String),
}

impl From<NetworkError> for ProviderError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Ping(err) => Self::Io(err),
            NetworkError::InvalidMac(_) | NetworkError::InvalidHost(_) => {
                Self::InvalidArguments(err.to_string())
            }
            NetworkError::Bind { .. } => Self::other(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_bind_address() {
        let err = NetworkError::Bind {
            addr: "0.0.0.0:67".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(
            err.to_string(),
            "failed to bind DHCP listener on 0.0.0.0:67"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn should_convert_invalid_mac_to_invalid_arguments() {
        let err: ProviderError = NetworkError::InvalidMac("zz".to_string()).into();
        assert!(matches!(
            err,
            ProviderError::InvalidArguments(message) if message == r#"invalid MAC address "zz""#
        ));
    }

    #[test]
    fn should_convert_ping_failure_to_io() {
        let err: ProviderError =
            NetworkError::Ping(std::io::Error::from(std::io::ErrorKind::NotFound)).into();
        assert!(matches!(err, ProviderError::Io(_)));
    }
}
