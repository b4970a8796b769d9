//! Typed identifiers used across panels.
//!
//! Endpoint ids are written as `location.name`, and references into a lagarto
//! network prefix that with the server (process) name: `server.location.name`.
//! Both split at the FIRST `.` only, so endpoint names may contain dots and spaces:
//!
//!   "SWAP-network.SWAP.Binary 6"  =>  server "SWAP-network", endpoint "SWAP.Binary 6"

use std::fmt;

/// Separator between the halves of every identifier.
pub const SEPARATOR: char = '.';

/// `location.name` identity of an endpoint within one server.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointId {
    pub location: String,
    pub name: String,
}

impl EndpointId {
    pub fn new(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
        }
    }

    /// Split at the first separator. Returns None when there is none.
    pub fn parse(s: &str) -> Option<Self> {
        let (location, name) = s.split_once(SEPARATOR)?;
        Some(Self::new(location, name))
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.location, SEPARATOR, self.name)
    }
}

/// `server.endpoint` reference as stored in statement tokens.
///
/// The endpoint half is kept raw: it may be a placeholder that does not parse
/// as an [`EndpointId`], and it must survive a round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkRef {
    pub server: String,
    pub endpoint: String,
}

impl NetworkRef {
    pub fn new(server: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Split a statement token at its first separator.
    ///
    /// A token without a separator has no server part; the whole token is the
    /// endpoint. This keeps the server selector empty instead of guessing.
    pub fn parse(token: &str) -> Self {
        match token.split_once(SEPARATOR) {
            Some((server, endpoint)) => Self::new(server, endpoint),
            None => Self::new("", token),
        }
    }

    /// Server half only, when the token carries one.
    pub fn server_of(token: &str) -> Option<&str> {
        token.split_once(SEPARATOR).map(|(server, _)| server)
    }

    pub fn endpoint_id(&self) -> Option<EndpointId> {
        EndpointId::parse(&self.endpoint)
    }
}

impl fmt::Display for NetworkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.server, SEPARATOR, self.endpoint)
    }
}
