use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::str::FromStr;

use vigil_obs::StateAssertion;

use crate::client::{OracleClient, OracleError};
use crate::verdict::Verdict;

/// A hierarchical service identifier, e.g. `NuRV/Monitor/Service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName {
    components: Vec<String>,
}

impl ServiceName {
    pub fn new(components: Vec<String>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }
}

impl FromStr for ServiceName {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<String> = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if components.is_empty() {
            return Err(OracleError::Resolve {
                name: s.to_string(),
                detail: "empty service name".to_string(),
            });
        }
        Ok(Self { components })
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

/// Synchronous RPC client for a remote monitoring service.
///
/// Speaks a newline-delimited request/response protocol over TCP:
/// `bind <name>` -> `ok`, `reset <idx> <0|1>` -> `ok`,
/// `heartbeat <idx> <expr>` -> `true` | `false` | `unknown`.
///
/// Connecting resolves the hierarchical service name and resets the
/// service's tracking state for the configured property before the first
/// submission. Both failures are fatal before any monitoring begins.
#[derive(Debug)]
pub struct RpcOracle {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    property_index: u32,
}

impl RpcOracle {
    pub fn connect(
        addr: &str,
        name: &ServiceName,
        property_index: u32,
    ) -> Result<Self, OracleError> {
        let stream = TcpStream::connect(addr).map_err(OracleError::Connect)?;
        let reader = BufReader::new(stream.try_clone().map_err(OracleError::Connect)?);
        let mut oracle = Self {
            reader,
            writer: stream,
            property_index,
        };
        tracing::debug!(%name, addr, "binding monitoring service");

        let reply = oracle.request(&format!("bind {name}"))?;
        if reply != "ok" {
            return Err(OracleError::Resolve {
                name: name.to_string(),
                detail: reply,
            });
        }

        // Clear the service's property-tracking history before step one.
        let reply = oracle.request(&format!("reset {property_index} 1"))?;
        if reply != "ok" {
            return Err(OracleError::Protocol(format!(
                "reset rejected: {reply}"
            )));
        }

        Ok(oracle)
    }

    fn request(&mut self, line: &str) -> Result<String, OracleError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        let mut reply = String::new();
        let n = self.reader.read_line(&mut reply)?;
        if n == 0 {
            return Err(OracleError::Protocol(
                "service closed the connection".to_string(),
            ));
        }
        Ok(reply.trim().to_string())
    }
}

impl OracleClient for RpcOracle {
    fn submit(&mut self, assertion: &StateAssertion) -> Result<Verdict, OracleError> {
        let StateAssertion::Predicate(expr) = assertion else {
            return Err(OracleError::UnsupportedAssertion {
                expected: "predicate",
            });
        };

        let reply = self.request(&format!("heartbeat {} {expr}", self.property_index))?;
        match reply.as_str() {
            "true" => Ok(Verdict::Satisfied),
            "false" => Ok(Verdict::Violated),
            "unknown" => Ok(Verdict::Unknown),
            other => Err(OracleError::Protocol(format!(
                "unexpected heartbeat reply '{other}'"
            ))),
        }
    }
}
