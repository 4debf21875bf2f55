//! Oracle clients: one `submit(state) -> Verdict` capability with three
//! interchangeable strategies — synchronous RPC, in-process incremental
//! evaluation, and offline replay through an external checker process.

pub mod client;
pub mod inproc;
pub mod replay;
pub mod rpc;
pub mod verdict;

pub use client::{OracleClient, OracleError};
pub use inproc::{InProcOracle, MonitorError, StlMonitor};
pub use replay::{parse_output_line, ReplayConfig, ReplayError, ReplayEvent, ReplayRunner};
pub use rpc::{RpcOracle, ServiceName};
pub use verdict::Verdict;
