//! tool-gate — security gatekeeper and throttling core for tool hosts.
//!
//! Mediates every side-effecting or outbound action an assistant tool host
//! requests: path containment, command allowlisting, per-channel rate
//! limiting, and TTL caching of outbound-call results.

pub mod config;
pub mod error;
pub mod gateway;
pub mod report;
pub mod security;
pub mod throttle;

pub use config::{ChannelLimit, GatewayConfig, SecurityConfig};
pub use error::{GateError, Result};
pub use gateway::{ChannelStatus, Gateway, GatewayStatus};
pub use report::StructuredError;
pub use security::{
    CommandValidation, CommandValidator, DangerousPattern, FileOperation, PathValidation,
    PathValidator,
};
pub use throttle::{RateLimiter, TtlCache};
