//! Gateway facade — the entry point tool handlers call before acting.
//!
//! Composes the path validator, command validator, per-channel rate
//! limiters, and the outbound-result cache. Handlers abort on a policy
//! rejection (surfacing the reasons verbatim), back off for the computed
//! wait time on a rate-limit refusal, and may consult the cache before
//! placing an outbound call.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::{GatewayConfig, SecurityConfig};
use crate::error::{GateError, Result};
use crate::security::{CommandValidator, FileOperation, PathValidator};
use crate::throttle::{RateLimiter, TtlCache};

/// In-process security and throttling gateway.
///
/// Designed to sit in an `Arc` shared by concurrent tool handlers: the
/// validators are stateless and the limiters and cache serialize their own
/// mutations.
pub struct Gateway {
    security: Arc<SecurityConfig>,
    paths: PathValidator,
    commands: CommandValidator,
    limiters: HashMap<String, RateLimiter>,
    cache: TtlCache<String, Value>,
}

impl Gateway {
    pub fn new(config: GatewayConfig, security: SecurityConfig) -> Self {
        let security = Arc::new(security);
        let limiters = config
            .channels
            .iter()
            .map(|ch| {
                (
                    ch.name.clone(),
                    RateLimiter::new(ch.max_calls, ch.window),
                )
            })
            .collect();
        Self {
            paths: PathValidator::new(config.root, Arc::clone(&security)),
            commands: CommandValidator::new(Arc::clone(&security)),
            limiters,
            cache: TtlCache::new(config.default_cache_ttl),
            security,
        }
    }

    /// Validate a filesystem path before touching it. Returns the canonical
    /// path on success; a rejection carries every failed check verbatim.
    pub fn check_path(&self, raw: &str, operation: FileOperation) -> Result<PathBuf> {
        let verdict = self.paths.validate(raw, operation);
        match verdict.resolved {
            Some(resolved) if verdict.is_valid => Ok(resolved),
            _ => Err(GateError::PathRejected {
                path: raw.to_string(),
                reasons: verdict.reasons,
            }),
        }
    }

    /// Validate a shell command before executing it. Returns the program
    /// base name on success.
    pub fn check_command(&self, raw: &str) -> Result<String> {
        let verdict = self.commands.validate(raw);
        match verdict.program {
            Some(program) if verdict.is_valid => Ok(program),
            _ => Err(GateError::CommandRejected {
                command: raw.to_string(),
                reason: verdict
                    .reason
                    .unwrap_or_else(|| "rejected".to_string()),
            }),
        }
    }

    /// Reserve a slot on the named limiter channel before an outbound call.
    /// A refusal carries the wait time until a slot frees up; the gateway
    /// never retries on the caller's behalf.
    pub async fn throttle(&self, channel: &str) -> Result<()> {
        let limiter = self
            .limiters
            .get(channel)
            .ok_or_else(|| GateError::UnknownChannel(channel.to_string()))?;
        if limiter.allow_call().await {
            tracing::debug!(channel, "outbound call admitted");
            Ok(())
        } else {
            let retry_after = limiter.wait_time().await;
            tracing::warn!(channel, ?retry_after, "outbound call rate limited");
            Err(GateError::RateLimited {
                channel: channel.to_string(),
                retry_after,
            })
        }
    }

    /// Time until the named channel frees a slot. Zero when a call would be
    /// admitted right now.
    pub async fn wait_time(&self, channel: &str) -> Result<std::time::Duration> {
        let limiter = self
            .limiters
            .get(channel)
            .ok_or_else(|| GateError::UnknownChannel(channel.to_string()))?;
        Ok(limiter.wait_time().await)
    }

    /// Cached result of a previous outbound call, if still fresh.
    pub async fn cached(&self, key: &str) -> Option<Value> {
        self.cache.get(key).await
    }

    /// Store an outbound-call result under the default TTL.
    pub async fn store(&self, key: impl Into<String>, value: Value) {
        self.cache.insert(key.into(), value).await;
    }

    /// Store an outbound-call result under an explicit TTL.
    pub async fn store_with_ttl(
        &self,
        key: impl Into<String>,
        value: Value,
        ttl: std::time::Duration,
    ) {
        self.cache.insert_with_ttl(key.into(), value, ttl).await;
    }

    /// Sweep expired cache entries; intended for a periodic timer.
    pub async fn sweep_cache(&self) {
        self.cache.cleanup().await;
    }

    /// Read-only snapshot of the active policy and throttle state, for
    /// diagnostic and audit display. There is no mutation endpoint:
    /// changing policy requires rebuilding the gateway.
    pub async fn status(&self) -> GatewayStatus {
        let mut channels = Vec::with_capacity(self.limiters.len());
        for (name, limiter) in &self.limiters {
            channels.push(ChannelStatus {
                name: name.clone(),
                max_calls: limiter.max_calls(),
                window_ms: limiter.window().as_millis() as u64,
                in_flight: limiter.in_flight().await,
            });
        }
        channels.sort_by(|a, b| a.name.cmp(&b.name));

        GatewayStatus {
            root: self.paths.root().display().to_string(),
            allowed_commands: self.security.allowed_commands.clone(),
            forbidden_paths: self.security.forbidden_paths.clone(),
            forbidden_dirs: self.security.forbidden_dirs.clone(),
            dangerous_patterns: self
                .security
                .dangerous_patterns
                .iter()
                .map(|p| p.description().to_string())
                .collect(),
            channels,
            cache_entries: self.cache.len().await,
        }
    }
}

/// Snapshot of the gateway's policy and throttle state.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatus {
    pub root: String,
    pub allowed_commands: Vec<String>,
    pub forbidden_paths: Vec<String>,
    pub forbidden_dirs: Vec<String>,
    pub dangerous_patterns: Vec<String>,
    pub channels: Vec<ChannelStatus>,
    pub cache_entries: usize,
}

/// Per-channel limiter state in a status snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelStatus {
    pub name: String,
    pub max_calls: usize,
    pub window_ms: u64,
    pub in_flight: usize,
}
