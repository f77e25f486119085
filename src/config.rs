//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

use crate::action::ActionPolicy;

/// userdeck: in-memory user records over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "userdeck", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "USERDECK_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `userdeck=debug`).
    #[arg(long, env = "USERDECK_LOG", default_value = "info")]
    pub log: String,

    /// Run `/user-action` requests whose method does not match the action,
    /// logging a warning, instead of rejecting them.
    #[arg(long, env = "USERDECK_LENIENT_ACTIONS")]
    pub lenient_actions: bool,
}

impl Config {
    pub fn action_policy(&self) -> ActionPolicy {
        if self.lenient_actions {
            ActionPolicy::Lenient
        } else {
            ActionPolicy::Strict
        }
    }
}

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over
/// `fallback`.
pub fn init_tracing(fallback: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
