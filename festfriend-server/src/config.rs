/// Server configuration.
///
/// `ServerConfig` carries the defaults; `Args` exposes every field as a CLI
/// flag with a `FESTFRIEND_*` environment fallback.

use clap::Parser;
use festfriend_protocol::CredentialParams;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration for the group server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port (0 picks an ephemeral port).
    pub port: u16,
    /// Argon2id work factor for new group secrets.
    pub credential_params: CredentialParams,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            credential_params: CredentialParams::default(),
            max_body_bytes: 64 * 1024, // 64 KB
        }
    }
}

impl ServerConfig {
    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─── Command line ────────────────────────────────────────────────────────────

/// FestFriend group server.
#[derive(Parser, Debug)]
#[command(name = "festfriend-server", version, about)]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "FESTFRIEND_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to listen on
    #[arg(short, long, env = "FESTFRIEND_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Argon2 memory cost in KiB
    #[arg(long, env = "FESTFRIEND_HASH_MEMORY_KIB", default_value_t = CredentialParams::default().memory_kib)]
    pub hash_memory_kib: u32,

    /// Argon2 passes
    #[arg(long, env = "FESTFRIEND_HASH_ITERATIONS", default_value_t = CredentialParams::default().iterations)]
    pub hash_iterations: u32,

    /// Argon2 lanes
    #[arg(long, env = "FESTFRIEND_HASH_PARALLELISM", default_value_t = CredentialParams::default().parallelism)]
    pub hash_parallelism: u32,

    /// Largest request body accepted, in bytes
    #[arg(long, env = "FESTFRIEND_MAX_BODY_BYTES", default_value_t = 64 * 1024)]
    pub max_body_bytes: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            credential_params: CredentialParams {
                memory_kib: args.hash_memory_kib,
                iterations: args.hash_iterations,
                parallelism: args.hash_parallelism,
            },
            max_body_bytes: args.max_body_bytes,
        }
    }
}
