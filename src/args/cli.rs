use std::time::Duration;

use clap::{Parser, Subcommand};

use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::PositiveUsize;

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Benchmark file uploads against the agent's /write route
    Write,
    /// Benchmark file downloads against the agent's /read route
    Read,
    /// Benchmark repeated concurrent batches of one write plus one read
    Mixed,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async micro-benchmark CLI for distributed file system agents - sequential, burst, and mixed-batch request timing with exact integer statistics."
)]
pub struct BenchArgs {
    #[command(subcommand)]
    pub command: Command,

    /// The IP address or hostname of the entrypoint agent
    #[arg(long, short = 'H', default_value = "localhost")]
    pub host: String,

    /// The port the entrypoint agent is listening on
    #[arg(long, short = 'P', default_value_t = 1234)]
    pub port: u16,

    /// The file to benchmark with; uploads send its contents, reads request its name
    #[arg(long, short = 'f')]
    pub file: String,

    /// Number of sequential trials (and of batch repetitions for mixed runs)
    #[arg(long, short = 'n', default_value = "10", value_parser = parse_positive_usize)]
    pub trials: PositiveUsize,

    /// Number of concurrent requests launched in the burst phase
    #[arg(long, short = 'b', default_value = "20", value_parser = parse_positive_usize)]
    pub burst: PositiveUsize,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Abort any single measured invocation after this long (supports ms/s/m/h)
    #[arg(long = "op-timeout", value_parser = parse_duration_arg)]
    pub op_timeout: Option<Duration>,

    /// Cap on concurrently active requests; unbounded when unset
    #[arg(long = "concurrency-limit", value_parser = parse_positive_usize)]
    pub concurrency_limit: Option<PositiveUsize>,

    /// Path to a TOML/JSON config file (dfsbench.toml / dfsbench.json are probed by default)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
