use anyhow::bail;
use clap::Parser;
use url::Url;

/// Runtime configuration for the `stddev-server` binary.
///
/// These settings control the listen address, the upstream integers API and
/// its draw bounds, and the timeout/buffering behavior of the aggregation
/// pipeline. All values are parsed from CLI arguments or environment
/// variables, with defaults matching the reference deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "stddev-server",
    version,
    about = "An HTTP service streaming standard deviations of random integer sets"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Base URL of the upstream integers API.
    ///
    /// The service appends the draw parameters (`num`, `min`, `max`) plus
    /// the fixed plain-text format parameters on every request.
    ///
    /// Environment variable: `SOURCE_URL`
    #[arg(long, env = "SOURCE_URL", default_value_t = String::from("https://www.random.org/integers/"))]
    pub source_url: String,

    /// Smallest integer a draw may contain (inclusive).
    ///
    /// Environment variable: `SOURCE_MIN`
    #[arg(long, env = "SOURCE_MIN", default_value_t = 1)]
    pub source_min: i64,

    /// Largest integer a draw may contain (inclusive).
    ///
    /// Environment variable: `SOURCE_MAX`
    #[arg(long, env = "SOURCE_MAX", default_value_t = 10)]
    pub source_max: i64,

    /// Timeout for one upstream draw, in seconds.
    ///
    /// Applies per outbound HTTP request; a draw that exceeds it fails the
    /// whole service request.
    ///
    /// Environment variable: `SOURCE_TIMEOUT_SECS`
    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value_t = 10)]
    pub source_timeout_secs: u64,

    /// Overall timeout for one service request, in seconds.
    ///
    /// Enforced by the HTTP middleware stack, covering validation, the full
    /// fan-out, and response serialization.
    ///
    /// Environment variable: `REQUEST_TIMEOUT_SECS`
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Capacity of the aggregator's result buffer.
    ///
    /// This affects how many statistic results the aggregator can produce
    /// before the coordinator starts draining them. Correctness does not
    /// depend on it; higher values let the aggregator run further ahead.
    ///
    /// Environment variable: `STREAM_BUFFER_SIZE`
    #[arg(long, env = "STREAM_BUFFER_SIZE", default_value_t = 8)]
    pub stream_buffer_size: usize,
}

/// Validated runtime configuration, shared across the service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub source_url: Url,
    pub source_min: i64,
    pub source_max: i64,
    pub source_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub stream_buffer_size: usize,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.source_min > args.source_max {
            bail!(
                "SOURCE_MIN ({}) must not exceed SOURCE_MAX ({})",
                args.source_min,
                args.source_max
            );
        }

        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        let source_url = Url::parse(&args.source_url)?;

        Ok(Self {
            server_addr: args.server_addr,
            source_url,
            source_min: args.source_min,
            source_max: args.source_max,
            source_timeout_secs: args.source_timeout_secs,
            request_timeout_secs: args.request_timeout_secs,
            stream_buffer_size: args.stream_buffer_size,
        })
    }
}
