use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wgmon::checks::{self, CheckArgs, CheckOutcome, Direction};
use wgmon::error::CheckError;
use wgmon::verdict::Verdict;

#[derive(Parser, Debug)]
#[command(name = "check_wgmon", version)]
#[command(about = "Check plugin to monitor a WireGuard gateway running wgmon-agent")]
struct Cli {
    /// Hostname or IP address of the agent
    #[arg(short = 'H', long, global = true)]
    hostname: Option<String>,

    /// Agent port
    #[arg(short, long, global = true, default_value_t = 5665)]
    port: u16,

    /// Request timeout in seconds
    #[arg(short, long, global = true, default_value_t = 90)]
    timeout: u64,

    /// Warning threshold; the tier is never raised when unset
    #[arg(short, long, global = true)]
    warning: Option<f64>,

    /// Critical threshold; the tier is never raised when unset
    #[arg(short, long, global = true)]
    critical: Option<f64>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Device uptime in seconds
    #[command(visible_aliases = ["up", "u"])]
    Uptime,
    /// CPU usage in percent; thresholds compare against user plus system
    #[command(visible_alias = "c")]
    Cpu,
    /// Memory usage in percent; thresholds compare against used plus cached
    #[command(visible_aliases = ["mem", "m"])]
    Memory,
    /// Data rates of a network device in kbit/s
    #[command(visible_aliases = ["net", "n"])]
    Network {
        /// Device to query
        #[arg(short, long, global = true)]
        device: Option<String>,

        #[command(subcommand)]
        metric: StreamMetric,
    },
    /// WireGuard peer metrics
    #[command(visible_aliases = ["wg", "w"])]
    Wireguard {
        /// Peer to query, addressed by the final octet of its internal IP
        #[arg(short = 'P', long, global = true)]
        peer: Option<u8>,

        #[command(subcommand)]
        metric: WireguardMetric,
    },
}

#[derive(Subcommand, Debug)]
enum StreamMetric {
    /// Transmit rate, in kbit/s
    #[command(visible_aliases = ["up", "u"])]
    Upstream,
    /// Receive rate, in kbit/s
    #[command(visible_aliases = ["down", "d"])]
    Downstream,
}

#[derive(Subcommand, Debug)]
enum WireguardMetric {
    /// Seconds since the last handshake with the gateway
    #[command(visible_alias = "hs")]
    Handshake,
    /// Transmit rate towards the peer, in kbit/s
    #[command(visible_aliases = ["up", "u"])]
    Upstream,
    /// Receive rate from the peer, in kbit/s
    #[command(visible_aliases = ["down", "d"])]
    Downstream,
}

impl From<&StreamMetric> for Direction {
    fn from(metric: &StreamMetric) -> Self {
        match metric {
            StreamMetric::Upstream => Direction::Upstream,
            StreamMetric::Downstream => Direction::Downstream,
        }
    }
}

async fn run(cli: &Cli) -> Result<CheckOutcome, CheckError> {
    let args = CheckArgs {
        hostname: cli.hostname.clone().unwrap_or_default(),
        port: cli.port,
        timeout_secs: cli.timeout,
        warning: cli.warning,
        critical: cli.critical,
    };
    args.validate()?;
    let client = args.client()?;

    match &cli.command {
        Command::Uptime => checks::check_uptime(&client, args.warning, args.critical).await,
        Command::Cpu => checks::check_cpu(&client, args.warning, args.critical).await,
        Command::Memory => checks::check_memory(&client, args.warning, args.critical).await,
        Command::Network { device, metric } => {
            let device = device.as_deref().ok_or_else(|| {
                CheckError::InvalidArguments("no network device was given".into())
            })?;
            checks::check_network(&client, device, metric.into(), args.warning, args.critical)
                .await
        }
        Command::Wireguard { peer, metric } => {
            let peer = peer
                .ok_or_else(|| CheckError::InvalidArguments("no peer index was given".into()))?;
            match metric {
                WireguardMetric::Handshake => {
                    checks::check_peer_handshake(&client, peer, args.warning, args.critical).await
                }
                WireguardMetric::Upstream => {
                    checks::check_peer_stream(
                        &client,
                        peer,
                        Direction::Upstream,
                        args.warning,
                        args.critical,
                    )
                    .await
                }
                WireguardMetric::Downstream => {
                    checks::check_peer_stream(
                        &client,
                        peer,
                        Direction::Downstream,
                        args.warning,
                        args.critical,
                    )
                    .await
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // clap's own exit code for usage errors is 2, which would read as
    // CRITICAL to the monitoring system. Map parse failures to UNKNOWN and
    // keep --help/--version at 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => Verdict::Unknown.exit_code(),
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::new("debug"))
            .init();
    }

    let outcome = match run(&cli).await {
        Ok(outcome) => outcome,
        Err(e) => CheckOutcome {
            verdict: Verdict::Unknown,
            message: e.to_string(),
        },
    };

    println!("{}", outcome.line());
    std::process::exit(outcome.verdict.exit_code());
}
