use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use cardano_address::{
    AddressKind, ConversionError, ConversionRequest, ConversionResponse, ErrorResponse, Network,
    codec, convert_addresses, decode_address, hex_to_bech32,
};

/// Exit status for unexpected failures.
const EXIT_FAILURE: u8 = 1;
/// Exit status for input the caller has to correct.
const EXIT_BAD_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "cardano-address")]
#[command(about = "Convert hex Cardano addresses to Bech32", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network id to encode for: 0 = testnet, 1 = mainnet
    #[arg(long, global = true, env = "CARDANO_NETWORK_ID", default_value_t = 1)]
    network_id: u8,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single hex address
    Convert {
        /// Hex-encoded address (or bare stake key hash for reward addresses)
        hex: String,

        /// payment or reward
        #[arg(short, long, default_value = "payment")]
        kind: AddressKind,
    },

    /// Convert a payment and/or a reward address, printing JSON
    Batch {
        /// Hex-encoded payment address
        #[arg(long)]
        payment: Option<String>,

        /// Hex-encoded reward address or stake key hash
        #[arg(long)]
        reward: Option<String>,
    },

    /// Read a JSON request body from a file (or `-` for stdin), printing JSON
    Request {
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Decode a Bech32 address into its parts
    Decode { address: String },
}

/// Why a command did not succeed.
enum Failure {
    /// The caller has to correct the input
    Input(ErrorResponse),
    /// Anything else
    Unexpected(Report),
}

impl From<ConversionError> for Failure {
    fn from(e: ConversionError) -> Self {
        Failure::Input(ErrorResponse::from(&e))
    }
}

impl From<Report> for Failure {
    fn from(e: Report) -> Self {
        Failure::Unexpected(e)
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    codec::self_check().wrap_err("Bech32 codec failed its startup check")?;
    debug!("Bech32 codec self-check passed");

    let (body, code) = match run(cli) {
        Ok(()) => return Ok(ExitCode::SUCCESS),
        Err(Failure::Input(body)) => {
            warn!(details = %body.details, "request rejected");
            (body, EXIT_BAD_INPUT)
        }
        Err(Failure::Unexpected(e)) => {
            error!(error = %e, "unexpected failure");
            (
                ErrorResponse::new("Failed to convert addresses", format!("{e:#}")),
                EXIT_FAILURE,
            )
        }
    };
    print_json(&body)?;
    Ok(ExitCode::from(code))
}

fn run(cli: Cli) -> Result<(), Failure> {
    match cli.command {
        Commands::Request { input } => {
            let body = read_input(&input)?;
            let request: ConversionRequest = serde_json::from_str(&body)
                .map_err(|e| Failure::Input(ErrorResponse::new("Invalid request", e)))?;
            print_json(&request.convert()?)?;
        }
        Commands::Batch { payment, reward } => {
            let network = Network::try_from(cli.network_id)?;
            let result = convert_addresses(payment.as_deref(), reward.as_deref(), network)?;
            print_json(&ConversionResponse::from(result))?;
        }
        Commands::Convert { hex, kind } => {
            let network = Network::try_from(cli.network_id)?;
            let addr = hex_to_bech32(&hex, kind, network)?;
            println!("{addr}");
        }
        Commands::Decode { address } => {
            let decoded = decode_address(&address)?;
            println!("Network         : {}", decoded.network);
            println!("Kind            : {}", decoded.kind);
            println!("Address Type    : {}", decoded.header.address_type);
            println!("Header          : 0x{:02X}", decoded.header.byte());
            for (i, credential) in decoded.credentials_hex().iter().enumerate() {
                println!("Credential {i}    : {credential}");
            }
            if let Some(pointer) = decoded.pointer {
                println!(
                    "Pointer         : slot {}, tx {}, cert {}",
                    pointer.slot, pointer.tx_index, pointer.cert_index
                );
            }
            if let Some(m) = decoded.network_mismatch() {
                println!("Warning         : {m}");
            }
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .wrap_err("failed to read request from stdin")?;
        Ok(body)
    } else {
        fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "debug"
    } else {
        "warn,cardano_address=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}
