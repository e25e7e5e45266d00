//! # CLI Interface
//!
//! Defines the command-line argument structure for `transact-cli` using
//! `clap` derive. Subcommands: `encode`, `decode`, `id`, `type`, `sign`.
//!
//! Transactions go in as JSON records (see `TransactionRecord`) and come
//! out as hex, or the reverse. Any positional input may be `-` to read it
//! from stdin.

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Canonical encoder, decoder, and signer for Algorand transactions.
#[derive(Parser, Debug)]
#[command(
    name = "transact-cli",
    about = "Canonical encoder, decoder, and signer for Algorand transactions",
    version,
    propagate_version = true
)]
pub struct TransactCli {
    /// Default log filter when `RUST_LOG` is unset, e.g. `debug` or
    /// `algokit_transact=trace`.
    #[arg(long, global = true, env = "TRANSACT_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format. Logs always go to stderr.
    #[arg(
        long,
        global = true,
        env = "TRANSACT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a JSON transaction record to hex.
    Encode(EncodeArgs),
    /// Decode hex bytes (with or without the `TX` prefix) to a JSON record.
    Decode(InputArgs),
    /// Print the transaction id of a JSON record or hex-encoded transaction.
    Id(InputArgs),
    /// Print the kind of a hex-encoded transaction without decoding it.
    Type(InputArgs),
    /// Sign a JSON transaction record and print the signed envelope as hex.
    Sign(SignArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Inline value, or `-` for stdin.
    pub input: String,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Omit the `TX` domain prefix.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Hex-encoded 32-byte Ed25519 seed.
    ///
    /// **Never pass real keys on a shared machine**: arguments are visible
    /// to other users. Prefer the environment variable.
    #[arg(long, env = "TRANSACT_SEED", hide_env_values = true)]
    pub seed: String,

    /// Set the fee before signing: microAlgos per byte.
    #[arg(long)]
    pub fee_per_byte: Option<u64>,

    /// Set the fee before signing: minimum fee in microAlgos.
    #[arg(long, requires = "fee_per_byte")]
    pub min_fee: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        TransactCli::command().debug_assert();
    }

    #[test]
    fn parses_encode_raw() {
        let cli = TransactCli::try_parse_from(["transact-cli", "encode", "--raw", "{}"]).unwrap();
        match cli.command {
            Commands::Encode(args) => {
                assert!(args.raw);
                assert_eq!(args.input.input, "{}");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_log_flags_after_subcommand() {
        let cli = TransactCli::try_parse_from([
            "transact-cli",
            "type",
            "-",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn min_fee_requires_fee_per_byte() {
        let result = TransactCli::try_parse_from([
            "transact-cli",
            "sign",
            "--seed",
            "00",
            "--min-fee",
            "1000",
            "{}",
        ]);
        assert!(result.is_err());
    }
}
