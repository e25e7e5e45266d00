// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # transact-cli
//!
//! Entry point for the `transact-cli` binary. Parses CLI arguments,
//! initializes logging, and runs one codec operation. Results go to stdout,
//! logs to stderr.
//!
//! - `encode`: JSON record to hex
//! - `decode`: hex to JSON record
//! - `id`:     transaction id of a JSON record or hex transaction
//! - `type`:   kind of a hex transaction
//! - `sign`:   JSON record to signed envelope hex

mod cli;
mod logging;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use algokit_transact::crypto::Ed25519Signer;
use algokit_transact::msgpack::CanonicalMsgpack;
use algokit_transact::transaction::{sign_transaction, TransactionId};
use algokit_transact::{
    decode_transaction, encode_signed_transaction, encode_transaction, encode_transaction_raw,
    get_encoded_transaction_type, FeeParams, Transaction, TransactionRecord,
};

use cli::{Commands, EncodeArgs, InputArgs, SignArgs, TransactCli};

fn main() -> Result<()> {
    let cli = TransactCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let output = match cli.command {
        Commands::Encode(args) => encode(args)?,
        Commands::Decode(args) => decode(args)?,
        Commands::Id(args) => id(args)?,
        Commands::Type(args) => sniff(args)?,
        Commands::Sign(args) => sign(args)?,
    };
    println!("{output}");
    Ok(())
}

/// Returns the positional input, reading stdin when it is `-`.
fn read_input(args: &InputArgs) -> Result<String> {
    if args.input != "-" {
        return Ok(args.input.clone());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn parse_record(text: &str) -> Result<TransactionRecord> {
    serde_json::from_str(text.trim()).context("input is not a valid transaction record")
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).context("input is not valid hex")
}

fn encode(args: EncodeArgs) -> Result<String> {
    let record = parse_record(&read_input(&args.input)?)?;
    let bytes = if args.raw {
        encode_transaction_raw(&record)
    } else {
        encode_transaction(&record)
    }
    .context("failed to encode transaction")?;
    tracing::info!(len = bytes.len(), raw = args.raw, "encoded transaction");
    Ok(hex::encode(bytes))
}

fn decode(args: InputArgs) -> Result<String> {
    let bytes = parse_hex(&read_input(&args)?)?;
    let record = decode_transaction(&bytes).context("failed to decode transaction")?;
    serde_json::to_string_pretty(&record).context("failed to render record as JSON")
}

fn id(args: InputArgs) -> Result<String> {
    let input = read_input(&args)?;
    let tx = if input.trim_start().starts_with('{') {
        Transaction::try_from(parse_record(&input)?).context("invalid transaction record")?
    } else {
        Transaction::decode(&parse_hex(&input)?).context("failed to decode transaction")?
    };
    tx.id().context("failed to compute transaction id")
}

fn sniff(args: InputArgs) -> Result<String> {
    let bytes = parse_hex(&read_input(&args)?)?;
    let transaction_type =
        get_encoded_transaction_type(&bytes).context("failed to determine transaction type")?;
    Ok(transaction_type.to_string())
}

fn sign(args: SignArgs) -> Result<String> {
    let signer = Ed25519Signer::from_hex(&args.seed).context("invalid signing seed")?;
    let record = parse_record(&read_input(&args.input)?)?;
    let mut tx = Transaction::try_from(record).context("invalid transaction record")?;

    if let Some(fee_per_byte) = args.fee_per_byte {
        let params = FeeParams::new(fee_per_byte, args.min_fee.unwrap_or(0));
        tx = tx.assign_fee(&params).context("failed to assign fee")?;
    }

    let signed = sign_transaction(&tx, &signer).context("failed to sign transaction")?;
    tracing::info!(
        id = %signed.id().context("failed to compute transaction id")?,
        rekeyed = signed.auth_address.is_some(),
        "signed transaction"
    );
    let bytes = encode_signed_transaction(&signed).context("failed to encode signed transaction")?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_json() -> String {
        serde_json::json!({
            "transaction_type": "Payment",
            "sender": "AEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEA5RCDXMI",
            "first_valid": 10,
            "last_valid": 20,
            "payment": {
                "receiver": "AIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBMXPWWNQ",
                "amount": 3
            }
        })
        .to_string()
    }

    fn input(text: &str) -> InputArgs {
        InputArgs {
            input: text.to_string(),
        }
    }

    #[test]
    fn encode_then_decode() {
        let hex_out = encode(EncodeArgs {
            input: input(&payment_json()),
            raw: false,
        })
        .unwrap();
        assert!(hex_out.starts_with(&hex::encode(b"TX")));

        let json = decode(input(&hex_out)).unwrap();
        let record: TransactionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parse_record(&payment_json()).unwrap());
    }

    #[test]
    fn id_agrees_for_json_and_hex() {
        let hex_out = encode(EncodeArgs {
            input: input(&payment_json()),
            raw: true,
        })
        .unwrap();
        assert_eq!(id(input(&payment_json())).unwrap(), id(input(&hex_out)).unwrap());
    }

    #[test]
    fn type_prints_variant_name() {
        let hex_out = encode(EncodeArgs {
            input: input(&payment_json()),
            raw: false,
        })
        .unwrap();
        assert_eq!(sniff(input(&hex_out)).unwrap(), "Payment");
    }

    #[test]
    fn sign_produces_envelope() {
        let out = sign(SignArgs {
            input: input(&payment_json()),
            seed: "07".repeat(32),
            fee_per_byte: Some(0),
            min_fee: Some(1000),
        })
        .unwrap();
        let bytes = hex::decode(out).unwrap();
        // fixmap with sig, sgnr (signer is not the sender), txn
        assert_eq!(bytes[0], 0x83);
    }

    #[test]
    fn bad_hex_is_reported() {
        let err = decode(input("zz")).unwrap_err();
        assert!(err.to_string().contains("not valid hex"));
    }
}
