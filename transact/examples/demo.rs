//! Walkthrough of the transaction lifecycle: build, fee, encode, id,
//! group, sign, and decode, printed step by step with ANSI colors.
//!
//! Run with:
//!   cargo run --example demo

use std::time::Instant;

use algokit_transact::crypto::{verify_signature, Ed25519Signer, TransactionSigner};
use algokit_transact::identity::{Address, MultisigSignature};
use algokit_transact::msgpack::CanonicalMsgpack;
use algokit_transact::transaction::{
    assign_group, sign_multisig, sign_transaction, AssetTransferTransactionFields, FeeParams,
    PaymentTransactionFields, SignedTransaction, Transaction, TransactionBuilder, TransactionId,
    TransactionRecord,
};
use algokit_transact::get_encoded_transaction_type;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                          {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    algokit-transact  --  Canonical Transaction Walkthrough {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                          {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]============================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}----------------------------------------------------------{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.3} ms]{RESET}");
}

fn hex_preview(bytes: &[u8]) -> String {
    let full = hex::encode(bytes);
    if full.len() <= 48 {
        return full;
    }
    format!("{}...{} ({} bytes)", &full[..24], &full[full.len() - 16..], bytes.len())
}

fn payment(sender: Address, receiver: Address, amount: u64, note: &str) -> Transaction {
    TransactionBuilder::new(sender, 1_000, 2_000)
        .genesis_id("testnet-v1.0")
        .genesis_hash([0x48u8; 32])
        .note(note.as_bytes().to_vec())
        .build(PaymentTransactionFields {
            receiver,
            amount,
            close_remainder_to: None,
        })
        .expect("valid payment")
}

fn main() {
    banner();

    let alice = Ed25519Signer::from_seed(&[0xA1u8; 32]);
    let bob = Ed25519Signer::from_seed(&[0xB0u8; 32]);

    section(1, "Build a payment");
    let tx = payment(alice.address(), bob.address(), 2_500_000, "rent, march");
    info("sender", &alice.address().to_string());
    info("receiver", &bob.address().to_string());
    info("type", &tx.transaction_type().to_string());
    success("validated at build time");

    section(2, "Assign a fee");
    let params = FeeParams::new(1, 1_000).with_max_fee(10_000);
    let tx = tx.assign_fee(&params).expect("fee within limit");
    info("fee", &format!("{} microAlgos", tx.fee()));

    section(3, "Encode and hash");
    let start = Instant::now();
    let bytes = tx.encode().expect("encodes");
    timing("encode", start.elapsed());
    info("bytes", &hex_preview(&bytes));
    info("id", &tx.id().expect("id"));
    info(
        "sniffed type",
        &get_encoded_transaction_type(&bytes).expect("sniffs").to_string(),
    );

    section(4, "Group with an asset opt-in");
    let opt_in = TransactionBuilder::new(bob.address(), 1_000, 2_000)
        .genesis_id("testnet-v1.0")
        .genesis_hash([0x48u8; 32])
        .fee(1_000)
        .build(AssetTransferTransactionFields::opt_in(31_566_704, bob.address()))
        .expect("valid opt-in");
    let grouped = assign_group(&[tx, opt_in]).expect("groups");
    if let Some(group) = grouped[0].header().group {
        info("group", &hex_preview(&group));
    }
    for (i, member) in grouped.iter().enumerate() {
        info(&format!("member {i} id"), &member.id().expect("id"));
    }

    section(5, "Sign");
    let signed = sign_transaction(&grouped[0], &alice).expect("signs");
    let signature = signed.signature.expect("single signature");
    let verified = verify_signature(
        &alice.address(),
        &grouped[0].encode().expect("encodes"),
        &signature,
    );
    info("signature", &hex_preview(&signature));
    if verified {
        success("signature verifies over the TX-prefixed bytes");
    }

    let msig = MultisigSignature::new(1, 1, vec![alice.address(), bob.address()])
        .expect("valid multisig");
    info("multisig address", &msig.address().to_string());
    let shared = payment(msig.address(), alice.address(), 10, "");
    let msig_signed = sign_multisig(&shared, msig, &bob).expect("bob is a participant");
    info(
        "multisig signatures",
        &msig_signed
            .multisignature
            .as_ref()
            .map_or(0, MultisigSignature::signature_count)
            .to_string(),
    );

    section(6, "Wire envelope and decode");
    let wire = signed.encode().expect("encodes");
    info("envelope", &hex_preview(&wire));
    let decoded = SignedTransaction::decode(&wire).expect("decodes");
    if decoded == signed {
        success("envelope round-trips");
    }

    let record: TransactionRecord = decoded.transaction.into();
    println!();
    println!(
        "{DIM}{}{RESET}",
        serde_json::to_string_pretty(&record).expect("record serializes")
    );
    println!();
}
