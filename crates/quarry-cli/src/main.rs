use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quarry_core::{
    mine::mine_header, target::Target, weight::weight_from_sizes, BlockHeader, Hash256,
    HashCacheStats, PowConfig, PowProfile,
};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "quarry-cli")]
#[command(about = "Block header identity hashing, proof-of-work and weight tool")]
struct Cli {
    /// Proof-of-work profile: neoscrypt, scrypt, or a raw flag word (e.g. 0x80000620)
    #[arg(long, global = true, env = "QUARRY_POW_PROFILE", default_value = "neoscrypt")]
    profile: PowProfile,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the identity hash and serialized bytes of a header
    Hash(HeaderArgs),
    /// Print the proof-of-work hash of a header
    Pow(HeaderArgs),
    /// Check a header's proof-of-work against its bits
    Check(HeaderArgs),
    /// Search for a nonce that satisfies the header's bits
    Mine {
        #[command(flatten)]
        header: HeaderArgs,
        /// First nonce to try
        #[arg(long, default_value_t = 0)]
        start_nonce: u32,
    },
    /// Compute block weight from stripped and total serialized sizes
    Weight {
        /// Serialized size without witness data
        #[arg(long)]
        stripped: usize,
        /// Serialized size with witness data
        #[arg(long)]
        total: usize,
    },
}

#[derive(Args, Debug)]
struct HeaderArgs {
    /// Header version
    #[arg(long = "block-version", default_value_t = 1, allow_negative_numbers = true)]
    version: i32,
    /// Previous block hash (display order hex)
    #[arg(long, default_value_t = Hash256::zero())]
    prev: Hash256,
    /// Merkle root (display order hex)
    #[arg(long, default_value_t = Hash256::zero())]
    merkle_root: Hash256,
    /// Block time, seconds since epoch
    #[arg(long, default_value_t = 0)]
    time: u32,
    /// Compact difficulty target, hex
    #[arg(long, value_parser = parse_hex_u32, default_value = "207fffff")]
    bits: u32,
    /// Nonce
    #[arg(long, default_value_t = 0)]
    nonce: u32,
}

impl HeaderArgs {
    fn header(&self) -> BlockHeader {
        BlockHeader::new(
            self.version,
            self.prev,
            self.merkle_root,
            self.time,
            self.bits,
            self.nonce,
        )
    }
}

fn parse_hex_u32(s: &str) -> Result<u32, std::num::ParseIntError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u32::from_str_radix(s, 16)
}

fn emit(as_json: bool, value: serde_json::Value, lines: &[(&str, String)]) {
    if as_json {
        println!("{value}");
    } else {
        for (k, v) in lines {
            println!("{k}: {v}");
        }
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PowConfig {
        profile: cli.profile,
    };
    debug!(?config, params = ?config.profile.params(), "pow configuration");

    match cli.cmd {
        Command::Hash(args) => {
            let mut header = args.header();
            let stats = HashCacheStats::new();
            let hash = header.identity_hash(&stats);
            let serialized = hex::encode(header.serialize());
            emit(
                cli.json,
                json!({ "hash": hash.to_string(), "serialized": serialized }),
                &[("hash", hash.to_string()), ("serialized", serialized)],
            );
        }
        Command::Pow(args) => {
            let header = args.header();
            let pow = header.pow_hash(config.profile);
            emit(
                cli.json,
                json!({ "profile": config.profile.bits(), "pow_hash": pow.to_string() }),
                &[
                    ("profile", config.profile.to_string()),
                    ("pow_hash", pow.to_string()),
                ],
            );
        }
        Command::Check(args) => {
            let header = args.header();
            let target = Target::from_compact(header.bits)
                .with_context(|| format!("decoding bits {:08x}", header.bits))?;
            let pow = header.pow_hash(config.profile);
            let valid = target.is_met_by(&pow);
            emit(
                cli.json,
                json!({ "pow_hash": pow.to_string(), "target": target.to_string(), "valid": valid }),
                &[
                    ("pow_hash", pow.to_string()),
                    ("target", target.to_string()),
                    ("valid", valid.to_string()),
                ],
            );
        }
        Command::Mine {
            header: args,
            start_nonce,
        } => {
            let template = args.header();
            let mined = mine_header(&template, config.profile, start_nonce)
                .context("mining header")?
                .context("nonce space exhausted; change time or merkle root")?;
            info!(nonce = mined.header.nonce, "nonce found");
            let hash = mined.header.compute_identity_hash();
            emit(
                cli.json,
                json!({
                    "nonce": mined.header.nonce,
                    "hash": hash.to_string(),
                    "pow_hash": mined.pow_hash.to_string(),
                }),
                &[
                    ("nonce", mined.header.nonce.to_string()),
                    ("hash", hash.to_string()),
                    ("pow_hash", mined.pow_hash.to_string()),
                ],
            );
        }
        Command::Weight { stripped, total } => {
            anyhow::ensure!(
                total >= stripped,
                "total size {total} is smaller than stripped size {stripped}"
            );
            let weight = weight_from_sizes(stripped, total);
            emit(
                cli.json,
                json!({ "weight": weight }),
                &[("weight", weight.to_string())],
            );
        }
    }
    Ok(())
}
