//! Syndra command line: keygen, sign, verify
//!
//! Thin binding of the core operations. A cryptographic reject exits 0 with
//! the verdict on stdout and in the report; only configuration and I/O
//! failures exit non-zero.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use syndra_core::artifacts::{self, OutputDir, SIGNATURE_FILE};
use syndra_core::digest::message_digest;
use syndra_core::{
    generate_keys, get_or_generate, sign, verify, CodeParams, GenOptions, KeySet, MatrixCache,
    MatrixKind, SchemeParams, Verdict,
};
use tracing_subscriber::EnvFilter;
use utils::rng::secure_rng;

#[derive(Parser)]
#[command(
    name = "syndra",
    version,
    about = "Code-based signatures over concatenated binary codes"
)]
struct Cli {
    /// Matrix cache directory
    #[arg(long, default_value = "matrix_cache", global = true)]
    cache_dir: PathBuf,

    /// Output directory for signing artifacts and the report
    #[arg(long, default_value = "output", global = true)]
    output_dir: PathBuf,

    /// Parameter file
    #[arg(long, default_value = "params.txt", global = true)]
    params: PathBuf,

    /// Dump matrices and intermediate products into the report
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate H_A, G1 and G2 (and their seeds in seed mode)
    Keygen(KeygenArgs),
    /// Sign a message file
    Sign(SignArgs),
    /// Verify a signature file against a message file
    Verify(VerifyArgs),
}

#[derive(Args)]
struct KeygenArgs {
    /// Persist and reuse 32-byte seeds so keys are reproducible
    #[arg(long)]
    use_seed: bool,

    /// Discard cached matrices and rebuild them
    #[arg(long)]
    regenerate: bool,

    /// Derive all parameters from a BCH-style point: n = 2^M - 1, k = M*T,
    /// d = 2T + 1
    #[arg(long, num_args = 2, value_names = ["M", "T"], conflicts_with_all = ["g1", "g2"])]
    bch: Option<Vec<u32>>,

    /// Explicit n k d for the first inner code
    #[arg(long, num_args = 3, value_names = ["N", "K", "D"], requires = "g2")]
    g1: Option<Vec<u32>>,

    /// Explicit n k d for the second inner code
    #[arg(long, num_args = 3, value_names = ["N", "K", "D"], requires = "g1")]
    g2: Option<Vec<u32>>,
}

#[derive(Args)]
struct SignArgs {
    /// Message file to sign
    #[arg(short)]
    message: PathBuf,

    /// Extra copy of the signature, next to output/signature.txt
    #[arg(short)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Message file the signature claims to cover
    #[arg(short)]
    message: PathBuf,

    /// Signature file to check
    #[arg(short)]
    signature: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cache = MatrixCache::new(&cli.cache_dir);
    let output = OutputDir::new(&cli.output_dir);

    match &cli.command {
        Command::Keygen(args) => run_keygen(&cli, &cache, &output, args),
        Command::Sign(args) => run_sign(&cli, &cache, &output, args),
        Command::Verify(args) => run_verify(&cli, &cache, &output, args),
    }
}

fn run_keygen(
    cli: &Cli,
    cache: &MatrixCache,
    output: &OutputDir,
    args: &KeygenArgs,
) -> anyhow::Result<()> {
    let params = resolve_params(args, &cli.params)?;
    params.save(&cli.params).context("saving parameters")?;

    println!(
        "C1 parameters: {} {} {}",
        params.c1.n, params.c1.k, params.c1.d
    );
    println!(
        "C2 parameters: {} {} {}",
        params.c2.n, params.c2.k, params.c2.d
    );
    println!(
        "C_A parameters: {} {} {}",
        params.c_a.n, params.c_a.k, params.c_a.d
    );

    let opts = GenOptions {
        use_seed: args.use_seed,
        regenerate: args.regenerate,
    };
    let mut rng = secure_rng();
    let keys = generate_keys(&params, cache, opts, &mut rng)?;

    if let Some(seed) = keys.seeds.h_a {
        println!("H_A seed: {seed}");
    }
    if let Some(seed) = keys.seeds.g1 {
        println!("G1 seed: {seed}");
    }
    if let Some(seed) = keys.seeds.g2 {
        println!("G2 seed: {seed}");
    }

    if cli.debug {
        let mut report = output.report()?;
        report_keys(&mut report, &keys)?;
        report.finish()?;
    }

    Ok(())
}

fn run_sign(
    cli: &Cli,
    cache: &MatrixCache,
    output: &OutputDir,
    args: &SignArgs,
) -> anyhow::Result<()> {
    let params = SchemeParams::load(&cli.params).context("loading parameters")?;
    let message = fs::read(&args.message)
        .with_context(|| format!("reading message file {}", args.message.display()))?;

    let opts = GenOptions {
        use_seed: true,
        regenerate: false,
    };
    let mut rng = secure_rng();
    let keys = generate_keys(&params, cache, opts, &mut rng)?;

    let out = sign(&message, &params, &keys.h_a, &keys.g1, &keys.g2);
    output.write_sign_artifacts(&out)?;
    if let Some(path) = &args.output {
        artifacts::save_matrix_file(path, &out.signature)?;
    }

    let mut report = output.report()?;
    if cli.debug {
        report_keys(&mut report, &keys)?;
        report.matrix("Hash", &out.digest)?;
        report.matrix("Public key F", &out.public_key)?;
        report.matrix("Signature", &out.signature)?;
    }
    report.line(&format!("Signature weight: {}", out.signature.weight()))?;
    report.finish()?;

    let sig_path = args
        .output
        .clone()
        .unwrap_or_else(|| output.path(SIGNATURE_FILE));
    println!("signature written to {}", sig_path.display());
    Ok(())
}

fn run_verify(
    cli: &Cli,
    cache: &MatrixCache,
    output: &OutputDir,
    args: &VerifyArgs,
) -> anyhow::Result<()> {
    let params = SchemeParams::load(&cli.params).context("loading parameters")?;
    let message = fs::read(&args.message)
        .with_context(|| format!("reading message file {}", args.message.display()))?;

    let n_a = params.c_a.n as usize;
    let r = params.c_a.redundancy() as usize;
    let k_a = params.c_a.k as usize;

    let digest = message_digest(&message, k_a);
    let signature = artifacts::load_matrix_file(&args.signature, 1, n_a)?;
    let public_key = output.load_public_key(r, k_a)?;

    let opts = GenOptions {
        use_seed: true,
        regenerate: false,
    };
    let mut rng = secure_rng();
    let (h_a, _) = get_or_generate(cache, MatrixKind::ParityCheck, params.c_a, opts, &mut rng)?;

    let verification = verify(&digest, &signature, &public_key, &h_a);

    let mut report = output.report()?;
    if cli.debug {
        report.matrix("Hash", &digest.transpose())?;
    }
    report.verification(&verification)?;
    report.finish()?;

    match verification.verdict {
        Verdict::Accept => println!("Verified: True"),
        Verdict::Reject => println!("Verified: False"),
    }
    Ok(())
}

fn resolve_params(args: &KeygenArgs, path: &Path) -> anyhow::Result<SchemeParams> {
    if let Some(bch) = &args.bch {
        return Ok(SchemeParams::from_bch(bch[0], bch[1])?);
    }
    if let (Some(g1), Some(g2)) = (&args.g1, &args.g2) {
        let c1 = CodeParams {
            n: g1[0],
            k: g1[1],
            d: g1[2],
        };
        let c2 = CodeParams {
            n: g2[0],
            k: g2[1],
            d: g2[2],
        };
        return Ok(SchemeParams::from_inner(c1, c2)?);
    }
    if path.exists() {
        return Ok(SchemeParams::load(path)?);
    }
    bail!(
        "no parameters: pass --bch M T or --g1/--g2 N K D, or provide {}",
        path.display()
    );
}

fn report_keys(report: &mut artifacts::Report, keys: &KeySet) -> syndra_core::Result<()> {
    report.matrix("H_A", &keys.h_a)?;
    report.matrix("G1", &keys.g1)?;
    report.matrix("G2", &keys.g2)
}
