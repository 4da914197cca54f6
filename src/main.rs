//! tpkgen CLI
//!
//! Entry point for the `tpkgen` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha256};

use tpkgen::assembler::{PackageAssembler, SigningConfig};
use tpkgen::context::Context;
use tpkgen::scaffold::init_project;
use tpkgen::signature::{SignerIdentity, Xmlsec1Signer};

#[derive(Parser)]
#[command(name = "tpkgen")]
#[command(about = "Build, sign, and package Tizen projects", version)]
struct Cli {
    /// Project root directory (default: current directory)
    #[arg(long, short = 'C', global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an empty Tizen project
    Init,

    /// Build and sign the package archive
    Package {
        /// Author certificate (PKCS#12) used to sign the package
        #[arg(long)]
        author_cert: Option<PathBuf>,

        /// Author certificate passphrase
        #[arg(long, default_value = "")]
        author_pass: String,

        /// Distributor certificate (PKCS#12) used to sign the package
        #[arg(long)]
        dist_cert: Option<PathBuf>,

        /// Distributor certificate passphrase
        #[arg(long, default_value = "")]
        dist_pass: String,

        /// Output archive path (default: <package>.tpk in the project root)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Emit a JSON summary to stdout
        #[arg(long)]
        json: bool,
    },
}

/// Machine-readable build summary for `package --json`
#[derive(Serialize)]
struct PackageSummary {
    package: String,
    sha256: String,
}

fn main() {
    let cli = Cli::parse();
    let project_dir = cli.project.unwrap_or_else(|| PathBuf::from("."));

    let context = match Context::discover(&project_dir) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Init => run_init(&context),
        Commands::Package {
            author_cert,
            author_pass,
            dist_cert,
            dist_pass,
            output,
            json,
        } => {
            let config = SigningConfig {
                author: author_cert.map(|cert| SignerIdentity::new(cert, author_pass)),
                distributor: dist_cert.map(|cert| SignerIdentity::new(cert, dist_pass)),
            };
            run_package(&context, config, output, json)
        }
    };

    if let Err(message) = result {
        eprintln!("Error: {message}");
        process::exit(1);
    }
}

fn run_init(context: &Context) -> Result<(), String> {
    let created = init_project(context).map_err(|err| err.to_string())?;
    println!(
        "Initialized empty Tizen project in {}",
        context.project_root.display()
    );
    for path in created {
        println!("Created: {path}");
    }
    Ok(())
}

fn run_package(
    context: &Context,
    config: SigningConfig,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), String> {
    let manifest = context
        .manifest
        .as_ref()
        .ok_or_else(|| format!("no manifest found in {}", context.project_root.display()))?;

    let output = output
        .unwrap_or_else(|| context.project_root.join(format!("{}.tpk", manifest.package)));

    let mut assembler =
        PackageAssembler::new(Xmlsec1Signer::default(), config).quiet(json);
    let archive = assembler
        .assemble(manifest, &context.project_root, &output)
        .map_err(|err| err.to_string())?;

    let digest = archive_sha256(&archive)?;
    if json {
        let summary = PackageSummary {
            package: archive.display().to_string(),
            sha256: digest,
        };
        let line = serde_json::to_string(&summary).map_err(|err| err.to_string())?;
        println!("{line}");
    } else {
        println!("Created {} (sha256 {digest})", archive.display());
    }
    Ok(())
}

fn archive_sha256(path: &std::path::Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
