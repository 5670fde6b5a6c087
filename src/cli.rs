//! Command line for splitting and recovering secrets.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::{rngs::StdRng, RngCore, SeedableRng};

use msp::{MemoryDatabase, Predicate};

#[derive(Parser)]
#[command(version, about("Monotone span program secret sharing"), long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Split(Split),
    Recover(Recover),
}

pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Split(cmd) => cmd.run(),
        Commands::Recover(cmd) => cmd.run(),
    }
}

/// Split a secret into per-participant share files.
#[derive(Parser)]
pub struct Split {
    /// Access predicate, threshold form or infix.
    #[arg(short, long)]
    predicate: String,

    /// Secret as base64, or a file holding it. Generated when omitted.
    #[arg(short, long)]
    secret: Option<String>,

    /// Size of a generated secret in bytes (16 or 32).
    #[arg(long, default_value_t = 16)]
    size: usize,

    /// Directory for <participant>.shares files; stdout when omitted.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
}

impl Split {
    fn run(&self) -> Result<(), String> {
        let predicate: Predicate = self.predicate.parse().map_err(display)?;

        let (generated, secret) = self.get_secret()?;
        if generated {
            eprintln!("Secret: {}", STANDARD.encode(&secret));
        }

        let mut db = MemoryDatabase::new();
        for name in predicate.participants() {
            db.register(name);
        }

        let mut rng = StdRng::from_entropy();
        let shares = predicate
            .distribute_shares(&secret, &db, &mut rng)
            .map_err(display)?;

        match &self.output {
            Some(dir) => {
                fs::create_dir_all(dir)
                    .map_err(|e| format!("could not create {}: {e}", dir.display()))?;
                for (name, list) in &shares {
                    let path = dir.join(format!("{name}.shares"));
                    let lines: Vec<String> = list.iter().map(|s| STANDARD.encode(s)).collect();
                    fs::write(&path, lines.join("\n") + "\n")
                        .map_err(|e| format!("could not write {}: {e}", path.display()))?;
                }
                eprintln!(
                    "{}",
                    format!(
                        "Wrote shares for {} participants to {}",
                        shares.len(),
                        dir.display()
                    )
                    .green()
                );
            }
            None => {
                for (name, list) in &shares {
                    for share in list {
                        println!("{name}: {}", STANDARD.encode(share));
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the secret and whether it was freshly generated.
    fn get_secret(&self) -> Result<(bool, Vec<u8>), String> {
        match &self.secret {
            None => {
                if self.size != 16 && self.size != 32 {
                    return Err(format!("generated secrets are 16 or 32 bytes, not {}", self.size));
                }
                let mut rng = StdRng::from_entropy();
                let mut secret = vec![0u8; self.size];
                rng.fill_bytes(&mut secret);
                Ok((true, secret))
            }
            Some(arg) => {
                // File path or inline base64, whichever exists.
                let path = Path::new(arg);
                let encoded = if path.exists() {
                    fs::read_to_string(path)
                        .map_err(|e| format!("could not read {}: {e}", path.display()))?
                        .trim()
                        .to_string()
                } else {
                    arg.clone()
                };
                let secret = STANDARD
                    .decode(&encoded)
                    .map_err(|e| format!("could not decode the secret from base64: {e}"))?;
                Ok((false, secret))
            }
        }
    }
}

/// Recover a secret from a directory of share files.
#[derive(Parser)]
pub struct Recover {
    /// Access predicate, threshold form or infix.
    #[arg(short, long)]
    predicate: String,

    /// Directory of <participant>.shares files.
    #[arg(short, long, value_name = "DIR")]
    shares: PathBuf,
}

impl Recover {
    fn run(&self) -> Result<(), String> {
        let predicate: Predicate = self.predicate.parse().map_err(display)?;

        let mut db = MemoryDatabase::new();
        let entries = fs::read_dir(&self.shares)
            .map_err(|e| format!("could not read {}: {e}", self.shares.display()))?;
        for entry in entries {
            let path = entry.map_err(display)?.path();
            if path.extension().map_or(true, |ext| ext != "shares") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)
                .map_err(|e| format!("could not read {}: {e}", path.display()))?;
            let mut list = Vec::new();
            for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let share = STANDARD
                    .decode(line)
                    .map_err(|e| format!("bad share in {}: {e}", path.display()))?;
                list.push(share);
            }
            db.insert_shares(name, list);
        }

        let secret = predicate.recover_secret(&db).map_err(display)?;
        eprintln!("{}", "Recovered secret.".green());
        println!("{}", STANDARD.encode(secret));
        Ok(())
    }
}

fn display(err: impl std::fmt::Display) -> String {
    err.to_string()
}
