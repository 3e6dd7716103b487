use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use schemadiff::{generate_migration, MigrateOptions, MigrateOutcome};

#[derive(Parser)]
#[command(name = "schemadiff")]
#[command(author, version, about = "Fast migration generator for ORM schema snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff the two newest schema snapshots and generate migration files
    Migrate {
        /// Directory holding the schema snapshot JSON files
        #[arg(short = 'p', long, default_value = "build/schema")]
        path: PathBuf,

        /// Target database dialect (e.g. mysql)
        #[arg(short, long, default_value = "mysql")]
        dialect: String,

        /// Output directory for generated migration files
        #[arg(long, default_value = "build/migrations")]
        out: PathBuf,

        /// Explicit baseline snapshot to diff the newest snapshot against
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Also generate the reverse (rollback) migration
        #[arg(long)]
        rollback: bool,

        /// Also generate a changeset-format changelog (YAML)
        #[arg(long)]
        changelog: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            path,
            dialect,
            out,
            baseline,
            rollback,
            changelog,
        } => {
            let options = MigrateOptions {
                schema_dir: path,
                dialect,
                output_dir: out,
                baseline,
                rollback,
                changelog,
            };

            match generate_migration(&options) {
                Ok(MigrateOutcome::NoChanges) => {
                    println!("No changes detected.");
                    ExitCode::SUCCESS
                }
                Ok(MigrateOutcome::Generated { written, warnings }) => {
                    for warning in &warnings {
                        eprintln!("warning: {}", warning);
                    }
                    println!("Migration files generated successfully:");
                    for path in &written {
                        println!("  {}", path.display());
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("Migration failed: {}", err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
