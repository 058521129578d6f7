use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pbxsplice::config::{self, Config};
use pbxsplice::document::ManifestDocument;
use pbxsplice::models::*;
use pbxsplice::{engine, render};

#[derive(Parser)]
#[command(name = "pbxsplice")]
#[command(about = "Add, relocate and remove entries in an Xcode project manifest")]
struct Cli {
    /// The project.pbxproj (or .xcodeproj bundle) to edit
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Config file (defaults to <config dir>/pbxsplice/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Apply changes in memory and report, without writing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a JSON change-set (or the one in the config file)
    Apply {
        /// Change-set file
        change_set: Option<PathBuf>,
    },
    /// Reference source files and add them to a group and build phase
    Add {
        /// Paths relative to the group
        #[arg(required = true)]
        paths: Vec<String>,

        /// Group receiving the files
        #[arg(short, long)]
        group: Option<String>,

        /// Build phase for compiled files
        #[arg(short, long, default_value = "Sources")]
        phase: String,

        /// Target owning the build phase
        #[arg(short, long)]
        target: Option<String>,

        /// lastKnownFileType; inferred from the extension when omitted
        #[arg(short, long)]
        kind: Option<String>,

        /// Reuse existing references with the same path
        #[arg(long)]
        idempotent: bool,

        /// Do not add compiled files to a build phase
        #[arg(long)]
        no_build: bool,
    },
    /// Rewrite a file reference's path
    Relocate {
        from: String,
        to: String,

        /// Only consider children of this group
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Remove a Swift package product and everything referring to it
    Remove { product: String },
    /// Point a remote package reference at another repository
    Repoint { from_url: String, to_url: String },
    /// List the records of a section
    Show { section: String },
    /// Print the JSON schema of change-set files
    Schema,
}

/// Initialize tracing on stderr so stdout only carries the report
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pbxsplice=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if cli.manifest.is_some() {
        config.manifest_path = cli.manifest.clone();
    }
    config.dry_run |= cli.dry_run;

    let change_set = match cli.command {
        Commands::Schema => {
            let schema = schemars::schema_for!(ChangeSet);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Show { section } => {
            let doc = ManifestDocument::load(&config.manifest()?)?;
            let section = doc.section(&section)?;
            for record in &section.records {
                println!("{}  {:?}  {}", record.id, record.kind, record.label());
            }
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Apply { change_set } => match change_set {
            Some(path) => config::load_change_set(&path)?,
            None => config.change_set.clone(),
        },
        Commands::Add {
            paths,
            group,
            phase,
            target,
            kind,
            idempotent,
            no_build,
        } => ChangeSet {
            add: paths
                .into_iter()
                .map(|path| FileAddition {
                    path,
                    kind: kind.clone(),
                    group: group.clone(),
                    phase: Some(phase.clone()),
                    target: target.clone(),
                    no_build,
                    idempotent,
                })
                .collect(),
            ..Default::default()
        },
        Commands::Relocate { from, to, group } => ChangeSet {
            relocate: vec![Relocation { from, to, group }],
            ..Default::default()
        },
        Commands::Remove { product } => ChangeSet {
            remove: vec![product],
            ..Default::default()
        },
        Commands::Repoint { from_url, to_url } => ChangeSet {
            repoint: vec![PackageRepoint { from_url, to_url }],
            ..Default::default()
        },
    };

    if change_set.is_empty() {
        anyhow::bail!("Nothing to do: the change-set is empty");
    }

    let manifest = config.manifest()?;
    let report = engine::run(&manifest, &change_set, config.dry_run)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
