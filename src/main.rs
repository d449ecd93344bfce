use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vpr_registration_core::{
    IdentifierCatalog, IdentifierSynchroniser, RegistrationConfig, RegistrationForm,
    change_identifier_source, remove_identifier,
};

#[derive(Parser)]
#[command(name = "vpr-registration")]
#[command(about = "Patient registration identifier fields")]
struct Cli {
    /// Write the resulting form to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add the fields for primary, required and default identifier types
    Sync {
        /// Identifier-type catalog (YAML or JSON)
        #[arg(long, env = "VPR_REGISTRATION_CATALOG")]
        catalog: PathBuf,
        /// Registration configuration (YAML or JSON)
        #[arg(long, env = "VPR_REGISTRATION_CONFIG")]
        config: Option<PathBuf>,
        /// Form snapshot (JSON); an empty form when omitted
        #[arg(long)]
        form: Option<PathBuf>,
    },
    /// Remove one identifier field
    Remove {
        /// Form snapshot (JSON)
        #[arg(long)]
        form: PathBuf,
        /// Field name to remove
        #[arg(long)]
        field: String,
    },
    /// Change the source of one identifier field
    SelectSource {
        /// Identifier-type catalog (YAML or JSON)
        #[arg(long, env = "VPR_REGISTRATION_CATALOG")]
        catalog: PathBuf,
        /// Form snapshot (JSON)
        #[arg(long)]
        form: PathBuf,
        /// Field name whose source changes
        #[arg(long)]
        field: String,
        /// Uuid of the new source
        #[arg(long)]
        source: String,
    },
}

/// Entry point for the registration identifier CLI.
///
/// Loads the inputs named on the command line, applies one operation and prints the
/// resulting form snapshot as JSON. Logs go to stderr; set `RUST_LOG` to adjust verbosity.
///
/// # Environment Variables
/// - `VPR_REGISTRATION_CATALOG`: default catalog path
/// - `VPR_REGISTRATION_CONFIG`: default configuration path
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vpr_registration=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let form = match cli.command {
        Commands::Sync {
            catalog,
            config,
            form,
        } => sync(&catalog, config.as_deref(), form.as_deref())?,
        Commands::Remove { form, field } => remove(&form, &field)?,
        Commands::SelectSource {
            catalog,
            form,
            field,
            source,
        } => select_source(&catalog, &form, &field, &source)?,
    };

    match cli.output {
        Some(path) => form
            .save(&path)
            .with_context(|| format!("writing form to {}", path.display()))?,
        None => println!("{}", form.render()?),
    }

    Ok(())
}

/// Load the inputs and run the synchroniser until it settles.
fn sync(
    catalog_path: &Path,
    config_path: Option<&Path>,
    form_path: Option<&Path>,
) -> anyhow::Result<RegistrationForm> {
    let catalog = IdentifierCatalog::load(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let config = match config_path {
        Some(path) => RegistrationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RegistrationConfig::default(),
    };
    let mut form = load_form(form_path)?;

    let mut synchroniser = IdentifierSynchroniser::new(config).with_catalog(catalog);
    let added = synchroniser.settle(&mut form)?;
    if added.is_empty() {
        tracing::info!("identifier fields already up to date");
    }

    Ok(form)
}

fn remove(form_path: &Path, field: &str) -> anyhow::Result<RegistrationForm> {
    let mut form = load_form(Some(form_path))?;
    if !form.identifiers.contains_key(field) {
        tracing::warn!("no identifier field named {}; form unchanged", field);
    }
    form.identifiers = remove_identifier(&form.identifiers, field);
    Ok(form)
}

fn select_source(
    catalog_path: &Path,
    form_path: &Path,
    field: &str,
    source: &str,
) -> anyhow::Result<RegistrationForm> {
    let catalog = IdentifierCatalog::load(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let mut form = load_form(Some(form_path))?;
    change_identifier_source(&mut form, &catalog, field, source)?;
    Ok(form)
}

fn load_form(path: Option<&Path>) -> anyhow::Result<RegistrationForm> {
    match path {
        Some(path) => RegistrationForm::load(path)
            .with_context(|| format!("loading form {}", path.display())),
        None => Ok(RegistrationForm::default()),
    }
}
