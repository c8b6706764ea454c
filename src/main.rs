use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront::config::{load_config, AppConfig, LoggingConfig};
use storefront::editor::{BuilderAction, Direction, EditorSession, Notice, NoticeLevel};
use storefront::model::catalog::{section_templates, theme_presets};
use storefront::model::{Document, SectionType};
use storefront::server::run_http_server;
use storefront::store::{open_store, InMemoryDocumentStore};

/// Storefront builder: compose seller storefronts from typed sections.
#[derive(Parser)]
#[command(name = "storefront")]
#[command(
    about = "Storefront builder engine. Sections, undo/redo history, version snapshots and debounced persistence."
)]
#[command(version)]
struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(short, long, global = true, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the design gateway over HTTP
    Serve,
    /// Walk through an editing session on an in-memory store
    Demo,
    /// Apply a JSON list of editor actions to a seller's design and print it
    Replay {
        /// Seller whose design is edited
        #[arg(short, long)]
        seller: String,
        /// JSON file holding an array of actions
        #[arg(long)]
        script: PathBuf,
        /// Theme preset to start from when the seller has no design yet
        #[arg(short, long)]
        preset: Option<String>,
    },
    /// List the built-in theme presets
    Presets,
    /// List the built-in section templates
    Templates,
    /// Validate a design document and summarize it
    Inspect {
        /// Path to a document JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging);

    let result = match cli.command {
        Commands::Serve => run_serve(&config).await,
        Commands::Demo => run_demo(&config).await,
        Commands::Replay {
            seller,
            script,
            preset,
        } => run_replay(&config, &seller, &script, preset.as_deref()).await,
        Commands::Presets => {
            print_presets();
            Ok(())
        }
        Commands::Templates => {
            print_templates();
            Ok(())
        }
        Commands::Inspect { file } => run_inspect(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output (replay prints JSON)
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_serve(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(&config.storage).await?;
    run_http_server(&config.server, store).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

async fn run_demo(config: &AppConfig) -> anyhow::Result<()> {
    println!("=== Storefront Builder Demo ===\n");

    let store = Arc::new(InMemoryDocumentStore::new());
    println!("[1] Opening a new seller's design from the 'neon' preset...");
    let mut session = EditorSession::open(store.clone(), "demo-seller", Some("neon"), &config.editor)
        .await
        .map_err(notice_error)?;
    print_sections(session.document());

    println!("\n[2] Adding a FAQ and the 'hero-sale' template...");
    show(session.dispatch(BuilderAction::AddSection {
        section_type: SectionType::Faq,
    }));
    show(session.dispatch(BuilderAction::AddFromTemplate {
        template_id: "hero-sale".to_string(),
    }));
    let hero_id = session.document().sections[0].id.clone();
    let faq_id = session
        .document()
        .sections
        .iter()
        .find(|s| s.section_type() == SectionType::Faq)
        .map(|s| s.id.clone())
        .context("demo FAQ section missing")?;
    print_sections(session.document());

    println!("\n[3] Editing the hero and moving the FAQ up...");
    let patch = json!({ "heading": "Instant Game Keys", "buttonText": "Browse" });
    show(session.dispatch(BuilderAction::UpdateSettings {
        id: hero_id.clone(),
        patch: patch.as_object().cloned().unwrap_or_default(),
    }));
    show(session.dispatch(BuilderAction::MoveSection {
        id: faq_id.clone(),
        direction: Direction::Up,
    }));
    print_sections(session.document());

    println!("\n[4] Pasting hero settings onto the FAQ (rejected)...");
    show(session.dispatch(BuilderAction::CopySettings { id: hero_id }));
    show(session.dispatch(BuilderAction::PasteSettings { id: faq_id.clone() }));

    println!("\n[5] Saving a version, removing the FAQ, then restoring...");
    show(session.dispatch(BuilderAction::SaveVersion {
        name: Some("Launch layout".to_string()),
    }));
    show(session.dispatch(BuilderAction::RemoveSection { id: faq_id }));
    println!("  sections after remove: {}", session.document().sections.len());
    let version_id = session.document().version_history[0].id.clone();
    show(session.dispatch(BuilderAction::RestoreVersion { version_id }));
    println!("  sections after restore: {}", session.document().sections.len());

    println!("\n[6] Undo and redo...");
    show(session.dispatch(BuilderAction::Undo));
    println!("  sections after undo: {}", session.document().sections.len());
    show(session.dispatch(BuilderAction::Redo));
    println!("  sections after redo: {}", session.document().sections.len());

    println!("\n[7] Publishing...");
    show(Some(session.publish().await));

    let document = session.close().await;
    println!(
        "\nPublished: {} sections, {} versions, id {}",
        document.published_sections().len(),
        document.version_history.len(),
        document
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<unsaved>".to_string())
    );
    println!("Designs in store: {}", store.len().await);

    println!("\n=== Demo Complete ===");
    Ok(())
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

async fn run_replay(
    config: &AppConfig,
    seller: &str,
    script: &Path,
    preset: Option<&str>,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(script)
        .with_context(|| format!("reading {}", script.display()))?;
    let actions: Vec<BuilderAction> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", script.display()))?;

    let store = open_store(&config.storage).await?;
    let mut session = EditorSession::open(store, seller, preset, &config.editor)
        .await
        .map_err(notice_error)?;

    let mut failures = 0;
    for (step, action) in actions.into_iter().enumerate() {
        if let Some(notice) = session.dispatch(action) {
            if notice.is_error() {
                failures += 1;
            }
            eprintln!("  step {}: {}", step + 1, format_notice(&notice));
        }
    }

    let notice = session.save().await;
    eprintln!("  {}", format_notice(&notice));
    let document = session.close().await;

    println!("{}", serde_json::to_string_pretty(&document)?);
    if failures > 0 {
        tracing::warn!(failures, "some actions were rejected");
    }
    if notice.is_error() {
        anyhow::bail!("failed to save the replayed design");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog and inspection
// ---------------------------------------------------------------------------

fn print_presets() {
    println!("=== Theme Presets ===");
    for preset in theme_presets() {
        let sections: Vec<&str> = preset
            .seeds
            .iter()
            .map(|s| s.section_type().label())
            .collect();
        println!(
            "  {:<8} {:<12} primary {}  font {}",
            preset.id, preset.name, preset.global_styles.primary_color, preset.global_styles.font_family
        );
        println!("           sections: {}", sections.join(", "));
    }
}

fn print_templates() {
    println!("=== Section Templates ===");
    for template in section_templates() {
        println!(
            "  {:<22} {:<22} [{}]{}",
            template.id,
            template.name,
            template.section_type,
            if template.styles.is_some() { " styled" } else { "" }
        );
    }
}

fn run_inspect(file: &Path) -> anyhow::Result<()> {
    let raw =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut document: Document =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    document.normalize();

    println!("Seller:   {}", document.seller_id);
    println!("Preset:   {}", document.theme_preset);
    println!("Active:   {}", document.is_active);
    println!("Versions: {}", document.version_history.len());
    print_sections(&document);

    document.validate()?;
    println!("\nDocument is valid.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn print_sections(document: &Document) {
    println!("  Sections ({}):", document.sections.len());
    for section in &document.sections {
        println!(
            "    {}. {:<18} {}{}",
            section.order,
            section.section_type().label(),
            section.id,
            if section.visible { "" } else { " (hidden)" }
        );
    }
}

fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!("[{}] {}", tag, notice.message)
}

fn notice_error(notice: Notice) -> anyhow::Error {
    anyhow::anyhow!(notice.message)
}

fn show(notice: Option<Notice>) {
    if let Some(notice) = notice {
        println!("  {}", format_notice(&notice));
    }
}
