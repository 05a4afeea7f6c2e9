use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use tether_scan::{
    DirectoryAssetLoader, NoAssets, Report, ScanWarning, Scanner, SceneGraph, SceneView, Severity,
};
use tether_store::{Category, HookStore};
use tracing::debug;

use crate::cli::*;
use crate::config::TetherConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = TetherConfig::load(&cli.project_root)?;
    // Directories are only created by `init` and by commands that write.
    let store = HookStore::new(config.hooks_dir(&cli.project_root), config.store.clone());
    debug!(root = %store.root().display(), "store handle ready");

    let format = cli.format;
    match cli.command {
        Command::Init => cmd_init(&store).await,
        Command::Put(args) => cmd_put(&store, args).await,
        Command::Get(args) => cmd_get(&store, args).await,
        Command::Exists(args) => cmd_exists(&store, args).await,
        Command::Rm(args) => cmd_rm(&store, args).await,
        Command::Ls(args) => cmd_ls(&store, args, &format).await,
        Command::Sweep => cmd_sweep(&store).await,
        Command::Scan(args) => cmd_scan(&store, args, &format).await,
        Command::ScanAsset(args) => {
            cmd_scan_asset(&store, &config, &cli.project_root, args, &format).await
        }
        Command::Report(args) => cmd_report(&store, args, &format).await,
    }
}

async fn cmd_init(store: &HookStore) -> anyhow::Result<()> {
    let store = HookStore::open(store.root(), store.config().clone())
        .await
        .context("creating hooks directory")?;
    println!("{} Hooks directory ready at {}", "✓".green().bold(), store.root().display().to_string().bold());
    for category in store.categories().await? {
        println!("  {}", category.as_str().cyan());
    }
    Ok(())
}

async fn cmd_put(store: &HookStore, args: PutArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    let value: serde_json::Value =
        serde_json::from_str(&args.value).context("value is not valid JSON")?;
    store.write(&category, &args.filename, &value).await?;
    println!("{} {}/{}", "stored:".green(), category, args.filename);
    Ok(())
}

async fn cmd_get(store: &HookStore, args: KeyArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    match store.read_bytes(&category, &args.filename).await? {
        Some(bytes) => {
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
        None => bail!("{}/{} not found", category, args.filename),
    }
}

async fn cmd_exists(store: &HookStore, args: KeyArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    println!("{}", store.exists(&category, &args.filename).await?);
    Ok(())
}

async fn cmd_rm(store: &HookStore, args: KeyArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    if store.delete(&category, &args.filename).await? {
        println!("{} {}/{}", "removed:".red(), category, args.filename);
    } else {
        println!("{}/{} not found", category, args.filename);
    }
    Ok(())
}

async fn cmd_ls(store: &HookStore, args: LsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;
    let names = store.list(&category).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text => {
            if names.is_empty() {
                println!("No records in {}.", category.as_str().cyan());
            }
            for name in &names {
                println!("  {name}");
            }
        }
    }
    Ok(())
}

async fn cmd_sweep(store: &HookStore) -> anyhow::Result<()> {
    let removed = store.sweep_orphans().await?;
    println!("{} Swept {} orphaned temp file(s).", "✓".green(), removed);
    Ok(())
}

async fn cmd_scan(store: &HookStore, args: ScanArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let scene = SceneGraph::load(&args.scene)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;
    let scanner = Scanner::runtime();
    let report = match &args.object {
        Some(path) => {
            let Some(node) = scene.find(path) else {
                bail!("no object at {path:?} in scene {}", scene.scene_name());
            };
            scanner.scan(&scene, node, !args.no_children)?
        }
        None => scanner.scan_active_tree(&scene),
    };

    finish(store, &report, args.save.as_deref(), format).await?;
    if args.strict && !report.passed() {
        bail!("{} error finding(s) in {}", report.count(Severity::Error), report.scanned_target);
    }
    Ok(())
}

async fn cmd_scan_asset(
    store: &HookStore,
    config: &TetherConfig,
    project_root: &Path,
    args: ScanAssetArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let report = match config.assets_dir(project_root) {
        Some(dir) => Scanner::authoring()
            .scan_external_asset(&DirectoryAssetLoader::new(dir), &args.identifier)?,
        None => Scanner::runtime().scan_external_asset(&NoAssets, &args.identifier)?,
    };
    finish(store, &report, args.save.as_deref(), format).await
}

async fn cmd_report(store: &HookStore, args: ReportArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let filename = report_filename(&args.name);
    let Some(report) = store.read::<Report>(&Category::Validation, &filename).await? else {
        bail!("no saved report named {:?}", args.name);
    };
    print_report(&report, format)
}

async fn finish(
    store: &HookStore,
    report: &Report,
    save: Option<&str>,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    print_report(report, format)?;
    if let Some(name) = save {
        save_report(store, name, report).await?;
        if matches!(format, OutputFormat::Text) {
            println!("{} saved as {}", "✓".green(), report_filename(name).bold());
        }
    }
    Ok(())
}

/// Persist a report under the validation category.
pub(crate) async fn save_report(store: &HookStore, name: &str, report: &Report) -> anyhow::Result<()> {
    store
        .write(&Category::Validation, &report_filename(name), report)
        .await
        .with_context(|| format!("saving report {name:?}"))
}

fn report_filename(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_owned()
    } else {
        format!("{name}.json")
    }
}

fn print_report(report: &Report, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print!("{}", render_report(report)),
    }
    Ok(())
}

pub(crate) fn render_report(report: &Report) -> String {
    let mut out = format!(
        "Scan of {} at {}\n",
        report.scanned_target.bold(),
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    for warning in &report.warnings {
        let ScanWarning::CapabilityUnavailable { capability, detail } = warning;
        out.push_str(&format!("  {} needs {capability}: {detail}\n", "skipped:".yellow()));
    }
    for finding in report.references() {
        let label = match finding.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow(),
        };
        let index = finding
            .array_index
            .map(|i| format!("[{i}]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {label} {} {}.{}{index} (expected {})\n",
            finding.object_path,
            finding.component_type,
            finding.field_name,
            finding.expected_type,
        ));
    }
    let summary = format!(
        "{} field(s) scanned, {} null reference(s): {} error(s), {} warning(s)",
        report.total_fields_scanned,
        report.null_count(),
        report.count(Severity::Error),
        report.count(Severity::Warning),
    );
    if report.passed() {
        out.push_str(&format!("{} {summary}\n", "✓".green().bold()));
    } else {
        out.push_str(&format!("{} {summary}\n", "✗".red().bold()));
    }
    out
}
