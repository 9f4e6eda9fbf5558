// File: src/bin/p6health.rs
// Command-line entry point: import, list projects or run the assessment.
use anyhow::{Context, Result, bail};
use p6health::cli::{parse_import, print_help};
use p6health::model::ProjectRow;
use p6health::settings::{CheckSettings, SettingsRepository};
use p6health::store::MemoryStore;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

struct Args {
    input: PathBuf,
    project: Option<i64>,
    settings: Option<PathBuf>,
    json: bool,
    verbose: bool,
}

fn parse_args(argv: &[String]) -> Result<Option<Args>> {
    let mut input = None;
    let mut project = None;
    let mut settings = None;
    let mut json = false;
    let mut verbose = false;

    let mut it = argv.iter().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(None),
            "-p" | "--project" => {
                let val = it.next().context("--project requires a value")?;
                project = Some(val.parse::<i64>().context("--project must be numeric")?);
            }
            "-s" | "--settings" => {
                let val = it.next().context("--settings requires a path")?;
                settings = Some(PathBuf::from(val));
            }
            "--json" => json = true,
            "-v" | "--verbose" => verbose = true,
            other if other.starts_with('-') => bail!("unknown option: {other}"),
            other => {
                if input.is_some() {
                    bail!("only one input file is supported");
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    let Some(input) = input else {
        return Ok(None);
    };
    Ok(Some(Args {
        input,
        project,
        settings,
        json,
        verbose,
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let binary = argv
        .first()
        .map(|s| s.as_str())
        .unwrap_or("p6health")
        .to_string();

    let Some(args) = parse_args(&argv)? else {
        print_help(&binary);
        return Ok(());
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let doc = parse_import(&text)?;
    let store = MemoryStore::new(doc);

    let Some(proj_id) = args.project else {
        list_projects(&store);
        return Ok(());
    };

    let settings = match &args.settings {
        Some(path) => SettingsRepository::new(path.clone()).load()?,
        None => CheckSettings::default(),
    };

    let report = p6health::run_all(&store, proj_id, &settings).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn list_projects(store: &MemoryStore) {
    let rows = store.document().rows("PROJECT");
    if rows.is_empty() {
        println!("No projects found in the export.");
        return;
    }
    println!("Projects in this export (use --project <id>):");
    for row in rows {
        if let Some(p) = ProjectRow::from_row(row) {
            println!(
                "  {:>10}  {}  data date: {}",
                p.proj_id,
                p.short_name.as_deref().unwrap_or("-"),
                p.data_date
                    .map(|d| d.date().to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
        }
    }
}
