//! CLI entry point for polguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `polguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use polguard_app::{
    CheckInput, format_ruleset_listing, list_builtin_rulesets, render_markdown,
    render_markdown_from_json, run_check, verdict_exit_code, write_report, write_text,
};
use polguard_settings::Overrides;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "polguard",
    version,
    about = "Compliance policy engine for third-party artifacts"
)]
struct Cli {
    /// Path to polguard config TOML. A missing file means defaults.
    #[arg(long, default_value = "polguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|audit).
    #[arg(long)]
    profile: Option<String>,

    /// Override when the check fails (fail|warn|never).
    #[arg(long)]
    fail_on: Option<String>,

    /// Override maximum violations to emit.
    #[arg(long)]
    max_violations: Option<u32>,

    /// Rule set identifier to load; repeatable. Replaces the configured list.
    #[arg(long = "ruleset", value_name = "IDENTIFIER")]
    rulesets: Vec<String>,

    /// Glob over canonical purls of artifacts to skip; repeatable.
    #[arg(long)]
    exclude: Vec<String>,

    /// Worker threads for evaluation (default: one per CPU).
    #[arg(long)]
    threads: Option<usize>,

    /// Log debug output to stderr. `POLGUARD_LOG` takes precedence.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate policy against an inventory and write artifacts.
    Check {
        /// Inventory JSON file, or a directory of inventory files.
        #[arg(long, default_value = "inventory.json")]
        inventory: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/polguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/polguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/polguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// List the built-in rule sets and their rules.
    Rulesets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref inventory,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, inventory, report_out, write_markdown, markdown_out),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Rulesets => cmd_rulesets(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("POLGUARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber installed by an embedding test harness wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_check(
    cli: &Cli,
    inventory: &Utf8Path,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;

        let overrides = Overrides {
            profile: cli.profile.clone(),
            rulesets: cli.rulesets.clone(),
            fail_on: cli.fail_on.clone(),
            max_violations: cli.max_violations,
            exclude: cli.exclude.clone(),
        };

        let input = CheckInput {
            inventory,
            config_text: &cfg_text,
            overrides,
            threads: cli.threads,
        };

        let output = run_check(input)?;
        eprint!("{}", output.ruleset_description);

        write_report(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&output.report);
            write_text(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("polguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Config file contents; a missing file yields an empty string so defaults apply.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(config = %path, "config file not found; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let md = render_markdown_from_json(&report_text)?;

    if let Some(out_path) = output {
        write_text(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_rulesets() -> anyhow::Result<()> {
    let listings = list_builtin_rulesets().context("resolve built-in rule sets")?;
    print!("{}", format_ruleset_listing(&listings));
    Ok(())
}
