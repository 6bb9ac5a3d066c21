mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_pages::{EditScript, ExportOptions, PageWorkspace, Quality, SelectionMode, StepOutcome};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfp", about = "Split, rearrange and merge PDF pages", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count and page sizes
    Info {
        /// Input PDF files
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Merge pages of one or more PDFs into a single document
    Merge {
        /// Input PDF file(s), pages are concatenated in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Pages to keep, 1-based over all inputs (e.g. "1,3-5")
        #[arg(long)]
        pages: Option<String>,

        /// Output quality
        #[arg(long, default_value = "high", value_enum)]
        quality: QualityArg,
    },

    /// Rotate pages of a PDF
    Rotate {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Clockwise rotation, snapped to a multiple of 90
        #[arg(long, default_value = "90", allow_hyphen_values = true)]
        degrees: i32,

        /// Pages to rotate, 1-based (default: all)
        #[arg(long)]
        pages: Option<String>,
    },

    /// Run a JSON edit script
    Run {
        /// Script file
        script: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => Self::Low,
            QualityArg::Medium => Self::Medium,
            QualityArg::High => Self::High,
        }
    }
}

/// Parse "1,3-5" into sorted, deduplicated 1-based page numbers.
fn parse_ranges(input: &str) -> Result<Vec<usize>> {
    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: usize = start
                .trim()
                .parse()
                .with_context(|| format!("Invalid range start: {}", start))?;
            let end: usize = end
                .trim()
                .parse()
                .with_context(|| format!("Invalid range end: {}", end))?;
            if start == 0 || start > end {
                bail!("Invalid page range: {}", part);
            }
            pages.extend(start..=end);
        } else {
            let page: usize = part
                .parse()
                .with_context(|| format!("Invalid page: {}", part))?;
            if page == 0 {
                bail!("Pages are numbered from 1");
            }
            pages.insert(page);
        }
    }

    if pages.is_empty() {
        bail!("No pages given in '{}'", input);
    }
    Ok(pages.into_iter().collect())
}

async fn load_workspace(inputs: &[PathBuf]) -> Result<PageWorkspace> {
    let mut workspace = PageWorkspace::new();
    if workspace.import_files(inputs).await == 0 {
        bail!("No pages imported");
    }
    Ok(workspace)
}

/// Select pages by 1-based position; positions past the end are reported.
fn select_positions(workspace: &mut PageWorkspace, positions: &[usize]) -> Result<()> {
    let page_count = workspace.pages().len();
    for &position in positions {
        let Some(page) = workspace.pages().get(position - 1) else {
            bail!("Page {} does not exist ({} pages)", position, page_count);
        };
        let id = page.id.clone();
        workspace.select(&id);
    }
    Ok(())
}

async fn write_output(bytes: Vec<u8>, output: &Path) -> Result<()> {
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::Info { files } => {
            for file in files {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let doc = pdf_pages::pdf::load_document(&bytes)?;
                let pages = doc.get_pages();
                println!("{}: {} pages", file.display(), pages.len());
                for (number, page_id) in pages {
                    let visible = pdf_pages::pdf::visible_box(&doc, page_id);
                    println!(
                        "  page {}: {} x {} pt",
                        number, visible.width, visible.height
                    );
                }
            }
        }

        Commands::Merge {
            input,
            output,
            pages,
            quality,
        } => {
            let mut workspace = load_workspace(&input).await?;
            let mode = match pages {
                Some(ranges) => {
                    select_positions(&mut workspace, &parse_ranges(&ranges)?)?;
                    SelectionMode::Selection
                }
                None => SelectionMode::All,
            };

            let options = ExportOptions {
                quality: quality.into(),
                ..Default::default()
            };
            let page_count = pdf_pages::select_pages(workspace.pages(), mode, workspace.selection()).len();
            let bytes = workspace.export(mode, &options).await?;
            write_output(bytes, &output).await?;
            println!("Merged {} pages → {}", page_count, output.display());
        }

        Commands::Rotate {
            input,
            output,
            degrees,
            pages,
        } => {
            let mut workspace = load_workspace(std::slice::from_ref(&input)).await?;
            let positions = match pages {
                Some(ranges) => parse_ranges(&ranges)?,
                None => (1..=workspace.pages().len()).collect(),
            };

            select_positions(&mut workspace, &positions)?;
            let ids: Vec<_> = workspace.selection().iter().cloned().collect();
            for id in &ids {
                workspace.rotate(id, degrees).await?;
            }

            let bytes = workspace
                .export(SelectionMode::All, &ExportOptions::default())
                .await?;
            write_output(bytes, &output).await?;
            println!("Rotated {} pages → {}", ids.len(), output.display());
        }

        Commands::Run { script } => {
            let edit_script = EditScript::load(&script)
                .await
                .with_context(|| format!("Failed to load {}", script.display()))?;
            let mut workspace = PageWorkspace::new();
            let outcomes = edit_script.run(&mut workspace).await;

            let mut failed = 0;
            for (index, outcome) in outcomes.iter().enumerate() {
                match outcome {
                    StepOutcome::Exported { path, page_count } => {
                        println!("Exported {} pages → {}", page_count, path.display());
                    }
                    StepOutcome::Failed(reason) => {
                        eprintln!("Step {} failed: {}", index + 1, reason);
                        failed += 1;
                    }
                    _ => {}
                }
            }
            println!(
                "{} steps applied ({} failed), {} pages active, {} in trash",
                outcomes.len() - failed,
                failed,
                workspace.pages().len(),
                workspace.trash().len()
            );
        }
    }

    Ok(())
}
