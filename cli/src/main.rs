//! dumpdoc CLI - branch report decoding and PDF report tool

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use dumpdoc::render::to_json;
use dumpdoc::{
    decode_files, detect_report_from_path, BranchReport, DecodeOptions, Dumpdoc, FontSet, JsonFormat,
    LayoutConfig, PdfRenderer, ReportMarkers, SectionTree, Sorting,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "dumpdoc")]
#[command(version)]
#[command(about = "Decode branch activity reports and render them as PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode report files to JSON
    Decode {
        /// Input report files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// What to emit
        #[arg(long, value_enum, default_value = "agents")]
        view: View,

        /// Sort agents before output
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        /// Skip malformed blocks instead of failing
        #[arg(long)]
        lenient: bool,

        /// JSON file overriding report markers
        #[arg(long, value_name = "FILE", env = "DUMPDOC_MARKERS")]
        markers: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show report information
    Info {
        /// Input report file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Paginate a section tree and print the layout as JSON
    Layout {
        /// Section tree JSON
        #[arg(value_name = "TREE")]
        input: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a section tree JSON file to PDF
    Render {
        /// Section tree JSON
        #[arg(value_name = "TREE")]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Decode a report and render it as a PDF report
    Report {
        /// Input report file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Branch name (defaults to the file name)
        #[arg(long)]
        branch: Option<String>,

        /// Agent ordering
        #[arg(long, value_enum, default_value = "name")]
        sort: SortKey,

        /// Skip malformed blocks instead of failing
        #[arg(long)]
        lenient: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct StyleArgs {
    /// Layout configuration JSON
    #[arg(long, value_name = "FILE", env = "DUMPDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Use the built-in Courier faces instead of the configured TrueType files
    #[arg(long)]
    courier: bool,
}

impl StyleArgs {
    fn load(&self) -> Result<(LayoutConfig, FontSet), Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => LayoutConfig::from_json_file(path)?,
            None => LayoutConfig::default(),
        };
        let fonts = if self.courier {
            FontSet::courier()
        } else {
            FontSet::load(&config.font)?
        };
        Ok((config, fonts))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    /// Agents with their operations
    Agents,
    /// One row per agent
    AgentRows,
    /// One row per agent and category
    OperationRows,
    /// Branch totals
    Summary,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SortKey {
    /// Alphabetically by name
    Name,
    /// By total operation count
    Operations,
}

impl From<SortKey> for Sorting {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => Sorting::Name,
            SortKey::Operations => Sorting::Operations,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Decode {
            inputs,
            output,
            view,
            sort,
            lenient,
            markers,
            compact,
        }) => cmd_decode(
            &inputs,
            output.as_deref(),
            view,
            sort,
            lenient,
            markers.as_deref(),
            compact,
        ),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Layout {
            input,
            style,
            output,
        }) => cmd_layout(&input, &style, output.as_deref()),
        Some(Commands::Render {
            input,
            output,
            style,
        }) => cmd_render(&input, output.as_deref(), &style),
        Some(Commands::Report {
            input,
            output,
            branch,
            sort,
            lenient,
            style,
        }) => cmd_report(&input, output.as_deref(), branch, sort, lenient, &style),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: dumpdoc <COMMAND>".yellow());
            println!("       dumpdoc --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn branch_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Branch names for each input; two inputs may not share a name.
fn unique_branch_names(inputs: &[PathBuf]) -> Result<Vec<String>, String> {
    let mut seen: BTreeMap<String, &Path> = BTreeMap::new();
    let mut names = Vec::with_capacity(inputs.len());
    for path in inputs {
        let name = branch_name(path);
        if let Some(previous) = seen.insert(name.clone(), path) {
            return Err(format!(
                "{} and {} both map to branch {:?}",
                previous.display(),
                path.display(),
                name
            ));
        }
        names.push(name);
    }
    Ok(names)
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_decode(
    inputs: &[PathBuf],
    output: Option<&Path>,
    view: View,
    sort: Option<SortKey>,
    lenient: bool,
    markers: Option<&Path>,
    compact: bool,
) -> CliResult {
    let mut options = DecodeOptions::new();
    if lenient {
        options = options.lenient();
    }
    if let Some(path) = markers {
        let markers: ReportMarkers = serde_json::from_str(&fs::read_to_string(path)?)?;
        options = options.with_markers(markers);
    }

    let names = unique_branch_names(inputs)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Decoding {} file(s)...", inputs.len()));

    let results = decode_files(inputs, &options);
    pb.finish_and_clear();
    log::debug!("decoded {} file(s), view {:?}", results.len(), view);

    let mut reports = Vec::with_capacity(inputs.len());
    for ((path, name), result) in inputs.iter().zip(names).zip(results) {
        let agents = result.map_err(|e| format!("{}: {}", path.display(), e))?;
        let mut report = BranchReport::new(name, agents);
        if let Some(key) = sort {
            report = report.sorted(key.into());
        }
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        reports.push((report, size));
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let values = reports
        .iter()
        .map(|(report, size)| {
            let value = match view {
                View::Agents => serde_json::to_value(&report.agents),
                View::AgentRows => serde_json::to_value(report.agent_views()),
                View::OperationRows => serde_json::to_value(report.operation_views()),
                View::Summary => serde_json::to_value(report.summary(*size)),
            };
            value.map(|v| (report.name.clone(), v))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let json = if values.len() == 1 {
        to_json(&values[0].1, format)?
    } else {
        let by_branch: BTreeMap<String, serde_json::Value> = values.into_iter().collect();
        to_json(&by_branch, format)?
    };

    write_or_print(output, &json)
}

fn cmd_info(input: &Path) -> CliResult {
    let format = detect_report_from_path(input)?;

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {} bytes", "Size".bold(), format.byte_len);
    println!("{}: {}", "Format".bold(), format);
    println!(
        "{}: {}",
        "Table".bold(),
        if format.is_complete() { "Yes" } else { "No" }
    );

    if !format.is_complete() {
        return Ok(());
    }

    // Lenient so that one bad block still shows totals for the rest
    let result = Dumpdoc::new().lenient().decode(input)?;
    let summary = result.summary();

    println!();
    println!("{}", "Branch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Branch".bold(), summary.name);
    println!("{}: {}", "Agent blocks".bold(), format.block_count);
    println!("{}: {}", "Agents".bold(), summary.total_agents);
    println!("{}: {}", "Operations".bold(), summary.total_operations);

    Ok(())
}

fn read_tree(input: &Path) -> Result<SectionTree, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&fs::read_to_string(input)?)?)
}

fn cmd_layout(input: &Path, style: &StyleArgs, output: Option<&Path>) -> CliResult {
    let tree = read_tree(input)?;
    let (config, fonts) = style.load()?;

    let doc = dumpdoc::layout(&tree, &config, &fonts)?;
    let json = to_json(&doc, JsonFormat::Pretty)?;

    write_or_print(output, &json)
}

fn cmd_render(input: &Path, output: Option<&Path>, style: &StyleArgs) -> CliResult {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.with_extension("pdf"));

    let tree = read_tree(input)?;
    let (config, fonts) = style.load()?;

    write_pdf(&tree, &config, &fonts, &output)
}

fn cmd_report(
    input: &Path,
    output: Option<&Path>,
    branch: Option<String>,
    sort: SortKey,
    lenient: bool,
    style: &StyleArgs,
) -> CliResult {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.with_extension("pdf"));
    let (config, fonts) = style.load()?;

    let mut builder = Dumpdoc::new()
        .with_sorting(sort.into())
        .with_layout_config(config.clone());
    if lenient {
        builder = builder.lenient();
    }
    if let Some(name) = branch {
        builder = builder.with_branch(name);
    }

    let result = builder.decode(input)?;
    println!(
        "{} {} agents",
        "Decoded".green(),
        result.agents().len()
    );

    write_pdf(&result.to_section_tree(), &config, &fonts, &output)
}

fn write_pdf(tree: &SectionTree, config: &LayoutConfig, fonts: &FontSet, output: &Path) -> CliResult {
    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Laying out sections...");
    let doc = dumpdoc::layout(tree, config, fonts)?;
    log::debug!("laid out {} sections on {} pages", doc.section_count(), doc.page_count());
    pb.inc(1);

    pb.set_message("Writing PDF...");
    let result = PdfRenderer::new(config, fonts).render_with_stats(&doc)?;
    fs::write(output, &result.bytes)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} ({} pages, {} sections)",
        "Saved to".green().bold(),
        output.display(),
        result.stats.page_count,
        result.stats.section_count
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "dumpdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Branch report decoder and PDF report generator");
}
