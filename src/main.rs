use active_advisors::cli::{self, ExportFormat, ExportOptions, ViewOptions};
use active_advisors::types::SortField;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "advisors")]
#[command(about = "Filter advisor workbooks to active advisors and export ranked XLSX/PDF reports.")]
#[command(long_about = "Active Advisors - spreadsheet import and styled report export

Reads one or more advisor workbooks (.xlsx / .xls), keeps rows whose
'Advisor Status' is active, and exports the combined table.

COMMANDS:
  show    - Print the active advisors as a ranked table
  export  - Write a banded spreadsheet and/or a single-page PDF

SORTING:
  Each --sort is one click on a column header: clicking the same column
  again flips the order, clicking a new column starts ascending.

EXAMPLES:
  advisors show jan.xlsx feb.xlsx --sort premium --sort premium
  advisors export jan.xlsx --format pdf --header-text \"TOP ADVISORS 2025\"
  advisors export jan.xlsx --rename A1029=\"Nimal Perera\" --format both")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active advisors as a ranked table
    Show {
        /// Advisor workbooks (.xlsx / .xls)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Sort click: premium | policies (repeat to toggle order)
        #[arg(short, long = "sort", value_parser = cli::parse_sort_field)]
        sort: Vec<SortField>,

        /// Rename an advisor: CODE=NAME
        #[arg(short, long = "rename", value_parser = cli::parse_rename)]
        rename: Vec<(String, String)>,
    },

    #[command(long_about = "Export the active advisors.

XLSX: one 'Active Advisors' sheet with a rank column, styled header row and
rank banding (1-3, 4-10, 11+).

PDF: a single page sized to the table, with a title band (brand mark +
header text) and the same rank banding. Page height is
ceil((12 + 4.5 * rows + 8 + 5) * height-multiplier) mm.

Without --output, files are named active_advisors[_sorted_by_<field>_<order>].<ext>
inside --out-dir.")]
    /// Export the active advisors to XLSX and/or PDF
    Export {
        /// Advisor workbooks (.xlsx / .xls)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "both")]
        format: ExportFormat,

        /// Output file (with --format both, the extension is replaced per format)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for automatically named outputs
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Sort click: premium | policies (repeat to toggle order)
        #[arg(short, long = "sort", value_parser = cli::parse_sort_field)]
        sort: Vec<SortField>,

        /// Rename an advisor: CODE=NAME
        #[arg(short, long = "rename", value_parser = cli::parse_rename)]
        rename: Vec<(String, String)>,

        /// Layout config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// PDF title text
        #[arg(long, env = "ADVISORS_HEADER_TEXT")]
        header_text: Option<String>,

        /// PDF page-height multiplier, 1.05 to 2.0
        #[arg(long, env = "ADVISORS_HEIGHT_MULTIPLIER")]
        height_multiplier: Option<f64>,

        /// Brand image (PNG/JPEG) for the PDF title band
        #[arg(long)]
        brand_mark: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "active_advisors=debug,advisors=debug"
    } else {
        "active_advisors=info,advisors=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show {
            files,
            sort,
            rename,
        } => {
            cli::show(
                files,
                ViewOptions {
                    sort_clicks: sort,
                    renames: rename,
                },
            )
            .await?
        }

        Commands::Export {
            files,
            format,
            output,
            out_dir,
            sort,
            rename,
            config,
            header_text,
            height_multiplier,
            brand_mark,
        } => {
            cli::export(ExportOptions {
                files,
                format,
                output,
                out_dir,
                view: ViewOptions {
                    sort_clicks: sort,
                    renames: rename,
                },
                config,
                header_text,
                height_multiplier,
                brand_mark,
            })
            .await?
        }
    }

    Ok(())
}
