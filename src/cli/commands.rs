use crate::config::LayoutConfig;
use crate::core::{rank_rows, Session};
use crate::error::{AdvisorError, AdvisorResult};
use crate::excel::AdvisorImporter;
use crate::pdf::layout::{format_thousands, truncate_name};
use crate::types::{BandTier, SortField};
use colored::{ColoredString, Colorize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Export target selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
    Both,
}

impl ExportFormat {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Xlsx => &["xlsx"],
            ExportFormat::Pdf => &["pdf"],
            ExportFormat::Both => &["xlsx", "pdf"],
        }
    }
}

/// Edits and sort clicks applied after import, in command-line order
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub sort_clicks: Vec<SortField>,
    pub renames: Vec<(String, String)>,
}

/// Options for the export command
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub files: Vec<PathBuf>,
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub view: ViewOptions,
    pub config: Option<PathBuf>,
    pub header_text: Option<String>,
    pub height_multiplier: Option<f64>,
    pub brand_mark: Option<PathBuf>,
}

/// Parse `CODE=New Name`
pub fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((code, name)) if !code.trim().is_empty() => {
            Ok((code.trim().to_string(), name.trim().to_string()))
        }
        _ => Err(format!("expected CODE=NAME, got '{}'", s)),
    }
}

/// Parse a sortable column name for clap
pub fn parse_sort_field(s: &str) -> Result<SortField, String> {
    SortField::parse(s).map_err(|e| e.to_string())
}

/// Import every file, then apply renames and sort clicks
async fn build_session(files: Vec<PathBuf>, view: &ViewOptions) -> AdvisorResult<Session> {
    for file in &files {
        if !AdvisorImporter::is_supported_path(file) {
            println!(
                "   {} {} is not .xlsx/.xls; trying anyway",
                "⚠️".yellow(),
                file.display()
            );
        }
    }

    let mut session = Session::new();
    let reports = session.import_files(files).await;

    let mut first_error = None;
    for report in reports {
        match report.outcome {
            Ok(count) => println!("   {} {} ({} active)", "✅".green(), report.path.display(), count),
            Err(e) => {
                println!("   {} {}: {}", "❌".red(), report.path.display(), e);
                first_error.get_or_insert(e);
            }
        }
    }
    if session.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    for (code, name) in &view.renames {
        if session.edit_name(code, name) == 0 {
            println!("   {} no advisor with code {}", "⚠️".yellow(), code.bold());
        }
    }
    for field in &view.sort_clicks {
        session.click_sort(*field);
    }
    Ok(session)
}

fn tier_paint(tier: BandTier, text: String) -> ColoredString {
    match tier {
        BandTier::Top => text.white().on_red().bold(),
        BandTier::Upper => text.cyan(),
        BandTier::Rest => text.green(),
    }
}

fn print_table(session: &Session) {
    println!();
    println!(
        "{}",
        format!("Active Advisors ({})", session.len()).bold().purple()
    );
    if let Some(sorted_by) = session.sort_state().describe() {
        println!("{}", sorted_by.bright_black());
    }
    if session.is_empty() {
        println!("No active advisors found. Please upload an Excel file with advisor data.");
        return;
    }

    println!(
        "{}",
        format!(
            "{:>4}  {:<12} {:<40} {:<10} {:>14} {:>24}",
            "#",
            "Advisor Code",
            "Advisor Name",
            "Status",
            SortField::NoOfPolicies.label(),
            SortField::AnnualizedPremium.label(),
        )
        .bold()
    );
    let sorted = session.sorted();
    for row in rank_rows(&sorted) {
        let line = format!(
            "{:>4}  {:<12} {:<40} {:<10} {:>14} {:>24}",
            row.rank,
            row.record.advisor_code,
            truncate_name(&row.record.advisor_name),
            row.record.advisor_status,
            row.record.no_of_policies,
            format_thousands(row.record.annualized_premium),
        );
        println!("{}", tier_paint(row.tier, line));
    }
}

/// Execute the show command
pub async fn show(files: Vec<PathBuf>, view: ViewOptions) -> AdvisorResult<()> {
    println!("{}", "📋 Active Advisors - Import".bold().green());
    let session = build_session(files, &view).await?;
    print_table(&session);
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> AdvisorResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Resolve where one export format lands
fn output_path(options: &ExportOptions, session: &Session, extension: &str) -> PathBuf {
    match &options.output {
        Some(path) if options.format == ExportFormat::Both => path.with_extension(extension),
        Some(path) => path.clone(),
        None => options.out_dir.join(session.export_file_name(extension)),
    }
}

/// Execute the export command
pub async fn export(options: ExportOptions) -> AdvisorResult<()> {
    println!("{}", "📊 Active Advisors - Export".bold().green());

    let config = match &options.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    }
    .with_overrides(
        options.header_text.clone(),
        options.height_multiplier,
        options.brand_mark.clone(),
    );
    let layout = config.layout_params()?;

    let mut session = build_session(options.files.clone(), &options.view).await?;
    session.set_layout(layout);
    if session.is_empty() {
        warn!("Exporting an empty table");
    }

    for extension in options.format.extensions() {
        let path = output_path(&options, &session, extension);
        let bytes = match *extension {
            "xlsx" => session.export_sheet()?,
            "pdf" => session.export_document(config.brand_mark()?)?,
            other => {
                return Err(AdvisorError::Validation(format!(
                    "Unsupported export format: {}",
                    other
                )))
            }
        };
        write_output(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Export written");
        println!("   {} {}", "✅".green(), path.display());
    }

    if let Some(sorted_by) = session.sort_state().describe() {
        println!("   {}", sorted_by.bright_black());
    }
    println!("{}", "✅ Export Complete!".bold().green());
    Ok(())
}
