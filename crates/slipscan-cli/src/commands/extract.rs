//! Extract command - build a draft from OCR text and hand it to the form.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info};

use slipscan_core::extract::rules::{format_amount, to_amount};
use slipscan_core::{Draft, Expense, FormDefaults, ReceiptExtractor, SlipscanConfig};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    review: ReviewArgs,
}

/// Review options shared by every command that produces a draft.
#[derive(Args, Clone)]
pub struct ReviewArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Merchant name
    #[arg(long)]
    pub merchant: Option<String>,

    /// Expense date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Total amount
    #[arg(long, value_parser = parse_amount)]
    pub total: Option<Decimal>,

    /// Tax amount
    #[arg(long, value_parser = parse_amount)]
    pub tax: Option<Decimal>,

    /// Currency code
    #[arg(long)]
    pub currency: Option<String>,

    /// Expense category
    #[arg(long)]
    pub category: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Validate the reviewed form and emit an expense record
    #[arg(long)]
    pub submit: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    to_amount(s).map_err(|e| format!("{} (expected e.g. 12.34)", e))
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let text = read_text(&args.input)?;
    info!("Read {} characters of OCR text", text.len());

    let extractor = ReceiptExtractor::from_config(&config.extraction);
    let draft = extractor.run(&text);

    review(draft, &args.review, &config)
}

fn read_text(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

/// Prefill the form from a draft, apply the user's corrections and emit
/// either the form or, with `--submit`, the resulting expense.
pub fn review(draft: Draft, args: &ReviewArgs, config: &SlipscanConfig) -> anyhow::Result<()> {
    let mut form = FormDefaults::prefill(draft, &config.form);
    apply_corrections(&mut form, args);

    let output = if args.submit {
        match form.submit(&config.form) {
            Ok(expense) => format_expense(&expense, args.format)?,
            Err(e) => {
                eprintln!("{}", style("Expense form is incomplete:").yellow());
                for issue in &e.0 {
                    eprintln!("  - {}", issue);
                }
                return Err(e.into());
            }
        }
    } else {
        format_form(&form, args.format)?
    };

    write_output(&output, args.output.as_ref())
}

fn apply_corrections(form: &mut FormDefaults, args: &ReviewArgs) {
    if let Some(merchant) = &args.merchant {
        form.merchant = merchant.clone();
    }
    if let Some(date) = args.date {
        form.date = Some(date);
    }
    if let Some(total) = args.total {
        form.total = Some(total);
    }
    if let Some(tax) = args.tax {
        form.tax = Some(tax);
    }
    if let Some(currency) = &args.currency {
        form.currency = currency.clone();
    }
    if let Some(category) = &args.category {
        form.category = category.clone();
    }
    if let Some(notes) = &args.notes {
        form.notes = notes.clone();
    }
    debug!("Form after corrections: {:?}", form);
}

fn write_output(output: &str, path: Option<&PathBuf>) -> anyhow::Result<()> {
    if let Some(output_path) = path {
        fs::write(output_path, output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}

pub fn format_form(form: &FormDefaults, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(form)?),
        OutputFormat::Csv => {
            let inputs = form.inputs();
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(inputs.iter().map(|(name, _)| *name))?;
            wtr.write_record(inputs.iter().map(|(_, value)| value.as_str()))?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for (name, value) in form.inputs() {
                let shown = if value.is_empty() {
                    style("(empty)").dim().to_string()
                } else {
                    value
                };
                output.push_str(&format!("{:<9} {}\n", format!("{}:", name), shown));
            }
            Ok(output)
        }
    }
}

pub fn format_expense(expense: &Expense, format: OutputFormat) -> anyhow::Result<String> {
    let tax = expense.tax.map(format_amount).unwrap_or_default();
    let notes = expense.notes.clone().unwrap_or_default();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(expense)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record([
                "date", "merchant", "total", "tax", "currency", "category", "notes",
            ])?;
            wtr.write_record([
                &expense.date.to_string(),
                &expense.merchant,
                &format_amount(expense.total),
                &tax,
                &expense.currency,
                &expense.category,
                &notes,
            ])?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str(&format!("Expense: {}\n", expense.merchant));
            output.push_str(&format!("Date: {}\n", expense.date));
            output.push_str(&format!(
                "Total: {} {}\n",
                format_amount(expense.total),
                expense.currency
            ));
            if !tax.is_empty() {
                output.push_str(&format!("Tax: {} {}\n", tax, expense.currency));
            }
            output.push_str(&format!("Category: {}\n", expense.category));
            if !notes.is_empty() {
                output.push_str(&format!("Notes: {}\n", notes));
            }
            Ok(output)
        }
    }
}
