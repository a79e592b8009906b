//! Batch command - extract drafts from many OCR text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use slipscan_core::extract::rules::format_amount;
use slipscan_core::models::FormConfig;
use slipscan_core::{Draft, Field, FormDefaults, ReceiptExtractor};

use super::extract::{OutputFormat, format_form};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    draft: Option<Draft>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = ReceiptExtractor::from_config(&config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_file(&path, &extractor, &config.form, &args) {
            Ok(draft) => results.push(ProcessResult {
                path,
                draft: Some(draft),
                error: None,
            }),
            Err(e) => {
                error!("Failed to process {}: {:#}", path.display(), e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e.context(format!("Failed to process {}", path.display())));
                }
                results.push(ProcessResult {
                    path,
                    draft: None,
                    error: Some(format!("{:#}", e)),
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.csv");
        fs::write(&summary_path, summary_csv(&results)?)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    } else if args.output_dir.is_none() {
        for result in &results {
            if let Some(draft) = &result.draft {
                println!("{}: {}", result.path.display(), serde_json::to_string(draft)?);
            }
        }
    }

    let complete = results
        .iter()
        .filter(|r| r.draft.as_ref().is_some_and(|d| d.date.is_some() && d.total.is_some()))
        .count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();

    println!(
        "{} {} files processed in {:.1}s: {} with date and total, {} failed",
        style("✓").green(),
        results.len(),
        start.elapsed().as_secs_f32(),
        complete,
        failed
    );

    Ok(())
}

/// Extract one file and write its form output when an output directory is set.
fn process_file(
    path: &Path,
    extractor: &ReceiptExtractor,
    form: &FormConfig,
    args: &BatchArgs,
) -> anyhow::Result<Draft> {
    let text = fs::read_to_string(path)?;
    let draft = extractor.run(&text);

    if let Some(ref output_dir) = args.output_dir {
        let defaults = FormDefaults::prefill(draft.clone(), form);
        let output = format_form(&defaults, args.format)?;
        let output_path = output_file(output_dir, path, args.format);
        fs::write(&output_path, output)?;
        debug!("Wrote {}", output_path.display());
    }

    Ok(draft)
}

fn output_file(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

fn summary_csv(results: &[ProcessResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["file", "date", "total", "tax", "missing", "error"])?;

    for result in results {
        let (date, total, tax, missing) = match &result.draft {
            Some(draft) => (
                draft.date.map(|d| d.to_string()).unwrap_or_default(),
                draft.total.map(format_amount).unwrap_or_default(),
                draft.tax.map(format_amount).unwrap_or_default(),
                draft
                    .missing_fields()
                    .iter()
                    .filter(|f| **f != Field::Merchant)
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(";"),
            ),
            None => Default::default(),
        };

        wtr.write_record([
            result.path.display().to_string(),
            date,
            total,
            tax,
            missing,
            result.error.clone().unwrap_or_default(),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_csv() {
        let results = vec![
            ProcessResult {
                path: PathBuf::from("a.txt"),
                draft: Some(slipscan_core::extract("03/04/2024\nTOTAL\n$58.12")),
                error: None,
            },
            ProcessResult {
                path: PathBuf::from("b.txt"),
                draft: Some(slipscan_core::extract("")),
                error: None,
            },
            ProcessResult {
                path: PathBuf::from("c.txt"),
                draft: None,
                error: Some("unreadable".to_string()),
            },
        ];

        let csv = summary_csv(&results).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "file,date,total,tax,missing,error");
        assert_eq!(lines[1], "a.txt,2024-03-04,58.12,0.00,,");
        assert_eq!(lines[2], "b.txt,,,0.00,date;total,");
        assert_eq!(lines[3], "c.txt,,,,,unreadable");
    }

    #[test]
    fn test_process_file_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.txt");
        fs::write(&input, "TOTAL\n$5.00").unwrap();

        let args = BatchArgs {
            input: String::new(),
            output_dir: Some(dir.path().join("not-created")),
            format: OutputFormat::Json,
            summary: false,
            continue_on_error: true,
        };
        let extractor = ReceiptExtractor::new();

        assert!(process_file(&input, &extractor, &FormConfig::default(), &args).is_err());

        let args = BatchArgs {
            output_dir: None,
            ..args
        };
        let draft = process_file(&input, &extractor, &FormConfig::default(), &args).unwrap();
        assert_eq!(draft.total.map(format_amount), Some("5.00".to_string()));
    }

    #[test]
    fn test_output_file_name() {
        let path = output_file(Path::new("out"), Path::new("in/receipt-1.txt"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("out/receipt-1.csv"));
    }
}
