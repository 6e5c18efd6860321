//! Process command - extract data from a single receipt.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info};

use slip_core::models::config::SlipConfig;
use slip_core::models::receipt::ExtractedData;
use slip_core::receipt::ReceiptParser;
use slip_core::receipt::rules::amounts::format_amount;

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text file, or "-" to read stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Show extraction confidence score
    #[arg(long)]
    show_confidence: bool,

    /// Report extraction warnings
    #[arg(long)]
    validate: bool,

    /// Date to report when the receipt has none (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// Resolve the configured default, falling back to JSON.
    pub fn from_config(config: &SlipConfig) -> Self {
        <Self as clap::ValueEnum>::from_str(&config.output.default_format, true)
            .unwrap_or(OutputFormat::Json)
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}

/// Build a parser from configuration and an optional pinned date.
pub fn build_parser(config: &SlipConfig, date: Option<NaiveDate>) -> ReceiptParser {
    let parser = ReceiptParser::from_config(&config.extraction);
    match date {
        Some(date) => parser.with_reference_date(date),
        None => parser,
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = load_config(config_path)?;

    // Read input text
    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        info!("Processing file: {}", args.input.display());
        fs::read_to_string(&args.input)?
    };

    // Extract fields
    let parser = build_parser(&config, args.date);
    let result = parser.parse_with_report(&text)?;
    let data = result.data;

    // Validate if requested
    if args.validate && !result.warnings.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    // Format output
    let format = args.format.unwrap_or_else(|| OutputFormat::from_config(&config));
    let output = format_receipt(&data, format, config.output.pretty)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    // Show summary
    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            data.confidence * 100.0
        );
        if data.needs_review(config.extraction.review_threshold) {
            println!(
                "{} Low confidence, review the extracted fields",
                style("!").yellow()
            );
        }
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_receipt(
    data: &ExtractedData,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Json => Ok(serde_json::to_string(data)?),
        OutputFormat::Csv => format_csv(data),
        OutputFormat::Text => Ok(format_text(data)),
    }
}

fn format_csv(data: &ExtractedData) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["name", "quantity", "unit_price", "line_total"])?;

    for item in &data.items {
        wtr.write_record([
            item.name.as_str(),
            &item.quantity.to_string(),
            &format_amount(item.price),
            &format_amount(item.line_total()),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(data: &ExtractedData) -> String {
    let mut output = String::new();

    output.push_str(&format!("Merchant: {}\n", data.merchant));
    output.push_str(&format!("Date: {}\n", data.date));
    output.push('\n');

    if !data.items.is_empty() {
        output.push_str("Items:\n");
        for item in &data.items {
            output.push_str(&format!(
                "  {} x {} @ {} = {}\n",
                item.quantity,
                item.name,
                format_amount(item.price),
                format_amount(item.line_total())
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!("Subtotal: {}\n", format_amount(data.subtotal)));
    output.push_str(&format!("Tax:      {}\n", format_amount(data.tax)));
    output.push_str(&format!("Total:    {}\n", format_amount(data.total)));

    if !data.payment_method.is_empty() {
        output.push_str(&format!("\nPayment: {}\n", data.payment_method));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed() -> ExtractedData {
        ReceiptParser::new()
            .parse("Joe's Diner\n01/15/2024\nBurger 8.99\n2 x Fries 3.50\nTOTAL 12.49\nVISA")
            .unwrap()
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&parsed());
        assert!(text.contains("Merchant: Joe's Diner"));
        assert!(text.contains("2 x Fries @ 1.75 = 3.50"));
        assert!(text.contains("Total:    12.49"));
        assert!(text.contains("Payment: VISA"));
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&parsed()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,quantity,unit_price,line_total");
        assert_eq!(lines[2], "Fries,2,1.75,3.50");
    }

    #[test]
    fn test_output_format_from_config() {
        let mut config = SlipConfig::default();
        assert_eq!(OutputFormat::from_config(&config), OutputFormat::Json);

        config.output.default_format = "TEXT".to_string();
        assert_eq!(OutputFormat::from_config(&config), OutputFormat::Text);

        config.output.default_format = "yaml".to_string();
        assert_eq!(OutputFormat::from_config(&config), OutputFormat::Json);
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date("2024-02-29"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(parse_date("02/29/2024").is_err());
    }
}
