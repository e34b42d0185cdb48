//! deckmd CLI - slide deck and page document conversion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use deckmd::render::{extract_reservation_codes, normalize, to_json};
use deckmd::{
    AssembleOptions, CommandOcr, ConvertOptions, ConvertResult, Converter, HeadingStyle,
    JsonFormat, Locale, MarkdownRefiner, NormalizeOptions, OcrCapability,
};

#[derive(Parser)]
#[command(name = "deckmd")]
#[command(version)]
#[command(about = "Convert slide decks and page documents to annotated Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct PipelineArgs {
    /// Skip the refinement passes
    #[arg(long)]
    no_refine: bool,

    /// Skip amount and date normalization
    #[arg(long)]
    no_normalize: bool,

    /// Leave table and diagram blocks out of normalization
    #[arg(long)]
    preserve_blocks: bool,

    /// Assemble units one at a time
    #[arg(long)]
    sequential: bool,

    /// Write headings without decorative markers
    #[arg(long)]
    plain_headings: bool,

    /// Placeholder language
    #[arg(long, value_enum, env = "DECKMD_LOCALE", default_value = "ko")]
    locale: LocaleArg,

    /// OCR command for empty pages, e.g. "ocr-page {input} --page {page1} --dpi {dpi}"
    #[arg(long, env = "DECKMD_OCR_COMMAND")]
    ocr_command: Option<String>,

    /// OCR rendering resolution
    #[arg(long, env = "DECKMD_OCR_DPI", default_value_t = deckmd::ocr::DEFAULT_OCR_DPI)]
    ocr_dpi: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a structural record to Markdown
    Convert {
        /// Input record file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Refine and normalize an existing Markdown file
    Refine {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip amount and date normalization
        #[arg(long)]
        no_normalize: bool,
    },

    /// List reservation codes found in a record or Markdown file
    Codes {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print codes as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Convert many records in parallel
    Batch {
        /// Input record files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show conversion statistics for a record
    Info {
        /// Input record file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LocaleArg {
    /// Korean placeholders
    Ko,
    /// English placeholders
    En,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Ko => Locale::Korean,
            LocaleArg::En => Locale::English,
        }
    }
}

impl PipelineArgs {
    fn convert_options(&self, frontmatter: bool) -> ConvertOptions {
        let mut options = ConvertOptions::from_env().with_frontmatter(frontmatter);
        if self.no_refine {
            options.refine = None;
        }
        if self.no_normalize {
            options.normalize = None;
        }
        if let Some(normalize) = options.normalize.take() {
            options.normalize = Some(normalize.with_preserve_blocks(self.preserve_blocks));
        }

        let style = if self.plain_headings {
            HeadingStyle::Plain
        } else {
            HeadingStyle::Decorated
        };
        options.with_assemble_options(
            AssembleOptions::new()
                .with_heading_style(style)
                .with_locale(self.locale.into())
                .with_parallel(!self.sequential),
        )
    }

    fn converter(&self, frontmatter: bool) -> Result<Converter, Box<dyn std::error::Error>> {
        let ocr = match &self.ocr_command {
            Some(line) => {
                let engine = CommandOcr::from_command_line(line)?;
                OcrCapability::resolve(Arc::new(engine)).with_dpi(self.ocr_dpi)
            }
            None => OcrCapability::disabled(),
        };

        Ok(Converter::with_defaults()
            .with_ocr(ocr)
            .with_options(self.convert_options(frontmatter)))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            json,
            compact,
            frontmatter,
            pipeline,
        } => cmd_convert(&input, output.as_deref(), json, compact, frontmatter, &pipeline),
        Commands::Refine {
            input,
            output,
            no_normalize,
        } => cmd_refine(&input, output.as_deref(), no_normalize),
        Commands::Codes { input, json } => cmd_codes(&input, json),
        Commands::Batch {
            inputs,
            output,
            frontmatter,
            pipeline,
        } => cmd_batch(&inputs, &output, frontmatter, &pipeline),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> std::io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    json: bool,
    compact: bool,
    frontmatter: bool,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = pipeline.converter(frontmatter)?;
    let result = converter.convert_file(input)?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        write_or_print(output, &to_json(&result, format)?)?;
    } else {
        write_or_print(output, &result.markdown)?;
    }

    Ok(())
}

fn cmd_refine(
    input: &Path,
    output: Option<&Path>,
    no_normalize: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input)?;

    let mut refined = MarkdownRefiner::default().refine(&text);
    if !no_normalize {
        refined = normalize(&refined, &NormalizeOptions::default());
    }

    write_or_print(output, &refined)?;
    Ok(())
}

fn cmd_codes(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_defaults();
    let is_record = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| converter.supports(ext));

    let codes = if is_record {
        converter.convert_file(input)?.meta.reservation_codes
    } else {
        extract_reservation_codes(&fs::read_to_string(input)?)
    };

    if json {
        println!("{}", serde_json::to_string(&codes)?);
    } else if codes.is_empty() {
        println!("{}", "No reservation codes found".yellow());
    } else {
        for code in &codes {
            println!("{}", code);
        }
    }

    Ok(())
}

fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.md", stem))
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    frontmatter: bool,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;
    let converter = pipeline.converter(frontmatter)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let failures: Vec<(PathBuf, String)> = inputs
        .par_iter()
        .filter_map(|input| {
            let outcome = converter
                .convert_file(input)
                .map_err(|e| e.to_string())
                .and_then(|result: ConvertResult| {
                    fs::write(output_path_for(input, output_dir), &result.markdown)
                        .map_err(|e| e.to_string())
                });
            pb.inc(1);
            outcome.err().map(|e| (input.clone(), e))
        })
        .collect();

    pb.finish_with_message("Done!");

    let converted = inputs.len() - failures.len();
    println!(
        "\n{} {} of {} files converted into {}",
        "Done!".green().bold(),
        converted,
        inputs.len(),
        output_dir.display()
    );
    for (path, err) in &failures {
        eprintln!("  {} {}: {}", "✗".red(), path.display(), err);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} file(s) failed", failures.len()).into())
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = Converter::with_defaults().convert_file(input)?;
    let meta = &result.meta;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), result.format);
    println!("{}: {}", "Units".bold(), meta.unit_count);
    if !meta.ocr_units.is_empty() {
        let pages: Vec<String> = meta.ocr_units.iter().map(|n| n.to_string()).collect();
        println!("{}: {}", "OCR pages".bold(), pages.join(", "));
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Words".bold(), meta.word_count);
    println!("{}: {}", "Characters".bold(), meta.char_count);
    println!("{}: {}", "Tables".bold(), meta.table_count);
    println!("{}: {}", "Diagrams".bold(), meta.diagram_count);
    println!(
        "{}: {}",
        "Reservation codes".bold(),
        meta.reservation_codes.len()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "deckmd".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Slide deck and page document conversion tool");
    println!();
    println!("License: MIT");
}
