//! enprint CLI - embed BibTeX citations into PDF preprints

mod health;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use enprint::config::DEFAULT_API_URL;
use enprint::{
    parse_bibtex, read_bibtex_annotations, read_info_bibtex, to_bibtex, to_json, BibTexEntry,
    Config, ErrorMode, JsonFormat, LopdfBackend, Output, ParsedPdf, PdfParser, Session,
    SessionEvent,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "enprint")]
#[command(version)]
#[command(about = "Embed BibTeX citations into PDF preprints", long_about = None)]
struct Cli {
    /// Input PDF file (annotates it with the prefilled entry)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Health-check URL
    #[arg(long, global = true, env = "ENPRINT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Health-check timeout in seconds
    #[arg(long, global = true, env = "ENPRINT_TIMEOUT", default_value = "5", value_name = "SECS")]
    timeout: u64,

    /// Fail on the first unreadable page instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the derived bibliographic record
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Number of keywords
        #[arg(short = 'k', long, value_name = "N")]
        keywords: Option<i64>,
    },

    /// List the most frequent keywords
    #[command(alias = "kw")]
    Keywords {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of keywords
        #[arg(short = 'k', long, value_name = "N")]
        count: Option<i64>,

        /// Output a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print the prefilled BibTeX entry
    #[command(alias = "bib")]
    Bibtex {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Override a field (e.g., --set journal="Nature"); empty value removes it
        #[arg(long, value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Embed a BibTeX entry and save the enhanced PDF
    Annotate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: <name>_enhanced.pdf next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Override a field of the entry
        #[arg(long, value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Use the entry from a .bib file instead of the prefilled one
        #[arg(long, value_name = "FILE")]
        bib: Option<PathBuf>,

        /// Name stored on the annotation (default: the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show BibTeX entries embedded in a PDF
    Read {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Check API connectivity
    Status,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::new()
        .with_api_url(cli.api_url.clone())
        .with_health_timeout(Duration::from_secs(cli.timeout))
        .with_color(!cli.no_color);
    if cli.strict {
        config = config.with_error_mode(ErrorMode::Strict);
    }
    if !config.color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Some(Commands::Info {
            input,
            json,
            keywords,
        }) => cmd_info(&input, json, keywords, config),
        Some(Commands::Keywords { input, count, json }) => cmd_keywords(&input, count, json, config),
        Some(Commands::Bibtex { input, set }) => cmd_bibtex(&input, &set, config),
        Some(Commands::Annotate {
            input,
            output,
            set,
            bib,
            name,
        }) => {
            if let Some(name) = name {
                config = config.with_display_name(name);
            }
            cmd_annotate(&input, output.as_deref(), &set, bib.as_deref(), &config)
        }
        Some(Commands::Read { input }) => cmd_read(&input),
        Some(Commands::Status) => cmd_status(&config),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: annotate with the prefilled entry
            if let Some(input) = cli.input {
                cmd_annotate(&input, None, &[], None, &config)
            } else {
                println!("{}", "Usage: enprint <FILE>".yellow());
                println!("       enprint --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_enhanced.pdf", stem))
}

fn apply_assignments(entry: &mut BibTexEntry, assignments: &[String]) -> CliResult {
    for assignment in assignments {
        if !entry.apply_assignment(assignment) {
            return Err(format!("Invalid field assignment '{}' (expected FIELD=VALUE)", assignment).into());
        }
    }
    Ok(())
}

/// Parse with a per-page progress bar.
fn parse_with_progress(input: &Path, config: &Config) -> Result<ParsedPdf, Box<dyn std::error::Error>> {
    let parser = PdfParser::open_with_options(input, config.parse_options())?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages")?
            .progress_chars("#>-"),
    );
    let parsed = parser.parse_with_progress(&file_name(input), |page, total| {
        pb.set_length(u64::from(total));
        pb.set_position(u64::from(page));
    })?;
    pb.finish_and_clear();

    Ok(parsed)
}

fn cmd_info(input: &Path, json: bool, keywords: Option<i64>, mut config: Config) -> CliResult {
    if let Some(count) = keywords {
        config = config.with_keyword_count(count);
    }
    let parsed = parse_with_progress(input, &config)?;

    if json {
        println!("{}", to_json(&parsed.info, JsonFormat::Pretty)?);
        return Ok(());
    }

    let info = &parsed.info;
    let declared = &parsed.declared;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), declared.pdf_version);
    println!("{}: {}", "Pages".bold(), info.pages);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if declared.encrypted { "Yes" } else { "No" }
    );
    if let Some(ref producer) = declared.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }

    println!();
    println!("{}", "Citation".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Key".bold(), info.art_title);
    println!("{}: {}", "Type".bold(), info.art_type);
    println!("{}: {}", "Title".bold(), info.title);
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    println!("{}: {}", "Date".bold(), info.date.format("%Y-%m-%d"));
    if declared.created.is_none() {
        println!("  {}", "(no creation date declared, using today)".dimmed());
    }
    if !info.keywords.is_empty() {
        println!("{}: {}", "Keywords".bold(), info.keywords.join(", "));
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let words = parsed.text.text.split_whitespace().count();
    println!("{}: {}", "Pages read".bold(), parsed.text.pages_read);
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), parsed.text.text.chars().count());

    Ok(())
}

fn cmd_keywords(input: &Path, count: Option<i64>, json: bool, mut config: Config) -> CliResult {
    if let Some(count) = count {
        config = config.with_keyword_count(count);
    }
    let parsed = parse_with_progress(input, &config)?;

    if json {
        println!("{}", serde_json::to_string(&parsed.info.keywords)?);
        return Ok(());
    }

    if parsed.info.keywords.is_empty() {
        println!("{}", "No keywords found".yellow());
    }
    for (i, keyword) in parsed.info.keywords.iter().enumerate() {
        println!("{:>3}. {}", i + 1, keyword);
    }

    Ok(())
}

fn cmd_bibtex(input: &Path, assignments: &[String], config: Config) -> CliResult {
    let parsed = parse_with_progress(input, &config)?;

    let mut entry = BibTexEntry::from_info(&parsed.info);
    apply_assignments(&mut entry, assignments)?;

    print!("{}", to_bibtex(&entry)?);
    Ok(())
}

fn cmd_annotate(
    input: &Path,
    output: Option<&Path>,
    assignments: &[String],
    bib: Option<&Path>,
    config: &Config,
) -> CliResult {
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading PDF...");
    let bytes = fs::read(input)?;
    let transition = Session::new().reduce(
        SessionEvent::Load {
            name: file_name(input),
            bytes,
        },
        config,
    );
    let session = transition.session;
    if let Some(error) = session.error() {
        pb.abandon();
        return Err(error.to_string().into());
    }
    pb.inc(1);

    pb.set_message("Preparing BibTeX...");
    let mut entry = match bib {
        Some(path) => parse_bibtex(&fs::read_to_string(path)?)?,
        None => session.form().ok_or("No document loaded")?,
    };
    apply_assignments(&mut entry, assignments)?;
    pb.inc(1);

    pb.set_message("Writing annotation...");
    let transition = session.reduce(SessionEvent::Submit(entry.clone()), config);
    let saved = match transition.output {
        Output::Saved(bytes) => bytes,
        Output::SubmitFailed(e) => {
            pb.abandon();
            return Err(e.into());
        }
        Output::None | Output::Ignored => {
            pb.abandon();
            return Err("Nothing was written".into());
        }
    };

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));
    fs::write(&output_path, &saved)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!();
    print!("{}", to_bibtex(&entry)?);
    println!();
    println!("{} {}", "Saved to".green(), output_path.display());

    // Drop the document
    let _ = transition.session.reduce(SessionEvent::Reset, config);

    Ok(())
}

fn cmd_read(input: &Path) -> CliResult {
    let backend = LopdfBackend::load_file(input)?;
    let annotations = read_bibtex_annotations(&backend);

    if annotations.is_empty() {
        return match read_info_bibtex(&backend) {
            Some(entry) => {
                println!("{}", "From document info".dimmed());
                print!("{}", to_bibtex(&entry)?);
                Ok(())
            }
            None => {
                println!("{}", "No embedded BibTeX found".yellow());
                Ok(())
            }
        };
    }

    for annotation in &annotations {
        let mut header = format!("Page {}", annotation.page);
        if let Some(ref name) = annotation.display_name {
            header.push_str(&format!(" · {}", name));
        }
        if let Some(modified) = annotation.modified {
            header.push_str(&format!(" · {}", modified.format("%Y-%m-%d %H:%M")));
        }
        println!("{}", header.dimmed());
        print!("{}", annotation.raw);
    }

    Ok(())
}

fn cmd_status(config: &Config) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    let status = rt.block_on(health::check_api(&config.api_url, config.health_timeout));
    println!("{} {}", status, config.api_url.dimmed());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "enprint".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Enhanced preprint generator");
    println!();
    println!("License: MIT");
}
