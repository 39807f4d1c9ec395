//! docblock: CLI tool to inspect documentation comments

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::{CONFIG_FILE_NAME, Config, OutputFormat};
use docblock_parser::lines::{strip_tag, tag_name};
use docblock_parser::tags::THROWS_TAGS;
use docblock_parser::{ParsedDocBlock, TagResult, parse};

#[derive(Parser, Debug)]
#[command(name = "docblock")]
#[command(about = "Parse documentation comments into descriptions and tags")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
#[command(after_help = "Examples:
  docblock comment.txt              # Print descriptions and tags
  docblock comment.txt -f json      # Print the parsed block as JSON
  docblock comment.txt -t return    # Print the @return value
  cat comment.txt | docblock -      # Read from stdin
  docblock a.txt b.txt -j4          # Parse several blocks in parallel
  docblock init                     # Write a sample _docblock.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Files holding one docblock each (`-` reads stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print only the value of this tag (e.g. return, var, author, param, throws)
    #[arg(short, long)]
    tag: Option<String>,

    /// Fail when a @param tag lacks a `$name`
    #[arg(long)]
    check: bool,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Configuration file (defaults to ./_docblock.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a sample configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the JSON schema of the configuration instead
        #[arg(long)]
        schema: bool,
    },
}

/// Settings resolved from command-line flags and the config file
#[derive(Debug, Clone)]
struct Options {
    format: OutputFormat,
    pretty: bool,
    strict_params: bool,
    tag: Option<String>,
}

impl Options {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            format: cli
                .format
                .or(config.output.format)
                .unwrap_or(OutputFormat::Text),
            pretty: !cli.compact && config.output.pretty.unwrap_or(true),
            strict_params: cli.check || config.check.strict_params.unwrap_or(false),
            tag: cli.tag.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Some(Commands::Init { output, schema }) => init_config(output, *schema),
        None => run(&cli),
    }
}

/// Install the stderr log subscriber
///
/// `--verbose` and `--quiet` take precedence over `RUST_LOG`.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Write a sample config file, or print the config schema
fn init_config(output: &Path, schema: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() {
        anyhow::bail!("Config file already exists: {}", output.display());
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(output, content)
        .with_context(|| format!("Failed to write: {}", output.display()))?;
    info!(path = %output.display(), "wrote sample config");

    Ok(())
}

/// Load the config named on the command line, or the one in the current directory
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(Config::load_from_dir(&cwd)?.unwrap_or_default())
}

/// Parse every input and print the results in input order
fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let options = Options::resolve(cli, &config);
    debug!(?options, "resolved options");

    // Configure thread pool if jobs specified
    if let Some(n) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let with_headers = cli.inputs.len() > 1 && options.format == OutputFormat::Text;

    // `parse` keeps no state between calls, so inputs are independent
    let results: Vec<_> = cli
        .inputs
        .par_iter()
        .map(|input| (input, process_input(input, &options)))
        .collect();

    let mut failed = 0;
    for (input, result) in results {
        match result {
            Ok(output) => {
                if with_headers {
                    println!("==> {} <==", input.display());
                }
                print!("{}", output);
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error processing {}: {:#}", input.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} inputs failed", failed, cli.inputs.len());
    }

    Ok(())
}

/// Read, parse and render a single input
fn process_input(input: &Path, options: &Options) -> Result<String> {
    let source = read_input(input)?;
    let doc = parse(&source).with_context(|| format!("Parse error in {}", input.display()))?;
    debug!(
        input = %input.display(),
        params = doc.number_of_param_tags(),
        tags = doc.tags().len(),
        "parsed"
    );

    if options.strict_params {
        doc.params()?;
    }

    match &options.tag {
        Some(name) => render_tag(&doc, name, options),
        None => render_docblock(&doc, options),
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }

    fs::read_to_string(input).with_context(|| format!("Failed to read: {}", input.display()))
}

/// Render the values of one tag
///
/// `param` and `throws`/`exception` may repeat and print every value; any
/// other name goes through the tag registry.
fn render_tag(doc: &ParsedDocBlock, name: &str, options: &Options) -> Result<String> {
    let key = name.strip_prefix('@').unwrap_or(name).to_lowercase();
    let values: Vec<&str> = match key.as_str() {
        "param" => (0..doc.number_of_param_tags())
            .map(|index| doc.param(index))
            .collect::<TagResult<_>>()?,
        "throws" | "exception" => doc.throws(),
        _ => vec![doc.get_by_name(&key)?],
    };

    match options.format {
        OutputFormat::Text => Ok(values.iter().map(|v| format!("{}\n", v)).collect()),
        OutputFormat::Json => {
            let value = if matches!(key.as_str(), "param" | "throws" | "exception") {
                serde_json::json!(values)
            } else {
                serde_json::json!(values[0])
            };
            to_json(&value, options.pretty)
        }
    }
}

/// Render a whole docblock
fn render_docblock(doc: &ParsedDocBlock, options: &Options) -> Result<String> {
    match options.format {
        OutputFormat::Json => {
            let json = if options.pretty {
                doc.to_json_pretty()
            } else {
                doc.to_json()
            }
            .context("Failed to serialize docblock")?;
            Ok(json + "\n")
        }
        OutputFormat::Text => Ok(render_text(doc)),
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize JSON")?;
    Ok(json + "\n")
}

/// Plain-text summary: descriptions, params, then the other tags
fn render_text(doc: &ParsedDocBlock) -> String {
    let mut out = String::new();

    if !doc.short_description().is_empty() {
        let _ = writeln!(out, "short: {}", doc.short_description());
    }
    if !doc.long_description().is_empty() {
        let _ = writeln!(out, "long: {}", doc.long_description());
    }

    for index in 0..doc.number_of_param_tags() {
        match doc.param_tag(index) {
            Ok(param) => {
                let _ = write!(out, "param: {} {}", param.type_name, param.name);
                if !param.description.is_empty() {
                    let _ = write!(out, " - {}", param.description);
                }
                out.push('\n');
            }
            // Unchecked runs still show malformed params verbatim
            Err(_) => {
                let _ = writeln!(out, "param: {}", doc.param(index).unwrap_or_default());
            }
        }
    }

    for line in doc.tags() {
        let name = tag_name(line).unwrap_or_default();
        let value = strip_tag(name, line);
        let label = if THROWS_TAGS.contains(&name) {
            "throws"
        } else {
            name
        };
        if value.is_empty() {
            let _ = writeln!(out, "@{}", label);
        } else {
            let _ = writeln!(out, "@{}: {}", label, value);
        }
    }

    out
}
