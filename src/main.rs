//! Site Guard CLI - scan client websites and write sales reports

use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;

use site_guard::{
    ApiToken, Error, Scanner, Summary, logging, parse_target_list, report,
    output::{OutputConfig, OutputFormat, OutputSort, output_summaries},
    scanner::ScanResult,
};

/// Client website security scan - WordPress vulnerabilities, header grade, blacklist status
#[derive(Parser, Debug)]
#[command(name = "site-guard")]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the site to scan (https:// is added when missing)
    #[arg(required_unless_present = "input_file")]
    url: Option<String>,

    /// File with one URL per line
    #[arg(short = 'i', long = "input-file")]
    input_file: Option<PathBuf>,

    /// WPScan API token
    #[arg(long = "wpscan-token", env = "WPSCAN_API_TOKEN", hide_env_values = true)]
    wpscan_token: Option<String>,

    /// Output format
    #[arg(short = 'o', long = "output", default_value = "human", value_enum)]
    output_format: OutputFormatArg,

    /// Sort order for output
    #[arg(long = "sort", default_value = "input", value_enum)]
    sort: OutputSortArg,

    /// Write one report per site into this directory
    #[arg(short = 'r', long = "report-dir")]
    report_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Pause between sites in milliseconds
    #[arg(long = "delay-ms", default_value_t = 0)]
    delay_ms: u64,

    /// Sites scanned at once
    #[arg(long = "concurrency", default_value_t = 1)]
    concurrency: usize,

    /// Always query the services, even for recently scanned hosts
    #[arg(long = "no-cache")]
    no_cache: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// Output format argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    None,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::None => OutputFormat::None,
        }
    }
}

/// Output sort argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputSortArg {
    /// Keep the order the sites were given in (default)
    Input,
    /// CRITICAL sites first, then by host
    Risk,
    /// Alphabetically by host
    Host,
}

impl From<OutputSortArg> for OutputSort {
    fn from(arg: OutputSortArg) -> Self {
        match arg {
            OutputSortArg::Input => OutputSort::Input,
            OutputSortArg::Risk => OutputSort::Risk,
            OutputSortArg::Host => OutputSort::Host,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::initialize_logging(args.verbose);

    let human = matches!(args.output_format, OutputFormatArg::Human);
    if human {
        print_banner();
    }

    match run(&args, human).await {
        Ok(0) => {
            eprintln!("Error: no site could be scanned");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Scan every input; returns how many sites were scanned
async fn run(args: &Args, human: bool) -> site_guard::Result<usize> {
    let inputs = collect_inputs(args)?;

    let token = args.wpscan_token.clone().and_then(ApiToken::new);
    if token.is_none() {
        warn!("No usable WPScan API token configured.");
        eprintln!(
            "Warning: no WPScan API token (set WPSCAN_API_TOKEN or --wpscan-token); \
             WordPress results will show \"Add key\"."
        );
    }

    let cache_window = (!args.no_cache).then_some(site_guard::config::DEFAULT_CACHE_WINDOW);
    let scanner = Scanner::builder()
        .wpscan_token(token)
        .timeout(Duration::from_secs(args.timeout))
        .delay(Duration::from_millis(args.delay_ms))
        .concurrency(args.concurrency)
        .cache_window(cache_window)
        .build()?;

    let mut results = Vec::new();
    for (input, outcome) in inputs.iter().zip(scanner.scan_batch(inputs.as_slice()).await) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => eprintln!("Skipping '{}': {}", input, e),
        }
    }

    let summaries: Vec<Summary> = results.iter().map(Summary::new).collect();
    let output_config = OutputConfig::new(args.output_format.into(), args.sort.into());

    {
        let stdout = std::io::stdout();
        let mut writer = stdout.lock();
        output_summaries(&summaries, &output_config, &mut writer)?;
    }

    if let Some(dir) = &args.report_dir {
        write_reports(dir, &results, human)?;
    }

    Ok(results.len())
}

fn collect_inputs(args: &Args) -> site_guard::Result<Vec<String>> {
    let mut inputs: Vec<String> = args.url.iter().cloned().collect();

    if let Some(path) = &args.input_file {
        let text = std::fs::read_to_string(path).map_err(|source| Error::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        inputs.extend(parse_target_list(&text));
    }

    Ok(inputs)
}

fn write_reports(dir: &Path, results: &[ScanResult], human: bool) -> site_guard::Result<()> {
    std::fs::create_dir_all(dir).map_err(Error::OutputFailed)?;
    let today = chrono::Local::now().date_naive();

    for result in results {
        let report = report::render(result, today);
        let path = dir.join(report.file_name());
        std::fs::write(&path, report.bytes()).map_err(Error::OutputFailed)?;
        if human {
            println!("Report saved: {}", path.display());
        }
    }
    Ok(())
}

fn print_banner() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("HFB Cyber Guard Pro v{}", VERSION);
    println!("Client Security Scan");
    println!();
}
