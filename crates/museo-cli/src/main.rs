use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use museo_cli::{OutputFormat, SourceOptions, commands};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "museo")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Fetch museum catalog records, summarize them and build PDF reports",
    long_about = "Museo pulls object records from the Harvard Art Museums API, normalizes them \
                  into display records, computes title and artist statistics, and renders a \
                  charted PDF report. It can also serve both over HTTP."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Catalog API key
    #[arg(long, global = true, env = "HAM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Catalog object endpoint
    #[arg(long, global = true, env = "HAM_BASE_URL")]
    base_url: Option<String>,

    /// Read a saved catalog response instead of calling the API
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Records to request per call
    #[arg(long, global = true, value_name = "N")]
    size: Option<u32>,
}

impl Cli {
    fn source_options(&self) -> SourceOptions {
        SourceOptions {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            input: self.input.clone(),
            timeout: self.timeout,
            size: self.size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print normalized catalog records
    Data {
        /// Also save the batch as JSON (default: <cache dir>/museo/last_batch.json)
        #[arg(long, value_name = "PATH")]
        snapshot: Option<Option<PathBuf>>,
    },

    /// Print title and artist counts with summary statistics
    Stats {
        /// Labels listed per dimension in pretty output
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Write the PDF report
    Report {
        /// Output PDF path
        #[arg(short, long, default_value = "art_report.pdf")]
        output: PathBuf,

        /// Author shown in the page header
        #[arg(long)]
        author: Option<String>,
    },

    /// Serve /api/data and /api/report over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,

        /// Seconds a rendered response is reused (0 disables caching)
        #[arg(long, default_value_t = 60)]
        cache_ttl: u64,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for museo.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:  museo completion --shell bash >> ~/.bashrc
    Zsh:   museo completion --shell zsh > ~/.zfunc/_museo
           (add `fpath+=~/.zfunc` to ~/.zshrc before compinit)
    Fish:  museo completion --shell fish > ~/.config/fish/completions/museo.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let options = cli.source_options();

    // Execute the command
    match cli.command {
        Commands::Data { snapshot } => commands::data::execute(&options, snapshot, cli.format),
        Commands::Stats { top } => commands::stats::execute(&options, top, cli.format),
        Commands::Report { output, author } => {
            commands::report::execute(&options, &output, author)
        }
        Commands::Serve {
            host,
            port,
            cache_ttl,
        } => commands::serve::execute(&options, host, port, cache_ttl),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("museo=debug,museo_core=debug,museo_report=debug,museo_server=debug")
    } else {
        EnvFilter::new("museo=info")
    };

    // Logs go to stderr so JSON and CSV output stay clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
