use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wikilookup::config::ClientConfig;
use wikilookup::models::{Answer, DateArg};
use wikilookup::output::{self, OutputFormat};
use wikilookup::sheet::Sheet;
use wikilookup::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "wikilookup")]
#[command(about = "Look up Wikipedia, Wikidata, pageview and search-suggestion data")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv, global = true)]
    format: OutputFormat,

    /// User-Agent header sent with every request (default: $WIKILOOKUP_USER_AGENT)
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Request timeout in milliseconds (default: $WIKILOOKUP_TIMEOUT_MS or 30000)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redirect titles pointing at an article
    Synonyms(ArticleArgs),
    /// The article's title in other language editions
    Translate(TranslateArgs),
    /// Translations plus each language's synonyms
    Expand(ExpandArgs),
    /// Articles in a category
    CategoryMembers(CategoryArgs),
    /// Subcategories of a category
    Subcategories(CategoryArgs),
    /// Articles linking to an article
    InboundLinks(ArticleArgs),
    /// Articles an article links to
    OutboundLinks(ArticleArgs),
    /// Articles linked in both directions
    MutualLinks(ArticleArgs),
    /// Primary latitude and longitude
    Geo(ArticleArgs),
    /// Wikidata claims as label/value pairs
    Facts(FactsArgs),
    /// Daily user pageviews, newest first
    Pageviews(WindowArgs),
    /// Revision size changes, newest first
    PageEdits(WindowArgs),
    /// Google Suggest completions
    Suggest(SuggestArgs),
}

#[derive(Args)]
struct ArticleArgs {
    /// Article reference, e.g. en:Berlin
    article: String,
}

#[derive(Args)]
struct CategoryArgs {
    /// Category reference, e.g. en:Category:Parks_in_Berlin
    category: String,
}

#[derive(Args)]
struct TranslateArgs {
    /// Article reference, e.g. en:Berlin
    article: String,

    /// Target language codes (repeat or comma-separate; default: all)
    #[arg(short, long = "lang", value_delimiter = ',')]
    languages: Vec<String>,

    /// Print a language-to-title object instead of rows
    #[arg(long)]
    object: bool,

    /// Omit the language column
    #[arg(long)]
    skip_header: bool,
}

#[derive(Args)]
struct ExpandArgs {
    /// Article reference, e.g. en:Berlin
    article: String,

    /// Target language codes (repeat or comma-separate; default: all)
    #[arg(short, long = "lang", value_delimiter = ',')]
    languages: Vec<String>,

    /// Print a language-to-terms object instead of rows
    #[arg(long)]
    object: bool,
}

#[derive(Args)]
struct FactsArgs {
    /// Article reference, e.g. en:Berlin
    article: String,

    /// How multi-valued claims are reported: "first" or "all"
    #[arg(short, long)]
    mode: Option<String>,
}

#[derive(Args)]
struct WindowArgs {
    /// Article reference, e.g. en:Berlin
    article: String,

    /// Window start, YYYY-MM-DD or the API's own format (default: 30 days ago)
    #[arg(long)]
    start: Option<String>,

    /// Window end, YYYY-MM-DD or the API's own format
    #[arg(long)]
    end: Option<String>,
}

#[derive(Args)]
struct SuggestArgs {
    /// Search keyword
    keyword: String,

    /// Interface language for suggestions (default: en)
    #[arg(short, long = "lang")]
    language: Option<String>,
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(user_agent) = &cli.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }
    config
}

fn window(args: &WindowArgs) -> (Option<DateArg>, Option<DateArg>) {
    (
        args.start.as_deref().map(DateArg::parse),
        args.end.as_deref().map(DateArg::parse),
    )
}

fn lookup(sheet: &Sheet<HttpTransport>, command: &Commands) -> Answer {
    match command {
        Commands::Synonyms(args) => sheet.synonyms(&args.article),
        Commands::Translate(args) => {
            sheet.translate(&args.article, args.languages.as_slice(), args.object, args.skip_header)
        }
        Commands::Expand(args) => sheet.expand(&args.article, args.languages.as_slice(), args.object),
        Commands::CategoryMembers(args) => sheet.category_members(&args.category),
        Commands::Subcategories(args) => sheet.subcategories(&args.category),
        Commands::InboundLinks(args) => sheet.inbound_links(&args.article),
        Commands::OutboundLinks(args) => sheet.outbound_links(&args.article),
        Commands::MutualLinks(args) => sheet.mutual_links(&args.article),
        Commands::Geo(args) => sheet.geo_coordinates(&args.article),
        Commands::Facts(args) => sheet.facts(&args.article, args.mode.as_deref()),
        Commands::Pageviews(args) => {
            let (start, end) = window(args);
            sheet.pageviews(&args.article, start.as_ref(), end.as_ref())
        }
        Commands::PageEdits(args) => {
            let (start, end) = window(args);
            sheet.page_edits(&args.article, start.as_ref(), end.as_ref())
        }
        Commands::Suggest(args) => sheet.suggest(&args.keyword, args.language.as_deref()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = client_config(&cli);
    debug!(user_agent = %config.user_agent, timeout_ms = config.timeout.as_millis() as u64, "client config");
    let sheet = Sheet::connect(&config).context("Failed to build HTTP client")?;

    let answer = lookup(&sheet, &cli.command);
    if answer.is_empty() {
        debug!("No result");
    }

    output::render(&answer, cli.format, io::stdout().lock()).context("Failed to write output")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
