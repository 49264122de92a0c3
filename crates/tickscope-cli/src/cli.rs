//! CLI argument definitions for tickscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `summary` | Summary rows joining fundamentals with daily and intraday indicators |
//! | `technicals` | Indicator set for one ticker |
//! | `fundamentals` | Fundamentals snapshot for one ticker |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Serve deterministic offline data |
//! | `--cache` | `use` | Cache mode (use, refresh, bypass) |
//! | `--history-ttl-secs` | `60` | Price history cache lifetime |
//! | `--fundamentals-ttl-secs` | `21600` | Fundamentals cache lifetime |
//! | `--timeout-ms` | `10000` | Upstream request timeout |
//!
//! # Examples
//!
//! ```bash
//! tickscope summary AAPL MSFT NVDA --format table
//! tickscope technicals AAPL --period 6mo --interval 1d --pretty
//! tickscope fundamentals BRK-B --mock
//! tickscope summary AAPL --rounds 3 --every-secs 20
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickscope_core::CacheMode;

/// Stock indicators, fundamentals and summary rows from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "tickscope",
    author,
    version,
    about = "Stock indicators, fundamentals and summary rows",
    long_about = "tickscope fetches price history and fundamentals for equity tickers, \
derives moving averages, RSI and trend slope, and joins them into summary rows.\n\
\n\
Values that cannot be computed are reported as null (json) or 'no data' (table).\n\
\n\
Use 'tickscope <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic offline data instead of calling Yahoo Finance.
    ///
    /// Tickers starting with ZZ behave as unknown tickers.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// How requests interact with the in-process cache.
    #[arg(long, global = true, value_enum, default_value_t = CacheArg::Use)]
    pub cache: CacheArg,

    /// Price history cache lifetime in seconds (0 disables the cache).
    #[arg(long, global = true, default_value_t = 60)]
    pub history_ttl_secs: u64,

    /// Fundamentals cache lifetime in seconds (0 disables the cache).
    #[arg(long, global = true, default_value_t = 21_600)]
    pub fundamentals_ttl_secs: u64,

    /// Upstream request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// Aligned text table for terminal display.
    Table,
}

/// Cache mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheArg {
    /// Serve fresh entries; fetch and store on miss.
    Use,
    /// Always fetch and replace stored entries.
    Refresh,
    /// Always fetch; never read or write the cache.
    Bypass,
}

impl From<CacheArg> for CacheMode {
    fn from(value: CacheArg) -> Self {
        match value {
            CacheArg::Use => Self::Use,
            CacheArg::Refresh => Self::Refresh,
            CacheArg::Bypass => Self::Bypass,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summary rows for one or more tickers.
    ///
    /// Each row joins the fundamentals snapshot with indicators from a daily
    /// series and the latest intraday price.
    ///
    /// # Examples
    ///
    ///   tickscope summary AAPL MSFT
    ///   tickscope summary AAPL --rounds 3 --every-secs 20 --format table
    Summary(SummaryArgs),

    /// Indicator set (last close, MA20/50/200, RSI14, 60-point trend slope).
    ///
    /// # Examples
    ///
    ///   tickscope technicals AAPL
    ///   tickscope technicals AAPL --period 1d --interval 5m
    Technicals(TechnicalsArgs),

    /// Fundamentals snapshot for a ticker.
    ///
    /// # Examples
    ///
    ///   tickscope fundamentals AAPL --format table
    Fundamentals(FundamentalsArgs),
}

/// Arguments for the `summary` command.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// One or more tickers (e.g., AAPL, MSFT, BRK-B).
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,

    /// History range for daily indicators.
    #[arg(long, default_value = "1y")]
    pub daily_period: String,

    /// Bar interval for daily indicators.
    #[arg(long, default_value = "1d")]
    pub daily_interval: String,

    /// History range for the intraday price.
    #[arg(long, default_value = "1d")]
    pub intraday_period: String,

    /// Bar interval for the intraday price.
    #[arg(long, default_value = "5m")]
    pub intraday_interval: String,

    /// Number of times to build the rows.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,

    /// Seconds to wait between rounds.
    #[arg(long, default_value_t = 30)]
    pub every_secs: u64,
}

/// Arguments for the `technicals` command.
#[derive(Debug, Args)]
pub struct TechnicalsArgs {
    /// Ticker to compute indicators for.
    pub ticker: String,

    /// History range token (1d, 5d, 1mo, 6mo, 1y, 5y, max, ...).
    #[arg(long, default_value = "1y")]
    pub period: String,

    /// Bar interval token (1m, 5m, 1h, 1d, 1wk, ...).
    #[arg(long, default_value = "1d")]
    pub interval: String,
}

/// Arguments for the `fundamentals` command.
#[derive(Debug, Args)]
pub struct FundamentalsArgs {
    /// Ticker to fetch the snapshot for.
    pub ticker: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn summary_defaults_cover_daily_and_intraday_windows() {
        let cli = Cli::try_parse_from(["tickscope", "summary", "AAPL", "MSFT"]).expect("parses");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.cache, CacheArg::Use);
        assert_eq!(cli.history_ttl_secs, 60);
        assert_eq!(cli.fundamentals_ttl_secs, 21_600);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary command");
        };
        assert_eq!(args.tickers, ["AAPL", "MSFT"]);
        assert_eq!((args.daily_period.as_str(), args.daily_interval.as_str()), ("1y", "1d"));
        assert_eq!(
            (args.intraday_period.as_str(), args.intraday_interval.as_str()),
            ("1d", "5m")
        );
        assert_eq!(args.rounds, 1);
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tickscope",
            "technicals",
            "AAPL",
            "--mock",
            "--cache",
            "bypass",
            "--format",
            "table",
        ])
        .expect("parses");

        assert!(cli.mock);
        assert_eq!(CacheMode::from(cli.cache), CacheMode::Bypass);
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn zero_rounds_are_rejected() {
        assert!(Cli::try_parse_from(["tickscope", "summary", "AAPL", "--rounds", "0"]).is_err());
    }
}
