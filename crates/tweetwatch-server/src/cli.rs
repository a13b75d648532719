use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "tweetwatch")]
#[command(
    author,
    version,
    about = "Classify tweets as disaster or non-disaster from a web form"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TWEETWATCH_CONFIG", default_value = "tweetwatch.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long, env = "TWEETWATCH_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "TWEETWATCH_PORT")]
    pub port: Option<u16>,

    /// Classifier artifact path
    #[arg(long, env = "TWEETWATCH_CLASSIFIER")]
    pub classifier: Option<PathBuf>,

    /// Vectorizer artifact path
    #[arg(long, env = "TWEETWATCH_VECTORIZER")]
    pub vectorizer: Option<PathBuf>,

    /// Do not echo the submitted text on the result page
    #[arg(long)]
    pub no_echo: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
