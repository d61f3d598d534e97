use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "statusprobe")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Health checks for external dependencies via status pages and direct probes")]
pub struct Cli {
    /// Write the default config to ~/.statusprobe/config.toml
    #[arg(long = "init")]
    pub init: bool,

    /// Print the effective configuration
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Validate the configuration
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// List configured targets
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Only check these target ids (repeatable)
    #[arg(short = 't', long = "target")]
    pub targets: Vec<String>,

    /// Emit results as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Always show the diagnostic trace
    #[arg(long = "trace")]
    pub trace: bool,

    /// Shorter relay and probe timeouts
    #[arg(short = 'q', long = "quick")]
    pub quick: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
