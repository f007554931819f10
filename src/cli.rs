use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "update-sources",
    about = "Merge a newly published build into an app catalog (sources.json)",
    long_about = "Merge a newly published build into an app catalog (sources.json).\n\n\
        Release facts are read from the environment: VERSION_IPA, VERSION_DATE, \
        RELEASE_CHANNEL (or BETA), COMMIT_ID, SIZE, SHA256, LOCALIZED_DESCRIPTION, \
        DOWNLOAD_URL and BUNDLE_IDENTIFIER.",
    version,
    author
)]
pub struct Cli {
    /// Path to the sources JSON file to update in place
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Which release-history layout to update
    #[arg(long, value_enum, default_value_t = Variant::Channel)]
    pub variant: Variant,

    /// Print the updated document without writing it back
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// `releaseChannels` mapping keyed by RELEASE_CHANNEL (schema v2+)
    Channel,
    /// Flat `versions` list tagged with the BETA flag
    Beta,
}
