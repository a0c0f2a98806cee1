//! CLI argument definitions for `cartridge-package`.
//!
//! Kept apart from the entrypoint so the binary stays focused on
//! orchestration and the flags can be unit tested.

use camino::Utf8PathBuf;
use clap::Parser;

/// Package a cartridge into component archives and update its descriptors.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cartridge-package")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Validate the package declarations only:\n",
    "    $ cartridge-package --validate-only\n\n",
    "  Build archives and update both descriptors:\n",
    "    $ cartridge-package --pom build/pom.xml --ivy build/ivy.xml\n",
))]
pub struct Cli {
    /// Cartridge project directory.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub project_dir: Utf8PathBuf,

    /// Manifest file [default: <DIR>/cartridge.toml].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Directory receiving archives and the summary [default: <DIR>/build].
    #[arg(short, long, value_name = "DIR")]
    pub build_dir: Option<Utf8PathBuf>,

    /// Maven POM to register and update in place.
    #[arg(long, value_name = "FILE")]
    pub pom: Option<Utf8PathBuf>,

    /// Ivy descriptor to register and update in place.
    #[arg(long, value_name = "FILE")]
    pub ivy: Option<Utf8PathBuf>,

    /// Check the package declarations and exit without archiving.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}
