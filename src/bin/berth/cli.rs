//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use berth::core::platform::{Arch, BuildType, Compiler, Os, ProfileOverrides};

/// Berth - declarative dependency setup for native C/C++ applications
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a Berth.toml in an existing directory
    Init(InitArgs),

    /// Resolve dependencies, generate CMake files and stage runtime libraries
    Install(InstallArgs),

    /// Print the requirement list for a platform profile
    Requirements(RequirementsArgs),

    /// Print the effective platform profile
    Profile(ProfileCommandArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Package name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

/// Platform profile selection, shared by several commands.
#[derive(Args, Clone, Default)]
pub struct ProfileArgs {
    /// Target operating system
    #[arg(long)]
    pub os: Option<Os>,

    /// Compiler
    #[arg(long)]
    pub compiler: Option<Compiler>,

    /// Build configuration
    #[arg(long)]
    pub build_type: Option<BuildType>,

    /// Target architecture
    #[arg(long)]
    pub arch: Option<Arch>,

    /// Profile file with a [settings] table
    #[arg(long = "profile", value_name = "FILE")]
    pub profile_file: Option<PathBuf>,
}

impl ProfileArgs {
    /// Settings given directly on the command line.
    pub fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            os: self.os,
            compiler: self.compiler,
            build_type: self.build_type,
            arch: self.arch,
        }
    }
}

#[derive(Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Path to Berth.toml
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Package store directory
    #[arg(long, env = "BERTH_STORE")]
    pub store: Option<PathBuf>,

    /// Build root, relative to the project (defaults to `build`)
    #[arg(long, short = 'o')]
    pub output_folder: Option<PathBuf>,

    /// Write CMakeUserPresets.json at the project root
    #[arg(long)]
    pub user_presets: bool,
}

#[derive(Args)]
pub struct RequirementsArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Path to Berth.toml
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ProfileCommandArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
