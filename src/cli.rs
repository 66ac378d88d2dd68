// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cfkit::deploy::DeployStrategy;

#[derive(Parser)]
#[command(name = "cfkit")]
#[command(about = "Cloud Foundry v3 client: browse orgs, spaces and apps, and push builds")]
#[command(version)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of discovering cfkit.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter cfkit.yml in the current directory
    Init {
        /// API root URL
        #[arg(short, long)]
        target: Option<String>,

        /// App name
        #[arg(short, long)]
        app: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Log in and print the access token
    Login,

    /// List organizations
    Orgs,

    /// List spaces, optionally only those of one org
    Spaces {
        #[arg(short, long)]
        org: Option<String>,
    },

    /// List apps in a space
    Apps {
        #[arg(short, long)]
        org: String,

        #[arg(short, long)]
        space: String,
    },

    /// Start an app
    Start(AppArgs),

    /// Stop an app
    Stop(AppArgs),

    /// Delete an app
    Delete(AppArgs),

    /// Push the app described in the config's app block
    Push {
        /// Override the configured deploy strategy
        #[arg(long)]
        strategy: Option<DeployStrategy>,
    },
}

#[derive(clap::Args)]
pub struct AppArgs {
    #[arg(short, long)]
    pub org: String,

    #[arg(short, long)]
    pub space: String,

    pub app: String,
}
