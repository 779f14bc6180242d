use clap::{Parser, Subcommand};

const CMD_NAME: &str = "sba";

/// Stores our command-line args format.
#[derive(Parser)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Print additional debugging info
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the generated script to stdout instead of submitting it
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub mode: Mode,
}

/// One subcommand per synthesizer variant.
///
/// Both take the same trailing argument list: any number of sbatch
/// options, then the input source ('-' for stdin), then the job file.
/// We can't let clap parse the sbatch options itself since we don't
/// know their arity; the split happens later, in Settings.
#[derive(Subcommand)]
pub enum Mode {
    /// One task per input line, passed to the job file as arguments
    Lines {
        /// [SBATCH_OPT]... <LIST|-> <JOB_FILE>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        #[arg(required = true, value_name = "ARG")]
        args: Vec<String>,
    },
    /// One task per table row, exported to the job file as _FIELD vars
    Table {
        /// [SBATCH_OPT]... <TABLE|-> <JOB_FILE>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        #[arg(required = true, value_name = "ARG")]
        args: Vec<String>,
    },
}
