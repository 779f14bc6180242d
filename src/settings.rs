use crate::args::{Args, Mode};
use crate::input::Source;
use anyhow::Result;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("expected at least an input source and a job file (got {0} arguments)")]
    MissingOperands(usize),
}

/// Which synthesizer variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// each record is a line, decoded into the job file's argument vector
    Lines,
    /// each record is a table row, exported as _FIELD environment variables
    Table,
}

/// Settings are like Args, except all the logic has been applied,
/// e.g. the trailing argument list has been split into sbatch options
/// and the two positional operands.
#[derive(Debug)]
pub struct Settings {
    pub verbose: u8,
    pub dry_run: bool,
    pub variant: Variant,
    /// options forwarded to sbatch verbatim, in original order
    pub sbatch_opts: Vec<String>,
    /// where the records come from
    pub source: Source,
    /// the user's job file, as given on the command line
    pub job_file: String,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let (variant, trailing) = match args.mode {
            Mode::Lines { args } => (Variant::Lines, args),
            Mode::Table { args } => (Variant::Table, args),
        };

        // everything up to the last two arguments belongs to sbatch:
        if trailing.len() < 2 {
            return Err(Error::MissingOperands(trailing.len()).into());
        }
        let mut sbatch_opts = trailing;
        let job_file = sbatch_opts.pop().unwrap_or_default();
        let source = Source::parse(&sbatch_opts.pop().unwrap_or_default());

        Ok(Self {
            verbose: args.verbose,
            dry_run: args.dry_run,
            variant,
            sbatch_opts,
            source,
            job_file,
        })
    }
}
