/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Extraction of #SBATCH directives from job files
mod directives;
/// Reading and filtering input sources
mod input;
/// Shell quoting and word splitting
mod quote;
/// Assembly of the array-job script
mod script;
/// Combined command-line run settings
mod settings;
/// Resolving executables and talking to sbatch
mod submit;
/// Tab-separated table parsing and validation
mod table;

// exported for tests:
pub use app::App;
pub use args::{Args, Mode};
pub use input::Source;
pub use settings::{Settings, Variant};

/// Run the command-line app. Returns the process exit code;
/// after a real submission this is sbatch's own exit code.
pub fn run() -> Result<i32, anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    let log_level = match settings.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(log_level);

    // RUN THE THING /////////////////
    let app = App::new(settings);
    app.run()
}
