use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::directives;
use crate::input;
use crate::quote;
use crate::script::ScriptBuilder;
use crate::settings::{Settings, Variant};
use crate::submit::{self, Submitter};
use crate::table::Table;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("job file path {0:?} is not valid unicode")]
    PathEncoding(PathBuf),
}

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Read, validate, encode, emit, submit. Everything up to the
    /// submission is side-effect free, so any failure leaves the
    /// scheduler untouched.
    pub fn run(self) -> Result<i32> {
        let (script, ntasks) = self.render_script()?;

        if self.settings.dry_run {
            eprintln!("{} {ntasks} tasks, not submitting.", "Dry run:".magenta());
            print!("{script}");
            return Ok(0);
        }

        let submitter = Submitter::new(self.settings.sbatch_opts, ntasks)?;
        let status = submitter
            .submit(&script)
            .context("while submitting job array")?;
        Ok(submit::exit_code(status))
    }

    /// Assemble the array-job script without touching the scheduler.
    /// Returns the script plus the task count for the --array range.
    // exported for tests
    pub fn render_script(&self) -> Result<(String, usize)> {
        let records = input::read_records(&self.settings.source)
            .with_context(|| format!("while reading {}", self.settings.source))?;
        log::info!("read {} records from {}", records.len(), self.settings.source);

        let job_file = submit::resolve(&self.settings.job_file)?;
        let job_str = job_file
            .to_str()
            .ok_or_else(|| Error::PathEncoding(job_file.clone()))?;

        let found = directives::extract(&job_file);
        log::debug!("extracted {} directives from {job_file:?}", found.len());

        let mut buf = String::with_capacity(1024);
        let ntasks = match self.settings.variant {
            Variant::Lines => self.emit_lines(&mut buf, &records, &found, job_str)?,
            Variant::Table => self.emit_table(&mut buf, &records, &found, job_str)?,
        };
        Ok((buf, ntasks))
    }

    fn emit_lines(
        &self,
        buf: &mut String,
        records: &[String],
        found: &[String],
        job_str: &str,
    ) -> Result<usize> {
        let mut encoded = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let line = quote::requote_line(record)
                .with_context(|| format!("in record {} of {}", i + 1, self.settings.source))?;
            encoded.push(line);
        }

        let mut builder = ScriptBuilder::new(buf);
        builder.write_prefix();
        builder.write_directives(found);
        builder.write_shell_opts();
        builder.write_task_guard(records.len());
        builder.write_line_tasks(&encoded)?;
        builder.write_line_exec(job_str)?;
        Ok(records.len())
    }

    fn emit_table(
        &self,
        buf: &mut String,
        records: &[String],
        found: &[String],
        job_str: &str,
    ) -> Result<usize> {
        let table = Table::parse(records)
            .with_context(|| format!("while validating {}", self.settings.source))?;
        if table.rows.is_empty() {
            return Err(input::Error::Empty(self.settings.source.clone()).into());
        }
        log::debug!(
            "table has {} fields and {} rows",
            table.fields.len(),
            table.rows.len()
        );

        let mut builder = ScriptBuilder::new(buf);
        builder.write_prefix();
        builder.write_directives(found);
        builder.write_shell_opts();
        builder.write_task_guard(table.rows.len());
        builder.write_table_bindings(records);
        builder.write_table_exec(job_str)?;
        Ok(table.rows.len())
    }
}
