use crate::quote;

/// Shell variable Slurm sets to the task's 1-based index.
const TASK_ID_VAR: &str = "SLURM_ARRAY_TASK_ID";

/// Runtime snippet that re-derives one row's bindings from the embedded
/// table: skip the header, pick row (task index + 1), and print one
/// `export _<field>='<value>'` line per column. Any single quote in a
/// value is replaced by quote-backslash-quote-quote so it can't
/// terminate the quoting; values are otherwise untouched.
const AWK_ROW_BINDINGS: &str = r#"awk -F "\t" -v q="'" -v task="$SLURM_ARRAY_TASK_ID" '
NR == 1 { for (i = 1; i <= NF; i++) name[i] = $i; next }
NR == task + 1 {
    for (i = 1; i <= NF; i++) {
        val = $i
        gsub(q, q "\\\\" q q, val)
        printf "export _%s=%s%s%s\n", name[i], q, val, q
    }
}'"#;

/// Utility for building the contents of the array-job script.
/// Note that it modifies a String reference held internally;
/// read that String to get the script's contents.
#[derive(Debug)]
pub struct ScriptBuilder<'a> {
    strbuf: &'a mut String,
}

impl<'a> ScriptBuilder<'a> {
    pub fn new(strbuf: &'a mut String) -> Self {
        Self { strbuf }
    }
}

impl ScriptBuilder<'_> {
    /// shebang line and bash option
    pub fn write_prefix(&mut self) {
        self.strbuf.clear();
        self.strbuf.push_str("#!/usr/bin/env bash\n");
    }

    /// #SBATCH lines lifted from the job file, verbatim and in order.
    /// sbatch's own precedence puts command-line options above these.
    pub fn write_directives(&mut self, directives: &[String]) {
        for d in directives {
            self.strbuf.push_str(d);
            self.strbuf.push('\n');
        }
    }

    /// sbatch stops scanning for #SBATCH lines at the first
    /// non-comment line, so shell options can't ride along with the
    /// shebang; they go here, right after the directive block.
    pub fn write_shell_opts(&mut self) {
        self.strbuf.push_str("set -u\n\n");
    }

    /// refuse to run with a task index outside 1..=ntasks
    pub fn write_task_guard(&mut self, ntasks: usize) {
        self.strbuf.push_str(&format!(
            "if [ \"${{{TASK_ID_VAR}:-0}}\" -lt 1 ] || [ \"${{{TASK_ID_VAR}:-0}}\" -gt {ntasks} ]; then\n\
             \techo \"sba: {TASK_ID_VAR} must be between 1 and {ntasks}\" >&2\n\
             \texit 1\n\
             fi\n\n",
        ));
    }

    /// the embedded record list, one already-requoted line per element,
    /// quoted again so each line is a single array element
    pub fn write_line_tasks(&mut self, encoded_lines: &[String]) -> Result<(), quote::Error> {
        self.strbuf.push_str("tasks=(\n");
        for line in encoded_lines {
            self.strbuf.push_str(&quote::quote(line)?);
            self.strbuf.push('\n');
        }
        self.strbuf.push_str(")\n\n");
        Ok(())
    }

    /// decode the current task's element back into words and hand them
    /// to the job file as its argument vector, replacing this process
    pub fn write_line_exec(&mut self, job_file: &str) -> Result<(), quote::Error> {
        self.strbuf.push_str(&format!(
            "eval \"set -- ${{tasks[$(({TASK_ID_VAR} - 1))]}}\"\n"
        ));
        self.strbuf.push_str("exec ");
        self.strbuf.push_str(&quote::quote(job_file)?);
        self.strbuf.push_str(" \"$@\"\n");
        Ok(())
    }

    /// embed the filtered table (header first) in a quoted heredoc and
    /// eval the assignments the awk snippet derives from it at runtime
    pub fn write_table_bindings(&mut self, records: &[String]) {
        let delim = heredoc_delim(records);
        self.strbuf.push_str("bindings=\"$(");
        self.strbuf.push_str(AWK_ROW_BINDINGS);
        self.strbuf.push_str(&format!(" <<'{delim}'\n"));
        for record in records {
            self.strbuf.push_str(record);
            self.strbuf.push('\n');
        }
        self.strbuf.push_str(&format!("{delim}\n)\"\n\n"));
        self.strbuf.push_str("eval \"$bindings\"\n");
    }

    /// all data crosses as _FIELD variables; no arguments are passed
    pub fn write_table_exec(&mut self, job_file: &str) -> Result<(), quote::Error> {
        self.strbuf.push_str("exec ");
        self.strbuf.push_str(&quote::quote(job_file)?);
        self.strbuf.push('\n');
        Ok(())
    }
}

/// Pick a heredoc delimiter no record collides with.
fn heredoc_delim(records: &[String]) -> String {
    let mut delim = String::from("SBA_DATA");
    while records.iter().any(|r| *r == delim) {
        delim.push('_');
    }
    delim
}
