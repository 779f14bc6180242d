use colored::Colorize;

fn main() {
    match sbatch_array::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "sba:".red().bold());
            std::process::exit(1);
        }
    }
}
