use std::process::ExitCode;

fn main() -> ExitCode {
    match cfgraph::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cfgraph::ui::output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
