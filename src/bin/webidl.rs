use std::process::ExitCode;

fn main() -> ExitCode {
    webidl_cst::cli::run()
}
