use clap::Parser;
use psychrometric_toolbox::{app, cli::Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 인자를 해석한 뒤 계산 한 건을 실행한다.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}
