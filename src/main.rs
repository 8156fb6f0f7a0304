use std::process::ExitCode;

mod app;
mod audio;
mod config;
mod error;
mod library;
mod mpris;
mod player;
mod runtime;
mod ui;

fn main() -> ExitCode {
    match runtime::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("reaganplayer: {e}");
            ExitCode::FAILURE
        }
    }
}
