mod app;
mod cli;
mod execution;
mod harness;
mod panic_message;
mod report;
mod runner;
mod stats;
mod suite;

fn main() {
    env_logger::init();
    std::process::exit(app::run());
}
