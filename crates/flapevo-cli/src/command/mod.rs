use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, evaluate::EvaluateArg, train::TrainArg};

mod default_config;
mod evaluate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a policy network using the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Evaluate a trained model against the scenario set
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Print the default run configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
