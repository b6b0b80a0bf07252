use std::{error::Error, io};

use clap::Parser;
use docwire::{
    Command, MessageWriter,
    protocol::{TextEncoderFactory, next_request_id},
};

/// Print the request a set of arguments would produce.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Request id to use; taken from the process counter when omitted
    #[arg(long, allow_negative_numbers = true)]
    request_id: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize env_logger; For logging to STDOUT/STDERR
    env_logger::init();

    let cli = Cli::parse();
    let request_id = cli.request_id.unwrap_or_else(next_request_id);
    let message = cli.command.into_message(request_id)?;

    let mut writer = MessageWriter::new(io::stdout().lock(), TextEncoderFactory::new());
    writer.write_message(message.as_ref())?;

    Ok(())
}
