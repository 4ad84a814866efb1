use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::{info, Level};
use tur_convert::{
    encode, encode_json, MachineLoader, TranslateOptions, TranslationError, Translator,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The transition table to translate (`;S` or `;I` header)
    input: PathBuf,

    /// Where to write the translated table
    output: PathBuf,

    /// Symbols the input tape may hold besides those the rules mention
    #[clap(short, long, default_value = "01")]
    alphabet: String,

    /// Write the translated machine as JSON instead of a table
    #[clap(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Loads, translates and encodes before touching the output file, so a failed
/// run never leaves a partial table behind.
fn run(cli: &Cli) -> Result<(), TranslationError> {
    let machine = MachineLoader::load_machine(&cli.input)?;

    let options = TranslateOptions {
        input_symbols: cli.alphabet.chars().collect(),
    };
    let translated = Translator::new(options).translate(&machine)?;

    let encoded = if cli.json {
        encode_json(&translated)?
    } else {
        encode(&translated)
    };

    fs::write(&cli.output, encoded).map_err(|e| {
        TranslationError::FileError(format!(
            "Failed to write file {}: {}",
            cli.output.display(),
            e
        ))
    })?;

    info!(
        "Wrote {} rules ({}) to {}",
        translated.len(),
        translated.convention,
        cli.output.display()
    );

    Ok(())
}
