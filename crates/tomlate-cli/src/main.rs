//! Tomlate CLI - translate INI/CFG documents to TOML

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use miette::Result;
use tomlate::Translator;

mod error;
mod exit_codes;

use error::CliError;

#[derive(Parser)]
#[command(name = "tomlate")]
#[command(version)]
#[command(about = "Translate INI/CFG documents to TOML, preserving comments", long_about = None)]
struct Cli {
    /// Input file, or '-' to read from stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Translation profile to apply
    #[arg(short, long, default_value = "default")]
    profile: String,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable an augmentation for this run (repeatable)
    #[arg(short = 'E', long = "enable", value_name = "NAME")]
    enable: Vec<String>,

    /// Disable an augmentation for this run (repeatable)
    #[arg(short = 'D', long = "disable", value_name = "NAME")]
    disable: Vec<String>,

    /// List registered profiles and augmentations, then exit
    #[arg(long)]
    list_profiles: bool,
}

fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
    Ok(())
}

fn run(cli: Cli) -> std::result::Result<(), CliError> {
    let translator = Translator::new();

    if cli.list_profiles {
        print_registry(&translator);
        return Ok(());
    }

    let source = read_input(&cli.input)?;
    let mut overrides = HashMap::new();
    for name in &cli.enable {
        overrides.insert(name.clone(), true);
    }
    for name in &cli.disable {
        overrides.insert(name.clone(), false);
    }

    let output = translator.translate_with(&source, &cli.profile, &overrides)?;
    match &cli.output {
        Some(path) => fs::write(path, output)
            .map_err(|e| CliError::io(&format!("cannot write {}", path.display()), &e))?,
        None => print!("{output}"),
    }
    Ok(())
}

fn read_input(input: &Path) -> std::result::Result<String, CliError> {
    if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CliError::io("cannot read stdin", &e))?;
        Ok(buffer)
    } else {
        fs::read_to_string(input)
            .map_err(|e| CliError::io(&format!("cannot read {}", input.display()), &e))
    }
}

fn print_registry(translator: &Translator) {
    println!("Profiles:");
    for profile in translator.profiles() {
        let default = if profile.active_by_default() { " (default)" } else { "" };
        println!("  {}{} - {}", profile.name(), default, profile.description());
        if !profile.help_text().is_empty() {
            println!("      {}", profile.help_text());
        }
    }
    println!();
    println!("Augmentations:");
    for augmentation in translator.augmentations() {
        let state = if augmentation.active_by_default() { "on" } else { "off" };
        println!("  {} [{}] - {}", augmentation.name(), state, augmentation.help_text());
    }
}
