mod cli;

use anyhow::Context;
use ose_inventory::config::Config;
use ose_inventory::inventory::Inventory;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("OSE_INVENTORY_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Render(render_cli) => render(render_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn render(cli: cli::RenderCommand) -> anyhow::Result<()> {
    let config: Config = load(&cli.input)?.parse()?;

    let inventory = Inventory::new(&config).with_key_order(cli.key_order.into());

    match &cli.output_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            inventory.write_to(std::io::BufWriter::new(file))?;
            tracing::info!(path=%path.display(), "inventory written");
        }
        None => inventory.write_to(std::io::stdout().lock())?,
    }

    Ok(())
}

/// Reads the document, from stdin when no file is given
fn load(input: &cli::InputArgs) -> anyhow::Result<String> {
    let text = match &input.file {
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
        Some(file_path) => {
            tracing::info!(path=%file_path.display(), "loading file");
            std::fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read {}", file_path.display()))?
        }
    };

    Ok(text)
}

/// (ose-inventory-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    match cli.command {
        cli::DevSubCommand::Document(input) => {
            let document = ose_inventory::document::parse(&load(&input)?)
                .map_err(ose_inventory::config::ParseError::Syntax)?;
            println!("{document:#?}");
        }
        cli::DevSubCommand::Config(config_cli) => {
            let config: Config = load(&config_cli.input)?.parse()?;

            match config_cli.output.format {
                cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &config)?,
                cli::OutputFormat::Json => {
                    serde_json::to_writer_pretty(std::io::stdout(), &config)?;
                    println!();
                }
            };
        }
    }

    Ok(())
}
