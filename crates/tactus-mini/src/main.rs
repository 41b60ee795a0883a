use anyhow::Result;
use clap::{Parser, Subcommand};
use tactus_mini::{parse, pattern};

#[derive(Parser)]
#[command(name = "tactus-mini")]
#[command(about = "Mini-notation parser and pattern evaluator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a pattern parses
    Validate {
        /// Pattern source text
        pattern: String,
    },
    /// Print the syntax tree for a pattern
    Ast {
        /// Pattern source text
        pattern: String,

        /// Output format (json or debug)
        #[arg(short, long, default_value = "debug")]
        output_format: String,
    },
    /// Query a pattern and print its events
    Query {
        /// Pattern source text
        pattern: String,

        /// First cycle to query
        #[arg(short, long, default_value = "0")]
        from: i64,

        /// Number of cycles to query
        #[arg(short, long, default_value = "1")]
        cycles: i64,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { pattern: source } => match parse(&source) {
            Ok(_) => {
                println!("pattern is valid");
                Ok(())
            }
            Err(e) => {
                eprintln!("parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Ast {
            pattern: source,
            output_format,
        } => match parse(&source) {
            Ok(ast) => {
                match output_format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&ast)?),
                    _ => println!("{:#?}", ast),
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("parse error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Query {
            pattern: source,
            from,
            cycles,
            format,
        } => {
            if cycles < 0 {
                anyhow::bail!("cycle count must not be negative");
            }
            match pattern(&source) {
                Ok(pat) => {
                    let haps = pat.query_arc(from, from + cycles)?;
                    match format.as_str() {
                        "json" => println!("{}", serde_json::to_string_pretty(&haps)?),
                        _ => {
                            println!("{} event(s)", haps.len());
                            for hap in &haps {
                                println!("  {}: {}", hap.value, hap.part);
                            }
                        }
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
