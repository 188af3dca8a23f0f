use clap::Parser;
use cnes_analyzer::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        // Dropping the command future on Ctrl+C discards the in-flight work
        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(cnes_analyzer::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(_outcome) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            if !error.is_user_facing() {
                eprintln!("Run again with -v or -vv for more detail.");
            }
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CNES Analyzer - Professional Registration Spreadsheet Analysis");
    println!("==============================================================");
    println!();
    println!("Detect duplicate CPFs, break registrations down by CBO and project the");
    println!("repasse complement owed under the nursing wage floor tables.");
    println!();
    println!("USAGE:");
    println!("    cnes-analyzer <COMMAND> [FILE] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    analyze      Print metrics, CBO breakdown, duplicates and projection total");
    println!("    export       Write the full workbook (summary, raw data, projection, duplicates)");
    println!("    duplicates   Write only the duplicates workbook");
    println!("    columns      Show which header was detected for each column role");
    println!("    help         Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Summarise a registration export:");
    println!("    cnes-analyzer analyze cadastro.csv");
    println!();
    println!("    # Export the full report as relatorio.xlsx, hiding a column:");
    println!("    cnes-analyzer export cadastro.xlsx -o relatorio --hide UF");
    println!();
    println!("    # Export the full report as a directory of CSV sheets:");
    println!("    cnes-analyzer export cadastro.csv -o relatorio --format csv");
    println!();
    println!("    # Export duplicates as a JSON document, overwriting:");
    println!("    cnes-analyzer duplicates cadastro.csv -o duplicados.json --format json --force");
    println!();
    println!("    # Pick a spreadsheet from the current directory interactively:");
    println!("    cnes-analyzer analyze");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cnes-analyzer <COMMAND> --help");
}
