mod args;
mod logging;
mod output;

use std::path::Path;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use log::{error, info};
use mailprobe_lib::{
    ConsoleProgress, DelayRange, ThreadPacer, Verifier, check_mx, read_sheet, write_sheet,
};

// codes de sortie : 0 OK, 1 fatal, 2 adresse invalide (verify)
const EXIT_OK: i32 = 0;
const EXIT_FATAL: i32 = 1;
const EXIT_INVALID: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let Some(cmd) = cli.cmd.as_ref() else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    logging::init(&cli.log_file)?;

    let code = match cmd {
        Commands::Batch {
            input,
            column,
            output,
            min_delay,
            max_delay,
            format,
        } => {
            let delay = args::delay_range(*min_delay, *max_delay)?;
            run_batch(&cli, input, column, output, &delay, format)?
        }
        Commands::Verify { email } => {
            let verifier = Verifier::system(cli.verifier_options()?, cli.probe_options())
                .context("DNS resolver")?;
            let verdict = verifier.verify_email(email);
            output::print_verdict(email, verdict.is_valid, &verdict.message);
            if verdict.is_valid { EXIT_OK } else { EXIT_INVALID }
        }
        Commands::Mx { domain } => {
            let status = check_mx(domain).with_context(|| format!("MX lookup for {domain}"))?;
            println!("{domain}: {}", output::mx_human_summary(&status));
            EXIT_OK
        }
    };

    if code != EXIT_OK {
        std::process::exit(code);
    }
    Ok(())
}

/// Runs a whole batch and returns the process exit code. Input problems are
/// reported before any resolver or socket is created.
fn run_batch(
    cli: &Cli,
    input: &Path,
    column: &str,
    output_path: &Path,
    delay: &DelayRange,
    format: &str,
) -> Result<i32> {
    let verifier_options = cli.verifier_options()?;
    println!("Starting email validation process...");

    let (mut sheet, emails) = match read_sheet(input, column) {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("No emails to process. Please check your input file and column name.");
            return Ok(EXIT_FATAL);
        }
    };
    if emails.is_empty() {
        error!("No emails to process.");
        eprintln!("No emails to process. Please check your input file and column name.");
        return Ok(EXIT_FATAL);
    }
    println!("Found {} emails to validate.", emails.len());

    let verifier = Verifier::system(verifier_options, cli.probe_options())
        .context("DNS resolver")?;
    info!(
        "mode {:?}, MX choice {:?}, delay {}-{}s",
        verifier.options().validation_mode,
        verifier.options().mx_selection,
        delay.min(),
        delay.max()
    );
    let results =
        verifier.process_email_list(&emails, delay, &mut ThreadPacer, &mut ConsoleProgress);

    let saved = sheet
        .append_results(&results)
        .and_then(|()| write_sheet(output_path, &sheet));
    match &saved {
        Ok(()) => println!(
            "Validation complete! Results saved to {}",
            output_path.display()
        ),
        Err(err) => eprintln!("Error saving results: {err}"),
    }

    output::write_summary(&results, format)?;

    Ok(if saved.is_ok() { EXIT_OK } else { EXIT_FATAL })
}
