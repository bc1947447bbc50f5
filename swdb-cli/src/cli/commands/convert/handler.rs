use anyhow::Result;
use colored::*;

use super::ConvertCommands;
use crate::cli::report::{print_delivery, print_issues, print_summary, write_issues};
use crate::import::KeyRegistry;
use crate::sink::{JsonFileSink, RecordSink};

pub async fn handle_convert_command(args: ConvertCommands) -> Result<()> {
    let batch = args.input.assemble(KeyRegistry::new())?;

    let mut sink = JsonFileSink::new(&args.software_out, &args.install_out);
    let report = sink.deliver(&batch).await?;

    print_summary(&batch);
    print_delivery(&sink.describe(), &report);
    print_issues(&batch.issues);
    write_issues(args.input.import.issues.as_deref(), &batch.issues)?;

    println!(
        "\nSoftware saved to: {}\nInstallations saved to: {}",
        args.software_out.display().to_string().bright_green(),
        args.install_out.display().to_string().bright_green()
    );
    Ok(())
}
