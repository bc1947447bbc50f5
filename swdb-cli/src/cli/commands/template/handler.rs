use anyhow::Result;
use colored::*;

use super::TemplateCommands;
use crate::import::excel::write_template_excel;

pub async fn handle_template_command(args: TemplateCommands) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Output file already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    write_template_excel(&args.output, &args.sheet_names)?;
    println!(
        "Template saved to: {}",
        args.output.display().to_string().bright_green()
    );
    Ok(())
}
