use comet_scaffold::error::Result;
use comet_scaffold::symbols::parse_symbol;
use comet_scaffold::ScaffoldOptions;
use console::style;

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let symbols = cli
        .define
        .iter()
        .map(|kv| parse_symbol(kv))
        .collect::<Result<Vec<_>>>()?;

    let options = ScaffoldOptions {
        templates: cli.templates,
        out: cli.out,
        project_name: cli.project_name,
        manifest: cli.manifest,
        symbols_file: cli.symbols,
        symbols,
        overwrite: cli.overwrite,
    };

    if !cli.dry_run {
        comet_scaffold::scaffold(&options)?;
        return Ok(());
    }

    let plan = comet_scaffold::plan_scaffold(&options)?;

    println!(
        "\n{} Dry run: files that would be created in {}:",
        style("==>").cyan().bold(),
        style(options.out.display()).cyan()
    );
    for entry in &plan {
        let action = if entry.policy.is_copy() {
            "copy  "
        } else {
            "render"
        };
        if entry.logical_name == entry.target_name {
            println!("  {} {}", style(action).green(), entry.target_name);
        } else {
            println!(
                "  {} {} {}",
                style(action).green(),
                entry.target_name,
                style(format!("(from {})", entry.logical_name)).dim()
            );
        }
    }

    let copied = plan.iter().filter(|e| e.policy.is_copy()).count();
    println!(
        "\nSummary: {} rendered, {} copied",
        plan.len() - copied,
        copied
    );
    println!(
        "\n{} Dry run: no files written.",
        style("\u{2139}").blue().bold()
    );

    Ok(())
}
