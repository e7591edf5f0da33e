use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "comet-scaffold",
    about = "Scaffold a COM project from a template manifest",
    version
)]
pub struct Cli {
    /// Directory holding the template files
    ///
    /// Files other than .bmp/.ico/.gif/.rtf/.css are rendered with Tera, so they
    /// must be UTF-8 and any literal `{{`, `{%` or `{#` must be wrapped in
    /// `{% raw %}...{% endraw %}`.
    #[arg(long, value_name = "DIR")]
    pub templates: PathBuf,

    /// Directory to create the project in
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Name of the new project
    #[arg(long)]
    pub project_name: String,

    /// Manifest listing template files (default: <templates>/Templates.inf)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// TOML file with a [symbols] table
    #[arg(long, value_name = "PATH")]
    pub symbols: Option<PathBuf>,

    /// Set symbol values (can be repeated: -d UNICODE=true)
    #[arg(short, long = "define", value_name = "KEY=VALUE")]
    pub define: Vec<String>,

    /// Scaffold into a non-empty output directory
    #[arg(long)]
    pub overwrite: bool,

    /// Show the files that would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log each materialized file
    #[arg(short, long)]
    pub verbose: bool,
}
