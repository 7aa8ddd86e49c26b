//! gdoc2tex - Google Docs to LaTeX converter

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use gdoc2tex::remote::{DriveClient, HttpFetcher};
use gdoc2tex::template::render_template;
use gdoc2tex::{ConvertOptions, Error, SourceDocument, convert_document};

#[derive(Parser)]
#[command(name = "gdoc2tex")]
#[command(version, about = "Google Docs to LaTeX converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    gdoc2tex 1AbC...xyz                  Convert a Drive document with default.tex
    gdoc2tex 1AbC...xyz thesis.tex       Convert with a custom template
    gdoc2tex --local export.html         Convert a downloaded HTML export")]
struct Cli {
    /// Drive file id (or an HTML file with --local)
    #[arg(value_name = "DOCUMENT")]
    document: Option<String>,

    /// LaTeX template with #{title}, #{subtitle}, #{author}, #{abstract} and #{yield}
    #[arg(value_name = "TEMPLATE", default_value = "default.tex")]
    template: PathBuf,

    /// Treat DOCUMENT as a local HTML export
    #[arg(long)]
    local: bool,

    /// Map h1 to \section instead of \chapter
    #[arg(long)]
    no_chapters: bool,

    /// Put standalone formulas in numbered equation environments
    #[arg(long)]
    numbered_equations: bool,

    /// Leave \backslash tokens in formulas as they are
    #[arg(long)]
    keep_backslash_token: bool,

    /// Directory for the .tex file, images and bibliography
    #[arg(short, long, value_name = "DIR", default_value = "latex")]
    output_dir: PathBuf,

    /// OAuth access token for the Drive API
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Also save the HTML export next to the .tex file
    #[arg(long)]
    keep_html: bool,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let Some(document) = cli.document.as_deref() else {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    match convert(&cli, document) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn convert(cli: &Cli, document: &str) -> gdoc2tex::Result<()> {
    let options = ConvertOptions::new()
        .with_chapters(!cli.no_chapters)
        .with_numbered_equations(cli.numbered_equations)
        .with_backslash_replacement(!cli.keep_backslash_token)
        .with_output_dir(&cli.output_dir);

    let fetcher = HttpFetcher::new(cli.access_token.clone())?;
    let source = if cli.local {
        SourceDocument::from_file(document)?
    } else {
        if !fetcher.is_authorized() {
            return Err(Error::MissingAccessToken);
        }
        DriveClient::new(&fetcher).fetch_document(document)?
    };

    log::info!("Using template {}", cli.template.display());
    let template = fs::read_to_string(&cli.template)?;

    fs::create_dir_all(&options.output_dir)?;
    let doc = convert_document(&source, &options, &fetcher)?;

    if cli.keep_html {
        let html_path = options.output_dir.join(format!("{}.html", doc.base_name));
        fs::write(&html_path, &source.html)?;
        log::info!("Wrote {}", html_path.display());
    }

    if !doc.diagnostics.is_empty() {
        log::warn!("{} problem(s) during conversion", doc.diagnostics.len());
    }

    let path = options.output_path(&doc.base_name);
    fs::write(&path, render_template(&template, &doc.placeholders()))?;
    log::info!("Wrote {}", path.display());

    Ok(())
}
