mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use folio_core::pipeline::AssembleOptions;
use folio_core::tables::{CrossPassPolicy, TablePageSelection};
use folio_core::text::{PageTextMode, TextUnit};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Page text and tables from document recognition results"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble page text and tables from a recognition result (JSON)
    Parse {
        /// Recognition result of the broad OCR pass
        document: PathBuf,

        /// Recognition result of a table pass over the same file
        #[arg(long, value_name = "DOC")]
        tables_from: Option<PathBuf>,

        #[command(flatten)]
        assemble: AssembleArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the result to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the tables of a recognition result, one row per line
    Tables {
        /// Recognition result of the broad OCR pass
        document: PathBuf,

        /// Recognition result of a table pass over the same file
        #[arg(long, value_name = "DOC")]
        tables_from: Option<PathBuf>,
    },
    /// Print the tables found by the layout-analysis processor
    Layout {
        /// Recognition result of the layout pass
        document: PathBuf,

        /// Maximum cell width in characters
        #[arg(short, long, default_value_t = 24)]
        width: usize,
    },
    /// Summarize a recognition result
    Info {
        /// Recognition result (JSON)
        document: PathBuf,
    },
    /// Run the full pipeline on a PDF, replaying recorded processor responses
    Extract {
        /// Path to the PDF
        input_file: PathBuf,

        /// Directory with one `<processor-id>.json` response per processor
        #[arg(long, value_name = "DIR")]
        recorded: PathBuf,

        #[command(flatten)]
        backend: commands::extract::BackendArgs,

        /// Restrict the OCR pass to these pages (1-based, comma separated)
        #[arg(long, value_delimiter = ',', value_name = "PAGES")]
        pages: Vec<u32>,

        /// Ask the OCR pass to skip imagery
        #[arg(long)]
        imageless: bool,

        /// Only forward pages where the OCR pass saw a table
        #[arg(long)]
        only_table_pages: bool,

        #[command(flatten)]
        assemble: AssembleArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

#[derive(clap::Args)]
struct AssembleArgs {
    /// How page text is produced
    #[arg(long, value_enum, default_value_t = TextModeArg::ReadingOrder)]
    text_mode: TextModeArg,

    /// Page elements used for reading order
    #[arg(long, value_enum, default_value_t = UnitArg::Blocks)]
    unit: UnitArg,

    /// Merge a table pass even if it fails the coordinate-space check
    #[arg(long)]
    allow_mismatch: bool,
}

impl AssembleArgs {
    fn options(&self) -> AssembleOptions {
        AssembleOptions {
            text_mode: match self.text_mode {
                TextModeArg::ReadingOrder => PageTextMode::ReadingOrder,
                TextModeArg::PageAnchor => PageTextMode::PageAnchor,
            },
            text_unit: match self.unit {
                UnitArg::Blocks => TextUnit::Blocks,
                UnitArg::Paragraphs => TextUnit::Paragraphs,
                UnitArg::Lines => TextUnit::Lines,
            },
            cross_pass: if self.allow_mismatch {
                CrossPassPolicy::Lenient
            } else {
                CrossPassPolicy::Strict
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TextModeArg {
    ReadingOrder,
    PageAnchor,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Blocks,
    Paragraphs,
    Lines,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            document,
            tables_from,
            assemble,
            output,
            out,
        } => commands::parse::run(document, tables_from, &assemble.options(), &output, out),
        Commands::Tables {
            document,
            tables_from,
        } => commands::tables::run(document, tables_from),
        Commands::Layout { document, width } => commands::layout::run(document, width),
        Commands::Info { document } => commands::info::run(document),
        Commands::Extract {
            input_file,
            recorded,
            backend,
            pages,
            imageless,
            only_table_pages,
            assemble,
            output,
        } => {
            let table_pages = if only_table_pages {
                TablePageSelection::WithTables
            } else {
                TablePageSelection::All
            };
            commands::extract::run(
                input_file,
                recorded,
                backend,
                commands::extract::pass_options(pages, imageless, table_pages),
                assemble.options(),
                &output,
            )
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
