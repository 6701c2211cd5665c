use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use romanizer_core::persistence::{load_from_disk, save_to_disk};
use romanizer_core::trace_init::init_tracing;
use romanizer_core::{
    encoding_for_label, CandidateSet, KeyOptions, Romanizer, RomanizerError, DEFAULT_PROP_TYPICAL,
};

#[derive(Parser)]
#[command(name = "romanize", about = "Generate synthetic romanized text from a transliteration key")]
struct Cli {
    #[command(flatten)]
    source: KeySource,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log build details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct KeySource {
    /// Romanization key file
    #[arg(long, global = true, conflicts_with = "snapshot")]
    key: Option<PathBuf>,

    /// Compiled key written by `compile`
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Probability mass given to the typical candidates of each grapheme
    #[arg(long, global = true, default_value_t = DEFAULT_PROP_TYPICAL)]
    prop_typical: f64,

    /// Fail on key lines that are not rules instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    /// Encoding of the key file and of the files read and written by `file`
    #[arg(long, global = true, default_value = "utf-8")]
    encoding: String,
}

#[derive(Subcommand)]
enum Command {
    /// Romanize each argument and print it on its own line
    Text {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Romanize a file line by line
    File {
        input: PathBuf,
        output: PathBuf,
        /// Replace the output file if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Show how a string splits into graphemes
    Segment {
        text: String,
        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Dump rules as JSON, all of them or a single grapheme's
    Inspect { grapheme: Option<String> },

    /// Write a compiled snapshot of the key
    Compile { output: PathBuf },
}

#[derive(Serialize)]
struct RuleView<'a> {
    grapheme: &'a str,
    candidates: &'a [String],
    cumulative: &'a [f64],
}

impl<'a> RuleView<'a> {
    fn new(grapheme: &'a str, set: &'a CandidateSet) -> Self {
        Self { grapheme, candidates: set.candidates(), cumulative: set.cumulative() }
    }
}

fn load(source: &KeySource) -> Result<Romanizer, Box<dyn std::error::Error>> {
    let encoding = encoding_for_label(&source.encoding)?;
    match (&source.key, &source.snapshot) {
        (Some(key), None) => {
            let mut options =
                KeyOptions::with_prop_typical(source.prop_typical).with_encoding(encoding);
            if source.strict {
                options = options.strict();
            }
            Ok(Romanizer::from_key_file(key, &options)?)
        }
        (None, Some(snapshot)) => Ok(load_from_disk(snapshot)?.with_encoding(encoding)),
        _ => Err("one of --key or --snapshot is required".into()),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let romanizer = load(&cli.source)?;
    let mut rng = match cli.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Text { text } => {
            for t in &text {
                writeln!(out, "{}", romanizer.transliterate_with(t, &mut rng))?;
            }
        }
        Command::File { input, output, force } => {
            let written = if force {
                romanizer.transliterate_file_with(&input, &output, &mut rng)
            } else {
                romanizer.transliterate_new_file_with(&input, &output, &mut rng)
            };
            let lines = match written {
                Err(RomanizerError::Open { ref source, .. })
                    if source.kind() == ErrorKind::AlreadyExists =>
                {
                    return Err(format!(
                        "{} already exists; choose another name or pass --force",
                        output.display()
                    )
                    .into());
                }
                other => other?,
            };
            eprintln!("{} lines -> {}", lines, output.display());
        }
        Command::Segment { text, json } => {
            let graphemes: Vec<&str> = romanizer.segment(&text).collect();
            if json {
                writeln!(out, "{}", serde_json::to_string(&graphemes)?)?;
            } else {
                writeln!(out, "{}", graphemes.join(" | "))?;
            }
        }
        Command::Inspect { grapheme } => {
            let rules = romanizer.rules();
            match grapheme {
                Some(g) => match rules.get(&g) {
                    Some(set) => {
                        writeln!(out, "{}", serde_json::to_string_pretty(&RuleView::new(&g, set))?)?
                    }
                    None => return Err(format!("no rule for {g:?}").into()),
                },
                None => {
                    let mut views: Vec<RuleView> =
                        rules.iter().map(|(g, set)| RuleView::new(g, set)).collect();
                    views.sort_by(|a, b| a.grapheme.cmp(b.grapheme));
                    writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
                }
            }
        }
        Command::Compile { output } => {
            save_to_disk(&romanizer, &output)?;
            eprintln!("{} rules -> {}", romanizer.rules().len(), output.display());
        }
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
