// Interactive sampler: type a line, see how it splits and a few of the
// romanizations the key can produce for it.
// Run with: cargo run --bin simulator -- <key-file> [draws] [seed]
use crossterm::style::{Color, Stylize};
use rand::rngs::StdRng;
use rand::SeedableRng;
use romanizer_core::trace_init::init_tracing;
use romanizer_core::{KeyOptions, Romanizer};
use std::io::{self, BufRead, Write};
use std::process;

const DEFAULT_DRAWS: usize = 5;
const PALETTE: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Green, Color::Magenta];

fn main() {
    init_tracing(false);
    let args: Vec<String> = std::env::args().collect();
    let Some(key_path) = args.get(1) else {
        eprintln!("usage: simulator <key-file> [draws] [seed]");
        process::exit(2);
    };
    let draws = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_DRAWS);
    let mut rng = match args.get(3).and_then(|s| s.parse().ok()) {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let romanizer = match Romanizer::from_key_file(key_path, &KeyOptions::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            process::exit(1);
        }
    };
    println!(
        "{} rules, {} multi-character graphemes. Empty line or Ctrl-D to quit.",
        romanizer.rules().len(),
        romanizer.trie().len()
    );

    if let Err(e) = repl(&romanizer, draws, &mut rng) {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(1);
    }
}

fn repl(romanizer: &Romanizer, draws: usize, rng: &mut StdRng) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let input = line?;
        if input.is_empty() {
            break;
        }

        // Alternate colours so grapheme boundaries are visible.
        for (i, grapheme) in romanizer.segment(&input).enumerate() {
            let styled = grapheme.with(PALETTE[i % PALETTE.len()]);
            let mapped = romanizer.rules().contains(grapheme);
            if mapped {
                print!("{}", styled.bold());
            } else {
                print!("{}", styled.dim());
            }
        }
        println!();

        for n in 1..=draws {
            println!("  {} {}", format!("{n:>2}.").dark_grey(), romanizer.transliterate_with(&input, rng));
        }
        print!("\n> ");
        stdout.flush()?;
    }
    println!();
    Ok(())
}
