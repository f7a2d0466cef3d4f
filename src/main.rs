use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memoranet::board::{Position, START_FEN};
use memoranet::chess_openings::default_opening_book;
use memoranet::engine::{MemoryExtractor, OnePlyOracle, SearchBudget};
use memoranet::package::{MemoryPackage, TokenizedPackage};
use memoranet::selector::{MemoryBackedSelector, MoveSelect, OracleBackedSelector, Outcome, SelectorConfig};
use memoranet::tokenizer::{detokenize_package, tokenize_package};

#[derive(Parser, Debug)]
#[command(author, version, about = "Package chess knowledge into tokens and play from it", long_about = None)]
struct Args {
    /// Selector configuration (JSON); defaults apply for missing fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Analyse the built-in opening lines and write a memory package
    Extract {
        #[arg(long)]
        out: PathBuf,
        /// Ranked moves kept per position
        #[arg(long, default_value_t = 3)]
        multipv: usize,
        #[arg(long, default_value = "one-ply")]
        source: String,
    },
    /// Tokenize a memory package
    Tokenize {
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Decode a tokenized package back to the raw shape
    Detokenize {
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Learn a tokenized package and pick a move for a position
    Select {
        tokens: PathBuf,
        #[arg(long, default_value = START_FEN)]
        fen: String,
    },
    /// Let the learner play against the one-ply teacher
    Play {
        tokens: Option<PathBuf>,
        #[arg(long, default_value_t = 20)]
        plies: usize,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SelectorConfig> {
    match path {
        Some(p) => SelectorConfig::load(p).with_context(|| format!("load config: {}", p.display())),
        None => Ok(SelectorConfig::default()),
    }
}

fn learner(config: SelectorConfig, tokens: Option<&PathBuf>) -> Result<MemoryBackedSelector> {
    let mut student = MemoryBackedSelector::new("Student", config, Arc::new(default_opening_book()));
    if let Some(path) = tokens {
        let pkg = TokenizedPackage::load(path).with_context(|| format!("load tokens: {}", path.display()))?;
        let report = student.learn_from_tokenized_memory(&pkg);
        println!("learned {} records, skipped {}", report.learned, report.rejected.len());
    }
    Ok(student)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.cmd {
        Cmd::Extract { out, multipv, source } => {
            let budget = SearchBudget { multipv, ..SearchBudget::default() };
            let mut extractor = MemoryExtractor::new(OnePlyOracle, budget, &source);
            let created = format!("{:.0}", memoranet::package::now_secs());
            let pkg = extractor.extract_opening_lines(&default_opening_book(), &created)?;
            let path = pkg.save(&out).with_context(|| format!("write package: {}", out.display()))?;
            println!("wrote {} memories to {}", pkg.memories.len(), path.display());
        }
        Cmd::Tokenize { input, out } => {
            let pkg = MemoryPackage::load(&input).with_context(|| format!("load package: {}", input.display()))?;
            let (tokens, rejected) = tokenize_package(&pkg);
            let path = tokens.save(&out).with_context(|| format!("write tokens: {}", out.display()))?;
            println!("tokenized {} memories ({} skipped) into {}", tokens.tokenized_memories.len(), rejected.len(), path.display());
        }
        Cmd::Detokenize { input, out } => {
            let tokens = TokenizedPackage::load(&input).with_context(|| format!("load tokens: {}", input.display()))?;
            let (pkg, rejected) = detokenize_package(&tokens);
            let path = pkg.save(&out).with_context(|| format!("write package: {}", out.display()))?;
            println!("decoded {} memories ({} skipped) into {}", pkg.memories.len(), rejected.len(), path.display());
        }
        Cmd::Select { tokens, fen } => {
            let mut student = learner(config, Some(&tokens))?;
            match student.get_move(&fen)? {
                Outcome::Selected(sel) => {
                    println!("move: {}", sel.uci);
                    println!("source: {:?}", sel.source);
                    println!("confidence: {:.1}%", sel.confidence);
                }
                Outcome::DrawByRepetition => println!("draw by repetition"),
                Outcome::NoLegalMove => println!("no legal move"),
            }
        }
        Cmd::Play { tokens, plies } => {
            let mut student = learner(config, tokens.as_ref())?;
            let mut teacher = OracleBackedSelector::new("Teacher", OnePlyOracle, SearchBudget::default());
            let mut pos = Position::startpos();
            for ply in 0..plies {
                if pos.is_game_over() {
                    println!("game over");
                    break;
                }
                let fen = pos.fen();
                let mv = if ply % 2 == 0 { student.select_move(&fen)? } else { teacher.select_move(&fen)? };
                let Some(mv) = mv else {
                    println!("no move available (draw or no legal move)");
                    break;
                };
                println!("{:>3}. {} {}", ply / 2 + 1, if ply % 2 == 0 { "student" } else { "teacher" }, mv);
                pos.make_move_uci(&mv).with_context(|| format!("apply {mv}"))?;
            }
            let stats = student.stats();
            println!("opening: {}", student.current_opening().unwrap_or("none"));
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
