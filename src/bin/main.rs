use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{Context, Result};
use javaparse::{FragmentParser, ParseResult, SourceFile};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "javaparse")]
#[command(about = "Parse Java source fragments and report diagnostics")]
#[command(version)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Stop at the first syntax error
    #[arg(long, global = true)]
    no_recovery: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse Java files as compilation units
    Parse {
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Print the parsed tree as source
        #[arg(short, long)]
        tree: bool,
    },

    /// Parse an expression
    Expr {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Parse a type use such as `List<String>[]`
    TypeUse {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Parse a single type declaration
    Decl {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Lexically analyze a Java file
    Lex {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },

    /// Parse every .java file under a directory
    Check {
        #[arg(value_name = "PATH")]
        root: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = javaparse::Config::global().with_error_recovery(!cli.no_recovery);
    let parser = FragmentParser::new(config);

    let clean = match &cli.command {
        Commands::Parse { inputs, tree } => parse_files(&parser, inputs, *tree)?,
        Commands::Expr { text } => show(&parser.parse_expression(text)?),
        Commands::TypeUse { text } => show(&parser.parse_type_use(text)?),
        Commands::Decl { text } => show(&parser.parse_type_declaration(text)?),
        Commands::Lex { input, locations } => lex_file(input, *locations)?,
        Commands::Check { root } => check_tree(&parser, root)?,
    };

    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_default_env();
    if verbose > 0 {
        builder.filter_level(level);
    }
    builder.init();
}

fn report<T>(result: &ParseResult<T>) -> bool {
    if !result.diagnostics().is_empty() {
        eprintln!("{}", result.render_diagnostics());
    }
    !result.has_error()
}

fn show<T: std::fmt::Display>(result: &ParseResult<T>) -> bool {
    println!("{}", result.tree());
    report(result)
}

fn parse_files(parser: &FragmentParser, inputs: &[PathBuf], tree: bool) -> Result<bool> {
    let mut clean = true;
    for input in inputs {
        let result = parser.parse_file(input)?;
        if tree {
            println!("{}", result.tree());
        }
        clean &= report(&result);
    }
    Ok(clean)
}

fn lex_file(input: &Path, locations: bool) -> Result<bool> {
    let source = SourceFile::from_path(input).with_context(|| format!("cannot read {}", input.display()))?;
    let (tokens, errors) = javaparse::parser::Lexer::new(&source).tokenize();

    for token in &tokens {
        if locations {
            println!("{:?} '{}' at {}", token.token_type(), token.lexeme(), token.span.start);
        } else {
            println!("{:?}: '{}'", token.token_type(), token.lexeme());
        }
    }
    for error in &errors {
        let (_, message) = error.error.describe(&error.text);
        eprintln!("{}:{}: error: {}", source.name(), error.span.start, message);
    }

    Ok(errors.is_empty())
}

fn check_tree(parser: &FragmentParser, root: &Path) -> Result<bool> {
    let mut total = 0usize;
    let mut failed = 0usize;

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "java") {
            continue;
        }
        total += 1;
        let result = parser.parse_file(path)?;
        if !report(&result) {
            failed += 1;
        }
    }

    println!("Parsed {} Java files, {} with errors", total, failed);
    Ok(failed == 0)
}
