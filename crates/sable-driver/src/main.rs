use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sable_ast::LineIndex;
use sable_driver::{CompilePipeline, Diagnostic, DiagnosticSink, COMPILE_FAILED};
use sable_lexer::{Lexer, TokenKind};
use sable_parser::Parser;

#[derive(ClapParser)]
#[command(
    name = "sable",
    version = "0.1.0",
    about = "Sable compiler",
    long_about = "Compiles Sable source units into data+code assembly modules\nfor the Sable virtual machine."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a source unit to an assembly module
    Compile {
        /// Input source file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compile a source unit without writing output
    Check {
        /// Input source file
        input: PathBuf,
    },

    /// Lex a source file and show tokens (debug)
    Lex {
        /// Input source file
        input: PathBuf,

        /// Show token positions
        #[arg(short, long)]
        positions: bool,
    },

    /// Parse a source file and show the syntax tree (debug)
    Parse {
        /// Input source file
        input: PathBuf,

        /// Pretty print the tree
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            verbose,
        } => compile_command(input, output, verbose),
        Commands::Check { input } => check_command(input),
        Commands::Lex { input, positions } => lex_command(input, positions),
        Commands::Parse { input, pretty } => parse_command(input, pretty),
    }
}

fn compile_command(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> ExitCode {
    if verbose {
        println!("Compiling: {}", input.display());
    }

    let source = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sink = TerminalSink::new(&input, &source);
    let mut pipeline = CompilePipeline::new(&mut sink);
    let module = pipeline.compile(&source, &input);
    let errors = pipeline.error_count();

    if module == COMPILE_FAILED || errors > 0 {
        eprintln!("Compilation failed with {} error(s)", errors.max(1));
        return ExitCode::FAILURE;
    }

    let output_path = output.unwrap_or_else(|| input.with_extension("sasm"));
    match fs::write(&output_path, module) {
        Ok(_) => {
            println!("Module written to: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing module: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check_command(input: PathBuf) -> ExitCode {
    let source = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sink = TerminalSink::new(&input, &source);
    let mut pipeline = CompilePipeline::new(&mut sink);
    let _ = pipeline.compile(&source, &input);

    if pipeline.error_count() == 0 {
        println!("Check passed!");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn lex_command(input: PathBuf, positions: bool) -> ExitCode {
    let source = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tokens = Lexer::new(&source).tokenize();

    println!("Tokens for {}:\n", input.display());
    println!("{}", "=".repeat(80));

    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Eof {
            println!("{:4} | {:?}", i, token.kind);
            break;
        }
        if positions {
            println!(
                "{:4} | {:16?} | {:?} | {}..{}",
                i, token.kind, token.value, token.span.start, token.span.end
            );
        } else {
            println!("{:4} | {:16?} | {:?}", i, token.kind, token.value);
        }
    }

    ExitCode::SUCCESS
}

fn parse_command(input: PathBuf, pretty: bool) -> ExitCode {
    let source = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tokens = Lexer::new(&source).tokenize();
    let tree = Parser::new(tokens).parse_unit();

    for diagnostic in tree.diagnostics() {
        report_span_error(
            &format!("{}", diagnostic),
            diagnostic.span.start,
            diagnostic.span.end,
            &input.to_string_lossy(),
            &source,
        );
    }

    if pretty {
        println!("{:#?}", tree.unit);
    } else {
        println!("{:?}", tree.unit);
    }

    if tree.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Sink that renders build errors as terminal reports with labeled
/// source spans, and informational messages to stdout.
struct TerminalSink {
    display_path: String,
    source: String,
    line_index: LineIndex,
}

impl TerminalSink {
    fn new(path: &Path, source: &str) -> Self {
        Self {
            display_path: path.to_string_lossy().to_string(),
            source: source.to_string(),
            line_index: LineIndex::new(source),
        }
    }
}

impl DiagnosticSink for TerminalSink {
    fn report_build_error(&mut self, diagnostic: &Diagnostic) {
        if diagnostic.line == 0 {
            eprintln!("error: {}", diagnostic.message);
            return;
        }
        let offset = self.line_index.offset(diagnostic.line - 1, diagnostic.column);
        report_span_error(
            &diagnostic.message,
            offset,
            offset + 1,
            &self.display_path,
            &self.source,
        );
    }

    fn report_info(&mut self, message: &str) {
        println!("{}", message);
    }
}

fn report_span_error(message: &str, start: usize, end: usize, filename: &str, source: &str) {
    let end = end.min(source.len()).max(start);
    let span = (filename, start..end);
    Report::build(ReportKind::Error, span.clone())
        .with_message("Build error")
        .with_label(
            Label::new(span)
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
        .ok();
}
