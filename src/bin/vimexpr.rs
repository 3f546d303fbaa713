use std::io::{self, BufRead as _};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing::{Level, warn};

#[derive(Parser, Debug)]
#[command(name = "vimexpr", version, about = "Parse Vimscript expressions and print their AST")]
struct Cli {
    /// Expressions to parse. Reads one expression per line from stdin if none are given.
    exprs: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Sexpr)]
    format: Format,

    /// Show byte spans in tree output.
    #[arg(long)]
    spans: bool,

    /// Maximum delimiter nesting accepted before parsing.
    #[arg(long, default_value_t = vimexpr::DEFAULT_MAX_PARSE_DEPTH)]
    max_parse_depth: usize,

    /// Maximum AST builder recursion depth.
    #[arg(long, default_value_t = vimexpr::DEFAULT_MAX_AST_DEPTH)]
    max_ast_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Indented tree with labeled children.
    Tree,
    /// One-line s-expression.
    Sexpr,
    /// Normalized Vimscript source.
    Source,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let parser = vimexpr::Builder::default()
        .max_parse_depth(cli.max_parse_depth)
        .max_ast_depth(cli.max_ast_depth)
        .build();

    let inputs = if cli.exprs.is_empty() {
        read_stdin_lines()?
    } else {
        cli.exprs.clone()
    };

    let mut failures = 0usize;
    for input in &inputs {
        match parser.parse(input) {
            Ok(expr) => println!("{}", render(&expr, &cli)),
            Err(err) => {
                failures += 1;
                warn!(input = %input, "parse failed");
                eprintln!("error: {input}: {err}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} expression(s) failed to parse", inputs.len());
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("read expression from stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn render(expr: &vimexpr::Expr, cli: &Cli) -> String {
    match cli.format {
        Format::Sexpr => vimexpr::sexpr(expr),
        Format::Source => expr.to_string(),
        Format::Tree => {
            let mut config = vimexpr::PrettyConfig::default();
            if cli.spans {
                config = config.with_spans();
            }
            // Tree output ends with its own newline
            vimexpr::pretty_print_with_config(expr, &config)
                .trim_end()
                .to_string()
        }
    }
}
