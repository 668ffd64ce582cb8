mod cli;

use std::io;
use std::process::ExitCode;

use log::{debug, error, info, trace};

use cli::Cli;
use why_lang::diagnostics::DiagnosticFormatter;
use why_lang::evaluator::Evaluator;
use why_lang::lexer::{CommentFilter, Lexer};
use why_lang::parser::Parser as WhyParser;
use why_lang::printer;
use why_lang::reader::Reader;

fn main() -> ExitCode {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).expect("logger should only be initialized once");

    let reader = match Reader::open(&args.source) {
        Ok(reader) => reader,
        Err(err) => {
            error!("failed to open {}: {err}", args.source.display());
            println!("Unable to resolve the path: {}", args.source.display());
            return ExitCode::FAILURE;
        }
    };

    info!("running {}", args.source.display());

    let lexer = CommentFilter::new(Lexer::new(reader));
    let (program, reader, diagnostics) = WhyParser::new(lexer).parse();

    trace!("parsed AST:\n{:#?}", program);
    trace!("pretty-printed:\n{}", printer::print_program(&program));

    if !diagnostics.is_empty() {
        let formatter = DiagnosticFormatter::new(&reader);
        for diagnostic in diagnostics.errors() {
            debug!("{:?} at {}", diagnostic.kind, diagnostic.position);
            println!("{}", formatter.format_diagnostic(diagnostic));
        }
        error!("aborted with {} diagnostic(s)", diagnostics.errors().len());
        return ExitCode::FAILURE;
    }

    let stdin = io::stdin();
    let mut evaluator = Evaluator::new(stdin.lock(), io::stdout());
    match evaluator.run(&program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(fatal) => {
            error!("{fatal}");
            let formatter = DiagnosticFormatter::new(&reader);
            println!("{}", formatter.format_fatal(&fatal));
            ExitCode::FAILURE
        }
    }
}
