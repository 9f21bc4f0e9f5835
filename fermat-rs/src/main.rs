mod args;
mod error;

use args::Args;
use error::ReplError;
use fermat_compiler::compile;
use fermat_compute::{
    operand::Operand,
    registry::Registry,
    symbolic::{simplify::{SimplifyCache, Simplifier}, step::Step},
};
use fermat_parser::parser::{ast::Expr, Parser};
use log::{debug, error, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};

/// The result of processing one line of input.
#[derive(Debug, PartialEq)]
struct Output {
    /// The simplified expression.
    simplified: String,

    /// The steps taken, if requested.
    steps: Vec<Step>,

    /// The value of the simplified expression, if variable values were given.
    value: Option<f64>,
}

/// Parses, simplifies, and optionally evaluates one line of input.
fn process(input: &str, registry: &Registry, args: &Args) -> Result<Output, ReplError> {
    let ast = Parser::new(input).try_parse_full::<Expr>().map_err(ReplError::Parse)?;
    let operand = Operand::from_ast(&ast, registry).map_err(ReplError::Compute)?;
    debug!("parsed {}", operand.display(registry));

    let simplifier = Simplifier::with_options(registry, args.simplify_options());
    let mut steps = Vec::new();
    let simplified = if args.steps {
        simplifier.simplify_with_steps(&operand, &mut SimplifyCache::new(), &mut steps)
    } else {
        simplifier.simplify(&operand)
    }.map_err(ReplError::Compute)?;

    let value = if args.eval.is_empty() {
        None
    } else {
        let (names, values): (Vec<_>, Vec<_>) = args.eval.iter().cloned().unzip();
        let function = compile(&simplified, &names, registry).map_err(ReplError::Eval)?;
        Some(function.call(&values).map_err(ReplError::Eval)?)
    };

    Ok(Output {
        simplified: simplified.display(registry).to_string(),
        steps,
        value,
    })
}

/// Processes one line of input, printing the result or reporting the error. Returns true on
/// success.
fn run_line(input: &str, registry: &Registry, args: &Args) -> bool {
    match process(input, registry, args) {
        Ok(output) => {
            for step in &output.steps {
                println!("  {}", step);
            }
            println!("{}", output.simplified);
            if let Some(value) = output.value {
                println!("= {}", value);
            }
            true
        },
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr(input) {
                error!("failed to write report: {}", io_err);
            }
            false
        },
    }
}

/// Processes every non-blank line of a batch input.
fn run_batch(source: &str, registry: &Registry, args: &Args) -> ExitCode {
    let mut ok = true;
    for line in source.lines().filter(|line| !line.trim().is_empty()) {
        ok &= run_line(line, registry, args);
    }

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Runs the interactive prompt until end of input.
fn run_repl(registry: &Registry, args: &Args) -> ExitCode {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        },
    };

    fn process_line(rl: &mut DefaultEditor, registry: &Registry, args: &Args) -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        run_line(&input, registry, args);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl, registry, args) {
            match err {
                ReadlineError::Eof | ReadlineError::Interrupted => (),
                _ => eprintln!("{}", err),
            }
            break;
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            let _ = err.report_to_stderr("args", "");
            return ExitCode::from(2);
        },
    };

    if CombinedLogger::init(vec![TermLogger::new(
        args.level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]).is_err() {
        eprintln!("failed to initialize logging");
    }

    let registry = Registry::standard();
    if let Some(filename) = &args.file {
        // run source file
        info!("reading expressions from {}", filename);
        match fs::read_to_string(filename) {
            Ok(source) => run_batch(&source, &registry, &args),
            Err(err) => {
                eprintln!("cannot read {}: {}", filename, err);
                ExitCode::FAILURE
            },
        }
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut source = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut source) {
            eprintln!("cannot read stdin: {}", err);
            return ExitCode::FAILURE;
        }

        run_batch(&source, &registry, &args)
    } else {
        // run the repl / interactive mode
        run_repl(&registry, &args)
    }
}

#[cfg(test)]
mod tests {
    use fermat_compute::error::DidNotConverge;
    use fermat_parser::parser::error::kind::UnclosedParenthesis;
    use pretty_assertions::assert_eq;
    use super::*;

    fn render(err: &ReplError, input: &str) -> String {
        let mut out = Vec::new();
        err.write_report(input, &mut out).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
    }

    #[test]
    fn simplify_line() {
        let registry = Registry::standard();
        let output = process("2 + 6 + 5*(x-x) + 6/y*y + 5^(z*z) - 12", &registry, &Args::default()).unwrap();
        assert_eq!(output, Output {
            simplified: "2 + 5^z^2".to_string(),
            steps: vec![],
            value: None,
        });
    }

    #[test]
    fn evaluate_line() {
        let registry = Registry::standard();
        let args = Args { eval: vec![("x".to_string(), 3.0)], ..Args::default() };
        let output = process("x + x", &registry, &args).unwrap();
        assert_eq!(output.simplified, "2*x");
        assert_eq!(output.value, Some(6.0));
    }

    #[test]
    fn collect_steps() {
        let registry = Registry::standard();
        let args = Args { steps: true, ..Args::default() };
        let output = process("x*1", &registry, &args).unwrap();
        assert_eq!(output.steps, vec![Step::MultiplyOne]);
    }

    #[test]
    fn parse_error_report() {
        let registry = Registry::standard();
        let err = process("(x + 1", &registry, &Args::default()).unwrap_err();
        assert!(matches!(err, ReplError::Parse(_)));
        assert!(err.error().is::<UnclosedParenthesis>());
        assert!(render(&err, "(x + 1").contains("input:1:1"));
    }

    #[test]
    fn iteration_limit_error() {
        let registry = Registry::standard();
        let args = Args { max_iterations: Some(0), ..Args::default() };
        let err = process("x^-1", &registry, &args).unwrap_err();
        assert!(matches!(err, ReplError::Compute(_)));
        assert!(err.error().is::<DidNotConverge>());
        assert_eq!(err.flag_hint().as_deref(), Some("hint: pass --max-iterations with a value above 0"));
        let report = render(&err, "x^-1");
        assert!(report.contains("max_iterations in the simplifier options"));
        assert!(report.contains("--max-iterations"));
    }

    #[test]
    fn unknown_variable_error() {
        let registry = Registry::standard();
        let args = Args { eval: vec![("x".to_string(), 1.0)], ..Args::default() };
        let err = process("x + y", &registry, &args).unwrap_err();
        assert!(matches!(err, ReplError::Eval(_)));
    }
}
