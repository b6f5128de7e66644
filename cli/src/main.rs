use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use rteval::{
    Error, EvaluatorOptions, ExecutionMode, RuntimeEvaluator, Status, TypeTag, Value,
    render_error,
};
use std::io::{Read, Write};
use std::path::PathBuf;

/// rteval - compile and run line-oriented RPN programs
#[derive(Parser, Debug)]
#[command(name = "rteval")]
#[command(about = "Compile and run RPN programs", long_about = None)]
struct Args {
    /// Execution mode
    #[arg(long, value_enum, default_value_t = Mode::Safe)]
    mode: Mode,

    /// Print the compiled program before running it
    #[arg(long)]
    decompile: bool,

    /// Annotate listings and traces with types
    #[arg(long)]
    show_types: bool,

    /// Input value, as `name=value` or `name:type=value` (float64 by default)
    #[arg(long = "set", value_name = "NAME[:TYPE]=VALUE")]
    inputs: Vec<String>,

    /// Output type, as `name=type` (inferred from the program by default)
    #[arg(long = "output-type", value_name = "NAME=TYPE")]
    output_types: Vec<String>,

    /// Program file (if not provided, reads from stdin)
    program: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Fast,
    Safe,
    Debug,
}

impl From<Mode> for ExecutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Fast => ExecutionMode::Fast,
            Mode::Safe => ExecutionMode::Safe,
            Mode::Debug => ExecutionMode::Debug,
        }
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
enum ArgError {
    #[error("expected NAME=VALUE, got {0:?}")]
    MissingValue(String),
    #[error("unknown type {0:?}")]
    UnknownType(String),
    #[error("no input variable named {0}")]
    UnknownInput(String),
    #[error("no output variable named {0}")]
    UnknownOutput(String),
    #[error("{text:?} is not a valid {tag} value")]
    InvalidValue { tag: TypeTag, text: String },
}

/// A parsed `--set` argument.
struct Assignment {
    name: String,
    tag: TypeTag,
    text: String,
}

fn parse_type(name: &str) -> Result<TypeTag, ArgError> {
    TypeTag::from_name(name)
        .filter(|tag| tag.is_numeric())
        .ok_or_else(|| ArgError::UnknownType(name.to_string()))
}

fn parse_assignment(arg: &str) -> Result<Assignment, ArgError> {
    let (target, text) = arg
        .split_once('=')
        .ok_or_else(|| ArgError::MissingValue(arg.to_string()))?;
    let (name, tag) = match target.split_once(':') {
        Some((name, type_name)) => (name, parse_type(type_name)?),
        None => (target, TypeTag::Float64),
    };
    Ok(Assignment {
        name: name.trim().to_string(),
        tag,
        text: text.trim().to_string(),
    })
}

fn read_program(path: Option<&PathBuf>) -> Result<String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path).into_diagnostic();
    }
    if atty::is(atty::Stream::Stdin) {
        eprintln!("Reading program from stdin (Ctrl+D to finish)");
    }
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .into_diagnostic()?;
    Ok(source)
}

/// Compiles the program with the requested variable types.
///
/// Returns `Ok(false)` when the program was rejected; the report has
/// already been printed.
fn prepare(
    evaluator: &mut RuntimeEvaluator,
    inputs: &[Assignment],
    output_types: &[String],
) -> Result<bool> {
    if let Err(err) = evaluator.extract_variables() {
        render_error(&err.into());
        return Ok(false);
    }

    for input in inputs {
        if !evaluator.set_input_variable_type(input.name.as_str().into(), input.tag) {
            return Err(ArgError::UnknownInput(input.name.clone()).into());
        }
    }
    for arg in output_types {
        let (name, type_name) = arg
            .split_once('=')
            .ok_or_else(|| ArgError::MissingValue(arg.clone()))?;
        let tag = parse_type(type_name.trim())?;
        if !evaluator.set_output_variable_type(name.trim().into(), tag) {
            return Err(ArgError::UnknownOutput(name.to_string()).into());
        }
    }

    if let Err(err) = evaluator.compile() {
        render_error(&err.into());
        return Ok(false);
    }

    for input in inputs {
        let value = Value::parse(input.tag, &input.text).ok_or_else(|| ArgError::InvalidValue {
            tag: input.tag,
            text: input.text.clone(),
        })?;
        evaluator.set_input_variable_value(input.name.as_str().into(), value);
    }
    Ok(true)
}

fn print_outputs(evaluator: &RuntimeEvaluator, out: &mut dyn Write) -> std::io::Result<()> {
    let mut index = 0;
    while let Some(var) = evaluator.browse_output_variable(index) {
        index += 1;
        match evaluator.variable_value(var.name.as_str().into()) {
            Some(value) => writeln!(out, "{} = ({}){}", var.name, var.type_tag, value)?,
            None => writeln!(out, "{} = <unset>", var.name)?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let inputs = args
        .inputs
        .iter()
        .map(|arg| parse_assignment(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let source = read_program(args.program.as_ref())?;
    let mut options = EvaluatorOptions::default();
    options.execution.mode = args.mode.into();
    options.execution.trace.show_types = args.show_types;

    let mut evaluator = RuntimeEvaluator::with_options(source, options);
    if !prepare(&mut evaluator, &inputs, &args.output_types)? {
        return Err(miette!("compilation failed"));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.decompile {
        let listing = evaluator
            .decompile(args.show_types)
            .map_err(|err| miette!("{}", err))?;
        write!(out, "{}", listing).into_diagnostic()?;
    }

    let status = evaluator.execute(args.mode.into(), Some(&mut out));
    if args.mode == Mode::Debug {
        writeln!(out).into_diagnostic()?;
    }
    print_outputs(&evaluator, &mut out).into_diagnostic()?;

    if status != Status::empty() {
        render_error(&Error::Execution(status));
        if status.is_fatal() {
            return Err(miette!("execution stopped"));
        }
    }

    Ok(())
}
