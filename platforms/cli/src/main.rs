use clap::{Args, Parser, Subcommand};
use dfatm::{
    check, compile, enumerate_dfas, is_empty, shortest_accepted, AutomatonError, Dfa,
    ExampleCatalog, Label, TuringMachine, ValidDfa, DEFAULT_MAX_STEPS,
};
use std::error::Error;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Validate DFAs, decide emptiness, and compile them into Turing machines.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  dfatm-cli validate --example parity
  dfatm-cli run --example reachable --input a --input ba --debug
  cat dfa.json | dfatm-cli empty")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a DFA is well-formed
    Validate(DfaSource),
    /// Decide whether the DFA's language is empty
    Empty(DfaSource),
    /// Print the Turing machine compiled from a DFA
    Compile(DfaSource),
    /// Run the compiled Turing machine on one or more inputs
    Run(RunArgs),
    /// List 2-state DFAs over {a, b} with their emptiness verdict
    Enumerate {
        /// Stop after this many DFAs
        #[clap(short, long)]
        limit: Option<usize>,
    },
    /// List the built-in example DFAs
    Examples,
}

/// Where to read the DFA from. Falls back to piped stdin when neither flag is given.
#[derive(Args, Debug)]
struct DfaSource {
    /// Name of a built-in example
    #[clap(short, long, conflicts_with = "dfa")]
    example: Option<String>,

    /// DFA definition as a JSON document
    #[clap(long)]
    dfa: Option<String>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[clap(flatten)]
    source: DfaSource,

    /// Input word; every character is one symbol. May be repeated.
    #[clap(short, long)]
    input: Vec<String>,

    /// Step bound after which a run times out
    #[clap(short, long, env = "DFATM_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print each run report as JSON
    #[clap(long, conflicts_with = "debug")]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Validate(source) => match validation_failure(load_dfa(&source))? {
            None => println!("valid"),
            Some(reason) => {
                println!("invalid: {reason}");
                std::process::exit(1);
            }
        },
        Command::Empty(source) => {
            let dfa = load_valid_dfa(&source)?;
            if is_empty(&dfa) {
                println!("empty");
            } else {
                let witness = shortest_accepted(&dfa).unwrap_or_default();
                println!("non-empty (shortest accepted word: {})", quote(&witness));
            }
        }
        Command::Compile(source) => {
            let dfa = load_valid_dfa(&source)?;
            print!("{}", compile(&dfa));
        }
        Command::Run(args) => run(&args)?,
        Command::Enumerate { limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            for (index, dfa) in enumerate_dfas().take(limit).enumerate() {
                let dfa = dfa.validated()?;
                let verdict = if is_empty(&dfa) { "empty" } else { "non-empty" };
                println!("{index:>3}  {}  {verdict}", describe(&dfa));
            }
        }
        Command::Examples => {
            for example in ExampleCatalog::names()
                .into_iter()
                .filter_map(|name| ExampleCatalog::get_by_name(name).ok())
            {
                println!("{:<20} {}", example.name, example.description);
            }
        }
    }

    Ok(())
}

fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let dfa = load_valid_dfa(&args.source)?;
    let program = compile(&dfa);
    debug!(inputs = args.input.len(), max_steps = args.max_steps, "running");

    for (i, input) in args.input.iter().enumerate() {
        let word: Vec<Label> = input.chars().map(Label::from).collect();
        let mut machine = TuringMachine::new(&program, &word)?;
        let verdict = machine.run(args.max_steps);
        let report = machine.into_report(verdict);

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        if i > 0 {
            println!();
        }
        println!("input: {}", quote(&word));
        if args.debug {
            for snapshot in &report.trace {
                println!("{snapshot}");
            }
        }
        println!("verdict: {}", report.verdict);
        println!("steps: {}", report.step_count);
        println!("tape: {}", report.tape_string());
    }

    Ok(())
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads a DFA from a built-in example, a JSON argument, or piped stdin.
fn load_dfa(source: &DfaSource) -> Result<Dfa<Label, Label>, Box<dyn Error>> {
    if let Some(name) = &source.example {
        Ok(ExampleCatalog::get_by_name(name)?.dfa.clone())
    } else if let Some(json) = &source.dfa {
        Ok(Dfa::from_json(json)?)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(Dfa::from_json(&buffer)?)
    } else {
        Err("No DFA given: use --example, --dfa, or pipe JSON via stdin".into())
    }
}

/// Why a loaded DFA is invalid, or `None` if it is valid.
///
/// A definition that cannot be parsed, such as one missing a required field, is invalid
/// too. Other load failures (unknown example, unreadable stdin) are passed through.
fn validation_failure(
    loaded: Result<Dfa<Label, Label>, Box<dyn Error>>,
) -> Result<Option<String>, Box<dyn Error>> {
    match loaded {
        Ok(dfa) => Ok(check(&dfa).err().map(|error| error.to_string())),
        Err(error) => {
            if let Some(AutomatonError::ParseError(reason)) =
                error.downcast_ref::<AutomatonError>()
            {
                return Ok(Some(reason.clone()));
            }
            Err(error)
        }
    }
}

fn load_valid_dfa(source: &DfaSource) -> Result<ValidDfa<Label, Label>, Box<dyn Error>> {
    Ok(load_dfa(source)?.validated()?)
}

fn quote(word: &[Label]) -> String {
    let text: String = word.iter().map(Label::as_str).collect();
    format!("\"{text}\"")
}

/// One-line summary of an enumerated DFA: start, accept set, then `q,a->q'` per transition.
fn describe(dfa: &ValidDfa<u32, char>) -> String {
    let moves: Vec<String> = dfa
        .states
        .iter()
        .flat_map(|q| dfa.alphabet.iter().map(move |a| (q, a)))
        .filter_map(|(q, a)| dfa.next_state(q, a).map(|to| format!("{q}{a}->{to}")))
        .collect();

    format!(
        "start={} accept={:?} {}",
        dfa.start_state,
        dfa.accept_states,
        moves.join(" ")
    )
}
