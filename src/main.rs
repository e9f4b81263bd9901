use clap::{Parser as ClapParser, Subcommand};
use sqlexpr::cli::{self, CheckOptions, CheckResult, CliError, FilterOptions, WhereOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sqlexpr")]
#[command(about = "sqlexpr - SQL WHERE and ORDER BY expressions compiled to SQL or run against JSON")]
#[command(version)]
struct Cli {
    /// Log parse and compile steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a WHERE expression to SQL
    Where {
        expression: String,

        /// Table that qualifies every column
        #[arg(short, long)]
        table: Option<String>,

        /// Comma separated list of allowed properties
        #[arg(short, long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },

    /// Compile an ORDER BY clause to SQL
    OrderBy {
        expression: String,

        /// Table that qualifies every column
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Validate a WHERE expression
    Check {
        expression: String,

        /// Print the parsed tree
        #[arg(long)]
        ast: bool,
    },

    /// Filter JSON rows with a WHERE expression
    Filter {
        expression: String,

        /// Field spec, e.g. One:i32, Two:i32? or Status:enum(Active|Closed)
        #[arg(short, long = "field", required = true)]
        fields: Vec<String>,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show documentation, optionally for one category
    Docs { category: Option<String> },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Where {
            expression,
            table,
            fields,
        } => cli::execute_where(&WhereOptions {
            expression,
            table,
            fields,
        })
        .map(|sql| println!("{}", sql)),
        Commands::OrderBy { expression, table } => {
            cli::execute_order_by(&expression, table.as_deref()).map(|sql| println!("{}", sql))
        }
        Commands::Check { expression, ast } => run_check(expression, ast),
        Commands::Filter {
            expression,
            fields,
            input,
            pretty,
        } => run_filter(expression, fields, input, pretty),
        Commands::Docs { category: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs {
            category: Some(category),
        } => cli::get_doc_category(&category).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_check(expression: String, ast: bool) -> Result<(), CliError> {
    match cli::execute_check(&CheckOptions { expression, ast })? {
        CheckResult::Valid => println!("Expression is valid"),
        CheckResult::Tree(tree) => println!("{}", tree),
    }
    Ok(())
}

fn run_filter(
    expression: String,
    fields: Vec<String>,
    input: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = FilterOptions {
        expression,
        fields,
        input,
    };

    let output = cli::execute_filter(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
