#![allow(non_snake_case)]
use RustedTrapezoid::Examples::trapezoid_examples::{EXAMPLES_COUNT, trapezoid_examples};
use RustedTrapezoid::Utils::logger::{init_logger, save_plot_data_to_csv};
use RustedTrapezoid::Utils::plots::plot_trapezoid;
use RustedTrapezoid::Utils::task_parser::{TaskConfig, parse_bound};
use RustedTrapezoid::numerical::pipeline::present;
use RustedTrapezoid::numerical::report::IntegrationReport;
use RustedTrapezoid::numerical::trapezoid::{
    convergence_study, convergence_table, doubling_sequence,
};
use RustedTrapezoid::symbolic::symbolic_engine::Expr;
use RustedTrapezoid::symbolic::symbolic_lambdify::Evaluator;
use clap::Parser;
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Trapezoidal rule integration of a function given as text
#[derive(Parser, Debug)]
#[command(
    name = "rusted-trapezoid",
    version,
    about = "Integrate f(x) on [a, b] with the trapezoidal rule and compare with the exact integral",
    after_help = r#"
Examples:
  rusted-trapezoid                                  # sin(x) on [0, pi], 10 sub-intervals
  rusted-trapezoid -f "x^2*exp(x)" -a 0 -b 1 -n 20
  rusted-trapezoid -f "1/(1+x^2)" -a -1 -b 1 --plot chart.png --csv samples.csv
  rusted-trapezoid --task task.txt --convergence
  rusted-trapezoid --example 2
"#
)]
struct Cli {
    /// Task document; flags given together with it take precedence
    #[arg(long)]
    task: Option<PathBuf>,

    /// Function to integrate, e.g. "sin(x) + x^2"
    #[arg(short = 'f', long)]
    function: Option<String>,

    /// Lower bound, a constant expression such as 0, -1.5 or pi/2
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    lower: Option<String>,

    /// Upper bound, a constant expression
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    upper: Option<String>,

    /// Number of sub-intervals (1..=100)
    #[arg(short = 'n', long)]
    intervals: Option<usize>,

    /// Integration variable
    #[arg(long)]
    variable: Option<String>,

    /// Write a png chart of the function and the trapezoids
    #[arg(long)]
    plot: Option<String>,

    /// Write the sampled points as csv
    #[arg(long)]
    csv: Option<String>,

    /// off, none, error, warn, info, debug or trace
    #[arg(long)]
    loglevel: Option<String>,

    /// Also write the log into this file
    #[arg(long)]
    logfile: Option<String>,

    /// Print the error for a doubling number of sub-intervals
    #[arg(long)]
    convergence: bool,

    /// Run a built-in example instead
    #[arg(long)]
    example: Option<usize>,
}

impl Cli {
    /// defaults, then the task document, then flags
    fn task_config(&self) -> Result<TaskConfig, Box<dyn Error>> {
        let mut config = match &self.task {
            Some(path) => TaskConfig::from_file(path)?,
            None => TaskConfig::default(),
        };
        let request = &mut config.request;
        if let Some(function) = &self.function {
            request.function = function.clone();
        }
        if let Some(variable) = &self.variable {
            request.variable = variable.clone();
        }
        if let Some(lower) = &self.lower {
            request.bounds.lower = parse_bound("lower", lower)?;
        }
        if let Some(upper) = &self.upper {
            request.bounds.upper = parse_bound("upper", upper)?;
        }
        if let Some(n) = self.intervals {
            request.intervals = n;
        }
        let output = &mut config.output;
        if self.plot.is_some() {
            output.plot = self.plot.clone();
        }
        if self.csv.is_some() {
            output.csv = self.csv.clone();
        }
        if self.logfile.is_some() {
            output.logfile = self.logfile.clone();
        }
        if let Some(level) = &self.loglevel {
            output.loglevel = level.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_convergence(report: &IntegrationReport) -> Result<(), Box<dyn Error>> {
    let expr = Expr::parse_expression(&report.function)?;
    let f = Evaluator::compile(&expr, &report.variable)?;
    let rows = convergence_study(
        &f,
        report.bounds,
        &doubling_sequence(report.intervals, 6),
        report.result.exact_value(),
    );
    println!("\n{}", convergence_table(&rows));
    Ok(())
}

fn execute(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    if let Some(example) = cli.example {
        init_logger(cli.loglevel.as_deref().unwrap_or("info"), None)?;
        if example > EXAMPLES_COUNT {
            return Err(format!("examples are numbered 0..={}", EXAMPLES_COUNT).into());
        }
        trapezoid_examples(example);
        return Ok(true);
    }

    let config = cli.task_config()?;
    init_logger(&config.output.loglevel, config.output.logfile.as_deref())?;

    let presentation = present(&config.request);
    println!("{}", presentation);
    let Some(report) = presentation.report() else {
        return Ok(false);
    };
    if cli.convergence {
        print_convergence(report)?;
    }
    if let Some(path) = &config.output.plot {
        plot_trapezoid(&report.plot, path)?;
    }
    if let Some(path) = &config.output.csv {
        save_plot_data_to_csv(&report.plot, path)?;
    }
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
