use crate::Utils::logger::save_plot_data_to_csv;
use crate::Utils::plots::plot_trapezoid;
use crate::numerical::pipeline::{IntegrationRequest, present, run};
use crate::numerical::trapezoid::{
    Bounds, convergence_study, convergence_table, doubling_sequence, trapezoidal_rule,
};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::Evaluator;
use std::f64::consts::PI;

/// number of the last built-in example, `trapezoid_examples(0..=EXAMPLES_COUNT)`
pub const EXAMPLES_COUNT: usize = 7;

#[allow(dead_code)]
pub fn trapezoid_examples(example: usize) {
    match example {
        0 => {
            // the classic: sin(x) on [0, pi], 10 trapezoids underestimate the exact value 2
            let request = IntegrationRequest::default();
            println!("{}\n", present(&request));
            // the error drops about 4 times with every doubling of n
            let expr = Expr::parse_expression(&request.function);
            if let Ok(expr) = expr {
                if let Ok(f) = Evaluator::compile(&expr, "x") {
                    let exact = expr.definite_integral("x", 0.0, PI).value();
                    let rows =
                        convergence_study(&f, request.bounds, &doubling_sequence(2, 8), exact);
                    println!("{}", convergence_table(&rows));
                }
            }
        }
        1 => {
            // closed form by integration by parts: x^2 exp(x) -> exp(x) (x^2 - 2x + 2)
            let request = IntegrationRequest::new("x^2*exp(x)", 0.0, 1.0, 20);
            match run(&request) {
                Ok(report) => {
                    println!("{}", report.summary_table());
                    println!("{}", report.results_text());
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        2 => {
            // no elementary antiderivative: only the numerical value is reported
            let request = IntegrationRequest::new("exp(x**2)", 0.0, 1.0, 50);
            println!("{}", present(&request));
        }
        3 => {
            // the grid hits the pole at x = 0, the value is not a number but nothing crashes
            let request = IntegrationRequest::new("1/x", -1.0, 1.0, 10);
            println!("{}", present(&request));
            // an even count of trapezoids on a symmetric grid always hits it, an odd one never does
            let request = IntegrationRequest::new("1/x", -1.0, 1.0, 11);
            println!("{}", present(&request));
        }
        4 => {
            // malformed input: the message is all the user gets
            for input in ["sin(x", "x +", "sinx(x)", "2*y + x"] {
                let request = IntegrationRequest::new(input, 0.0, 1.0, 10);
                println!("{:>10} -> {}", input, present(&request));
            }
        }
        5 => {
            // another variable name, and the bounds swapped
            let forward = IntegrationRequest::new("t*exp(-t)", 0.0, 3.0, 25).with_variable("t");
            let mut backward = forward.clone();
            backward.bounds = forward.bounds.reversed();
            println!("{}\n", present(&forward));
            println!("{}", present(&backward));
        }
        6 => {
            // chart and csv with the samples, written into the working directory
            let request = IntegrationRequest::new("sin(x) + 0.3*x", 0.0, 2.0 * PI, 8);
            match run(&request) {
                Ok(report) => {
                    println!("{}", report.results_text());
                    if let Err(e) = plot_trapezoid(&report.plot, "trapezoid_example.png") {
                        println!("Error: {}", e);
                    }
                    if let Err(e) = save_plot_data_to_csv(&report.plot, "trapezoid_example.csv") {
                        println!("Error: {}", e);
                    }
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        EXAMPLES_COUNT => {
            // the bare rule, without the pipeline around it
            if let Ok(expr) = Expr::parse_expression("sqrt(1 - x^2)") {
                if let Ok(f) = Evaluator::compile(&expr, "x") {
                    let solution = trapezoidal_rule(&f, Bounds::new(-1.0, 1.0), 100);
                    println!("2 * integral = {} ~ pi = {}", 2.0 * solution.integral, PI);
                }
            }
        }
        _ => println!("examples are numbered 0..={}", EXAMPLES_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_run() {
        // 6 writes files, covered by the plots and logger tests
        for example in (0..=EXAMPLES_COUNT).filter(|&e| e != 6) {
            trapezoid_examples(example);
        }
        // past the last one only a hint is printed
        trapezoid_examples(EXAMPLES_COUNT + 1);
    }
}
