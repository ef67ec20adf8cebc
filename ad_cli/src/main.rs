//! Command-line front end for the scalar autodiff engine.
//!
//! # Usage
//!
//! ```bash
//! # Differentiate z = (x*y + tanh(x)) / (y + 2) and check against finite differences
//! ad demo --x 1.5 --y 2.5
//!
//! # Train a 2 -> 8 -> 1 tanh network on XOR
//! ad train --dataset xor --hidden 8 --epochs 500
//!
//! # ReLU hidden layers, debug logging
//! ad -v train --dataset and --hidden 4,4 --activation relu --lr 0.02 --momentum 0
//! ```

mod cli;

use std::process::ExitCode;

use ad_core::{check_gradients, var, Value};
use ad_nn::{fit, Dataset, Mlp, Module, NnError};
use clap::Parser;
use log::{debug, info};

use cli::{Cli, Command, DemoArgs, TrainArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Demo(args) => run_demo(&args),
        Command::Train(args) => run_train(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// z = (x*y + tanh(x)) / (y + 2)
fn demo_expression(x: &Value, y: &Value) -> ad_core::Result<Value> {
    let numerator = x * y + x.tanh();
    let denominator = y + 2.0;
    numerator.divide(&denominator)
}

fn run_demo(args: &DemoArgs) -> Result<(), NnError> {
    println!("=== Reverse-Mode Autodiff Demo ===\n");

    let x = var("x", args.x);
    let y = var("y", args.y);
    let z = demo_expression(&x, &y)?;
    z.backward();

    println!("Expression: z = (x*y + tanh(x)) / (y + 2)");
    println!("At point:   x = {}, y = {}", args.x, args.y);
    println!("Value:      z = {:.10}\n", z.value());
    println!("Autodiff gradients:");
    println!("  dz/dx = {:.10}", x.grad());
    println!("  dz/dy = {:.10}\n", y.grad());
    debug!("graph has {} nodes", ad_core::topological_order(&z).len());

    let eps = 1e-6;
    let check = check_gradients(|v| demo_expression(&v[0], &v[1]), &[args.x, args.y], eps)?;
    println!("Finite difference gradients (eps={eps:e}):");
    println!("  dz/dx = {:.10}", check.numeric[0]);
    println!("  dz/dy = {:.10}", check.numeric[1]);
    println!("  Max absolute error: {:.2e}\n", check.max_error);

    let tolerance = 1e-5;
    if !check.passes(tolerance) {
        return Err(NnError::InvalidConfig(format!(
            "gradient check failed: max error {:.2e} >= {:.2e}",
            check.max_error, tolerance
        )));
    }
    println!("PASS: max error below {tolerance:.0e}\n");

    println!("Reusing a node: z = x * x at x = 3");
    let x = var("x", 3.0);
    let z = &x * &x;
    z.backward();
    println!("  z = {}, dz/dx = {} (expected 6)\n", z.value(), x.grad());

    println!("Diamond: z = (x + y) * (x - y) at x = 3, y = 2");
    let x = var("x", 3.0);
    let y = var("y", 2.0);
    let z = (&x + &y) * (&x - &y);
    z.backward();
    println!(
        "  z = {}, dz/dx = {} (expected 6), dz/dy = {} (expected -4)",
        z.value(),
        x.grad(),
        y.grad()
    );
    Ok(())
}

fn run_train(args: &TrainArgs) -> Result<(), NnError> {
    let config = args.config();
    config.validate()?;

    let data = Dataset::logic_gate(args.dataset);
    let model = Mlp::seeded(data.nin(), &args.layer_sizes(), args.activation, args.seed)?;
    info!(
        "training {model} ({} parameters) on {} with seed {}",
        model.num_parameters(),
        args.dataset,
        args.seed
    );

    let report = fit(&model, &data, &mut config.optimizer(), &config)?;
    if let (Some(first), Some(last)) = (report.initial_loss(), report.final_loss()) {
        println!("loss: {first:.6} -> {last:.6}");
    }

    println!("\n  a    b  | target  prediction");
    for (x, y) in data.iter() {
        let pred = model.predict(x)?;
        println!(
            "{:4.1} {:4.1} | {:6.1}  {:10.4}",
            x[0], x[1], y[0], pred[0]
        );
    }
    Ok(())
}
