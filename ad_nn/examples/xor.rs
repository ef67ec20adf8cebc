//! XOR problem training example.
//!
//! Trains a 2 -> 8 -> 1 tanh MLP one sample at a time with SGD + momentum.
//! XOR is not linearly separable, so the hidden layer is required.

use ad_core::Value;
use ad_nn::{mse_loss, Activation, Dataset, Gate, Mlp, Module, Sgd};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> ad_nn::Result<()> {
    let data = Dataset::logic_gate(Gate::Xor);

    let mut rng = StdRng::seed_from_u64(42);
    let model = Mlp::new(2, &[8, 1], Activation::Tanh, &mut rng)?;
    let params = model.parameters();
    let mut opt = Sgd::with_momentum(0.05, 0.9);

    println!("{model}");
    println!("Training XOR network ({} parameters)...\n", params.len());

    for epoch in 0..1000 {
        let mut total_loss = 0.0;

        for (input, target) in data.iter() {
            let x: Vec<Value> = input.iter().copied().map(Value::new).collect();
            let pred = model.forward(&x)?;
            let loss = mse_loss(&pred, target)?;
            total_loss += loss.value();

            model.zero_grad();
            loss.backward();
            opt.step(&params)?;
        }

        if epoch % 100 == 0 || epoch == 999 {
            println!("Epoch {:4}: avg loss = {:.6}", epoch, total_loss / data.len() as f64);
        }
    }

    println!("\nTesting trained network:");
    println!("========================");

    let mut correct = 0;
    for (input, target) in data.iter() {
        let output = model.predict(input)?[0];
        println!(
            "Input: [{:.0}, {:.0}] -> Output: {:.4} (target: {:.0})",
            input[0], input[1], output, target[0]
        );
        let predicted_class = if output > 0.5 { 1.0 } else { 0.0 };
        if (predicted_class - target[0]).abs() < 0.01 {
            correct += 1;
        }
    }

    println!("\nAccuracy: {}/{}", correct, data.len());
    if correct == data.len() {
        println!("Successfully learned XOR!");
    }
    Ok(())
}
