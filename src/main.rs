// Evaluates a loss on a small fixed batch and prints the value and gradient.
// Usage:
//   cargo run -- [loss_spec.json]
// Without an argument the fused softmax + cross-entropy loss is used.
use ferrite_loss::{Loss, LossSpec, LossType, Matrix, Softmax, Activation, Targets, accuracy};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let spec = match std::env::args().nth(1) {
        Some(path) => match LossSpec::load_json(&path) {
            Ok(spec) => spec,
            Err(e) => {
                eprintln!("Failed to load loss spec from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => LossSpec::default(),
    };
    info!(loss = ?spec.loss, epsilon = spec.epsilon, "loss spec");

    let logits = Matrix::from_data(vec![
        vec![2.0, 1.0, 0.1],
        vec![0.5, 2.5, 0.3],
    ]);
    let targets = Targets::from(vec![0, 1]);

    let result = match spec.loss {
        LossType::CategoricalCrossEntropy => {
            let probs = Softmax::new().forward(&logits);
            let loss = spec.cross_entropy();
            loss.calculate(&probs, &targets)
                .and_then(|value| Ok((value, loss.backward(&probs, &targets)?, probs)))
        }
        LossType::SoftmaxCategoricalCrossEntropy => {
            let fused = spec.softmax_cross_entropy();
            fused.forward(&logits, &targets)
                .and_then(|out| Ok((out.loss, fused.backward_from(&out, &targets)?, out.outputs)))
        }
    };

    match result {
        Ok((loss, dinputs, probs)) => {
            println!("loss     = {loss:.6}");
            match accuracy(&probs, &targets) {
                Ok(acc) => println!("accuracy = {acc:.2}"),
                Err(e) => eprintln!("accuracy: {e}"),
            }
            for (i, row) in dinputs.data.iter().enumerate() {
                println!("dinputs[{i}] = {:?}", row);
            }
        }
        Err(e) => {
            eprintln!("Loss evaluation failed: {e}");
            std::process::exit(1);
        }
    }
}
