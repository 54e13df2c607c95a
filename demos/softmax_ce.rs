use ferrite_loss::{
    Activation, CategoricalCrossEntropy, Loss, Matrix, Softmax, SoftmaxCategoricalCrossEntropy,
    Targets, accuracy,
};
use rand::Rng;

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let samples = 4;
    let classes = 5;

    let mut rng = rand::thread_rng();
    let logits = Matrix::random(samples, classes).map(|x| x * 3.0);
    let labels: Vec<usize> = (0..samples).map(|_| rng.gen_range(0..classes)).collect();
    let targets = Targets::from(labels.clone());

    let fused = SoftmaxCategoricalCrossEntropy::new();
    let out = match fused.forward(&logits, &targets) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("forward failed: {e}");
            return;
        }
    };
    println!("labels   = {labels:?}");
    println!("loss     = {:.6}", out.loss);
    if let Ok(acc) = accuracy(&out.outputs, &targets) {
        println!("accuracy = {acc:.2}");
    }

    // The shortcut gradient against the long way round: cross-entropy
    // backward chained through the softmax Jacobian.
    let shortcut = fused.backward_from(&out, &targets);
    let chained = CategoricalCrossEntropy::new()
        .backward(&out.outputs, &targets)
        .and_then(|dvalues| Softmax::new().backward(&dvalues, &Softmax::new().forward(&logits)));

    if let (Ok(shortcut), Ok(chained)) = (shortcut, chained) {
        let max_diff = shortcut.data.iter().flatten()
            .zip(chained.data.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        println!("max |shortcut - chained| = {max_diff:.3e}");
    }
}
