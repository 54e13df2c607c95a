pub mod softmax;

pub use softmax::{Activation, Softmax};
