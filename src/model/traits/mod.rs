pub mod model_trait;

pub use model_trait::{Algorithm, ModelTrait};
