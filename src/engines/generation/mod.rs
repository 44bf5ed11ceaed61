pub mod codec;
pub mod evolution_engine;
pub mod operators;
pub mod population;
pub mod progress;
pub mod selection;
pub mod stopping;

pub use evolution_engine::{EngineState, GeneticAlgorithm};
pub use population::Population;
pub use progress::{LogProgressCallback, ProgressCallback, SilentProgress};
pub use selection::SelectionStrategy;
pub use stopping::{Continuation, LoopState, StoppingPolicy};
