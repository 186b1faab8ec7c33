use crate::*;
pub use random::*;

mod random;

/// Source of synthetic scenarios, used by benches and property tests.
pub trait ScenarioGenerator {
    fn generate(self, config: CityConfig) -> Scenario;
}
