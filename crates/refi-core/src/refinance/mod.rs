pub mod break_even;
pub mod comparison;
pub mod settings;

pub use break_even::{find_break_even, BreakEven};
pub use comparison::{analyze_refinance, PlanResult, PlanSummary, RefinanceAnalysis};
pub use settings::RefinanceSettings;
