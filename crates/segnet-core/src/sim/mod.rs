// ── Decision logic ──
//
// Zone resolution, rule matching, flow evaluation and segmentation
// analysis. Everything here is a synchronous pure function over its
// arguments; the `Simulator` wires these to a store.

pub mod evaluator;
pub mod matcher;
pub mod segmentation;
pub mod zone;

pub use evaluator::{DEFAULT_ALLOW_DETAIL, evaluate, evaluate_scenario};
pub use matcher::{TieBreak, match_best_rule, order_rules};
pub use segmentation::analyze;
pub use zone::resolve_zone;
