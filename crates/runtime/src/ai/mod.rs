//! Behavior-tree AI players.
//!
//! Tree shape is data ([`behavior_tree::NodeSpec`] over [`AiLeaf`]),
//! execution is the interpreter ticking it against an [`AiContext`]:
//!
//! - [`evaluator`]: weighted position and target scoring
//! - [`leaf`]: action and condition leaves
//! - [`presets`]: ready-made trees
//! - [`AiPlayer`]: drives one player's turns

mod actions;
mod context;
pub mod evaluator;
mod leaf;
mod player;
pub mod presets;

pub use context::AiContext;
pub use evaluator::{
    PositionEvaluator, PositionEvaluatorSpec, PositionScorer, TargetEvaluator,
    TargetEvaluatorSpec, TargetScorer, WeightedPosition, WeightedTarget,
};
pub use leaf::AiLeaf;
pub use player::AiPlayer;
