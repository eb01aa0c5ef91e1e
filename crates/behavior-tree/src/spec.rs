//! Data description of a tree, interpreted at tick time.
//!
//! A [`NodeSpec`] separates the shape of a tree (configuration, possibly
//! loaded from a file) from its execution. The interpreter holds no state of
//! its own: turn counters are kept in the [`TreeContext`] under the key
//! given to each [`NodeSpec::TurnDelay`], so one description can drive any
//! number of actors.

use std::fmt;
use std::time::Duration;

use crate::composite::{run_selector, run_sequence};
use crate::timing::{roll, step_counter};
use crate::{Behavior, Status, TreeContext};

/// Shape of a behavior tree whose leaves are described by `L`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeSpec<L> {
    Sequence(Vec<NodeSpec<L>>),
    Selector(Vec<NodeSpec<L>>),
    Inverter(Box<NodeSpec<L>>),
    Succeeder(Box<NodeSpec<L>>),
    /// Counter lives in the context under `key`; it advances once per tick.
    TurnDelay {
        key: String,
        turns: u32,
        child: Box<NodeSpec<L>>,
    },
    RealtimeDelay {
        millis: u64,
    },
    Random {
        probability: f32,
    },
    Leaf(L),
}

/// Structural problems found by [`NodeSpec::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    EmptyComposite { path: String },
    DuplicateDelayKey { key: String },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::EmptyComposite { path } => {
                write!(f, "composite node at {path} has no children")
            }
            SpecError::DuplicateDelayKey { key } => {
                write!(f, "turn delay key '{key}' is used more than once")
            }
        }
    }
}

impl std::error::Error for SpecError {}

impl<L> NodeSpec<L> {
    pub fn sequence(children: Vec<NodeSpec<L>>) -> Self {
        NodeSpec::Sequence(children)
    }

    pub fn selector(children: Vec<NodeSpec<L>>) -> Self {
        NodeSpec::Selector(children)
    }

    pub fn inverter(child: NodeSpec<L>) -> Self {
        NodeSpec::Inverter(Box::new(child))
    }

    pub fn succeeder(child: NodeSpec<L>) -> Self {
        NodeSpec::Succeeder(Box::new(child))
    }

    pub fn turn_delay(key: impl Into<String>, turns: u32, child: NodeSpec<L>) -> Self {
        NodeSpec::TurnDelay {
            key: key.into(),
            turns,
            child: Box::new(child),
        }
    }

    pub fn leaf(leaf: L) -> Self {
        NodeSpec::Leaf(leaf)
    }

    /// Rejects empty composites and turn delays sharing a counter key.
    pub fn validate(&self) -> Result<(), SpecError> {
        let mut keys = Vec::new();
        self.validate_at("root", &mut keys)
    }

    fn validate_at<'s>(&'s self, path: &str, keys: &mut Vec<&'s str>) -> Result<(), SpecError> {
        match self {
            NodeSpec::Sequence(children) | NodeSpec::Selector(children) => {
                if children.is_empty() {
                    return Err(SpecError::EmptyComposite {
                        path: path.to_owned(),
                    });
                }
                for (index, child) in children.iter().enumerate() {
                    child.validate_at(&format!("{path}/{index}"), keys)?;
                }
                Ok(())
            }
            NodeSpec::Inverter(child) | NodeSpec::Succeeder(child) => {
                child.validate_at(&format!("{path}/0"), keys)
            }
            NodeSpec::TurnDelay { key, child, .. } => {
                if keys.contains(&key.as_str()) {
                    return Err(SpecError::DuplicateDelayKey { key: key.clone() });
                }
                keys.push(key);
                child.validate_at(&format!("{path}/0"), keys)
            }
            NodeSpec::RealtimeDelay { .. } | NodeSpec::Random { .. } | NodeSpec::Leaf(_) => Ok(()),
        }
    }

    /// Visits every leaf in depth-first order.
    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'s>(&'s self, out: &mut Vec<&'s L>) {
        match self {
            NodeSpec::Sequence(children) | NodeSpec::Selector(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            NodeSpec::Inverter(child)
            | NodeSpec::Succeeder(child)
            | NodeSpec::TurnDelay { child, .. } => child.collect_leaves(out),
            NodeSpec::RealtimeDelay { .. } | NodeSpec::Random { .. } => {}
            NodeSpec::Leaf(leaf) => out.push(leaf),
        }
    }
}

impl<C, L> Behavior<C> for NodeSpec<L>
where
    C: TreeContext,
    L: Behavior<C>,
{
    fn tick(&self, ctx: &mut C) -> Status {
        match self {
            NodeSpec::Sequence(children) => run_sequence(children.iter(), ctx),
            NodeSpec::Selector(children) => run_selector(children.iter(), ctx),
            NodeSpec::Inverter(child) => child.tick(ctx).invert(),
            NodeSpec::Succeeder(child) => {
                let _ = child.tick(ctx);
                Status::Success
            }
            NodeSpec::TurnDelay { key, turns, child } => {
                if step_counter(ctx.turn_counter(key), *turns) {
                    child.tick(ctx)
                } else {
                    Status::Failure
                }
            }
            NodeSpec::RealtimeDelay { millis } => {
                ctx.pace(Duration::from_millis(*millis));
                Status::Success
            }
            NodeSpec::Random { probability } => roll(ctx, *probability),
            NodeSpec::Leaf(leaf) => leaf.tick(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct Host {
        counters: HashMap<String, u32>,
        trace: Vec<u8>,
        roll: f32,
    }

    impl TreeContext for Host {
        fn random_unit(&mut self) -> f32 {
            self.roll
        }

        fn turn_counter(&mut self, key: &str) -> &mut u32 {
            self.counters.entry(key.to_owned()).or_default()
        }

        fn pace(&mut self, _delay: Duration) {}
    }

    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    enum Step {
        Pass(u8),
        Fail(u8),
    }

    impl Behavior<Host> for Step {
        fn tick(&self, ctx: &mut Host) -> Status {
            match self {
                Step::Pass(id) => {
                    ctx.trace.push(*id);
                    Status::Success
                }
                Step::Fail(id) => {
                    ctx.trace.push(*id);
                    Status::Failure
                }
            }
        }
    }

    #[test]
    fn interpreted_selector_of_sequences() {
        let tree = NodeSpec::selector(vec![
            NodeSpec::sequence(vec![NodeSpec::leaf(Step::Pass(1)), NodeSpec::leaf(Step::Fail(2))]),
            NodeSpec::sequence(vec![NodeSpec::leaf(Step::Pass(3)), NodeSpec::leaf(Step::Pass(4))]),
            NodeSpec::leaf(Step::Pass(5)),
        ]);

        let mut host = Host::default();
        assert_eq!(tree.tick(&mut host), Status::Success);
        assert_eq!(host.trace, [1, 2, 3, 4]);
    }

    #[test]
    fn interpreted_turn_delay_keeps_counter_in_context() {
        let tree = NodeSpec::turn_delay("spawn", 1, NodeSpec::leaf(Step::Pass(9)));

        let mut first = Host::default();
        let mut second = Host::default();

        assert!(tree.tick(&mut first).is_failure());
        assert!(tree.tick(&mut first).is_success());
        // Another context counts on its own.
        assert!(tree.tick(&mut second).is_failure());
        assert_eq!(first.counters["spawn"], 0);
        assert_eq!(second.counters["spawn"], 1);
    }

    #[test]
    fn interpreted_decorators_and_random() {
        let mut host = Host {
            roll: 0.5,
            ..Host::default()
        };

        assert!(NodeSpec::<Step>::inverter(NodeSpec::leaf(Step::Pass(1)))
            .tick(&mut host)
            .is_failure());
        assert!(NodeSpec::<Step>::succeeder(NodeSpec::leaf(Step::Fail(2)))
            .tick(&mut host)
            .is_success());
        assert!(NodeSpec::<Step>::Random { probability: 0.75 }
            .tick(&mut host)
            .is_success());
        assert!(NodeSpec::<Step>::Random { probability: 0.25 }
            .tick(&mut host)
            .is_failure());
    }

    #[test]
    fn validate_rejects_empty_composites_and_shared_keys() {
        let empty = NodeSpec::selector(vec![NodeSpec::<Step>::sequence(vec![])]);
        assert_eq!(
            empty.validate(),
            Err(SpecError::EmptyComposite {
                path: "root/0".to_owned()
            })
        );

        let shared = NodeSpec::sequence(vec![
            NodeSpec::turn_delay("k", 1, NodeSpec::leaf(Step::Pass(1))),
            NodeSpec::turn_delay("k", 2, NodeSpec::leaf(Step::Pass(2))),
        ]);
        assert_eq!(
            shared.validate(),
            Err(SpecError::DuplicateDelayKey { key: "k".to_owned() })
        );
    }

    #[test]
    fn leaves_are_listed_depth_first() {
        let tree = NodeSpec::sequence(vec![
            NodeSpec::inverter(NodeSpec::leaf(Step::Pass(1))),
            NodeSpec::selector(vec![NodeSpec::leaf(Step::Fail(2)), NodeSpec::leaf(Step::Pass(3))]),
        ]);
        assert_eq!(tree.leaves(), [&Step::Pass(1), &Step::Fail(2), &Step::Pass(3)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn spec_loads_from_json() {
        let json = r#"{
            "selector": [
                { "turn_delay": { "key": "wait", "turns": 2, "child": { "leaf": { "Pass": 1 } } } },
                { "realtime_delay": { "millis": 0 } }
            ]
        }"#;
        let tree: NodeSpec<Step> = serde_json::from_str(json).expect("valid tree");
        assert_eq!(tree.leaves(), [&Step::Pass(1)]);
        assert!(tree.validate().is_ok());
    }
}
