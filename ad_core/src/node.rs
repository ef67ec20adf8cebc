//! Core data structures for the computation graph.
//!
//! The graph is built from `Value` handles, which are reference-counted pointers
//! to internal `Node` structures. A node points at its operands and never at its
//! consumers, so dropping the last handle to a root releases the whole graph.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{EngineError, Result};

/// Global counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_node_id() -> NodeId {
    NodeId(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Unique identifier for a node in the computation graph.
///
/// Ids are handed out in construction order, so an operand always has a smaller
/// id than every node computed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// The primitive operation that produced a node.
///
/// Negation, subtraction and division are not listed: they are composed from
/// these primitives and inherit their derivative rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    /// An input or trainable parameter (no operands).
    Leaf,
    /// operands[0] + operands[last]
    Add,
    /// operands[0] * operands[last]
    Mul,
    /// Power with constant exponent: operands[0]^exponent
    Pow { exponent: f64 },
    /// max(0, operands[0])
    Relu,
    /// Hyperbolic tangent of operands[0]
    Tanh,
    /// Logistic sigmoid of operands[0]
    Sigmoid,
    /// exp(operands[0])
    Exp,
}

impl Op {
    /// Whether the operation consumes two arguments.
    pub fn is_binary(&self) -> bool {
        matches!(self, Op::Add | Op::Mul)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Leaf => Ok(()),
            Op::Add => f.write_str("+"),
            Op::Mul => f.write_str("*"),
            Op::Pow { exponent } => write!(f, "**{exponent}"),
            Op::Relu => f.write_str("ReLU"),
            Op::Tanh => f.write_str("tanh"),
            Op::Sigmoid => f.write_str("sigmoid"),
            Op::Exp => f.write_str("exp"),
        }
    }
}

/// Internal node: forward value, gradient accumulator and provenance.
pub(crate) struct Node {
    id: NodeId,
    value: Cell<f64>,
    grad: Cell<f64>,
    op: Op,
    /// Distinct operands in argument order. A binary op applied to the same
    /// node twice (`x * x`) stores it once.
    operands: Vec<Value>,
    label: Option<String>,
}

/// A scalar in the computation graph.
///
/// `Value` is a reference-counted handle to a node. Cloning is O(1) and shares
/// the node, which is how one value fans out into several consumers.
///
/// Handles are `!Send`: graphs are built and differentiated on a
/// single thread.
#[derive(Clone)]
pub struct Value(pub(crate) Rc<Node>);

impl Value {
    /// Create an unlabelled leaf.
    pub fn new(value: f64) -> Self {
        Value::leaf(value, None)
    }

    /// Create a labelled leaf. The label is only used for display.
    pub fn var(label: &str, value: f64) -> Self {
        Value::leaf(value, Some(label.to_string()))
    }

    fn leaf(value: f64, label: Option<String>) -> Self {
        Value(Rc::new(Node {
            id: next_node_id(),
            value: Cell::new(value),
            grad: Cell::new(0.0),
            op: Op::Leaf,
            operands: Vec::new(),
            label,
        }))
    }

    /// Create an internal node. Operands are deduplicated by identity.
    pub(crate) fn from_op(value: f64, op: Op, args: &[&Value]) -> Self {
        let mut operands: Vec<Value> = Vec::with_capacity(args.len());
        for arg in args {
            if !operands.iter().any(|o| o.id() == arg.id()) {
                operands.push((*arg).clone());
            }
        }
        Value(Rc::new(Node {
            id: next_node_id(),
            value: Cell::new(value),
            grad: Cell::new(0.0),
            op,
            operands,
            label: None,
        }))
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    /// The forward value.
    pub fn value(&self) -> f64 {
        self.0.value.get()
    }

    /// The accumulated gradient of the last backward root with respect to this node.
    pub fn grad(&self) -> f64 {
        self.0.grad.get()
    }

    pub fn op(&self) -> Op {
        self.0.op
    }

    /// Distinct operands of this node, in argument order.
    pub fn operands(&self) -> &[Value] {
        &self.0.operands
    }

    pub fn label(&self) -> Option<&str> {
        self.0.label.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.op == Op::Leaf
    }

    /// Replace the value of a leaf, e.g. during an optimizer step.
    ///
    /// Internal nodes are immutable; nodes already built on top of this leaf
    /// keep the value they were computed with.
    pub fn set_value(&self, value: f64) -> Result<()> {
        if !self.is_leaf() {
            return Err(EngineError::NotALeaf { id: self.id() });
        }
        self.0.value.set(value);
        Ok(())
    }

    /// Reset this node's gradient to zero.
    pub fn zero_grad(&self) {
        self.0.grad.set(0.0);
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn accumulate_grad(&self, delta: f64) {
        self.0.grad.set(self.0.grad.get() + delta);
    }

    pub(crate) fn seed_grad(&self) {
        self.0.grad.set(1.0);
    }

    /// Left and right arguments of a binary node. When both arguments were the
    /// same node, both sides resolve to the single stored operand.
    pub(crate) fn binary_args(&self) -> (&Value, &Value) {
        let operands = &self.0.operands;
        (&operands[0], &operands[operands.len() - 1])
    }

    pub(crate) fn unary_arg(&self) -> &Value {
        &self.0.operands[0]
    }
}

// Tear down operand chains iteratively; the default drop recurses once per
// level and overflows the stack on long graphs.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.operands);
        while let Some(value) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(value.0) {
                pending.append(&mut node.operands);
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::new(value)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value(data={}, grad={}, name={})",
            self.value(),
            self.grad(),
            self.label().unwrap_or("")
        )
    }
}

// Not derived: a derived impl would recurse through every operand.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("id", &self.id())
            .field("value", &self.value())
            .field("grad", &self.grad())
            .field("op", &self.op())
            .field(
                "operands",
                &self.operands().iter().map(Value::id).collect::<Vec<_>>(),
            )
            .field("label", &self.label())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_starts_with_zero_grad() {
        let x = Value::var("x", 2.5);
        assert_eq!(x.value(), 2.5);
        assert_eq!(x.grad(), 0.0);
        assert!(x.is_leaf());
        assert!(x.operands().is_empty());
        assert_eq!(x.label(), Some("x"));
    }

    #[test]
    fn test_ids_follow_construction_order() {
        let a = Value::new(1.0);
        let b = Value::new(2.0);
        let c = a.multiply(&b);
        assert!(a.id() < b.id());
        assert!(b.id() < c.id());
    }

    #[test]
    fn test_operands_are_deduplicated() {
        let x = Value::new(3.0);
        let y = x.multiply(&x);
        assert_eq!(y.operands().len(), 1);
        assert!(y.operands()[0].ptr_eq(&x));

        let z = Value::new(4.0);
        let w = x.add(&z);
        assert_eq!(w.operands().len(), 2);
    }

    #[test]
    fn test_set_value_only_on_leaves() {
        let x = Value::new(1.0);
        x.set_value(5.0).unwrap();
        assert_eq!(x.value(), 5.0);

        let y = x.exp();
        assert_eq!(
            y.set_value(0.0),
            Err(EngineError::NotALeaf { id: y.id() })
        );
    }

    #[test]
    fn test_display_matches_repr() {
        let x = Value::var("w0", 0.5);
        assert_eq!(x.to_string(), "Value(data=0.5, grad=0, name=w0)");
        assert_eq!(Op::Pow { exponent: -1.0 }.to_string(), "**-1");
        assert_eq!(Op::Relu.to_string(), "ReLU");
    }
}
