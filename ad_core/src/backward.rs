//! Reverse-mode automatic differentiation.
//!
//! The backward pass computes gradients by:
//! 1. Building a topological ordering of nodes reachable from the root
//! 2. Seeding the root's gradient with 1.0
//! 3. Traversing in reverse order, letting each node push its gradient into its operands
//!
//! Gradients accumulate: nothing is reset here. Call [`zero_grad`] or
//! [`Value::zero_grad_reachable`] before running a fresh pass over old nodes.

use std::collections::HashSet;

use log::debug;

use crate::node::{NodeId, Value};

struct Frame {
    node: Value,
    next_operand: usize,
}

/// Build a topological ordering of all nodes reachable from `root`.
///
/// This is a DFS postorder: every operand is emitted before the node that uses
/// it, each node exactly once, and `root` last. An explicit stack replaces
/// recursion so long chains cannot overflow the call stack; the order is the
/// same one the recursive formulation produces.
pub fn topological_order(root: &Value) -> Vec<Value> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![Frame {
        node: root.clone(),
        next_operand: 0,
    }];
    visited.insert(root.id());

    while let Some(frame) = stack.last_mut() {
        let operands = frame.node.operands();
        if frame.next_operand < operands.len() {
            let operand = operands[frame.next_operand].clone();
            frame.next_operand += 1;
            if visited.insert(operand.id()) {
                stack.push(Frame {
                    node: operand,
                    next_operand: 0,
                });
            }
        } else if let Some(done) = stack.pop() {
            order.push(done.node);
        }
    }

    order
}

/// Seed `root` with gradient 1.0 and propagate to every reachable node.
pub(crate) fn backward(root: &Value) {
    let order = topological_order(root);
    debug!(
        "backward from {:?}: {} reachable nodes",
        root.id(),
        order.len()
    );

    root.seed_grad();
    for node in order.iter().rev() {
        node.propagate();
    }
}

/// Reset the gradient of every node in `params` to zero.
pub fn zero_grad<'a>(params: impl IntoIterator<Item = &'a Value>) {
    for p in params {
        p.zero_grad();
    }
}

impl Value {
    /// Run the backward pass with this node as the root.
    ///
    /// After this call every reachable node's `grad()` has been increased by
    /// d(self)/d(node); the root's own gradient is set to 1.0.
    pub fn backward(&self) {
        backward(self)
    }

    /// Reset the gradient of this node and every node reachable from it.
    pub fn zero_grad_reachable(&self) {
        for node in topological_order(self) {
            node.zero_grad();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn position(order: &[Value], v: &Value) -> usize {
        order.iter().position(|n| n.id() == v.id()).unwrap()
    }

    #[test]
    fn test_topological_order_simple() {
        let x = Value::var("x", 1.0);
        let y = Value::var("y", 2.0);
        let z = &x + &y;

        let order = topological_order(&z);

        assert_eq!(order.len(), 3);
        assert_eq!(order[2].id(), z.id());
        assert!(position(&order, &x) < position(&order, &z));
        assert!(position(&order, &y) < position(&order, &z));
    }

    #[test]
    fn test_topological_order_matches_recursive_postorder() {
        // z = (a * b) + (a + c)
        let a = Value::var("a", 1.0);
        let b = Value::var("b", 2.0);
        let c = Value::var("c", 3.0);
        let ab = &a * &b;
        let ac = &a + &c;
        let z = &ab + &ac;

        let ids: Vec<NodeId> = topological_order(&z).iter().map(Value::id).collect();
        assert_eq!(ids, vec![a.id(), b.id(), ab.id(), c.id(), ac.id(), z.id()]);
    }

    #[test]
    fn test_topological_order_shared_node() {
        let x = Value::var("x", 1.0);
        let z = &x * &x;

        let order = topological_order(&z);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_every_operand_precedes_its_consumer() {
        let x = Value::new(0.3);
        let y = Value::new(-1.2);
        let h = (&x * &y).tanh() + x.exp();
        let z = (&h * &h).sigmoid() - y.relu();

        let order = topological_order(&z);
        let ids: HashSet<NodeId> = order.iter().map(Value::id).collect();
        assert_eq!(ids.len(), order.len());

        for node in &order {
            for operand in node.operands() {
                assert!(position(&order, operand) < position(&order, node));
            }
        }
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let x = Value::new(1.0);
        let mut acc = x.clone();
        for _ in 0..20_000 {
            acc = acc.add(0.0);
        }
        acc.backward();
        assert_eq!(x.grad(), 1.0);
    }

    #[test]
    fn test_backward_chain() {
        // z = (x + 1)^2, dz/dx = 2(x + 1)
        let x = Value::var("x", 2.0);
        let z = (&x + 1.0).powf(2.0).unwrap();

        z.backward();
        assert_abs_diff_eq!(x.grad(), 6.0, epsilon = 1e-12);
        assert_eq!(z.grad(), 1.0);
    }

    #[test]
    fn test_backward_accumulates_without_reset() {
        let x = Value::new(3.0);
        let z = &x * 2.0;

        z.backward();
        assert_eq!(x.grad(), 2.0);

        // Fresh graph over the same leaf: contributions add up.
        let w = &x * 5.0;
        w.backward();
        assert_eq!(x.grad(), 7.0);

        zero_grad([&x]);
        assert_eq!(x.grad(), 0.0);
    }

    #[test]
    fn test_zero_grad_reachable_clears_intermediates() {
        let a = Value::new(1.5);
        let b = Value::new(-2.0);
        let h = &a * &b;
        let z = h.tanh();

        z.backward();
        assert!(h.grad() != 0.0);

        z.zero_grad_reachable();
        for node in topological_order(&z) {
            assert_eq!(node.grad(), 0.0);
        }
    }
}
