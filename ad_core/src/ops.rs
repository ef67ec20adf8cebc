//! Primitive operations and their local gradient rules.
//!
//! Each primitive computes its forward value eagerly and records an [`Op`] tag.
//! During the backward pass [`Value::propagate`] matches on that tag and adds
//! the weighted contributions into the operands' accumulators.

use log::trace;

use crate::error::{EngineError, Result};
use crate::node::{Op, Value};

impl Value {
    /// `self + other`
    pub fn add(&self, other: impl Into<Value>) -> Value {
        let other = other.into();
        Value::from_op(self.value() + other.value(), Op::Add, &[self, &other])
    }

    /// `self * other`
    pub fn multiply(&self, other: impl Into<Value>) -> Value {
        let other = other.into();
        Value::from_op(self.value() * other.value(), Op::Mul, &[self, &other])
    }

    /// Raise to a constant power: `self^exponent`.
    ///
    /// Fails with [`EngineError::InvalidExponent`] for a non-finite exponent and
    /// with [`EngineError::DomainError`] for a negative exponent on a zero base.
    pub fn powf(&self, exponent: f64) -> Result<Value> {
        if !exponent.is_finite() {
            return Err(EngineError::InvalidExponent { exponent });
        }
        if exponent < 0.0 && self.value() == 0.0 {
            return Err(EngineError::DomainError { exponent });
        }
        Ok(Value::from_op(
            self.value().powf(exponent),
            Op::Pow { exponent },
            &[self],
        ))
    }

    /// `max(0, self)`; zero maps to zero.
    pub fn relu(&self) -> Value {
        let x = self.value();
        let out = if x < 0.0 { 0.0 } else { x };
        Value::from_op(out, Op::Relu, &[self])
    }

    /// Hyperbolic tangent, evaluated as `(e^{2x} - 1) / (e^{2x} + 1)`.
    pub fn tanh(&self) -> Value {
        let e2x = (2.0 * self.value()).exp();
        Value::from_op((e2x - 1.0) / (e2x + 1.0), Op::Tanh, &[self])
    }

    /// Logistic sigmoid `1 / (1 + e^{-x})`.
    pub fn sigmoid(&self) -> Value {
        let out = 1.0 / (1.0 + (-self.value()).exp());
        Value::from_op(out, Op::Sigmoid, &[self])
    }

    pub fn exp(&self) -> Value {
        Value::from_op(self.value().exp(), Op::Exp, &[self])
    }

    /// `self * -1`
    pub fn negate(&self) -> Value {
        self.multiply(-1.0)
    }

    /// `self + (-other)`
    pub fn subtract(&self, other: impl Into<Value>) -> Value {
        self.add(other.into().negate())
    }

    /// `self * other^-1`. Fails with [`EngineError::DomainError`] when `other` is zero.
    pub fn divide(&self, other: impl Into<Value>) -> Result<Value> {
        let reciprocal = other.into().powf(-1.0)?;
        Ok(self.multiply(reciprocal))
    }

    /// Distribute this node's gradient to its operands.
    pub(crate) fn propagate(&self) {
        let g = self.grad();
        let out = self.value();
        trace!("propagate {:?} {} grad={}", self.id(), self.op(), g);

        match self.op() {
            Op::Leaf => {}
            Op::Add => {
                let (a, b) = self.binary_args();
                a.accumulate_grad(g);
                b.accumulate_grad(g);
            }
            Op::Mul => {
                let (a, b) = self.binary_args();
                // Read both values before touching either accumulator.
                let (a_val, b_val) = (a.value(), b.value());
                a.accumulate_grad(b_val * g);
                b.accumulate_grad(a_val * g);
            }
            Op::Pow { exponent } => {
                let a = self.unary_arg();
                a.accumulate_grad(exponent * a.value().powf(exponent - 1.0) * g);
            }
            Op::Relu => {
                let local = if out > 0.0 { 1.0 } else { 0.0 };
                self.unary_arg().accumulate_grad(local * g);
            }
            Op::Tanh => {
                self.unary_arg().accumulate_grad((1.0 - out * out) * g);
            }
            Op::Sigmoid => {
                self.unary_arg().accumulate_grad(out * (1.0 - out) * g);
            }
            Op::Exp => {
                self.unary_arg().accumulate_grad(out * g);
            }
        }
    }
}

/// Sum values left to right. An empty input yields a zero leaf.
pub fn sum(values: impl IntoIterator<Item = Value>) -> Value {
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.fold(first, |acc, v| acc.add(v)),
        None => Value::new(0.0),
    }
}

impl std::iter::Sum for Value {
    fn sum<I: Iterator<Item = Value>>(iter: I) -> Value {
        sum(iter)
    }
}

// === Operator overloads ===
//
// `/` is intentionally absent: division is fallible, use `Value::divide`.

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $prim:ident) => {
        impl std::ops::$trait<&Value> for &Value {
            type Output = Value;

            fn $method(self, rhs: &Value) -> Value {
                Value::$prim(self, rhs)
            }
        }

        impl std::ops::$trait<Value> for &Value {
            type Output = Value;

            fn $method(self, rhs: Value) -> Value {
                Value::$prim(self, rhs)
            }
        }

        impl std::ops::$trait<&Value> for Value {
            type Output = Value;

            fn $method(self, rhs: &Value) -> Value {
                Value::$prim(&self, rhs)
            }
        }

        impl std::ops::$trait<Value> for Value {
            type Output = Value;

            fn $method(self, rhs: Value) -> Value {
                Value::$prim(&self, rhs)
            }
        }

        impl std::ops::$trait<f64> for &Value {
            type Output = Value;

            fn $method(self, rhs: f64) -> Value {
                Value::$prim(self, rhs)
            }
        }

        impl std::ops::$trait<f64> for Value {
            type Output = Value;

            fn $method(self, rhs: f64) -> Value {
                Value::$prim(&self, rhs)
            }
        }

        impl std::ops::$trait<&Value> for f64 {
            type Output = Value;

            fn $method(self, rhs: &Value) -> Value {
                Value::$prim(&Value::new(self), rhs)
            }
        }

        impl std::ops::$trait<Value> for f64 {
            type Output = Value;

            fn $method(self, rhs: Value) -> Value {
                Value::$prim(&Value::new(self), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add);
impl_binary_op!(Sub, sub, subtract);
impl_binary_op!(Mul, mul, multiply);

impl std::ops::Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        self.negate()
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        self.negate()
    }
}
