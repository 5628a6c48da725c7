//! Gates and the classical conditions that guard them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::qubit::ClbitId;

/// The fixed gate vocabulary. Angles are concrete radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity. Kept as an explicit instruction so noise can attach to it.
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    /// Phase gate, diag(1, e^{iλ}).
    P(f64),
    /// Control first, target second.
    CX,
    CZ,
    Swap,
}

impl StandardGate {
    /// Lowercase instruction name, as noise models key on it.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// Rotation angle of `Rx`, `Ry`, `Rz` and `P`.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            StandardGate::Rx(t)
            | StandardGate::Ry(t)
            | StandardGate::Rz(t)
            | StandardGate::P(t) => Some(t),
            _ => None,
        }
    }
}

/// The classical data a condition reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionTarget {
    Bit(ClbitId),
    /// Register read as an unsigned integer, its bit 0 least significant.
    Register(String),
}

/// Run the guarded gate only when the target equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalCondition {
    pub target: ConditionTarget,
    pub value: u64,
}

impl ClassicalCondition {
    pub fn bit(clbit: ClbitId, value: bool) -> Self {
        Self {
            target: ConditionTarget::Bit(clbit),
            value: u64::from(value),
        }
    }

    pub fn register(register: impl Into<String>, value: u64) -> Self {
        Self {
            target: ConditionTarget::Register(register.into()),
            value,
        }
    }
}

impl fmt::Display for ClassicalCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            ConditionTarget::Bit(c) => write!(f, "{c}=={}", self.value),
            ConditionTarget::Register(name) => write!(f, "{name}=={}", self.value),
        }
    }
}

/// A gate, optionally guarded by a classical condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: StandardGate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClassicalCondition>,
}

impl Gate {
    pub fn standard(kind: StandardGate) -> Self {
        Self {
            kind,
            condition: None,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Whether the gate is feed-forward.
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Gate::standard(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_arity_name_and_angle() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::Swap.num_qubits(), 2);
        assert_eq!(StandardGate::I.name(), "id");
        assert_eq!(StandardGate::Ry(PI).angle(), Some(PI));
        assert_eq!(StandardGate::H.angle(), None);
    }

    #[test]
    fn test_bit_condition() {
        let z = Gate::standard(StandardGate::Z)
            .with_condition(ClassicalCondition::bit(ClbitId(1), true));
        assert!(z.is_conditional());
        assert_eq!(z.condition.as_ref().map(|c| c.value), Some(1));
        assert_eq!(z.condition.unwrap().to_string(), "c1==1");
    }

    #[test]
    fn test_register_condition_display() {
        let cond = ClassicalCondition::register("c_a0", 1);
        assert_eq!(cond.to_string(), "c_a0==1");
    }

    #[test]
    fn test_unconditional_gate_omits_condition_in_json() {
        let json = serde_json::to_value(Gate::from(StandardGate::X)).unwrap();
        assert!(json.get("condition").is_none());
    }
}
