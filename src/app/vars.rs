//! Typed variable registry exposed to the console.
//!
//! Values live in atomics so the registry can be shared by plain reference
//! between command handlers and the rest of the firmware.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use crate::console::ConsoleError;

/// Variable type, as shown by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Bool,
    Int,
    Float,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Bool => "bool",
            VarKind::Int => "int",
            VarKind::Float => "float",
        }
    }
}

/// A variable's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:.3}", x),
        }
    }
}

enum Slot {
    Bool(AtomicBool),
    Int { value: AtomicI32, min: i32, max: i32 },
    /// f32 bit pattern
    Float(AtomicU32),
}

/// One named, typed variable.
pub struct Var {
    pub name: &'static str,
    pub description: &'static str,
    slot: Slot,
    default: Value,
}

impl Var {
    pub fn bool(name: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            name,
            description,
            slot: Slot::Bool(AtomicBool::new(default)),
            default: Value::Bool(default),
        }
    }

    /// Integer clamped to `min..=max` on every write.
    pub fn int(name: &'static str, description: &'static str, default: i32, min: i32, max: i32) -> Self {
        Self {
            name,
            description,
            slot: Slot::Int {
                value: AtomicI32::new(default.clamp(min, max)),
                min,
                max,
            },
            default: Value::Int(default),
        }
    }

    pub fn float(name: &'static str, description: &'static str, default: f32) -> Self {
        Self {
            name,
            description,
            slot: Slot::Float(AtomicU32::new(default.to_bits())),
            default: Value::Float(default),
        }
    }

    pub fn kind(&self) -> VarKind {
        match self.slot {
            Slot::Bool(_) => VarKind::Bool,
            Slot::Int { .. } => VarKind::Int,
            Slot::Float(_) => VarKind::Float,
        }
    }

    pub fn get(&self) -> Value {
        match &self.slot {
            Slot::Bool(v) => Value::Bool(v.load(Ordering::Relaxed)),
            Slot::Int { value, .. } => Value::Int(value.load(Ordering::Relaxed)),
            Slot::Float(bits) => Value::Float(f32::from_bits(bits.load(Ordering::Relaxed))),
        }
    }

    /// Store `value`, clamping integers. A value of the wrong type is rejected.
    pub fn set(&self, value: Value) -> Result<Value, ConsoleError> {
        match (&self.slot, value) {
            (Slot::Bool(v), Value::Bool(b)) => v.store(b, Ordering::Relaxed),
            (Slot::Int { value: v, min, max }, Value::Int(n)) => {
                v.store(n.clamp(*min, *max), Ordering::Relaxed)
            }
            (Slot::Float(bits), Value::Float(x)) => bits.store(x.to_bits(), Ordering::Relaxed),
            _ => return Err(ConsoleError::InvalidValue),
        }
        Ok(self.get())
    }

    /// Parse `text` for this variable's type and store it.
    ///
    /// Booleans take `true`/`on`/`1` or `false`/`off`/`0`. Integers out of
    /// range are clamped. Returns the value actually stored.
    pub fn set_from_str(&self, text: &str) -> Result<Value, ConsoleError> {
        let value = match self.kind() {
            VarKind::Bool => match text {
                "true" | "on" | "1" => Value::Bool(true),
                "false" | "off" | "0" => Value::Bool(false),
                _ => return Err(ConsoleError::InvalidValue),
            },
            VarKind::Int => Value::Int(text.parse().map_err(|_| ConsoleError::InvalidValue)?),
            VarKind::Float => {
                let x: f32 = text.parse().map_err(|_| ConsoleError::InvalidValue)?;
                if !x.is_finite() {
                    return Err(ConsoleError::InvalidValue);
                }
                Value::Float(x)
            }
        };
        self.set(value)
    }

    pub fn reset(&self) {
        let _ = self.set(self.default);
    }

    /// Inclusive range for integers.
    pub fn range(&self) -> Option<(i32, i32)> {
        match self.slot {
            Slot::Int { min, max, .. } => Some((min, max)),
            _ => None,
        }
    }
}

/// Number of variables in [`Vars`].
pub const VAR_COUNT: usize = 13;

/// The firmware's variable table.
pub struct Vars {
    vars: [Var; VAR_COUNT],
}

impl Vars {
    /// Table with factory defaults.
    pub fn new() -> Self {
        Self {
            vars: [
                Var::bool("debug", "Enable debug output", false),
                Var::bool("verbose", "Enable verbose logging", false),
                Var::bool("test", "Enable test mode", false),
                Var::bool("led", "Control LED state", true),
                Var::bool("imu_cal", "Trigger IMU calibration", false),
                Var::bool("log", "Enable continuous data logging", false),
                Var::int("rate", "Sample rate in Hz", 100, 1, 1000),
                Var::int("loglevel", "Log level (0=none, 3=all)", 2, 0, 3),
                Var::int("filter", "Filter order", 3, 1, 10),
                Var::int("bufsize", "Buffer size", 256, 64, 1024),
                Var::float("temp", "Temperature in Celsius", 25.5),
                Var::float("vdd", "Supply voltage", 3.3),
                Var::float("thresh", "Detection threshold", 0.5),
            ],
        }
    }

    pub fn find(&self, name: &str) -> Option<&Var> {
        self.vars.iter().find(|v| v.name == name)
    }

    /// Like [`find`](Self::find), for use with `?` in handlers.
    pub fn lookup(&self, name: &str) -> Result<&Var, ConsoleError> {
        self.find(name).ok_or(ConsoleError::UnknownVariable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Every variable back to its default.
    pub fn reset_all(&self) {
        for v in &self.vars {
            v.reset();
        }
    }

    /// Boolean value by name (`false` for unknown or non-boolean names).
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.find(name).map(Var::get), Some(Value::Bool(true)))
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.find(name)?.get() {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.find(name)?.get() {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }
}

impl Default for Vars {
    fn default() -> Self {
        Self::new()
    }
}
