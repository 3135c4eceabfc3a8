//! Statement execution and expression evaluation.
//!
//! Everything runs against the persistent [`Environment`]; errors are
//! returned, never panicked, so the caller can capture them as outcomes.

use crate::ast::{BinaryOp, Expr, Literal, StmtKind, Target, UnaryOp};
use crate::outcome::Outcome;
use crate::stdlib;
use crate::values::Value;

use super::{Environment, RuntimeError, operators};

/// Tree-walking evaluator over one environment.
pub struct Evaluator<'env> {
    env: &'env mut Environment,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env mut Environment) -> Self {
        Self { env }
    }

    /// Execute one statement for its effects.
    pub fn exec(&mut self, kind: &StmtKind) -> Result<(), RuntimeError> {
        match kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }
            StmtKind::Assign { targets, value } => {
                let value = self.eval_expr(value)?;
                for target in targets {
                    self.assign_target(target, value.clone())?;
                }
                Ok(())
            }
            StmtKind::AugAssign { target, op, value } => self.exec_aug(target, *op, value),
            StmtKind::Import { names } => {
                for item in names {
                    let module = stdlib::module(&item.name)
                        .ok_or_else(|| RuntimeError::ModuleNotFound(item.name.clone()))?;
                    self.env.set(item.binding().clone(), module);
                }
                Ok(())
            }
            StmtKind::FromImport { module, names } => {
                let value = stdlib::module(module)
                    .ok_or_else(|| RuntimeError::ModuleNotFound(module.clone()))?;
                let Value::Module(def) = &value else {
                    return Err(RuntimeError::ModuleNotFound(module.clone()));
                };
                for item in names {
                    let bound = def.attr(&item.name).cloned().ok_or_else(|| {
                        RuntimeError::ImportError {
                            name: item.name.clone(),
                            module: module.clone(),
                        }
                    })?;
                    self.env.set(item.binding().clone(), bound);
                }
                Ok(())
            }
            StmtKind::Delete { names } => {
                for name in names {
                    self.env
                        .remove(name)
                        .ok_or_else(|| RuntimeError::NameError(name.clone()))?;
                }
                Ok(())
            }
            StmtKind::Pass => Ok(()),
        }
    }

    /// Evaluate an expression to a value.
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(literal_value(lit)),
            Expr::Ident(name) => self
                .env
                .get(name)
                .cloned()
                .or_else(|| stdlib::builtin(name))
                .ok_or_else(|| RuntimeError::NameError(name.clone())),
            Expr::Unary { op, expr } => {
                let value = self.eval_expr(expr)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnaryOp::Neg => match value {
                        Value::Int(v) => v.checked_neg().map(Value::Int).ok_or(RuntimeError::Overflow),
                        Value::Bool(v) => Ok(Value::Int(-i64::from(v))),
                        Value::Float(v) => Ok(Value::Float(-v)),
                        other => Err(RuntimeError::TypeError(format!(
                            "bad operand type for unary -: '{}'",
                            other.type_name()
                        ))),
                    },
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                // `and`/`or` yield an operand, evaluating the right side
                // only when needed.
                match op {
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::And | BinaryOp::Or => self.eval_expr(right),
                    _ => {
                        let right = self.eval_expr(right)?;
                        operators::binary(*op, &left, &right)
                    }
                }
            }
            Expr::Tuple(elts) => Ok(Value::Tuple(self.eval_all(elts)?)),
            Expr::List(elts) => Ok(Value::List(self.eval_all(elts)?)),
            Expr::Dict(items) => {
                let mut out: Vec<(Value, Value)> = Vec::with_capacity(items.len());
                for (key_expr, value_expr) in items {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    // A repeated key keeps its first position, last value.
                    match out.iter_mut().find(|(k, _)| operators::values_equal(k, &key)) {
                        Some(slot) => slot.1 = value,
                        None => out.push((key, value)),
                    }
                }
                Ok(Value::Dict(out))
            }
            Expr::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                operators::index(&object, &index)
            }
            Expr::Attr { object, field } => {
                let object = self.eval_expr(object)?;
                match &object {
                    Value::Module(module) => module.attr(field).cloned().ok_or_else(|| {
                        RuntimeError::AttributeError(format!(
                            "module '{}' has no attribute '{}'",
                            module.name(),
                            field
                        ))
                    }),
                    other => Err(RuntimeError::AttributeError(format!(
                        "'{}' object has no attribute '{}'",
                        other.type_name(),
                        field
                    ))),
                }
            }
            Expr::Call { func, args } => {
                let func = self.eval_expr(func)?;
                let args = self.eval_all(args)?;
                match func {
                    Value::Function(native) => native.call(&args),
                    other => Err(RuntimeError::TypeError(format!(
                        "'{}' object is not callable",
                        other.type_name()
                    ))),
                }
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        exprs.iter().map(|e| self.eval_expr(e)).collect()
    }

    fn assign_target(&mut self, target: &Target, value: Value) -> Result<(), RuntimeError> {
        match target {
            Target::Name(name) => {
                self.env.set(name.clone(), value);
                Ok(())
            }
            Target::Tuple(elts) => self.unpack(elts, value),
            Target::Attribute { object, field } => {
                let object = self.eval_expr(object)?;
                Err(RuntimeError::AttributeError(format!(
                    "cannot set attribute '{}' on '{}' object",
                    field,
                    object.type_name()
                )))
            }
            Target::Subscript { object, index } => {
                let key = self.eval_expr(index)?;
                let container = self.place_mut(object)?;
                match container {
                    Value::Dict(items) => {
                        match items
                            .iter_mut()
                            .find(|(k, _)| operators::values_equal(k, &key))
                        {
                            Some(slot) => slot.1 = value,
                            None => items.push((key, value)),
                        }
                        Ok(())
                    }
                    _ => {
                        *item_slot(container, &key)? = value;
                        Ok(())
                    }
                }
            }
        }
    }

    fn unpack(&mut self, targets: &[Target], value: Value) -> Result<(), RuntimeError> {
        let items: Vec<Value> = match value {
            Value::Tuple(items) | Value::List(items) => items,
            Value::Str(s) => s.chars().map(|c| Value::str(c.to_string())).collect(),
            other => {
                return Err(RuntimeError::TypeError(format!(
                    "cannot unpack non-iterable {} object",
                    other.type_name()
                )));
            }
        };
        if items.len() < targets.len() {
            return Err(RuntimeError::ValueError(format!(
                "not enough values to unpack (expected {}, got {})",
                targets.len(),
                items.len()
            )));
        }
        if items.len() > targets.len() {
            return Err(RuntimeError::ValueError(format!(
                "too many values to unpack (expected {})",
                targets.len()
            )));
        }
        for (target, item) in targets.iter().zip(items) {
            self.assign_target(target, item)?;
        }
        Ok(())
    }

    fn exec_aug(
        &mut self,
        target: &Target,
        op: BinaryOp,
        value: &Expr,
    ) -> Result<(), RuntimeError> {
        let rhs = self.eval_expr(value)?;
        match target {
            Target::Name(name) => {
                let current = self
                    .env
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::NameError(name.clone()))?;
                let updated = operators::binary(op, &current, &rhs)?;
                self.env.set(name.clone(), updated);
                Ok(())
            }
            Target::Subscript { object, index } => {
                let key = self.eval_expr(index)?;
                let container = self.place_mut(object)?;
                let slot = item_slot(container, &key)?;
                let updated = operators::binary(op, &slot.clone(), &rhs)?;
                *slot = updated;
                Ok(())
            }
            Target::Attribute { object, field } => {
                let object = self.eval_expr(object)?;
                Err(RuntimeError::AttributeError(format!(
                    "cannot set attribute '{}' on '{}' object",
                    field,
                    object.type_name()
                )))
            }
            Target::Tuple(_) => Err(RuntimeError::TypeError(
                "'tuple' is an illegal target for augmented assignment".to_string(),
            )),
        }
    }

    /// Resolve an expression to a mutable slot in the environment. Only
    /// name-rooted subscript chains denote assignable places.
    fn place_mut(&mut self, expr: &Expr) -> Result<&mut Value, RuntimeError> {
        match expr {
            Expr::Ident(name) => self
                .env
                .get_mut(name)
                .ok_or_else(|| RuntimeError::NameError(name.clone())),
            Expr::Index { object, index } => {
                let key = self.eval_expr(index)?;
                let container = self.place_mut(object)?;
                item_slot(container, &key)
            }
            _ => Err(RuntimeError::TypeError(
                "unsupported assignment target".to_string(),
            )),
        }
    }
}

/// Mutable access to an existing element of a container.
fn item_slot<'a>(container: &'a mut Value, key: &Value) -> Result<&'a mut Value, RuntimeError> {
    match container {
        Value::List(items) => {
            let position = match key {
                Value::Int(v) => Some(*v),
                Value::Bool(v) => Some(i64::from(*v)),
                _ => None,
            }
            .ok_or_else(|| {
                RuntimeError::TypeError(format!(
                    "list indices must be integers, not {}",
                    key.type_name()
                ))
            })?;
            let at = operators::normalize_index(position, items.len())
                .ok_or(RuntimeError::IndexError("list"))?;
            Ok(&mut items[at])
        }
        Value::Dict(items) => items
            .iter_mut()
            .find(|(k, _)| operators::values_equal(k, key))
            .map(|(_, v)| v)
            .ok_or_else(|| RuntimeError::KeyError(key.repr())),
        other => Err(RuntimeError::TypeError(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(v) => Value::Int(*v),
        Literal::Float(v) => Value::Float(*v),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::None => Value::None,
    }
}

/// Execute one statement and derive its display outcome.
///
/// Errors raised by execution are captured into the outcome; the
/// environment keeps whatever partial state the failed execution produced.
pub fn statement_outcome(env: &mut Environment, kind: &StmtKind) -> Outcome {
    match kind {
        StmtKind::Expr(expr) => {
            let mut evaluator = Evaluator::new(env);
            match evaluator.eval_expr(expr) {
                Ok(value) => Outcome::Value(value),
                Err(error) => Outcome::Error(error),
            }
        }
        StmtKind::Assign { targets, .. } => {
            if let Err(error) = Evaluator::new(env).exec(kind) {
                return Outcome::Error(error);
            }
            if targets.len() != 1 {
                return Outcome::Nothing;
            }
            match &targets[0] {
                Target::Name(name) => match env.get(name) {
                    Some(value) => Outcome::Value(value.clone()),
                    None => Outcome::Nothing,
                },
                Target::Tuple(elts) if elts.iter().all(|t| matches!(t, Target::Name(_))) => {
                    let mut values = Vec::with_capacity(elts.len());
                    for elt in elts {
                        let Target::Name(name) = elt else {
                            return Outcome::Nothing;
                        };
                        match env.get(name) {
                            Some(value) => values.push(value.clone()),
                            None => return Outcome::Nothing,
                        }
                    }
                    Outcome::Value(Value::Tuple(values))
                }
                _ => Outcome::Nothing,
            }
        }
        StmtKind::AugAssign { target, .. } => {
            if let Err(error) = Evaluator::new(env).exec(kind) {
                return Outcome::Error(error);
            }
            match target {
                Target::Name(name) => match env.get(name) {
                    Some(value) => Outcome::Value(value.clone()),
                    None => Outcome::Nothing,
                },
                _ => Outcome::Nothing,
            }
        }
        StmtKind::Import { names } | StmtKind::FromImport { names, .. } => {
            if let Err(error) = Evaluator::new(env).exec(kind) {
                return Outcome::Error(error);
            }
            let mut values = Vec::with_capacity(names.len());
            for item in names {
                match env.get(item.binding()) {
                    Some(value) => values.push(value.clone()),
                    None => return Outcome::Nothing,
                }
            }
            if values.len() == 1 {
                match values.pop() {
                    Some(value) => Outcome::Value(value),
                    None => Outcome::Nothing,
                }
            } else {
                Outcome::Value(Value::Tuple(values))
            }
        }
        StmtKind::Delete { .. } | StmtKind::Pass => match Evaluator::new(env).exec(kind) {
            Ok(()) => Outcome::Nothing,
            Err(error) => Outcome::Error(error),
        },
    }
}
