use crate::{stmt::Value, Error, Result};

use std::{fmt, sync::Arc};

/// Reads and writes one attribute on an instance.
///
/// The mapping object itself is never mutated; all state lives in the
/// instance passed in.
pub trait PropertyAccess: fmt::Debug + Send + Sync {
    fn get(&self, owner: &Value) -> Result<Value>;

    fn set(&self, owner: &mut Value, value: Value) -> Result<()>;
}

/// Accesses the field at `position` of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFieldAccess {
    pub position: usize,
}

impl RecordFieldAccess {
    pub fn new(position: usize) -> Self {
        Self { position }
    }
}

impl PropertyAccess for RecordFieldAccess {
    fn get(&self, owner: &Value) -> Result<Value> {
        match owner {
            // A null embeddable has null attributes
            Value::Null => Ok(Value::Null),
            Value::Record(record) => record.get(self.position).cloned().ok_or_else(|| {
                Error::illegal_argument(format!(
                    "record of {} fields has no field {}",
                    record.len(),
                    self.position
                ))
            }),
            Value::Proxy(proxy) => Err(Error::lazy_initialization(&proxy.entity, &proxy.id)),
            other => Err(Error::type_conversion(other.clone(), "Record")),
        }
    }

    fn set(&self, owner: &mut Value, value: Value) -> Result<()> {
        match owner {
            Value::Record(record) => match record.get_mut(self.position) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(Error::illegal_argument(format!(
                    "record of {} fields has no field {}",
                    record.len(),
                    self.position
                ))),
            },
            other => Err(Error::type_conversion(other.clone(), "Record")),
        }
    }
}

/// Accesses a nested attribute through a path of accessors.
#[derive(Debug, Clone)]
pub struct ChainedPropertyAccess {
    steps: Vec<Arc<dyn PropertyAccess>>,
}

impl ChainedPropertyAccess {
    pub fn new(steps: Vec<Arc<dyn PropertyAccess>>) -> Self {
        Self { steps }
    }
}

impl PropertyAccess for ChainedPropertyAccess {
    fn get(&self, owner: &Value) -> Result<Value> {
        let mut current = owner.clone();
        for step in &self.steps {
            current = step.get(&current)?;
        }
        Ok(current)
    }

    fn set(&self, owner: &mut Value, value: Value) -> Result<()> {
        let Some((last, parents)) = self.steps.split_last() else {
            *owner = value;
            return Ok(());
        };

        let mut path = Vec::with_capacity(parents.len());
        let mut current = owner.clone();
        for step in parents {
            let next = step.get(&current)?;
            path.push(current);
            current = next;
        }

        last.set(&mut current, value)?;

        for step in parents.iter().rev() {
            let mut parent = path.pop().unwrap_or_default();
            step.set(&mut parent, current)?;
            current = parent;
        }

        *owner = current;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_access_reads_and_writes_nested_fields() {
        let access = ChainedPropertyAccess::new(vec![
            Arc::new(RecordFieldAccess::new(1)),
            Arc::new(RecordFieldAccess::new(0)),
        ]);

        let mut order = Value::record_from_vec(vec![
            Value::I64(1),
            Value::record_from_vec(vec![Value::from("Main St"), Value::from("Springfield")]),
        ]);

        assert_eq!(access.get(&order).unwrap(), Value::from("Main St"));

        access.set(&mut order, Value::from("Elm St")).unwrap();
        assert_eq!(access.get(&order).unwrap(), Value::from("Elm St"));
        assert_eq!(
            RecordFieldAccess::new(0).get(&order).unwrap(),
            Value::I64(1)
        );
    }

    #[test]
    fn proxies_cannot_be_read() {
        let proxy = Value::from(crate::stmt::EntityProxy::new("Customer", 7_i64));
        assert!(RecordFieldAccess::new(0)
            .get(&proxy)
            .unwrap_err()
            .is_lazy_initialization());
    }
}
