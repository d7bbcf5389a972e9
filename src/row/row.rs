use crate::core::{Result, SchemaError, Value};

/// Values of one record, positioned by field index.
///
/// When tracking is on, every write through a field marks that field as
/// assigned; `copy_no_assignment` and row initialization clear the mark.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
    assigned: Vec<bool>,
    track_assignments: bool,
}

impl Row {
    pub(crate) fn new(field_count: usize, track_assignments: bool) -> Self {
        Self {
            values: vec![Value::Null; field_count],
            assigned: vec![false; field_count],
            track_assignments,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub(crate) fn store(&mut self, index: usize, value: Value) -> Result<()> {
        let slot = self.values.get_mut(index).ok_or_else(|| out_of_range(index))?;
        *slot = value;
        if self.track_assignments {
            self.assigned[index] = true;
        }
        Ok(())
    }

    pub fn tracks_assignments(&self) -> bool {
        self.track_assignments
    }

    pub fn set_track_assignments(&mut self, enabled: bool) {
        self.track_assignments = enabled;
        if !enabled {
            self.clear_assignments();
        }
    }

    pub fn is_assigned(&self, index: usize) -> bool {
        self.assigned.get(index).copied().unwrap_or(false)
    }

    pub fn any_assigned(&self) -> bool {
        self.assigned.iter().any(|a| *a)
    }

    pub fn clear_assignment(&mut self, index: usize) {
        if let Some(flag) = self.assigned.get_mut(index) {
            *flag = false;
        }
    }

    pub fn clear_assignments(&mut self) {
        self.assigned.iter_mut().for_each(|a| *a = false);
    }
}

fn out_of_range(index: usize) -> SchemaError {
    SchemaError::Configuration(format!("field index {} is outside the row", index))
}
