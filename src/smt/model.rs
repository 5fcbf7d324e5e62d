use crate::smt::constraint::BoolVar;
use bit_vec::BitVec;

/// A satisfying assignment returned by a backend.
///
/// Values are indexed by [`BoolVar::index`]. Variables outside the stored
/// range evaluate to `false`, matching z3's model completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Model {
    values: BitVec,
}

impl Model {
    /// Creates a model with `len` variables, all `false`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            values: BitVec::from_elem(len, false),
        }
    }

    /// Sets the value of `var`, growing the model if needed.
    pub fn set(&mut self, var: BoolVar, value: bool) {
        let index = var.index();
        if index >= self.values.len() {
            self.values.grow(index + 1 - self.values.len(), false);
        }
        self.values.set(index, value);
    }

    /// Returns the stored value of `var`, if the backend assigned it.
    #[must_use]
    pub fn get(&self, var: BoolVar) -> Option<bool> {
        self.values.get(var.index())
    }

    /// Evaluates `var` under this model, completing unassigned variables with `false`.
    #[must_use]
    pub fn evaluate(&self, var: BoolVar) -> bool {
        self.get(var).unwrap_or(false)
    }

    /// Number of variables stored in the model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the model stores no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<bool> for Model {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_model_is_all_false() {
        let model = Model::new(3);
        assert_eq!(model.len(), 3);
        assert!((0..3).all(|i| !model.evaluate(BoolVar::from_index(i))));
    }

    #[test]
    fn set_grows_and_evaluates() {
        let mut model = Model::default();
        assert!(model.is_empty());
        model.set(BoolVar::from_index(4), true);
        assert_eq!(model.len(), 5);
        assert_eq!(model.get(BoolVar::from_index(4)), Some(true));
        assert_eq!(model.get(BoolVar::from_index(2)), Some(false));
    }

    #[test]
    fn unassigned_variables_complete_to_false() {
        let model: Model = [true, true].into_iter().collect();
        assert_eq!(model.get(BoolVar::from_index(7)), None);
        assert!(!model.evaluate(BoolVar::from_index(7)));
    }
}
