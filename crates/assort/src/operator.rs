//! Boolean fold rules for composite filters.
//!
//! A [`FilterOperator`] describes how a [`CompositeFilter`](crate::CompositeFilter)
//! combines its children's results: the seed value, the combining function,
//! and the value at which evaluation stops early.

/// Fold rule with a short-circuit exit value.
pub trait FilterOperator {
    /// Combines the running result with the next child's result.
    fn calculate(&self, accumulated: bool, next: bool) -> bool;

    /// Seed of the fold.
    fn initial_value(&self) -> bool;

    /// Once the running result equals this value, remaining children are
    /// not evaluated.
    fn exit_condition_value(&self) -> bool;
}

/// Logical AND: seeded `true`, stops at the first `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct And;

impl FilterOperator for And {
    fn calculate(&self, accumulated: bool, next: bool) -> bool {
        accumulated && next
    }

    fn initial_value(&self) -> bool {
        true
    }

    fn exit_condition_value(&self) -> bool {
        false
    }
}

/// Logical OR: seeded `false`, stops at the first `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Or;

impl FilterOperator for Or {
    fn calculate(&self, accumulated: bool, next: bool) -> bool {
        accumulated || next
    }

    fn initial_value(&self) -> bool {
        false
    }

    fn exit_condition_value(&self) -> bool {
        true
    }
}

/// Logical XOR: seeded `false`, stops as soon as the running result is
/// `true`.
///
/// XOR is not absorbing, so stopping early is not equivalent to folding
/// every child: with children `[true, true]` a full fold yields `false`,
/// while the composite returns `true` after the first child. The early exit
/// is kept so composite results stay stable for existing filter setups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xor;

impl FilterOperator for Xor {
    fn calculate(&self, accumulated: bool, next: bool) -> bool {
        accumulated ^ next
    }

    fn initial_value(&self) -> bool {
        false
    }

    fn exit_condition_value(&self) -> bool {
        true
    }
}

/// Operator built from a plain function and explicit seed and exit values.
///
/// ```
/// use assort::{FilterOperator, FnOperator};
///
/// // NAND over two results
/// let nand = FnOperator::new(|a, b| !(a && b), false, false);
/// assert!(nand.calculate(true, false));
/// assert!(!nand.calculate(true, true));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnOperator {
    calculator: fn(bool, bool) -> bool,
    initial: bool,
    exit: bool,
}

impl FnOperator {
    pub fn new(calculator: fn(bool, bool) -> bool, initial: bool, exit: bool) -> Self {
        FnOperator {
            calculator,
            initial,
            exit,
        }
    }
}

impl FilterOperator for FnOperator {
    fn calculate(&self, accumulated: bool, next: bool) -> bool {
        (self.calculator)(accumulated, next)
    }

    fn initial_value(&self) -> bool {
        self.initial
    }

    fn exit_condition_value(&self) -> bool {
        self.exit
    }
}

impl<O: FilterOperator + ?Sized> FilterOperator for Box<O> {
    fn calculate(&self, accumulated: bool, next: bool) -> bool {
        (**self).calculate(accumulated, next)
    }

    fn initial_value(&self) -> bool {
        (**self).initial_value()
    }

    fn exit_condition_value(&self) -> bool {
        (**self).exit_condition_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth_table(op: &dyn FilterOperator) -> [bool; 4] {
        [
            op.calculate(false, false),
            op.calculate(false, true),
            op.calculate(true, false),
            op.calculate(true, true),
        ]
    }

    #[test]
    fn builtin_truth_tables() {
        assert_eq!(truth_table(&And), [false, false, false, true]);
        assert_eq!(truth_table(&Or), [false, true, true, true]);
        assert_eq!(truth_table(&Xor), [false, true, true, false]);
    }

    #[test]
    fn builtin_seed_and_exit() {
        assert!(And.initial_value());
        assert!(!And.exit_condition_value());
        assert!(!Or.initial_value());
        assert!(Or.exit_condition_value());
        assert!(!Xor.initial_value());
        assert!(Xor.exit_condition_value());
    }

    #[test]
    fn fn_operator_uses_given_values() {
        let op = FnOperator::new(|a, b| a == b, true, false);
        assert_eq!(truth_table(&op), [true, false, false, true]);
        assert!(op.initial_value());
        assert!(!op.exit_condition_value());
    }

    #[test]
    fn boxed_operator_forwards() {
        let op: Box<dyn FilterOperator> = Box::new(Or);
        assert!(op.calculate(false, true));
        assert!(op.exit_condition_value());
    }
}
