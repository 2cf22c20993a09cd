//! Constraint cost model.
//!
//! The cost of an ordering is the number of betweenness constraints it
//! violates. Zero means every constraint holds.

use crate::error::{BetweennessError, Result};
use crate::instance::{Constraint, Instance, VarId};
use crate::ordering::Ordering;

/// `true` if position `c` lies strictly between `a` and `b`.
pub fn strictly_between(a: usize, b: usize, c: usize) -> bool {
    (a < c && c < b) || (b < c && c < a)
}

/// Whether `constraint` is violated by `ordering`.
///
/// Returns `None` if the ordering lacks one of the constraint's variables.
pub fn is_violated(ordering: &Ordering, constraint: &Constraint) -> Option<bool> {
    let a = ordering.position(constraint.a)?;
    let b = ordering.position(constraint.b)?;
    let c = ordering.position(constraint.c)?;
    Some(strictly_between(a, b, c))
}

/// Counts the constraints violated by `ordering`.
///
/// The result is `constraints.len() - satisfied`, always within
/// `0..=constraints.len()`.
///
/// # Errors
///
/// [`BetweennessError::InvalidConstraint`] if a constraint references a
/// variable absent from the ordering.
pub fn cost(ordering: &Ordering, constraints: &[Constraint]) -> Result<usize> {
    let mut satisfied = 0;
    for (i, constraint) in constraints.iter().enumerate() {
        match is_violated(ordering, constraint) {
            Some(false) => satisfied += 1,
            Some(true) => {}
            None => {
                let missing = constraint
                    .vars()
                    .into_iter()
                    .find(|&v| ordering.position(v).is_none())
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                return Err(BetweennessError::InvalidConstraint {
                    constraint: i,
                    variable: missing,
                });
            }
        }
    }
    Ok(constraints.len() - satisfied)
}

/// Violations among the constraints that mention `var`.
///
/// Moving a single variable only changes its order relative to the others,
/// so constraints that do not mention it keep their status. The cost delta
/// of moving `var` is the difference of this count before and after.
///
/// `ordering` must cover every variable of `instance`.
pub(crate) fn violations_involving(instance: &Instance, ordering: &Ordering, var: VarId) -> usize {
    instance
        .constraints_of(var)
        .filter(|constraint| is_violated(ordering, constraint) == Some(true))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbor::InsertMove;
    use proptest::prelude::*;

    fn abc_instance() -> Instance {
        Instance::new(["A", "B", "C"], [["A", "B", "C"]]).unwrap()
    }

    #[test]
    fn test_strictly_between_either_direction() {
        assert!(strictly_between(0, 2, 1));
        assert!(strictly_between(2, 0, 1));
        assert!(!strictly_between(0, 1, 2));
        assert!(!strictly_between(1, 1, 1));
        assert!(!strictly_between(0, 2, 0));
    }

    #[test]
    fn test_cost_single_constraint() {
        let inst = abc_instance();
        // A B C: C at the end, satisfied
        assert_eq!(cost(&Ordering::identity(3), inst.constraints()).unwrap(), 0);
        // A C B: C between A and B
        let middle = inst.ordering_from_names(&["A", "C", "B"]).unwrap();
        assert_eq!(cost(&middle, inst.constraints()).unwrap(), 1);
        // C A B: C at the front, satisfied
        let front = inst.ordering_from_names(&["C", "A", "B"]).unwrap();
        assert_eq!(cost(&front, inst.constraints()).unwrap(), 0);
    }

    #[test]
    fn test_cost_missing_variable() {
        let inst = abc_instance();
        let short = Ordering::identity(2);
        let err = cost(&short, inst.constraints()).unwrap_err();
        match err {
            BetweennessError::InvalidConstraint {
                constraint,
                variable,
            } => {
                assert_eq!(constraint, 0);
                assert_eq!(variable, "#2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cost_matches_name_level_cost() {
        let inst = Instance::new(
            ["a", "b", "c", "d"],
            [["a", "b", "c"], ["d", "a", "b"], ["c", "d", "a"]],
        )
        .unwrap();
        let ordering = inst.ordering_from_names(&["b", "d", "a", "c"]).unwrap();
        let names = inst.names_of(&ordering);
        assert_eq!(
            cost(&ordering, inst.constraints()).unwrap(),
            inst.cost_of_names(&names).unwrap()
        );
    }

    #[test]
    fn test_contradictory_triangle_always_costs_one() {
        // Every variable is forbidden from the middle; some variable is always there.
        let inst = Instance::new(
            ["A", "B", "C"],
            [["A", "B", "C"], ["A", "C", "B"], ["B", "C", "A"]],
        )
        .unwrap();
        for names in [
            ["A", "B", "C"],
            ["A", "C", "B"],
            ["B", "A", "C"],
            ["B", "C", "A"],
            ["C", "A", "B"],
            ["C", "B", "A"],
        ] {
            let ordering = inst.ordering_from_names(&names).unwrap();
            assert_eq!(cost(&ordering, inst.constraints()).unwrap(), 1);
        }
    }

    fn instance_and_ordering() -> impl Strategy<Value = (Instance, Ordering)> {
        (3usize..9).prop_flat_map(|n| {
            let triples = prop::collection::vec((0..n, 0..n, 0..n), 0..20);
            let perm = Just((0..n).collect::<Vec<usize>>()).prop_shuffle();
            (Just(n), triples, perm).prop_map(|(n, triples, perm)| {
                let names: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
                let constraints: Vec<[String; 3]> = triples
                    .iter()
                    .map(|&(a, b, c)| [names[a].clone(), names[b].clone(), names[c].clone()])
                    .collect();
                let inst = Instance::new(names, constraints).unwrap();
                let ordering =
                    Ordering::from_sequence(perm.into_iter().map(VarId::new).collect()).unwrap();
                (inst, ordering)
            })
        })
    }

    proptest! {
        #[test]
        fn prop_cost_is_bounded((inst, ordering) in instance_and_ordering()) {
            let c = cost(&ordering, inst.constraints()).unwrap();
            let violated = inst
                .constraints()
                .iter()
                .filter(|k| is_violated(&ordering, k) == Some(true))
                .count();
            prop_assert!(c <= inst.num_constraints());
            prop_assert_eq!(c, violated);
        }

        #[test]
        fn prop_delta_matches_full_recount(
            (inst, ordering) in instance_and_ordering(),
            from_seed in 0usize..64,
            to_seed in 0usize..64,
        ) {
            let n = ordering.len();
            let from = from_seed % n;
            let to = to_seed % n;
            prop_assume!(from != to);

            let var = ordering.get(from).unwrap();
            let before_total = cost(&ordering, inst.constraints()).unwrap();
            let before = violations_involving(&inst, &ordering, var);

            let mut moved = ordering.clone();
            moved.apply(InsertMove { from, to });
            let after = violations_involving(&inst, &moved, var);
            let after_total = cost(&moved, inst.constraints()).unwrap();

            prop_assert_eq!(after_total, before_total + after - before);
        }
    }
}
