//! Property-based tests for the solvers and the simplifier.

use proptest::prelude::*;
use sat_sudoku::sat::assignment::Assignment;
use sat_sudoku::sat::clause::Clause;
use sat_sudoku::sat::cnf::Cnf;
use sat_sudoku::sat::dpll::Dpll;
use sat_sudoku::sat::literal::Literal;
use sat_sudoku::sat::recursive::RecursiveDpll;
use sat_sudoku::sat::simplify::{find_unit_clauses, simplify};
use sat_sudoku::sat::solver::{Solver, solve};

const NUM_VARS: u32 = 6;

fn literal() -> impl Strategy<Value = Literal<u32>> {
    (1..=NUM_VARS, any::<bool>()).prop_map(|(v, p)| Literal::new(v, p))
}

fn clause() -> impl Strategy<Value = Clause<u32>> {
    prop::collection::vec(literal(), 1..=4).prop_map(Clause::from)
}

fn formula() -> impl Strategy<Value = Cnf<u32>> {
    prop::collection::vec(clause(), 0..=14).prop_map(Cnf::from)
}

/// Decides satisfiability by trying every total assignment.
fn brute_force_sat(cnf: &Cnf<u32>) -> bool {
    (0..1u32 << NUM_VARS).any(|bits| {
        let assignment: Assignment<u32> = (1..=NUM_VARS)
            .map(|v| (v, bits & (1 << (v - 1)) != 0))
            .collect();
        cnf.verify(&assignment)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_solution_satisfies_formula(cnf in formula()) {
        match solve(&cnf) {
            Some(assignment) => prop_assert!(cnf.verify(&assignment)),
            None => prop_assert!(!brute_force_sat(&cnf)),
        }
    }

    #[test]
    fn prop_complete(cnf in formula()) {
        prop_assert_eq!(solve(&cnf).is_some(), brute_force_sat(&cnf));
    }

    #[test]
    fn prop_engines_agree(cnf in formula()) {
        let mut iterative = Dpll::new(cnf.clone());
        let mut recursive = RecursiveDpll::new(cnf);

        prop_assert_eq!(iterative.solve(), recursive.solve());
        prop_assert_eq!(iterative.stats(), recursive.stats());
    }

    #[test]
    fn prop_assignment_only_mentions_formula_variables(cnf in formula()) {
        if let Some(assignment) = solve(&cnf) {
            let variables = cnf.variables();
            for (variable, _) in assignment.iter() {
                prop_assert!(variables.contains(variable));
            }
        }
    }

    #[test]
    fn prop_empty_clause_is_unsat(cnf in formula(), at in 0usize..=14) {
        let mut clauses = cnf.clauses;
        let at = at.min(clauses.len());
        clauses.insert(at, Clause::empty());
        prop_assert_eq!(solve(&Cnf::from(clauses)), None);
    }

    #[test]
    fn prop_simplify_eliminates_variable(cnf in formula(), lit in literal()) {
        let simplified = simplify(&cnf, &lit);
        prop_assert!(simplified.len() <= cnf.len());
        prop_assert!(simplified.iter().all(|c| !c.mentions(lit.variable())));
    }

    #[test]
    fn prop_simplify_order_independent(
        cnf in formula(),
        picks in prop::collection::btree_map(1..=NUM_VARS, any::<bool>(), 0..=4),
    ) {
        let literals: Vec<Literal<u32>> =
            picks.into_iter().map(|(v, p)| Literal::new(v, p)).collect();

        let forward = literals.iter().fold(cnf.clone(), |f, l| simplify(&f, l));
        let backward = literals.iter().rev().fold(cnf, |f, l| simplify(&f, l));
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_units_are_unit_clauses(cnf in formula()) {
        let units = find_unit_clauses(&cnf);
        let expected = cnf.iter().filter(|c| c.is_unit()).count();
        prop_assert_eq!(units.len(), expected);
        for unit in &units {
            prop_assert!(cnf.iter().any(|c| c.is_unit() && c.contains(unit)));
        }
    }
}
