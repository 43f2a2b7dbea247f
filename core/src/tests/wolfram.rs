use crate::prelude::*;

fn run_1d(rule: &str, cells: &[u8], steps: usize) -> Vec<u8> {
    let shape = Shape::with_extents(&[cells.len()]).unwrap();
    let mut session = Session::with_rng_seed(0);
    session.set_rule(rule.parse::<Rule>().unwrap());
    session.seed_with_population(Population::from_flat_slice(shape, cells.to_vec()));
    for _ in 0..steps {
        session.step().unwrap();
    }
    session.current_population().unwrap().as_flat_slice().to_vec()
}

#[test]
fn test_rule_110() {
    assert_eq!(vec![0, 0, 0, 1, 1], run_1d("W110", &[0, 0, 0, 0, 1], 1));
    assert_eq!(vec![0, 0, 1, 1, 1], run_1d("W110", &[0, 0, 0, 0, 1], 2));
}

#[test]
fn test_rule_90_and_identity() {
    // Rule 90 is the XOR of both neighbors.
    assert_eq!(
        vec![0, 0, 1, 0, 1, 0, 0],
        run_1d("W90", &[0, 0, 0, 1, 0, 0, 0], 1),
    );
    let cells = [1, 0, 1, 1, 0, 0, 1, 0];
    assert_eq!(cells.to_vec(), run_1d("W204", &cells, 5));
    assert_eq!(vec![0; 8], run_1d("W0", &cells, 1));
}

#[test]
fn test_wolfram_with_explicit_neighbors() {
    // With a single right neighbor, configurations are `self, right`. Rule 10
    // copies the right neighbor, shifting the row left.
    let shape = Shape::with_extents(&[4]).unwrap();
    let mut session = Session::with_rng_seed(0);
    session.set_rule(WolframRule::with_config(0b1010, 2, 2).unwrap());
    session.set_neighbors(&["x+1"]).unwrap();
    session.seed_with_population(Population::from_flat_slice(shape, vec![1, 0, 0, 0]));
    assert_eq!(&[0, 0, 0, 1], session.step().unwrap().as_flat_slice());
    assert_eq!(&[0, 0, 1, 0], session.step().unwrap().as_flat_slice());
}

#[test]
fn test_wolfram_on_2d_population() {
    // Each row evolves independently under a neighborhood along X.
    let shape = Shape::new(vec![(Axis::X, 5), (Axis::Y, 2)]).unwrap();
    let mut session = Session::with_rng_seed(0);
    session.set_rule(RULE_110.clone());
    session.set_neighbors(&["x-1", "x+1"]).unwrap();
    session.seed_with_population(Population::with_live_cells(shape, vec![&[4, 0][..], &[4, 1][..]]));
    let mut live = session.step().unwrap().live_cells();
    live.sort();
    assert_eq!(
        vec![vec![3, 0], vec![3, 1], vec![4, 0], vec![4, 1]],
        live,
    );
}
