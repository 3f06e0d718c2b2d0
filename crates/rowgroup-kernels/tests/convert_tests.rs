use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowgroup_core::{Coo, Csc, Csr, GroupError};
use rowgroup_kernels::*;

fn opts(nthread: usize) -> GroupOptions {
    GroupOptions::new()
        .with_nthread(nthread)
        .with_min_shard_len(1)
}

fn simple_csr() -> Csr<f64, i64> {
    // A = [[1,0,2],[0,3,0]]
    Csr::from_parts(2, 3, vec![0i64, 2, 3], vec![0i64, 2, 1], vec![1.0f64, 2.0, 3.0], true).unwrap()
}

fn to_dense_csr(a: &Csr<f64, i64>) -> Vec<f64> {
    let mut dense = vec![0.0; a.nrows * a.ncols];
    for i in 0..a.nrows {
        let (cols, vals) = a.row(i);
        for (&j, &v) in cols.iter().zip(vals) {
            dense[i * a.ncols + j as usize] += v;
        }
    }
    dense
}

fn to_dense_csc(a: &Csc<f64, i64>) -> Vec<f64> {
    let mut dense = vec![0.0; a.nrows * a.ncols];
    for j in 0..a.ncols {
        let (rows, vals) = a.col(j);
        for (&i, &v) in rows.iter().zip(vals) {
            dense[i as usize * a.ncols + j] += v;
        }
    }
    dense
}

#[test]
fn csr_to_csc_small() {
    let c = csr_to_csc(&simple_csr(), &opts(2)).unwrap();
    assert_eq!(c.shape(), (2, 3));
    assert_eq!(c.indptr, [0, 1, 2, 3]);
    assert_eq!(c.indices, [0, 1, 0]);
    assert_eq!(c.data, [1.0, 3.0, 2.0]);
    // valid, sorted CSC
    assert!(Csc::from_parts(2, 3, c.indptr, c.indices, c.data, true).is_ok());
}

#[test]
fn csc_round_trips_back_to_csr() {
    let a = simple_csr();
    let c = csr_to_csc(&a, &opts(3)).unwrap();
    let b = csc_to_csr(&c, &opts(3)).unwrap();
    assert_eq!(b.indptr, a.indptr);
    assert_eq!(b.indices, a.indices);
    assert_eq!(b.data, a.data);
}

#[test]
fn coo_to_csr_keeps_entry_order_and_duplicates() {
    let coo = Coo::from_parts(
        3,
        3,
        vec![2i64, 0, 2, 0],
        vec![1i64, 2, 0, 2],
        vec![1.0f64, 2.0, 3.0, 4.0],
        true,
    )
    .unwrap();
    let a = coo_to_csr(&coo, &opts(2)).unwrap();
    assert_eq!(a.indptr, [0, 2, 2, 4]);
    assert_eq!(a.indices, [2, 2, 1, 0]);
    assert_eq!(a.data, [2.0, 4.0, 1.0, 3.0]);
    assert_eq!(a.nnz(), 4);
}

#[test]
fn coo_to_csc_groups_by_column() {
    let coo = Coo::from_parts(2, 3, vec![0i64, 1, 0], vec![0i64, 1, 2], vec![1.0f64, 3.0, 2.0], true)
        .unwrap();
    let c = coo_to_csc(&coo, &opts(1)).unwrap();
    assert_eq!(c.indptr, [0, 1, 2, 3]);
    assert_eq!(c.indices, [0, 1, 0]);
    assert_eq!(c.data, [1.0, 3.0, 2.0]);
}

#[test]
fn empty_rows_and_columns_keep_full_indptr() {
    let coo = Coo::from_parts(4, 5, vec![1i64], vec![3i64], vec![9.0f64], true).unwrap();
    let a = coo_to_csr(&coo, &opts(2)).unwrap();
    assert_eq!(a.indptr, [0, 0, 1, 1, 1]);
    let c = coo_to_csc(&coo, &opts(2)).unwrap();
    assert_eq!(c.indptr, [0, 0, 0, 0, 1, 1]);
}

#[test]
fn bad_coordinates_are_rejected() {
    let coo = Coo::from_parts_unchecked(2, 2, vec![0i64, -1], vec![0i64, 0], vec![1.0f64, 2.0]);
    assert!(matches!(coo_to_csr(&coo, &opts(2)), Err(GroupError::NegativeIndex(-1))));
    let coo = Coo::from_parts_unchecked(2, 2, vec![0i64, 1], vec![0i64, 2], vec![1.0f64, 2.0]);
    assert!(matches!(
        coo_to_csc(&coo, &opts(2)),
        Err(GroupError::IndexOutOfBounds { index: 2, bound: 2 })
    ));
}

#[test]
fn random_conversions_agree_densely() {
    let mut rng = StdRng::seed_from_u64(99);
    for nthread in [1usize, 4, 9] {
        let nrows = rng.gen_range(1..40);
        let ncols = rng.gen_range(1..40);
        let nnz = rng.gen_range(0..500);
        let row: Vec<i64> = (0..nnz).map(|_| rng.gen_range(0..nrows as i64)).collect();
        let col: Vec<i64> = (0..nnz).map(|_| rng.gen_range(0..ncols as i64)).collect();
        let data: Vec<f64> = (0..nnz).map(|_| f64::from(rng.gen_range(1u8..10))).collect();
        let coo = Coo::from_parts(nrows, ncols, row, col, data, true).unwrap();

        let mut expected = vec![0.0; nrows * ncols];
        for k in 0..coo.nnz() {
            expected[coo.row[k] as usize * ncols + coo.col[k] as usize] += coo.data[k];
        }

        let a = coo_to_csr(&coo, &opts(nthread)).unwrap();
        assert_eq!(*a.indptr.last().unwrap() as usize, nnz);
        assert_eq!(to_dense_csr(&a), expected);
        let c = coo_to_csc(&coo, &opts(nthread)).unwrap();
        assert_eq!(to_dense_csc(&c), expected);
        let t = csr_to_csc(&a, &opts(nthread)).unwrap();
        assert_eq!(to_dense_csc(&t), expected);
        for j in 0..ncols {
            let (rows, _) = t.col(j);
            assert!(rows.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

#[test]
fn unchecked_malformed_indptr_is_an_error() {
    // indptr decreases: 2 then 1
    let a = Csr::from_parts(2, 3, vec![0i64, 2, 1], vec![0i64], vec![1.0f64], false).unwrap();
    assert!(matches!(
        csr_to_csc(&a, &opts(2)),
        Err(GroupError::InvalidIndptr(_))
    ));

    // last offset disagrees with the number of stored entries
    let a = Csr::from_parts_unchecked(2, 3, vec![0i64, 1, 3], vec![0i64, 1], vec![1.0f64, 2.0]);
    assert!(matches!(
        csr_to_csc(&a, &opts(1)),
        Err(GroupError::InvalidIndptr(_))
    ));

    let a = Csc::from_parts_unchecked(3, 2, vec![1i64, 1, 2], vec![0i64, 1], vec![1.0f64, 2.0]);
    assert!(matches!(
        csc_to_csr(&a, &opts(2)),
        Err(GroupError::InvalidIndptr(_))
    ));
}
