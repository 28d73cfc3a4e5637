use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use reglin::{
    element_count, solve, transpose_matrix, KernelError, LuFactorization, Matrix, PivotStrategy,
    QrFactorization, RegisterKernel, RegisterKind, SerialKernel, SolverConfig, SolverFamily,
    TailPolicy, Vector, Vectorization,
};

#[test]
fn test_register_element_counts() {
    assert_eq!(element_count("__m128").unwrap(), 4);
    assert_eq!(element_count("__m128d").unwrap(), 2);
    assert_eq!(element_count("__m256").unwrap(), 8);
    assert_eq!(element_count("__m256d").unwrap(), 4);
    assert_eq!(
        element_count("__m512"),
        Err(KernelError::InvalidRegisterKind("__m512".to_string()))
    );
}

#[test]
fn test_transpose_scenario() {
    // 2x3 matrix in 4-lane registers, input at lane 1
    let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let t = transpose_matrix(RegisterKind::M128, 1, 0, TailPolicy::SetZero, &a).unwrap();
    assert_eq!(t.shape(), [3, 2]);
    assert_eq!(t, a.transpose());

    let tall = Matrix::from_fn(3, 3, |r, c| (r * 3 + c) as f64);
    assert!(matches!(
        transpose_matrix(RegisterKind::M128, 2, 0, TailPolicy::SetZero, &tall),
        Err(KernelError::OutOfRange { what: "offset_in", .. })
    ));
}

#[test]
fn test_solve_transposed_system() {
    // A is built column by column in registers, then Aᵗx = b is solved
    let mut rng = StdRng::seed_from_u64(5);
    let n = 4;
    let a = Matrix::from_fn(n, n, |r, c| {
        let v: f64 = rng.sample(StandardNormal);
        if r == c { v.abs() + 8.0 } else { v }
    });
    let at = transpose_matrix(RegisterKind::M256d, 0, 0, TailPolicy::Overwrite, &a).unwrap();
    let x = Vector::from_fn(n, |i| i as f64 - 1.5);
    let b = at.mul_vec(&x).unwrap();

    for family in [SolverFamily::Gauss, SolverFamily::Lu, SolverFamily::Qr, SolverFamily::Cramer] {
        let pivot = if family.supports_pivoting() {
            PivotStrategy::PartialPivot
        } else {
            PivotStrategy::NoPivot
        };
        for vectorization in Vectorization::ALL {
            let config = SolverConfig::new(vectorization, pivot);
            if !family.supports(config) {
                continue;
            }
            let got = solve(family, config, &at, &b).unwrap();
            assert_relative_eq!(got.as_slice(), x.as_slice(), epsilon = 1e-10);
        }
    }
}

#[test]
fn test_factor_once_solve_many() {
    let a = Matrix::from_rows(&[[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]]);
    let lu = LuFactorization::<f64, RegisterKernel<4>>::new(&a, PivotStrategy::PartialPivot).unwrap();
    let qr = QrFactorization::<f64, SerialKernel>::new(&a).unwrap();
    assert!(!lu.permutation().is_identity());
    for k in 0..3 {
        let x = Vector::from_fn(3, |i| (i + k) as f64);
        let b = a.mul_vec(&x).unwrap();
        assert_relative_eq!(lu.solve(&b).unwrap().as_slice(), x.as_slice(), epsilon = 1e-12);
        assert_relative_eq!(qr.solve(&b).unwrap().as_slice(), x.as_slice(), epsilon = 1e-12);
    }
    assert_eq!(
        LuFactorization::<f64, SerialKernel>::new(&a, PivotStrategy::NoPivot),
        Err(KernelError::SingularMatrix { step: 0 })
    );
}

#[test]
fn test_gauss_pivoting_scenario() {
    let a = Matrix::from_rows(&[[0.0f32, 1.0], [1.0, 1.0]]);
    let b = Vector::from([1.0, 2.0]);
    let no_pivot = SolverConfig::new(Vectorization::Serial, PivotStrategy::NoPivot);
    assert_eq!(
        solve(SolverFamily::Gauss, no_pivot, &a, &b),
        Err(KernelError::SingularMatrix { step: 0 })
    );
    let partial = SolverConfig::new(Vectorization::Avx, PivotStrategy::PartialPivot);
    assert_eq!(
        solve(SolverFamily::Gauss, partial, &a, &b).unwrap(),
        Vector::from([1.0, 1.0])
    );
}
