use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use reglin_core::{KernelError, Matrix, PivotStrategy, RegScalar, Vector, Vectorization};
use reglin_solver::{solve, LuFactorization, RegisterKernel, SerialKernel, SolverConfig, SolverFamily};

const SIZES: [usize; 9] = [1, 2, 3, 4, 5, 7, 8, 16, 33];

/// Random normal entries on a diagonal of at least `2n`.
fn well_conditioned<T: RegScalar>(rng: &mut StdRng, n: usize) -> Matrix<T> {
    Matrix::from_fn(n, n, |r, c| {
        let v: f64 = rng.sample(StandardNormal);
        T::cast_from_f64(if r == c { v.abs() + 2.0 * n as f64 } else { v })
    })
}

/// `MᵗM + n·I`, symmetric positive definite.
fn spd<T: RegScalar>(rng: &mut StdRng, n: usize) -> Matrix<T> {
    let m: Matrix<f64> = Matrix::from_fn(n, n, |_, _| rng.sample(StandardNormal));
    let mut a = m.transpose().matmul(&m).unwrap();
    for i in 0..n {
        a[(i, i)] += n as f64;
    }
    a.cast()
}

fn random_vector<T: RegScalar>(rng: &mut StdRng, n: usize) -> Vector<T> {
    Vector::from_fn(n, |_| T::cast_from_f64(rng.gen_range(-10.0..10.0)))
}

fn tolerance<T: RegScalar>(n: usize) -> f64 {
    let per_size = match T::PRECISION {
        reglin_core::Precision::F32 => 1e-4,
        reglin_core::Precision::F64 => 1e-12,
    };
    per_size * (n as f64 + 1.0) * 10.0
}

fn families_for(n: usize) -> Vec<SolverFamily> {
    SolverFamily::ALL
        .into_iter()
        .filter(|f| *f != SolverFamily::Cramer || (2..=4).contains(&n))
        .collect()
}

fn round_trip<T: RegScalar>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for n in SIZES {
        for family in families_for(n) {
            let a = if family.requires_symmetry() {
                spd::<T>(&mut rng, n)
            } else {
                well_conditioned::<T>(&mut rng, n)
            };
            let x = random_vector::<T>(&mut rng, n);
            let b = a.mul_vec(&x).unwrap();
            for vectorization in Vectorization::ALL {
                for pivot in PivotStrategy::ALL {
                    let config = SolverConfig::new(vectorization, pivot);
                    if !family.supports(config) {
                        continue;
                    }
                    let got = solve(family, config, &a, &b).unwrap();
                    let err = got.max_abs_diff(&x).into_f64();
                    assert!(
                        err <= tolerance::<T>(n) * x.max_abs().into_f64(),
                        "{family} {vectorization} {pivot} n={n}: error {err}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_round_trip_f64() {
    round_trip::<f64>(11);
}

#[test]
fn test_round_trip_f32() {
    round_trip::<f32>(12);
}

fn serial_matches_vectorized<T: RegScalar>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for n in SIZES {
        let a = well_conditioned::<T>(&mut rng, n);
        let b = random_vector::<T>(&mut rng, n);
        for family in [SolverFamily::Gauss, SolverFamily::Lu, SolverFamily::Qr] {
            for pivot in PivotStrategy::ALL {
                if !family.supports(SolverConfig::new(Vectorization::Serial, pivot)) {
                    continue;
                }
                let serial = solve(family, SolverConfig::new(Vectorization::Serial, pivot), &a, &b).unwrap();
                for vectorization in [Vectorization::Sse, Vectorization::Avx] {
                    let vectorized = solve(family, SolverConfig::new(vectorization, pivot), &a, &b).unwrap();
                    let diff = serial.max_abs_diff(&vectorized).into_f64();
                    assert!(
                        diff <= tolerance::<T>(n) * serial.max_abs().into_f64().max(1.0),
                        "{family} {vectorization} {pivot} n={n}: diff {diff}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_serial_matches_vectorized() {
    serial_matches_vectorized::<f64>(21);
    serial_matches_vectorized::<f32>(22);
}

#[test]
fn test_zero_leading_pivot() {
    let mut rng = StdRng::seed_from_u64(31);
    for n in [2, 4, 8, 16] {
        // row swap of a diagonally dominant matrix whose (1, 0) entry is zero
        let mut d = well_conditioned::<f64>(&mut rng, n);
        d[(1, 0)] = 0.0;
        let mut a = d.clone();
        a.swap_rows(0, 1);
        assert_eq!(a[(0, 0)], 0.0);
        let x = random_vector::<f64>(&mut rng, n);
        let b = a.mul_vec(&x).unwrap();
        for family in [SolverFamily::Gauss, SolverFamily::Lu] {
            for vectorization in Vectorization::ALL {
                let no_pivot = SolverConfig::new(vectorization, PivotStrategy::NoPivot);
                assert_eq!(
                    solve(family, no_pivot, &a, &b),
                    Err(KernelError::SingularMatrix { step: 0 })
                );
                let partial = SolverConfig::new(vectorization, PivotStrategy::PartialPivot);
                let got = solve(family, partial, &a, &b).unwrap();
                assert!(got.max_abs_diff(&x) < 1e-9, "{family} {vectorization} n={n}");
            }
        }
    }
}

#[test]
fn test_gauss_two_by_two() {
    let a = Matrix::from_rows(&[[0.0f32, 1.0], [1.0, 1.0]]);
    let b = Vector::from([1.0, 2.0]);
    for vectorization in Vectorization::ALL {
        assert_eq!(
            solve(
                SolverFamily::Gauss,
                SolverConfig::new(vectorization, PivotStrategy::NoPivot),
                &a,
                &b
            ),
            Err(KernelError::SingularMatrix { step: 0 })
        );
        assert_eq!(
            solve(
                SolverFamily::Gauss,
                SolverConfig::new(vectorization, PivotStrategy::PartialPivot),
                &a,
                &b
            )
            .unwrap(),
            Vector::from([1.0, 1.0])
        );
    }
}

#[test]
fn test_all_zero_matrix_is_singular() {
    let a = Matrix::<f64>::zeros(4, 4);
    let b = Vector::zeros(4);
    for family in SolverFamily::ALL {
        for pivot in PivotStrategy::ALL {
            let vectorization = if family.supports_vectorization() {
                Vectorization::Avx
            } else {
                Vectorization::Serial
            };
            let config = SolverConfig::new(vectorization, pivot);
            if !family.supports(config) {
                continue;
            }
            let result = solve(family, config, &a, &b);
            assert!(
                matches!(
                    result,
                    Err(KernelError::SingularMatrix { .. }) | Err(KernelError::NotPositiveDefinite { .. })
                ),
                "{family} {pivot}: {result:?}"
            );
        }
    }
}

#[test]
fn test_lu_reuse_across_kernels() {
    let mut rng = StdRng::seed_from_u64(41);
    let a = well_conditioned::<f64>(&mut rng, 6);
    let serial = LuFactorization::<f64, SerialKernel>::new(&a, PivotStrategy::PartialPivot).unwrap();
    let vectorized = LuFactorization::<f64, RegisterKernel<4>>::new(&a, PivotStrategy::PartialPivot).unwrap();
    assert_eq!(serial.permutation(), vectorized.permutation());
    for _ in 0..5 {
        let b = random_vector::<f64>(&mut rng, 6);
        let xs = serial.solve(&b).unwrap();
        let xv = vectorized.solve(&b).unwrap();
        assert_abs_diff_eq!(xs.as_slice(), xv.as_slice(), epsilon = 1e-12);
        let residual = a.mul_vec(&xs).unwrap().max_abs_diff(&b);
        assert!(residual < 1e-10);
    }
}
