// unit tests

use super::*;

fn nz(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap()
}

const SIZES: [usize; 6] = [1, 2, 4, 7, 16, 33];

#[test]
fn operands_follow_fill_pattern() {
    let operands = Operands::allocate(3).unwrap();

    assert!(operands.a.as_slice().iter().all(|&v| v == 1.0));
    for k in 0..3 {
        assert!(operands.b.row(k).iter().all(|&v| v == (k + 1) as f64));
    }
    assert!(operands.c.as_slice().iter().all(|&v| v == 0.0));
    assert_eq!(operands.dim(), 3);
}

#[test]
fn row_major_offsets() {
    let b = Matrix::row_constant(5).unwrap();
    let slice = b.as_slice();
    assert_eq!(slice.len(), 25);
    // element (i, j) at i * n + j
    assert_eq!(slice[3 * 5 + 4], 4.0);
    assert_eq!(b.view()[[3, 4]], 4.0);
}

#[test]
fn zero_dimension_is_rejected() {
    assert!(matches!(Matrix::allocate(0), Err(MatrixError::EmptyDimension)));
}

#[test]
fn overflowing_dimension_is_rejected() {
    assert!(matches!(
        Matrix::allocate(usize::MAX),
        Err(MatrixError::TooLarge { .. })
    ));
}

#[test]
fn zero_clears_buffer() {
    let mut m = Matrix::ones(4).unwrap();
    m.zero();
    assert!(m.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn every_kernel_produces_closed_form() {
    let kernels = [Kernel::Naive, Kernel::RowOrder, Kernel::Blocked { block_size: nz(3) }];

    for n in SIZES {
        let operands = Operands::allocate(n).unwrap();
        for kernel in kernels {
            let c = kernel.multiply(&operands.a, &operands.b).unwrap();
            let expected = expected_entry(n);
            assert!(
                c.as_slice().iter().all(|&v| v == expected),
                "{kernel} failed for n = {n}"
            );
        }
    }
}

#[test]
fn kernels_agree_bit_for_bit() {
    let n = 50;
    let operands = Operands::allocate(n).unwrap();

    let naive = Kernel::Naive.multiply(&operands.a, &operands.b).unwrap();
    let line = Kernel::RowOrder.multiply(&operands.a, &operands.b).unwrap();
    let block = Kernel::Blocked { block_size: nz(8) }
        .multiply(&operands.a, &operands.b)
        .unwrap();

    assert_eq!(naive, line);
    assert_eq!(naive, block);
}

#[test]
fn block_size_does_not_change_result() {
    let n = 20;
    let operands = Operands::allocate(n).unwrap();
    let reference = Kernel::Blocked { block_size: nz(n) }
        .multiply(&operands.a, &operands.b)
        .unwrap();

    // includes non-divisors of n and sizes past n
    for bs in [1, 2, 3, 6, 7, 19, 20, 21, 128] {
        let c = Kernel::Blocked { block_size: nz(bs) }
            .multiply(&operands.a, &operands.b)
            .unwrap();
        assert_eq!(c, reference, "block size {bs}");
    }
}

#[test]
fn oversized_block_matches_row_order() {
    let n = 9;
    let operands = Operands::allocate(n).unwrap();
    let line = Kernel::RowOrder.multiply(&operands.a, &operands.b).unwrap();
    let block = Kernel::Blocked { block_size: nz(1000) }
        .multiply(&operands.a, &operands.b)
        .unwrap();
    assert_eq!(line, block);
}

#[test]
fn single_element_matrix() {
    let operands = Operands::allocate(1).unwrap();
    for method in Method::ALL {
        let c = Kernel::new(method, DEFAULT_BLOCK_SIZE)
            .multiply(&operands.a, &operands.b)
            .unwrap();
        assert_eq!(c.as_slice(), &[1.0]);
    }
}

#[test]
fn standard_four_by_four_projection() {
    let operands = Operands::allocate(4).unwrap();
    let c = Kernel::Naive.multiply(&operands.a, &operands.b).unwrap();
    assert_eq!(c.first_row_projection(10), vec![10.0; 4]);
}

#[test]
fn blocked_hundred_with_block_32() {
    let operands = Operands::allocate(100).unwrap();
    let c = Kernel::Blocked { block_size: nz(32) }
        .multiply(&operands.a, &operands.b)
        .unwrap();
    assert!(c.as_slice().iter().all(|&v| v == 5050.0));
    assert_eq!(c.first_row_projection(10).len(), 10);
}

// kernels on a non-uniform input, where loop order bugs would show up

#[test]
fn kernels_on_general_input() {
    let n = 3;
    let a: Vec<f64> = (1..=9).map(f64::from).collect();
    let b: Vec<f64> = (10..=18).map(f64::from).collect();
    let expected = [84.0, 90.0, 96.0, 201.0, 216.0, 231.0, 318.0, 342.0, 366.0];

    let mut c = vec![0.0; n * n];
    multiply_naive(&a, &b, &mut c, n);
    assert_eq!(c, expected);

    let mut c = vec![0.0; n * n];
    multiply_row_order(&a, &b, &mut c, n);
    assert_eq!(c, expected);

    for bs in [1, 2, 3, 4] {
        let mut c = vec![0.0; n * n];
        multiply_blocked(&a, &b, &mut c, n, nz(bs));
        assert_eq!(c, expected, "block size {bs}");
    }
}

#[test]
fn naive_overwrites_stale_output() {
    let n = 6;
    let mut operands = Operands::allocate(n).unwrap();
    operands.c.fill_ones();

    Kernel::Naive
        .apply(&operands.a, &operands.b, &mut operands.c)
        .unwrap();
    assert!(operands.c.as_slice().iter().all(|&v| v == expected_entry(n)));
}

#[test]
fn accumulating_kernels_add_to_output() {
    let n = 6;
    for kernel in [Kernel::RowOrder, Kernel::Blocked { block_size: nz(4) }] {
        assert!(kernel.accumulates());

        let mut operands = Operands::allocate(n).unwrap();
        operands.c.fill_ones();
        kernel
            .apply(&operands.a, &operands.b, &mut operands.c)
            .unwrap();
        assert!(operands.c.as_slice().iter().all(|&v| v == expected_entry(n) + 1.0));
    }
    assert!(!Kernel::Naive.accumulates());
}

#[test]
fn mismatched_operands_are_rejected() {
    let a = Matrix::ones(3).unwrap();
    let b = Matrix::row_constant(4).unwrap();
    let result = Kernel::RowOrder.multiply(&a, &b);
    assert!(matches!(
        result,
        Err(MatrixError::DimensionMismatch { expected: 3, actual: 4 })
    ));
}

#[test]
fn method_names_round_trip() {
    for method in Method::ALL {
        assert_eq!(method.name().parse::<Method>().unwrap(), method);
    }
}

#[test]
fn unknown_method_is_rejected() {
    let err = "bogus".parse::<Method>().unwrap_err();
    assert!(matches!(&err, MatrixError::UnknownMethod(name) if name == "bogus"));
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn block_size_only_kept_for_block_method() {
    let bs = nz(64);
    assert_eq!(Kernel::new(Method::Standard, bs).block_size(), None);
    assert_eq!(Kernel::new(Method::Line, bs).block_size(), None);
    assert_eq!(Kernel::new(Method::Block, bs).block_size(), Some(bs));
    assert_eq!(Kernel::new(Method::Block, bs).method(), Method::Block);
}

#[test]
fn projection_is_clamped_to_row_length() {
    let m = Matrix::row_constant(3).unwrap();
    assert_eq!(m.first_row_projection(10), vec![1.0; 3]);
    let m = Matrix::row_constant(12).unwrap();
    assert_eq!(m.first_row_projection(10).len(), 10);
}
