//! End-to-end filter composition over engine-style operands


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ewise_core::{Error, Value};
use ewise_operators::{
    ewise_filtered_ops, filtered_unary_or_op_val, filtered_unary_or_self, filtered_unary_or_val,
    Builtin, FilteredBinarySpec, FilteredView, Operator,
};
use test_data_gen::{apply_ewise, apply_unary, i, positive, TestVec};

#[test]
fn test_unfiltered_operands_keep_the_fast_path() {
    let a = TestVec::from_i64(&[1, 2, 3]);
    let b = TestVec::from_i64(&[4, 5, 6]);

    let op = Operator::from(Builtin::Add);
    let unary = filtered_unary_or_self(&a, op.clone()).expect("compose");
    assert!(unary.same(&op));

    let ops = ewise_filtered_ops(&a, &b, FilteredBinarySpec::new(op.clone())).expect("compose");
    assert!(ops.op.same(&op));
    assert!(ops.do_op.is_none());
    assert_eq!(apply_ewise(&a, &b, &ops), vec![i(5), i(7), i(9)]);
}

#[test]
fn test_unary_policies_over_a_vector() {
    let v = TestVec::from_i64(&[-2, 3, 0, 5]).with_filter(positive);
    let square = Operator::unary(|x| x.try_mul(x));

    let or_self = filtered_unary_or_self(&v, square.clone()).expect("compose");
    assert_eq!(
        apply_unary(&v, &or_self),
        vec![Value::I64(-2), Value::I64(9), Value::I64(0), Value::I64(25)]
    );

    let or_val = filtered_unary_or_val(&v, square.clone(), Value::I64(-1)).expect("compose");
    assert_eq!(
        apply_unary(&v, &or_val),
        vec![Value::I64(-1), Value::I64(9), Value::I64(-1), Value::I64(25)]
    );

    // Mapped default: op(zero), never op(default).
    let plus_ten = Operator::unary(|x| x.try_add(&Value::I64(10)));
    let or_op_val = filtered_unary_or_op_val(&v, plus_ten, Value::I64(99)).expect("compose");
    assert_eq!(
        apply_unary(&v, &or_op_val),
        vec![Value::I64(10), Value::I64(13), Value::I64(10), Value::I64(15)]
    );
}

#[test]
fn test_predicate_chain_runs_in_order_and_short_circuits() {
    let second_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&second_calls);
    let v = TestVec::from_i64(&[-1, 4, 7])
        .with_filter(positive)
        .with_filter(move |x| {
            counter.fetch_add(1, Ordering::SeqCst);
            x.as_i64().is_some_and(|n| n % 2 == 0)
        });

    let op = filtered_unary_or_val(&v, Builtin::Negate.into(), Value::I64(0)).expect("compose");
    assert_eq!(
        apply_unary(&v, &op),
        vec![Value::I64(0), Value::I64(-4), Value::I64(0)]
    );
    // -1 is rejected by the first entry; the second only sees 4 and 7.
    assert_eq!(second_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_intersection_without_defaults() {
    let a = TestVec::from_i64(&[1, -2, 3, -4]).with_filter(positive);
    let b = TestVec::from_i64(&[10, 20, -30, -40]).with_filter(positive);

    let ops = ewise_filtered_ops(&a, &b, FilteredBinarySpec::new(Builtin::Mul.into()))
        .expect("compose");
    assert_eq!(apply_ewise(&a, &b, &ops), vec![i(10), None, None, None]);
}

#[test]
fn test_union_with_defaults() {
    let a = TestVec::from_i64(&[1, -2, 3, -4]).with_filter(positive);
    let b = TestVec::from_i64(&[10, 20, -30, -40]).with_filter(positive);

    let request = FilteredBinarySpec::new(Builtin::Add.into())
        .with_a_null(Value::I64(0))
        .with_b_null(Value::I64(100));
    let ops = ewise_filtered_ops(&a, &b, request).expect("compose");
    assert_eq!(
        apply_ewise(&a, &b, &ops),
        vec![i(11), i(20), i(103), None]
    );
}

#[test]
fn test_one_sided_filter() {
    let a = TestVec::from_i64(&[1, -2, 3]).with_filter(positive);
    let b = TestVec::from_i64(&[-5, 6, 7]);

    let request = FilteredBinarySpec::new(Builtin::Sub.into()).with_b_null(Value::I64(0));
    let ops = ewise_filtered_ops(&a, &b, request).expect("compose");
    // B is unfiltered, so its default never matters; A has none.
    assert_eq!(apply_ewise(&a, &b, &ops), vec![i(6), None, i(-4)]);
}

#[test]
fn test_disallowed_nulls_behave_like_missing_defaults() {
    let a = TestVec::from_i64(&[-1, 2]).with_filter(positive);
    let b = TestVec::from_i64(&[3, -4]).with_filter(positive);

    let request = FilteredBinarySpec::new(Builtin::Add.into())
        .with_a_null(Value::I64(0))
        .with_b_null(Value::I64(0))
        .allow_a_nulls(false);
    let ops = ewise_filtered_ops(&a, &b, request).expect("compose");
    assert_eq!(apply_ewise(&a, &b, &ops), vec![None, i(2)]);
}

#[test]
fn test_skipping_do_op_is_a_contract_violation() {
    let a = TestVec::from_i64(&[-1]).with_filter(positive);
    let b = TestVec::from_i64(&[-1]).with_filter(positive);

    let ops = ewise_filtered_ops(&a, &b, FilteredBinarySpec::new(Builtin::Add.into()))
        .expect("compose");
    let err = ops
        .op
        .call_binary(&Value::I64(-1), &Value::I64(-1))
        .unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));
}

#[test]
fn test_filtered_view_is_a_filterable() {
    let view = FilteredView::new().with_filter(positive);
    let plain = view.without_filters();

    let op = Operator::from(Builtin::Abs);
    assert!(filtered_unary_or_self(&plain, op.clone()).expect("compose").same(&op));

    let filtered = filtered_unary_or_self(&view, op.clone()).expect("compose");
    assert!(!filtered.same(&op));
    assert_eq!(filtered.call_unary(&Value::I64(-3)).unwrap(), Value::I64(-3));
}

#[test]
fn test_unsupported_conversions_surface_at_construction() {
    let a = TestVec::from_i64(&[1]).with_filter(positive);

    let err = filtered_unary_or_self(&a, ewise_operators::set(Value::I64(1))).unwrap_err();
    assert!(matches!(err, Error::UnsupportedConversion(_)));

    let err = ewise_filtered_ops(&a, &a, FilteredBinarySpec::new(Builtin::Fmod.into())).unwrap_err();
    assert_eq!(err, Error::UnsupportedBuiltin("fmod"));
}
