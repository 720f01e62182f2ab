use aotconform_abi::{Arg, BridgeError, MarshalError, NativeBridge, ReferenceBridge};
use aotconform_core::calls::ManyArgs;
use aotconform_core::objects::TypeDesc;
use aotconform_core::{ArrayValue, FaultKind, Liveness, Outcome, Scalar};
use aotconform_runtime::{OverflowPolicy, RuntimeConfig};

fn bridge() -> ReferenceBridge {
    ReferenceBridge::new(RuntimeConfig::default())
}

fn int(v: i32) -> Arg {
    Scalar::Int(v).into()
}

#[test]
fn frames_pop_on_every_exit_path() {
    let b = bridge();
    let base = b.probe().local_occupancy;

    b.invoke("Arrays.getInt", &[ArrayValue::Int(vec![1, 2, 3]).into(), int(1)])
        .unwrap();
    assert_eq!(b.probe().local_occupancy, base);

    let out = b
        .invoke("Arrays.getInt", &[ArrayValue::Int(vec![1, 2, 3]).into(), int(3)])
        .unwrap();
    assert_eq!(out.as_fault().unwrap().kind, FaultKind::IndexOutOfBounds);
    assert_eq!(b.probe().local_occupancy, base);

    let err = b.invoke("IntMath.intOper", &[int(1)]).unwrap_err();
    assert!(matches!(err, BridgeError::Marshal(MarshalError::Arity { .. })));
    assert_eq!(b.probe().local_occupancy, base);
}

#[test]
fn rethrow_preserves_identity() {
    let b = bridge();
    let mark = b.probe().faults_raised;
    let out = b.invoke("Throw.rethrow", &[int(5)]).unwrap();
    let fault = out.as_fault().unwrap();
    assert_eq!(fault.kind, FaultKind::IndexOutOfBounds);
    let raised = b.faults_since(mark);
    assert_eq!(raised.len(), 1);
    assert_eq!(fault.token, Some(raised[0].token));
}

#[test]
fn fresh_throw_has_new_identity() {
    let b = bridge();
    let mark = b.probe().faults_raised;
    let out = b.invoke("Throw.rethrowFresh", &[int(5)]).unwrap();
    let fault = out.as_fault().unwrap();
    let raised = b.faults_since(mark);
    assert_eq!(raised.len(), 2);
    assert_ne!(fault.token, Some(raised[0].token));
    assert_eq!(fault.token, Some(raised[1].token));
    assert!(raised.iter().all(|r| r.kind == FaultKind::IndexOutOfBounds));
}

#[test]
fn caught_faults_do_not_escape() {
    let b = bridge();
    let codes: Vec<Outcome> = (0..5)
        .map(|x| b.invoke("Throw.catchCode", &[int(x)]).unwrap())
        .collect();
    assert_eq!(codes[0], Outcome::Scalar(Scalar::Int(1)));
    assert_eq!(codes[1], Outcome::Scalar(Scalar::Int(2)));
    assert_eq!(codes[2], Outcome::Scalar(Scalar::Int(2)));
    assert_eq!(codes[3].as_fault().unwrap().kind, FaultKind::AssertionFailed);
    assert_eq!(codes[4], Outcome::Scalar(Scalar::Int(0)));
}

#[test]
fn unavailable_routine_is_reported() {
    let b = ReferenceBridge::without_routines(RuntimeConfig::default(), &["Interned.concat"]);
    let err = b
        .invoke("Interned.concat", &[Arg::Text("a".into()), Arg::Text("b".into())])
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(b.invoke("No.suchThing", &[]).unwrap_err().is_fatal());
}

#[test]
fn argument_kinds_are_checked_before_marshaling() {
    let b = bridge();
    let objects_before = b.probe().object_count;
    let err = b
        .invoke("Arrays.getInt", &[ArrayValue::Long(vec![1]).into(), int(0)])
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Marshal(MarshalError::Kind { index: 0, .. })
    ));
    assert_eq!(b.probe().object_count, objects_before);
}

#[test]
fn object_arguments_and_text_returns() {
    let b = bridge();
    let out = b
        .invoke("Interned.concat", &[Arg::Text("ab".into()), Arg::Text("cd".into())])
        .unwrap();
    assert_eq!(out, Outcome::Text("abcd".into()));

    let out = b
        .invoke(
            "Classes.isInstance",
            &[Arg::New(TypeDesc::class("MoreClasses")), Arg::Type(TypeDesc::class("Classes"))],
        )
        .unwrap();
    assert_eq!(out, Outcome::Scalar(Scalar::Bool(true)));

    let out = b
        .invoke("InstField.readInt", &[Arg::Null])
        .unwrap();
    assert_eq!(out.as_fault().unwrap().kind, FaultKind::NullPointer);
}

#[test]
fn collection_clears_computed_intern_only() {
    let b = bridge();
    let Outcome::Weak(computed) = b.invoke("Interned.weakComputed", &[]).unwrap() else {
        panic!("expected weak handle");
    };
    let Outcome::Weak(literal) = b.invoke("Interned.weakLiteral", &[]).unwrap() else {
        panic!("expected weak handle");
    };
    assert_eq!(b.liveness(computed).unwrap(), Liveness::Alive);
    b.request_full_collection().unwrap();
    assert_eq!(b.liveness(computed).unwrap(), Liveness::Dead);
    assert_eq!(b.liveness(literal).unwrap(), Liveness::Alive);
}

#[test]
fn unknown_weak_handle_is_an_error() {
    let b = bridge();
    let err = b.liveness(aotconform_core::WeakToken(999)).unwrap_err();
    assert_eq!(err, BridgeError::UnknownHandle(999));
}

#[test]
fn handle_loop_stays_within_capacity() {
    let b = ReferenceBridge::new(RuntimeConfig::default().with_local_capacity(16));
    let out = b.invoke("LocalRef.loop", &[int(1024)]).unwrap();
    assert_eq!(
        out,
        Outcome::Array(ArrayValue::Str(vec![Some("1024".into()), Some("1023".into())]))
    );
    assert!(b.probe().local_peak <= 16);
    assert_eq!(b.probe().local_occupancy, 0);
}

#[test]
fn leaked_handles_overflow_and_are_released() {
    let config = RuntimeConfig::default()
        .with_local_capacity(16)
        .with_overflow(OverflowPolicy::Fault);
    let b = ReferenceBridge::new(config);
    let out = b.invoke("LocalRef.leak", &[int(64)]).unwrap();
    assert_eq!(out.as_fault().unwrap().kind, FaultKind::HandleOverflow);
    assert_eq!(b.probe().local_occupancy, 0);

    let grow = ReferenceBridge::new(config.with_overflow(OverflowPolicy::Grow));
    assert_eq!(
        grow.invoke("LocalRef.leak", &[int(64)]).unwrap(),
        Outcome::Scalar(Scalar::Int(64))
    );
}

#[test]
fn wide_call_sees_every_argument_bit_for_bit() {
    let b = bridge();
    let base = b.probe().local_occupancy;
    let fixture = ManyArgs::fixture();
    assert_eq!(
        b.invoke("MethodCall.manyArgs", &Arg::many_args(&fixture)).unwrap(),
        Outcome::Unit
    );
    assert_eq!(b.probe().local_occupancy, base);

    let canonical_nan = fixture.clone().with_scalar(8, Scalar::Double(f64::NAN));
    let out = b
        .invoke("MethodCall.manyArgs", &Arg::many_args(&canonical_nan))
        .unwrap();
    let fault = out.as_fault().unwrap();
    assert_eq!(fault.kind, FaultKind::AssertionFailed);
    assert!(fault.message.starts_with("a8:"), "{fault}");

    let mut row_not_null = fixture.clone();
    if let Some(rows) = row_not_null.rows.as_mut() {
        rows[1] = Some(Vec::new());
    }
    let out = b
        .invoke("MethodCall.manyArgs", &Arg::many_args(&row_not_null))
        .unwrap();
    assert_eq!(out.as_fault().unwrap().kind, FaultKind::AssertionFailed);
    assert_eq!(b.probe().local_occupancy, base);

    let mut narrowed = Arg::many_args(&fixture);
    narrowed[16] = Scalar::Int(-128).into();
    assert!(matches!(
        b.invoke("MethodCall.manyArgs", &narrowed).unwrap_err(),
        BridgeError::Marshal(MarshalError::Kind { index: 16, .. })
    ));
}
