//! Instance-of, checked casts, and virtual/super dispatch.

use aotconform_abi::Arg;
use aotconform_core::calls::ManyArgs;
use aotconform_core::objects::{self, CLONEABLE, SERIALIZABLE, STRING, TypeDesc};
use aotconform_core::{FaultKind, Outcome, Scalar};

use super::{boolean, fault, or_fault};
use crate::case::{TestCase, TestSuite};

/// A subject for the instance-of matrix: how it is passed, and its type as
/// the oracle sees it (`None` for null).
struct Subject {
    label: &'static str,
    arg: Arg,
    ty: Option<TypeDesc>,
}

fn new_of(label: &'static str, ty: TypeDesc) -> Subject {
    Subject {
        label,
        arg: Arg::New(ty.clone()),
        ty: Some(ty),
    }
}

fn subjects() -> Vec<Subject> {
    let int_array = TypeDesc::Prim('I').array_of();
    vec![
        new_of("x", TypeDesc::class("X")),
        new_of("y", TypeDesc::class("Y")),
        new_of("more_classes", TypeDesc::class("MoreClasses")),
        Subject {
            label: "string",
            arg: Arg::Text("s".into()),
            ty: Some(TypeDesc::class(STRING)),
        },
        new_of("int_array", int_array.clone()),
        new_of("int_array_array", int_array.array_of()),
        new_of("object_array", TypeDesc::object().array_of()),
        new_of("y_array", TypeDesc::class("Y").array_of()),
        Subject {
            label: "null",
            arg: Arg::Null,
            ty: None,
        },
    ]
}

fn targets() -> Vec<(&'static str, TypeDesc)> {
    vec![
        ("object", TypeDesc::object()),
        ("x", TypeDesc::class("X")),
        ("y", TypeDesc::class("Y")),
        ("classes", TypeDesc::class("Classes")),
        ("serializable", TypeDesc::class(SERIALIZABLE)),
        ("cloneable", TypeDesc::class(CLONEABLE)),
        ("int_array", TypeDesc::Prim('I').array_of()),
        ("long_array", TypeDesc::Prim('J').array_of()),
        ("object_array", TypeDesc::object().array_of()),
        ("x_array", TypeDesc::class("X").array_of()),
    ]
}

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("objects");

    for subject in subjects() {
        for (target_label, target) in targets() {
            let ty = subject.ty.clone();
            let expected_target = target.clone();
            s.push(
                TestCase::call(
                    format!("instance_of_{}_{target_label}", subject.label),
                    "Classes.isInstance",
                    vec![subject.arg.clone(), Arg::Type(target)],
                )
                .expect(move || {
                    Scalar::Bool(objects::is_instance_of(ty.as_ref(), &expected_target)).into()
                }),
            );
        }
    }

    for (name, subject, target) in [
        ("check_cast_up", Some(TypeDesc::class("Y")), TypeDesc::class("X")),
        ("check_cast_down", Some(TypeDesc::class("X")), TypeDesc::class("Y")),
        ("check_cast_null", None, TypeDesc::class("Y")),
        (
            "check_cast_array_covariant",
            Some(TypeDesc::class("Y").array_of()),
            TypeDesc::class("X").array_of(),
        ),
        (
            "check_cast_primitive_array",
            Some(TypeDesc::Prim('I').array_of()),
            TypeDesc::object().array_of(),
        ),
    ] {
        let arg = subject.clone().map_or(Arg::Null, Arg::New);
        s.push(
            TestCase::call(name, "Classes.checkCast", vec![arg, Arg::Type(target.clone())])
                .expect(move || {
                    or_fault(objects::check_cast(subject.as_ref(), &target).map(|()| Outcome::Unit))
                }),
        );
    }

    for class in ["Classes", "MoreClasses", "EvenMoreClasses"] {
        s.push(
            TestCase::call(
                format!("virtual_tag_{class}"),
                "Classes.virtualTag",
                vec![Arg::New(TypeDesc::class(class))],
            )
            .expect(move || or_fault(objects::virtual_int(class, "tag").map(Scalar::Int))),
        );
    }
    s.push(
        TestCase::call("virtual_tag_null", "Classes.virtualTag", vec![Arg::Null])
            .expect(|| fault(FaultKind::NullPointer)),
    );
    // Resolution starts above the declaring class, not the receiver's.
    s.push(
        TestCase::call(
            "super_tag",
            "Classes.superTag",
            vec![Arg::New(TypeDesc::class("EvenMoreClasses"))],
        )
        .expect(|| or_fault(objects::super_int("EvenMoreClasses", "tag").map(Scalar::Int))),
    );

    for (class, flag) in [("Classes", false), ("Classes", true), ("MoreClasses", true)] {
        s.push(
            TestCase::call(
                format!("sub_func_{class}_{flag}"),
                "Classes.subFunc",
                vec![Arg::New(TypeDesc::class(class)), boolean(flag)],
            )
            .expect(move || {
                or_fault(objects::virtual_flag_call(class, "subFunc", flag).map(|()| Outcome::Unit))
            }),
        );
    }
    for (class, flag) in [
        ("MoreClasses", false),
        ("MoreClasses", true),
        ("EvenMoreClasses", false),
    ] {
        s.push(
            TestCase::call(
                format!("super_func_{class}_{flag}"),
                "Classes.superFunc",
                vec![Arg::New(TypeDesc::class(class)), boolean(flag)],
            )
            .expect(move || {
                or_fault(
                    objects::virtual_flag_call(class, "superFunc", flag).map(|()| Outcome::Unit),
                )
            }),
        );
    }

    for class in ["MethodCall", "MethodCallBase"] {
        s.push(
            TestCase::call(
                format!("try_thing_{class}"),
                "MethodCall.tryThing",
                vec![Arg::New(TypeDesc::class(class))],
            )
            .expect(move || or_fault(objects::virtual_int(class, "tryThing").map(Scalar::Int))),
        );
    }
    many_args_cases(&mut s);
    s
}

/// One thirty-argument call per variant. The routine checks every parameter
/// against its compiled-in values, so each altered bit pattern must surface
/// as an assertion fault.
fn many_args_cases(s: &mut TestSuite) {
    let fixture = ManyArgs::fixture();
    let mut variants = vec![
        ("many_args", fixture.clone()),
        ("many_args_canonical_nan", fixture.clone().with_scalar(8, Scalar::Double(f64::NAN))),
        ("many_args_positive_zero", fixture.clone().with_scalar(9, Scalar::Float(0.0))),
        (
            "many_args_long_min_plus_one",
            fixture.clone().with_scalar(1, Scalar::Long(i64::MIN + 1)),
        ),
        ("many_args_char_low_half", fixture.clone().with_scalar(13, Scalar::Char(0x00ff))),
        ("many_args_byte_max", fixture.clone().with_scalar(16, Scalar::Byte(127))),
        ("many_args_false", fixture.clone().with_scalar(17, Scalar::Bool(false))),
    ];

    let mut null_rows = fixture.clone();
    null_rows.rows = None;
    variants.push(("many_args_null_rows", null_rows));
    let mut filled_row = fixture.clone();
    if let Some(rows) = filled_row.rows.as_mut() {
        rows[1] = Some(Vec::new());
    }
    variants.push(("many_args_empty_for_null_row", filled_row));
    let mut text_null = fixture.clone();
    if let Some(strings) = text_null.strings.as_mut() {
        strings[1] = Some("null".to_string());
    }
    variants.push(("many_args_text_for_null_element", text_null));
    let mut no_text = fixture;
    no_text.text = None;
    variants.push(("many_args_null_text", no_text));

    for (name, values) in variants {
        let args = Arg::many_args(&values);
        s.push(
            TestCase::call(name, "MethodCall.manyArgs", args)
                .expect(move || or_fault(values.check().map(|()| Outcome::Unit))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_covers_every_pair() {
        let s = suite();
        let matrix = s
            .cases
            .iter()
            .filter(|c| c.name.starts_with("instance_of_"))
            .count();
        assert_eq!(matrix, subjects().len() * targets().len());
    }

    #[test]
    fn only_the_unaltered_wide_call_returns_normally() {
        let s = suite();
        let wide: Vec<_> = s
            .cases
            .iter()
            .filter(|c| c.routine() == "MethodCall.manyArgs")
            .collect();
        assert!(wide.len() > 8);
        for case in wide {
            let expected = case.expected();
            if case.name == "many_args" {
                assert_eq!(expected, Outcome::Unit);
            } else {
                assert_eq!(expected, fault(FaultKind::AssertionFailed), "{}", case.name);
            }
        }
    }

    #[test]
    fn super_func_forwards_to_the_base_version() {
        let s = suite();
        let case = s
            .cases
            .iter()
            .find(|c| c.name == "super_func_MoreClasses_false")
            .unwrap();
        assert_eq!(case.expected(), Outcome::Unit);
    }
}
