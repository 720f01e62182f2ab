//! JNI-style method descriptors: `(II)[I`, `(Ljava/lang/Object;)V`.

use std::fmt;

use aotconform_core::objects::{OBJECT, STRING, TypeDesc};

use crate::error::MarshalError;
use crate::marshal::Arg;

pub const CLASS: &str = "java/lang/Class";
/// Return type of routines that hand back a weak observation.
pub const WEAK_REFERENCE: &str = "java/lang/ref/WeakReference";
pub const STRING_ROWS: &str = "[[Ljava/lang/String;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<TypeDesc>,
    /// `None` for `V`.
    pub ret: Option<TypeDesc>,
}

impl Signature {
    pub fn parse(desc: &str) -> Result<Self, MarshalError> {
        let bad = || MarshalError::Descriptor(desc.to_string());
        let mut rest = desc.strip_prefix('(').ok_or_else(bad)?;
        let mut params = Vec::new();
        while !rest.starts_with(')') {
            let (ty, tail) = TypeDesc::parse_prefix(rest).ok_or_else(bad)?;
            params.push(ty);
            rest = tail;
        }
        let ret = match &rest[1..] {
            "V" => None,
            r => Some(TypeDesc::parse(r).ok_or_else(bad)?),
        };
        Ok(Self { params, ret })
    }

    /// Check arity and argument kinds before anything is marshaled.
    pub fn check_args(&self, args: &[Arg]) -> Result<(), MarshalError> {
        if args.len() != self.params.len() {
            return Err(MarshalError::Arity {
                expected: self.params.len(),
                found: args.len(),
            });
        }
        for (index, (param, arg)) in self.params.iter().zip(args).enumerate() {
            if !accepts(param, arg) {
                return Err(MarshalError::Kind {
                    index,
                    expected: param.descriptor(),
                    found: arg.kind(),
                });
            }
        }
        Ok(())
    }
}

fn accepts(param: &TypeDesc, arg: &Arg) -> bool {
    match (param, arg) {
        (TypeDesc::Prim(c), Arg::Scalar(s)) => *c == s.descriptor(),
        (TypeDesc::Prim(_), _) => false,
        (_, Arg::Null) => true,
        (TypeDesc::Array(_), Arg::Array(a)) => param.descriptor() == a.descriptor(),
        (TypeDesc::Array(_), Arg::Rows(_)) => param.descriptor() == STRING_ROWS,
        (TypeDesc::Array(_), Arg::New(t)) => t == param,
        (TypeDesc::Class(name), Arg::Type(_)) => name == CLASS,
        (TypeDesc::Class(name), Arg::Text(_)) => name == STRING || name == OBJECT,
        (TypeDesc::Class(name), Arg::Array(_) | Arg::Rows(_)) => name == OBJECT,
        (TypeDesc::Class(_), Arg::New(_)) => true,
        _ => false,
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for p in &self.params {
            f.write_str(&p.descriptor())?;
        }
        f.write_str(")")?;
        match &self.ret {
            Some(r) => f.write_str(&r.descriptor()),
            None => f.write_str("V"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aotconform_core::{ArrayValue, Scalar};

    #[test]
    fn parse_and_display() {
        for desc in ["(II)[I", "()V", "(Ljava/lang/Object;Ljava/lang/Class;)Z", "([[JI)J"] {
            let sig = Signature::parse(desc).unwrap();
            assert_eq!(sig.to_string(), desc);
        }
        let sig = Signature::parse("(BSCII)[I").unwrap();
        assert_eq!(sig.params.len(), 5);
        assert_eq!(sig.ret, Some(TypeDesc::Prim('I').array_of()));
    }

    #[test]
    fn malformed_descriptors() {
        for desc in ["II)I", "(I", "(Q)V", "(I)", "(Ljava/lang/Object)V"] {
            assert!(Signature::parse(desc).is_err(), "{desc}");
        }
    }

    #[test]
    fn argument_checks() {
        let sig = Signature::parse("(I[J)V").unwrap();
        assert!(sig
            .check_args(&[Arg::Scalar(Scalar::Int(1)), Arg::Array(ArrayValue::Long(vec![]))])
            .is_ok());
        assert!(sig.check_args(&[Arg::Scalar(Scalar::Int(1)), Arg::Null]).is_ok());
        assert_eq!(
            sig.check_args(&[Arg::Scalar(Scalar::Int(1))]),
            Err(MarshalError::Arity { expected: 2, found: 1 })
        );
        assert!(matches!(
            sig.check_args(&[Arg::Scalar(Scalar::Long(1)), Arg::Null]),
            Err(MarshalError::Kind { index: 0, .. })
        ));
        assert!(matches!(
            sig.check_args(&[Arg::Scalar(Scalar::Int(1)), Arg::Array(ArrayValue::Int(vec![]))]),
            Err(MarshalError::Kind { index: 1, .. })
        ));
    }
}
