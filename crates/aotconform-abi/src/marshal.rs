//! Argument and return-value marshaling.
//!
//! Harness-side values ([`Arg`], [`Outcome`]) are plain data. Inside an
//! invocation they become runtime objects reached through local handles
//! ([`Slot`], [`Returned`]). Scalars cross unchanged, so every bit pattern
//! (NaN payloads, signed zero, sign bits of narrow types) is preserved.

use std::fmt;

use aotconform_core::calls::ManyArgs;
use aotconform_core::objects::{STRING, TypeDesc};
use aotconform_core::{ArrayValue, Outcome, Scalar, WeakToken};
use aotconform_runtime::{Env, LocalRef};

use crate::error::{MarshalError, Trap};
use crate::signature::{STRING_ROWS, Signature, WEAK_REFERENCE};

/// An argument as the harness supplies it.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Scalar(Scalar),
    /// Copied onto the heap before the call.
    Array(ArrayValue),
    /// `String[][]`; `None` rows are null references.
    Rows(Vec<Option<Vec<Option<String>>>>),
    Text(String),
    /// A fresh instance of the class, or a fresh one-element array.
    New(TypeDesc),
    /// A class literal.
    Type(TypeDesc),
    Null,
}

impl Arg {
    /// Short kind name for marshal diagnostics.
    #[must_use]
    pub fn kind(&self) -> String {
        match self {
            Self::Scalar(s) => s.descriptor().to_string(),
            Self::Array(a) => a.descriptor().to_string(),
            Self::Rows(_) => STRING_ROWS.to_string(),
            Self::Text(_) => "string".to_string(),
            Self::New(t) => format!("new {}", t.descriptor()),
            Self::Type(_) => "class literal".to_string(),
            Self::Null => "null".to_string(),
        }
    }

    /// The thirty arguments of a `MethodCall.manyArgs` call.
    #[must_use]
    pub fn many_args(values: &ManyArgs) -> Vec<Self> {
        let mut args: Vec<Self> = values.scalars.iter().copied().map(Self::Scalar).collect();
        args.push(values.rows.clone().map_or(Self::Null, Self::Rows));
        args.push(
            values
                .strings
                .clone()
                .map_or(Self::Null, |s| Self::Array(ArrayValue::Str(s))),
        );
        args.push(values.text.clone().map_or(Self::Null, Self::Text));
        args
    }
}

impl From<Scalar> for Arg {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<ArrayValue> for Arg {
    fn from(a: ArrayValue) -> Self {
        Self::Array(a)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Array(a) => write!(f, "{a}"),
            Self::Rows(rows) => {
                f.write_str("[[String{")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match row {
                        Some(items) => write!(f, "{}", ArrayValue::Str(items.clone()))?,
                        None => f.write_str("null")?,
                    }
                }
                f.write_str("}")
            }
            Self::Text(t) => write!(f, "{t:?}"),
            Self::New(t) => write!(f, "new {t}"),
            Self::Type(t) => write!(f, "{t}.class"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// A marshaled argument as a routine sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Scalar(Scalar),
    Ref(Option<LocalRef>),
    Class(TypeDesc),
}

/// What a routine hands back before unmarshaling.
#[derive(Debug, Clone, PartialEq)]
pub enum Returned {
    Void,
    Scalar(Scalar),
    Object(Option<LocalRef>),
    Weak(WeakToken),
}

impl From<Scalar> for Returned {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<LocalRef> for Returned {
    fn from(l: LocalRef) -> Self {
        Self::Object(Some(l))
    }
}

pub(crate) fn marshal_arg(env: &mut Env<'_>, arg: &Arg) -> Result<Slot, Trap> {
    Ok(match arg {
        Arg::Scalar(s) => Slot::Scalar(*s),
        Arg::Array(a) => Slot::Ref(Some(env.array_from(a)?)),
        Arg::Rows(rows) => Slot::Ref(Some(marshal_rows(env, rows)?)),
        Arg::Text(t) => Slot::Ref(Some(env.new_string(t)?)),
        Arg::New(TypeDesc::Class(name)) => Slot::Ref(Some(env.new_instance(name)?)),
        Arg::New(TypeDesc::Array(elem)) => {
            let local = match elem.as_ref() {
                TypeDesc::Prim(c) => env.new_prim_array(*c, 1)?,
                other => env.new_object_array(other.clone(), 1)?,
            };
            Slot::Ref(Some(local))
        }
        Arg::New(prim @ TypeDesc::Prim(_)) => {
            return Err(MarshalError::Kind {
                index: 0,
                expected: "reference type".to_string(),
                found: prim.descriptor(),
            }
            .into());
        }
        Arg::Type(t) => Slot::Class(t.clone()),
        Arg::Null => Slot::Ref(None),
    })
}

/// Build the outer array first, then each row; a row's local is released
/// once the outer array holds it.
fn marshal_rows(
    env: &mut Env<'_>,
    rows: &[Option<Vec<Option<String>>>],
) -> Result<LocalRef, Trap> {
    let outer = env.new_object_array(TypeDesc::class(STRING).array_of(), rows.len() as i32)?;
    for (i, row) in rows.iter().enumerate() {
        let Some(items) = row else { continue };
        let inner = env.array_from(&ArrayValue::Str(items.clone()))?;
        env.set_object_element(Some(outer), i as i32, Some(inner))?;
        env.delete_local(inner)?;
    }
    Ok(outer)
}

fn return_mismatch(expected: &str, found: &Returned) -> Trap {
    let found = match found {
        Returned::Void => "V".to_string(),
        Returned::Scalar(s) => s.descriptor().to_string(),
        Returned::Object(_) => "object".to_string(),
        Returned::Weak(_) => "weak".to_string(),
    };
    MarshalError::Return {
        expected: expected.to_string(),
        found,
    }
    .into()
}

pub(crate) fn unmarshal_return(
    env: &mut Env<'_>,
    sig: &Signature,
    returned: Returned,
) -> Result<Outcome, Trap> {
    let Some(ret) = &sig.ret else {
        return match returned {
            Returned::Void => Ok(Outcome::Unit),
            other => Err(return_mismatch("V", &other)),
        };
    };
    let expected = ret.descriptor();
    match (ret, returned) {
        (TypeDesc::Prim(c), Returned::Scalar(s)) if *c == s.descriptor() => Ok(Outcome::Scalar(s)),
        (TypeDesc::Class(name), Returned::Weak(token)) if name == WEAK_REFERENCE => {
            Ok(Outcome::Weak(token))
        }
        (TypeDesc::Class(name), Returned::Object(Some(l))) if name == STRING => {
            Ok(Outcome::Text(env.string_value(Some(l))?))
        }
        (TypeDesc::Array(_), Returned::Object(Some(l))) => Ok(Outcome::Array(env.array_value(Some(l))?)),
        (_, Returned::Object(None)) => Err(MarshalError::NullReturn(expected).into()),
        (_, other) => Err(return_mismatch(&expected, &other)),
    }
}
