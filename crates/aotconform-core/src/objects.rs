//! Object-model oracle: type descriptors, assignability, and method
//! resolution over the fixture class hierarchy.
//!
//! The hierarchy here is declared independently of any runtime class table
//! so that a broken table cannot agree with itself.

use std::fmt;

use crate::fault::FaultKind;

pub const OBJECT: &str = "java/lang/Object";
pub const SERIALIZABLE: &str = "java/io/Serializable";
pub const CLONEABLE: &str = "java/lang/Cloneable";
pub const STRING: &str = "java/lang/String";

/// A managed-language type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// Primitive type, by descriptor character (`I`, `J`, ...).
    Prim(char),
    /// Class or interface, by internal name (`java/lang/Object`).
    Class(String),
    Array(Box<TypeDesc>),
}

impl TypeDesc {
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::Class(name.to_string())
    }

    #[must_use]
    pub fn object() -> Self {
        Self::class(OBJECT)
    }

    #[must_use]
    pub fn array_of(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Wrap in `dims` levels of array.
    #[must_use]
    pub fn array_dims(self, dims: usize) -> Self {
        (0..dims).fold(self, |t, _| t.array_of())
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        !matches!(self, Self::Prim(_))
    }

    /// JNI descriptor (`I`, `Ljava/lang/Object;`, `[[LX;`).
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            Self::Prim(c) => c.to_string(),
            Self::Class(name) => format!("L{name};"),
            Self::Array(elem) => format!("[{}", elem.descriptor()),
        }
    }

    /// Parse a single field descriptor.
    #[must_use]
    pub fn parse(desc: &str) -> Option<Self> {
        let (ty, rest) = Self::parse_prefix(desc)?;
        rest.is_empty().then_some(ty)
    }

    /// Parse one descriptor from the front of `desc`, returning the rest.
    #[must_use]
    pub fn parse_prefix(desc: &str) -> Option<(Self, &str)> {
        let first = desc.chars().next()?;
        match first {
            'Z' | 'B' | 'C' | 'S' | 'I' | 'J' | 'F' | 'D' => Some((Self::Prim(first), &desc[1..])),
            'L' => {
                let end = desc.find(';')?;
                let name = &desc[1..end];
                if name.is_empty() {
                    return None;
                }
                Some((Self::class(name), &desc[end + 1..]))
            }
            '[' => {
                let (elem, rest) = Self::parse_prefix(&desc[1..])?;
                Some((elem.array_of(), rest))
            }
            _ => None,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prim(c) => f.write_str(match c {
                'Z' => "boolean",
                'B' => "byte",
                'C' => "char",
                'S' => "short",
                'I' => "int",
                'J' => "long",
                'F' => "float",
                'D' => "double",
                _ => "?",
            }),
            Self::Class(name) => f.write_str(name.rsplit('/').next().unwrap_or(name)),
            Self::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

/// Declared body of a fixture method, as far as the oracle needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodBody {
    /// Returns a constant.
    Const(i32),
    /// Returns whatever the immediately-overridden version returns.
    Super,
    /// `void m(boolean b)` that asserts `b` equals the given flag.
    Expects(bool),
    /// `void m(boolean b)` that forwards `b` to `super.<target>(b)`.
    SuperCall(&'static str),
}

struct ClassDecl {
    name: &'static str,
    superclass: Option<&'static str>,
    interfaces: &'static [&'static str],
    methods: &'static [(&'static str, MethodBody)],
}

const CLASSES: &[ClassDecl] = &[
    ClassDecl { name: OBJECT, superclass: None, interfaces: &[], methods: &[] },
    ClassDecl { name: SERIALIZABLE, superclass: None, interfaces: &[], methods: &[] },
    ClassDecl { name: CLONEABLE, superclass: None, interfaces: &[], methods: &[] },
    ClassDecl { name: STRING, superclass: Some(OBJECT), interfaces: &[SERIALIZABLE], methods: &[] },
    ClassDecl { name: "X", superclass: Some(OBJECT), interfaces: &[], methods: &[] },
    ClassDecl { name: "Y", superclass: Some("X"), interfaces: &[], methods: &[] },
    ClassDecl {
        name: "Classes",
        superclass: Some(OBJECT),
        interfaces: &[],
        methods: &[("tag", MethodBody::Const(1)), ("subFunc", MethodBody::Expects(false))],
    },
    ClassDecl {
        name: "MoreClasses",
        superclass: Some("Classes"),
        interfaces: &[],
        methods: &[
            ("tag", MethodBody::Const(2)),
            ("subFunc", MethodBody::Expects(true)),
            ("superFunc", MethodBody::SuperCall("subFunc")),
        ],
    },
    ClassDecl {
        name: "EvenMoreClasses",
        superclass: Some("MoreClasses"),
        interfaces: &[],
        methods: &[("tag", MethodBody::Const(3))],
    },
    ClassDecl {
        name: "MethodCallBase",
        superclass: Some(OBJECT),
        interfaces: &[],
        methods: &[("tryThing", MethodBody::Const(7))],
    },
    ClassDecl {
        name: "MethodCall",
        superclass: Some("MethodCallBase"),
        interfaces: &[],
        methods: &[("tryThing", MethodBody::Super)],
    },
];

fn decl(name: &str) -> Option<&'static ClassDecl> {
    CLASSES.iter().find(|c| c.name == name)
}

fn class_implements(name: &str, target: &str) -> bool {
    let mut current = decl(name);
    while let Some(c) = current {
        if c.name == target || c.interfaces.iter().any(|i| class_implements(i, target)) {
            return true;
        }
        current = c.superclass.and_then(decl);
    }
    // Undeclared classes still derive from Object.
    target == OBJECT && name != SERIALIZABLE && name != CLONEABLE
}

/// `subject instanceof target`. A null subject is never an instance.
#[must_use]
pub fn is_instance_of(subject: Option<&TypeDesc>, target: &TypeDesc) -> bool {
    let Some(subject) = subject else {
        return false;
    };
    match (subject, target) {
        (TypeDesc::Prim(a), TypeDesc::Prim(b)) => a == b,
        (TypeDesc::Prim(_), _) | (_, TypeDesc::Prim(_)) => false,
        (TypeDesc::Class(s), TypeDesc::Class(t)) => class_implements(s, t),
        (TypeDesc::Class(_), TypeDesc::Array(_)) => false,
        (TypeDesc::Array(_), TypeDesc::Class(t)) => {
            t == OBJECT || t == SERIALIZABLE || t == CLONEABLE
        }
        (TypeDesc::Array(se), TypeDesc::Array(te)) => {
            if se.is_reference() && te.is_reference() {
                is_instance_of(Some(se), te)
            } else {
                se == te
            }
        }
    }
}

/// Checked cast: null always succeeds.
pub fn check_cast(subject: Option<&TypeDesc>, target: &TypeDesc) -> Result<(), FaultKind> {
    match subject {
        None => Ok(()),
        Some(_) if is_instance_of(subject, target) => Ok(()),
        Some(_) => Err(FaultKind::ClassCast),
    }
}

/// Store into an array whose runtime element type is `element`.
pub fn store_check(element: &TypeDesc, value: Option<&TypeDesc>) -> Result<(), FaultKind> {
    match value {
        None => Ok(()),
        Some(_) if is_instance_of(value, element) => Ok(()),
        Some(_) => Err(FaultKind::ArrayStore),
    }
}

/// The class whose declaration of `method` a virtual call on an instance
/// of `class` reaches.
#[must_use]
pub fn resolve_virtual(class: &str, method: &str) -> Option<&'static str> {
    let mut current = decl(class);
    while let Some(c) = current {
        if c.methods.iter().any(|(m, _)| *m == method) {
            return Some(c.name);
        }
        current = c.superclass.and_then(decl);
    }
    None
}

/// The declaration a super-call from `declaring` reaches: resolution starts
/// at the direct superclass of the declaring class, never at the root.
#[must_use]
pub fn resolve_super(declaring: &str, method: &str) -> Option<&'static str> {
    decl(declaring)
        .and_then(|c| c.superclass)
        .and_then(|s| resolve_virtual(s, method))
}

/// Value returned by a virtual int-method call on an instance of `class`.
pub fn virtual_int(class: &str, method: &str) -> Result<i32, FaultKind> {
    let target = resolve_virtual(class, method).ok_or(FaultKind::NoSuchMethod)?;
    evaluate(target, method)
}

/// Value returned by a super-call written in `declaring`.
pub fn super_int(declaring: &str, method: &str) -> Result<i32, FaultKind> {
    let target = resolve_super(declaring, method).ok_or(FaultKind::NoSuchMethod)?;
    evaluate(target, method)
}

fn body_of(class: &str, method: &str) -> Result<MethodBody, FaultKind> {
    decl(class)
        .and_then(|c| c.methods.iter().find(|(m, _)| *m == method))
        .map(|(_, b)| *b)
        .ok_or(FaultKind::NoSuchMethod)
}

fn evaluate(class: &'static str, method: &str) -> Result<i32, FaultKind> {
    match body_of(class, method)? {
        MethodBody::Const(v) => Ok(v),
        MethodBody::Super => super_int(class, method),
        MethodBody::Expects(_) | MethodBody::SuperCall(_) => Err(FaultKind::NoSuchMethod),
    }
}

/// Outcome of the virtual call `recv.method(flag)` on an instance of `class`.
pub fn virtual_flag_call(class: &str, method: &str, flag: bool) -> Result<(), FaultKind> {
    let target = resolve_virtual(class, method).ok_or(FaultKind::NoSuchMethod)?;
    run_flag(target, method, flag)
}

/// Outcome of `super.method(flag)` written in `declaring`.
pub fn super_flag_call(declaring: &str, method: &str, flag: bool) -> Result<(), FaultKind> {
    let target = resolve_super(declaring, method).ok_or(FaultKind::NoSuchMethod)?;
    run_flag(target, method, flag)
}

fn run_flag(class: &'static str, method: &str, flag: bool) -> Result<(), FaultKind> {
    match body_of(class, method)? {
        MethodBody::Expects(want) if want == flag => Ok(()),
        MethodBody::Expects(_) => Err(FaultKind::AssertionFailed),
        MethodBody::SuperCall(target) => super_flag_call(class, target, flag),
        MethodBody::Const(_) | MethodBody::Super => Err(FaultKind::NoSuchMethod),
    }
}
