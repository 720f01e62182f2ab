//! Class table: hierarchy, field layouts, method bodies.
//!
//! Assignability works on descriptor strings, the way a JNI runtime sees
//! types. Method resolution walks the superclass chain from the receiver's
//! class; super-calls start from the superclass of the calling class.

use std::collections::BTreeMap;

const OBJECT: &str = "java/lang/Object";
const OBJECT_DESC: &str = "Ljava/lang/Object;";
const ARRAY_INTERFACES: [&str; 2] = ["Ljava/io/Serializable;", "Ljava/lang/Cloneable;"];

/// Body of a method the runtime can execute on behalf of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodImpl {
    /// `return <const>;`
    ReturnInt(i32),
    /// `return super.<same method>();`
    ReturnSuper,
    /// `assert(arg0 == expected);`
    RequireArg(bool),
    /// `super.<target>(arg0);`
    ForwardSuper(&'static str),
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Declared (not inherited) fields: name and descriptor.
    pub fields: Vec<(String, String)>,
    pub methods: BTreeMap<String, MethodImpl>,
}

impl ClassInfo {
    fn new(name: &str, superclass: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            superclass: superclass.map(str::to_string),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: BTreeMap::new(),
        }
    }

    fn implements(mut self, iface: &str) -> Self {
        self.interfaces.push(iface.to_string());
        self
    }

    fn field(mut self, name: &str, desc: &str) -> Self {
        self.fields.push((name.to_string(), desc.to_string()));
        self
    }

    fn method(mut self, name: &str, body: MethodImpl) -> Self {
        self.methods.insert(name.to_string(), body);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    classes: BTreeMap<String, ClassInfo>,
}

impl ClassTable {
    /// Table holding the platform classes the fixtures depend on.
    #[must_use]
    pub fn bootstrap() -> Self {
        let mut table = Self::default();
        let root = Some(OBJECT);
        for info in [
            ClassInfo::new(OBJECT, None),
            ClassInfo::new("java/io/Serializable", None),
            ClassInfo::new("java/lang/Cloneable", None),
            ClassInfo::new("java/lang/String", root).implements("java/io/Serializable"),
            ClassInfo::new("java/lang/Throwable", root)
                .implements("java/io/Serializable"),
            ClassInfo::new("java/lang/Exception", Some("java/lang/Throwable")),
            ClassInfo::new("java/lang/RuntimeException", Some("java/lang/Exception")),
            ClassInfo::new("java/lang/Error", Some("java/lang/Throwable")),
            ClassInfo::new("java/lang/LinkageError", Some("java/lang/Error")),
            ClassInfo::new("java/lang/VirtualMachineError", Some("java/lang/Error")),
            ClassInfo::new(
                "java/lang/NullPointerException",
                Some("java/lang/RuntimeException"),
            ),
            ClassInfo::new(
                "java/lang/ArithmeticException",
                Some("java/lang/RuntimeException"),
            ),
            ClassInfo::new(
                "java/lang/IndexOutOfBoundsException",
                Some("java/lang/RuntimeException"),
            ),
            ClassInfo::new(
                "java/lang/ArrayIndexOutOfBoundsException",
                Some("java/lang/IndexOutOfBoundsException"),
            ),
            ClassInfo::new(
                "java/lang/NegativeArraySizeException",
                Some("java/lang/RuntimeException"),
            ),
            ClassInfo::new("java/lang/ClassCastException", Some("java/lang/RuntimeException")),
            ClassInfo::new("java/lang/ArrayStoreException", Some("java/lang/RuntimeException")),
            ClassInfo::new("java/lang/AssertionError", Some("java/lang/Error")),
            ClassInfo::new("java/lang/OutOfMemoryError", Some("java/lang/VirtualMachineError")),
            ClassInfo::new("java/lang/NoSuchMethodError", Some("java/lang/LinkageError")),
        ] {
            table.define(info);
        }
        table
    }

    /// Bootstrap plus the fixture classes exercised by the standard suites.
    #[must_use]
    pub fn with_fixtures() -> Self {
        let mut table = Self::bootstrap();
        let root = Some(OBJECT);
        for info in [
            ClassInfo::new("X", root),
            ClassInfo::new("Y", Some("X")),
            ClassInfo::new("Classes", root)
                .field("mSome", "I")
                .method("tag", MethodImpl::ReturnInt(1))
                .method("subFunc", MethodImpl::RequireArg(false)),
            ClassInfo::new("MoreClasses", Some("Classes"))
                .field("mMore", "I")
                .method("tag", MethodImpl::ReturnInt(2))
                .method("subFunc", MethodImpl::RequireArg(true))
                .method("superFunc", MethodImpl::ForwardSuper("subFunc")),
            ClassInfo::new("EvenMoreClasses", Some("MoreClasses"))
                .method("tag", MethodImpl::ReturnInt(3)),
            ClassInfo::new("MethodCallBase", root)
                .method("tryThing", MethodImpl::ReturnInt(7)),
            ClassInfo::new("MethodCall", Some("MethodCallBase"))
                .method("tryThing", MethodImpl::ReturnSuper),
            ClassInfo::new("Shorty", root)
                .field("mShort", "S")
                .field("mChar", "C")
                .field("mByte", "B"),
            ClassInfo::new("InstField", root)
                .field("mBoolean1", "Z")
                .field("mBoolean2", "Z")
                .field("mByte1", "B")
                .field("mByte2", "B")
                .field("mChar1", "C")
                .field("mChar2", "C")
                .field("mShort1", "S")
                .field("mShort2", "S")
                .field("mInt1", "I")
                .field("mInt2", "I")
                .field("mFloat1", "F")
                .field("mFloat2", "F")
                .field("mLong1", "J")
                .field("mLong2", "J")
                .field("mDouble1", "D")
                .field("mDouble2", "D")
                .field("mVolatileLong1", "J")
                .field("mVolatileLong2", "J")
                .field("mString1", "Ljava/lang/String;")
                .field("mString2", "Ljava/lang/String;"),
            ClassInfo::new("Throw", root),
        ] {
            table.define(info);
        }
        table
    }

    /// Add or replace a class.
    pub fn define(&mut self, info: ClassInfo) {
        self.classes.insert(info.name.clone(), info);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// All fields of `name` including inherited ones, superclass first.
    #[must_use]
    pub fn field_layout(&self, name: &str) -> Vec<(String, String)> {
        let mut chain = Vec::new();
        let mut current = self.get(name);
        while let Some(c) = current {
            chain.push(c);
            current = c.superclass.as_deref().and_then(|s| self.get(s));
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|c| c.fields.iter().cloned())
            .collect()
    }

    fn is_subclass(&self, from: &str, to: &str) -> bool {
        let mut current = self.get(from);
        while let Some(c) = current {
            if c.name == to || c.interfaces.iter().any(|i| self.is_subclass(i, to)) {
                return true;
            }
            current = c.superclass.as_deref().and_then(|s| self.get(s));
        }
        false
    }

    /// Whether a value of descriptor `from` may be stored where `to` is expected.
    #[must_use]
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let from_ref = from.starts_with('L') || from.starts_with('[');
        if to == OBJECT_DESC {
            return from_ref;
        }
        if let Some(from_elem) = from.strip_prefix('[') {
            if ARRAY_INTERFACES.contains(&to) {
                return true;
            }
            let Some(to_elem) = to.strip_prefix('[') else {
                return false;
            };
            let elem_ref = |d: &str| d.starts_with('L') || d.starts_with('[');
            return if elem_ref(from_elem) && elem_ref(to_elem) {
                self.is_assignable(from_elem, to_elem)
            } else {
                from_elem == to_elem
            };
        }
        match (class_name(from), class_name(to)) {
            (Some(f), Some(t)) => self.is_subclass(f, t),
            _ => false,
        }
    }

    /// Declaring class and body reached by a virtual call on `class`.
    #[must_use]
    pub fn resolve_virtual(&self, class: &str, method: &str) -> Option<(&str, MethodImpl)> {
        let mut current = self.get(class);
        while let Some(c) = current {
            if let Some(body) = c.methods.get(method) {
                return Some((c.name.as_str(), *body));
            }
            current = c.superclass.as_deref().and_then(|s| self.get(s));
        }
        None
    }

    /// Declaring class and body reached by `super.method()` written in `caller`.
    #[must_use]
    pub fn resolve_super(&self, caller: &str, method: &str) -> Option<(&str, MethodImpl)> {
        let parent = self.get(caller)?.superclass.as_deref()?;
        self.resolve_virtual(parent, method)
    }
}

fn class_name(desc: &str) -> Option<&str> {
    desc.strip_prefix('L')?.strip_suffix(';')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_assignability() {
        let t = ClassTable::with_fixtures();
        assert!(t.is_assignable("[I", OBJECT_DESC));
        assert!(t.is_assignable("[I", "Ljava/lang/Cloneable;"));
        assert!(!t.is_assignable("[I", "[Ljava/lang/Object;"));
        assert!(t.is_assignable("[[I", "[Ljava/lang/Object;"));
        assert!(t.is_assignable("[[[LY;", "[[[LX;"));
        assert!(t.is_assignable("[[[LY;", "[[Ljava/io/Serializable;"));
        assert!(!t.is_assignable("[LX;", "[LY;"));
        assert!(!t.is_assignable("[I", "[J"));
    }

    #[test]
    fn class_assignability() {
        let t = ClassTable::with_fixtures();
        assert!(t.is_assignable("LY;", "LX;"));
        assert!(!t.is_assignable("LX;", "LY;"));
        assert!(t.is_assignable(
            "Ljava/lang/ArrayIndexOutOfBoundsException;",
            "Ljava/lang/RuntimeException;"
        ));
        assert!(!t.is_assignable(
            "Ljava/lang/AssertionError;",
            "Ljava/lang/Exception;"
        ));
        assert!(t.is_assignable("Ljava/lang/String;", "Ljava/io/Serializable;"));
        assert!(!t.is_assignable("LX;", "[LX;"));
    }

    #[test]
    fn method_resolution() {
        let t = ClassTable::with_fixtures();
        assert_eq!(
            t.resolve_virtual("EvenMoreClasses", "tag"),
            Some(("EvenMoreClasses", MethodImpl::ReturnInt(3)))
        );
        assert_eq!(
            t.resolve_super("EvenMoreClasses", "tag"),
            Some(("MoreClasses", MethodImpl::ReturnInt(2)))
        );
        assert_eq!(
            t.resolve_virtual("EvenMoreClasses", "superFunc"),
            Some(("MoreClasses", MethodImpl::ForwardSuper("subFunc")))
        );
        assert_eq!(t.resolve_super("Classes", "tag"), None);
    }

    #[test]
    fn inherited_field_layout() {
        let t = ClassTable::with_fixtures();
        let layout = t.field_layout("MoreClasses");
        assert_eq!(layout[0].0, "mSome");
        assert_eq!(layout[1].0, "mMore");
        assert_eq!(t.field_layout("InstField").len(), 20);
    }
}
