//! Call environment handed to native routines.
//!
//! An [`Env`] is one invocation frame. Creating it pushes a local-handle
//! frame and dropping it pops that frame, so every local a routine created
//! is released on every exit path, including `?` propagation of a fault.
//!
//! Reference parameters are `Option<LocalRef>`; `None` is the null
//! reference. Operations that dereference null throw a null-pointer fault
//! instead of returning an error.

use std::collections::BTreeMap;

use aotconform_core::objects::{STRING, TypeDesc};
use aotconform_core::{ArrayValue, FaultKind, FaultToken, RaisedFault, Scalar, WeakToken};

use crate::Runtime;
use crate::classes::MethodImpl;
use crate::error::{EnvResult, RuntimeError, Thrown, Unwind};
use crate::heap::{FieldValue, ObjectBody, ObjectId};
use crate::locals::LocalRef;

pub struct Env<'rt> {
    rt: &'rt mut Runtime,
}

impl Drop for Env<'_> {
    fn drop(&mut self) {
        self.rt.locals.pop_frame();
        if self.rt.locals.depth() == 0 {
            self.rt.end_invocation();
        }
    }
}

fn default_scalar(desc: char) -> Option<Scalar> {
    Some(match desc {
        'Z' => Scalar::Bool(false),
        'B' => Scalar::Byte(0),
        'C' => Scalar::Char(0),
        'S' => Scalar::Short(0),
        'I' => Scalar::Int(0),
        'J' => Scalar::Long(0),
        'F' => Scalar::Float(0.0),
        'D' => Scalar::Double(0.0),
        _ => return None,
    })
}

fn zeroed_array(desc: char, len: usize) -> Option<ArrayValue> {
    Some(match desc {
        'Z' => ArrayValue::Bool(vec![false; len]),
        'B' => ArrayValue::Byte(vec![0; len]),
        'C' => ArrayValue::Char(vec![0; len]),
        'S' => ArrayValue::Short(vec![0; len]),
        'I' => ArrayValue::Int(vec![0; len]),
        'J' => ArrayValue::Long(vec![0; len]),
        'F' => ArrayValue::Float(vec![0.0; len]),
        'D' => ArrayValue::Double(vec![0.0; len]),
        _ => return None,
    })
}

fn put_scalar(array: &mut ArrayValue, idx: usize, value: Scalar) -> Result<(), RuntimeError> {
    match (array, value) {
        (ArrayValue::Bool(v), Scalar::Bool(x)) => v[idx] = x,
        (ArrayValue::Byte(v), Scalar::Byte(x)) => v[idx] = x,
        (ArrayValue::Char(v), Scalar::Char(x)) => v[idx] = x,
        (ArrayValue::Short(v), Scalar::Short(x)) => v[idx] = x,
        (ArrayValue::Int(v), Scalar::Int(x)) => v[idx] = x,
        (ArrayValue::Long(v), Scalar::Long(x)) => v[idx] = x,
        (ArrayValue::Float(v), Scalar::Float(x)) => v[idx] = x,
        (ArrayValue::Double(v), Scalar::Double(x)) => v[idx] = x,
        (array, value) => {
            return Err(RuntimeError::ElementType {
                expected: array.descriptor().to_string(),
                found: value.descriptor().to_string(),
            });
        }
    }
    Ok(())
}

impl<'rt> Env<'rt> {
    pub(crate) fn enter(rt: &'rt mut Runtime) -> Self {
        if rt.locals.depth() == 0 {
            rt.begin_invocation();
        }
        rt.locals.push_frame();
        Self { rt }
    }

    // ---- handles -------------------------------------------------------

    fn local(&mut self, id: ObjectId) -> EnvResult<LocalRef> {
        match self.rt.locals.new_local(id) {
            Ok(local) => Ok(local),
            Err(overflow) => Err(self
                .throw_new(
                    FaultKind::HandleOverflow,
                    &format!("local reference table overflow (max={})", overflow.capacity),
                )
                .into()),
        }
    }

    /// Object behind a live local.
    pub fn resolve(&self, local: LocalRef) -> EnvResult<ObjectId> {
        Ok(self.rt.locals.get(local)?)
    }

    fn deref(&mut self, local: Option<LocalRef>, what: &str) -> EnvResult<ObjectId> {
        match local {
            Some(l) => self.resolve(l),
            None => Err(self
                .throw_new(FaultKind::NullPointer, &format!("{what} on null reference"))
                .into()),
        }
    }

    /// Release a local before the frame ends.
    pub fn delete_local(&mut self, local: LocalRef) -> EnvResult<()> {
        Ok(self.rt.locals.delete(local)?)
    }

    /// Live locals in the whole table.
    #[must_use]
    pub fn local_occupancy(&self) -> usize {
        self.rt.locals.occupancy()
    }

    // ---- faults --------------------------------------------------------

    /// Allocate a throwable of `kind` and give it a fresh identity token.
    pub fn throw_new(&mut self, kind: FaultKind, message: &str) -> Thrown {
        let token = FaultToken(self.rt.next_token);
        self.rt.next_token += 1;
        self.rt.faults.push(RaisedFault { token, kind });
        let object = self.rt.heap.alloc(ObjectBody::Throwable {
            kind,
            message: message.to_string(),
            token,
        });
        Thrown {
            object,
            kind,
            token,
            message: message.to_string(),
        }
    }

    /// Whether a `catch (class e)` clause catches `thrown`.
    #[must_use]
    pub fn thrown_is(&self, thrown: &Thrown, class: &str) -> bool {
        self.rt.classes.is_assignable(
            &TypeDesc::class(thrown.kind.class_name()).descriptor(),
            &TypeDesc::class(class).descriptor(),
        )
    }

    /// Split an unwind into a catchable fault of `class` or a propagating one.
    pub fn catch(&self, unwind: Unwind, class: &str) -> EnvResult<Thrown> {
        match unwind {
            Unwind::Throw(t) if self.thrown_is(&t, class) => Ok(t),
            other => Err(other),
        }
    }

    // ---- strings -------------------------------------------------------

    pub fn new_string(&mut self, text: &str) -> EnvResult<LocalRef> {
        let id = self.rt.heap.alloc(ObjectBody::Str(text.to_string()));
        self.local(id)
    }

    /// A constant-pool string: pinned and interned on first use.
    pub fn literal(&mut self, text: &str) -> EnvResult<LocalRef> {
        let id = match self.rt.constants.get(text) {
            Some(&id) => id,
            None => {
                let id = self.rt.heap.alloc(ObjectBody::Str(text.to_string()));
                self.rt.heap.pin(id)?;
                let canonical = self.rt.interned.intern(&mut self.rt.heap, id)?;
                self.rt.constants.insert(text.to_string(), canonical);
                canonical
            }
        };
        self.local(id)
    }

    pub fn string_value(&mut self, local: Option<LocalRef>) -> EnvResult<String> {
        let id = self.deref(local, "String access")?;
        match self.rt.heap.get(id)? {
            ObjectBody::Str(s) => Ok(s.clone()),
            other => Err(RuntimeError::UnexpectedObject {
                expected: "string",
                found: other.describe(),
            }
            .into()),
        }
    }

    pub fn string_length(&mut self, local: Option<LocalRef>) -> EnvResult<i32> {
        let text = self.string_value(local)?;
        Ok(text.encode_utf16().count() as i32)
    }

    /// `a + b` as a freshly allocated string.
    pub fn concat(&mut self, a: Option<LocalRef>, b: Option<LocalRef>) -> EnvResult<LocalRef> {
        let left = match a {
            Some(_) => self.string_value(a)?,
            None => "null".to_string(),
        };
        let right = match b {
            Some(_) => self.string_value(b)?,
            None => "null".to_string(),
        };
        self.new_string(&format!("{left}{right}"))
    }

    /// `s.intern()`.
    pub fn intern(&mut self, local: Option<LocalRef>) -> EnvResult<LocalRef> {
        let id = self.deref(local, "String.intern")?;
        let canonical = self.rt.interned.intern(&mut self.rt.heap, id)?;
        self.local(canonical)
    }

    pub fn is_same_object(&self, a: Option<LocalRef>, b: Option<LocalRef>) -> EnvResult<bool> {
        let a = a.map(|l| self.resolve(l)).transpose()?;
        let b = b.map(|l| self.resolve(l)).transpose()?;
        Ok(a == b)
    }

    /// Weak observation of the object behind `local`.
    pub fn new_weak(&mut self, local: LocalRef) -> EnvResult<WeakToken> {
        let id = self.resolve(local)?;
        Ok(self.rt.heap.new_weak(id)?)
    }

    // ---- arrays --------------------------------------------------------

    fn check_count(&mut self, count: i32) -> EnvResult<usize> {
        usize::try_from(count).map_err(|_| {
            self.throw_new(FaultKind::NegativeArraySize, &count.to_string())
                .into()
        })
    }

    fn check_index(&mut self, len: usize, idx: i32) -> EnvResult<usize> {
        match usize::try_from(idx) {
            Ok(i) if i < len => Ok(i),
            _ => Err(self
                .throw_new(
                    FaultKind::IndexOutOfBounds,
                    &format!("length={len}; index={idx}"),
                )
                .into()),
        }
    }

    /// `new T[count]` for a primitive `T`.
    pub fn new_prim_array(&mut self, elem: char, count: i32) -> EnvResult<LocalRef> {
        let len = self.check_count(count)?;
        let value = zeroed_array(elem, len).ok_or_else(|| RuntimeError::ElementType {
            expected: "primitive".to_string(),
            found: elem.to_string(),
        })?;
        let id = self.rt.heap.alloc(ObjectBody::PrimArray(value));
        self.local(id)
    }

    /// Copy a marshaled array onto the heap. String arrays become reference
    /// arrays of fresh string objects.
    pub fn array_from(&mut self, value: &ArrayValue) -> EnvResult<LocalRef> {
        let id = match value {
            ArrayValue::Str(items) => {
                let items = items
                    .iter()
                    .map(|s| {
                        s.as_ref()
                            .map(|s| self.rt.heap.alloc(ObjectBody::Str(s.clone())))
                    })
                    .collect();
                self.rt.heap.alloc(ObjectBody::RefArray {
                    element: TypeDesc::class(STRING),
                    items,
                })
            }
            prim => self.rt.heap.alloc(ObjectBody::PrimArray(prim.clone())),
        };
        self.local(id)
    }

    /// `new T[count]` for a reference type `T`, all elements null.
    pub fn new_object_array(&mut self, element: TypeDesc, count: i32) -> EnvResult<LocalRef> {
        let len = self.check_count(count)?;
        let id = self.rt.heap.alloc(ObjectBody::RefArray {
            element,
            items: vec![None; len],
        });
        self.local(id)
    }

    fn build_array(&mut self, element: &TypeDesc, dims: &[usize]) -> EnvResult<ObjectId> {
        let Some((&len, rest)) = dims.split_first() else {
            return Err(RuntimeError::ElementType {
                expected: "array dimension".to_string(),
                found: element.descriptor(),
            }
            .into());
        };
        if rest.is_empty() {
            if let TypeDesc::Prim(c) = element
                && let Some(value) = zeroed_array(*c, len)
            {
                return Ok(self.rt.heap.alloc(ObjectBody::PrimArray(value)));
            }
            return Ok(self.rt.heap.alloc(ObjectBody::RefArray {
                element: element.clone(),
                items: vec![None; len],
            }));
        }
        let TypeDesc::Array(inner) = element else {
            return Err(RuntimeError::ElementType {
                expected: "array".to_string(),
                found: element.descriptor(),
            }
            .into());
        };
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(Some(self.build_array(inner, rest)?));
        }
        Ok(self.rt.heap.alloc(ObjectBody::RefArray {
            element: element.clone(),
            items,
        }))
    }

    /// `new leaf[d0][d1]...`. Every dimension is checked before anything
    /// is allocated.
    pub fn new_multi_array(&mut self, leaf: TypeDesc, dims: &[i32]) -> EnvResult<LocalRef> {
        let mut lens = Vec::with_capacity(dims.len());
        for &d in dims {
            lens.push(self.check_count(d)?);
        }
        let element = leaf.array_dims(lens.len().saturating_sub(1));
        let id = self.build_array(&element, &lens)?;
        self.local(id)
    }

    pub fn array_length(&mut self, array: Option<LocalRef>) -> EnvResult<i32> {
        let id = self.deref(array, "array length")?;
        match self.rt.heap.get(id)? {
            ObjectBody::PrimArray(v) => Ok(v.len() as i32),
            ObjectBody::RefArray { items, .. } => Ok(items.len() as i32),
            other => Err(RuntimeError::UnexpectedObject {
                expected: "array",
                found: other.describe(),
            }
            .into()),
        }
    }

    fn prim_len(&mut self, id: ObjectId) -> EnvResult<usize> {
        match self.rt.heap.get(id)? {
            ObjectBody::PrimArray(v) => Ok(v.len()),
            other => Err(RuntimeError::UnexpectedObject {
                expected: "primitive array",
                found: other.describe(),
            }
            .into()),
        }
    }

    fn ref_len(&mut self, id: ObjectId) -> EnvResult<usize> {
        match self.rt.heap.get(id)? {
            ObjectBody::RefArray { items, .. } => Ok(items.len()),
            other => Err(RuntimeError::UnexpectedObject {
                expected: "reference array",
                found: other.describe(),
            }
            .into()),
        }
    }

    /// `array[idx]` on a primitive array.
    pub fn get_element(&mut self, array: Option<LocalRef>, idx: i32) -> EnvResult<Scalar> {
        let id = self.deref(array, "array load")?;
        let len = self.prim_len(id)?;
        let i = self.check_index(len, idx)?;
        match self.rt.heap.get(id)? {
            ObjectBody::PrimArray(v) => v.scalar_at(i).ok_or_else(|| {
                RuntimeError::UnexpectedObject {
                    expected: "primitive array",
                    found: v.descriptor().to_string(),
                }
                .into()
            }),
            other => Err(RuntimeError::UnexpectedObject {
                expected: "primitive array",
                found: other.describe(),
            }
            .into()),
        }
    }

    /// `array[idx] = value` on a primitive array.
    pub fn set_element(&mut self, array: Option<LocalRef>, idx: i32, value: Scalar) -> EnvResult<()> {
        let id = self.deref(array, "array store")?;
        let len = self.prim_len(id)?;
        let i = self.check_index(len, idx)?;
        if let ObjectBody::PrimArray(v) = self.rt.heap.get_mut(id)? {
            put_scalar(v, i, value)?;
        }
        Ok(())
    }

    /// `array[idx]` on a reference array.
    pub fn get_object_element(
        &mut self,
        array: Option<LocalRef>,
        idx: i32,
    ) -> EnvResult<Option<LocalRef>> {
        let id = self.deref(array, "array load")?;
        let len = self.ref_len(id)?;
        let i = self.check_index(len, idx)?;
        let item = match self.rt.heap.get(id)? {
            ObjectBody::RefArray { items, .. } => items[i],
            _ => None,
        };
        item.map(|obj| self.local(obj)).transpose()
    }

    /// `array[idx] = value` on a reference array, with the covariant store check.
    pub fn set_object_element(
        &mut self,
        array: Option<LocalRef>,
        idx: i32,
        value: Option<LocalRef>,
    ) -> EnvResult<()> {
        let id = self.deref(array, "array store")?;
        let len = self.ref_len(id)?;
        let i = self.check_index(len, idx)?;
        let value_id = value.map(|l| self.resolve(l)).transpose()?;
        if let Some(v) = value_id {
            let element = match self.rt.heap.get(id)? {
                ObjectBody::RefArray { element, .. } => element.descriptor(),
                _ => String::new(),
            };
            let actual = self.rt.heap.get(v)?.describe();
            if !self.rt.classes.is_assignable(&actual, &element) {
                return Err(self
                    .throw_new(FaultKind::ArrayStore, &format!("{actual} into {element}[]"))
                    .into());
            }
        }
        if let ObjectBody::RefArray { items, .. } = self.rt.heap.get_mut(id)? {
            items[i] = value_id;
        }
        Ok(())
    }

    /// Copy an array back out for marshaling. String reference arrays
    /// become [`ArrayValue::Str`].
    pub fn array_value(&mut self, array: Option<LocalRef>) -> EnvResult<ArrayValue> {
        let id = self.deref(array, "array read")?;
        match self.rt.heap.get(id)? {
            ObjectBody::PrimArray(v) => Ok(v.clone()),
            ObjectBody::RefArray { items, .. } => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(match item {
                        None => None,
                        Some(obj) => match self.rt.heap.get(*obj)? {
                            ObjectBody::Str(s) => Some(s.clone()),
                            other => {
                                return Err(RuntimeError::UnexpectedObject {
                                    expected: "string element",
                                    found: other.describe(),
                                }
                                .into());
                            }
                        },
                    });
                }
                Ok(ArrayValue::Str(out))
            }
            other => Err(RuntimeError::UnexpectedObject {
                expected: "array",
                found: other.describe(),
            }
            .into()),
        }
    }

    // ---- instances -----------------------------------------------------

    /// `new C()` with every field at its default value.
    pub fn new_instance(&mut self, class: &str) -> EnvResult<LocalRef> {
        if !self.rt.classes.contains(class) {
            return Err(RuntimeError::UnknownClass(class.to_string()).into());
        }
        let mut fields = BTreeMap::new();
        for (name, desc) in self.rt.classes.field_layout(class) {
            let value = desc
                .chars()
                .next()
                .and_then(default_scalar)
                .map_or(FieldValue::Ref(None), FieldValue::Scalar);
            fields.insert(name, value);
        }
        let id = self.rt.heap.alloc(ObjectBody::Instance {
            class: class.to_string(),
            fields,
        });
        self.local(id)
    }

    fn field_slot(&mut self, obj: Option<LocalRef>, field: &str) -> EnvResult<(ObjectId, FieldValue)> {
        let id = self.deref(obj, &format!("field access {field}"))?;
        match self.rt.heap.get(id)? {
            ObjectBody::Instance { class, fields } => match fields.get(field) {
                Some(v) => Ok((id, *v)),
                None => Err(RuntimeError::UnknownField {
                    class: class.clone(),
                    field: field.to_string(),
                }
                .into()),
            },
            other => Err(RuntimeError::UnexpectedObject {
                expected: "instance",
                found: other.describe(),
            }
            .into()),
        }
    }

    fn write_field(&mut self, id: ObjectId, field: &str, value: FieldValue) -> EnvResult<()> {
        if let ObjectBody::Instance { fields, .. } = self.rt.heap.get_mut(id)? {
            fields.insert(field.to_string(), value);
        }
        Ok(())
    }

    pub fn get_field(&mut self, obj: Option<LocalRef>, field: &str) -> EnvResult<Scalar> {
        match self.field_slot(obj, field)? {
            (_, FieldValue::Scalar(s)) => Ok(s),
            (_, FieldValue::Ref(_)) => Err(RuntimeError::FieldType {
                field: field.to_string(),
                expected: "reference".to_string(),
                found: "primitive".to_string(),
            }
            .into()),
        }
    }

    pub fn set_field(&mut self, obj: Option<LocalRef>, field: &str, value: Scalar) -> EnvResult<()> {
        let (id, current) = self.field_slot(obj, field)?;
        match current {
            FieldValue::Scalar(old) if old.descriptor() == value.descriptor() => {
                self.write_field(id, field, FieldValue::Scalar(value))
            }
            FieldValue::Scalar(old) => Err(RuntimeError::FieldType {
                field: field.to_string(),
                expected: old.descriptor().to_string(),
                found: value.descriptor().to_string(),
            }
            .into()),
            FieldValue::Ref(_) => Err(RuntimeError::FieldType {
                field: field.to_string(),
                expected: "reference".to_string(),
                found: value.descriptor().to_string(),
            }
            .into()),
        }
    }

    pub fn get_object_field(
        &mut self,
        obj: Option<LocalRef>,
        field: &str,
    ) -> EnvResult<Option<LocalRef>> {
        match self.field_slot(obj, field)? {
            (_, FieldValue::Ref(target)) => target.map(|t| self.local(t)).transpose(),
            (_, FieldValue::Scalar(s)) => Err(RuntimeError::FieldType {
                field: field.to_string(),
                expected: s.descriptor().to_string(),
                found: "reference".to_string(),
            }
            .into()),
        }
    }

    pub fn set_object_field(
        &mut self,
        obj: Option<LocalRef>,
        field: &str,
        value: Option<LocalRef>,
    ) -> EnvResult<()> {
        let (id, current) = self.field_slot(obj, field)?;
        if let FieldValue::Scalar(s) = current {
            return Err(RuntimeError::FieldType {
                field: field.to_string(),
                expected: s.descriptor().to_string(),
                found: "reference".to_string(),
            }
            .into());
        }
        let target = value.map(|l| self.resolve(l)).transpose()?;
        self.write_field(id, field, FieldValue::Ref(target))
    }

    // ---- types ---------------------------------------------------------

    pub fn type_of(&self, local: LocalRef) -> EnvResult<TypeDesc> {
        let id = self.resolve(local)?;
        Ok(self.rt.heap.get(id)?.type_desc())
    }

    /// `obj instanceof target`; null is never an instance.
    pub fn is_instance_of(&self, obj: Option<LocalRef>, target: &TypeDesc) -> EnvResult<bool> {
        let Some(local) = obj else {
            return Ok(false);
        };
        let actual = self.type_of(local)?;
        Ok(self
            .rt
            .classes
            .is_assignable(&actual.descriptor(), &target.descriptor()))
    }

    /// `(target) obj`; null always passes.
    pub fn check_cast(&mut self, obj: Option<LocalRef>, target: &TypeDesc) -> EnvResult<()> {
        if obj.is_none() || self.is_instance_of(obj, target)? {
            return Ok(());
        }
        let actual = match obj {
            Some(l) => self.type_of(l)?,
            None => TypeDesc::object(),
        };
        Err(self
            .throw_new(FaultKind::ClassCast, &format!("{actual} cannot be cast to {target}"))
            .into())
    }

    // ---- methods -------------------------------------------------------

    fn receiver_class(&mut self, recv: Option<LocalRef>, method: &str) -> EnvResult<String> {
        let id = self.deref(recv, &format!("invoke {method}"))?;
        match self.rt.heap.get(id)? {
            ObjectBody::Instance { class, .. } => Ok(class.clone()),
            other => Err(RuntimeError::UnexpectedObject {
                expected: "instance",
                found: other.describe(),
            }
            .into()),
        }
    }

    fn run_body(
        &mut self,
        recv: Option<LocalRef>,
        declaring: &str,
        method: &str,
        body: MethodImpl,
        args: &[Scalar],
    ) -> EnvResult<Option<Scalar>> {
        match body {
            MethodImpl::ReturnInt(v) => Ok(Some(Scalar::Int(v))),
            MethodImpl::ReturnSuper => self.call_super_method(recv, declaring, method, args),
            MethodImpl::RequireArg(expected) => match args.first() {
                Some(Scalar::Bool(b)) if *b == expected => Ok(None),
                other => {
                    let got = other.map_or_else(|| "nothing".to_string(), ToString::to_string);
                    Err(self
                        .throw_new(
                            FaultKind::AssertionFailed,
                            &format!("{declaring}.{method} expected {expected}, got {got}"),
                        )
                        .into())
                }
            },
            MethodImpl::ForwardSuper(target) => {
                self.call_super_method(recv, declaring, target, args)
            }
        }
    }

    /// Virtual call: resolves from the receiver's runtime class.
    pub fn call_method(
        &mut self,
        recv: Option<LocalRef>,
        method: &str,
        args: &[Scalar],
    ) -> EnvResult<Option<Scalar>> {
        let class = self.receiver_class(recv, method)?;
        let resolved = self
            .rt
            .classes
            .resolve_virtual(&class, method)
            .map(|(decl, body)| (decl.to_string(), body));
        match resolved {
            Some((declaring, body)) => self.run_body(recv, &declaring, method, body, args),
            None => Err(self
                .throw_new(FaultKind::NoSuchMethod, &format!("{class}.{method}"))
                .into()),
        }
    }

    /// `super.method(args)` as written inside `caller`.
    pub fn call_super_method(
        &mut self,
        recv: Option<LocalRef>,
        caller: &str,
        method: &str,
        args: &[Scalar],
    ) -> EnvResult<Option<Scalar>> {
        self.receiver_class(recv, method)?;
        let resolved = self
            .rt
            .classes
            .resolve_super(caller, method)
            .map(|(decl, body)| (decl.to_string(), body));
        match resolved {
            Some((declaring, body)) => self.run_body(recv, &declaring, method, body, args),
            None => Err(self
                .throw_new(FaultKind::NoSuchMethod, &format!("super.{method} from {caller}"))
                .into()),
        }
    }

    /// Convenience wrapper for `int` methods.
    pub fn call_int_method(&mut self, recv: Option<LocalRef>, method: &str) -> EnvResult<i32> {
        match self.call_method(recv, method, &[])? {
            Some(Scalar::Int(v)) => Ok(v),
            other => Err(RuntimeError::FieldType {
                field: method.to_string(),
                expected: "I".to_string(),
                found: other.map_or_else(|| "V".to_string(), |s| s.descriptor().to_string()),
            }
            .into()),
        }
    }

    pub fn call_super_int_method(
        &mut self,
        recv: Option<LocalRef>,
        caller: &str,
        method: &str,
    ) -> EnvResult<i32> {
        match self.call_super_method(recv, caller, method, &[])? {
            Some(Scalar::Int(v)) => Ok(v),
            other => Err(RuntimeError::FieldType {
                field: method.to_string(),
                expected: "I".to_string(),
                found: other.map_or_else(|| "V".to_string(), |s| s.descriptor().to_string()),
            }
            .into()),
        }
    }
}
