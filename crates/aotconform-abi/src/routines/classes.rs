//! Type checks and dispatch routines.

use aotconform_core::Scalar;
use aotconform_runtime::Env;

use super::{RoutineTable, arg_bool, arg_class, arg_ref};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "Classes.isInstance" => "(Ljava/lang/Object;Ljava/lang/Class;)Z", is_instance;
        "Classes.checkCast" => "(Ljava/lang/Object;Ljava/lang/Class;)V", check_cast;
        "Classes.virtualTag" => "(LClasses;)I", virtual_tag;
        "Classes.superTag" => "(LEvenMoreClasses;)I", super_tag;
        "Classes.subFunc" => "(LClasses;Z)V", sub_func;
        "Classes.superFunc" => "(LMoreClasses;Z)V", super_func;
    }
}

fn is_instance(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let obj = arg_ref(args, 0)?;
    let class = arg_class(args, 1)?;
    Ok(Scalar::Bool(env.is_instance_of(obj, &class)?).into())
}

fn check_cast(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let obj = arg_ref(args, 0)?;
    let class = arg_class(args, 1)?;
    env.check_cast(obj, &class)?;
    Ok(Returned::Void)
}

/// `c.tag()` through a `Classes` reference.
fn virtual_tag(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let recv = arg_ref(args, 0)?;
    Ok(Scalar::Int(env.call_int_method(recv, "tag")?).into())
}

/// `super.tag()` written inside `EvenMoreClasses`.
fn super_tag(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let recv = arg_ref(args, 0)?;
    Ok(Scalar::Int(env.call_super_int_method(recv, "EvenMoreClasses", "tag")?).into())
}

fn sub_func(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let recv = arg_ref(args, 0)?;
    let flag = arg_bool(args, 1)?;
    env.call_method(recv, "subFunc", &[Scalar::Bool(flag)])?;
    Ok(Returned::Void)
}

fn super_func(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let recv = arg_ref(args, 0)?;
    let flag = arg_bool(args, 1)?;
    env.call_method(recv, "superFunc", &[Scalar::Bool(flag)])?;
    Ok(Returned::Void)
}
