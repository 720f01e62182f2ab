//! Instance field routines.

use aotconform_core::{ArrayValue, Scalar};
use aotconform_runtime::Env;

use super::{
    RoutineTable, arg_bool, arg_byte, arg_char, arg_double, arg_float, arg_int, arg_long,
    arg_ref, arg_short, ret_array,
};
use crate::error::Trap;
use crate::marshal::{Returned, Slot};

pub(super) fn register(table: &mut RoutineTable) {
    register! { table;
        "InstField.assignFields" => "(ZBCSIJFD)[J", assign_fields;
        "InstField.readInt" => "(LInstField;)I", read_int;
        "InstField.writeInt" => "(LInstField;I)V", write_int;
        "InstField.volatileLong" => "(J)J", volatile_long;
        "InstField.stringField" => "(Ljava/lang/String;)Ljava/lang/String;", string_field;
    }
}

/// Store every primitive width into a fresh object, read each back, and
/// return the raw bits widened to long.
fn assign_fields(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let obj = Some(env.new_instance("InstField")?);
    let values = [
        ("mBoolean1", Scalar::Bool(arg_bool(args, 0)?)),
        ("mByte1", Scalar::Byte(arg_byte(args, 1)?)),
        ("mChar1", Scalar::Char(arg_char(args, 2)?)),
        ("mShort1", Scalar::Short(arg_short(args, 3)?)),
        ("mInt1", Scalar::Int(arg_int(args, 4)?)),
        ("mLong1", Scalar::Long(arg_long(args, 5)?)),
        ("mFloat1", Scalar::Float(arg_float(args, 6)?)),
        ("mDouble1", Scalar::Double(arg_double(args, 7)?)),
    ];
    for (field, value) in values {
        env.set_field(obj, field, value)?;
    }
    let mut out = Vec::with_capacity(values.len());
    for (field, _) in values {
        out.push(match env.get_field(obj, field)? {
            Scalar::Bool(b) => i64::from(b),
            Scalar::Byte(v) => i64::from(v),
            Scalar::Char(v) => i64::from(v),
            Scalar::Short(v) => i64::from(v),
            Scalar::Int(v) => i64::from(v),
            Scalar::Long(v) => v,
            Scalar::Float(v) => i64::from(v.to_bits()),
            Scalar::Double(v) => v.to_bits() as i64,
        });
    }
    ret_array(env, ArrayValue::Long(out))
}

fn read_int(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let obj = arg_ref(args, 0)?;
    Ok(env.get_field(obj, "mInt1")?.into())
}

fn write_int(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let obj = arg_ref(args, 0)?;
    let value = arg_int(args, 1)?;
    env.set_field(obj, "mInt1", Scalar::Int(value))?;
    Ok(Returned::Void)
}

fn volatile_long(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let value = arg_long(args, 0)?;
    let obj = Some(env.new_instance("InstField")?);
    env.set_field(obj, "mVolatileLong1", Scalar::Long(value))?;
    Ok(env.get_field(obj, "mVolatileLong1")?.into())
}

fn string_field(env: &mut Env<'_>, args: &[Slot]) -> Result<Returned, Trap> {
    let text = arg_ref(args, 0)?;
    let obj = Some(env.new_instance("InstField")?);
    env.set_object_field(obj, "mString1", text)?;
    Ok(Returned::Object(env.get_object_field(obj, "mString1")?))
}
