use crate::{types::Id, value::Value};
use time::OffsetDateTime;
use ulid::Ulid;

///
/// FieldValue
///
/// Conversion boundary between a leaf field and the executor.
/// `to_value` feeds writes, `from_value` assigns scanned columns.
///

pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>;
}

///
/// ColumnSlot
///
/// Object-safe, addressable leaf: the scan target handed out for one column.
///

pub trait ColumnSlot {
    fn value(&self) -> Value;

    /// Assign a scanned value, handing it back when the slot cannot hold it.
    fn assign(&mut self, value: Value) -> Result<(), Value>;
}

impl<T: FieldValue> ColumnSlot for T {
    fn value(&self) -> Value {
        self.to_value()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match T::from_value(&value) {
            Some(v) => {
                *self = v;
                Ok(())
            }
            None => Err(value),
        }
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }

        T::from_value(value).map(Some)
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Self::new)
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(ToString::to_string)
    }
}

impl FieldValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as Self),
            Value::Uint(v) => Some(*v as Self),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float((*self).into())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as Self)
    }
}

impl FieldValue for Ulid {
    fn to_value(&self) -> Value {
        Value::Ulid(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Ulid(v) => Some(*v),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FieldValue for OffsetDateTime {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl FieldValue for Id {
    fn to_value(&self) -> Value {
        Value::Int(self.get())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().map(Self::new)
    }
}

// impl_field_value_int
// integers accept either signedness from the driver as long as the value fits
macro_rules! impl_field_value_int {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => (*v).try_into().ok(),
                        Value::Uint(v) => (*v).try_into().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_value_int!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
);

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_accept_either_signedness_when_in_range() {
        assert_eq!(i32::from_value(&Value::Uint(5)), Some(5));
        assert_eq!(u8::from_value(&Value::Int(255)), Some(255));
        assert_eq!(u8::from_value(&Value::Int(256)), None);
        assert_eq!(i64::from_value(&Value::Text("5".into())), None);
    }

    #[test]
    fn unset_option_writes_null_and_scans_back_from_null() {
        let unset: Option<i64> = None;

        assert_eq!(unset.to_value(), Value::Null);
        assert_eq!(Option::<i64>::from_value(&Value::Null), Some(None));
        assert_eq!(Option::<i64>::from_value(&Value::Int(3)), Some(Some(3)));
        assert_eq!(Option::<i64>::from_value(&Value::Bool(true)), None);
    }

    #[test]
    fn slot_assignment_hands_back_rejected_values() {
        let mut name = String::from("before");
        let slot: &mut dyn ColumnSlot = &mut name;

        assert_eq!(slot.assign(Value::Int(1)), Err(Value::Int(1)));
        assert_eq!(slot.value(), Value::Text("before".into()));

        slot.assign(Value::Text("after".into())).unwrap();
        assert_eq!(name, "after");
    }

    #[test]
    fn ulid_scans_from_text() {
        let id = Ulid::from_parts(1_700_000_000_000, 42);
        let text = Value::Text(id.to_string());

        assert_eq!(Ulid::from_value(&text), Some(id));
        assert_eq!(Ulid::from_value(&Value::Ulid(id)), Some(id));
    }
}
