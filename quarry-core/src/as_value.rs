use crate::{Error, QueryError, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// It serves both directions of the core: arguments become values when they are
/// bound to a placeholder, row values become fields when a result is reassembled.
///
/// # Conversion rules
/// - Integers accept every integer variant (and integral decimals) after a range
///   check, the error names the offending value and the target type.
/// - Floats accept float, integer and decimal variants.
/// - A NULL can only be converted into `Option<T>`.
///
/// # Examples
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int32(Some(42)));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Typed NULL for this type, used as prototype by the column metadata.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Value of a field that was not part of the select list.
    ///
    /// Defaults to an error, types with a natural zero value override it.
    fn absent(field: &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(QueryError::mapping(
            any::type_name::<Self>(),
            format!("field `{field}` was not selected and the type has no zero value"),
        )
        .into())
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    if value.is_null() {
        return Error::msg(format!(
            "Unexpected NULL for the non nullable type {}",
            any::type_name::<T>(),
        ));
    }
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>(),
    ))
}

fn integer_of(value: &Value) -> Option<i128> {
    Some(match value {
        Value::Int8(Some(v)) => *v as _,
        Value::Int16(Some(v)) => *v as _,
        Value::Int32(Some(v)) => *v as _,
        Value::Int64(Some(v)) => *v as _,
        Value::UInt8(Some(v)) => *v as _,
        Value::UInt16(Some(v)) => *v as _,
        Value::UInt32(Some(v)) => *v as _,
        Value::UInt64(Some(v)) => *v as _,
        Value::Decimal(Some(v)) if v.is_integer() => v.to_i128()?,
        _ => return None,
    })
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let $destination(Some(v)) = value {
                    return Ok(v);
                }
                let Some(v) = integer_of(&value) else {
                    return Err(mismatch::<Self>(&value));
                };
                <$source>::try_from(v).map_err(|_| {
                    Error::msg(format!(
                        "Value {v}: {} is out of range for {}",
                        value.type_name(),
                        any::type_name::<Self>(),
                    ))
                })
            }
            fn absent(_field: &str) -> Result<Self> {
                Ok(0)
            }
        }
    };
}
impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path, $from_decimal:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v)) => v.$from_decimal().ok_or_else(|| {
                        Error::msg(format!(
                            "Value {v}: DECIMAL does not fit into {}",
                            any::type_name::<Self>()
                        ))
                    }),
                    _ => match integer_of(&value) {
                        Some(v) => Ok(v as _),
                        None => Err(mismatch::<Self>(&value)),
                    },
                }
            }
            fn absent(_field: &str) -> Result<Self> {
                Ok(0.0)
            }
        }
    };
}
impl_as_value_float!(f32, Value::Float32, to_f32);
impl_as_value_float!(f64, Value::Float64, to_f64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if let Value::Boolean(Some(v)) = value {
            return Ok(v);
        }
        match integer_of(&value) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
    fn absent(_field: &str) -> Result<Self> {
        Ok(false)
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::new(e).context("The BLOB is not a valid UTF-8 string")),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
    fn absent(_field: &str) -> Result<Self> {
        Ok(String::new())
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
    fn absent(_field: &str) -> Result<Self> {
        Ok(Box::default())
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => Decimal::from_f32(v)
                .ok_or_else(|| Error::msg(format!("Value {v}: FLOAT does not fit into Decimal"))),
            Value::Float64(Some(v)) => Decimal::from_f64(v)
                .ok_or_else(|| Error::msg(format!("Value {v}: DOUBLE does not fit into Decimal"))),
            Value::Varchar(Some(ref v)) => v
                .parse::<Decimal>()
                .map_err(|e| Error::new(e).context(format!("Cannot parse `{v}` as Decimal"))),
            _ => match integer_of(&value).and_then(Decimal::from_i128) {
                Some(v) => Ok(v),
                None => Err(mismatch::<Self>(&value)),
            },
        }
    }
    fn absent(_field: &str) -> Result<Self> {
        Ok(Decimal::ZERO)
    }
}

macro_rules! impl_as_value_exact {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    $($pat_rest => $expr_rest,)*
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}
impl_as_value_exact!(Date, Value::Date);
impl_as_value_exact!(Time, Value::Time);
impl_as_value_exact!(
    PrimitiveDateTime,
    Value::Timestamp,
    Value::TimestampWithTimezone(Some(v)) => Ok(PrimitiveDateTime::new(v.date(), v.time())),
);
impl_as_value_exact!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);
impl_as_value_exact!(
    Uuid,
    Value::Uuid,
    Value::Varchar(Some(ref v)) => Uuid::parse_str(v).map_err(Error::new),
    Value::Blob(Some(ref v)) => Uuid::from_slice(v).map_err(Error::new),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
    fn absent(_field: &str) -> Result<Self> {
        Ok(None)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
    fn absent(field: &str) -> Result<Self> {
        T::absent(field).map(Box::new)
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(values), ..) => values.into_iter().map(T::try_from_value).collect(),
            Value::Blob(Some(bytes)) => bytes
                .iter()
                .map(|v| T::try_from_value(Value::UInt8(Some(*v))))
                .collect(),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
    fn absent(_field: &str) -> Result<Self> {
        Ok(Vec::new())
    }
}
