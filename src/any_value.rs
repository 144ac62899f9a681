use std::any::{type_name, Any, TypeId};
use std::fmt;

/// A type-erased value passed between a getter and a setter.
///
/// The concrete type is recorded next to the boxed value so it can be
/// compared against declared parameter types without unboxing.
pub struct Value {
    type_id: TypeId,
    type_name: &'static str,
    inner: Box<dyn Any>,
}

impl Value {
    /// Wrap a value of any `'static` type
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            inner: Box::new(value),
        }
    }

    /// The "no value" result of an operation that returns `()`
    pub fn unit() -> Self {
        Self::new(())
    }

    /// `TypeId` of the wrapped value
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Type name of the wrapped value, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the contained value is of type T
    pub fn is_type<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// True when the value is `()`
    pub fn is_unit(&self) -> bool {
        self.is_type::<()>()
    }

    /// Get a reference to the contained value if it is of type T
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the contained value out if it is of type T.
    ///
    /// On a mismatch the value is handed back untouched.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        let Value {
            type_id,
            type_name,
            inner,
        } = self;
        match inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Value {
                type_id,
                type_name,
                inner,
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}
