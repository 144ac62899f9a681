use crate::any_value::Value;
use crate::error::InvokeError;
use log::{trace, warn};
use std::any::{type_name, Any, TypeId};

/// A declared "is-a" edge from a concrete type to a boxed trait object.
///
/// Rust has no subclassing, so `Dog` is-a `Animal` is spelled as
/// `Dog: Into<Box<dyn Animal>>`. A value produced as `Dog` may then be
/// stored through a parameter declared as `Box<dyn Animal>`.
#[derive(Clone, Copy, Debug)]
pub struct Upcast {
    source: TypeId,
    target: TypeId,
    target_name: &'static str,
    convert: fn(Value) -> Result<Value, Value>,
}

fn upcast_into<T, S>(value: Value) -> Result<Value, Value>
where
    T: Any + Into<Box<S>>,
    S: ?Sized + 'static,
{
    value.downcast::<T>().map(|v| Value::new::<Box<S>>(v.into()))
}

impl Upcast {
    /// Declare that every `T` is also a `Box<S>`
    pub fn new<T, S>() -> Self
    where
        T: Any + Into<Box<S>>,
        S: ?Sized + 'static,
    {
        Self {
            source: TypeId::of::<T>(),
            target: TypeId::of::<Box<S>>(),
            target_name: type_name::<Box<S>>(),
            convert: upcast_into::<T, S>,
        }
    }

    /// `TypeId` of `Box<S>`
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Type name of `Box<S>`, for diagnostics
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }
}

/// Runtime descriptor of a parameter or return type
#[derive(Clone, Debug)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    supertypes: Vec<Upcast>,
}

impl TypeInfo {
    /// Describe `T` with no declared supertypes
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_propmap::TypeInfo;
    ///
    /// let int = TypeInfo::of::<i32>();
    /// assert!(int.is::<i32>());
    /// assert!(int.is_assignable_from(&TypeInfo::of::<i32>()));
    /// assert!(!int.is_assignable_from(&TypeInfo::of::<i16>()));
    /// ```
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            supertypes: Vec::new(),
        }
    }

    /// The "no value" type
    pub fn unit() -> Self {
        Self::of::<()>()
    }

    /// Describe `T` together with the trait object `S` it can be viewed as.
    ///
    /// `T` must be the type this descriptor was built for; otherwise the
    /// declaration is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_propmap::TypeInfo;
    /// use std::fmt::Display;
    ///
    /// let text = TypeInfo::of::<String>().with_supertype::<String, dyn Display>();
    /// assert!(TypeInfo::of::<Box<dyn Display>>().is_assignable_from(&text));
    /// ```
    pub fn with_supertype<T, S>(self) -> Self
    where
        T: Any + Into<Box<S>>,
        S: ?Sized + 'static,
    {
        self.with_upcast(Upcast::new::<T, S>())
    }

    /// Attach an upcast. An upcast that starts from some other type is
    /// ignored.
    pub fn with_upcast(mut self, upcast: Upcast) -> Self {
        if upcast.source != self.id {
            warn!(
                "ignoring upcast to `{}` declared on unrelated type `{}`",
                upcast.target_name,
                self.name
            );
            return self;
        }
        if !self.supertypes.iter().any(|u| u.target == upcast.target) {
            self.supertypes.push(upcast);
        }
        self
    }

    /// `TypeId` of the described type. Two descriptors are equal iff their
    /// ids are.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name as reported by `std::any::type_name`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared upcasts, one per supertype
    pub fn supertypes(&self) -> &[Upcast] {
        &self.supertypes
    }

    /// True for `()`, the "no value" type
    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }

    /// Check if this describes exactly `T`
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Whether a value of type `produced` can be stored in a location of
    /// this type without coercion.
    pub fn is_assignable_from(&self, produced: &TypeInfo) -> bool {
        self.id == produced.id || produced.supertypes.iter().any(|u| u.target == self.id)
    }

    /// Turn a value produced as `self` into a value of type `param`.
    ///
    /// Values already of the parameter type pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::ArgumentType` if `value` is not of this type,
    /// or if no declared upcast leads to `param`.
    pub fn upcast_value(&self, value: Value, param: &TypeInfo) -> Result<Value, InvokeError> {
        if value.type_id() != self.id {
            return Err(InvokeError::ArgumentType {
                expected: self.name,
                found: value.type_name(),
            });
        }
        if param.id == self.id {
            return Ok(value);
        }

        let upcast = self
            .supertypes
            .iter()
            .find(|u| u.target == param.id)
            .ok_or(InvokeError::ArgumentType {
                expected: param.name,
                found: self.name,
            })?;

        trace!("upcasting `{}` to `{}`", self.name, param.name);
        (upcast.convert)(value).map_err(|v| InvokeError::ArgumentType {
            expected: self.name,
            found: v.type_name(),
        })
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}
