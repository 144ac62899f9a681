use crate::any_value::Value;
use crate::classify::{self, Accessor};
use crate::config::{MapperConfig, SetterArity};
use crate::error::{InvokeError, MapError};
use crate::operation::{Introspect, Operation};
use crate::types::TypeInfo;
use log::{debug, trace};
use std::any::Any;

/// A getter/setter pair that an assignment would invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMatch {
    pub property: String,
    pub getter: String,
    pub setter: String,
    /// Type produced by the getter
    pub value_type: &'static str,
    /// Type accepted by the setter
    pub parameter_type: &'static str,
}

/// The receivers an assignment reads from and writes to.
enum Endpoints<'a> {
    Distinct {
        target: &'a mut dyn Any,
        source: &'a dyn Any,
    },
    Same(&'a mut dyn Any),
}

impl Endpoints<'_> {
    fn read(&mut self, getter: &Operation) -> Result<Value, InvokeError> {
        match self {
            Endpoints::Distinct { source, .. } => getter.invoke(*source, Vec::new()),
            Endpoints::Same(object) => getter.invoke_mut(&mut **object, Vec::new()),
        }
    }

    fn write(&mut self, setter: &Operation, value: Value) -> Result<Value, InvokeError> {
        match self {
            Endpoints::Distinct { target, .. } => setter.invoke_mut(&mut **target, vec![value]),
            Endpoints::Same(object) => setter.invoke_mut(&mut **object, vec![value]),
        }
    }
}

/// Copies property values between objects by pairing getters on the
/// source with setters on the target.
///
/// A getter `getX` pairs with a setter `setX` when the setter's first
/// parameter type is assignable from the getter's return type. Every
/// getter is tried against every setter, so one getter may feed several
/// overloaded setters.
///
/// # Examples
///
/// ```
/// use sovran_propmap::{Introspect, Mapper, MapError, OperationTable, SetterArity};
///
/// #[derive(Default)]
/// struct Entity {
///     id: u64,
/// }
///
/// impl Introspect for Entity {
///     fn operations() -> OperationTable<Self> {
///         OperationTable::new()
///             .query("getId", |e: &Entity| e.id)
///             .command("setId", |e: &mut Entity, id: u64| e.id = id)
///     }
/// }
///
/// let mapper = Mapper::new().setter_arity(SetterArity::Strict);
/// let source = Entity { id: 7 };
/// let mut target = Entity::default();
///
/// mapper.assign(&mut target, &source)?;
/// assert_eq!(target.id, 7);
/// # Ok::<(), MapError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mapper {
    config: MapperConfig,
}

impl Mapper {
    /// Creates a mapper with the default, lenient setter policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapper from an explicit configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_propmap::{Mapper, MapperConfig, SetterArity};
    ///
    /// let config = MapperConfig::new().setter_arity(SetterArity::Strict);
    /// let mapper = Mapper::with_config(config);
    /// assert_eq!(mapper.config().setter_arity, SetterArity::Strict);
    /// ```
    pub fn with_config(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Sets how parameterless `set...` operations are treated
    pub fn setter_arity(mut self, arity: SetterArity) -> Self {
        self.config.setter_arity = arity;
        self
    }

    /// The configuration in effect
    pub fn config(&self) -> MapperConfig {
        self.config
    }

    /// Copies every matching property from `source` into `target`.
    ///
    /// Finding no matching pair is not an error.
    ///
    /// # Errors
    ///
    /// - `MapError::Invocation` if a getter or setter fails; no further
    ///   pairs are processed
    /// - `MapError::Access` if a getter needs `&mut self`
    pub fn assign<T, S>(&self, target: &mut T, source: &S) -> Result<(), MapError>
    where
        T: Introspect,
        S: Introspect,
    {
        let mut endpoints = Endpoints::Distinct { target, source };
        self.run::<T, S>(&mut endpoints)
    }

    /// Copies matching properties of `object` onto itself.
    ///
    /// Getters run through the same exclusive borrow the setters use, so
    /// `&mut self` getters are allowed here.
    ///
    /// # Errors
    ///
    /// `MapError::Invocation` if a getter or setter fails.
    pub fn assign_in_place<T>(&self, object: &mut T) -> Result<(), MapError>
    where
        T: Introspect,
    {
        let mut endpoints = Endpoints::Same(object);
        self.run::<T, T>(&mut endpoints)
    }

    /// Lists the pairs `assign` would invoke for these two types, without
    /// invoking anything.
    ///
    /// # Errors
    ///
    /// Fails like `assign` on a parameterless setter under
    /// [`SetterArity::Lenient`].
    pub fn plan<T, S>(&self) -> Result<Vec<PropertyMatch>, MapError>
    where
        T: Introspect,
        S: Introspect,
    {
        let target_ops = T::operations();
        let source_ops = S::operations();
        let setters = classify::setters(&target_ops, self.config.setter_arity);
        let getters = classify::getters(&source_ops);

        let mut planned = Vec::new();
        walk(&getters, &setters, |getter, setter, param| {
            planned.push(PropertyMatch {
                property: getter.property().to_string(),
                getter: getter.operation().name().to_string(),
                setter: setter.operation().name().to_string(),
                value_type: getter.operation().returns().name(),
                parameter_type: param.name(),
            });
            Ok(())
        })?;
        Ok(planned)
    }

    fn run<T, S>(&self, endpoints: &mut Endpoints<'_>) -> Result<(), MapError>
    where
        T: Introspect,
        S: Introspect,
    {
        let target_ops = T::operations();
        let source_ops = S::operations();
        let setters = classify::setters(&target_ops, self.config.setter_arity);
        let getters = classify::getters(&source_ops);
        debug!(
            "assigning {} getter(s) of `{}` to {} setter(s) of `{}`",
            getters.len(),
            std::any::type_name::<S>(),
            setters.len(),
            std::any::type_name::<T>()
        );

        walk(&getters, &setters, |getter, setter, param| {
            transfer(endpoints, getter, setter, param)
        })
    }
}

/// Visit every (getter, setter) pair that matches by property name and
/// type, getter-major, along with the setter parameter that accepts the
/// value. Stops at the first error from `visit`.
fn walk<F>(
    getters: &[Accessor<'_>],
    setters: &[Accessor<'_>],
    mut visit: F,
) -> Result<(), MapError>
where
    F: FnMut(&Accessor<'_>, &Accessor<'_>, &TypeInfo) -> Result<(), MapError>,
{
    for getter in getters {
        for setter in setters {
            if getter.property() != setter.property() {
                continue;
            }
            // Only reachable with SetterArity::Lenient
            let Some(param) = setter.value_type() else {
                return Err(MapError::Invocation {
                    operation: setter.operation().name().to_string(),
                    source: InvokeError::MissingParameter,
                });
            };
            let produced = getter.operation().returns();
            if !param.is_assignable_from(produced) {
                trace!(
                    "`{}` cannot accept `{}` from `{}`",
                    setter.operation().name(),
                    produced.name(),
                    getter.operation().name()
                );
                continue;
            }
            visit(getter, setter, param)?;
        }
    }
    Ok(())
}

fn transfer(
    endpoints: &mut Endpoints<'_>,
    getter: &Accessor<'_>,
    setter: &Accessor<'_>,
    param: &TypeInfo,
) -> Result<(), MapError> {
    let get = getter.operation();
    let set = setter.operation();
    let value = endpoints
        .read(get)
        .map_err(|e| MapError::from_invoke(get.name(), e))?;

    let value = get
        .returns()
        .upcast_value(value, param)
        .map_err(|e| MapError::from_invoke(set.name(), e))?;

    trace!("`{}` -> `{}`", get.name(), set.name());
    endpoints
        .write(set, value)
        .map_err(|e| MapError::from_invoke(set.name(), e))?;
    Ok(())
}

/// Copies every matching property from `source` into `target` using the
/// default [`Mapper`].
///
/// # Examples
///
/// ```
/// use sovran_propmap::{assign, Introspect, MapError, OperationTable};
///
/// struct UserDto {
///     name: String,
/// }
///
/// #[derive(Default)]
/// struct User {
///     name: String,
/// }
///
/// impl Introspect for UserDto {
///     fn operations() -> OperationTable<Self> {
///         OperationTable::new().query("getName", |d: &UserDto| d.name.clone())
///     }
/// }
///
/// impl Introspect for User {
///     fn operations() -> OperationTable<Self> {
///         OperationTable::new().command("setName", |u: &mut User, name: String| u.name = name)
///     }
/// }
///
/// let dto = UserDto { name: "Ada".to_string() };
/// let mut user = User::default();
/// assign(&mut user, &dto)?;
/// assert_eq!(user.name, "Ada");
/// # Ok::<(), MapError>(())
/// ```
pub fn assign<T, S>(target: &mut T, source: &S) -> Result<(), MapError>
where
    T: Introspect,
    S: Introspect,
{
    Mapper::new().assign(target, source)
}

/// Copies matching properties of `object` onto itself using the default
/// [`Mapper`].
pub fn assign_in_place<T>(object: &mut T) -> Result<(), MapError>
where
    T: Introspect,
{
    Mapper::new().assign_in_place(object)
}
