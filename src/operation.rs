use crate::any_value::Value;
use crate::error::{AccessDenied, BoxError, InvokeError};
use crate::types::{TypeInfo, Upcast};
use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Invoker for an operation that borrows its receiver shared
pub type SharedFn = Box<dyn Fn(&dyn Any, Vec<Value>) -> Result<Value, InvokeError>>;
/// Invoker for an operation that borrows its receiver exclusively
pub type ExclusiveFn = Box<dyn Fn(&mut dyn Any, Vec<Value>) -> Result<Value, InvokeError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Restricted,
}

/// How an operation borrows its receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Exclusive,
}

enum Invoker {
    Shared(SharedFn),
    Exclusive(ExclusiveFn),
}

/// A named, typed, dynamically invocable operation on some receiver type.
pub struct Operation {
    name: Cow<'static, str>,
    visibility: Visibility,
    params: Vec<TypeInfo>,
    returns: TypeInfo,
    invoker: Invoker,
}

impl Operation {
    /// Build a raw `&self` operation.
    ///
    /// Arity and argument types are checked against `params` before `f`
    /// runs, so `f` may assume them.
    pub fn shared<F>(
        name: impl Into<Cow<'static, str>>,
        params: Vec<TypeInfo>,
        returns: TypeInfo,
        f: F,
    ) -> Self
    where
        F: Fn(&dyn Any, Vec<Value>) -> Result<Value, InvokeError> + 'static,
    {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            params,
            returns,
            invoker: Invoker::Shared(Box::new(f)),
        }
    }

    /// Build a raw `&mut self` operation.
    pub fn exclusive<F>(
        name: impl Into<Cow<'static, str>>,
        params: Vec<TypeInfo>,
        returns: TypeInfo,
        f: F,
    ) -> Self
    where
        F: Fn(&mut dyn Any, Vec<Value>) -> Result<Value, InvokeError> + 'static,
    {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            params,
            returns,
            invoker: Invoker::Exclusive(Box::new(f)),
        }
    }

    /// Hide the operation from public enumeration
    pub fn restricted(mut self) -> Self {
        self.visibility = Visibility::Restricted;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the operation is listed by [`OperationTable::public`]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// How the operation borrows its receiver, derived from the invoker it
    /// was built with
    pub fn receiver(&self) -> Receiver {
        match self.invoker {
            Invoker::Shared(_) => Receiver::Shared,
            Invoker::Exclusive(_) => Receiver::Exclusive,
        }
    }

    /// Declared parameter types, in order
    pub fn params(&self) -> &[TypeInfo] {
        &self.params
    }

    /// Declared return type; `()` when the operation returns nothing
    pub fn returns(&self) -> &TypeInfo {
        &self.returns
    }

    fn check_call(&self, args: &[Value]) -> Result<(), InvokeError> {
        if !self.is_public() {
            return Err(InvokeError::Denied(AccessDenied::NotPublic));
        }
        if args.len() != self.params.len() {
            return Err(InvokeError::Arity {
                expected: self.params.len(),
                found: args.len(),
            });
        }
        for (param, arg) in self.params.iter().zip(args) {
            if param.id() != arg.type_id() {
                return Err(InvokeError::ArgumentType {
                    expected: param.name(),
                    found: arg.type_name(),
                });
            }
        }
        Ok(())
    }

    /// The body must produce exactly the declared return type
    fn check_result(&self, value: Value) -> Result<Value, InvokeError> {
        if value.type_id() != self.returns.id() {
            return Err(InvokeError::ReturnType {
                expected: self.returns.name(),
                found: value.type_name(),
            });
        }
        Ok(value)
    }

    /// Invoke through a shared borrow of the receiver.
    ///
    /// # Errors
    ///
    /// - `InvokeError::Denied` if the operation is restricted or needs `&mut self`
    /// - `InvokeError::Arity` / `InvokeError::ArgumentType` if `args` don't fit
    /// - `InvokeError::ReturnType` if the body returns something other than
    ///   the declared return type
    /// - whatever the operation body itself reports
    pub fn invoke(&self, receiver: &dyn Any, args: Vec<Value>) -> Result<Value, InvokeError> {
        self.check_call(&args)?;
        let value = match &self.invoker {
            Invoker::Shared(f) => f(receiver, args)?,
            Invoker::Exclusive(_) => {
                return Err(InvokeError::Denied(AccessDenied::ExclusiveReceiver))
            }
        };
        self.check_result(value)
    }

    /// Invoke through an exclusive borrow of the receiver. Works for both
    /// receiver kinds.
    pub fn invoke_mut(
        &self,
        receiver: &mut dyn Any,
        args: Vec<Value>,
    ) -> Result<Value, InvokeError> {
        self.check_call(&args)?;
        let value = match &self.invoker {
            Invoker::Shared(f) => f(&*receiver, args)?,
            Invoker::Exclusive(f) => f(receiver, args)?,
        };
        self.check_result(value)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("receiver", &self.receiver())
            .field(
                "params",
                &self.params.iter().map(TypeInfo::name).collect::<Vec<_>>(),
            )
            .field("returns", &self.returns.name())
            .finish()
    }
}

/// A type whose operations can be discovered at runtime.
///
/// The table is rebuilt on every call; nothing is cached.
///
/// # Examples
///
/// ```
/// use sovran_propmap::{Introspect, OperationTable};
///
/// struct Person {
///     name: String,
/// }
///
/// impl Introspect for Person {
///     fn operations() -> OperationTable<Self> {
///         OperationTable::new()
///             .query("getName", |p: &Person| p.name.clone())
///             .command("setName", |p: &mut Person, name: String| p.name = name)
///     }
/// }
///
/// assert_eq!(Person::operations().public().count(), 2);
/// ```
pub trait Introspect: Any + Sized {
    fn operations() -> OperationTable<Self>;
}

fn receiver<T: Any>(receiver: &dyn Any) -> Result<&T, InvokeError> {
    receiver
        .downcast_ref::<T>()
        .ok_or(InvokeError::ReceiverType {
            expected: type_name::<T>(),
        })
}

fn receiver_mut<T: Any>(receiver: &mut dyn Any) -> Result<&mut T, InvokeError> {
    receiver
        .downcast_mut::<T>()
        .ok_or(InvokeError::ReceiverType {
            expected: type_name::<T>(),
        })
}

fn single_arg<A: Any>(args: Vec<Value>) -> Result<A, InvokeError> {
    let found = args.len();
    let arg = args
        .into_iter()
        .next()
        .ok_or(InvokeError::Arity { expected: 1, found })?;
    arg.downcast::<A>().map_err(|v| InvokeError::ArgumentType {
        expected: type_name::<A>(),
        found: v.type_name(),
    })
}

/// Typed builder for the operations of `T`.
///
/// Each method wraps a plain closure into a type-erased [`Operation`].
/// Names are free-form: whether an operation acts as a getter or setter
/// is decided later from its name and signature.
pub struct OperationTable<T> {
    operations: Vec<Operation>,
    _receiver: PhantomData<fn(&T)>,
}

impl<T: Any> OperationTable<T> {
    /// Creates a new, empty table
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_propmap::OperationTable;
    ///
    /// struct Empty;
    ///
    /// let table = OperationTable::<Empty>::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.public().count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            _receiver: PhantomData,
        }
    }

    /// Add a raw operation built with [`Operation::shared`] or
    /// [`Operation::exclusive`].
    ///
    /// This is the way to declare signatures the typed helpers don't
    /// cover, such as operations with several parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_propmap::{Operation, OperationTable, TypeInfo, Value};
    ///
    /// struct Point {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// let table = OperationTable::<Point>::new().push(Operation::exclusive(
    ///     "moveBy",
    ///     vec![TypeInfo::of::<i32>(), TypeInfo::of::<i32>()],
    ///     TypeInfo::unit(),
    ///     |this, mut args| {
    ///         let point = this.downcast_mut::<Point>().expect("receiver is a Point");
    ///         let dy = args.pop().and_then(|v| v.downcast::<i32>().ok()).unwrap_or(0);
    ///         let dx = args.pop().and_then(|v| v.downcast::<i32>().ok()).unwrap_or(0);
    ///         point.x += dx;
    ///         point.y += dy;
    ///         Ok(Value::unit())
    ///     },
    /// ));
    ///
    /// let mut point = Point { x: 1, y: 1 };
    /// let op = table.iter().next().unwrap();
    /// op.invoke_mut(&mut point, vec![Value::new(2i32), Value::new(3i32)]).unwrap();
    /// assert_eq!((point.x, point.y), (3, 4));
    /// ```
    pub fn push(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// `fn name(&self) -> R`
    pub fn query<R, F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        R: Any,
        F: Fn(&T) -> R + 'static,
    {
        self.push(Operation::shared(
            name,
            Vec::new(),
            TypeInfo::of::<R>(),
            move |this, _| Ok(Value::new(f(receiver::<T>(this)?))),
        ))
    }

    /// `fn name(&self) -> Result<R, E>`
    pub fn try_query<R, E, F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        R: Any,
        E: Into<BoxError>,
        F: Fn(&T) -> Result<R, E> + 'static,
    {
        self.push(Operation::shared(
            name,
            Vec::new(),
            TypeInfo::of::<R>(),
            move |this, _| {
                f(receiver::<T>(this)?)
                    .map(Value::new)
                    .map_err(InvokeError::failed)
            },
        ))
    }

    /// `fn name(&self, arg: A) -> R`
    pub fn query_with<A, R, F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        A: Any,
        R: Any,
        F: Fn(&T, A) -> R + 'static,
    {
        self.push(Operation::shared(
            name,
            vec![TypeInfo::of::<A>()],
            TypeInfo::of::<R>(),
            move |this, args| {
                let this = receiver::<T>(this)?;
                Ok(Value::new(f(this, single_arg::<A>(args)?)))
            },
        ))
    }

    /// `fn name(&mut self) -> R`
    pub fn query_mut<R, F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        R: Any,
        F: Fn(&mut T) -> R + 'static,
    {
        self.push(Operation::exclusive(
            name,
            Vec::new(),
            TypeInfo::of::<R>(),
            move |this, _| Ok(Value::new(f(receiver_mut::<T>(this)?))),
        ))
    }

    /// `fn name(&mut self, arg: A)`
    pub fn command<A, F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        A: Any,
        F: Fn(&mut T, A) + 'static,
    {
        self.push(Operation::exclusive(
            name,
            vec![TypeInfo::of::<A>()],
            TypeInfo::unit(),
            move |this, args| {
                let this = receiver_mut::<T>(this)?;
                f(this, single_arg::<A>(args)?);
                Ok(Value::unit())
            },
        ))
    }

    /// `fn name(&mut self, arg: A) -> Result<(), E>`
    pub fn try_command<A, E, F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        A: Any,
        E: Into<BoxError>,
        F: Fn(&mut T, A) -> Result<(), E> + 'static,
    {
        self.push(Operation::exclusive(
            name,
            vec![TypeInfo::of::<A>()],
            TypeInfo::unit(),
            move |this, args| {
                let this = receiver_mut::<T>(this)?;
                f(this, single_arg::<A>(args)?).map_err(InvokeError::failed)?;
                Ok(Value::unit())
            },
        ))
    }

    /// `fn name(&mut self)`
    pub fn command0<F>(self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut T) + 'static,
    {
        self.push(Operation::exclusive(
            name,
            Vec::new(),
            TypeInfo::unit(),
            move |this, _| {
                f(receiver_mut::<T>(this)?);
                Ok(Value::unit())
            },
        ))
    }

    /// Mark the most recently added operation as non-public
    pub fn restricted(mut self) -> Self {
        if let Some(last) = self.operations.pop() {
            self.operations.push(last.restricted());
        }
        self
    }

    /// Declare that the value returned by the most recently added
    /// operation is also a `Box<S>`.
    pub fn upcast<R, S>(mut self) -> Self
    where
        R: Any + Into<Box<S>>,
        S: ?Sized + 'static,
    {
        if let Some(last) = self.operations.last_mut() {
            let returns = std::mem::replace(&mut last.returns, TypeInfo::unit());
            last.returns = returns.with_upcast(Upcast::new::<R, S>());
        }
        self
    }

    /// All operations, public or not, in the order they were added
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Operations visible to callers outside the type
    pub fn public(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_public())
    }

    /// Number of operations, including restricted ones
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<T: Any> Default for OperationTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OperationTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.operations).finish()
    }
}
