use sovran_propmap::{
    assign, assign_in_place, AccessDenied, Introspect, InvokeError, MapError, Mapper, Operation,
    OperationTable, SetterArity, TypeInfo, Value,
};
use std::any::Any;
use std::cell::Cell;

#[derive(Debug, thiserror::Error)]
#[error("sensor offline")]
struct SensorOffline;

#[derive(Debug, thiserror::Error)]
#[error("value rejected: {0}")]
struct Rejected(i32);

struct Sensor {
    first: i32,
    online: bool,
    third: i32,
}

impl Introspect for Sensor {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .query("getFirst", |s: &Sensor| s.first)
            .try_query("getSecond", |s: &Sensor| {
                if s.online {
                    Ok(2i32)
                } else {
                    Err(SensorOffline)
                }
            })
            .query("getThird", |s: &Sensor| s.third)
    }
}

#[derive(Default)]
struct Reading {
    first: Option<i32>,
    second: Option<i32>,
    third: Option<i32>,
}

impl Introspect for Reading {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .command("setFirst", |r: &mut Reading, v: i32| r.first = Some(v))
            .command("setSecond", |r: &mut Reading, v: i32| r.second = Some(v))
            .try_command("setThird", |r: &mut Reading, v: i32| {
                if v < 0 {
                    return Err(Rejected(v));
                }
                r.third = Some(v);
                Ok(())
            })
    }
}

#[test]
fn test_getter_failure_aborts_remaining_pairs() {
    let sensor = Sensor {
        first: 1,
        online: false,
        third: 3,
    };
    let mut reading = Reading::default();

    let err = assign(&mut reading, &sensor).unwrap_err();

    match &err {
        MapError::Invocation {
            operation,
            source: InvokeError::Failed(cause),
        } => {
            assert_eq!(operation, "getSecond");
            assert!(cause.downcast_ref::<SensorOffline>().is_some());
        }
        other => panic!("Expected invocation failure, got {:?}", other),
    }
    assert_eq!(err.to_string(), "invocation of `getSecond` failed: sensor offline");

    // Pairs before the failure ran, pairs after it did not
    assert_eq!(reading.first, Some(1));
    assert_eq!(reading.second, None);
    assert_eq!(reading.third, None);
}

#[test]
fn test_setter_failure_is_reported_with_cause() {
    let sensor = Sensor {
        first: 1,
        online: true,
        third: -4,
    };
    let mut reading = Reading::default();

    match assign(&mut reading, &sensor) {
        Err(MapError::Invocation {
            operation,
            source: InvokeError::Failed(cause),
        }) => {
            assert_eq!(operation, "setThird");
            assert_eq!(cause.to_string(), "value rejected: -4");
        }
        other => panic!("Expected invocation failure, got {:?}", other),
    }
    assert_eq!(reading.first, Some(1));
    assert_eq!(reading.second, Some(2));
    assert_eq!(reading.third, None);
}

// Getters that need `&mut self`
struct Cursor {
    position: u32,
}

impl Introspect for Cursor {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .query_mut("getPosition", |c: &mut Cursor| {
                c.position += 1;
                c.position
            })
            .command("setPosition", |c: &mut Cursor, p: u32| c.position = p)
    }
}

#[test]
fn test_exclusive_getter_on_shared_source_is_access_failure() {
    let source = Cursor { position: 4 };
    let mut target = Cursor { position: 0 };

    let err = assign(&mut target, &source).unwrap_err();

    assert!(matches!(
        err,
        MapError::Access {
            reason: AccessDenied::ExclusiveReceiver,
            ..
        }
    ));
    assert_eq!(err.operation(), "getPosition");
    assert_eq!(source.position, 4);
    assert_eq!(target.position, 0);
}

#[test]
fn test_exclusive_getter_allowed_in_place() -> Result<(), MapError> {
    let mut cursor = Cursor { position: 4 };
    assign_in_place(&mut cursor)?;
    // The getter advanced to 5 and the setter stored what it read
    assert_eq!(cursor.position, 5);
    Ok(())
}

// Restricted operations are never discovered
struct Vault {
    code: u32,
    reads: Cell<u32>,
}

impl Introspect for Vault {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .query("getCode", |v: &Vault| {
                v.reads.set(v.reads.get() + 1);
                v.code
            })
            .restricted()
    }
}

#[derive(Default)]
struct CodeSink {
    code: Option<u32>,
}

impl Introspect for CodeSink {
    fn operations() -> OperationTable<Self> {
        OperationTable::new().command("setCode", |s: &mut CodeSink, c: u32| s.code = Some(c))
    }
}

#[test]
fn test_restricted_getter_is_not_discovered() -> Result<(), MapError> {
    let vault = Vault {
        code: 1234,
        reads: Cell::new(0),
    };
    let mut sink = CodeSink::default();

    assign(&mut sink, &vault)?;

    assert_eq!(sink.code, None);
    assert_eq!(vault.reads.get(), 0);
    Ok(())
}

// Zero-parameter setters
struct Named {
    name: String,
}

impl Introspect for Named {
    fn operations() -> OperationTable<Self> {
        OperationTable::new().query("getName", |n: &Named| n.name.clone())
    }
}

#[derive(Default)]
struct Resettable {
    name: String,
    resets: u32,
}

impl Introspect for Resettable {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .command0("setName", |r: &mut Resettable| {
                r.name.clear();
                r.resets += 1;
            })
            .command("setName", |r: &mut Resettable, name: String| r.name = name)
    }
}

#[test]
fn test_lenient_parameterless_setter_fails() {
    let mut target = Resettable::default();
    let err = assign(&mut target, &Named { name: "Ada".to_string() }).unwrap_err();

    assert!(matches!(
        err,
        MapError::Invocation {
            source: InvokeError::MissingParameter,
            ..
        }
    ));
    assert_eq!(err.operation(), "setName");
    assert_eq!(target.name, "");
    assert_eq!(target.resets, 0);

    assert!(Mapper::new().plan::<Resettable, Named>().is_err());
}

#[test]
fn test_strict_parameterless_setter_is_skipped() -> Result<(), MapError> {
    let mapper = Mapper::new().setter_arity(SetterArity::Strict);
    let mut target = Resettable::default();

    mapper.assign(&mut target, &Named { name: "Ada".to_string() })?;

    assert_eq!(target.name, "Ada");
    assert_eq!(target.resets, 0);
    assert_eq!(mapper.plan::<Resettable, Named>()?.len(), 1);
    Ok(())
}

#[test]
fn test_parameterless_setter_without_getter_is_harmless() -> Result<(), MapError> {
    struct Nothing;
    impl Introspect for Nothing {
        fn operations() -> OperationTable<Self> {
            OperationTable::new()
        }
    }

    let mut target = Resettable::default();
    assign(&mut target, &Nothing)?;
    assert_eq!(target.resets, 0);
    Ok(())
}

// Operations built by hand and added with `push`
struct Origin {
    x: i32,
}

impl Introspect for Origin {
    fn operations() -> OperationTable<Self> {
        OperationTable::new().push(Operation::shared(
            "getX",
            Vec::new(),
            TypeInfo::of::<i32>(),
            |this: &dyn Any, _args| {
                let origin = this
                    .downcast_ref::<Origin>()
                    .ok_or(InvokeError::ReceiverType { expected: "Origin" })?;
                Ok(Value::new(origin.x))
            },
        ))
    }
}

fn point_mut(this: &mut dyn Any) -> Result<&mut Point, InvokeError> {
    this.downcast_mut::<Point>()
        .ok_or(InvokeError::ReceiverType { expected: "Point" })
}

#[derive(Default)]
struct Point {
    x: i32,
}

impl Introspect for Point {
    fn operations() -> OperationTable<Self> {
        OperationTable::new().push(Operation::exclusive(
            "setX",
            vec![TypeInfo::of::<i32>()],
            TypeInfo::unit(),
            |this: &mut dyn Any, args: Vec<Value>| {
                let x = args
                    .into_iter()
                    .next()
                    .and_then(|v| v.downcast::<i32>().ok())
                    .ok_or(InvokeError::MissingParameter)?;
                point_mut(this)?.x = x;
                Ok(Value::unit())
            },
        ))
    }
}

#[test]
fn test_pushed_operations_are_paired() -> Result<(), MapError> {
    let mut point = Point::default();
    assign(&mut point, &Origin { x: 9 })?;
    assert_eq!(point.x, 9);
    Ok(())
}

// `setX(i32, i32)` still counts as a setter for `X` under the lenient policy
#[derive(Default)]
struct Scaled {
    x: i32,
    calls: u32,
}

impl Introspect for Scaled {
    fn operations() -> OperationTable<Self> {
        OperationTable::new().push(Operation::exclusive(
            "setX",
            vec![TypeInfo::of::<i32>(), TypeInfo::of::<i32>()],
            TypeInfo::unit(),
            |this: &mut dyn Any, args: Vec<Value>| {
                let scaled = this
                    .downcast_mut::<Scaled>()
                    .ok_or(InvokeError::ReceiverType { expected: "Scaled" })?;
                let mut args = args.into_iter().map(|v| v.downcast::<i32>().ok());
                let x = args.next().flatten().ok_or(InvokeError::MissingParameter)?;
                let scale = args.next().flatten().ok_or(InvokeError::MissingParameter)?;
                scaled.x = x * scale;
                scaled.calls += 1;
                Ok(Value::unit())
            },
        ))
    }
}

#[test]
fn test_two_parameter_setter_fails_with_arity() {
    let mut target = Scaled::default();

    let err = assign(&mut target, &Origin { x: 9 }).unwrap_err();

    match &err {
        MapError::Invocation {
            operation,
            source: InvokeError::Arity { expected, found },
        } => {
            assert_eq!(operation, "setX");
            assert_eq!((*expected, *found), (2, 1));
        }
        other => panic!("Expected arity failure, got {:?}", other),
    }
    assert_eq!(target.x, 0);
    assert_eq!(target.calls, 0);
}

#[test]
fn test_two_parameter_setter_skipped_when_strict() -> Result<(), MapError> {
    let mapper = Mapper::new().setter_arity(SetterArity::Strict);
    let mut target = Scaled::default();

    mapper.assign(&mut target, &Origin { x: 9 })?;

    assert_eq!(target.calls, 0);
    Ok(())
}

// A getter whose body returns something other than its declared type
struct Liar {
    reads: Cell<u32>,
}

impl Introspect for Liar {
    fn operations() -> OperationTable<Self> {
        OperationTable::new().push(Operation::shared(
            "getX",
            Vec::new(),
            TypeInfo::of::<i32>(),
            |this: &dyn Any, _args| {
                if let Some(liar) = this.downcast_ref::<Liar>() {
                    liar.reads.set(liar.reads.get() + 1);
                }
                Ok(Value::new("nope"))
            },
        ))
    }
}

#[test]
fn test_mistyped_getter_result_is_blamed_on_getter() {
    let liar = Liar {
        reads: Cell::new(0),
    };
    let mut point = Point { x: 5 };

    let err = assign(&mut point, &liar).unwrap_err();

    assert!(matches!(
        err,
        MapError::Invocation {
            source: InvokeError::ReturnType {
                expected: "i32",
                found: "&str",
            },
            ..
        }
    ));
    assert_eq!(err.operation(), "getX");
    assert_eq!(liar.reads.get(), 1);
    assert_eq!(point.x, 5);
}
