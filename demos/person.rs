use sovran_propmap::{assign, Introspect, InvokeError, MapError, OperationTable};

#[derive(Debug, thiserror::Error)]
#[error("age {0} is out of range")]
struct InvalidAge(i32);

// What arrives over the wire
struct PersonDto {
    name: String,
    age: i32,
    nickname: String,
}

impl Introspect for PersonDto {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .query("getName", |p: &PersonDto| p.name.clone())
            .query("getAge", |p: &PersonDto| p.age)
            .query("getNickname", |p: &PersonDto| p.nickname.clone())
    }
}

// What gets stored; it has no nickname
#[derive(Debug, Default)]
struct PersonEntity {
    name: String,
    age: i32,
}

impl Introspect for PersonEntity {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .command("setName", |p: &mut PersonEntity, name: String| p.name = name)
            .try_command("setAge", |p: &mut PersonEntity, age: i32| {
                if !(0..=150).contains(&age) {
                    return Err(InvalidAge(age));
                }
                p.age = age;
                Ok(())
            })
    }
}

fn main() -> Result<(), MapError> {
    env_logger::init();

    let dto = PersonDto {
        name: "Ada".to_string(),
        age: 36,
        nickname: "Enchantress of Numbers".to_string(),
    };
    let mut entity = PersonEntity::default();
    assign(&mut entity, &dto)?;
    println!("Stored: {:?} (nickname '{}' had nowhere to go)", entity, dto.nickname);

    let bad = PersonDto {
        name: "Methuselah".to_string(),
        age: 969,
        nickname: String::new(),
    };
    let mut entity = PersonEntity::default();
    match assign(&mut entity, &bad) {
        Ok(()) => println!("This shouldn't happen"),
        Err(MapError::Invocation {
            operation,
            source: InvokeError::Failed(cause),
        }) => println!("{} rejected the value: {}", operation, cause),
        Err(e) => println!("Unexpected error: {}", e),
    }
    // Name was copied before the age failed
    println!("Partially filled: {:?}", entity);

    Ok(())
}
