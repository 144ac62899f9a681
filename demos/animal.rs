use sovran_propmap::{assign, Introspect, MapError, Mapper, OperationTable};

// Example trait: Animal
trait Animal {
    fn make_sound(&self) -> &str;
    fn name(&self) -> &str;
}

#[derive(Clone)]
struct Dog {
    name: String,
}

impl Animal for Dog {
    fn make_sound(&self) -> &str {
        "Woof!"
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl From<Dog> for Box<dyn Animal> {
    fn from(dog: Dog) -> Self {
        Box::new(dog)
    }
}

// Adoption form produces a concrete Dog
struct AdoptionForm {
    owner: String,
    dog: Dog,
}

impl Introspect for AdoptionForm {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .query("getOwner", |f: &AdoptionForm| f.owner.clone())
            .query("getPet", |f: &AdoptionForm| f.dog.clone())
            .upcast::<Dog, dyn Animal>()
    }
}

// Household accepts any animal
#[derive(Default)]
struct Household {
    owner: String,
    pet: Option<Box<dyn Animal>>,
}

impl Introspect for Household {
    fn operations() -> OperationTable<Self> {
        OperationTable::new()
            .command("setOwner", |h: &mut Household, owner: String| h.owner = owner)
            .command("setPet", |h: &mut Household, pet: Box<dyn Animal>| {
                h.pet = Some(pet)
            })
    }
}

fn main() -> Result<(), MapError> {
    env_logger::init();

    let form = AdoptionForm {
        owner: "Alice".to_string(),
        dog: Dog {
            name: "Rover".to_string(),
        },
    };

    // Show what will be copied before doing it
    for m in Mapper::new().plan::<Household, AdoptionForm>()? {
        println!(
            "{} -> {} ({} into {})",
            m.getter, m.setter, m.value_type, m.parameter_type
        );
    }

    let mut home = Household::default();
    assign(&mut home, &form)?;

    match &home.pet {
        Some(pet) => println!(
            "{} adopted {}, who says {}",
            home.owner,
            pet.name(),
            pet.make_sound()
        ),
        None => println!("{} has no pet", home.owner),
    }

    Ok(())
}
