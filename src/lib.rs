//! # sovran-propmap
//!
//! Copy property values between unrelated types by matching getters to setters.
//!
//! `sovran-propmap` discovers the operations of two objects at runtime and
//! pairs every `getX` on the source with every `setX` on the target whose
//! parameter type accepts the getter's value. It is meant for DTO-to-entity
//! style copying where writing field-by-field assignments is tedious and the
//! two types share no trait.
//!
//! ## Key Features
//!
//! - **Runtime discovery**: types describe their operations once through
//!   [`Introspect`]; pairing happens at call time
//! - **Type-safe**: values only flow where the declared types allow it; no
//!   numeric widening or other coercion
//! - **Trait upcasting**: a `Dog` can be stored through a `Box<dyn Animal>`
//!   setter once `Dog: Into<Box<dyn Animal>>` is declared
//! - **Fail fast**: the first failing getter or setter stops the assignment
//! - **No macros**: pure runtime solution built from closures
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_propmap::{assign, Introspect, MapError, OperationTable};
//!
//! struct PersonDto {
//!     name: String,
//!     age: i32,
//! }
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl Introspect for PersonDto {
//!     fn operations() -> OperationTable<Self> {
//!         OperationTable::new()
//!             .query("getName", |p: &PersonDto| p.name.clone())
//!             .query("getAge", |p: &PersonDto| p.age)
//!     }
//! }
//!
//! impl Introspect for Person {
//!     fn operations() -> OperationTable<Self> {
//!         OperationTable::new()
//!             .command("setName", |p: &mut Person, name: String| p.name = name)
//!             .command("setAge", |p: &mut Person, age: i32| p.age = age)
//!     }
//! }
//!
//! fn main() -> Result<(), MapError> {
//!     let dto = PersonDto { name: "Ada".to_string(), age: 30 };
//!     let mut person = Person::default();
//!
//!     assign(&mut person, &dto)?;
//!
//!     assert_eq!(person.name, "Ada");
//!     assert_eq!(person.age, 30);
//!     Ok(())
//! }
//! ```
//!
//! ### Storing a Subtype Through a Trait Object
//!
//! ```rust
//! use sovran_propmap::{assign, Introspect, MapError, OperationTable};
//!
//! trait Animal {
//!     fn sound(&self) -> String;
//! }
//!
//! #[derive(Clone)]
//! struct Dog;
//!
//! impl Animal for Dog {
//!     fn sound(&self) -> String { "Woof".to_string() }
//! }
//!
//! impl From<Dog> for Box<dyn Animal> {
//!     fn from(dog: Dog) -> Self { Box::new(dog) }
//! }
//!
//! struct Kennel {
//!     dog: Dog,
//! }
//!
//! #[derive(Default)]
//! struct Shelter {
//!     pet: Option<Box<dyn Animal>>,
//! }
//!
//! impl Introspect for Kennel {
//!     fn operations() -> OperationTable<Self> {
//!         OperationTable::new()
//!             .query("getPet", |k: &Kennel| k.dog.clone())
//!             .upcast::<Dog, dyn Animal>()
//!     }
//! }
//!
//! impl Introspect for Shelter {
//!     fn operations() -> OperationTable<Self> {
//!         OperationTable::new()
//!             .command("setPet", |s: &mut Shelter, pet: Box<dyn Animal>| s.pet = Some(pet))
//!     }
//! }
//!
//! let mut shelter = Shelter::default();
//! assign(&mut shelter, &Kennel { dog: Dog })?;
//! assert_eq!(shelter.pet.map(|p| p.sound()), Some("Woof".to_string()));
//! # Ok::<(), MapError>(())
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_propmap::{assign, Introspect, InvokeError, MapError, OperationTable};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("name must not be empty")]
//! struct EmptyName;
//!
//! struct Form {
//!     name: String,
//! }
//!
//! #[derive(Default)]
//! struct Account {
//!     name: String,
//! }
//!
//! impl Introspect for Form {
//!     fn operations() -> OperationTable<Self> {
//!         OperationTable::new().query("getName", |f: &Form| f.name.clone())
//!     }
//! }
//!
//! impl Introspect for Account {
//!     fn operations() -> OperationTable<Self> {
//!         OperationTable::new().try_command("setName", |a: &mut Account, name: String| {
//!             if name.is_empty() {
//!                 return Err(EmptyName);
//!             }
//!             a.name = name;
//!             Ok(())
//!         })
//!     }
//! }
//!
//! let mut account = Account::default();
//! match assign(&mut account, &Form { name: String::new() }) {
//!     Err(MapError::Invocation { operation, source: InvokeError::Failed(cause) }) => {
//!         assert_eq!(operation, "setName");
//!         assert!(cause.downcast_ref::<EmptyName>().is_some());
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

mod any_value;
mod classify;
mod config;
mod error;
mod mapper;
mod operation;
mod types;

pub use any_value::Value;
pub use classify::{Accessor, AccessorKind, GETTER_PREFIX, SETTER_PREFIX};
pub use config::{MapperConfig, SetterArity};
pub use error::{AccessDenied, BoxError, InvokeError, MapError};
pub use mapper::{assign, assign_in_place, Mapper, PropertyMatch};
pub use operation::{
    ExclusiveFn, Introspect, Operation, OperationTable, Receiver, SharedFn, Visibility,
};
pub use types::{TypeInfo, Upcast};

/// Classify operations without running an assignment
pub mod accessors {
    pub use crate::classify::{getter, getters, setter, setters};
}
