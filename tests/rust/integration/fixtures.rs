// Domain types shared by the integration tests
use std::sync::Arc;

use cyphercraft::{Client, GraphEntity, TypeCatalog, TypeDescriptor};

pub struct Person;
pub struct Movie;
pub struct Company;
pub struct Year;
pub struct Event;
pub struct Knows;
pub struct Directed;
pub struct ActedIn;
pub struct WorksAt;
pub struct In;

/// Never registered in the test catalog
pub struct Unregistered;

impl GraphEntity for Person {
    const TYPE_NAME: &'static str = "Person";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::node(Self::TYPE_NAME, "Person")
            .with_property("name", "name")
            .with_property("age", "age")
            .with_property("nationality", "nationality")
            .with_property("found", "found")
            .with_property("last_seen", "lastSeen")
            .with_property("position", "position")
            .with_property("surname", "surname")
    }
}

impl GraphEntity for Movie {
    const TYPE_NAME: &'static str = "Movie";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::node(Self::TYPE_NAME, "Movie")
            .with_property("title", "title")
            .with_property("released", "released")
    }
}

impl GraphEntity for Company {
    const TYPE_NAME: &'static str = "Company";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::node(Self::TYPE_NAME, "Company").with_property("name", "name")
    }
}

impl GraphEntity for Year {
    const TYPE_NAME: &'static str = "Year";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::node(Self::TYPE_NAME, "Year").with_property("year", "year")
    }
}

impl GraphEntity for Event {
    const TYPE_NAME: &'static str = "Event";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::node(Self::TYPE_NAME, "Event")
            .with_property("id", "id")
            .with_property("year", "year")
    }
}

impl GraphEntity for Knows {
    const TYPE_NAME: &'static str = "Knows";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::relationship(Self::TYPE_NAME, "KNOWS")
    }
}

impl GraphEntity for Directed {
    const TYPE_NAME: &'static str = "Directed";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::relationship(Self::TYPE_NAME, "DIRECTED")
    }
}

impl GraphEntity for ActedIn {
    const TYPE_NAME: &'static str = "ActedIn";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::relationship(Self::TYPE_NAME, "ACTED_IN").with_property("role", "role")
    }
}

impl GraphEntity for WorksAt {
    const TYPE_NAME: &'static str = "WorksAt";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::relationship(Self::TYPE_NAME, "WORKS_AT")
    }
}

impl GraphEntity for In {
    const TYPE_NAME: &'static str = "In";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::relationship(Self::TYPE_NAME, "IN")
    }
}

impl GraphEntity for Unregistered {
    const TYPE_NAME: &'static str = "Unregistered";

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::node(Self::TYPE_NAME, "Unregistered")
    }
}

pub fn catalog() -> Arc<TypeCatalog> {
    let mut catalog = TypeCatalog::new();
    catalog.register::<Person>().unwrap();
    catalog.register::<Movie>().unwrap();
    catalog.register::<Company>().unwrap();
    catalog.register::<Year>().unwrap();
    catalog.register::<Event>().unwrap();
    catalog.register::<Knows>().unwrap();
    catalog.register::<Directed>().unwrap();
    catalog.register::<ActedIn>().unwrap();
    catalog.register::<WorksAt>().unwrap();
    catalog.register::<In>().unwrap();
    Arc::new(catalog)
}

pub fn client() -> Client {
    let _ = env_logger::builder().is_test(true).try_init();
    Client::new(catalog())
}
