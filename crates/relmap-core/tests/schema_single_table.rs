use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relmap_core::schema::mapping::{
    Bindable, DetachedSession, DiscriminatorValue, ModelPart, TableDetails,
};
use relmap_core::schema::source::*;
use relmap_core::schema::{Builder, Metamodel};
use relmap_core::stmt::{Type, Value};
use std::sync::Arc;
use std_util::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn vehicles() -> Schema {
    Schema::new()
        .entity(
            EntitySource::new("Vehicle")
                .abstract_entity()
                .discriminator(DiscriminatorSource::column("type"))
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::basic("name", Type::String)),
        )
        .entity(
            EntitySource::new("Car")
                .extends("Vehicle")
                .discriminator_value("car")
                .attribute(AttributeSource::basic("doors", Type::I32)),
        )
        .entity(
            EntitySource::new("Truck")
                .extends("Vehicle")
                .discriminator_value("truck")
                .attribute(AttributeSource::basic("payload", Type::I64)),
        )
}

fn build(schema: Schema) -> Metamodel {
    init_logging();
    assert_ok!(Builder::new().build(schema))
}

#[test]
fn subtypes_share_the_root_table_and_identifier() {
    let metamodel = build(vehicles());

    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();
    let car = metamodel.entity_by_name("Car").unwrap();
    let truck = metamodel.entity_by_name("Truck").unwrap();

    assert_eq!(
        vehicle.table_details,
        vec![TableDetails {
            name: "vehicle".to_string(),
            key_columns: vec!["id".to_string()],
            identifier_table: true,
        }]
    );
    assert_eq!(car.table_details, vehicle.table_details);
    assert_eq!(truck.table_details, vehicle.table_details);

    assert!(Arc::ptr_eq(&car.identifier, &vehicle.identifier));
    assert!(Arc::ptr_eq(&truck.identifier, &vehicle.identifier));
    assert!(Arc::ptr_eq(
        car.discriminator.as_ref().unwrap(),
        vehicle.discriminator.as_ref().unwrap()
    ));

    assert_eq!(car.root(), vehicle.id);
    assert_eq!(car.super_types, [vehicle.id]);
    assert_eq!(vehicle.sub_types, [car.id, truck.id]);
    assert!(vehicle.is_type_or_super_type(car));
    assert!(!car.is_type_or_super_type(truck));
}

#[test]
fn inherited_attributes_come_first() {
    let metamodel = build(vehicles());

    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();
    let car = metamodel.entity_by_name("Car").unwrap();

    let names: Vec<_> = car.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["name", "doors"]);

    let positions: Vec<_> = car
        .attributes
        .iter()
        .map(|a| a.state_array_position)
        .collect();
    assert!(positions.is_contiguous_from(0), "positions={positions:?}");

    assert_eq!(car.inherited_attribute_count, 1);
    assert!(Arc::ptr_eq(&car.attributes[0], &vehicle.attributes[0]));
    assert_eq!(car.declared_attribute_mappings().len(), 1);

    let doors = car.find_attribute_mapping("doors").unwrap();
    assert_eq!(doors.declaring_type, "Car");
    assert_eq!(doors.role.full_path(), "Car.doors");

    let selectable = &doors.expect_basic().selectable;
    assert_eq!(selectable.table, "vehicle");
    assert_eq!(selectable.expression, "doors");
    assert!(selectable.nullable);
}

#[test]
fn entity_selectables_are_contiguous() {
    let metamodel = build(vehicles());
    let car = metamodel.entity_by_name("Car").unwrap();

    let mut positions = vec![];
    let mut columns = vec![];
    let mut offset = car.identifier.for_each_selectable(0, &mut |i, selectable| {
        positions.push(i);
        columns.push(selectable.expression.clone());
    });

    for attribute in &car.attributes {
        let span = attribute.for_each_selectable(offset, &mut |i, selectable| {
            positions.push(i);
            columns.push(selectable.expression.clone());
        });
        assert_eq!(span, attribute.jdbc_type_count());
        offset += span;
    }

    assert!(positions.is_contiguous_from(0), "positions={positions:?}");
    assert_eq!(columns, ["id", "name", "doors"]);
    assert_unique!(columns);
}

#[test]
fn discriminator_resolves_each_entity() {
    let metamodel = build(vehicles());
    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();
    let car = metamodel.entity_by_name("Car").unwrap();

    let discriminator = vehicle.discriminator.as_ref().unwrap();
    assert_eq!(discriminator.selectable.expression, "type");
    assert_eq!(discriminator.selectable.table, "vehicle");
    assert!(!discriminator.selectable.nullable);
    assert!(!discriminator.selectable.updatable);
    assert!(discriminator.has_physical_column());
    assert_eq!(discriminator.role.full_path(), "Vehicle.{discriminator}");

    let resolved = metamodel
        .resolve_discriminated_entity(vehicle, &Value::from("car"))
        .unwrap();
    assert_eq!(resolved.name, "Car");

    let resolved = metamodel
        .resolve_discriminated_entity(vehicle, &Value::from("truck"))
        .unwrap();
    assert_eq!(resolved.name, "Truck");

    assert_eq!(
        car.discriminator_value,
        Some(DiscriminatorValue::Literal(Value::from("car")))
    );
    assert_eq!(
        car.discriminator_relational_value().unwrap(),
        Some(Value::from("car"))
    );
}

#[test]
fn unknown_discriminator_value_is_an_error() {
    let metamodel = build(vehicles());
    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();

    let err = assert_err!(metamodel.resolve_discriminated_entity(vehicle, &Value::from("bus")));
    assert!(err.is_unknown_discriminator());

    let msg = err.to_string();
    assert!(
        msg.contains("bus") && msg.contains("Vehicle"),
        "expected error to name the value and hierarchy, got: {msg}"
    );
}

#[test]
fn sub_parts_are_found_through_subtypes() {
    let metamodel = build(vehicles());
    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();
    let car = metamodel.entity_by_name("Car").unwrap();
    let truck = metamodel.entity_by_name("Truck").unwrap();

    let doors = vehicle.find_sub_part(&metamodel, "doors", None).unwrap().unwrap();
    assert_eq!(doors.expect_attribute().declaring_type, "Car");

    let doors = vehicle
        .find_sub_part(&metamodel, "doors", Some(car))
        .unwrap()
        .unwrap();
    assert_eq!(doors.expect_attribute().name, "doors");
    assert_none!(vehicle.find_sub_part(&metamodel, "doors", Some(truck)).unwrap());

    let id = vehicle.find_sub_part(&metamodel, "id", None).unwrap().unwrap();
    assert!(id.as_identifier().is_some());
    assert!(vehicle
        .find_sub_part(&metamodel, "{id}", None)
        .unwrap()
        .is_some());

    let discriminator = car
        .find_sub_part(&metamodel, "{discriminator}", None)
        .unwrap()
        .unwrap();
    assert!(discriminator.is_discriminator());

    assert_none!(vehicle.find_sub_part(&metamodel, "wheels", None).unwrap());
}

fn sized_vehicles(truck_size: Type) -> Schema {
    Schema::new()
        .entity(
            EntitySource::new("Vehicle")
                .abstract_entity()
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("Car").extends("Vehicle").attribute(
                AttributeSource::basic("size", Type::I32).column(ColumnSource::new("car_size")),
            ),
        )
        .entity(
            EntitySource::new("Truck").extends("Vehicle").attribute(
                AttributeSource::basic("size", truck_size).column(ColumnSource::new("truck_size")),
            ),
        )
}

#[test]
fn subtype_attributes_with_different_types_are_ambiguous() {
    let metamodel = build(sized_vehicles(Type::String));
    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();
    let truck = metamodel.entity_by_name("Truck").unwrap();

    let err = assert_err!(vehicle.find_sub_part(&metamodel, "size", None));
    assert!(err.is_illegal_argument());

    let msg = err.to_string();
    assert!(
        msg.contains("Car.size") && msg.contains("Truck.size"),
        "expected error to name both attributes, got: {msg}"
    );

    // Narrowing to one subtype removes the ambiguity
    let size = vehicle
        .find_sub_part(&metamodel, "size", Some(truck))
        .unwrap()
        .unwrap();
    assert_eq!(size.expect_attribute().declaring_type, "Truck");
}

#[test]
fn subtype_attributes_with_the_same_type_resolve_to_the_first() {
    let metamodel = build(sized_vehicles(Type::I32));
    let vehicle = metamodel.entity_by_name("Vehicle").unwrap();

    let size = vehicle.find_sub_part(&metamodel, "size", None).unwrap().unwrap();
    assert_eq!(size.expect_attribute().declaring_type, "Car");
}

#[test]
fn instances_hold_identifier_then_state() {
    let metamodel = build(vehicles());
    let car = metamodel.entity_by_name("Car").unwrap();

    let mut instance = car.instantiate();
    assert_eq!(car.instance_len(), 3);
    assert!(car.identifier.is_unsaved(&instance).unwrap());

    car.identifier
        .set_identifier(&mut instance, Value::from(7_i64))
        .unwrap();
    car.find_attribute_mapping("doors")
        .unwrap()
        .set_value(&mut instance, Value::from(4))
        .unwrap();

    assert_eq!(car.identifier.get_identifier(&instance).unwrap(), Value::I64(7));
    assert!(!car.identifier.is_unsaved(&instance).unwrap());
    assert_eq!(
        car.extract_state(&instance).unwrap(),
        [Value::Null, Value::I32(4)]
    );

    let mut bound = vec![];
    let doors = car.find_attribute_mapping("doors").unwrap();
    doors
        .for_each_jdbc_value(&Value::from(4), 2, &DetachedSession, &mut |i, value, _| {
            bound.push((i, value.clone()));
        })
        .unwrap();
    assert_eq!(bound, [(2, Value::I32(4))]);
}

#[test]
fn single_table_subtype_cannot_declare_a_table() {
    init_logging();

    let schema = vehicles().entity(
        EntitySource::new("Bike")
            .extends("Vehicle")
            .table("bikes")
            .discriminator_value("bike"),
    );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Bike") && msg.contains("root's table"),
        "expected error to name the subtype, got: {msg}"
    );
}

#[test]
fn implicit_discriminator_uses_entity_names() {
    let schema = Schema::new()
        .entity(
            EntitySource::new("Animal")
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(EntitySource::new("Dog").extends("Animal"))
        .entity(EntitySource::new("Cat").extends("Animal"));

    let metamodel = build(schema);
    let animal = metamodel.entity_by_name("Animal").unwrap();
    let discriminator = animal.discriminator.as_ref().unwrap();

    assert_eq!(discriminator.selectable.expression, "DTYPE");
    assert_eq!(discriminator.selectable.jdbc_mapping.domain_ty, Type::String);

    let dog = metamodel
        .resolve_discriminated_entity(animal, &Value::from("Dog"))
        .unwrap();
    assert_eq!(dog.name, "Dog");
    assert_eq!(
        dog.discriminator_value,
        Some(DiscriminatorValue::Literal(Value::from("Dog")))
    );
    assert_eq!(
        animal.discriminator_relational_value().unwrap(),
        Some(Value::from("Animal"))
    );
}

#[test]
fn builder_config_names_tables_and_discriminators() {
    init_logging();

    let schema = Schema::new()
        .entity(
            EntitySource::new("Animal")
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(EntitySource::new("Dog").extends("Animal"));

    let mut builder = Builder::new();
    builder
        .table_name_prefix("zoo_")
        .implicit_discriminator_column("kind");

    let metamodel = assert_ok!(builder.build(schema));
    let dog = metamodel.entity_by_name("Dog").unwrap();

    assert_eq!(dog.mapped_table_details().name, "zoo_animal");
    assert_eq!(
        dog.discriminator.as_ref().unwrap().selectable.expression,
        "kind"
    );
}

#[test]
fn entity_without_subtypes_has_no_implicit_discriminator() {
    let schema = Schema::new().entity(
        EntitySource::new("Tag").attribute(AttributeSource::basic("id", Type::I64).id()),
    );

    let metamodel = build(schema);
    let tag = metamodel.entity_by_name("Tag").unwrap();

    assert_none!(tag.discriminator);
    assert_none!(tag.discriminator_value);
    assert_eq!(tag.discriminator_relational_value().unwrap(), None);
}

/// A root with `counts[0]` attributes and one subtype per remaining count.
fn generated_hierarchy(counts: &[usize]) -> Schema {
    let mut root =
        EntitySource::new("Root").attribute(AttributeSource::basic("id", Type::I64).id());

    for i in 0..counts[0] {
        root = root.attribute(AttributeSource::basic(format!("root{i}"), Type::I32));
    }

    let mut schema = Schema::new().entity(root);

    for (n, count) in counts.iter().enumerate().skip(1) {
        let mut sub = EntitySource::new(format!("Sub{n}")).extends("Root");
        for i in 0..*count {
            sub = sub.attribute(AttributeSource::basic(format!("sub{n}x{i}"), Type::String));
        }
        schema = schema.entity(sub);
    }

    schema
}

proptest! {
    #[test]
    fn selectable_positions_are_contiguous(
        counts in prop::collection::vec(0usize..4, 1..5),
        offset in 0usize..8,
    ) {
        let metamodel = build(generated_hierarchy(&counts));

        for entity in metamodel.entities() {
            let positions: Vec<_> = entity
                .attributes
                .iter()
                .map(|attribute| attribute.state_array_position)
                .collect();
            prop_assert!(positions.is_contiguous_from(0), "positions={:?}", positions);

            let mut visited = vec![];
            let mut span = 0;
            for attribute in &entity.attributes {
                span += attribute.for_each_selectable(offset + span, &mut |i, _| visited.push(i));
            }

            let expected: usize = entity.attributes.iter().map(|a| a.jdbc_type_count()).sum();
            prop_assert_eq!(span, expected);
            prop_assert_eq!(visited, (offset..offset + span).collect::<Vec<_>>());
        }
    }
}
