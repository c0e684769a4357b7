use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relmap_core::schema::mapping::{
    Bindable, DetachedSession, DiscriminatorConverter, DiscriminatorValue,
};
use relmap_core::schema::source::*;
use relmap_core::schema::{Builder, Metamodel};
use relmap_core::stmt::{Type, TypeEnum, Value, ValueEnum};
use std_util::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(schema: Schema) -> Metamodel {
    init_logging();
    assert_ok!(Builder::new().build(schema))
}

fn kind() -> TypeEnum {
    TypeEnum::new("PartyKind", ["PERSON", "COMPANY"])
}

fn constant(name: &str) -> Value {
    ValueEnum::from_name(&kind(), name).unwrap().into()
}

fn parties(discriminator: DiscriminatorSource, person: Value, company: Value) -> Schema {
    Schema::new()
        .entity(
            EntitySource::new("Party")
                .abstract_entity()
                .discriminator(discriminator)
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("Person")
                .extends("Party")
                .discriminator_value(person),
        )
        .entity(
            EntitySource::new("Company")
                .extends("Party")
                .discriminator_value(company),
        )
}

#[test]
fn enum_name_discriminator() {
    let discriminator = DiscriminatorSource::column("kind")
        .ty(kind())
        .converter(ConverterSource::EnumName);

    let metamodel = build(parties(discriminator, "PERSON".into(), "COMPANY".into()));
    let party = metamodel.entity_by_name("Party").unwrap();
    let person = metamodel.entity_by_name("Person").unwrap();

    let mapping = party.discriminator.as_ref().unwrap();
    assert_eq!(mapping.selectable.jdbc_mapping.relational_ty(), Type::String);
    assert_eq!(mapping.selectable.jdbc_mapping.domain_ty, Type::Enum(kind()));

    assert_eq!(
        person.discriminator_value,
        Some(DiscriminatorValue::Literal(Value::from("PERSON")))
    );

    let resolved = metamodel
        .resolve_discriminated_entity(party, &Value::from("COMPANY"))
        .unwrap();
    assert_eq!(resolved.name, "Company");

    // Enum constants match through their name
    let resolved = metamodel
        .resolve_discriminated_entity(party, &constant("PERSON"))
        .unwrap();
    assert_eq!(resolved.name, "Person");
}

#[test]
fn enum_ordinal_discriminator() {
    let discriminator = DiscriminatorSource::column("kind")
        .ty(kind())
        .converter(ConverterSource::EnumOrdinal);

    let metamodel = build(parties(discriminator, constant("PERSON"), constant("COMPANY")));
    let party = metamodel.entity_by_name("Party").unwrap();
    let company = metamodel.entity_by_name("Company").unwrap();

    assert_eq!(
        company.discriminator_value,
        Some(DiscriminatorValue::Literal(Value::I32(1)))
    );
    assert_eq!(
        company.discriminator_relational_value().unwrap(),
        Some(Value::I32(1))
    );

    let resolved = metamodel
        .resolve_discriminated_entity(party, &Value::I32(0))
        .unwrap();
    assert_eq!(resolved.name, "Person");

    let resolved = metamodel
        .resolve_discriminated_entity(party, &constant("COMPANY"))
        .unwrap();
    assert_eq!(resolved.name, "Company");
}

#[test]
fn integer_discriminator_parses_declared_strings() {
    let discriminator = DiscriminatorSource::column("party_type").ty(Type::I32);

    let metamodel = build(parties(discriminator, "1".into(), Value::I32(2)));
    let party = metamodel.entity_by_name("Party").unwrap();
    let person = metamodel.entity_by_name("Person").unwrap();

    assert_eq!(
        person.discriminator_value,
        Some(DiscriminatorValue::Literal(Value::I32(1)))
    );

    let resolved = metamodel
        .resolve_discriminated_entity(party, &Value::I32(2))
        .unwrap();
    assert_eq!(resolved.name, "Company");

    // Abstract roots without a value have no registered value
    assert_none!(party.discriminator_value);

    let err = assert_err!(metamodel.resolve_discriminated_entity(party, &Value::I32(3)));
    assert!(err.is_unknown_discriminator());
}

#[test]
fn integer_discriminator_matches_any_integer_width() {
    let discriminator = DiscriminatorSource::column("party_type").ty(Type::I32);

    let metamodel = build(parties(discriminator, Value::I32(1), Value::I32(2)));
    let party = metamodel.entity_by_name("Party").unwrap();

    for value in [Value::I8(1), Value::I16(1), Value::I64(1)] {
        let resolved = metamodel
            .resolve_discriminated_entity(party, &value)
            .unwrap();
        assert_eq!(resolved.name, "Person", "value={value:?}");
    }

    let resolved = metamodel
        .resolve_discriminated_entity(party, &Value::I64(2))
        .unwrap();
    assert_eq!(resolved.name, "Company");

    // Too wide for the column
    let err = assert_err!(metamodel.resolve_discriminated_entity(party, &Value::I64(i64::MAX)));
    assert!(err.is_unknown_discriminator());

    let err = assert_err!(metamodel.resolve_discriminated_entity(party, &Value::from("1")));
    assert!(err.is_unknown_discriminator());
}

#[test]
fn details_are_found_by_entity_and_type_name() {
    let schema = Schema::new()
        .entity(
            EntitySource::new("Party")
                .abstract_entity()
                .discriminator(DiscriminatorSource::column("kind"))
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("Person")
                .type_name("crm::Person")
                .extends("Party")
                .discriminator_value("P"),
        );

    let metamodel = build(schema);
    let party = metamodel.entity_by_name("Party").unwrap();
    let converter = &party.discriminator.as_ref().unwrap().converter;

    let by_entity = converter.details_for_entity_name("Person").unwrap();
    let by_type = converter.details_for_entity_name("crm::Person").unwrap();
    assert_eq!(by_entity, by_type);
    assert_eq!(by_entity.value, DiscriminatorValue::Literal(Value::from("P")));

    let err = assert_err!(converter.details_for_entity_name("Robot"));
    assert!(err.is_unknown_entity_name());
}

#[test]
fn invalid_integer_discriminator_value() {
    init_logging();

    let discriminator = DiscriminatorSource::column("party_type").ty(Type::I32);

    let err = assert_err!(
        Builder::new().build(parties(discriminator, "one".into(), Value::I32(2)))
    );
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Person") && msg.contains("\"one\""),
        "expected error to name the entity and value, got: {msg}"
    );
}

#[test]
fn concrete_root_needs_an_explicit_value() {
    init_logging();

    let schema = Schema::new()
        .entity(
            EntitySource::new("Party")
                .discriminator(DiscriminatorSource::column("party_type").ty(Type::I32))
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("Person")
                .extends("Party")
                .discriminator_value(1),
        );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("[Party]") && msg.contains("needs an explicit value"),
        "expected error to name the root, got: {msg}"
    );
}

#[test]
fn null_and_not_null_sentinels() {
    let schema = Schema::new()
        .entity(
            EntitySource::new("Payment")
                .discriminator(DiscriminatorSource::column("method"))
                .discriminator_value(DiscriminatorMatch::Null)
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("CardPayment")
                .extends("Payment")
                .discriminator_value("card"),
        )
        .entity(
            EntitySource::new("OtherPayment")
                .extends("Payment")
                .discriminator_value(DiscriminatorMatch::NotNull),
        );

    let metamodel = build(schema);
    let payment = metamodel.entity_by_name("Payment").unwrap();
    let other = metamodel.entity_by_name("OtherPayment").unwrap();

    let discriminator = payment.discriminator.as_ref().unwrap();
    assert!(discriminator.selectable.nullable);

    let resolve = |value: Value| {
        metamodel
            .resolve_discriminated_entity(payment, &value)
            .map(|entity| entity.name.clone())
    };

    assert_eq!(resolve(Value::Null).unwrap(), "Payment");
    assert_eq!(resolve(Value::from("card")).unwrap(), "CardPayment");
    assert_eq!(resolve(Value::from("cash")).unwrap(), "OtherPayment");
    assert_eq!(resolve(Value::from("wire")).unwrap(), "OtherPayment");

    assert_eq!(payment.discriminator_value, Some(DiscriminatorValue::Null));
    assert_eq!(
        payment.discriminator_relational_value().unwrap(),
        Some(Value::Null)
    );

    assert_eq!(other.discriminator_value, Some(DiscriminatorValue::NotNull));
    let err = assert_err!(other.discriminator_relational_value());
    assert!(err.is_illegal_state());
}

#[test]
fn null_without_sentinel_is_unknown() {
    let metamodel = build(parties(
        DiscriminatorSource::column("kind"),
        "P".into(),
        "C".into(),
    ));
    let party = metamodel.entity_by_name("Party").unwrap();

    let err = assert_err!(metamodel.resolve_discriminated_entity(party, &Value::Null));
    assert!(err.is_unknown_discriminator());

    assert!(!party.discriminator.as_ref().unwrap().selectable.nullable);
}

#[test]
fn duplicate_discriminator_values() {
    init_logging();

    let schema = parties(DiscriminatorSource::column("kind"), "x".into(), "x".into());

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("is used by both") && msg.contains("Person") && msg.contains("Company"),
        "expected error to name both entities, got: {msg}"
    );
}

#[test]
fn formula_discriminator() {
    let formula = "case when vat_id is null then 'P' else 'C' end";
    let discriminator = DiscriminatorSource::formula(formula).forced();

    let metamodel = build(parties(discriminator, "P".into(), "C".into()));
    let party = metamodel.entity_by_name("Party").unwrap();
    let mapping = party.discriminator.as_ref().unwrap();

    assert!(!mapping.has_physical_column());
    assert!(mapping.is_forced());
    assert!(mapping.selectable.is_formula());
    assert_eq!(mapping.selectable.expression, formula);
    assert!(!mapping.selectable.insertable);

    let resolved = metamodel
        .resolve_discriminated_entity(party, &Value::from("C"))
        .unwrap();
    assert_eq!(resolved.name, "Company");
}

#[test]
fn discriminator_binds_entity_names() {
    let metamodel = build(parties(
        DiscriminatorSource::column("kind"),
        "P".into(),
        "C".into(),
    ));
    let party = metamodel.entity_by_name("Party").unwrap();
    let discriminator = party.discriminator.as_ref().unwrap();

    let mut bound = vec![];
    discriminator
        .for_each_jdbc_value(&Value::from("Company"), 3, &DetachedSession, &mut |i, value, _| {
            bound.push((i, value.clone()))
        })
        .unwrap();
    assert_eq!(bound, [(3, Value::from("C"))]);

    let err = assert_err!(discriminator.disassemble(&Value::from("Robot"), &DetachedSession));
    assert!(err.is_unknown_entity_name());
}

fn hierarchy(values: &[String]) -> Schema {
    let mut schema = Schema::new().entity(
        EntitySource::new("Root")
            .abstract_entity()
            .discriminator(DiscriminatorSource::column("kind"))
            .attribute(AttributeSource::basic("id", Type::I64).id()),
    );

    for (i, value) in values.iter().enumerate() {
        schema = schema.entity(
            EntitySource::new(format!("Sub{i}"))
                .extends("Root")
                .discriminator_value(value.as_str()),
        );
    }

    schema
}

proptest! {
    #[test]
    fn discriminator_values_resolve_to_their_entity(
        values in prop::collection::hash_set("[a-z]{1,8}", 1..6)
    ) {
        let values: Vec<_> = values.into_iter().collect();
        let metamodel = build(hierarchy(&values));
        let root = metamodel.entity_by_name("Root").unwrap();

        for (i, value) in values.iter().enumerate() {
            let entity = metamodel
                .resolve_discriminated_entity(root, &Value::from(value.as_str()))
                .unwrap();
            prop_assert_eq!(&entity.name, &format!("Sub{i}"));
            prop_assert_eq!(
                entity.discriminator_relational_value().unwrap(),
                Some(Value::from(value.as_str()))
            );
        }
    }
}
