use pretty_assertions::assert_eq;
use relmap_core::schema::mapping::{
    AssociationKey, Bindable, Cardinality, CollectionPartKind, DetachedSession, ModelPart, Nature,
    Session,
};
use relmap_core::schema::source::*;
use relmap_core::schema::{Builder, Metamodel};
use relmap_core::stmt::{EntityProxy, Type, Value};
use std::sync::Arc;
use std_util::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(schema: Schema) -> Metamodel {
    init_logging();
    assert_ok!(Builder::new().build(schema))
}

/// Loads every customer as `(id, "C-<id>", orders)`.
struct CustomerSession;

impl Session for CustomerSession {
    fn initialize_proxy(&self, proxy: &EntityProxy) -> relmap_core::Result<Value> {
        Ok(Value::record_from_vec(vec![
            (*proxy.id).clone(),
            Value::from(format!("C-{}", proxy.id)),
            Value::Null,
        ]))
    }
}

fn shop() -> Schema {
    Schema::new()
        .entity(
            EntitySource::new("Customer")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(
                    AttributeSource::basic("code", Type::String)
                        .column(ColumnSource::new("code").unique()),
                )
                .attribute(AttributeSource::plural(
                    "orders",
                    PluralSource::bag(ElementSource::one_to_many("PurchaseOrder"))
                        .mapped_by("customer"),
                )),
        )
        .entity(
            EntitySource::new("PurchaseOrder")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::many_to_one(
                    "customer",
                    ToOneSource::new("Customer"),
                )),
        )
        .entity(
            EntitySource::new("Invoice")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::many_to_one(
                    "customer",
                    ToOneSource::new("Customer").references("code"),
                )),
        )
}

fn proxy(id: i64) -> Value {
    EntityProxy::new("Customer", id).into()
}

#[test]
fn many_to_one_references_the_target_identifier() {
    let metamodel = build(shop());
    let order = metamodel.entity_by_name("PurchaseOrder").unwrap();

    let customer = order.find_attribute_mapping("customer").unwrap();
    let to_one = customer.expect_to_one();

    assert_eq!(to_one.cardinality, Cardinality::ManyToOne);
    assert_eq!(to_one.associated_entity, "Customer");
    assert_eq!(to_one.side_nature, Nature::Key);
    assert!(to_one.is_reference_to_primary_key());
    assert!(to_one.is_fk_optimization_allowed());
    assert_eq!(to_one.identifying_columns_table(), "purchase_order");

    let foreign_key = &to_one.foreign_key;
    assert_eq!(foreign_key.role.full_path(), "PurchaseOrder.customer.{fk}");
    assert_eq!(
        foreign_key.association_key(),
        AssociationKey::new("purchase_order", vec!["customer_id".to_string()])
    );
    assert_eq!(foreign_key.target_table(), "customer");
    assert_eq!(foreign_key.target_selectables().column_names(), ["id"]);
    assert!(foreign_key.is_simple());

    let key = foreign_key.key_selectables().get(0).unwrap();
    assert!(key.nullable);
    assert_eq!(key.path.to_string(), "customer.customer_id");

    assert_eq!(customer.jdbc_type_count(), 1);
}

#[test]
fn bidirectional_one_to_many_shares_the_foreign_key() {
    let metamodel = build(shop());
    let customer = metamodel.entity_by_name("Customer").unwrap();
    let order = metamodel.entity_by_name("PurchaseOrder").unwrap();

    let owning = order
        .find_attribute_mapping("customer")
        .unwrap()
        .expect_to_one();
    let orders = customer
        .find_attribute_mapping("orders")
        .unwrap()
        .expect_plural();

    assert!(Arc::ptr_eq(&orders.key_descriptor, &owning.foreign_key));
    assert_eq!(
        orders.key_descriptor.association_key(),
        owning.foreign_key.association_key()
    );
    assert_eq!(owning.bidirectional_attribute.as_deref(), Some("orders"));

    assert!(orders.is_inverse());
    assert_eq!(orders.collection_table, "purchase_order");
    assert_eq!(orders.element.associated_entity(), Some("PurchaseOrder"));
    assert!(matches!(
        orders.element.kind,
        CollectionPartKind::OneToMany { .. }
    ));

    let registered = metamodel
        .foreign_key(&AssociationKey::new(
            "purchase_order",
            vec!["customer_id".to_string()],
        ))
        .unwrap();
    assert!(Arc::ptr_eq(registered, &owning.foreign_key));

    // PurchaseOrder.customer and Invoice.customer
    assert_eq!(metamodel.foreign_keys().count(), 2);
}

#[test]
fn proxy_identifier_is_read_without_a_session() {
    let metamodel = build(shop());
    let order = metamodel.entity_by_name("PurchaseOrder").unwrap();
    let to_one = order
        .find_attribute_mapping("customer")
        .unwrap()
        .expect_to_one();

    assert_eq!(
        to_one.key_value(&proxy(5), &DetachedSession).unwrap(),
        Value::I64(5)
    );
    assert_eq!(
        to_one.key_value(&Value::Null, &DetachedSession).unwrap(),
        Value::Null
    );

    let customer = metamodel.entity_by_name("Customer").unwrap();
    let mut loaded = customer.instantiate();
    customer
        .identifier
        .set_identifier(&mut loaded, Value::I64(9))
        .unwrap();
    assert_eq!(
        to_one.key_value(&loaded, &DetachedSession).unwrap(),
        Value::I64(9)
    );

    let mut bound = vec![];
    order
        .find_attribute_mapping("customer")
        .unwrap()
        .for_each_jdbc_value(&proxy(5), 0, &DetachedSession, &mut |i, value, _| {
            bound.push((i, value.clone()))
        })
        .unwrap();
    assert_eq!(bound, [(0, Value::I64(5))]);
}

#[test]
fn non_identifier_reference_initializes_the_proxy() {
    let metamodel = build(shop());
    let invoice = metamodel.entity_by_name("Invoice").unwrap();
    let to_one = invoice
        .find_attribute_mapping("customer")
        .unwrap()
        .expect_to_one();

    assert!(!to_one.is_reference_to_primary_key());
    assert_eq!(
        to_one.foreign_key.association_key(),
        AssociationKey::new("invoice", vec!["customer_code".to_string()])
    );
    assert_eq!(to_one.foreign_key.target_selectables().column_names(), ["code"]);

    let err = assert_err!(to_one.key_value(&proxy(5), &DetachedSession));
    assert!(err.is_lazy_initialization());

    let msg = err.to_string();
    assert!(msg.contains("Customer"), "expected error to name the entity, got: {msg}");

    assert_eq!(
        to_one.key_value(&proxy(5), &CustomerSession).unwrap(),
        Value::from("C-5")
    );
}

#[test]
fn inverse_one_to_one_owns_no_columns() {
    let schema = Schema::new()
        .entity(
            EntitySource::new("Person")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::one_to_one(
                    "passport",
                    ToOneSource::new("Passport").mapped_by("owner"),
                )),
        )
        .entity(
            EntitySource::new("Passport")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::one_to_one(
                    "owner",
                    ToOneSource::new("Person").join_column("person_id"),
                )),
        );

    let metamodel = build(schema);
    let person = metamodel.entity_by_name("Person").unwrap();
    let passport = metamodel.entity_by_name("Passport").unwrap();

    let inverse_attribute = person.find_attribute_mapping("passport").unwrap();
    let inverse = inverse_attribute.expect_to_one();
    let owning = passport
        .find_attribute_mapping("owner")
        .unwrap()
        .expect_to_one();

    assert_eq!(inverse.cardinality, Cardinality::OneToOne);
    assert!(inverse.is_mapped_by());
    assert!(!inverse.is_fk_optimization_allowed());
    assert!(Arc::ptr_eq(&inverse.foreign_key, &owning.foreign_key));
    assert_eq!(inverse.bidirectional_attribute.as_deref(), Some("owner"));
    assert_eq!(owning.bidirectional_attribute.as_deref(), Some("passport"));

    assert_eq!(
        owning.foreign_key.association_key(),
        AssociationKey::new("passport", vec!["person_id".to_string()])
    );
    assert_eq!(inverse.identifying_columns_table(), "person");

    assert_eq!(inverse_attribute.jdbc_type_count(), 0);
    assert_eq!(inverse_attribute.for_each_selectable(0, &mut |_, _| {}), 0);
    assert!(inverse.key_selectables().unwrap_err().is_unsupported());
    assert_eq!(
        inverse_attribute
            .disassemble(&Value::from(EntityProxy::new("Passport", 1_i64)), &DetachedSession)
            .unwrap(),
        Value::Null
    );
}

#[test]
fn many_to_many_sides_swap_foreign_keys() {
    let schema = Schema::new()
        .entity(
            EntitySource::new("Student")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::plural(
                    "courses",
                    PluralSource::set(ElementSource::many_to_many("Course")),
                )),
        )
        .entity(
            EntitySource::new("Course")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::plural(
                    "students",
                    PluralSource::set(ElementSource::many_to_many("Student")).mapped_by("courses"),
                )),
        );

    let metamodel = build(schema);
    let student = metamodel.entity_by_name("Student").unwrap();
    let course = metamodel.entity_by_name("Course").unwrap();

    let courses = student
        .find_attribute_mapping("courses")
        .unwrap()
        .expect_plural();
    let students = course
        .find_attribute_mapping("students")
        .unwrap()
        .expect_plural();

    assert_eq!(courses.collection_table, "student_courses");
    assert_eq!(students.collection_table, "student_courses");
    assert!(!courses.is_inverse());
    assert!(students.is_inverse());

    assert_eq!(
        courses.key_descriptor.association_key(),
        AssociationKey::new("student_courses", vec!["student_id".to_string()])
    );

    let CollectionPartKind::ManyToMany {
        foreign_key: element_key,
        entity,
    } = &courses.element.kind
    else {
        panic!("expected many-to-many element; actual={:#?}", courses.element);
    };
    assert_eq!(entity, "Course");
    assert_eq!(element_key.role.full_path(), "Student.courses.{element}.{fk}");
    assert_eq!(
        element_key.association_key(),
        AssociationKey::new("student_courses", vec!["courses_id".to_string()])
    );

    assert!(Arc::ptr_eq(&students.key_descriptor, element_key));

    let CollectionPartKind::ManyToMany { foreign_key, .. } = &students.element.kind else {
        panic!("expected many-to-many element; actual={:#?}", students.element);
    };
    assert!(Arc::ptr_eq(foreign_key, &courses.key_descriptor));

    assert_eq!(metamodel.foreign_keys().count(), 2);
}

#[test]
fn list_of_basic_values() {
    let schema = Schema::new().entity(
        EntitySource::new("Customer")
            .attribute(AttributeSource::basic("id", Type::I64).id())
            .attribute(AttributeSource::plural(
                "tags",
                PluralSource::list(BasicSource::new(Type::String), BasicSource::new(Type::I32)),
            )),
    );

    let metamodel = build(schema);
    let customer = metamodel.entity_by_name("Customer").unwrap();
    let tags_attribute = customer.find_attribute_mapping("tags").unwrap();
    let tags = tags_attribute.expect_plural();

    assert_eq!(tags.collection_table, "customer_tags");
    assert!(tags.is_indexed());
    assert!(tags_attribute.metadata.lazy);
    assert_eq!(
        tags.key_descriptor.association_key(),
        AssociationKey::new("customer_tags", vec!["customer_id".to_string()])
    );

    let mut columns = vec![];
    let span = tags_attribute.for_each_selectable(0, &mut |i, selectable| {
        columns.push((i, selectable.expression.clone(), selectable.path.to_string()))
    });
    assert_eq!(span, 2);
    assert_eq!(
        columns,
        [
            (0, "tags".to_string(), "{element}".to_string()),
            (1, "tags_order".to_string(), "{index}".to_string()),
        ]
    );

    assert_eq!(tags.find_part("{index}").unwrap().role.full_path(), "Customer.tags.{index}");

    let entry = Value::record_from_vec(vec![Value::from("vip"), Value::I32(0)]);
    let mut bound = vec![];
    tags_attribute
        .for_each_jdbc_value(&entry, 0, &DetachedSession, &mut |i, value, _| {
            bound.push((i, value.clone()))
        })
        .unwrap();
    assert_eq!(bound, [(0, Value::from("vip")), (1, Value::I32(0))]);
}

#[test]
fn list_without_index_is_rejected() {
    init_logging();

    let mut tags = PluralSource::list(BasicSource::new(Type::String), BasicSource::new(Type::I32));
    tags.index = None;

    let schema = Schema::new().entity(
        EntitySource::new("Customer")
            .attribute(AttributeSource::basic("id", Type::I64).id())
            .attribute(AttributeSource::plural("tags", tags)),
    );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Customer.tags") && msg.contains("index"),
        "expected error to name the collection, got: {msg}"
    );
}

#[test]
fn mapped_by_unknown_attribute() {
    init_logging();

    let schema = Schema::new()
        .entity(
            EntitySource::new("Customer")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::plural(
                    "orders",
                    PluralSource::bag(ElementSource::one_to_many("PurchaseOrder"))
                        .mapped_by("buyer"),
                )),
        )
        .entity(
            EntitySource::new("PurchaseOrder")
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Customer.orders") && msg.contains("PurchaseOrder.buyer"),
        "expected error to name both sides, got: {msg}"
    );
}

#[test]
fn many_to_one_cannot_be_mapped_by() {
    init_logging();

    let schema = Schema::new()
        .entity(
            EntitySource::new("Person")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::many_to_one(
                    "passport",
                    ToOneSource::new("Passport").mapped_by("owner"),
                )),
        )
        .entity(
            EntitySource::new("Passport")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::one_to_one("owner", ToOneSource::new("Person"))),
        );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Person.passport") && msg.contains("one-to-one"),
        "expected error to name the attribute, got: {msg}"
    );
}

#[test]
fn associations_inside_embeddables_are_rejected() {
    init_logging();

    let schema = Schema::new()
        .embeddable(
            EmbeddableSource::new("Shipping")
                .attribute(AttributeSource::basic("street", Type::String))
                .attribute(AttributeSource::many_to_one("carrier", ToOneSource::new("Carrier"))),
        )
        .entity(
            EntitySource::new("Carrier").attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("Shipment")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::composite("shipping", "Shipping")),
        );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Shipping.carrier"),
        "expected error to name the embedded association, got: {msg}"
    );
}

#[test]
fn join_column_count_must_match_the_referenced_key() {
    init_logging();

    let schema = Schema::new()
        .entity(
            EntitySource::new("Customer")
                .attribute(AttributeSource::basic("id", Type::I64).id()),
        )
        .entity(
            EntitySource::new("PurchaseOrder")
                .attribute(AttributeSource::basic("id", Type::I64).id())
                .attribute(AttributeSource::many_to_one(
                    "customer",
                    ToOneSource::new("Customer")
                        .join_column("customer_region")
                        .join_column("customer_id"),
                )),
        );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("PurchaseOrder.customer") && msg.contains("2 join columns"),
        "expected error to name the attribute, got: {msg}"
    );
}

#[test]
fn to_one_unknown_target() {
    init_logging();

    let schema = Schema::new().entity(
        EntitySource::new("PurchaseOrder")
            .attribute(AttributeSource::basic("id", Type::I64).id())
            .attribute(AttributeSource::many_to_one("customer", ToOneSource::new("Client"))),
    );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("unknown entity `Client`"),
        "expected error to name the missing entity, got: {msg}"
    );
}
