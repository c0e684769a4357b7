use pretty_assertions::assert_eq;
use relmap_core::schema::mapping::{Bindable, DetachedSession, ModelPart};
use relmap_core::schema::source::*;
use relmap_core::schema::{Builder, Metamodel};
use relmap_core::stmt::{Type, Value};
use std_util::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(schema: Schema) -> Metamodel {
    init_logging();
    assert_ok!(Builder::new().build(schema))
}

fn orders() -> Schema {
    Schema::new()
        .embeddable(
            EmbeddableSource::new("OrderId")
                .attribute(AttributeSource::basic("customerId", Type::I64).required())
                .attribute(AttributeSource::basic("orderNum", Type::I32).required()),
        )
        .entity(
            EntitySource::new("Order")
                .table("orders")
                .attribute(AttributeSource::composite("pk", "OrderId").embedded_id())
                .attribute(AttributeSource::basic("total", Type::I64)),
        )
}

fn line_items(id_class: EmbeddableSource) -> Schema {
    Schema::new().embeddable(id_class).entity(
        EntitySource::new("LineItem")
            .id_class("LineItemId")
            .attribute(AttributeSource::basic("orderId", Type::I64).id())
            .attribute(AttributeSource::basic("lineNo", Type::I32).id())
            .attribute(AttributeSource::basic("quantity", Type::I32)),
    )
}

fn line_item_id() -> EmbeddableSource {
    // Declared in a different order than the `@Id` attributes
    EmbeddableSource::new("LineItemId")
        .attribute(AttributeSource::basic("lineNo", Type::I32))
        .attribute(AttributeSource::basic("orderId", Type::I64))
}

fn selectable_columns(part: &dyn ModelPart) -> Vec<String> {
    let mut columns = vec![];
    part.for_each_selectable(0, &mut |_, selectable| {
        columns.push(selectable.expression.clone())
    });
    columns
}

#[test]
fn simple_identifier() {
    let schema = Schema::new().entity(
        EntitySource::new("Product")
            .attribute(
                AttributeSource::basic("id", Type::I64)
                    .id()
                    .column(ColumnSource::new("product_id")),
            )
            .attribute(AttributeSource::basic("name", Type::String)),
    );

    let metamodel = build(schema);
    let product = metamodel.entity_by_name("Product").unwrap();
    let identifier = &product.identifier;

    assert!(identifier.is_simple());
    assert_eq!(identifier.part_name(), "id");
    assert_eq!(identifier.role.full_path(), "Product.id");
    assert_eq!(identifier.slot_count(), 1);
    assert!(!identifier.has_containing_class());
    assert_eq!(identifier.instantiate(), Value::Null);

    let mut selectables = vec![];
    identifier.for_each_selectable(0, &mut |_, selectable| selectables.push(selectable.clone()));
    assert_eq!(selectables.len(), 1);
    assert_eq!(selectables[0].expression, "product_id");
    assert_eq!(selectables[0].table, "product");
    assert!(!selectables[0].nullable);
    assert!(!selectables[0].updatable);

    assert_eq!(product.identifier_table_details().key_columns, ["product_id"]);
}

#[test]
fn embedded_id_maps_each_part() {
    let metamodel = build(orders());
    let order = metamodel.entity_by_name("Order").unwrap();
    let identifier = &order.identifier;

    assert!(identifier.is_aggregated());
    assert!(identifier.has_containing_class());
    assert_eq!(identifier.part_name(), "pk");
    assert_eq!(identifier.role.full_path(), "Order.pk");
    assert_eq!(identifier.slot_count(), 1);
    assert_eq!(identifier.jdbc_type_count(), 2);

    assert_eq!(selectable_columns(&**identifier), ["customer_id", "order_num"]);
    assert_eq!(
        order.identifier_table_details().key_columns,
        ["customer_id", "order_num"]
    );
    assert_eq!(order.mapped_table_details().name, "orders");

    let embeddable = metamodel.embeddable("Order.pk").unwrap();
    assert_eq!(embeddable.name, "OrderId");
    assert!(!embeddable.is_polymorphic());

    let customer_id = identifier.find_sub_part("customerId").unwrap();
    assert_eq!(customer_id.role.full_path(), "Order.pk.customerId");
    assert_eq!(customer_id.declaring_type, "OrderId");

    let selectable = &customer_id.expect_basic().selectable;
    assert!(!selectable.nullable);
    assert_eq!(selectable.path.to_string(), "pk.customer_id");

    let pk = order.find_sub_part(&metamodel, "pk", None).unwrap().unwrap();
    assert!(pk.as_identifier().is_some());
}

#[test]
fn embedded_id_values_disassemble_in_selectable_order() {
    let metamodel = build(orders());
    let order = metamodel.entity_by_name("Order").unwrap();
    let identifier = &order.identifier;

    let id = Value::record_from_vec(vec![Value::I64(7), Value::I32(3)]);

    let mut selectables = vec![];
    identifier.for_each_selectable(0, &mut |i, selectable| {
        selectables.push((i, selectable.jdbc_mapping.clone()))
    });

    let mut values = vec![];
    let count = identifier
        .for_each_jdbc_value(&id, 0, &DetachedSession, &mut |i, value, jdbc_mapping| {
            values.push((i, value.clone(), jdbc_mapping.clone()))
        })
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        values.iter().map(|(i, value, _)| (*i, value.clone())).collect::<Vec<_>>(),
        [(0, Value::I64(7)), (1, Value::I32(3))]
    );

    for ((i, _, jdbc_mapping), (j, expected)) in values.iter().zip(&selectables) {
        assert_eq!(i, j);
        assert_eq!(jdbc_mapping, expected);
    }
}

#[test]
fn embedded_id_lives_in_the_first_instance_field() {
    let metamodel = build(orders());
    let order = metamodel.entity_by_name("Order").unwrap();

    let mut instance = order.instantiate();
    assert_eq!(order.instance_len(), 2);

    let id = Value::record_from_vec(vec![Value::I64(7), Value::Null]);
    order
        .identifier
        .set_identifier(&mut instance, id.clone())
        .unwrap();

    assert_eq!(order.identifier.get_identifier(&instance).unwrap(), id);

    // Any null part leaves the entity unsaved
    assert!(order.identifier.is_unsaved(&instance).unwrap());

    let total = order.find_attribute_mapping("total").unwrap();
    assert_eq!(total.state_array_position, 0);
    total.set_value(&mut instance, Value::I64(250)).unwrap();

    assert_eq!(
        instance,
        Value::record_from_vec(vec![id, Value::I64(250)])
    );
}

#[test]
fn id_class_follows_the_id_attribute_order() {
    let metamodel = build(line_items(line_item_id()));
    let line_item = metamodel.entity_by_name("LineItem").unwrap();
    let identifier = &line_item.identifier;

    assert!(identifier.is_non_aggregated());
    assert!(identifier.has_containing_class());
    assert_eq!(identifier.part_name(), "{id}");
    assert_eq!(identifier.slot_count(), 2);
    assert_eq!(identifier.attribute_names(), ["orderId", "lineNo"]);

    let id_class = identifier.mapped_id_embeddable_type().unwrap();
    assert_eq!(id_class.name, "LineItemId");

    let names: Vec<_> = id_class.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["orderId", "lineNo"]);

    assert!(metamodel.embeddable("LineItem.{id}").is_some());
    assert!(metamodel.embeddable("LineItem.{id-class}").is_some());

    assert_eq!(selectable_columns(&**identifier), ["order_id", "line_no"]);

    let line_no = line_item
        .find_sub_part(&metamodel, "lineNo", None)
        .unwrap()
        .unwrap()
        .expect_attribute();
    assert_eq!(line_no.declaring_type, "LineItemId");
}

#[test]
fn id_attributes_occupy_leading_instance_fields() {
    let metamodel = build(line_items(line_item_id()));
    let line_item = metamodel.entity_by_name("LineItem").unwrap();
    let identifier = &line_item.identifier;

    let mapper = identifier.identifier_value_mapper().unwrap();
    assert!(mapper.is_id_class());

    let mut instance = line_item.instantiate();
    assert_eq!(line_item.instance_len(), 3);

    let quantity = line_item.find_attribute_mapping("quantity").unwrap();
    assert_eq!(quantity.state_array_position, 0);
    quantity.set_value(&mut instance, Value::I32(12)).unwrap();

    let id = Value::record_from_vec(vec![Value::I64(5), Value::I32(2)]);
    identifier.set_identifier(&mut instance, id.clone()).unwrap();

    assert_eq!(
        instance,
        Value::record_from_vec(vec![Value::I64(5), Value::I32(2), Value::I32(12)])
    );
    assert_eq!(identifier.get_identifier(&instance).unwrap(), id);
    assert_eq!(line_item.extract_state(&instance).unwrap(), [Value::I32(12)]);

    let err = assert_err!(identifier.set_identifier(&mut instance, Value::I64(5)));
    assert!(err.is_illegal_argument());
}

#[test]
fn id_class_attribute_types_must_match() {
    init_logging();

    let id_class = EmbeddableSource::new("LineItemId")
        .attribute(AttributeSource::basic("orderId", Type::I64))
        .attribute(AttributeSource::basic("lineNo", Type::I64));

    let err = assert_err!(Builder::new().build(line_items(id_class)));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("LineItem.lineNo"),
        "expected error to name the mismatched attribute, got: {msg}"
    );
}

#[test]
fn id_class_must_cover_every_id_attribute() {
    init_logging();

    let id_class = EmbeddableSource::new("LineItemId")
        .attribute(AttributeSource::basic("orderId", Type::I64))
        .attribute(AttributeSource::basic("position", Type::I32));

    let err = assert_err!(Builder::new().build(line_items(id_class)));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("lineNo") && msg.contains("LineItemId"),
        "expected error to name the missing attribute, got: {msg}"
    );
}

#[test]
fn entity_without_identifier() {
    init_logging();

    let schema = Schema::new().entity(
        EntitySource::new("Note").attribute(AttributeSource::basic("body", Type::String)),
    );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Note") && msg.contains("no identifier"),
        "expected error to name the entity, got: {msg}"
    );
}

#[test]
fn subclass_cannot_redeclare_the_identifier() {
    init_logging();

    let schema = Schema::new()
        .entity(
            EntitySource::new("Account").attribute(AttributeSource::basic("id", Type::I64).id()),
        )

        .entity(
            EntitySource::new("Savings")
                .extends("Account")
                .attribute(AttributeSource::basic("savingsId", Type::I64).id()),
        );

    let err = assert_err!(Builder::new().build(schema));
    assert!(err.is_invalid_mapping());

    let msg = err.to_string();
    assert!(
        msg.contains("Savings.savingsId"),
        "expected error to name the subclass attribute, got: {msg}"
    );
}
