use banded::types::{AccessorTable, Adapted};
use banded::{Band, Element, Group, Object, SubReport, Value};
use serde_json::{Value as Json, json};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone)]
pub struct Line {
    pub sku: String,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub region: String,
    pub lines: Vec<Line>,
}

impl Order {
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.quantity as f64 * l.price).sum()
    }
}

fn line_table() -> Arc<AccessorTable<Line>> {
    static TABLE: OnceLock<Arc<AccessorTable<Line>>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            Arc::new(
                AccessorTable::new()
                    .field("sku", |l: &Line| l.sku.clone().into())
                    .field("quantity", |l: &Line| l.quantity.into())
                    .field("price", |l: &Line| l.price.into())
                    .identity(|l| l.sku.clone()),
            )
        })
        .clone()
}

fn order_table() -> Arc<AccessorTable<Order>> {
    static TABLE: OnceLock<Arc<AccessorTable<Order>>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            Arc::new(
                AccessorTable::new()
                    .field("id", |o: &Order| o.id.into())
                    .field("region", |o: &Order| o.region.clone().into())
                    .field("lines", |o: &Order| {
                        Value::List(
                            o.lines
                                .iter()
                                .map(|l| Value::Object(Adapted::object(l.clone(), line_table())))
                                .collect(),
                        )
                    })
                    .method("total", |o: &Order| o.total().into())
                    .identity(|o| format!("order-{}", o.id)),
            )
        })
        .clone()
}

pub fn line(sku: &str, quantity: i64, price: f64) -> Line {
    Line {
        sku: sku.to_string(),
        quantity,
        price,
    }
}

pub fn order(id: i64, region: &str, lines: Vec<Line>) -> Object {
    Adapted::object(
        Order {
            id,
            region: region.to_string(),
            lines,
        },
        order_table(),
    )
}

/// Three orders over two regions, already sorted by region.
pub fn orders() -> Vec<Object> {
    vec![
        order(1, "east", vec![line("A-1", 2, 1.5), line("B-2", 1, 4.0)]),
        order(2, "east", vec![]),
        order(3, "west", vec![line("C-3", 3, 2.0)]),
    ]
}

pub fn order_detail() -> Band {
    Band::new(14.0)
        .with_element(Element::object_value("id"))
        .with_element(Element::object_value("total").at(200.0, 0.0))
}

pub fn lines_subreport() -> SubReport {
    SubReport::new("{object}.lines")
        .with_header(Band::new(10.0).with_element(Element::label("Lines")))
        .with_detail(
            Band::new(10.0)
                .with_element(Element::object_value("sku"))
                .with_element(Element::object_value("quantity").at(100.0, 0.0)),
        )
}

pub fn region_group() -> Group {
    Group::new("region")
        .with_header(Band::new(12.0).with_element(Element::object_value("region")))
        .with_footer(Band::new(12.0).with_element(Element::label("end of region")))
}

/// A JSON definition exercising most options.
pub fn invoice_definition() -> Json {
    json!({
        "title": "Invoices",
        "author": "Accounts",
        "pageSize": "a4",
        "margins": "2cm",
        "begin": { "elements": [
            { "kind": { "type": "systemField", "field": "reportTitle" } }
        ] },
        "detail": { "height": 16, "elements": [
            { "kind": { "type": "objectValue", "attributeName": "number" } },
            { "kind": { "type": "objectValue", "attributeName": "issued", "format": "%d.%m.%Y" }, "left": 120 }
        ] },
        "groups": [{
            "attributeName": "customer",
            "header": { "elements": [
                { "kind": { "type": "objectValue", "attributeName": "customer" } }
            ] }
        }],
        "subreports": [{
            "queryExpression": "sort_by({object}.items, 'name')",
            "detail": { "elements": [
                { "kind": { "type": "label", "text": "-" } },
                { "kind": { "type": "objectValue", "attributeName": "name" }, "left": 10 }
            ] }
        }],
        "summary": { "elements": [
            { "kind": { "type": "systemField", "field": "objectCount" } }
        ] }
    })
}

pub fn invoice_data() -> Json {
    json!([
        { "number": "INV-1", "customer": "acme", "issued": "2024-01-05",
          "items": [{ "name": "widget" }, { "name": "bolt" }] },
        { "number": "INV-2", "customer": "acme", "issued": "2024-02-11", "items": [] },
        { "number": "INV-3", "customer": "zeta", "issued": "2024-03-20",
          "items": [{ "name": "gear" }] }
    ])
}
