use metaform_scaffold::{
    ApiSchema, FieldType, GeneratedForm, Operation, RuleConfig, Scaffold, ScaffoldError,
};
use serde_json::{Value, json};

fn schema(value: Value) -> ApiSchema {
    serde_json::from_value(value).expect("valid schema")
}

fn rules(value: Value) -> RuleConfig {
    RuleConfig::from_value(value).expect("valid rules")
}

fn order_schema() -> ApiSchema {
    schema(json!({
        "definitions": {
            "Order": {
                "properties": {
                    "status": { "type": "string", "enum": ["OPEN", "PAID"] },
                    "total": { "type": "number", "format": "double" }
                }
            }
        }
    }))
}

fn generate_one(schema: &ApiSchema, rules: RuleConfig, definition: &str, operation: Operation) -> GeneratedForm {
    Scaffold::new(schema, rules)
        .unwrap()
        .generate_form(definition, operation)
        .unwrap()
        .expect("definition is not skipped")
}

fn field_names(form: &GeneratedForm) -> Vec<&str> {
    form.form.fields().map(|field| field.name.as_str()).collect()
}

#[test]
fn test_order_create_scenario() {
    let form = generate_one(&order_schema(), RuleConfig::default(), "Order", Operation::Create);

    assert_eq!(form.form_file_name(), "order-create.json");
    assert_eq!(form.locales_file_name(), "order-create-locales.json");

    let document = serde_json::to_value(&form.form).unwrap();
    assert_eq!(
        document,
        json!({
            "title": "[[forms.orderCreate]]",
            "sections": [{
                "fields": [
                    {
                        "name": "status",
                        "type": "select",
                        "title": "[[forms.orderCreate.status]]",
                        "required": false,
                        "options": [
                            { "text": "[[forms.orderCreate.status.OPEN]]", "name": "OPEN" },
                            { "text": "[[forms.orderCreate.status.PAID]]", "name": "PAID" }
                        ]
                    },
                    {
                        "name": "total",
                        "type": "number",
                        "title": "[[forms.orderCreate.total]]",
                        "required": false
                    },
                    {
                        "name": "submit",
                        "type": "submit",
                        "text": "[[forms.orderCreate.save]]"
                    }
                ]
            }]
        })
    );

    assert_eq!(
        form.locales.iter().collect::<Vec<_>>(),
        vec![
            ("forms.orderCreate", "Order"),
            ("forms.orderCreate.status", "status"),
            ("forms.orderCreate.status.OPEN", "OPEN"),
            ("forms.orderCreate.status.PAID", "PAID"),
            ("forms.orderCreate.total", "total"),
            ("forms.orderCreate.save", "Save"),
        ]
    );
}

#[test]
fn test_skip_rule_removes_field_and_locales() {
    let form = generate_one(
        &order_schema(),
        rules(json!({ "Order": { "*": { "fields": { "total": { "skip": true } } } } })),
        "Order",
        Operation::Create,
    );

    assert_eq!(field_names(&form), vec!["status", "submit"]);
    assert!(form.locales.keys().all(|key| !key.contains("total")));
    assert_eq!(form.locales.len(), 5);
}

#[test]
fn test_both_operations_in_order() {
    let generation = Scaffold::new(&order_schema(), RuleConfig::default())
        .unwrap()
        .generate();

    assert!(generation.is_success());
    let files: Vec<String> = generation
        .forms
        .iter()
        .map(GeneratedForm::form_file_name)
        .collect();
    assert_eq!(files, vec!["order-update.json", "order-create.json"]);

    let update = generation.form("Order", Operation::Update).unwrap();
    assert_eq!(update.form.title, "[[forms.orderUpdate]]");
    assert_eq!(update.locales.get("forms.orderUpdate.save"), Some("Save"));
}

#[test]
fn test_enum_properties_become_selects() {
    let schema = schema(json!({
        "definitions": {
            "Item": {
                "properties": {
                    "size": { "type": "integer", "format": "int32", "enum": [1, 2, 3] },
                    "color": { "type": "string", "enum": ["red"] },
                    "kind": { "enum": ["a", "b"] }
                }
            }
        }
    }));
    let form = generate_one(&schema, RuleConfig::default(), "Item", Operation::Update);

    for name in ["size", "color", "kind"] {
        assert_eq!(form.form.field(name).unwrap().field_type, FieldType::Select);
    }
    let size = form.form.field("size").unwrap();
    let options = size.options.as_ref().unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].name, json!(1));
    assert_eq!(options[0].text, "[[forms.itemUpdate.size.1]]");
    assert_eq!(form.locales.get("forms.itemUpdate.size.1"), Some("1"));
}

#[test]
fn test_required_and_titles() {
    let schema = schema(json!({
        "definitions": {
            "Person": {
                "required": ["first_name", "street"],
                "properties": {
                    "first_name": { "type": "string", "description": "First name" },
                    "nickname": { "type": "string", "description": "Nickname" },
                    "home": { "$ref": "#/definitions/Address" }
                }
            },
            "Address": {
                "properties": {
                    "street": { "type": "string", "description": "Street" },
                    "city": { "type": "string", "description": "City" }
                }
            }
        }
    }));
    let form = generate_one(
        &schema,
        rules(json!({ "Person": { "*": { "fields": { "home": { "flatten": true } } } } })),
        "Person",
        Operation::Create,
    );

    assert_eq!(field_names(&form), vec!["firstName", "nickname", "street", "city", "submit"]);

    let required: Vec<(&str, bool)> = form
        .form
        .fields()
        .filter_map(|field| field.required.map(|required| (field.name.as_str(), required)))
        .collect();
    assert_eq!(
        required,
        vec![
            ("firstName", true),
            ("nickname", false),
            ("street", true),
            ("city", false),
        ]
    );

    assert_eq!(form.locales.get("forms.personCreate.firstName"), Some("First name"));
    assert_eq!(form.locales.get("forms.personCreate.street"), Some("Street"));
    for field in form.form.fields().filter(|field| field.field_type.is_visible()) {
        if field.field_type == FieldType::Submit {
            continue;
        }
        let title = field.title.as_deref().unwrap();
        let key = title.trim_start_matches("[[").trim_end_matches("]]");
        assert!(!form.locales.get(key).unwrap().is_empty());
    }
}

#[test]
fn test_prefixed_flatten_field_names() {
    let schema = schema(json!({
        "definitions": {
            "Person": {
                "properties": {
                    "name": { "type": "string" },
                    "home_address": { "$ref": "#/definitions/Address" }
                }
            },
            "Address": {
                "properties": {
                    "street_name": { "type": "string", "description": "Street" },
                    "city": { "type": "string" }
                }
            }
        }
    }));
    let form = generate_one(
        &schema,
        rules(json!({
            "Person": {
                "update": {
                    "fields": {
                        "home_address": { "flatten": true, "prefixFlatProperties": true },
                        "home_address.city": { "type": "hidden" }
                    }
                }
            }
        })),
        "Person",
        Operation::Update,
    );

    assert_eq!(
        field_names(&form),
        vec!["name", "homeAddress.streetName", "homeAddress.city", "submit"]
    );
    assert_eq!(
        form.locales.get("forms.personUpdate.homeAddress.streetName"),
        Some("Street")
    );
    let city = form.form.field("homeAddress.city").unwrap();
    assert_eq!(city.field_type, FieldType::Hidden);
    assert_eq!(city.title, None);
    assert_eq!(city.required, None);
    assert!(!form.locales.contains_key("forms.personUpdate.homeAddress.city"));
}

#[test]
fn test_merged_flatten_collision_merges_attributes() {
    let schema = schema(json!({
        "definitions": {
            "Customer": {
                "properties": {
                    "name": { "type": "string", "description": "Customer" },
                    "code": { "type": "string", "description": "Customer code" },
                    "contact": { "$ref": "#/definitions/Contact" }
                }
            },
            "Contact": {
                "properties": {
                    "name": { "type": "string", "format": "date", "description": "Contact" },
                    "code": { "type": "integer", "format": "int32" }
                }
            }
        }
    }));
    let form = generate_one(
        &schema,
        rules(json!({ "Customer": { "*": { "fields": { "contact": { "flatten": true } } } } })),
        "Customer",
        Operation::Create,
    );

    assert_eq!(field_names(&form), vec!["name", "code", "submit"]);
    assert_eq!(form.form.field("name").unwrap().field_type, FieldType::Date);
    assert_eq!(form.locales.get("forms.customerCreate.name"), Some("Contact"));
    // no description on the referenced side, the owner's one stays
    assert_eq!(form.form.field("code").unwrap().field_type, FieldType::Number);
    assert_eq!(form.locales.get("forms.customerCreate.code"), Some("Customer code"));
}

#[test]
fn test_mutually_flattening_definitions_terminate() {
    let schema = schema(json!({
        "definitions": {
            "Parent": {
                "properties": {
                    "title": { "type": "string" },
                    "child": { "$ref": "#/definitions/Child" }
                }
            },
            "Child": {
                "properties": {
                    "label": { "type": "string" },
                    "parent": { "$ref": "#/definitions/Parent" }
                }
            }
        }
    }));
    let generation = Scaffold::new(
        &schema,
        rules(json!({
            "prepare": {
                "Parent": { "fields": { "child": { "flatten": true } } },
                "Child": { "fields": { "parent": { "flatten": true } } }
            },
            "*": { "*": { "fields": {
                "child": { "flatten": true },
                "parent": { "flatten": true }
            } } }
        })),
    )
    .unwrap()
    .generate();

    assert!(generation.is_success());
    assert_eq!(generation.forms.len(), 4);
    for operation in Operation::ALL {
        let parent = generation.form("Parent", operation).unwrap();
        assert_eq!(field_names(parent), vec!["title", "label", "submit"]);
        let child = generation.form("Child", operation).unwrap();
        assert_eq!(field_names(child), vec!["label", "title", "submit"]);
    }
}

#[test]
fn test_prepare_pass_is_shared_by_every_form() {
    let schema = schema(json!({
        "definitions": {
            "Invoice": {
                "properties": {
                    "number": { "type": "string" },
                    "customer": { "$ref": "#/definitions/Customer" }
                }
            },
            "Customer": {
                "properties": {
                    "email": { "type": "string" }
                }
            }
        }
    }));
    let scaffold = Scaffold::new(
        &schema,
        rules(json!({
            "prepare": { "Invoice": { "fields": { "customer": { "flatten": true } } } }
        })),
    )
    .unwrap();

    assert!(!scaffold.schema().definitions["Invoice"].properties.contains_key("customer"));
    // input stays as it was
    assert!(schema.definitions["Invoice"].properties.contains_key("customer"));

    let generation = scaffold.generate();
    for operation in Operation::ALL {
        let form = generation.form("Invoice", operation).unwrap();
        assert_eq!(field_names(form), vec!["number", "email", "submit"]);
    }
}

#[test]
fn test_prepare_with_unresolved_reference_fails() {
    let schema = schema(json!({
        "definitions": {
            "Invoice": { "properties": { "customer": { "$ref": "#/definitions/Customer" } } }
        }
    }));
    let err = Scaffold::new(
        &schema,
        rules(json!({
            "prepare": { "Invoice": { "fields": { "customer": { "flatten": true } } } }
        })),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "property `customer` of definition `Invoice` references unknown definition `#/definitions/Customer`"
    );
}

#[test]
fn test_failure_is_scoped_to_its_pair() {
    let schema = schema(json!({
        "definitions": {
            "Broken": {
                "properties": {
                    "lines": { "type": "array", "items": { "$ref": "#/definitions/Missing" } }
                }
            },
            "Order": {
                "properties": { "note": { "type": "string" } }
            }
        }
    }));
    let generation = Scaffold::new(
        &schema,
        rules(json!({ "Order": { "create": { "fields": { "note": { "type": "sketch" } } } } })),
    )
    .unwrap()
    .generate();

    assert!(!generation.is_success());
    assert_eq!(generation.forms.len(), 1);
    assert_eq!(generation.forms[0].file_stem(), "order-update");
    assert_eq!(generation.failures.len(), 3);
    assert!(matches!(
        &generation.failures[0],
        ScaffoldError::UnresolvedReference { definition, property, .. }
            if definition == "Broken" && property == "lines"
    ));
    assert!(matches!(
        &generation.failures[2],
        ScaffoldError::InvalidRules { operation: Operation::Create, .. }
    ));
}

#[test]
fn test_malformed_field_rules_keep_both_forms() {
    let schema = schema(json!({
        "definitions": {
            "Customer": {
                "properties": {
                    "email": { "type": "string" },
                    "name": { "type": "string" }
                }
            }
        }
    }));
    let generation = Scaffold::new(
        &schema,
        rules(json!({
            "Customer": {
                "*": {
                    "fields": {
                        "email": { "skip": "yes" },
                        "name": { "skip": true, "columns": { "x": { "order": 1.5 } } }
                    }
                }
            }
        })),
    )
    .unwrap()
    .generate();

    assert!(generation.is_success());
    for operation in Operation::ALL {
        let form = generation.form("Customer", operation).unwrap();
        assert_eq!(field_names(form), vec!["email", "submit"]);
    }
}

#[test]
fn test_definition_skip() {
    let scaffold = Scaffold::new(
        &order_schema(),
        rules(json!({ "*": { "skip": true } })),
    )
    .unwrap();

    assert!(scaffold.generate().forms.is_empty());
    assert_eq!(scaffold.generate_form("Order", Operation::Create).unwrap(), None);
    assert_eq!(
        scaffold.generate_form("Nope", Operation::Create).unwrap_err(),
        ScaffoldError::UnknownDefinition("Nope".to_string())
    );
}

#[test]
fn test_generate_only() {
    let scaffold = Scaffold::new(&order_schema(), RuleConfig::default()).unwrap();
    let generation = scaffold.generate_only("Order").unwrap();
    assert_eq!(generation.forms.len(), 2);
    assert!(scaffold.generate_only("Customer").is_err());
}

#[test]
fn test_type_override_and_extra() {
    let schema = schema(json!({
        "definitions": {
            "Ticket": {
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "body": { "type": "string", "description": "Body" },
                    "flag": { "type": "boolean", "description": "Flag" }
                }
            }
        }
    }));
    let form = generate_one(
        &schema,
        rules(json!({
            "*": { "*": { "fields": { "id": { "type": "hidden" } } } },
            "Ticket": {
                "*": {
                    "fields": {
                        "body": { "type": "memo", "extra": { "rows": 5, "required": true } },
                        "flag": { "type": "boolean" }
                    }
                }
            }
        })),
        "Ticket",
        Operation::Create,
    );

    assert_eq!(field_names(&form), vec!["id", "body", "flag", "submit"]);
    assert_eq!(
        form.form.field("id").unwrap().to_json(),
        json!({ "name": "id", "type": "hidden" })
    );

    let body = form.form.field("body").unwrap().to_json();
    assert_eq!(body["type"], json!("memo"));
    assert_eq!(body["rows"], json!(5));
    assert_eq!(body["required"], json!(true));
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["name", "type", "title", "required", "rows"]);

    assert_eq!(form.form.field("flag").unwrap().field_type, FieldType::Boolean);
}

#[test]
fn test_unresolvable_properties_are_dropped() {
    let schema = schema(json!({
        "definitions": {
            "Thing": {
                "properties": {
                    "active": { "type": "boolean" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "owner": { "$ref": "#/definitions/Nobody" },
                    "name": { "type": "string" }
                }
            }
        }
    }));
    let form = generate_one(&schema, RuleConfig::default(), "Thing", Operation::Update);
    assert_eq!(field_names(&form), vec!["name", "submit"]);
}

#[test]
fn test_field_name_collision_keeps_last() {
    let schema = schema(json!({
        "definitions": {
            "Thing": {
                "properties": {
                    "first_name": { "type": "string", "description": "snake" },
                    "other": { "type": "string" },
                    "firstName": { "type": "string", "format": "date", "description": "camel" }
                }
            }
        }
    }));
    let form = generate_one(&schema, RuleConfig::default(), "Thing", Operation::Update);

    assert_eq!(field_names(&form), vec!["firstName", "other", "submit"]);
    assert_eq!(form.form.field("firstName").unwrap().field_type, FieldType::Date);
    assert_eq!(form.locales.get("forms.thingUpdate.firstName"), Some("camel"));
}

#[test]
fn test_output_is_deterministic() {
    let schema = schema(json!({
        "definitions": {
            "PurchaseOrder": {
                "required": ["number"],
                "properties": {
                    "number": { "type": "string", "description": "Number" },
                    "state": { "type": "string", "enum": ["draft", "sent"] },
                    "lines": { "type": "array", "items": { "$ref": "#/definitions/Line" } }
                }
            },
            "Line": {
                "properties": {
                    "product": { "type": "string" },
                    "amount": { "type": "number", "format": "double" },
                    "unit": { "type": "string", "enum": ["pcs", "kg"] }
                }
            }
        }
    }));
    let config = rules(json!({
        "PurchaseOrder": {
            "*": { "fields": { "lines": { "columns": { "amount": { "order": 1, "calculate-sum": true } } } } }
        }
    }));

    let render = || {
        Scaffold::new(&schema, config.clone())
            .unwrap()
            .generate()
            .forms
            .iter()
            .map(|form| (form.form_json().unwrap(), form.locales_json().unwrap()))
            .collect::<Vec<_>>()
    };

    let first = render();
    assert_eq!(first.len(), 4);
    assert_eq!(first, render());
}

#[test]
fn test_pretty_printed_locales() {
    let form = generate_one(&order_schema(), RuleConfig::default(), "Order", Operation::Update);
    let expected = r#"{
  "forms.orderUpdate": "Order",
  "forms.orderUpdate.status": "status",
  "forms.orderUpdate.status.OPEN": "OPEN",
  "forms.orderUpdate.status.PAID": "PAID",
  "forms.orderUpdate.total": "total",
  "forms.orderUpdate.save": "Save"
}"#;
    assert_eq!(form.locales_json().unwrap(), expected);
}

#[test]
fn test_yaml_inputs() {
    let schema: ApiSchema = serde_yaml::from_str(
        r#"
swagger: "2.0"
definitions:
  Order:
    properties:
      status:
        type: string
        enum: [OPEN, PAID]
      total:
        type: number
        format: double
"#,
    )
    .unwrap();
    let config: RuleConfig = serde_yaml::from_str(
        r#"
"*":
  "*":
    fields:
      total:
        skip: true
"#,
    )
    .unwrap();

    let form = generate_one(&schema, config, "Order", Operation::Create);
    assert_eq!(field_names(&form), vec!["status", "submit"]);
}
