use std::{collections::HashSet, path::Path};

use cilgraph::Type;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::{common::load_module, render},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct TypeDump {
    declaration: String,
    attributes: String,
    custom_attributes: Vec<String>,
    interfaces: Vec<String>,
    nested: Vec<String>,
    constructors: Vec<String>,
    properties: Vec<String>,
    events: Vec<String>,
    methods: Vec<String>,
    fields: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DumpOutput {
    module: String,
    types: Vec<TypeDump>,
}

pub fn run(path: &Path, publicish_only: bool, opts: &GlobalOptions) -> anyhow::Result<()> {
    let (_context, module) = load_module(path, opts)?;

    let types = module
        .all_types()
        .iter()
        .map(|ty| dump_type(ty, publicish_only))
        .collect();

    let output = DumpOutput {
        module: module.name().to_string(),
        types,
    };

    print_output(&output, opts, |out| {
        for ty in &out.types {
            println!();
            println!("{}", ty.declaration);
            println!("    {}", ty.attributes);
            for line in ty
                .custom_attributes
                .iter()
                .chain(&ty.interfaces)
                .chain(&ty.nested)
                .chain(&ty.constructors)
                .chain(&ty.properties)
                .chain(&ty.events)
                .chain(&ty.methods)
                .chain(&ty.fields)
            {
                println!("    {line}");
            }
        }
    })
}

fn dump_type(ty: &Type, publicish_only: bool) -> TypeDump {
    let (methods, constructors) = ty.methods_and_constructors(publicish_only);
    let events = ty.events(publicish_only);

    // Private event backing fields show up as fields of the same name.
    let event_names: HashSet<&str> = if publicish_only {
        HashSet::new()
    } else {
        events.iter().map(|event| event.name()).collect()
    };

    let properties = ty
        .properties(publicish_only)
        .iter()
        .map(|property| {
            let property_type = property
                .property_type()
                .map_or_else(|error| format!("<{error}>"), |ty| ty.pretty_full_name());
            let item_type = (property.name() == "Item")
                .then(|| property.item_type())
                .flatten();

            match item_type {
                Some(item_type) => format!(
                    "{}{} this.[{}]",
                    render::access(property.modifiers()),
                    property_type,
                    item_type
                ),
                None => {
                    let mut line = format!("{} {} {{ ", property_type, property.name());
                    if let Some(getter) = property.getter() {
                        line.push_str(&render::access(getter.modifiers()));
                        line.push_str("get; ");
                    }
                    if let Some(setter) = property.setter() {
                        line.push_str(&render::access(setter.modifiers()));
                        line.push_str("set; ");
                    }
                    line.push('}');
                    line
                }
            }
        })
        .collect();

    let fields = ty
        .fields(publicish_only)
        .iter()
        .filter(|field| !event_names.contains(field.name()))
        .filter(|field| !(ty.is_enum() && field.is_special_name()))
        .map(|field| {
            if ty.is_enum() {
                let value = field
                    .try_get_default()
                    .map_or_else(|| "?".to_string(), |value| value.to_string());
                format!("{} = {},", field.name(), value)
            } else {
                let field_type = field
                    .field_type()
                    .map_or_else(|error| format!("<{error}>"), |ty| ty.pretty_full_name());
                format!("{} {};", field_type, field.name())
            }
        })
        .collect();

    TypeDump {
        declaration: render::declaration(ty),
        attributes: format!("{:?}", ty.attributes()),
        custom_attributes: ty
            .custom_attributes()
            .iter()
            .map(render::custom_attribute)
            .collect(),
        interfaces: ty
            .interfaces()
            .iter()
            .map(|interface| interface.pretty_full_name())
            .collect(),
        nested: ty
            .nested_types()
            .iter()
            .map(|nested| format!("nested {}", nested.pretty_name()))
            .collect(),
        constructors: constructors.iter().map(render::constructor).collect(),
        properties,
        events: events
            .iter()
            .map(|event| {
                let event_type = event
                    .event_type()
                    .map_or_else(|error| format!("<{error}>"), |ty| ty.pretty_full_name());
                format!(
                    "{}{} {} {{ add; remove; }}",
                    render::access(event.adder().modifiers()),
                    event_type,
                    event.name()
                )
            })
            .collect(),
        methods: methods.iter().map(render::method).collect(),
        fields,
    }
}
