//! Text rendering of types and members in C#-like declarations.

use cilgraph::{
    prelude::{CustomAttributeArgument, CustomAttributeValue},
    CustomAttribute, Method, MethodModifiers, Parameter, Type,
};

/// `public class Ns.Name<T> : Ns.Base (nested)`
pub fn declaration(ty: &Type) -> String {
    let mut result = String::new();

    if ty.is_public() {
        result.push_str("public ");
    }
    if ty.is_internal() {
        result.push_str("internal ");
    }
    if ty.is_protected() {
        result.push_str("protected ");
    }
    if ty.is_private() {
        result.push_str("private ");
    }

    result.push_str(kind(ty));
    result.push(' ');
    result.push_str(&ty.pretty_full_name());

    match ty.base_type() {
        Ok(Some(base)) => {
            result.push_str(" : ");
            result.push_str(&base.pretty_full_name());
        }
        Ok(None) => {}
        Err(error) => log::warn!("Base type of {} not resolved: {}", ty, error),
    }

    if ty.is_nested() {
        result.push_str(" (nested)");
    }

    result
}

/// `struct`, `class`, `interface` or `enum`
pub fn kind(ty: &Type) -> &'static str {
    if ty.is_struct() {
        "struct"
    } else if ty.is_class() {
        "class"
    } else if ty.is_interface() {
        "interface"
    } else if ty.is_enum() {
        "enum"
    } else {
        "type"
    }
}

/// `[Name]` or `[Name(1, "text", Named=true)]`
pub fn custom_attribute(attribute: &CustomAttribute) -> String {
    let name = attribute.name();
    let CustomAttributeValue {
        fixed_args,
        named_args,
    } = attribute.value();

    if fixed_args.is_empty() && named_args.is_empty() {
        return format!("[{name}]");
    }

    let arguments: Vec<String> = fixed_args
        .iter()
        .map(|argument| argument_value(&argument.value))
        .chain(
            named_args
                .iter()
                .map(|argument| format!("{}={}", argument.name, argument_value(&argument.value))),
        )
        .collect();

    format!("[{name}({})]", arguments.join(", "))
}

fn argument_value(value: &CustomAttributeArgument<Type>) -> String {
    match value {
        CustomAttributeArgument::Null => "null".to_string(),
        CustomAttributeArgument::Bool(value) => value.to_string(),
        CustomAttributeArgument::Char(value) => format!("'{value}'"),
        CustomAttributeArgument::I1(value) => value.to_string(),
        CustomAttributeArgument::U1(value) => value.to_string(),
        CustomAttributeArgument::I2(value) => value.to_string(),
        CustomAttributeArgument::U2(value) => value.to_string(),
        CustomAttributeArgument::I4(value) => value.to_string(),
        CustomAttributeArgument::U4(value) => value.to_string(),
        CustomAttributeArgument::I8(value) => value.to_string(),
        CustomAttributeArgument::U8(value) => value.to_string(),
        CustomAttributeArgument::R4(value) => value.to_string(),
        CustomAttributeArgument::R8(value) => value.to_string(),
        CustomAttributeArgument::String(value) => format!("\"{value}\""),
        CustomAttributeArgument::Type(ty) => format!("typeof({ty})"),
        CustomAttributeArgument::Array(elements) => {
            let elements: Vec<String> = elements
                .iter()
                .map(|element| argument_value(&element.value))
                .collect();
            format!("[{}]", elements.join(", "))
        }
    }
}

/// `public static `, with the trailing space
pub fn access(modifiers: MethodModifiers) -> String {
    let mut result = String::new();
    if modifiers.is_public {
        result.push_str("public ");
    }
    if modifiers.is_private {
        result.push_str("private ");
    }
    if modifiers.is_protected {
        result.push_str("protected ");
    }
    if modifiers.is_internal {
        result.push_str("internal ");
    }
    if modifiers.is_static {
        result.push_str("static ");
    }
    result
}

/// `Ns.Type a, Ns.Other b`
pub fn parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|parameter| {
            format!(
                "{} {}",
                parameter.parameter_type().full_name(),
                parameter.name()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `public Name(int a)`; nested declaring types keep only their last name segment
pub fn constructor(method: &Method) -> String {
    let declaring = method.declaring_type();
    let pretty = declaring.pretty_name();
    let name: &str = if declaring.is_nested() {
        pretty.rsplit('+').next().unwrap_or(&pretty)
    } else {
        &pretty
    };

    format!(
        "{}{}({})",
        access(method.modifiers()),
        name,
        parameters(&method.parameters())
    )
}

/// `public Ns.Result Name(int a)`
pub fn method(method: &Method) -> String {
    format!(
        "{}{} {}({})",
        access(method.modifiers()),
        method.return_type(),
        method.name(),
        parameters(&method.parameters())
    )
}
