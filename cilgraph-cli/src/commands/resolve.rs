use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::{common::load_module, render},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct ResolveOutput {
    name: String,
    kind: String,
    module: Option<String>,
    placeholder: bool,
    base: Option<String>,
    generic_arguments: Vec<String>,
    interfaces: Vec<String>,
}

pub fn run(path: &Path, name: &str, opts: &GlobalOptions) -> anyhow::Result<()> {
    let (context, _module) = load_module(path, opts)?;

    let ty = context
        .resolve_type(name)
        .with_context(|| format!("failed to resolve type: {name}"))?;

    let module = ty
        .module()
        .map(|module| module.name().to_string())
        .or_else(|| ty.placeholder_module_name().map(str::to_string));

    let output = ResolveOutput {
        name: ty.pretty_full_name(),
        kind: render::kind(&ty).to_string(),
        module,
        placeholder: ty.is_placeholder(),
        base: ty.base_type()?.map(|base| base.pretty_full_name()),
        generic_arguments: ty
            .generic_arguments()
            .iter()
            .map(|argument| argument.pretty_full_name())
            .collect(),
        interfaces: ty
            .interfaces()
            .iter()
            .map(|interface| interface.pretty_full_name())
            .collect(),
    };

    print_output(&output, opts, |out| {
        println!("{} {}", out.kind, out.name);
        if let Some(module) = &out.module {
            let suffix = if out.placeholder { " (placeholder)" } else { "" };
            println!("  module:     {module}{suffix}");
        }
        if let Some(base) = &out.base {
            println!("  base:       {base}");
        }
        for argument in &out.generic_arguments {
            println!("  argument:   {argument}");
        }
        for interface in &out.interfaces {
            println!("  implements: {interface}");
        }
    })
}
