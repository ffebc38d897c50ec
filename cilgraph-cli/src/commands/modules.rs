use std::{path::Path, sync::Arc};

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_module,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct ModuleEntry {
    name: String,
    origin: &'static str,
    placeholder: bool,
    types: usize,
    location: Option<String>,
}

#[derive(Debug, Serialize)]
struct ModulesOutput {
    modules: Vec<ModuleEntry>,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let (context, _module) = load_module(path, opts)?;
    let explicit = context.explicit_modules();

    let modules = context
        .modules()
        .iter()
        .map(|module| ModuleEntry {
            name: module.name().to_string(),
            origin: if explicit.iter().any(|e| Arc::ptr_eq(e, module)) {
                "explicit"
            } else {
                "implicit"
            },
            placeholder: module.is_placeholder(),
            types: module.all_types().len(),
            location: module.location().map(|p| p.display().to_string()),
        })
        .collect();

    print_output(&ModulesOutput { modules }, opts, |out| {
        let mut tw = TabWriter::new(vec![
            ("Name", Align::Left),
            ("Origin", Align::Left),
            ("Types", Align::Right),
            ("Location", Align::Left),
        ]);
        for m in &out.modules {
            let location = match (&m.location, m.placeholder) {
                (_, true) => "(placeholder)".to_string(),
                (Some(location), false) => location.clone(),
                (None, false) => "(memory)".to_string(),
            };
            tw.row(vec![
                m.name.clone(),
                m.origin.to_string(),
                m.types.to_string(),
                location,
            ]);
        }
        tw.print();
    })
}
