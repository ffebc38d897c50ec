use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::{common::load_module, render},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct TypeEntry {
    token: String,
    visibility: String,
    kind: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct TypesOutput {
    types: Vec<TypeEntry>,
    count: usize,
}

pub fn run(path: &Path, namespace: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let (_context, module) = load_module(path, opts)?;

    let mut entries = Vec::new();

    for ty in module.all_types() {
        if let Some(ns) = namespace {
            if ty.namespace().as_deref() != Some(ns) {
                continue;
            }
        }

        let visibility = if ty.is_public() {
            "public"
        } else if ty.is_private() {
            "private"
        } else {
            "internal"
        };

        entries.push(TypeEntry {
            token: ty.token().map(|token| token.to_string()).unwrap_or_default(),
            visibility: visibility.to_string(),
            kind: render::kind(&ty).to_string(),
            name: ty.pretty_full_name(),
        });
    }

    let count = entries.len();
    let output = TypesOutput {
        types: entries,
        count,
    };

    print_output(&output, opts, |out| {
        let mut tw = TabWriter::new(vec![
            ("Token", Align::Left),
            ("Vis", Align::Left),
            ("Kind", Align::Left),
            ("Name", Align::Left),
        ]);
        for e in &out.types {
            tw.row(vec![
                e.token.clone(),
                e.visibility.clone(),
                e.kind.clone(),
                e.name.clone(),
            ]);
        }
        tw.print();
        println!("\n{} type(s) listed.", out.count);
    })
}
