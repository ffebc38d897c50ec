//! Shared fixtures for the integration tests.
#![allow(dead_code)]

pub mod builder;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use builder::{
    element, field_attr, method_attr, semantics, type_attr, AttrBlob, ImageBuilder, Sig,
};
use cilgraph::prelude::*;

/// Load `images` into a fresh context and finalize it
pub fn load(images: Vec<Vec<u8>>) -> (LoadContext, Vec<Arc<Module>>) {
    let context = LoadContext::new();
    let modules = images
        .into_iter()
        .map(|image| context.request_load_bytes(image).unwrap())
        .collect();
    context.finalize().unwrap();
    (context, modules)
}

/// Write `images` as `<name>.dll` into `dir` and return a name-to-path map
pub fn write_images(dir: &Path, images: &[(&str, Vec<u8>)]) -> HashMap<String, PathBuf> {
    images
        .iter()
        .map(|(name, image)| {
            let path = dir.join(format!("{name}.dll"));
            fs::write(&path, image).unwrap();
            (name.to_string(), path)
        })
        .collect()
}

/// Options resolving module names through `paths`
pub fn resolving(paths: HashMap<String, PathBuf>) -> LoadOptions {
    LoadOptions::new().with_path_resolver(move |name| paths.get(name).cloned())
}

/// The `Sample` assembly: one type per shape the type graph distinguishes.
///
/// | Type              | Shape                                                         |
/// |-------------------|---------------------------------------------------------------|
/// | `Class1`3`        | generic class over `T1, T2, T3`                               |
/// | `User`            | fields typed `Class1<Stream,int,string>` (twice) and `<..,int>` |
/// | `Color`           | `int` enum `Red = 0, Green = 1, Blue = 2`                     |
/// | `Sealed`, `Open`  | public, protected, private and internal methods               |
/// | `Outer`           | nests public `Inner` and private `Hidden`                     |
/// | `Base`1`          | method `Take(T value)`, properties `T Value` and `Base<string> ClosedSelf` |
/// | `ClosedSelf`      | extends `Base<string>`                                        |
/// | `IShape`          | interface with `double Area()`                                |
/// | `Widget`          | `[Obsolete("old", IsError = true)]`, implements `IShape`, ctor, `Count`, indexer, event `Changed`, static `Run()` |
/// | `Point`           | struct                                                        |
pub fn sample() -> Vec<u8> {
    let mut b = ImageBuilder::new("Sample");
    let mscorlib = b.assembly_ref("mscorlib");
    let object = b.type_ref(mscorlib, "System", "Object");
    let value_type = b.type_ref(mscorlib, "System", "ValueType");
    let enum_base = b.type_ref(mscorlib, "System", "Enum");
    let stream = b.type_ref(mscorlib, "System.IO", "Stream");
    let handler = b.type_ref(mscorlib, "System", "EventHandler");
    let obsolete = b.type_ref(mscorlib, "System", "ObsoleteAttribute");

    let class1 = b.type_def(type_attr::PUBLIC, "Sample", "Class1`3", Some(object));

    b.type_def(type_attr::PUBLIC, "Sample", "User", Some(object));
    let closed = |arg3: u8| {
        Sig::field()
            .generic_inst(false, class1, 3)
            .class(stream)
            .prim(element::I4)
            .prim(arg3)
            .build()
    };
    b.field(field_attr::PUBLIC, "Same", &closed(element::STRING));
    b.field(field_attr::PUBLIC, "Again", &closed(element::STRING));
    b.field(field_attr::PUBLIC, "Different", &closed(element::I4));
    b.field(field_attr::PRIVATE, "hidden", &Sig::field().prim(element::I4).build());

    let color = b.type_def(
        type_attr::PUBLIC | type_attr::SEALED,
        "Sample",
        "Color",
        Some(enum_base),
    );
    b.field(
        field_attr::PUBLIC | field_attr::SPECIAL_NAME | field_attr::RT_SPECIAL_NAME,
        "value__",
        &Sig::field().prim(element::I4).build(),
    );
    let literal =
        field_attr::PUBLIC | field_attr::STATIC | field_attr::LITERAL | field_attr::HAS_DEFAULT;
    let members: Vec<_> = ["Red", "Green", "Blue"]
        .iter()
        .map(|name| b.field(literal, name, &Sig::field().value_type(color).build()))
        .collect();

    for kind in ["Sealed", "Open"] {
        let flags = if kind == "Sealed" {
            type_attr::PUBLIC | type_attr::SEALED
        } else {
            type_attr::PUBLIC
        };
        b.type_def(flags, "Sample", kind, Some(object));
        let void = Sig::method(true, 0, 0).prim(element::VOID).build();
        b.method(method_attr::PUBLIC, "Visible", &void);
        b.method(method_attr::FAMILY, "Derived", &void);
        b.method(method_attr::PRIVATE, "Hidden", &void);
        b.method(method_attr::ASSEMBLY, "Internal", &void);
    }

    let outer = b.type_def(type_attr::PUBLIC, "Sample", "Outer", Some(object));
    let inner = b.type_def(type_attr::NESTED_PUBLIC, "", "Inner", Some(object));
    let hidden = b.type_def(type_attr::NESTED_PRIVATE, "", "Hidden", Some(object));

    let base = b.type_def(type_attr::PUBLIC, "Sample", "Base`1", Some(object));
    b.method(
        method_attr::PUBLIC,
        "Take",
        &Sig::method(true, 0, 1).prim(element::VOID).var(0).build(),
    );
    b.param(1, "value");
    let get_value = b.method(
        method_attr::PUBLIC | method_attr::SPECIAL_NAME,
        "get_Value",
        &Sig::method(true, 0, 0).var(0).build(),
    );
    let base_of_string_sig = |sig: Sig| sig.generic_inst(false, base, 1).prim(element::STRING);
    let get_closed_self = b.method(
        method_attr::PUBLIC | method_attr::SPECIAL_NAME,
        "get_ClosedSelf",
        &base_of_string_sig(Sig::method(true, 0, 0)).build(),
    );
    let value = b.property(0, "Value", &Sig::property(true, 0).var(0).build());
    let closed_self = b.property(
        0,
        "ClosedSelf",
        &base_of_string_sig(Sig::property(true, 0)).build(),
    );

    let base_of_string = b.type_spec(&base_of_string_sig(Sig::ty()).build());
    b.type_def(type_attr::PUBLIC, "Sample", "ClosedSelf", Some(base_of_string));

    let shape = b.type_def(
        type_attr::PUBLIC | type_attr::INTERFACE | type_attr::ABSTRACT,
        "Sample",
        "IShape",
        None,
    );
    b.method(
        method_attr::PUBLIC | method_attr::VIRTUAL | method_attr::ABSTRACT | method_attr::NEW_SLOT,
        "Area",
        &Sig::method(true, 0, 0).prim(element::R8).build(),
    );

    let widget = b.type_def(type_attr::PUBLIC, "Sample", "Widget", Some(object));
    let special = method_attr::SPECIAL_NAME | method_attr::HIDE_BY_SIG;
    b.method(
        method_attr::PUBLIC | special | method_attr::RT_SPECIAL_NAME,
        ".ctor",
        &Sig::method(true, 0, 1).prim(element::VOID).prim(element::I4).build(),
    );
    b.param(1, "size");
    let get_count = b.method(
        method_attr::PUBLIC | special,
        "get_Count",
        &Sig::method(true, 0, 0).prim(element::I4).build(),
    );
    let set_count = b.method(
        method_attr::PRIVATE | special,
        "set_Count",
        &Sig::method(true, 0, 1).prim(element::VOID).prim(element::I4).build(),
    );
    b.param(1, "value");
    let get_item = b.method(
        method_attr::PUBLIC | special,
        "get_Item",
        &Sig::method(true, 0, 1).prim(element::STRING).prim(element::I4).build(),
    );
    b.param(1, "index");
    let add_changed = b.method(
        method_attr::PUBLIC | special,
        "add_Changed",
        &Sig::method(true, 0, 1).prim(element::VOID).class(handler).build(),
    );
    b.param(1, "value");
    let remove_changed = b.method(
        method_attr::PUBLIC | special,
        "remove_Changed",
        &Sig::method(true, 0, 1).prim(element::VOID).class(handler).build(),
    );
    b.param(1, "value");
    b.method(
        method_attr::PUBLIC | method_attr::STATIC,
        "Run",
        &Sig::method(false, 0, 0).prim(element::VOID).build(),
    );
    let count = b.property(0, "Count", &Sig::property(true, 0).prim(element::I4).build());
    let item = b.property(
        0,
        "Item",
        &Sig::property(true, 1).prim(element::STRING).prim(element::I4).build(),
    );
    let changed = b.event(0, "Changed", handler);

    b.type_def(
        type_attr::PUBLIC | type_attr::SEALED,
        "Sample",
        "Point",
        Some(value_type),
    );
    b.field(field_attr::PUBLIC, "X", &Sig::field().prim(element::I4).build());
    b.field(field_attr::PUBLIC, "Y", &Sig::field().prim(element::I4).build());

    b.interface_impl(widget, shape);

    for (index, member) in members.iter().enumerate() {
        b.constant(*member, element::I4, &(index as i32).to_le_bytes());
    }

    let obsolete_ctor = b.member_ref(
        obsolete,
        ".ctor",
        &Sig::method(true, 0, 1).prim(element::VOID).prim(element::STRING).build(),
    );
    b.custom_attribute(
        widget,
        obsolete_ctor,
        &AttrBlob::new()
            .string(Some("old"))
            .named(1)
            .named_arg(true, element::BOOLEAN, "IsError")
            .u8(1)
            .build(),
    );

    b.nested(inner, outer);
    b.nested(hidden, outer);

    b.generic_param(0, 0, class1, "T1");
    b.generic_param(1, 0, class1, "T2");
    b.generic_param(2, 0, class1, "T3");
    b.generic_param(0, 0, base, "T");

    b.semantics(semantics::ADD_ON, add_changed, changed);
    b.semantics(semantics::REMOVE_ON, remove_changed, changed);
    b.semantics(semantics::GETTER, get_value, value);
    b.semantics(semantics::GETTER, get_closed_self, closed_self);
    b.semantics(semantics::GETTER, get_count, count);
    b.semantics(semantics::SETTER, set_count, count);
    b.semantics(semantics::GETTER, get_item, item);

    b.build()
}

/// An assembly `name` whose type `Ns.<name>Type` extends `Ns.<base>Type` of the assembly `base`
pub fn chained(name: &str, base: &str) -> Vec<u8> {
    let mut b = ImageBuilder::new(name);
    let reference = b.assembly_ref(base);
    let base_type = b.type_ref(reference, "Ns", &format!("{base}Type"));
    b.type_def(type_attr::PUBLIC, "Ns", &format!("{name}Type"), Some(base_type));
    b.build()
}
