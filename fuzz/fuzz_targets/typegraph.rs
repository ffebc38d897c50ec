#![no_main]

use cilgraph::LoadContext;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let context = LoadContext::new();
    let Ok(module) = context.request_load_bytes(data.to_vec()) else {
        return;
    };
    if context.finalize().is_err() {
        return;
    }

    let _ = module.custom_attributes();
    for ty in module.all_types() {
        let _ = ty.base_type();
        let _ = ty.interfaces();
        let _ = ty.custom_attributes();
        let _ = ty.nested_types();
        let _ = ty.generic_arguments();

        for field in ty.fields(false) {
            let _ = field.field_type();
            let _ = field.try_get_default();
        }
        for method in ty.methods(false) {
            let _ = method.parameters();
        }
        for property in ty.properties(false) {
            let _ = property.property_type();
        }
        for event in ty.events(false) {
            let _ = event.event_type();
        }
    }
});
