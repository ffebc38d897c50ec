//! Process-wide singletons for the built-in types.
//!
//! Every `int`, `string` or `object` a signature names maps to the same [`Type`] node, no matter
//! which module or load context asked for it. Primitive nodes carry no module, so sharing them
//! across contexts is safe.

use std::{
    collections::HashMap,
    sync::{OnceLock, RwLock},
};

use crate::{metadata::signatures::PrimitiveTypeCode, typesystem::Type};

static PRIMITIVES: OnceLock<RwLock<HashMap<PrimitiveTypeCode, Type>>> = OnceLock::new();

/// The shared node for `code`
///
/// Lookups take the read lock only; the first request for a code takes the write lock and checks
/// again before inserting, so concurrent callers always receive the same node.
pub fn primitive_type(code: PrimitiveTypeCode) -> Type {
    let table = PRIMITIVES.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(existing) = read_lock!(table).get(&code) {
        return existing.clone();
    }

    let mut table = write_lock!(table);
    table
        .entry(code)
        .or_insert_with(|| Type::new_primitive(code))
        .clone()
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn same_node_for_same_code() {
        let first = primitive_type(PrimitiveTypeCode::Int32);
        let second = primitive_type(PrimitiveTypeCode::Int32);

        assert!(first.ptr_eq(&second));
        assert_eq!(first, second);
        assert_ne!(first, primitive_type(PrimitiveTypeCode::UInt32));
    }

    #[test]
    fn concurrent_first_access() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| primitive_type(PrimitiveTypeCode::Double)))
            .collect();

        let types: Vec<Type> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert!(types.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
    }

    #[test]
    fn primitive_names() {
        let string = primitive_type(PrimitiveTypeCode::String);
        assert_eq!(string.name(), "String");
        assert_eq!(string.namespace().as_deref(), Some("System"));
        assert_eq!(string.full_name(), "System.String");
        assert!(string.is_primitive());
        assert!(string.is_class());
        assert!(!primitive_type(PrimitiveTypeCode::Int32).is_class());
    }
}
