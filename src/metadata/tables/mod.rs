//! Typed rows of the ECMA-335 metadata tables.
//!
//! Every table the type graph reads has its own module with a `*Raw` row struct, the flag types of
//! its columns and a [`RowReadable`] implementation. Rows keep heap indexes and coded indexes
//! undecoded; resolving them is the job of [`crate::metadata::reader::MetadataReader`].
//!
//! # Reference
//! * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.22

mod assembly;
mod assemblyref;
mod constant;
mod customattribute;
mod event;
mod eventmap;
mod exportedtype;
mod field;
mod genericparam;
mod genericparamconstraint;
mod interfaceimpl;
mod memberref;
mod methoddef;
mod methodsemantics;
mod module;
mod moduleref;
mod nestedclass;
mod param;
mod property;
mod propertymap;
mod typedef;
mod typeref;
mod types;
mod typespec;

#[cfg(test)]
mod tests;

pub use assembly::AssemblyRaw;
pub use assemblyref::AssemblyRefRaw;
pub use constant::ConstantRaw;
pub use customattribute::CustomAttributeRaw;
pub use event::{EventRaw, EVENT_RT_SPECIAL_NAME, EVENT_SPECIAL_NAME};
pub use eventmap::EventMapRaw;
pub use exportedtype::{ExportedTypeRaw, EXPORTED_TYPE_FORWARDER};
pub use field::{FieldAttributes, FieldRaw};
pub use genericparam::{GenericParamAttributes, GenericParamRaw};
pub use genericparamconstraint::GenericParamConstraintRaw;
pub use interfaceimpl::InterfaceImplRaw;
pub use memberref::MemberRefRaw;
pub use methoddef::{MethodAttributes, MethodDefRaw};
pub use methodsemantics::{MethodSemanticsAttributes, MethodSemanticsRaw};
pub use module::ModuleRaw;
pub use moduleref::ModuleRefRaw;
pub use nestedclass::NestedClassRaw;
pub use param::{ParamAttributes, ParamRaw};
pub use property::{PropertyRaw, PROPERTY_HAS_DEFAULT, PROPERTY_RT_SPECIAL_NAME, PROPERTY_SPECIAL_NAME};
pub use propertymap::PropertyMapRaw;
pub use typedef::{TypeAttributes, TypeDefRaw};
pub use typeref::TypeRefRaw;
pub use types::*;
pub use typespec::TypeSpecRaw;
