//! nxdata crate root: re-exports and module wiring.
//!
//! This crate computes the layout of a plottable NeXus `NXdata` group from a
//! primary (signal) device and any number of axis devices:
//! - `data`: shapes, field descriptors, devices, bindings and the finished layout
//! - `naming`: names under which device fields appear in the group
//! - `assembler`: the axis-indexing engine
//! - `sink`: seam to the group assembler that writes attributes and links
//! - `config`: shared configuration
//! - `scan`: declarative scan descriptions (YAML/JSON)
//! - `persistence`: save and load finished layouts
//!
//! The engine reasons about shapes and declared index mappings only; it never
//! touches numeric payloads or performs node I/O.

pub mod assembler;
pub mod config;
pub mod data;
pub mod errors;
pub mod naming;
pub mod persistence;
pub mod scan;
pub mod sink;

// Public re-exports for a compact external API
pub use assembler::AxisAssembler;
pub use config::{AxisLabel, LayoutConfig, DEFAULT_INSTRUMENT_ROOT, DEFAULT_PLACEHOLDER};
pub use data::binding::{DeviceBinding, Role};
pub use data::device::{Device, DeviceClass, FieldProvider};
pub use data::field::FieldDescriptor;
pub use data::layout::{AxisSlot, FieldEntry, NxDataAttributes, NxDataLayout};
pub use data::shape::Shape;
pub use errors::{LayoutError, LayoutResult, LoadError, PrimaryRejection};
pub use scan::ScanDescription;
pub use sink::DataGroupSink;
