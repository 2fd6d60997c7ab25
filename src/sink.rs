//! Seam to the group assembler that materializes a layout in a file hierarchy.
//!
//! The engine does not create nodes itself. A [`DataGroupSink`] receives the
//! attributes and links of one NXdata group and writes them wherever it
//! stores nodes.

use crate::config::LayoutConfig;
use crate::data::layout::{indices_attribute_name, NxDataLayout};

/// Receiver for the contents of one NXdata group.
pub trait DataGroupSink {
    type Error;

    fn set_string_attribute(&mut self, name: &str, value: &str) -> Result<(), Self::Error>;

    fn set_string_list_attribute(&mut self, name: &str, values: &[String]) -> Result<(), Self::Error>;

    fn set_index_attribute(&mut self, name: &str, indices: &[usize]) -> Result<(), Self::Error>;

    /// Place a field named `name` in the group that resolves to `target`.
    fn link_field(&mut self, name: &str, target: &str) -> Result<(), Self::Error>;
}

impl NxDataLayout {
    /// Write this layout into `sink`: one link per field, then the `signal`,
    /// `axes` and `<field>_indices` attributes.
    pub fn materialize<S>(&self, sink: &mut S, config: &LayoutConfig) -> Result<(), S::Error>
    where
        S: DataGroupSink + ?Sized,
    {
        for (name, entry) in self.fields() {
            sink.link_field(name, &entry.target_path)?;
        }
        sink.set_string_attribute("signal", self.signal_name())?;
        let axes: Vec<String> = self
            .default_axes()
            .iter()
            .map(|slot| slot.render(&config.placeholder).to_string())
            .collect();
        sink.set_string_list_attribute("axes", &axes)?;
        for (name, entry) in self.fields() {
            sink.set_index_attribute(&indices_attribute_name(name), &entry.indices)?;
        }
        Ok(())
    }
}
