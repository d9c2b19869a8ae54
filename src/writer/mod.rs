//! XML writing for 3MF model files
//!
//! Serializes the document model into the `3D/3dmodel.model` part of the
//! package.

mod core;
mod material;

use crate::error::{Error, Result};
use crate::model::{CORE_XMLNS, MATERIAL_XMLNS, MetadataEntry, Model, Resources};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write as IoWrite;

/// Write a Model to XML format
///
/// Serializes a Model struct to 3MF-compliant XML.
/// This generates the 3dmodel.model file content.
pub fn write_model_xml<W: IoWrite>(model: &Model, writer: W) -> Result<()> {
    let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

    xml_writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::serialization(format!("Failed to write XML declaration: {}", e)))?;

    let mut model_elem = BytesStart::new("model");
    model_elem.push_attribute(("unit", model.unit.as_str()));
    model_elem.push_attribute(("xml:lang", "en-US"));
    model_elem.push_attribute(("xmlns", CORE_XMLNS));
    model_elem.push_attribute(("xmlns:m", MATERIAL_XMLNS));

    xml_writer
        .write_event(Event::Start(model_elem))
        .map_err(|e| Error::serialization(format!("Failed to write model element: {}", e)))?;

    for entry in &model.metadata {
        write_metadata(&mut xml_writer, entry)?;
    }

    write_resources(&mut xml_writer, &model.resources)?;

    write_build(&mut xml_writer, model)?;

    xml_writer
        .write_event(Event::End(BytesEnd::new("model")))
        .map_err(|e| Error::serialization(format!("Failed to close model element: {}", e)))?;

    Ok(())
}

/// Write a metadata entry
fn write_metadata<W: IoWrite>(writer: &mut Writer<W>, entry: &MetadataEntry) -> Result<()> {
    let mut elem = BytesStart::new("metadata");
    elem.push_attribute(("name", entry.name.as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::serialization(format!("Failed to write metadata element: {}", e)))?;

    writer
        .write_event(Event::Text(BytesText::new(&entry.value)))
        .map_err(|e| Error::serialization(format!("Failed to write metadata value: {}", e)))?;

    writer
        .write_event(Event::End(BytesEnd::new("metadata")))
        .map_err(|e| Error::serialization(format!("Failed to close metadata element: {}", e)))?;

    Ok(())
}

/// Write resources section
fn write_resources<W: IoWrite>(writer: &mut Writer<W>, resources: &Resources) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("resources")))
        .map_err(|e| Error::serialization(format!("Failed to write resources element: {}", e)))?;

    for group in &resources.base_material_groups {
        material::write_base_material_group(writer, group)?;
    }

    for group in &resources.vertex_color_groups {
        material::write_vertex_color_group(writer, group)?;
    }

    for object in &resources.objects {
        core::write_object(writer, object)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("resources")))
        .map_err(|e| Error::serialization(format!("Failed to close resources element: {}", e)))?;

    Ok(())
}

/// Write the build section
fn write_build<W: IoWrite>(writer: &mut Writer<W>, model: &Model) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("build")))
        .map_err(|e| Error::serialization(format!("Failed to write build element: {}", e)))?;

    for item in &model.build.items {
        let mut elem = BytesStart::new("item");
        elem.push_attribute(("objectid", item.objectid.to_string().as_str()));

        writer
            .write_event(Event::Empty(elem))
            .map_err(|e| Error::serialization(format!("Failed to write build item: {}", e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("build")))
        .map_err(|e| Error::serialization(format!("Failed to close build element: {}", e)))?;

    Ok(())
}
