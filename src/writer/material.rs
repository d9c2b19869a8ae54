//! Material extension writing for 3MF model files
//!
//! Base material groups for the grouped encoding and vertex color groups
//! for the vertex-color encoding.

use crate::error::{Error, Result};
use crate::model::{BaseMaterialGroup, VertexColorGroup};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::Write as IoWrite;

/// Write a base material group
pub(super) fn write_base_material_group<W: IoWrite>(
    writer: &mut Writer<W>,
    group: &BaseMaterialGroup,
) -> Result<()> {
    let mut elem = BytesStart::new("m:basematerials");
    elem.push_attribute(("id", group.id.to_string().as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::serialization(format!("Failed to write basematerials element: {}", e)))?;

    for material in &group.materials {
        let mut mat_elem = BytesStart::new("m:base");
        mat_elem.push_attribute(("name", material.name.as_str()));

        let color = format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            material.displaycolor.0,
            material.displaycolor.1,
            material.displaycolor.2,
            material.displaycolor.3
        );
        mat_elem.push_attribute(("displaycolor", color.as_str()));

        writer
            .write_event(Event::Empty(mat_elem))
            .map_err(|e| Error::serialization(format!("Failed to write base material: {}", e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("m:basematerials")))
        .map_err(|e| Error::serialization(format!("Failed to close basematerials element: {}", e)))?;

    Ok(())
}

/// Write a vertex color group
///
/// Colors are emitted as normalized `r`/`g`/`b` float attributes, one
/// `<m:color>` per mesh vertex.
pub(super) fn write_vertex_color_group<W: IoWrite>(
    writer: &mut Writer<W>,
    group: &VertexColorGroup,
) -> Result<()> {
    let mut elem = BytesStart::new("m:colorgroup");
    elem.push_attribute(("id", group.id.to_string().as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::serialization(format!("Failed to write colorgroup element: {}", e)))?;

    for color in &group.colors {
        let mut color_elem = BytesStart::new("m:color");
        color_elem.push_attribute(("r", color[0].to_string().as_str()));
        color_elem.push_attribute(("g", color[1].to_string().as_str()));
        color_elem.push_attribute(("b", color[2].to_string().as_str()));

        writer
            .write_event(Event::Empty(color_elem))
            .map_err(|e| Error::serialization(format!("Failed to write color: {}", e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("m:colorgroup")))
        .map_err(|e| Error::serialization(format!("Failed to close colorgroup element: {}", e)))?;

    Ok(())
}
