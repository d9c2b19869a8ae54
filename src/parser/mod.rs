//! Parsing produced 3MF packages back into the document model
//!
//! This reader understands exactly the vocabulary this crate writes: the
//! core model/resources/build structure plus the material-extension
//! basematerials and colorgroup resources. It exists so callers (and the
//! round-trip tests) can verify output without a separate 3MF stack; it is
//! not a general-purpose conformance parser.

use crate::error::{Error, Result};
use crate::model::{
    BaseMaterial, BaseMaterialGroup, BuildItem, Mesh, MetadataEntry, Model, Object, ObjectType,
    Triangle, Vertex, VertexColorGroup,
};
use crate::opc::Package;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::Read;

/// Parse a 3MF package from a reader
pub fn parse_3mf<R: Read + std::io::Seek>(reader: R) -> Result<Model> {
    let mut package = Package::open(reader)?;
    let model_xml = package.get_model()?;
    parse_model_xml(&model_xml)
}

/// Extract local name from a potentially namespaced XML element name
///
/// - `"m:colorgroup"` returns `"colorgroup"`
/// - `"object"` returns `"object"`
pub(crate) fn get_local_name(name_str: &str) -> &str {
    match name_str.rfind(':') {
        Some(pos) => &name_str[pos + 1..],
        None => name_str,
    }
}

/// Parse the 3D model XML content
pub fn parse_model_xml(xml: &str) -> Result<Model> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut model = Model::new();
    let mut buf = Vec::new();

    let mut current_object: Option<Object> = None;
    let mut current_mesh: Option<Mesh> = None;
    let mut current_material_group: Option<BaseMaterialGroup> = None;
    let mut current_color_group: Option<VertexColorGroup> = None;
    let mut current_metadata_name: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;

                match get_local_name(name_str) {
                    "model" => {
                        if let Some(unit) = get_attribute(e, "unit")? {
                            model.unit = unit;
                        }
                    }
                    "metadata" => {
                        let name = get_attribute(e, "name")?
                            .ok_or_else(|| Error::missing_attribute("metadata", "name"))?;
                        current_metadata_name = Some(name);
                    }
                    "basematerials" => {
                        current_material_group = Some(BaseMaterialGroup::new(parse_id(e)?));
                    }
                    "base" => {
                        let group = current_material_group.as_mut().ok_or_else(|| {
                            Error::InvalidXml("<base> outside <basematerials>".to_string())
                        })?;
                        group.materials.push(parse_base_material(e)?);
                    }
                    "colorgroup" => {
                        current_color_group = Some(VertexColorGroup::new(parse_id(e)?));
                    }
                    "color" => {
                        let group = current_color_group.as_mut().ok_or_else(|| {
                            Error::InvalidXml("<color> outside <colorgroup>".to_string())
                        })?;
                        group.colors.push(parse_color(e)?);
                    }
                    "object" => {
                        current_object = Some(parse_object(e)?);
                    }
                    "mesh" => {
                        current_mesh = Some(Mesh::new());
                    }
                    "vertex" => {
                        let mesh = current_mesh.as_mut().ok_or_else(|| {
                            Error::InvalidXml("<vertex> outside <mesh>".to_string())
                        })?;
                        mesh.vertices.push(parse_vertex(e)?);
                    }
                    "triangle" => {
                        let mesh = current_mesh.as_mut().ok_or_else(|| {
                            Error::InvalidXml("<triangle> outside <mesh>".to_string())
                        })?;
                        mesh.triangles.push(parse_triangle(e)?);
                    }
                    "item" => {
                        let objectid = get_attribute(e, "objectid")?
                            .ok_or_else(|| Error::missing_attribute("item", "objectid"))?
                            .parse::<usize>()?;
                        model.build.items.push(BuildItem::new(objectid));
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(name) = current_metadata_name.take() {
                    let value = quick_xml::escape::unescape(
                        &t.decode().map_err(|e| Error::InvalidXml(e.to_string()))?,
                    )
                    .map_err(|e| Error::InvalidXml(e.to_string()))?
                    .into_owned();
                    model.metadata.push(MetadataEntry::new(name, value));
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;

                match get_local_name(name_str) {
                    "metadata" => {
                        // Empty metadata element: no text event arrived
                        if let Some(name) = current_metadata_name.take() {
                            model.metadata.push(MetadataEntry::new(name, String::new()));
                        }
                    }
                    "basematerials" => {
                        if let Some(group) = current_material_group.take() {
                            model.resources.base_material_groups.push(group);
                        }
                    }
                    "colorgroup" => {
                        if let Some(group) = current_color_group.take() {
                            model.resources.vertex_color_groups.push(group);
                        }
                    }
                    "mesh" => {
                        if let Some(object) = current_object.as_mut() {
                            object.mesh = current_mesh.take();
                        }
                    }
                    "object" => {
                        if let Some(object) = current_object.take() {
                            model.resources.objects.push(object);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(model)
}

/// Read an attribute value by local name
fn get_attribute(e: &BytesStart, wanted: &str) -> Result<Option<String>> {
    for attr_result in e.attributes() {
        let attr = attr_result?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| Error::InvalidXml(e.to_string()))?;
        if get_local_name(key) == wanted {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::InvalidXml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse the required `id` attribute of a resource element
fn parse_id(e: &BytesStart) -> Result<usize> {
    let name = e.name();
    let element = std::str::from_utf8(name.as_ref())
        .map_err(|e| Error::InvalidXml(e.to_string()))?
        .to_string();
    let id = get_attribute(e, "id")?
        .ok_or_else(|| Error::missing_attribute(get_local_name(&element), "id"))?;
    Ok(id.parse::<usize>()?)
}

/// Parse object element attributes
fn parse_object(e: &BytesStart) -> Result<Object> {
    let id = get_attribute(e, "id")?
        .ok_or_else(|| Error::missing_attribute("object", "id"))?
        .parse::<usize>()?;

    let mut object = Object::new(id);
    object.name = get_attribute(e, "name")?;

    if let Some(type_str) = get_attribute(e, "type")? {
        object.object_type = match type_str.as_str() {
            "model" => ObjectType::Model,
            "support" => ObjectType::Support,
            "solidsupport" => ObjectType::SolidSupport,
            "surface" => ObjectType::Surface,
            "other" => ObjectType::Other,
            _ => {
                return Err(Error::InvalidXml(format!(
                    "Invalid object type '{}'. Must be one of: model, support, solidsupport, surface, other",
                    type_str
                )));
            }
        };
    }

    Ok(object)
}

/// Parse vertex element attributes
fn parse_vertex(e: &BytesStart) -> Result<Vertex> {
    let mut x_opt: Option<f64> = None;
    let mut y_opt: Option<f64> = None;
    let mut z_opt: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let value_str = std::str::from_utf8(&attr.value)
            .map_err(|e| Error::InvalidXml(e.to_string()))?;

        match attr.key.as_ref() {
            b"x" => x_opt = Some(value_str.parse::<f64>()?),
            b"y" => y_opt = Some(value_str.parse::<f64>()?),
            b"z" => z_opt = Some(value_str.parse::<f64>()?),
            _ => {}
        }
    }

    let x = x_opt.ok_or_else(|| Error::missing_attribute("vertex", "x"))?;
    let y = y_opt.ok_or_else(|| Error::missing_attribute("vertex", "y"))?;
    let z = z_opt.ok_or_else(|| Error::missing_attribute("vertex", "z"))?;

    if !x.is_finite() || !y.is_finite() || !z.is_finite() {
        return Err(Error::InvalidXml(format!(
            "Vertex coordinates must be finite (got {}, {}, {})",
            x, y, z
        )));
    }

    Ok(Vertex::new(x, y, z))
}

/// Parse triangle element attributes
fn parse_triangle(e: &BytesStart) -> Result<Triangle> {
    let mut v = [None::<usize>; 3];
    let mut pid = None;
    let mut p = [None::<usize>; 3];

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let key = attr.key.as_ref();
        let value_str = std::str::from_utf8(&attr.value)
            .map_err(|e| Error::InvalidXml(e.to_string()))?;

        match key {
            b"v1" => v[0] = Some(value_str.parse()?),
            b"v2" => v[1] = Some(value_str.parse()?),
            b"v3" => v[2] = Some(value_str.parse()?),
            b"pid" => pid = Some(value_str.parse()?),
            b"p1" => p[0] = Some(value_str.parse()?),
            b"p2" => p[1] = Some(value_str.parse()?),
            b"p3" => p[2] = Some(value_str.parse()?),
            _ => {}
        }
    }

    let mut triangle = Triangle::new(
        v[0].ok_or_else(|| Error::missing_attribute("triangle", "v1"))?,
        v[1].ok_or_else(|| Error::missing_attribute("triangle", "v2"))?,
        v[2].ok_or_else(|| Error::missing_attribute("triangle", "v3"))?,
    );
    triangle.pid = pid;
    triangle.p1 = p[0];
    triangle.p2 = p[1];
    triangle.p3 = p[2];

    Ok(triangle)
}

/// Parse a base material element with its `#RRGGBB[AA]` display color
fn parse_base_material(e: &BytesStart) -> Result<BaseMaterial> {
    let name = get_attribute(e, "name")?
        .ok_or_else(|| Error::missing_attribute("base", "name"))?;
    let color_str = get_attribute(e, "displaycolor")?
        .ok_or_else(|| Error::missing_attribute("base", "displaycolor"))?;

    let h = color_str.strip_prefix('#').unwrap_or(&color_str);
    if h.len() != 6 && h.len() != 8 {
        return Err(Error::Parse(format!(
            "Display color '{}' must be #RRGGBB or #RRGGBBAA",
            color_str
        )));
    }

    let r = u8::from_str_radix(&h[0..2], 16)?;
    let g = u8::from_str_radix(&h[2..4], 16)?;
    let b = u8::from_str_radix(&h[4..6], 16)?;
    let a = if h.len() == 8 {
        u8::from_str_radix(&h[6..8], 16)?
    } else {
        255
    };

    Ok(BaseMaterial::new(name, (r, g, b, a)))
}

/// Parse a vertex color element with normalized `r`/`g`/`b` attributes
fn parse_color(e: &BytesStart) -> Result<[f32; 3]> {
    let r = get_attribute(e, "r")?
        .ok_or_else(|| Error::missing_attribute("color", "r"))?
        .parse::<f32>()?;
    let g = get_attribute(e, "g")?
        .ok_or_else(|| Error::missing_attribute("color", "g"))?
        .parse::<f32>()?;
    let b = get_attribute(e, "b")?
        .ok_or_else(|| Error::missing_attribute("color", "b"))?
        .parse::<f32>()?;
    Ok([r, g, b])
}
