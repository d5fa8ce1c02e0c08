//! Reading and writing the aircraft interchange document, a CPACS-style XML file. The document
//! carries the design parameters only. Generated point sequences are never written, they are
//! derived again from the parameters after reading.
//!
//! Layout:
//!
//! ```text
//! cpacs
//!   header: name, description?, creator, timestamp, version?, cpacsVersion
//!   vehicles/aircraft/model[@uID]
//!     referenceFile?
//!     fuselageDimensions: length, width, height
//!     components: foil | frame | nacelle | fuselage | wing [@uID], one child element per field
//!       wing: span, sweep, root and tip elements holding the fields of a foil
//! ```

use crate::airfoil::{AirfoilFamily, AirfoilSpec};
use crate::design::{AircraftDesign, Component, ComponentSpec, ProjectInfo};
use crate::errors::FormatError;
use crate::frame::{FramePoints, FrameSpec};
use crate::fuselage::FuselageSpec;
use crate::nacelle::{NacelleModel, NacelleSpec};
use crate::wing::WingSpec;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CPACS_VERSION: &str = "3.3";

/// The text of an interchange document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn from_text(text: impl Into<String>) -> Document {
        Document { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn load(path: &Path) -> Result<Document, FormatError> {
        let text = std::fs::read_to_string(path).map_err(|source| FormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Document { text })
    }

    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        std::fs::write(path, &self.text).map_err(|source| FormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = self.text.len(), "saved interchange document");
        Ok(())
    }
}

type XmlWriter<'a> = Writer<Cursor<&'a mut Vec<u8>>>;

fn write_error(e: impl Display) -> FormatError {
    FormatError::Xml(format!("failed to write document: {}", e))
}

fn start(writer: &mut XmlWriter, name: &str, uid: Option<&str>) -> Result<(), FormatError> {
    let mut element = BytesStart::new(name);
    if let Some(uid) = uid {
        element.push_attribute(("uID", uid));
    }
    writer.write_event(Event::Start(element)).map_err(write_error)
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<(), FormatError> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(write_error)
}

fn text_element(writer: &mut XmlWriter, name: &str, value: &str) -> Result<(), FormatError> {
    start(writer, name, None)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(write_error)?;
    end(writer, name)
}

/// Numbers use the shortest representation which parses back to the same value
fn value_element<T: Display>(
    writer: &mut XmlWriter,
    name: &str,
    value: T,
) -> Result<(), FormatError> {
    text_element(writer, name, &value.to_string())
}

fn write_header(writer: &mut XmlWriter, project: &ProjectInfo) -> Result<(), FormatError> {
    start(writer, "header", None)?;
    text_element(writer, "name", &project.name)?;
    if let Some(description) = &project.description {
        text_element(writer, "description", description)?;
    }
    text_element(writer, "creator", &project.author)?;
    text_element(writer, "timestamp", &project.date)?;
    if let Some(version) = &project.version {
        text_element(writer, "version", version)?;
    }
    text_element(writer, "cpacsVersion", CPACS_VERSION)?;
    end(writer, "header")
}

fn write_foil(writer: &mut XmlWriter, spec: &AirfoilSpec) -> Result<(), FormatError> {
    match &spec.family {
        AirfoilFamily::Naca4 { code } => {
            text_element(writer, "family", "Naca4")?;
            text_element(writer, "code", code)?;
        }
        AirfoilFamily::Naca5 { code } => {
            text_element(writer, "family", "Naca5")?;
            text_element(writer, "code", code)?;
        }
        AirfoilFamily::Dat { path } => {
            text_element(writer, "family", "Dat")?;
            text_element(writer, "path", &path.to_string_lossy())?;
        }
    }
    value_element(writer, "chord", spec.chord)?;
    value_element(writer, "setting", spec.setting)?;
    value_element(writer, "station", spec.station)?;
    value_element(writer, "dihedral", spec.dihedral)?;
    value_element(writer, "sketchOnly", spec.sketch_only)
}

fn write_frame(writer: &mut XmlWriter, spec: &FrameSpec) -> Result<(), FormatError> {
    value_element(writer, "station", spec.station)?;
    value_element(writer, "width", spec.width)?;
    value_element(writer, "height", spec.height)?;
    value_element(writer, "zOffset", spec.z_offset)?;
    value_element(writer, "pointCount", spec.point_count.count())?;
    value_element(writer, "constrained", spec.constrained)
}

fn write_nacelle(writer: &mut XmlWriter, spec: &NacelleSpec) -> Result<(), FormatError> {
    text_element(writer, "model", spec.model.name())?;
    value_element(writer, "length", spec.length)?;
    value_element(writer, "maxDiameter", spec.max_diameter)?;
    value_element(writer, "maxFraction", spec.max_fraction)?;
    value_element(writer, "pointCount", spec.point_count)?;
    value_element(writer, "axisOffset", spec.axis_offset)
}

fn write_fuselage(writer: &mut XmlWriter, spec: &FuselageSpec) -> Result<(), FormatError> {
    value_element(writer, "length", spec.length)?;
    value_element(writer, "width", spec.width)?;
    value_element(writer, "height", spec.height)?;
    value_element(writer, "xRelMax", spec.x_rel_max)?;
    value_element(writer, "sectionCount", spec.section_count)?;
    value_element(writer, "pointCount", spec.point_count.count())?;
    value_element(writer, "constrained", spec.constrained)
}

fn write_wing(writer: &mut XmlWriter, spec: &WingSpec) -> Result<(), FormatError> {
    value_element(writer, "span", spec.span)?;
    value_element(writer, "sweep", spec.sweep)?;

    start(writer, "root", None)?;
    write_foil(writer, &spec.root)?;
    end(writer, "root")?;

    start(writer, "tip", None)?;
    write_foil(writer, &spec.tip)?;
    end(writer, "tip")
}

fn write_component(writer: &mut XmlWriter, component: &Component) -> Result<(), FormatError> {
    let tag = component.spec.kind();
    start(writer, tag, Some(&component.name))?;
    match &component.spec {
        ComponentSpec::Foil(spec) => write_foil(writer, spec)?,
        ComponentSpec::Frame(spec) => write_frame(writer, spec)?,
        ComponentSpec::Nacelle(spec) => write_nacelle(writer, spec)?,
        ComponentSpec::Fuselage(spec) => write_fuselage(writer, spec)?,
        ComponentSpec::Wing(spec) => write_wing(writer, spec)?,
    }
    end(writer, tag)
}

fn write_design(writer: &mut XmlWriter, design: &AircraftDesign) -> Result<(), FormatError> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;

    start(writer, "cpacs", None)?;
    write_header(writer, &design.project)?;

    start(writer, "vehicles", None)?;
    start(writer, "aircraft", None)?;
    start(writer, "model", Some(&design.project.name))?;

    if let Some(reference) = &design.project.reference_file {
        text_element(writer, "referenceFile", reference)?;
    }

    start(writer, "fuselageDimensions", None)?;
    value_element(writer, "length", design.fuselage_length)?;
    value_element(writer, "width", design.fuselage_width)?;
    value_element(writer, "height", design.fuselage_height)?;
    end(writer, "fuselageDimensions")?;

    start(writer, "components", None)?;
    for component in design.components.iter() {
        write_component(writer, component)?;
    }
    end(writer, "components")?;

    end(writer, "model")?;
    end(writer, "aircraft")?;
    end(writer, "vehicles")?;
    end(writer, "cpacs")
}

/// Writes the design parameters into a new interchange document
pub fn serialize(design: &AircraftDesign) -> Result<Document, FormatError> {
    let mut buffer = Vec::new();
    {
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);
        write_design(&mut writer, design)?;
    }

    let text = String::from_utf8(buffer).map_err(write_error)?;
    debug!(
        project = %design.project.name,
        components = design.components.len(),
        bytes = text.len(),
        "serialized design"
    );
    Ok(Document { text })
}

fn xml_error(e: impl Display) -> FormatError {
    FormatError::Xml(e.to_string())
}

/// An element of the parsed document. Only the `uID` attribute is kept.
#[derive(Debug, Default)]
struct Element {
    name: String,
    uid: Option<String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(e: &BytesStart) -> Result<Element, FormatError> {
        let mut uid = None;
        for attr in e.attributes() {
            let attr = attr.map_err(xml_error)?;
            if attr.key.as_ref() == b"uID" {
                uid = Some(attr.unescape_value().map_err(xml_error)?.into_owned());
            }
        }

        Ok(Element {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            uid,
            ..Element::default()
        })
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn require(&self, name: &'static str, context: &str) -> Result<&Element, FormatError> {
        self.child(name).ok_or_else(|| FormatError::missing(name, context))
    }

    fn text_of(&self, name: &'static str, context: &str) -> Result<String, FormatError> {
        Ok(self.require(name, context)?.text.clone())
    }

    fn optional_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    fn f64_of(&self, name: &'static str, context: &str) -> Result<f64, FormatError> {
        let text = self.text_of(name, context)?;
        text.trim().parse::<f64>().map_err(|_| FormatError::InvalidNumber {
            field: name,
            value: text,
        })
    }

    fn usize_of(&self, name: &'static str, context: &str) -> Result<usize, FormatError> {
        let text = self.text_of(name, context)?;
        text.trim().parse::<usize>().map_err(|_| FormatError::InvalidNumber {
            field: name,
            value: text,
        })
    }

    fn bool_of(&self, name: &'static str, context: &str) -> Result<bool, FormatError> {
        let text = self.text_of(name, context)?;
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(FormatError::InvalidBool {
                field: name,
                value: text,
            }),
        }
    }

    fn frame_points_of(
        &self,
        name: &'static str,
        context: &str,
    ) -> Result<FramePoints, FormatError> {
        let count = self.usize_of(name, context)?;
        FramePoints::try_from(count).map_err(|_| FormatError::InvalidEnum {
            field: name,
            value: count.to_string(),
        })
    }

    /// Label used in error messages, e.g. `foil wing_root`
    fn context(&self) -> String {
        match &self.uid {
            Some(uid) => format!("{} {}", self.name, uid),
            None => self.name.clone(),
        }
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), FormatError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(FormatError::Xml("more than one root element".to_string())),
    }
    Ok(())
}

fn parse_tree(xml: &str) -> Result<Element, FormatError> {
    // Text is kept untrimmed so string fields read back exactly. The indentation between
    // elements lands in the text of container elements, which is never read.
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(Element::from_start(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = Element::from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FormatError::Xml("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Ok(Event::CData(ref c)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(e)),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(FormatError::Xml(format!("unexpected end of document inside <{}>", open.name)));
    }
    root.ok_or_else(|| FormatError::Xml("document has no root element".to_string()))
}

fn read_project(header: &Element, model: &Element) -> Result<ProjectInfo, FormatError> {
    Ok(ProjectInfo {
        name: header.text_of("name", "header")?,
        author: header.text_of("creator", "header")?,
        date: header.text_of("timestamp", "header")?,
        description: header.optional_text("description"),
        version: header.optional_text("version"),
        reference_file: model.optional_text("referenceFile"),
    })
}

fn read_foil(e: &Element, context: &str) -> Result<AirfoilSpec, FormatError> {
    let family_name = e.text_of("family", context)?;
    let family = match family_name.trim() {
        "Naca4" => AirfoilFamily::Naca4 {
            code: e.text_of("code", context)?,
        },
        "Naca5" => AirfoilFamily::Naca5 {
            code: e.text_of("code", context)?,
        },
        "Dat" => AirfoilFamily::Dat {
            path: PathBuf::from(e.text_of("path", context)?),
        },
        _ => {
            return Err(FormatError::InvalidEnum {
                field: "family",
                value: family_name,
            })
        }
    };

    Ok(AirfoilSpec {
        family,
        chord: e.f64_of("chord", context)?,
        setting: e.f64_of("setting", context)?,
        station: e.f64_of("station", context)?,
        dihedral: e.f64_of("dihedral", context)?,
        sketch_only: e.bool_of("sketchOnly", context)?,
    })
}

fn read_frame(e: &Element, context: &str) -> Result<FrameSpec, FormatError> {
    Ok(FrameSpec {
        station: e.f64_of("station", context)?,
        width: e.f64_of("width", context)?,
        height: e.f64_of("height", context)?,
        z_offset: e.f64_of("zOffset", context)?,
        point_count: e.frame_points_of("pointCount", context)?,
        constrained: e.bool_of("constrained", context)?,
    })
}

fn read_nacelle(e: &Element, context: &str) -> Result<NacelleSpec, FormatError> {
    let model_name = e.text_of("model", context)?;
    let model = NacelleModel::from_name(model_name.trim()).ok_or(FormatError::InvalidEnum {
        field: "model",
        value: model_name,
    })?;

    Ok(NacelleSpec {
        model,
        length: e.f64_of("length", context)?,
        max_diameter: e.f64_of("maxDiameter", context)?,
        max_fraction: e.f64_of("maxFraction", context)?,
        point_count: e.usize_of("pointCount", context)?,
        axis_offset: e.f64_of("axisOffset", context)?,
    })
}

fn read_fuselage(e: &Element, context: &str) -> Result<FuselageSpec, FormatError> {
    Ok(FuselageSpec {
        length: e.f64_of("length", context)?,
        width: e.f64_of("width", context)?,
        height: e.f64_of("height", context)?,
        x_rel_max: e.f64_of("xRelMax", context)?,
        section_count: e.usize_of("sectionCount", context)?,
        point_count: e.frame_points_of("pointCount", context)?,
        constrained: e.bool_of("constrained", context)?,
    })
}

fn read_wing(e: &Element, context: &str) -> Result<WingSpec, FormatError> {
    let root_context = format!("{} root", context);
    let tip_context = format!("{} tip", context);
    Ok(WingSpec {
        span: e.f64_of("span", context)?,
        sweep: e.f64_of("sweep", context)?,
        root: read_foil(e.require("root", context)?, &root_context)?,
        tip: read_foil(e.require("tip", context)?, &tip_context)?,
    })
}

fn read_component(e: &Element) -> Result<Option<Component>, FormatError> {
    let context = e.context();
    let spec = match e.name.as_str() {
        "foil" => ComponentSpec::Foil(read_foil(e, &context)?),
        "frame" => ComponentSpec::Frame(read_frame(e, &context)?),
        "nacelle" => ComponentSpec::Nacelle(read_nacelle(e, &context)?),
        "fuselage" => ComponentSpec::Fuselage(read_fuselage(e, &context)?),
        "wing" => ComponentSpec::Wing(read_wing(e, &context)?),
        other => {
            debug!(element = other, "skipping unknown component");
            return Ok(None);
        }
    };

    let name = e.uid.clone().ok_or_else(|| FormatError::missing("uID", context))?;
    Ok(Some(Component { name, spec }))
}

/// Reads the design parameters back from an interchange document
pub fn deserialize(document: &Document) -> Result<AircraftDesign, FormatError> {
    let root = parse_tree(&document.text)?;
    if root.name != "cpacs" {
        return Err(FormatError::missing("cpacs", "document root"));
    }

    let header = root.require("header", "cpacs")?;
    let model = root
        .require("vehicles", "cpacs")?
        .require("aircraft", "vehicles")?
        .require("model", "aircraft")?;
    let dimensions = model.require("fuselageDimensions", "model")?;

    let mut components = Vec::new();
    if let Some(list) = model.child("components") {
        for element in list.children.iter() {
            if let Some(component) = read_component(element)? {
                components.push(component);
            }
        }
    }

    let design = AircraftDesign {
        project: read_project(header, model)?,
        fuselage_length: dimensions.f64_of("length", "fuselageDimensions")?,
        fuselage_width: dimensions.f64_of("width", "fuselageDimensions")?,
        fuselage_height: dimensions.f64_of("height", "fuselageDimensions")?,
        components,
    };

    debug!(
        project = %design.project.name,
        components = design.components.len(),
        "deserialized design"
    );
    Ok(design)
}
