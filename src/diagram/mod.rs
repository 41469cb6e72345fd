//! draw.io export of the maker-checker approval workflow.
//!
//! The workflow is fixed: [`maker_checker`] returns the steps, edges and
//! lanes, [`to_drawio_xml`] turns any [`Diagram`] into an `mxfile` document
//! that diagrams.net can open. Nothing here renders anything.

mod workflow;

use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use thiserror::Error;

pub use workflow::maker_checker;

pub const DIAGRAM_FILE_NAME: &str = "maker_checker_process.drawio.xml";
pub const DIAGRAM_MIME: &str = "application/xml";

// Layout, in draw.io units.
const LANE_WIDTH: u32 = 220;
const LANE_HEADER: u32 = 30;
const STEP_WIDTH: u32 = 160;
const STEP_HEIGHT: u32 = 60;
const STEP_GAP: u32 = 40;

const ROOT_ID: &str = "0";
const LAYER_ID: &str = "1";
// Generated cell ids are `lane-<n>` and `edge-<n>`.
const LANE_PREFIX: &str = "lane-";
const EDGE_PREFIX: &str = "edge-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("unknown step '{0}'")]
    UnknownStep(String),

    #[error("step id '{0}' is used more than once")]
    DuplicateStep(String),

    #[error("step id '{0}' clashes with a generated cell id")]
    ReservedId(String),

    #[error("XML error: {0}")]
    Xml(String),
}

fn xml<E: std::fmt::Display>(e: E) -> DiagramError {
    DiagramError::Xml(e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Terminator,
    Process,
    Decision,
    Document,
}

impl Shape {
    fn style(self) -> &'static str {
        match self {
            Shape::Terminator => "ellipse;whiteSpace=wrap;html=1;",
            Shape::Process => "rounded=1;whiteSpace=wrap;html=1;",
            Shape::Decision => "rhombus;whiteSpace=wrap;html=1;",
            Shape::Document => "shape=document;whiteSpace=wrap;html=1;boundedLbl=1;",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Step {
    pub id: String,
    pub label: String,
    pub shape: Shape,
    /// Extra draw.io style appended to the shape's own, e.g. `fillColor=#dae8fc;`.
    pub style: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

/// A named swimlane holding step ids, drawn top to bottom in this order.
#[derive(Debug, Clone)]
pub struct Lane {
    pub name: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Diagram {
    pub name: String,
    pub steps: Vec<Step>,
    pub edges: Vec<Edge>,
    pub lanes: Vec<Lane>,
}

impl Diagram {
    /// Every referenced step exists and every step id is unique, including
    /// against the cell ids the exporter generates.
    pub fn validate(&self) -> Result<(), DiagramError> {
        let mut ids = HashSet::new();
        for step in &self.steps {
            if is_reserved(&step.id) {
                return Err(DiagramError::ReservedId(step.id.clone()));
            }
            if !ids.insert(step.id.as_str()) {
                return Err(DiagramError::DuplicateStep(step.id.clone()));
            }
        }

        let referenced = self
            .edges
            .iter()
            .flat_map(|e| [&e.source, &e.target])
            .chain(self.lanes.iter().flat_map(|l| l.steps.iter()));
        for id in referenced {
            if !ids.contains(id.as_str()) {
                return Err(DiagramError::UnknownStep(id.clone()));
            }
        }
        Ok(())
    }
}

/// Where a vertex goes: its parent cell and geometry relative to it.
struct Placement {
    parent: String,
    x: u32,
    y: u32,
}

fn is_reserved(id: &str) -> bool {
    id == ROOT_ID || id == LAYER_ID || id.starts_with(LANE_PREFIX) || id.starts_with(EDGE_PREFIX)
}

fn lane_id(index: usize) -> String {
    format!("{LANE_PREFIX}{index}")
}

fn layout(diagram: &Diagram) -> HashMap<&str, Placement> {
    let mut placements = HashMap::new();

    for (i, lane) in diagram.lanes.iter().enumerate() {
        for (row, step) in lane.steps.iter().enumerate() {
            placements.entry(step.as_str()).or_insert(Placement {
                parent: lane_id(i),
                x: (LANE_WIDTH - STEP_WIDTH) / 2,
                y: LANE_HEADER + STEP_GAP / 2 + row as u32 * (STEP_HEIGHT + STEP_GAP),
            });
        }
    }

    // Steps outside every lane get a free column to the right.
    let free_x = diagram.lanes.len() as u32 * LANE_WIDTH + STEP_GAP;
    let mut row = 0;
    for step in &diagram.steps {
        if placements.contains_key(step.id.as_str()) {
            continue;
        }
        placements.insert(
            step.id.as_str(),
            Placement {
                parent: LAYER_ID.to_string(),
                x: free_x,
                y: STEP_GAP + row * (STEP_HEIGHT + STEP_GAP),
            },
        );
        row += 1;
    }
    placements
}

fn lane_height(diagram: &Diagram) -> u32 {
    let rows = diagram
        .lanes
        .iter()
        .map(|l| l.steps.len() as u32)
        .max()
        .unwrap_or(0);
    LANE_HEADER + STEP_GAP / 2 + rows * (STEP_HEIGHT + STEP_GAP)
}

/// Serialize a diagram as a draw.io (`mxfile`) document.
pub fn to_drawio_xml(diagram: &Diagram) -> Result<String, DiagramError> {
    diagram.validate()?;

    let mut wr = Writer::new_with_indent(Vec::new(), b' ', 2);
    wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml)?;
    wr.write_event(Event::Start(
        BytesStart::new("mxfile").with_attributes([("host", "account-lookup")]),
    ))
    .map_err(xml)?;
    wr.write_event(Event::Start(BytesStart::new("diagram").with_attributes([
        ("id", "maker-checker"),
        ("name", diagram.name.as_str()),
    ])))
    .map_err(xml)?;
    wr.write_event(Event::Start(BytesStart::new("mxGraphModel").with_attributes([
        ("grid", "1"),
        ("gridSize", "10"),
        ("page", "1"),
    ])))
    .map_err(xml)?;
    wr.write_event(Event::Start(BytesStart::new("root")))
        .map_err(xml)?;

    wr.write_event(Event::Empty(
        BytesStart::new("mxCell").with_attributes([("id", ROOT_ID)]),
    ))
    .map_err(xml)?;
    wr.write_event(Event::Empty(
        BytesStart::new("mxCell").with_attributes([("id", LAYER_ID), ("parent", ROOT_ID)]),
    ))
    .map_err(xml)?;

    let height = lane_height(diagram);
    for (i, lane) in diagram.lanes.iter().enumerate() {
        let id = lane_id(i);
        let x = (i as u32 * LANE_WIDTH).to_string();
        write_vertex(
            &mut wr,
            &[
                ("id", id.as_str()),
                ("value", lane.name.as_str()),
                ("style", "swimlane;horizontal=1;startSize=30;html=1;"),
                ("vertex", "1"),
                ("parent", LAYER_ID),
            ],
            &[
                ("x", x.as_str()),
                ("y", "0"),
                ("width", LANE_WIDTH.to_string().as_str()),
                ("height", height.to_string().as_str()),
            ],
        )?;
    }

    let placements = layout(diagram);
    for step in &diagram.steps {
        let Some(place) = placements.get(step.id.as_str()) else {
            continue;
        };
        let style = format!("{}{}", step.shape.style(), step.style.as_deref().unwrap_or(""));
        write_vertex(
            &mut wr,
            &[
                ("id", step.id.as_str()),
                ("value", step.label.as_str()),
                ("style", style.as_str()),
                ("vertex", "1"),
                ("parent", place.parent.as_str()),
            ],
            &[
                ("x", place.x.to_string().as_str()),
                ("y", place.y.to_string().as_str()),
                ("width", STEP_WIDTH.to_string().as_str()),
                ("height", STEP_HEIGHT.to_string().as_str()),
            ],
        )?;
    }

    for (i, edge) in diagram.edges.iter().enumerate() {
        let id = format!("{EDGE_PREFIX}{i}");
        let mut attrs = vec![
            ("id", id.as_str()),
            ("style", "edgeStyle=orthogonalEdgeStyle;rounded=0;html=1;endArrow=block;"),
            ("edge", "1"),
            ("parent", LAYER_ID),
            ("source", edge.source.as_str()),
            ("target", edge.target.as_str()),
        ];
        if let Some(label) = &edge.label {
            attrs.insert(1, ("value", label.as_str()));
        }
        wr.write_event(Event::Start(BytesStart::new("mxCell").with_attributes(attrs)))
            .map_err(xml)?;
        wr.write_event(Event::Empty(
            BytesStart::new("mxGeometry").with_attributes([("relative", "1"), ("as", "geometry")]),
        ))
        .map_err(xml)?;
        wr.write_event(Event::End(BytesEnd::new("mxCell")))
            .map_err(xml)?;
    }

    for tag in ["root", "mxGraphModel", "diagram", "mxfile"] {
        wr.write_event(Event::End(BytesEnd::new(tag))).map_err(xml)?;
    }

    String::from_utf8(wr.into_inner()).map_err(xml)
}

fn write_vertex(
    wr: &mut Writer<Vec<u8>>,
    cell: &[(&str, &str)],
    geometry: &[(&str, &str)],
) -> Result<(), DiagramError> {
    wr.write_event(Event::Start(
        BytesStart::new("mxCell").with_attributes(cell.iter().copied()),
    ))
    .map_err(xml)?;
    wr.write_event(Event::Empty(
        BytesStart::new("mxGeometry")
            .with_attributes(geometry.iter().copied())
            .with_attributes([("as", "geometry")]),
    ))
    .map_err(xml)?;
    wr.write_event(Event::End(BytesEnd::new("mxCell")))
        .map_err(xml)?;
    Ok(())
}
