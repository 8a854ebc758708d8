//! A minimal plotly.js figure model for brain surface meshes.
//!
//! The structs serialize to the JSON figure format understood by `Plotly.newPlot`, so a
//! [`Figure`] can be rendered by any plotly.js runtime. Only the attributes needed to show
//! colored surface meshes are modelled.

use serde::Serialize;

use std::fs;
use std::path::Path;

use crate::error::Result;

/// The plotly.js bundle loaded by pages from [`Figure::to_html`].
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const DEFAULT_COLORSCALE: &str = "Viridis";

/// A `mesh3d` trace: one triangulated surface with per-vertex intensities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh3d {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub name: String,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub i: Vec<i32>,
    pub j: Vec<i32>,
    pub k: Vec<i32>,
    pub intensity: Vec<f64>,
    pub colorscale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    pub showscale: bool,
    pub customdata: Vec<f64>,
    pub hoverinfo: String,
    pub hovertemplate: String,
}

impl Default for Mesh3d {
    fn default() -> Mesh3d {
        Mesh3d {
            trace_type: "mesh3d",
            name: String::new(),
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            i: Vec::new(),
            j: Vec::new(),
            k: Vec::new(),
            intensity: Vec::new(),
            colorscale: String::from(DEFAULT_COLORSCALE),
            cmin: None,
            cmax: None,
            showscale: true,
            customdata: Vec::new(),
            hoverinfo: String::from("text"),
            hovertemplate: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: &str) -> Title {
        Title {
            text: text.to_string(),
        }
    }
}

/// A 3D scene axis. The default hides all axis decoration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub showbackground: bool,
    pub showticklabels: bool,
    pub showgrid: bool,
    pub zeroline: bool,
    pub showspikes: bool,
}

impl Axis {
    pub fn hidden() -> Axis {
        Axis {
            showbackground: false,
            showticklabels: false,
            showgrid: false,
            zeroline: false,
            showspikes: false,
        }
    }
}

impl Default for Axis {
    fn default() -> Axis {
        Axis::hidden()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Eye {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub eye: Eye,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            eye: Eye {
                x: 1.5,
                y: 1.5,
                z: 1.5,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub camera: Camera,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub scene: Scene,
    pub legend: Legend,
}

impl Default for Layout {
    fn default() -> Layout {
        Layout {
            title: Title::new(""),
            scene: Scene::default(),
            legend: Legend {
                title: Title::new("Data Files"),
            },
        }
    }
}

/// A plotly.js figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Figure {
    pub data: Vec<Mesh3d>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(layout: Layout) -> Figure {
        Figure {
            data: Vec::new(),
            layout,
        }
    }

    pub fn add_trace(&mut self, trace: Mesh3d) {
        self.data.push(trace);
    }

    /// The figure as plotly.js JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// A standalone HTML page showing the figure.
    pub fn to_html(&self) -> Result<String> {
        let json = self.to_json()?.replace("</", "<\\/");
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{plotly}"></script>
<style>html, body, #plot {{ width: 100%; height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="plot"></div>
<script>
var figure = {json};
Plotly.newPlot("plot", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#,
            title = html_escape(&self.layout.title.text),
            plotly = PLOTLY_JS_URL,
            json = json
        ))
    }

    /// Write the page from [`Figure::to_html`] to a file.
    pub fn write_html<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_html()?)?;
        Ok(())
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
