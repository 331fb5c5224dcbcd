//! Low-level formatting primitives
//!
//! These write directly into `w:pPr`, `w:rPr`, `w:tblPr` and `w:tcPr`.
//! Missing property nodes are materialised in schema order before a value
//! is set on them. Every setter fully replaces the node it owns, so applying
//! the same primitive twice leaves the same tree.
//!
//! Units follow WordprocessingML: twips (1/1440 inch) for indents and
//! margins, twentieths of a point for spacing gaps, 240ths of a line for
//! line spacing, half-points for font sizes, eighths of a point for border
//! weights.

use crate::document::{
    Paragraph, Run, Table, TableCell, PPR_ORDER, RPR_ORDER, TBLPR_ORDER, TCPR_ORDER,
};
use crate::xml::Element;

/// Twips per inch
pub const TWIPS_PER_INCH: i32 = 1440;
/// Half an inch in twips
pub const HALF_INCH: i32 = 720;

/// Convert points to twentieths of a point (also twips)
pub fn points_to_twips(points: f32) -> i32 {
    (points * 20.0).round() as i32
}

/// Convert inches to twips
pub fn inches_to_twips(inches: f32) -> i32 {
    (inches * TWIPS_PER_INCH as f32).round() as i32
}

/// Line spacing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSpacing {
    /// 240 line units
    Single,
    /// 480 line units
    Double,
}

impl LineSpacing {
    /// Value of `w:spacing/@w:line` with `lineRule="auto"`
    pub fn line_value(self) -> u32 {
        match self {
            LineSpacing::Single => 240,
            LineSpacing::Double => 480,
        }
    }
}

/// Paragraph justification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Center,
    Right,
}

impl Justification {
    fn as_str(self) -> &'static str {
        match self {
            Justification::Left => "left",
            Justification::Center => "center",
            Justification::Right => "right",
        }
    }
}

/// One logical side of a table or cell border set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Top,
    Start,
    Bottom,
    End,
    InsideH,
    InsideV,
}

impl BorderSide {
    /// All six sides, in schema order
    pub const ALL: [BorderSide; 6] = [
        BorderSide::Top,
        BorderSide::Start,
        BorderSide::Bottom,
        BorderSide::End,
        BorderSide::InsideH,
        BorderSide::InsideV,
    ];

    /// Local element name inside `w:tblBorders` / `w:tcBorders`
    pub fn local_name(self) -> &'static str {
        match self {
            BorderSide::Top => "top",
            BorderSide::Start => "start",
            BorderSide::Bottom => "bottom",
            BorderSide::End => "end",
            BorderSide::InsideH => "insideH",
            BorderSide::InsideV => "insideV",
        }
    }

    /// Transitional name of the same edge (`w:left`/`w:right`), which
    /// Word 2007 reads instead of `w:start`/`w:end`
    pub fn legacy_name(self) -> Option<&'static str> {
        match self {
            BorderSide::Start => Some("left"),
            BorderSide::End => Some("right"),
            _ => None,
        }
    }

    fn names(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.local_name()).chain(self.legacy_name())
    }
}

const BORDER_ORDER: &[&str] = &[
    "top", "start", "left", "bottom", "end", "right", "insideH", "insideV", "tl2br", "tr2bl",
];

/// Border line style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Single,
}

/// A border edge: style, weight in eighths of a point, colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    pub style: BorderStyle,
    pub weight: u32,
    pub color: String,
}

impl Border {
    /// No line
    pub fn none() -> Self {
        Self {
            style: BorderStyle::None,
            weight: 0,
            color: "auto".to_string(),
        }
    }

    /// A single solid line
    pub fn single(weight: u32, color: impl Into<String>) -> Self {
        Self {
            style: BorderStyle::Single,
            weight,
            color: color.into(),
        }
    }

    /// One edge element per spelling of `side`
    fn to_elements(&self, side: BorderSide) -> impl Iterator<Item = Element> + '_ {
        let val = match self.style {
            BorderStyle::None => "none",
            BorderStyle::Single => "single",
        };
        side.names().map(move |name| {
            Element::new(format!("w:{}", name))
                .with_attr("w:val", val)
                .with_attr("w:sz", self.weight.to_string())
                .with_attr("w:space", "0")
                .with_attr("w:color", self.color.as_str())
        })
    }
}

fn border_set(name: &str) -> Element {
    let none = Border::none();
    BorderSide::ALL
        .iter()
        .flat_map(|side| none.to_elements(*side))
        .fold(Element::new(name), |set, edge| set.with_child(edge))
}

fn font_nodes(props: &mut Element, font: &str, size_pt: f32) {
    let fonts = props.child_or_insert("w:rFonts", RPR_ORDER);
    fonts.clear_attrs();
    fonts.set_attr("w:ascii", font);
    fonts.set_attr("w:hAnsi", font);
    fonts.set_attr("w:cs", font);

    let half_points = ((size_pt * 2.0).round() as u32).to_string();
    props
        .child_or_insert("w:sz", RPR_ORDER)
        .set_attr("w:val", half_points.as_str());
    props
        .child_or_insert("w:szCs", RPR_ORDER)
        .set_attr("w:val", half_points);
}

fn toggle(props: &mut Element, name: &str, on: bool) {
    let node = props.child_or_insert(name, RPR_ORDER);
    node.clear_attrs();
    if !on {
        node.set_attr("w:val", "0");
    }
}

fn toggle_value(props: &Element, local: &str) -> Option<bool> {
    props
        .child(local)
        .map(|node| !matches!(node.attr("val"), Some("0") | Some("false") | Some("off")))
}

impl Paragraph<'_> {
    /// Apply a font to every run and to the paragraph's default run
    /// properties, so runs added later inherit it
    pub fn set_default_font(&mut self, font: &str, size_pt: f32) {
        for mut run in self.runs() {
            run.set_font(font, size_pt);
        }
        let mark = self.properties().child_or_insert("w:rPr", PPR_ORDER);
        font_nodes(mark, font, size_pt);
    }

    /// Exact line spacing plus before/after gaps in points
    pub fn set_spacing(&mut self, mode: LineSpacing, before_pt: f32, after_pt: f32) {
        let spacing = Element::new("w:spacing")
            .with_attr("w:before", points_to_twips(before_pt).to_string())
            .with_attr("w:after", points_to_twips(after_pt).to_string())
            .with_attr("w:line", mode.line_value().to_string())
            .with_attr("w:lineRule", "auto");
        self.properties().replace_child(spacing, PPR_ORDER);
    }

    /// Write an indent in twips.
    ///
    /// A negative `first_line` becomes a `w:hanging` of the same magnitude.
    pub fn set_indent(&mut self, first_line: i32, left: i32) {
        let mut ind = Element::new("w:ind").with_attr("w:left", left.to_string());
        ind = if first_line < 0 {
            ind.with_attr("w:hanging", (-first_line).to_string())
        } else {
            ind.with_attr("w:firstLine", first_line.to_string())
        };
        self.properties().replace_child(ind, PPR_ORDER);
    }

    /// Remove the indent node entirely
    pub fn clear_indent(&mut self) {
        if let Some(props) = self.existing_properties() {
            props.remove_children("ind");
        }
    }

    /// Set `w:jc`
    pub fn set_alignment(&mut self, justification: Justification) {
        self.properties()
            .replace_child(
                Element::new("w:jc").with_attr("w:val", justification.as_str()),
                PPR_ORDER,
            );
    }

    /// Force bold/italic on every run; `None` leaves that toggle alone
    pub fn set_emphasis(&mut self, bold: Option<bool>, italic: Option<bool>) {
        for mut run in self.runs() {
            if let Some(bold) = bold {
                run.set_bold(bold);
            }
            if let Some(italic) = italic {
                run.set_italic(italic);
            }
        }
    }

    /// Remove background shading and highlighting from the paragraph, its
    /// paragraph mark and its runs
    pub fn clear_shading(&mut self) {
        if let Some(props) = self.existing_properties() {
            props.remove_children("shd");
            if let Some(mark) = props.child_mut("rPr") {
                mark.remove_children("shd");
                mark.remove_children("highlight");
            }
        }
        for mut run in self.runs() {
            run.clear_shading();
        }
    }

    /// Append a field run that renders the current page number
    pub fn insert_page_number_field(&mut self) {
        let mut run = Element::new("w:r");
        if let Some(props) = self
            .element()
            .child("pPr")
            .and_then(|ppr| ppr.child("rPr"))
        {
            run.push(props.clone());
        }
        let run = run
            .with_child(Element::new("w:fldChar").with_attr("w:fldCharType", "begin"))
            .with_child(
                Element::new("w:instrText")
                    .with_attr("xml:space", "preserve")
                    .with_text(" PAGE "),
            )
            .with_child(Element::new("w:fldChar").with_attr("w:fldCharType", "end"));
        self.push_run(run);
    }
}

impl Run<'_> {
    /// Set font family (ASCII, high ANSI, complex script) and size
    pub fn set_font(&mut self, font: &str, size_pt: f32) {
        font_nodes(self.properties(), font, size_pt);
    }

    /// Write `w:b` explicitly on or off
    pub fn set_bold(&mut self, on: bool) {
        toggle(self.properties(), "w:b", on);
    }

    /// Write `w:i` explicitly on or off
    pub fn set_italic(&mut self, on: bool) {
        toggle(self.properties(), "w:i", on);
    }

    /// Explicit `w:u w:val="none"`
    pub fn clear_underline(&mut self) {
        self.properties()
            .replace_child(Element::new("w:u").with_attr("w:val", "none"), RPR_ORDER);
    }

    /// Set an RGB text colour, dropping any theme colour reference
    pub fn set_color(&mut self, rgb: &str) {
        self.properties()
            .replace_child(Element::new("w:color").with_attr("w:val", rgb), RPR_ORDER);
    }

    /// Remove `w:shd` and `w:highlight`
    pub fn clear_shading(&mut self) {
        if let Some(props) = self.existing_properties() {
            props.remove_children("shd");
            props.remove_children("highlight");
        }
    }

    /// Direct bold toggle, if the run sets one
    pub fn bold(&self) -> Option<bool> {
        self.element().child("rPr").and_then(|p| toggle_value(p, "b"))
    }

    /// Direct italic toggle, if the run sets one
    pub fn italic(&self) -> Option<bool> {
        self.element().child("rPr").and_then(|p| toggle_value(p, "i"))
    }
}

impl Table<'_> {
    /// Replace table-level borders with "none" on every side
    pub fn clear_borders(&mut self) {
        self.properties()
            .replace_child(border_set("w:tblBorders"), TBLPR_ORDER);
    }

    /// Replace the default cell margins (twips)
    pub fn set_cell_margins(&mut self, vertical: i32, horizontal: i32) {
        let margin = |side: &str, value: i32| {
            Element::new(format!("w:{}", side))
                .with_attr("w:w", value.to_string())
                .with_attr("w:type", "dxa")
        };
        let margins = Element::new("w:tblCellMar")
            .with_child(margin("top", vertical))
            .with_child(margin("start", horizontal))
            .with_child(margin("bottom", vertical))
            .with_child(margin("end", horizontal));
        self.properties().replace_child(margins, TBLPR_ORDER);
    }
}

impl TableCell<'_> {
    /// Replace the cell's borders with "none" on every side
    pub fn clear_borders(&mut self) {
        self.properties()
            .replace_child(border_set("w:tcBorders"), TCPR_ORDER);
    }

    /// Set the given sides of the cell border
    pub fn set_border(&mut self, sides: &[BorderSide], border: &Border) {
        let borders = self.properties().child_or_insert("w:tcBorders", TCPR_ORDER);
        for side in sides {
            for edge in border.to_elements(*side) {
                borders.replace_child(edge, BORDER_ORDER);
            }
        }
    }

    /// The border currently written for a side, if any
    pub fn border(&self, side: BorderSide) -> Option<Border> {
        let edge = self
            .element()
            .child("tcPr")?
            .child("tcBorders")?
            .child(side.local_name())?;
        let style = match edge.attr("val") {
            Some("none") | Some("nil") | None => BorderStyle::None,
            Some(_) => BorderStyle::Single,
        };
        Some(Border {
            style,
            weight: edge.attr("sz").and_then(|s| s.parse().ok()).unwrap_or(0),
            color: edge.attr("color").unwrap_or("auto").to_string(),
        })
    }

    /// Remove cell background shading
    pub fn clear_shading(&mut self) {
        if let Some(props) = self.existing_properties() {
            props.remove_children("shd");
        }
    }
}
