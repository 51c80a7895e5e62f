//! Logo placement for vector output
//!
//! The QR markup is treated as opaque text: the only things read from it are
//! the `width`, `height` and `viewBox` attributes of the root `<svg>` element,
//! and the only change is one `<image>` element inserted before the closing
//! root tag.

use crate::error::{BrandQrError, Result};
use crate::logo::LogoAsset;

const CLOSING_TAG: &str = "</svg>";

/// A `viewBox` rectangle in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse `min-x min-y width height`, separated by whitespace and/or commas
    pub fn parse(value: &str) -> Option<Self> {
        let mut numbers = value
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse::<f64>);

        let x = numbers.next()?.ok()?;
        let y = numbers.next()?.ok()?;
        let width = numbers.next()?.ok()?;
        let height = numbers.next()?.ok()?;
        if numbers.next().is_some() || !(width > 0.0 && height > 0.0) {
            return None;
        }

        Some(Self {
            x,
            y,
            width,
            height,
        })
    }
}

/// Size attributes declared on the root `<svg>` element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgGeometry {
    pub width: f64,
    pub height: f64,
    pub view_box: ViewBox,
}

impl SvgGeometry {
    /// Read `width`, `height` and `viewBox` from the root element
    ///
    /// Returns `None` unless all three are present and numeric.
    pub fn from_markup(svg: &str) -> Option<Self> {
        let tag = root_start_tag(svg)?;
        Some(Self {
            width: parse_length(attribute(tag, "width")?)?,
            height: parse_length(attribute(tag, "height")?)?,
            view_box: ViewBox::parse(attribute(tag, "viewBox")?)?,
        })
    }
}

/// Where the logo `<image>` goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogoPlacement {
    /// Exact placement in viewBox user units
    Absolute {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Anchored at 50%/50% and shifted back by half its size with a
    /// percentage `translate`
    ///
    /// Renderers disagree on percentages inside `transform`, so this only
    /// approximates the center.
    Percentage { percent: u32 },
}

impl LogoPlacement {
    /// Compute the placement for a QR document, falling back to percentage
    /// placement when the root geometry cannot be read
    pub fn for_markup(svg: &str, logo_frac: f64) -> Self {
        SvgGeometry::from_markup(svg).map_or_else(
            || {
                log::warn!("QR SVG has no usable width/height/viewBox; using percentage placement");
                Self::percentage(logo_frac)
            },
            |geometry| Self::centered_in(&geometry.view_box, logo_frac),
        )
    }

    /// Center a box of `logo_frac` times the viewBox size
    pub fn centered_in(view_box: &ViewBox, logo_frac: f64) -> Self {
        let width = view_box.width * logo_frac;
        let height = view_box.height * logo_frac;
        let cx = view_box.x + view_box.width / 2.0;
        let cy = view_box.y + view_box.height / 2.0;
        Self::Absolute {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    pub fn percentage(logo_frac: f64) -> Self {
        Self::Percentage {
            percent: (logo_frac * 100.0).floor() as u32,
        }
    }

    /// Render the `<image>` element for a logo data URI
    pub fn image_element(&self, href: &str) -> String {
        match *self {
            Self::Absolute {
                x,
                y,
                width,
                height,
            } => format!(
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{href}\" />",
                format_number(x),
                format_number(y),
                format_number(width),
                format_number(height),
            ),
            Self::Percentage { percent } => {
                let half = format_number(f64::from(percent) / 2.0);
                format!(
                    "<image x=\"50%\" y=\"50%\" width=\"{percent}%\" height=\"{percent}%\" href=\"{href}\" transform=\"translate(-{half}%, -{half}%)\" />"
                )
            }
        }
    }
}

/// Insert `element` immediately before the closing root tag
pub fn insert_before_closing_tag(svg: &str, element: &str) -> Result<String> {
    let index = svg
        .rfind(CLOSING_TAG)
        .ok_or_else(|| BrandQrError::MalformedSvg(format!("missing closing {CLOSING_TAG} tag")))?;

    let mut output = String::with_capacity(svg.len() + element.len());
    output.push_str(&svg[..index]);
    output.push_str(element);
    output.push_str(&svg[index..]);
    Ok(output)
}

/// Embed a logo at the center of QR SVG markup
pub fn embed_logo(svg: &str, logo: &LogoAsset, logo_frac: f64) -> Result<String> {
    let href = logo.to_data_uri()?;
    let placement = LogoPlacement::for_markup(svg, logo_frac);
    log::debug!("Embedding {} logo at {:?}", logo.path().display(), placement);
    insert_before_closing_tag(svg, &placement.image_element(&href))
}

/// Start tag of the root `<svg>` element, without the angle brackets
fn root_start_tag(svg: &str) -> Option<&str> {
    let mut rest = svg;
    loop {
        let start = rest.find("<svg")?;
        let after = &rest[start + 4..];
        // Skip elements such as <svgFoo> that merely share the prefix
        if after.starts_with(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/') {
            let end = after.find('>')?;
            return Some(&after[..end]);
        }
        rest = after;
    }
}

/// Value of `name="..."` or `name='...'` inside a start tag
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = tag;
    while let Some(pos) = rest.find(name) {
        let preceded_by_space = rest[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace());
        let after = rest[pos + name.len()..].trim_start();

        if preceded_by_space {
            if let Some(value) = after.strip_prefix('=') {
                let value = value.trim_start();
                let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
                let value = &value[1..];
                return value.find(quote).map(|end| &value[..end]);
            }
        }
        rest = &rest[pos + name.len()..];
    }
    None
}

/// Parse a length such as `37`, `37.5` or `100px`; percentages are rejected
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let unit_start = value
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(unit_start);
    if !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    number.parse().ok()
}

/// Format a coordinate without a trailing `.0`, rounded to four decimals
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}
