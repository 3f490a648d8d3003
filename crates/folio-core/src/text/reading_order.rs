use crate::model::{Block, Dimension, Layout, Page};
use crate::text::{anchor, FullText};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Axis-aligned bounding box of a polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    fn from_points(points: impl Iterator<Item = (f32, f32)>) -> Option<BBox> {
        let mut bbox: Option<BBox> = None;
        for (x, y) in points {
            bbox = Some(match bbox {
                None => BBox {
                    x_min: x,
                    y_min: y,
                    x_max: x,
                    y_max: y,
                },
                Some(b) => BBox {
                    x_min: b.x_min.min(x),
                    y_min: b.y_min.min(y),
                    x_max: b.x_max.max(x),
                    y_max: b.y_max.max(y),
                },
            });
        }
        bbox
    }

    /// Top-to-bottom, then left-to-right.
    fn reading_cmp(&self, other: &BBox) -> Ordering {
        self.y_min
            .total_cmp(&other.y_min)
            .then(self.x_min.total_cmp(&other.x_min))
    }
}

/// Which page elements reading-order assembly walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextUnit {
    #[default]
    Blocks,
    Paragraphs,
    Lines,
}

/// How a page's text is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTextMode {
    /// Geometric ordering of page elements.
    #[default]
    ReadingOrder,
    /// The page's own layout anchor, as the service delivered it.
    PageAnchor,
}

/// Bounding box of an element's polygon.
///
/// Pixel vertices are used when present. Otherwise normalized vertices are
/// scaled by the page dimension (or left in 0..1 when the page has none).
/// Elements without any geometry get a zero box at the origin and therefore
/// sort before everything else.
pub fn bounding_box(layout: Option<&Layout>, dimension: Option<&Dimension>) -> BBox {
    let Some(poly) = layout.and_then(|l| l.bounding_poly.as_ref()) else {
        return BBox::default();
    };

    if let Some(bbox) = BBox::from_points(poly.vertices.iter().map(|v| (v.x, v.y))) {
        return bbox;
    }

    let (width, height) = match dimension {
        Some(d) if d.width > 0.0 && d.height > 0.0 => (d.width, d.height),
        _ => (1.0, 1.0),
    };
    BBox::from_points(
        poly.normalized_vertices
            .iter()
            .map(|v| (v.x * width, v.y * height)),
    )
    .unwrap_or_default()
}

/// Page text from its blocks in reading order.
///
/// Blocks are sorted by the top, then the left edge of their bounding box;
/// the sort is stable so ties keep delivery order. Each block's text is
/// trimmed and empty blocks are dropped before joining with newlines.
pub fn assemble_page_text(page: &Page, text: &FullText) -> String {
    assemble_elements(&page.blocks, page.dimension.as_ref(), text)
}

/// Page text according to `mode`, walking `unit` for reading-order assembly.
pub fn page_text(page: &Page, text: &FullText, mode: PageTextMode, unit: TextUnit) -> String {
    match mode {
        PageTextMode::PageAnchor => {
            let anchor = page.layout.as_ref().and_then(|l| l.text_anchor.as_ref());
            anchor::resolve_trimmed(anchor, text)
        }
        PageTextMode::ReadingOrder => {
            let elements = match unit {
                TextUnit::Blocks => &page.blocks,
                TextUnit::Paragraphs => &page.paragraphs,
                TextUnit::Lines => &page.lines,
            };
            assemble_elements(elements, page.dimension.as_ref(), text)
        }
    }
}

fn assemble_elements(elements: &[Block], dimension: Option<&Dimension>, text: &FullText) -> String {
    let mut items: Vec<(BBox, String)> = elements
        .iter()
        .map(|element| {
            let layout = element.layout.as_ref();
            let bbox = bounding_box(layout, dimension);
            let content =
                anchor::resolve_trimmed(layout.and_then(|l| l.text_anchor.as_ref()), text);
            (bbox, content)
        })
        .collect();

    items.sort_by(|a, b| a.0.reading_cmp(&b.0));

    let dropped = items.iter().filter(|(_, t)| t.is_empty()).count();
    if dropped > 0 {
        log::debug!("dropped {dropped} element(s) with no text");
    }

    items
        .into_iter()
        .filter(|(_, t)| !t.is_empty())
        .map(|(_, t)| t)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingPoly, TextAnchor, Vertex};

    fn block(start: i64, end: i64, x: f32, y: f32) -> Block {
        Block::new(
            TextAnchor::span(start, end),
            BoundingPoly::from_vertices([(x, y), (x + 10.0, y), (x + 10.0, y + 5.0), (x, y + 5.0)]),
        )
    }

    fn page(blocks: Vec<Block>) -> Page {
        Page {
            page_number: 1,
            blocks,
            ..Page::default()
        }
    }

    #[test]
    fn test_top_before_bottom() {
        let text = FullText::new("bottomtop");
        let p = page(vec![block(0, 6, 0.0, 50.0), block(6, 9, 0.0, 0.0)]);
        assert_eq!(assemble_page_text(&p, &text), "top\nbottom");
    }

    #[test]
    fn test_left_before_right_on_same_row() {
        let text = FullText::new("rightleft");
        let p = page(vec![block(0, 5, 300.0, 10.0), block(5, 9, 20.0, 10.0)]);
        assert_eq!(assemble_page_text(&p, &text), "left\nright");
    }

    #[test]
    fn test_ties_keep_delivery_order() {
        let text = FullText::new("firstsecond");
        let p = page(vec![block(0, 5, 0.0, 0.0), block(5, 11, 0.0, 0.0)]);
        assert_eq!(assemble_page_text(&p, &text), "first\nsecond");
    }

    #[test]
    fn test_empty_blocks_leave_no_blank_line() {
        let text = FullText::new("top   bottom");
        let empty = Block::new(TextAnchor::default(), BoundingPoly::from_vertices([(0.0, 20.0)]));
        let blank = block(3, 6, 0.0, 30.0);
        let p = page(vec![block(6, 12, 0.0, 40.0), empty, blank, block(0, 3, 0.0, 0.0)]);
        assert_eq!(assemble_page_text(&p, &text), "top\nbottom");
    }

    #[test]
    fn test_block_text_is_trimmed() {
        let text = FullText::new("  Heading \n");
        let p = page(vec![block(0, 11, 0.0, 0.0)]);
        assert_eq!(assemble_page_text(&p, &text), "Heading");
    }

    #[test]
    fn test_missing_geometry_sorts_first() {
        let text = FullText::new("bodyfooter");
        let no_geometry = Block {
            layout: Some(Layout {
                text_anchor: Some(TextAnchor::span(4, 10)),
                ..Layout::default()
            }),
        };
        let p = page(vec![block(0, 4, 5.0, 5.0), no_geometry]);
        assert_eq!(assemble_page_text(&p, &text), "footer\nbody");
    }

    #[test]
    fn test_normalized_vertices_scaled_by_dimension() {
        let layout = Layout {
            bounding_poly: Some(BoundingPoly {
                vertices: Vec::new(),
                normalized_vertices: vec![Vertex { x: 0.5, y: 0.25 }, Vertex { x: 0.75, y: 0.5 }],
            }),
            ..Layout::default()
        };
        let dim = Dimension {
            width: 200.0,
            height: 400.0,
            unit: Some("pixels".into()),
        };
        assert_eq!(
            bounding_box(Some(&layout), Some(&dim)),
            BBox {
                x_min: 100.0,
                y_min: 100.0,
                x_max: 150.0,
                y_max: 200.0
            }
        );
        assert_eq!(bounding_box(Some(&layout), None).x_max, 0.75);
        assert_eq!(bounding_box(None, Some(&dim)), BBox::default());
    }

    #[test]
    fn test_page_anchor_mode() {
        let text = FullText::new(" whole page text ");
        let mut p = page(vec![block(0, 5, 0.0, 0.0)]);
        p.layout = Some(Layout {
            text_anchor: Some(TextAnchor::span(0, 17)),
            ..Layout::default()
        });
        assert_eq!(
            page_text(&p, &text, PageTextMode::PageAnchor, TextUnit::Blocks),
            "whole page text"
        );
    }

    #[test]
    fn test_reading_order_over_lines() {
        let text = FullText::new("line twoline one");
        let mut p = page(Vec::new());
        p.lines = vec![block(0, 8, 0.0, 20.0), block(8, 16, 0.0, 10.0)];
        assert_eq!(
            page_text(&p, &text, PageTextMode::ReadingOrder, TextUnit::Lines),
            "line one\nline two"
        );
        assert_eq!(
            page_text(&p, &text, PageTextMode::ReadingOrder, TextUnit::Blocks),
            ""
        );
    }

    #[test]
    fn test_nan_coordinates_do_not_panic() {
        let text = FullText::new("ab");
        let p = page(vec![block(0, 1, 0.0, f32::NAN), block(1, 2, 0.0, 0.0)]);
        let out = assemble_page_text(&p, &text);
        assert_eq!(out.len(), 3);
    }
}
