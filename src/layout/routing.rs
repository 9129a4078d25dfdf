use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::LayerConfig;
use crate::ir::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkRoute {
    /// Straight segment between the anchors.
    Direct,
    /// Down, across at the vertical midpoint, down again.
    SCurve,
    /// Backward link: out to the side of the source, up, and back in above
    /// the destination.
    LoopAround,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkPath {
    pub route: LinkRoute,
    pub commands: Vec<PathCommand>,
}

impl LinkPath {
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::QuadTo { to, .. } => to,
        })
    }
}

impl fmt::Display for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", num(p.x), num(p.y))?,
                PathCommand::LineTo(p) => write!(f, "L{},{}", num(p.x), num(p.y))?,
                PathCommand::QuadTo { control, to } => write!(
                    f,
                    "Q{},{},{},{}",
                    num(control.x),
                    num(control.y),
                    num(to.x),
                    num(to.y)
                )?,
            }
        }
        Ok(())
    }
}

impl Serialize for LinkPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Negative zero prints as "0".
fn num(v: f32) -> f32 {
    if v == 0.0 { 0.0 } else { v }
}

/// Path from a source anchor (bottom of the upstream layer) to a destination
/// anchor (top of the downstream layer).
pub fn link_path(src: Point, dest: Point, layer: &LayerConfig) -> LinkPath {
    let offset = layer.link_offset();
    let (x1, y1) = (src.x, src.y);
    let (x2, y2) = (dest.x, dest.y);
    let p = Point::new;

    let mut commands = vec![PathCommand::MoveTo(src)];
    let route;

    if y2 - y1 > offset * 2.0 && (x1 - x2).abs() > offset * 2.0 {
        route = LinkRoute::SCurve;
        let half_y = (y1 + y2) / 2.0;
        let sign = if x1 < x2 { 1.0 } else { -1.0 };
        commands.extend([
            PathCommand::LineTo(p(x1, half_y - offset)),
            PathCommand::QuadTo {
                control: p(x1, half_y),
                to: p(x1 + sign * offset, half_y),
            },
            PathCommand::LineTo(p(x2 - sign * offset, half_y)),
            PathCommand::QuadTo {
                control: p(x2, half_y),
                to: p(x2, half_y + offset),
            },
        ]);
    } else if y1 > y2 {
        route = LinkRoute::LoopAround;
        let half_x = layer.loop_reach();
        let sign = if x1 + half_x < x2 { 1.0 } else { -1.0 };
        let side = x1 + half_x;
        commands.extend([
            PathCommand::QuadTo {
                control: p(x1, y1 + offset),
                to: p(x1 + offset, y1 + offset),
            },
            PathCommand::LineTo(p(side - offset, y1 + offset)),
            PathCommand::QuadTo {
                control: p(side, y1 + offset),
                to: p(side, y1),
            },
            PathCommand::LineTo(p(side, y2)),
            PathCommand::QuadTo {
                control: p(side, y2 - offset),
                to: p(side + sign * offset, y2 - offset),
            },
            PathCommand::LineTo(p(x2 - sign * offset, y2 - offset)),
            PathCommand::QuadTo {
                control: p(x2, y2 - offset),
                to: p(x2, y2),
            },
        ]);
    } else {
        route = LinkRoute::Direct;
    }

    commands.push(PathCommand::LineTo(dest));
    LinkPath { route, commands }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> LayerConfig {
        LayerConfig::default()
    }

    #[test]
    fn close_downward_link_is_a_single_line() {
        let path = link_path(Point::new(100.0, 40.0), Point::new(100.0, 80.0), &layer());
        assert_eq!(path.route, LinkRoute::Direct);
        assert_eq!(path.to_svg(), "M100,40L100,80");
    }

    #[test]
    fn small_horizontal_shift_stays_direct() {
        let path = link_path(Point::new(100.0, 40.0), Point::new(115.0, 200.0), &layer());
        assert_eq!(path.route, LinkRoute::Direct);
        assert_eq!(path.commands.len(), 2);
    }

    #[test]
    fn distant_downward_link_bends_at_midpoint() {
        let path = link_path(Point::new(100.0, 40.0), Point::new(400.0, 120.0), &layer());
        assert_eq!(path.route, LinkRoute::SCurve);
        assert_eq!(
            path.to_svg(),
            "M100,40L100,70Q100,80,110,80L390,80Q400,80,400,90L400,120"
        );
    }

    #[test]
    fn s_curve_turns_toward_travel_direction() {
        let path = link_path(Point::new(400.0, 40.0), Point::new(100.0, 120.0), &layer());
        assert_eq!(
            path.to_svg(),
            "M400,40L400,70Q400,80,390,80L110,80Q100,80,100,90L100,120"
        );
    }

    #[test]
    fn backward_link_loops_around() {
        let path = link_path(Point::new(100.0, 240.0), Point::new(100.0, 0.0), &layer());
        assert_eq!(path.route, LinkRoute::LoopAround);
        assert_eq!(
            path.to_svg(),
            "M100,240Q100,250,110,250L270,250Q280,250,280,240L280,0\
             Q280,-10,270,-10L110,-10Q100,-10,100,0L100,0"
        );
    }

    #[test]
    fn backward_link_to_far_right_turns_outward() {
        let path = link_path(Point::new(100.0, 240.0), Point::new(500.0, 0.0), &layer());
        assert_eq!(path.route, LinkRoute::LoopAround);
        assert!(path.to_svg().contains("Q280,-10,290,-10L490,-10"));
        assert_eq!(path.end(), Some(Point::new(500.0, 0.0)));
    }

    #[test]
    fn path_is_deterministic() {
        let a = link_path(Point::new(13.5, 7.0), Point::new(321.0, 99.0), &layer());
        let b = link_path(Point::new(13.5, 7.0), Point::new(321.0, 99.0), &layer());
        assert_eq!(a, b);
        assert_eq!(a.to_svg(), b.to_svg());
    }
}
