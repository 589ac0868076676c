//! 图表 SVG 绘制
//!
//! Y 轴靠右，网格线与刻度使用视觉配置中的颜色和字体；
//! 曲线按张力做 Catmull-Rom 平滑，数据点仅在悬停时显示

use std::fmt::Write;

use crate::models::{ChartState, Fill, Rgba};
use crate::services::common::{escape_html, format_grouped, format_grouped_with};

/// 右侧刻度区宽度
const AXIS_WIDTH: f64 = 64.0;
/// 绘图区内边距
const PADDING: f64 = 8.0;
/// 期望的刻度数量
const TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

/// 绘图区
#[derive(Debug, Clone, Copy)]
struct Area {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

/// 纵轴刻度
#[derive(Debug, Clone, PartialEq)]
struct Scale {
    min: f64,
    max: f64,
    step: f64,
}

impl Scale {
    /// 按数据范围计算整齐的刻度
    fn nice(lo: f64, hi: f64) -> Self {
        let (lo, hi) = if (hi - lo).abs() < f64::EPSILON {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.01 };
            (lo - pad, hi + pad)
        } else {
            (lo, hi)
        };

        let step = nice_step((hi - lo) / (TICK_COUNT - 1) as f64);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count).map(|i| self.min + self.step * i as f64).collect()
    }

    fn decimals(&self) -> usize {
        if self.step >= 1.0 {
            0
        } else {
            (-self.step.log10()).ceil() as usize
        }
    }
}

/// 1、2、5 系列的刻度步长
fn nice_step(raw: f64) -> f64 {
    let exp = raw.log10().floor();
    let base = 10f64.powf(exp);
    let fraction = raw / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// 计算每个点前后两个贝塞尔控制点，控制点纵坐标限制在绘图区内
fn control_points(points: &[Point], tension: f64, area: &Area) -> Vec<(Point, Point)> {
    let clamp = |p: Point| Point {
        x: p.x,
        y: p.y.clamp(area.top, area.bottom),
    };

    (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let curr = points[i];
            let next = points[(i + 1).min(points.len() - 1)];

            let d01 = ((curr.x - prev.x).powi(2) + (curr.y - prev.y).powi(2)).sqrt();
            let d12 = ((next.x - curr.x).powi(2) + (next.y - curr.y).powi(2)).sqrt();
            let total = d01 + d12;
            let (s01, s12) = if total > 0.0 { (d01 / total, d12 / total) } else { (0.0, 0.0) };

            let fa = tension * s01;
            let fb = tension * s12;
            let dx = next.x - prev.x;
            let dy = next.y - prev.y;

            (
                clamp(Point { x: curr.x - fa * dx, y: curr.y - fa * dy }),
                clamp(Point { x: curr.x + fb * dx, y: curr.y + fb * dy }),
            )
        })
        .collect()
}

fn line_path(points: &[Point], tension: f64, area: &Area) -> String {
    let mut d = String::new();
    let Some(first) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{:.2},{:.2}", first.x, first.y);

    if tension <= 0.0 {
        for p in &points[1..] {
            let _ = write!(d, " L{:.2},{:.2}", p.x, p.y);
        }
        return d;
    }

    let controls = control_points(points, tension, area);
    for i in 1..points.len() {
        let (_, c1) = controls[i - 1];
        let (c2, _) = controls[i];
        let p = points[i];
        let _ = write!(
            d,
            " C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
            c1.x, c1.y, c2.x, c2.y, p.x, p.y
        );
    }
    d
}

fn gradient_def(id: &str, fill: &Fill) -> Option<String> {
    match fill {
        Fill::Solid { .. } => None,
        Fill::LinearGradient { y0, y1, stops } => {
            let mut def = format!(
                r#"<linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="0" y1="{:.2}" x2="0" y2="{:.2}">"#,
                id, y0, y1
            );
            for stop in stops {
                let _ = write!(
                    def,
                    r#"<stop offset="{}" stop-color="{}"/>"#,
                    stop.offset,
                    stop.color.to_css()
                );
            }
            def.push_str("</linearGradient>");
            Some(def)
        }
    }
}

fn fill_attr(id: &str, fill: &Fill) -> String {
    match fill {
        Fill::Solid { color } => color.to_css(),
        Fill::LinearGradient { .. } => format!("url(#{})", id),
    }
}

fn css(color: Option<Rgba>, fallback: &str) -> String {
    color.map(|c| c.to_css()).unwrap_or_else(|| fallback.to_string())
}

/// 将图表状态绘制为 SVG
pub fn render_svg(state: &ChartState) -> String {
    let surface = state.surface();
    let style = state.style();
    let dataset = state.dataset();
    let width = f64::from(surface.width);
    let height = f64::from(surface.height);
    let surface_id = escape_html(&surface.id);

    let area = Area {
        left: PADDING,
        top: PADDING,
        right: (width - AXIS_WIDTH).max(PADDING + 1.0),
        bottom: (height - PADDING).max(PADDING + 1.0),
    };

    let mut svg = format!(
        r#"<svg id="{id}" class="chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" preserveAspectRatio="none" role="img" aria-label="{label}">"#,
        id = surface_id,
        w = surface.width,
        h = surface.height,
        label = escape_html(&dataset.label),
    );

    let data = state.data();
    if data.is_empty() {
        svg.push_str("</svg>");
        return svg;
    }

    let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = Scale::nice(lo, hi);
    let y_of = |v: f64| area.bottom - (v - scale.min) / (scale.max - scale.min) * (area.bottom - area.top);
    let x_step = if data.len() > 1 {
        (area.right - area.left) / (data.len() - 1) as f64
    } else {
        0.0
    };
    let x_of = |i: usize| {
        if data.len() > 1 {
            area.left + x_step * i as f64
        } else {
            (area.left + area.right) / 2.0
        }
    };

    let points: Vec<Point> = data
        .iter()
        .enumerate()
        .map(|(i, &v)| Point { x: x_of(i), y: y_of(v) })
        .collect();

    let gradient_id = format!("{}-fill", surface_id);
    if let Some(def) = gradient_def(&gradient_id, &dataset.background) {
        let _ = write!(svg, "<defs>{}</defs>", def);
    }

    // 纵轴网格与刻度
    let y_axis = &style.y_axis;
    if y_axis.display {
        let grid = css(y_axis.grid_color, "none");
        let tick_color = css(y_axis.tick_color, "currentColor");
        let (family, size) = y_axis
            .tick_font
            .as_ref()
            .map(|f| (f.family.as_str(), f.size))
            .unwrap_or(("monospace", 11));
        let decimals = scale.decimals();

        svg.push_str(r#"<g class="y-axis">"#);
        for tick in scale.ticks() {
            let y = y_of(tick);
            if y_axis.grid_display {
                let _ = write!(
                    svg,
                    r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="1"/>"#,
                    area.left,
                    area.right,
                    grid,
                    y = y
                );
            }
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" fill="{}" font-family="{}" font-size="{}" dominant-baseline="middle">{}</text>"#,
                area.right + 6.0,
                y,
                tick_color,
                escape_html(family),
                size,
                format_grouped_with(tick, decimals)
            );
        }
        svg.push_str("</g>");
    }

    let border = dataset.border_color.to_css();
    if points.len() > 1 {
        let path = line_path(&points, style.line.tension, &area);
        if dataset.fill {
            let (first, last) = (points[0], points[points.len() - 1]);
            let _ = write!(
                svg,
                r#"<path class="area" d="{} L{:.2},{:.2} L{:.2},{:.2} Z" fill="{}" stroke="none"/>"#,
                path,
                last.x,
                area.bottom,
                first.x,
                area.bottom,
                fill_attr(&gradient_id, &dataset.background)
            );
        }
        let _ = write!(
            svg,
            r#"<path class="line" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            path, border, style.line.border_width
        );
    }

    // 悬停区域：按横轴最近的点命中
    let radius = if points.len() == 1 {
        style.line.border_width.max(style.point.radius)
    } else {
        style.point.radius
    };
    let band = if points.len() > 1 { x_step } else { area.right - area.left };
    svg.push_str(r#"<g class="points">"#);
    for (p, &v) in points.iter().zip(data) {
        let _ = write!(
            svg,
            r#"<g class="pt"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="transparent"/><circle cx="{:.2}" cy="{:.2}" r="{}" data-hover-r="{}" fill="{}"/><title>{}</title></g>"#,
            p.x - band / 2.0,
            area.top,
            band,
            area.bottom - area.top,
            p.x,
            p.y,
            radius,
            style.point.hover_radius,
            border,
            format_grouped(v)
        );
    }
    svg.push_str("</g></svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexDescriptor, QuoteSnapshot};
    use crate::services::chart::ChartRenderer;

    fn chart_with(prices: Vec<f64>, current: f64, prev: f64) -> ChartState {
        let renderer = ChartRenderer::new(600, 400);
        let index = IndexDescriptor::new("kospi", "코스피", "^KS11");
        let mut registry = renderer.init_all(std::slice::from_ref(&index));
        let snapshot = QuoteSnapshot {
            prices,
            current_price: current,
            previous_close: prev,
            last_updated: None,
        };
        renderer.update(&mut registry, "kospi", &snapshot);
        registry.remove("kospi").unwrap()
    }

    #[test]
    fn test_nice_scale() {
        let scale = Scale::nice(2583.2, 2611.7);
        assert_eq!(scale.step, 10.0);
        assert_eq!(scale.min, 2580.0);
        assert_eq!(scale.max, 2620.0);
        assert_eq!(scale.ticks().len(), 5);
        assert_eq!(scale.decimals(), 0);

        let flat = Scale::nice(100.0, 100.0);
        assert!(flat.min < 100.0 && flat.max > 100.0);

        assert!(Scale::nice(0.1, 0.3).decimals() >= 1);
    }

    #[test]
    fn test_render_empty_chart() {
        let svg = render_svg(&chart_with(vec![], 1.0, 1.0));
        assert!(svg.starts_with(r#"<svg id="kospiChart""#));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<path"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_render_single_point() {
        let svg = render_svg(&chart_with(vec![2500.0], 2500.0, 2490.0));
        assert!(!svg.contains(r#"class="line""#));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains(r#"r="2""#));
    }

    #[test]
    fn test_render_positive_series() {
        let svg = render_svg(&chart_with(vec![100.0, 101.0, 102.0], 102.0, 100.0));

        assert!(svg.contains(r##"stroke="#2ebd85""##));
        assert!(svg.contains(r#"<linearGradient id="kospiChart-fill" gradientUnits="userSpaceOnUse" x1="0" y1="0.00" x2="0" y2="400.00">"#));
        assert!(svg.contains(r#"stop-color="rgba(46, 189, 133, 0.2)""#));
        assert!(svg.contains(r#"stop-color="rgba(46, 189, 133, 0)""#));
        assert!(svg.contains(r#"fill="url(#kospiChart-fill)""#));
        assert_eq!(svg.matches(r#"class="pt""#).count(), 3);
        assert!(svg.contains("'JetBrains Mono', monospace") || svg.contains("&#39;JetBrains Mono&#39;, monospace"));
        assert!(svg.contains(" C"));
        assert!(svg.contains("<title>102.00</title>"));
    }

    #[test]
    fn test_render_negative_series() {
        let svg = render_svg(&chart_with(vec![102.0, 100.0], 100.0, 102.0));
        assert!(svg.contains(r##"stroke="#f6465d""##));
        assert!(svg.contains(r#"stop-color="rgba(246, 70, 93, 0.2)""#));
    }

    #[test]
    fn test_control_points_stay_inside_area() {
        let area = Area { left: 0.0, top: 10.0, right: 100.0, bottom: 90.0 };
        let points = vec![
            Point { x: 0.0, y: 90.0 },
            Point { x: 50.0, y: 10.0 },
            Point { x: 100.0, y: 90.0 },
        ];
        for (a, b) in control_points(&points, 0.4, &area) {
            assert!(a.y >= area.top && a.y <= area.bottom);
            assert!(b.y >= area.top && b.y <= area.bottom);
        }
    }
}
